//! Dissolved oxygen balance
//!
//! Shared by every model variant. The only variant-specific term is the soil
//! oxygen demand, supplied as a function value.
//!
//! $$O_2 = \min(O_{2,0} + P + R - S - D,\ O_{2,sat} V)$$
//!
//! where $P$ is primary production, $R$ atmospheric reaeration, $S$ soil oxygen
//! demand and $D$ the oxygen consumed alongside DOC.

use super::ModelInputs;
use crate::outputs::Diagnostics;
use crate::parameters::{DoDocParameters, OxygenParameters};
use dodoc_core::units::{AREA_TOLERANCE, KG_M3_TO_MG_L, MG_L_TO_KG_M3, MG_TO_KG, O2_PER_DOC};

/// Values a soil oxygen demand function may depend on.
#[derive(Debug, Clone, Copy)]
pub struct SoilDemandInputs<'a> {
    pub parameters: &'a OxygenParameters,
    /// unit: °C
    pub temperature: f64,
    /// unit: days
    pub flood_counter: u32,
    /// Wetted area
    ///
    /// unit: m²
    pub area: f64,
}

/// Soil oxygen demand of a model variant (mg)
pub type SoilOxygenDemand = fn(&SoilDemandInputs<'_>) -> f64;

/// Close the oxygen balance and return the DO load (kg)
pub(crate) fn process_do(
    soil_demand: SoilOxygenDemand,
    demand_inputs: &SoilDemandInputs<'_>,
    parameters: &DoDocParameters,
    inputs: &ModelInputs,
    consumed_doc_mg: f64,
    diagnostics: &mut Diagnostics,
) -> f64 {
    let oxygen = &parameters.oxygen;
    let temperature = demand_inputs.temperature;
    let volume = inputs.working_volume;

    let soil_oxygen = soil_demand(demand_inputs) * MG_TO_KG;
    let doc_oxygen = consumed_doc_mg * MG_TO_KG * O2_PER_DOC;

    let saturation_mg_l = oxygen.saturation.at(temperature);
    let saturation = saturation_mg_l * MG_L_TO_KG_M3;
    let concentration = inputs.concentration_do.min(saturation);
    let existing = concentration * volume;

    let reaeration = oxygen.reaeration_coefficient
        * oxygen.reaeration_adjustment(temperature)
        * (saturation - concentration).max(0.0)
        * volume;
    let production = oxygen.primary_production_rate
        * MG_L_TO_KG_M3
        * volume
        * oxygen.production_multiplier(inputs.concentration_doc * KG_M3_TO_MG_L);

    let mut total = existing + production + reaeration - soil_oxygen - doc_oxygen;

    if let Some(structure) = &oxygen.structure {
        let ratio = structure.deficit_ratio(temperature);
        if volume > AREA_TOLERANCE && ratio > 0.0 {
            let deficit = saturation - total / volume;
            total = (saturation - deficit / ratio) * volume;
        }
    }
    total = total.min(saturation * volume);

    diagnostics.soil_oxygen = soil_oxygen;
    diagnostics.doc_oxygen = doc_oxygen;
    diagnostics.saturated_oxygen = saturation_mg_l;
    diagnostics.reaeration = reaeration;
    diagnostics.production = production;

    if volume > AREA_TOLERANCE {
        (total / parameters.scaling_factor).max(0.0)
    } else {
        oxygen.zero_volume_policy.load()
    }
}
