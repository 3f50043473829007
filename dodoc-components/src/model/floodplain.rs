//! Floodplain DOC engine
//!
//! Runs the zone tracker, then advances litter in every zone: submerged litter
//! leaches DOC into the water column, litter on dry ground decays and receives new
//! litter fall. The DOC released joins the DOC already in the water column before
//! microbial consumption is applied.

use super::oxygen::SoilDemandInputs;
use super::{DocStep, ModelInputs};
use crate::outputs::Diagnostics;
use crate::parameters::DoDocParameters;
use dodoc_core::areal::Areal;
use dodoc_core::integrate::integrate_band;
use dodoc_core::units::{G_PER_KG, KG_TO_MG, MG_TO_KG};
use dodoc_core::zone_set::{AreaChange, InitialLitter, ZoneSet};
use log::debug;
use serde::{Deserialize, Serialize};

/// State carried between days by a floodplain model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FloodplainState {
    zones: ZoneSet,
    /// unit: m²
    previous_area: f64,
    /// unit: days
    flood_counter: u32,
}

/// Temperature-adjusted litter rates for one day.
#[derive(Debug, Clone, Copy)]
struct LitterRates {
    release_readily: f64,
    release_non_readily: f64,
    capacity_readily: f64,
    capacity_non_readily: f64,
    leaching_readily: f64,
    leaching_non_readily: f64,
}

impl LitterRates {
    fn new(parameters: &DoDocParameters, temperature: f64, sigma: f64) -> Self {
        let doc = &parameters.doc;
        let release_readily = doc
            .release_rate_response
            .at(doc.release_rate_readily_at_20, temperature);
        let release_non_readily = doc
            .release_rate_response
            .at(doc.release_rate_non_readily_at_20, temperature);
        Self {
            release_readily,
            release_non_readily,
            capacity_readily: doc
                .release_capacity_response
                .at(doc.max_release_readily_at_20, temperature),
            capacity_non_readily: doc
                .release_capacity_response
                .at(doc.max_release_non_readily_at_20, temperature),
            leaching_readily: 1.0 - (-release_readily * sigma).exp(),
            leaching_non_readily: 1.0 - (-release_non_readily * sigma).exp(),
        }
    }
}

impl FloodplainState {
    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    pub fn flood_counter(&self) -> u32 {
        self.flood_counter
    }

    pub fn previous_area(&self) -> f64 {
        self.previous_area
    }

    pub fn reset(&mut self) {
        self.zones.clear();
        self.previous_area = 0.0;
        self.flood_counter = 0;
    }

    fn seed(&mut self, areal: &dyn Areal, parameters: &DoDocParameters) {
        let doc = &parameters.doc;
        let litter = InitialLitter {
            readily_degradable: &doc.initial_readily_degradable,
            non_readily_degradable: &doc.initial_non_readily_degradable,
        };
        let max_area = if doc.max_accumulation_area > 0.0 {
            doc.max_accumulation_area
        } else {
            areal.max_area()
        };
        if doc.initialise_with_multiple_zones {
            self.zones.seed_stratified(
                areal,
                litter,
                &doc.leaf_accumulation,
                parameters.scaling_factor,
                max_area,
            );
        } else {
            self.zones
                .seed_single(areal, litter, parameters.scaling_factor * max_area);
        }
    }

    /// Restructure the zones for today's wetted area and advance the flood counter
    fn update_zones(&mut self, areal: &dyn Areal, working_volume: f64) -> AreaChange {
        let area = areal.area();
        let mut delta_area = area - self.previous_area;
        self.previous_area = area;
        if working_volume < 0.0 {
            delta_area = 0.0;
        }

        let change = self.zones.update(area, areal.elevation(), delta_area);
        self.flood_counter = if change.continues_flood() {
            self.flood_counter + 1
        } else {
            0
        };
        if area <= 0.0 {
            self.flood_counter = 0;
        }
        change
    }

    /// Advance litter and the water-column DOC by one day
    pub(crate) fn process_doc(
        &mut self,
        areal: &dyn Areal,
        parameters: &DoDocParameters,
        inputs: &ModelInputs,
        temperature: f64,
        sigma: f64,
        diagnostics: &mut Diagnostics,
    ) -> DocStep {
        if self.zones.is_empty() {
            self.seed(areal, parameters);
        }
        self.update_zones(areal, inputs.working_volume);

        let doc = &parameters.doc;
        let rates = LitterRates::new(parameters, temperature, sigma);

        // Litter fall per zone, averaged over the zone's elevation band
        let floor = areal.floodplain_elevation();
        let order = self.zones.elevation_order();
        let accumulation_rates: Vec<(usize, f64)> = order
            .iter()
            .filter_map(|&index| {
                let (lower, upper) = self.zones.band_bounds(index, floor)?;
                let band = integrate_band(&doc.leaf_accumulation, areal, lower, upper);
                Some((index, band.average()))
            })
            .collect();

        let mut leached_mg = 0.0;
        let mut total_wet_leaf = 0.0;
        let mut leaf_accumulation = 0.0;
        let zones = self.zones.zones_mut();
        for (index, rate) in accumulation_rates {
            let zone = &mut zones[index];
            let zone_ha = zone.zone_area_ha();
            zone.leaf_accumulation = rate * zone_ha;
            leaf_accumulation += zone.leaf_accumulation;

            if zone.is_wet() {
                let pool = zone.litter_density();
                let wet_leaf_kg = zone_ha * (pool + rate);
                total_wet_leaf += wet_leaf_kg;

                if pool > 0.0 {
                    let fraction_readily = zone.leaf_readily_degradable / pool;
                    let fraction_non_readily = zone.leaf_non_readily_degradable / pool;
                    leached_mg += wet_leaf_kg
                        * G_PER_KG
                        * (fraction_readily * rates.capacity_readily * rates.leaching_readily
                            + fraction_non_readily
                                * rates.capacity_non_readily
                                * rates.leaching_non_readily);
                } else if wet_leaf_kg > 0.0 {
                    debug!(
                        "Zone {} has no resident litter to split {} kg of wet leaf, no DOC leached",
                        index, wet_leaf_kg
                    );
                }

                zone.leaf_readily_degradable *= 1.0 - rates.leaching_readily;
                zone.leaf_non_readily_degradable *= 1.0 - rates.leaching_non_readily;
            } else {
                zone.leaf_readily_degradable = zone.leaf_readily_degradable * (-doc.leaf_k1).exp()
                    + rate * doc.fraction_degradable;
                zone.leaf_non_readily_degradable = (zone.leaf_non_readily_degradable
                    * (-doc.leaf_k2).exp()
                    + rate * (1.0 - doc.fraction_degradable))
                    .min(doc.non_readily_degradable_cap);
            }
        }

        let mut doc_mg = inputs.concentration_doc * inputs.working_volume * KG_TO_MG + leached_mg;
        let consumption = doc
            .consumption_response
            .at(doc.doc_consumption_coefficient, temperature);
        let consumed_doc_mg = doc_mg * consumption * sigma;
        doc_mg -= consumed_doc_mg;
        if doc_mg < 0.0 {
            debug!("Consumption exceeds available DOC by {} mg, load floored at zero", -doc_mg);
            doc_mg = 0.0;
        }

        diagnostics.record_zones(
            &self.zones.litter_totals(),
            self.zones.count_wet(),
            self.zones.count_dry(),
        );
        diagnostics.release_rate_readily_degradable = rates.release_readily;
        diagnostics.release_rate_non_readily_degradable = rates.release_non_readily;
        diagnostics.release_capacity_readily_degradable = rates.capacity_readily;
        diagnostics.release_capacity_non_readily_degradable = rates.capacity_non_readily;
        diagnostics.leaching_rate_readily_degradable = rates.leaching_readily;
        diagnostics.leaching_rate_non_readily_degradable = rates.leaching_non_readily;
        diagnostics.doc_entering_water = leached_mg;
        diagnostics.consumed_doc = consumed_doc_mg;
        diagnostics.total_wet_leaf = total_wet_leaf;
        diagnostics.leaf_accumulation = leaf_accumulation;
        diagnostics.flood_counter = self.flood_counter;

        DocStep {
            doc_load: doc_mg * MG_TO_KG,
            consumed_doc_mg,
        }
    }
}

/// Soil oxygen demand of the inundated floodplain (mg).
///
/// Saturates with flood duration:
///
/// $$S = S_0 (1 - e^{-k \cdot 2^{T-20} \cdot n}) \times A \times s$$
pub(crate) fn soil_oxygen_demand(inputs: &SoilDemandInputs<'_>) -> f64 {
    let params = inputs.parameters;
    let exponent =
        params.soil_oxygen_rate * 2f64.powf(inputs.temperature - 20.0) * inputs.flood_counter as f64;
    params.soil_oxygen_base
        * (1.0 - (-exponent).exp())
        * inputs.area
        * params.soil_oxygen_scaling_factor
}
