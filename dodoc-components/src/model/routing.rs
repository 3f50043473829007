//! Routing DOC engine
//!
//! Reaches without a floodplain carry no zones. DOC decays at a constant daily
//! fraction and the soil exerts no oxygen demand.

use super::oxygen::SoilDemandInputs;
use super::{DocStep, ModelInputs};
use crate::outputs::Diagnostics;
use crate::parameters::DoDocParameters;
use dodoc_core::units::{KG_TO_MG, MG_TO_KG};
use log::debug;

pub(crate) fn process_doc(
    parameters: &DoDocParameters,
    inputs: &ModelInputs,
    sigma: f64,
    diagnostics: &mut Diagnostics,
) -> DocStep {
    let mass_kg = inputs.concentration_doc * inputs.working_volume;
    let available_mg = mass_kg * KG_TO_MG;
    let mut consumed_doc_mg = available_mg * parameters.doc.doc_consumption_coefficient * sigma;
    // Cannot consume more DOC than is present
    if consumed_doc_mg > available_mg {
        debug!(
            "Consumption of {} mg exceeds available DOC of {} mg, capped",
            consumed_doc_mg, available_mg
        );
        consumed_doc_mg = available_mg;
    }
    diagnostics.consumed_doc = consumed_doc_mg;

    DocStep {
        doc_load: (available_mg - consumed_doc_mg) * MG_TO_KG,
        consumed_doc_mg,
    }
}

pub(crate) fn no_soil_oxygen_demand(_inputs: &SoilDemandInputs<'_>) -> f64 {
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dodoc_core::temperature::SigmaCorrection;

    #[test]
    fn test_first_order_decay() {
        let mut parameters = DoDocParameters::default();
        parameters.doc.doc_consumption_coefficient = 0.05;
        let inputs = ModelInputs {
            working_volume: 1000.0,
            concentration_doc: 0.01,
            ..Default::default()
        };
        let mut diagnostics = Diagnostics::default();

        let step = process_doc(&parameters, &inputs, 1.0, &mut diagnostics);
        assert_relative_eq!(step.consumed_doc_mg, 500000.0, max_relative = 1e-12);
        assert_relative_eq!(step.doc_load, 9.5, max_relative = 1e-12);
        assert_eq!(diagnostics.consumed_doc, step.consumed_doc_mg);
    }

    #[test]
    fn test_consumption_is_capped_at_available_doc() {
        let mut parameters = DoDocParameters::default();
        parameters.doc.doc_consumption_coefficient = 0.6;
        parameters.doc.sigma = SigmaCorrection::Legacy;
        assert!(parameters.validate().is_ok());
        let inputs = ModelInputs {
            working_volume: 1000.0,
            concentration_doc: 0.01,
            ..Default::default()
        };
        let sigma = parameters.doc.sigma.at(32.0);
        assert!(0.6 * sigma > 1.0);

        let mut diagnostics = Diagnostics::default();
        let step = process_doc(&parameters, &inputs, sigma, &mut diagnostics);
        assert_eq!(step.doc_load, 0.0);
        assert_relative_eq!(step.consumed_doc_mg, 1e7, max_relative = 1e-12);
    }
}
