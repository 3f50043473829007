//! Dissolved organic carbon parameters
//!
//! Parameters for leaf litter accumulation and decay on the dry floodplain, DOC
//! leaching from submerged litter and microbial consumption of DOC in the water
//! column.
//!
//! # Litter pools
//!
//! Litter is split into a readily degradable pool (leaves) and a non-readily
//! degradable pool (woody debris). Each pool has its own decay constant on the dry
//! floodplain and its own release rate and release capacity once submerged.

use dodoc_core::errors::{DoDocError, DoDocResult};
use dodoc_core::lookup::LookupCurve;
use dodoc_core::temperature::{SigmaCorrection, TemperatureResponse};
use serde::{Deserialize, Serialize};

/// Ceiling on non-readily degradable litter used by early calibrations (kg/ha).
pub const LEGACY_NON_READILY_DEGRADABLE_CAP: f64 = 2850.0;

/// Parameters for the DOC process engine.
///
/// Leached DOC from a submerged zone, per pool:
///
/// $$L = M_{wet} \times 1000 \times f \times c_{max}(T) \times (1 - e^{-k(T)\sigma})$$
///
/// where $M_{wet}$ is the wet litter mass (kg), $f$ the pool's share of it,
/// $c_{max}$ the release capacity (mg DOC per g litter) and $k$ the release rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocParameters {
    /// Maximum floodplain area over which litter accumulates.
    ///
    /// Zero uses the maximum area reported by the areal.
    ///
    /// unit: m²
    /// Default: 0.0
    pub max_accumulation_area: f64,

    /// Fraction of new litter entering the readily degradable pool
    ///
    /// unit: dimensionless
    /// Default: 0.5
    pub fraction_degradable: f64,

    /// Daily litter fall against elevation
    ///
    /// unit: kg/ha/day
    /// Default: 0 everywhere
    pub leaf_accumulation: LookupCurve,

    /// Daily decay constant of readily degradable litter on dry ground
    ///
    /// unit: 1/day
    /// Default: 0.03
    pub leaf_k1: f64,

    /// Daily decay constant of non-readily degradable litter on dry ground
    ///
    /// unit: 1/day
    /// Default: 0.003
    pub leaf_k2: f64,

    /// Readily degradable litter present at the start of the run
    ///
    /// unit: kg/ha against elevation
    /// Default: 0 everywhere
    pub initial_readily_degradable: LookupCurve,

    /// Non-readily degradable litter present at the start of the run
    ///
    /// unit: kg/ha against elevation
    /// Default: 0 everywhere
    pub initial_non_readily_degradable: LookupCurve,

    /// First-order DOC release rate of readily degradable litter at 20 °C
    ///
    /// unit: 1/day
    /// Default: 0.4
    pub release_rate_readily_at_20: f64,

    /// First-order DOC release rate of non-readily degradable litter at 20 °C
    ///
    /// unit: 1/day
    /// Default: 0.04
    pub release_rate_non_readily_at_20: f64,

    /// Maximum DOC released by readily degradable litter at 20 °C
    ///
    /// unit: mg DOC / g litter
    /// Default: 40.0
    pub max_release_readily_at_20: f64,

    /// Maximum DOC released by non-readily degradable litter at 20 °C
    ///
    /// unit: mg DOC / g litter
    /// Default: 15.0
    pub max_release_non_readily_at_20: f64,

    /// Temperature response of both release rates
    ///
    /// Default: exponential, θ = 1.05
    pub release_rate_response: TemperatureResponse,

    /// Temperature response of both release capacities
    ///
    /// Default: power law, exponent 0.5
    pub release_capacity_response: TemperatureResponse,

    /// Daily fraction of water-column DOC consumed by microbes at 20 °C
    ///
    /// unit: 1/day
    /// Default: 0.03
    pub doc_consumption_coefficient: f64,

    /// Temperature response of the consumption coefficient (floodplain models only)
    ///
    /// Default: exponential, θ = 1.05
    pub consumption_response: TemperatureResponse,

    /// Ceiling on non-readily degradable litter density on dry ground
    ///
    /// unit: kg/ha
    /// Default: 285000.0
    pub non_readily_degradable_cap: f64,

    /// Seed one zone per elevation band instead of a single zone
    ///
    /// Default: false
    pub initialise_with_multiple_zones: bool,

    /// Correction applied to leaching and consumption
    ///
    /// Default: unity
    pub sigma: SigmaCorrection,
}

impl Default for DocParameters {
    fn default() -> Self {
        Self {
            max_accumulation_area: 0.0,
            fraction_degradable: 0.5,
            leaf_accumulation: LookupCurve::constant(0.0),
            leaf_k1: 0.03,
            leaf_k2: 0.003,
            initial_readily_degradable: LookupCurve::constant(0.0),
            initial_non_readily_degradable: LookupCurve::constant(0.0),
            release_rate_readily_at_20: 0.4,
            release_rate_non_readily_at_20: 0.04,
            max_release_readily_at_20: 40.0,
            max_release_non_readily_at_20: 15.0,
            release_rate_response: TemperatureResponse::Exponential { theta: 1.05 },
            release_capacity_response: TemperatureResponse::PowerLaw { exponent: 0.5 },
            doc_consumption_coefficient: 0.03,
            consumption_response: TemperatureResponse::Exponential { theta: 1.05 },
            non_readily_degradable_cap: 285000.0,
            initialise_with_multiple_zones: false,
            sigma: SigmaCorrection::Unity,
        }
    }
}

impl DocParameters {
    pub fn validate(&self) -> DoDocResult<()> {
        if self.max_accumulation_area < 0.0 {
            return Err(DoDocError::NegativeArea {
                what: "max_accumulation_area".to_string(),
                value: self.max_accumulation_area,
            });
        }
        if !(0.0..=1.0).contains(&self.fraction_degradable) {
            return Err(DoDocError::Configuration(format!(
                "fraction_degradable must lie in [0, 1], got {}",
                self.fraction_degradable
            )));
        }
        let non_negative = [
            ("leaf_k1", self.leaf_k1),
            ("leaf_k2", self.leaf_k2),
            ("release_rate_readily_at_20", self.release_rate_readily_at_20),
            (
                "release_rate_non_readily_at_20",
                self.release_rate_non_readily_at_20,
            ),
            ("max_release_readily_at_20", self.max_release_readily_at_20),
            (
                "max_release_non_readily_at_20",
                self.max_release_non_readily_at_20,
            ),
            ("doc_consumption_coefficient", self.doc_consumption_coefficient),
            ("non_readily_degradable_cap", self.non_readily_degradable_cap),
        ];
        if let Some((name, value)) = non_negative.iter().find(|(_, v)| !(*v >= 0.0)) {
            return Err(DoDocError::Configuration(format!(
                "{} must be non-negative, got {}",
                name, value
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = DocParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.non_readily_degradable_cap, 285000.0);
        assert_eq!(params.sigma, SigmaCorrection::Unity);
    }

    #[test]
    fn test_rejects_fraction_out_of_range() {
        let params = DocParameters {
            fraction_degradable: 1.2,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(DoDocError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_negative_rates() {
        let params = DocParameters {
            leaf_k2: -0.1,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("leaf_k2"), "Error was {}", err);

        let params = DocParameters {
            max_accumulation_area: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(DoDocError::NegativeArea { .. })
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let params: DocParameters = toml::from_str(
            r#"
            leaf_k1 = 0.05
            non_readily_degradable_cap = 2850.0
            leaf_accumulation = [[0.0, 1.0], [5.0, 3.0]]
            release_rate_response = { form = "constant" }
            "#,
        )
        .unwrap();
        assert_eq!(params.leaf_k1, 0.05);
        assert_eq!(params.leaf_k2, 0.003);
        assert_eq!(params.non_readily_degradable_cap, LEGACY_NON_READILY_DEGRADABLE_CAP);
        assert_eq!(params.leaf_accumulation.evaluate(2.5), 2.0);
        assert_eq!(params.release_rate_response, TemperatureResponse::Constant);
    }
}
