//! DOC/DO model parameters
//!
//! Each parameter struct carries documented defaults and deserialises with
//! `#[serde(default)]`, so a configuration only needs to name the values it
//! changes.

mod doc;
mod oxygen;

pub use doc::{DocParameters, LEGACY_NON_READILY_DEGRADABLE_CAP};
pub use oxygen::{OxygenParameters, StructureReaeration, ZeroVolumePolicy};

use dodoc_core::errors::{DoDocError, DoDocResult};
use serde::{Deserialize, Serialize};

/// Full parameter set for one DOC/DO model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoDocParameters {
    pub doc: DocParameters,
    pub oxygen: OxygenParameters,

    /// Fraction of a link represented by this model (fac).
    ///
    /// Scales the seeded floodplain area and divides the DO load.
    ///
    /// unit: dimensionless
    /// Default: 1.0
    pub scaling_factor: f64,
}

impl Default for DoDocParameters {
    fn default() -> Self {
        Self {
            doc: DocParameters::default(),
            oxygen: OxygenParameters::default(),
            scaling_factor: 1.0,
        }
    }
}

impl DoDocParameters {
    /// Check every parameter, failing on the first invalid value
    pub fn validate(&self) -> DoDocResult<()> {
        if !(self.scaling_factor > 0.0) {
            return Err(DoDocError::Configuration(format!(
                "scaling_factor must be positive, got {}",
                self.scaling_factor
            )));
        }
        self.doc.validate()?;
        self.oxygen.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_scaling_factor() {
        let params = DoDocParameters {
            scaling_factor: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
        assert!(DoDocParameters::default().validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let params = DoDocParameters {
            scaling_factor: 0.5,
            ..Default::default()
        };
        let json = serde_json::to_string(&params).unwrap();
        let restored: DoDocParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, params);
    }
}
