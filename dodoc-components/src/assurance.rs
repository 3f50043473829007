//! Post-hoc checks on model state
//!
//! Models record violations while they run; the registry collects them afterwards
//! so a run is never halted by a check.

use dodoc_core::errors::DoDocError;
use serde::{Deserialize, Serialize};

/// The modelled area of an areal exceeded the configured maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxAreaExceedance {
    pub location: String,
    /// unit: m²
    pub modelled_area: f64,
    /// unit: m²
    pub max_area: f64,
}

impl MaxAreaExceedance {
    /// Check `modelled_area` against `max_area`, returning a record when exceeded
    pub fn check(location: &str, modelled_area: f64, max_area: f64) -> Option<Self> {
        (modelled_area > max_area).then(|| Self {
            location: location.to_string(),
            modelled_area,
            max_area,
        })
    }
}

impl From<MaxAreaExceedance> for DoDocError {
    fn from(value: MaxAreaExceedance) -> Self {
        DoDocError::MaxAreaExceeded {
            location: value.location,
            modelled_area: value.modelled_area,
            max_area: value.max_area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check() {
        assert!(MaxAreaExceedance::check("Storage", 100.0, 100.0).is_none());
        let record = MaxAreaExceedance::check("Storage", 120.0, 100.0).unwrap();
        assert_eq!(record.modelled_area, 120.0);

        let err: DoDocError = record.into();
        assert_eq!(
            err.to_string(),
            "DODOC model at Storage has a modelled area of 120 m2 that has exceeded the Max Area of 100 m2."
        );
    }
}
