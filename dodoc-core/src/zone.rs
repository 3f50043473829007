//! Floodplain zones
//!
//! A zone is a contiguous band of floodplain at one wetness state. Zones are
//! described by their *cumulative* area (everything at or below the zone's upper
//! boundary) and the increment they cover themselves.

use crate::units::M2_TO_HA;
use serde::{Deserialize, Serialize};

/// A band of floodplain carrying its own leaf litter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Area at or below the zone's upper boundary
    ///
    /// unit: m²
    pub cumulative_area_m2: f64,
    /// Area covered by this zone alone
    ///
    /// unit: m²
    pub zone_area_m2: f64,
    /// Elevation of the zone's upper boundary
    ///
    /// unit: m
    pub elevation_m: f64,
    wet: bool,
    /// Readily degradable litter density
    ///
    /// unit: kg/ha
    pub leaf_readily_degradable: f64,
    /// Non-readily degradable litter density
    ///
    /// unit: kg/ha
    pub leaf_non_readily_degradable: f64,
    /// Litter added to the zone during the last step
    ///
    /// unit: kg
    pub leaf_accumulation: f64,
}

impl Zone {
    fn new(
        wet: bool,
        cumulative_area_m2: f64,
        zone_area_m2: f64,
        elevation_m: f64,
        leaf_readily_degradable: f64,
        leaf_non_readily_degradable: f64,
    ) -> Self {
        Self {
            cumulative_area_m2,
            zone_area_m2,
            elevation_m,
            wet,
            leaf_readily_degradable,
            leaf_non_readily_degradable,
            leaf_accumulation: 0.0,
        }
    }

    /// Create a zone above the water line
    pub fn dry(
        cumulative_area_m2: f64,
        zone_area_m2: f64,
        elevation_m: f64,
        leaf_readily_degradable: f64,
        leaf_non_readily_degradable: f64,
    ) -> Self {
        Self::new(
            false,
            cumulative_area_m2,
            zone_area_m2,
            elevation_m,
            leaf_readily_degradable,
            leaf_non_readily_degradable,
        )
    }

    /// Create a zone below the water line
    pub fn wet(
        cumulative_area_m2: f64,
        zone_area_m2: f64,
        elevation_m: f64,
        leaf_readily_degradable: f64,
        leaf_non_readily_degradable: f64,
    ) -> Self {
        Self::new(
            true,
            cumulative_area_m2,
            zone_area_m2,
            elevation_m,
            leaf_readily_degradable,
            leaf_non_readily_degradable,
        )
    }

    pub fn is_wet(&self) -> bool {
        self.wet
    }

    pub fn is_dry(&self) -> bool {
        !self.wet
    }

    pub fn zone_area_ha(&self) -> f64 {
        self.zone_area_m2 * M2_TO_HA
    }

    /// Combined litter density of both pools (kg/ha)
    pub fn litter_density(&self) -> f64 {
        self.leaf_readily_degradable + self.leaf_non_readily_degradable
    }

    /// Total litter mass resident in the zone (kg)
    pub fn litter_mass_kg(&self) -> f64 {
        self.litter_density() * self.zone_area_ha()
    }

    /// Mass for `density` (kg/ha) over the zone when it is dry, zero otherwise
    pub fn dry_mass_kg(&self, density: f64) -> f64 {
        if self.wet {
            0.0
        } else {
            density * self.zone_area_ha()
        }
    }

    /// Mass for `density` (kg/ha) over the zone when it is wet, zero otherwise
    pub fn wet_mass_kg(&self, density: f64) -> f64 {
        if self.wet {
            density * self.zone_area_ha()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn test_litter_mass() {
        let zone = Zone::dry(20000.0, 10000.0, 5.0, 300.0, 100.0);
        assert!(is_close!(zone.zone_area_ha(), 1.0));
        assert!(is_close!(zone.litter_mass_kg(), 400.0));
        assert!(is_close!(zone.dry_mass_kg(zone.leaf_readily_degradable), 300.0));
        assert_eq!(zone.wet_mass_kg(zone.leaf_readily_degradable), 0.0);
    }

    #[test]
    fn test_wetness_is_fixed_at_construction() {
        let wet = Zone::wet(500.0, 500.0, 2.0, 10.0, 20.0);
        assert!(wet.is_wet());
        assert!(!wet.is_dry());
        assert_eq!(wet.dry_mass_kg(10.0), 0.0);
        assert!(is_close!(wet.wet_mass_kg(20.0), 1.0));
        assert_eq!(wet.leaf_accumulation, 0.0);
    }
}
