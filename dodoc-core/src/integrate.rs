//! Integration of elevation-indexed curves over floodplain bands
//!
//! Litter curves are defined against elevation but litter lives on area. To find
//! the litter carried by a band of floodplain between two elevations, the curve is
//! sampled at the band limits and at every curve breakpoint inside the band; each
//! sample elevation is mapped to an area through the areal and the trapezoidal rule
//! is applied over the resulting `(area, value)` sequence.

use crate::areal::Areal;
use crate::lookup::LookupCurve;
use crate::units::AREA_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Result of integrating a curve over an elevation band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BandIntegral {
    /// Integral of the curve over area
    ///
    /// unit: curve unit × m²
    pub total: f64,
    /// Area traversed between the band limits
    ///
    /// unit: m²
    pub area: f64,
}

impl BandIntegral {
    /// Area-weighted average of the curve over the band.
    ///
    /// A band that traverses no area contributes zero.
    pub fn average(&self) -> f64 {
        if self.area.abs() < AREA_TOLERANCE {
            log::debug!(
                "Band integral over zero area (total {}), treating average as zero",
                self.total
            );
            return 0.0;
        }
        self.total / self.area
    }
}

/// Integrate `curve` over the band between elevations `lower` and `upper`.
///
/// Returns an empty integral when `upper <= lower`.
pub fn integrate_band(
    curve: &LookupCurve,
    areal: &dyn Areal,
    lower: f64,
    upper: f64,
) -> BandIntegral {
    if upper <= lower {
        return BandIntegral::default();
    }

    let elevations = std::iter::once(lower)
        .chain(curve.breakpoints_between(lower, upper))
        .chain(std::iter::once(upper));
    let samples: Vec<(f64, f64)> = elevations
        .map(|h| (areal.area_for_height(h), curve.evaluate(h)))
        .collect();

    samples
        .windows(2)
        .fold(BandIntegral::default(), |acc, pair| {
            let (a0, v0) = pair[0];
            let (a1, v1) = pair[1];
            let width = a1 - a0;
            BandIntegral {
                total: acc.total + 0.5 * (v0 + v1) * width,
                area: acc.area + width,
            }
        })
}
