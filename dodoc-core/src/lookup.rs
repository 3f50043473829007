//! Piecewise-linear lookup curves
//!
//! Curves map an elevation (m) to a quantity such as initial litter density or
//! daily litter accumulation. They are defined by a list of `(x, y)` points with
//! strictly increasing `x`; values outside the defined range are held at the
//! nearest end point.

use crate::errors::{DoDocError, DoDocResult};
use serde::{Deserialize, Serialize};

/// A piecewise-linear function of one variable.
///
/// Serialises as a list of `[x, y]` pairs. Deserialisation validates the points,
/// so a curve that exists is always non-empty and strictly increasing in `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct LookupCurve {
    points: Vec<[f64; 2]>,
}

impl LookupCurve {
    /// Build a curve, naming it in any validation error.
    pub fn try_new(name: &str, points: Vec<[f64; 2]>) -> DoDocResult<Self> {
        if points.is_empty() {
            return Err(DoDocError::EmptyCurve {
                name: name.to_string(),
            });
        }
        for (index, pair) in points.windows(2).enumerate() {
            if pair[1][0] <= pair[0][0] || pair[1][0].is_nan() {
                return Err(DoDocError::NonMonotonicCurve {
                    name: name.to_string(),
                    index: index + 1,
                });
            }
        }
        Ok(Self { points })
    }

    /// Build a curve from `(x, y)` points.
    pub fn new(points: Vec<[f64; 2]>) -> DoDocResult<Self> {
        Self::try_new("lookup curve", points)
    }

    /// A curve with the same value everywhere.
    pub fn constant(value: f64) -> Self {
        Self {
            points: vec![[0.0, value]],
        }
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a validated curve; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min_x(&self) -> f64 {
        self.points[0][0]
    }

    pub fn max_x(&self) -> f64 {
        self.points[self.points.len() - 1][0]
    }

    /// Value of the last point, i.e. the value at and beyond `max_x`.
    pub fn max_y(&self) -> f64 {
        self.points[self.points.len() - 1][1]
    }

    /// Evaluate the curve at `x`, clamping to the end values outside the range.
    pub fn evaluate(&self, x: f64) -> f64 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if x <= first[0] {
            return first[1];
        }
        if x >= last[0] {
            return last[1];
        }

        // First point strictly greater than x; guaranteed in 1..len by the checks above
        let upper = self.points.partition_point(|p| p[0] <= x);
        let [x0, y0] = self.points[upper - 1];
        let [x1, y1] = self.points[upper];
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }

    /// The x values of all points lying strictly between `lower` and `upper`.
    pub fn breakpoints_between(&self, lower: f64, upper: f64) -> Vec<f64> {
        self.points
            .iter()
            .map(|p| p[0])
            .filter(|&x| x > lower && x < upper)
            .collect()
    }
}

impl Default for LookupCurve {
    fn default() -> Self {
        Self::constant(0.0)
    }
}

impl TryFrom<Vec<[f64; 2]>> for LookupCurve {
    type Error = DoDocError;

    fn try_from(points: Vec<[f64; 2]>) -> DoDocResult<Self> {
        Self::new(points)
    }
}

impl From<LookupCurve> for Vec<[f64; 2]> {
    fn from(curve: LookupCurve) -> Self {
        curve.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    fn ramp() -> LookupCurve {
        LookupCurve::new(vec![[10.0, 0.0], [12.0, 100.0], [16.0, 300.0]]).unwrap()
    }

    #[test]
    fn test_interpolates_between_points() {
        let curve = ramp();
        assert!(is_close!(curve.evaluate(11.0), 50.0));
        assert!(is_close!(curve.evaluate(14.0), 200.0));
        assert!(is_close!(curve.evaluate(12.0), 100.0));
    }

    #[test]
    fn test_clamps_outside_range() {
        let curve = ramp();
        assert_eq!(curve.evaluate(5.0), 0.0);
        assert_eq!(curve.evaluate(20.0), 300.0);
    }

    #[test]
    fn test_constant_curve() {
        let curve = LookupCurve::constant(7.5);
        assert_eq!(curve.evaluate(-100.0), 7.5);
        assert_eq!(curve.evaluate(100.0), 7.5);
        assert_eq!(curve.len(), 1);
    }

    #[test]
    fn test_rejects_empty_curve() {
        let err = LookupCurve::try_new("leaf_accumulation", vec![]).unwrap_err();
        assert!(matches!(err, DoDocError::EmptyCurve { ref name } if name == "leaf_accumulation"));
    }

    #[test]
    fn test_rejects_non_monotonic_curve() {
        let err = LookupCurve::new(vec![[1.0, 0.0], [3.0, 1.0], [2.0, 2.0]]).unwrap_err();
        assert!(matches!(err, DoDocError::NonMonotonicCurve { index: 2, .. }));

        let err = LookupCurve::new(vec![[1.0, 0.0], [1.0, 1.0]]).unwrap_err();
        assert!(matches!(err, DoDocError::NonMonotonicCurve { index: 1, .. }));
    }

    #[test]
    fn test_breakpoints_are_strictly_inside() {
        let curve = ramp();
        assert_eq!(curve.breakpoints_between(10.0, 16.0), vec![12.0]);
        assert_eq!(curve.breakpoints_between(9.0, 17.0), vec![10.0, 12.0, 16.0]);
        assert!(curve.breakpoints_between(12.5, 15.0).is_empty());
    }

    #[test]
    fn test_serde_validates_points() {
        let curve: LookupCurve = serde_json::from_str("[[0.0, 1.0], [2.0, 3.0]]").unwrap();
        assert!(is_close!(curve.evaluate(1.0), 2.0));

        let json = serde_json::to_string(&curve).unwrap();
        assert_eq!(json, "[[0.0,1.0],[2.0,3.0]]");

        let invalid = serde_json::from_str::<LookupCurve>("[[2.0, 1.0], [0.0, 3.0]]");
        assert!(invalid.is_err(), "Decreasing x values should be rejected");
    }

    #[test]
    fn test_curve_from_toml() {
        #[derive(Deserialize)]
        struct Holder {
            geometry: LookupCurve,
        }

        let holder: Holder = toml::from_str("geometry = [[0.0, 0.0], [4.0, 800.0]]").unwrap();
        assert_eq!(holder.geometry.max_y(), 800.0);
        assert!(is_close!(holder.geometry.evaluate(1.0), 200.0));

        let invalid = toml::from_str::<Holder>("geometry = []");
        assert!(invalid.is_err(), "An empty curve should be rejected");
    }
}
