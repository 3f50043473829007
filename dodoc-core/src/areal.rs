//! Areals: the spatial units a model is attached to
//!
//! An areal reports the wetted area and water level of a storage, a channel
//! division or a floodplain cell. The host simulator owns the hydraulics and pushes
//! the latest state in through [`Areal::observe`]; the water-quality model only
//! reads from it.
//!
//! All areas reported by an areal are measured above its floodplain elevation, so
//! `area()`, `max_area()` and `area_for_height()` share one frame of reference.

use crate::errors::{DoDocError, DoDocResult};
use crate::lookup::LookupCurve;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// Registry key identifying one areal within a simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArealId(String);

impl ArealId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ArealId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ArealId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ArealId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Hydraulic state pushed by the host before each timestep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HydraulicState {
    /// Water level
    ///
    /// unit: m
    pub level: f64,
    /// Wetted surface area, when the host computes it directly
    ///
    /// unit: m²
    pub surface_area: Option<f64>,
}

impl HydraulicState {
    pub fn at_level(level: f64) -> Self {
        Self {
            level,
            surface_area: None,
        }
    }
}

/// Read-mostly view of the spatial unit a model is attached to.
///
/// Implementations are tagged with `type` when serialised so run configurations
/// can declare the areal alongside the model parameters.
#[typetag::serde(tag = "type")]
pub trait Areal: Debug + Send + Sync {
    /// Current wetted area above the floodplain elevation (m²)
    fn area(&self) -> f64;

    /// Current water level (m)
    fn elevation(&self) -> f64;

    /// Largest area the areal can report (m²)
    fn max_area(&self) -> f64;

    /// Highest elevation covered by the geometry (m)
    fn max_elevation(&self) -> f64;

    /// Lower elevation bound of the lowest floodplain zone (m)
    fn floodplain_elevation(&self) -> f64;

    /// Area that would be wetted at water level `height` (m²)
    fn area_for_height(&self, height: f64) -> f64;

    fn simulation_date(&self) -> Option<NaiveDate>;

    fn set_simulation_date(&mut self, date: NaiveDate);

    /// Accept the latest hydraulic state from the host
    fn observe(&mut self, state: &HydraulicState);

    /// Check the geometry before a run starts
    fn validate(&self) -> DoDocResult<()> {
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Areal>;
}

impl Clone for Box<dyn Areal> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

fn check_non_negative_areas(what: &str, geometry: &LookupCurve) -> DoDocResult<()> {
    match geometry.points().iter().find(|p| p[1] < 0.0) {
        Some(p) => Err(DoDocError::NegativeArea {
            what: format!("{} at level {}", what, p[0]),
            value: p[1],
        }),
        None => Ok(()),
    }
}

/// A storage whose surface area is a function of its level.
///
/// The surface area at the floodplain elevation (the *disregarded area*) is
/// permanently wet and is subtracted from everything the storage reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageAreal {
    /// Level to surface area relationship
    ///
    /// unit: m -> m²
    geometry: LookupCurve,
    /// Level below which the storage is not treated as floodplain
    ///
    /// unit: m
    floodplain_elevation: f64,
    #[serde(default)]
    level: f64,
    #[serde(default)]
    date: Option<NaiveDate>,
}

impl StorageAreal {
    pub fn new(geometry: LookupCurve, floodplain_elevation: f64) -> DoDocResult<Self> {
        let areal = Self {
            geometry,
            floodplain_elevation,
            level: floodplain_elevation,
            date: None,
        };
        areal.validate()?;
        Ok(areal)
    }

    /// Builder-style helper that sets the current level
    pub fn with_level(mut self, level: f64) -> Self {
        self.level = level;
        self
    }

    pub fn set_level(&mut self, level: f64) {
        self.level = level;
    }

    /// Surface area at the floodplain elevation (m²)
    pub fn disregarded_area(&self) -> f64 {
        self.geometry.evaluate(self.floodplain_elevation)
    }

    pub fn geometry(&self) -> &LookupCurve {
        &self.geometry
    }
}

#[typetag::serde]
impl Areal for StorageAreal {
    fn area(&self) -> f64 {
        self.area_for_height(self.level)
    }

    fn elevation(&self) -> f64 {
        self.level
    }

    fn max_area(&self) -> f64 {
        self.geometry.max_y() - self.disregarded_area()
    }

    fn max_elevation(&self) -> f64 {
        self.geometry.max_x()
    }

    fn floodplain_elevation(&self) -> f64 {
        self.floodplain_elevation
    }

    fn area_for_height(&self, height: f64) -> f64 {
        (self.geometry.evaluate(height) - self.disregarded_area()).max(0.0)
    }

    fn simulation_date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn set_simulation_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
    }

    fn observe(&mut self, state: &HydraulicState) {
        self.level = state.level;
    }

    fn validate(&self) -> DoDocResult<()> {
        check_non_negative_areas("storage surface area", &self.geometry)?;
        if self.max_area() < 0.0 {
            return Err(DoDocError::NegativeArea {
                what: "storage floodplain".to_string(),
                value: self.max_area(),
            });
        }
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Areal> {
        Box::new(self.clone())
    }
}

/// A channel division whose wetted area is reported by the host.
///
/// When the host does not supply a surface area the level to area curve is used
/// instead. The floodplain starts at the lowest level on the curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivisionAreal {
    /// Level to wetted area relationship
    ///
    /// unit: m -> m²
    geometry: LookupCurve,
    #[serde(default)]
    level: f64,
    #[serde(default)]
    surface_area: Option<f64>,
    #[serde(default)]
    date: Option<NaiveDate>,
}

impl DivisionAreal {
    pub fn new(geometry: LookupCurve) -> DoDocResult<Self> {
        let level = geometry.min_x();
        let areal = Self {
            geometry,
            level,
            surface_area: None,
            date: None,
        };
        areal.validate()?;
        Ok(areal)
    }

    pub fn geometry(&self) -> &LookupCurve {
        &self.geometry
    }
}

#[typetag::serde]
impl Areal for DivisionAreal {
    fn area(&self) -> f64 {
        self.surface_area
            .unwrap_or_else(|| self.geometry.evaluate(self.level))
            .max(0.0)
    }

    fn elevation(&self) -> f64 {
        self.level
    }

    fn max_area(&self) -> f64 {
        self.geometry.max_y()
    }

    fn max_elevation(&self) -> f64 {
        self.geometry.max_x()
    }

    fn floodplain_elevation(&self) -> f64 {
        self.geometry.min_x()
    }

    fn area_for_height(&self, height: f64) -> f64 {
        self.geometry.evaluate(height).max(0.0)
    }

    fn simulation_date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn set_simulation_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
    }

    fn observe(&mut self, state: &HydraulicState) {
        self.level = state.level;
        self.surface_area = state.surface_area;
    }

    fn validate(&self) -> DoDocResult<()> {
        check_non_negative_areas("division wetted area", &self.geometry)
    }

    fn clone_box(&self) -> Box<dyn Areal> {
        Box::new(self.clone())
    }
}
