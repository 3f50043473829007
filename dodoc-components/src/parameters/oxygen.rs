//! Dissolved oxygen parameters

use dodoc_core::errors::{DoDocError, DoDocResult};
use dodoc_core::temperature::DoSaturation;
use serde::{Deserialize, Serialize};

/// DO load reported when the working volume is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroVolumePolicy {
    /// Report no oxygen
    #[default]
    Zero,
    /// Report NaN to flag the undefined state
    NotANumber,
}

impl ZeroVolumePolicy {
    pub fn load(&self) -> f64 {
        match self {
            ZeroVolumePolicy::Zero => 0.0,
            ZeroVolumePolicy::NotANumber => f64::NAN,
        }
    }
}

/// Reaeration across a regulating structure such as a weir.
///
/// The deficit ratio across the structure is
///
/// $$r = 1 + 0.38\,a\,b\,h\,(1 - 0.11h)(1 + 0.046T)$$
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureReaeration {
    /// Water quality factor (a)
    ///
    /// unit: dimensionless
    /// Default: 0.65
    pub water_quality_factor: f64,

    /// Structure coefficient (b)
    ///
    /// unit: dimensionless
    /// Default: 0.6
    pub structure_coefficient: f64,

    /// Static head loss across the structure (h)
    ///
    /// unit: m
    /// Default: 0.0
    pub static_head_loss: f64,
}

impl Default for StructureReaeration {
    fn default() -> Self {
        Self {
            water_quality_factor: 0.65,
            structure_coefficient: 0.6,
            static_head_loss: 0.0,
        }
    }
}

impl StructureReaeration {
    /// Ratio of the upstream to downstream oxygen deficit at `temperature` (°C)
    pub fn deficit_ratio(&self, temperature: f64) -> f64 {
        let h = self.static_head_loss;
        1.0 + 0.38
            * self.water_quality_factor
            * self.structure_coefficient
            * h
            * (1.0 - 0.11 * h)
            * (1.0 + 0.046 * temperature)
    }
}

/// Parameters for the DO mass balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OxygenParameters {
    /// Atmospheric reaeration coefficient
    ///
    /// unit: 1/day
    /// Default: 0.08
    pub reaeration_coefficient: f64,

    /// Temperature multiplier for reaeration, raised to (T − 20).
    ///
    /// `None` disables the temperature adjustment.
    ///
    /// Default: 1.024
    pub reaeration_theta: Option<f64>,

    /// Saturation concentration formula
    ///
    /// Default: Cox (2003)
    pub saturation: DoSaturation,

    /// Primary production rate
    ///
    /// unit: mg/L/day
    /// Default: 0.43
    pub primary_production_rate: f64,

    /// DOC concentration breakpoints of the production tiers (inclusive upper bounds)
    ///
    /// unit: mg/L
    /// Default: [3, 5, 8, 20]
    pub production_breaks: Vec<f64>,

    /// Production multiplier per tier, one more than there are breaks
    ///
    /// unit: dimensionless
    /// Default: [1.0, 0.75, 0.5, 0.25, 0.1]
    pub production_coefficients: Vec<f64>,

    /// Asymptotic soil oxygen demand
    ///
    /// unit: mg/m²
    /// Default: 148162.0
    pub soil_oxygen_base: f64,

    /// Rate at which soil oxygen demand approaches its asymptote
    ///
    /// unit: 1/day
    /// Default: 0.093
    pub soil_oxygen_rate: f64,

    /// Multiplier on the soil oxygen demand
    ///
    /// unit: dimensionless
    /// Default: 1.0
    pub soil_oxygen_scaling_factor: f64,

    /// Optional structural reaeration
    ///
    /// Default: none
    pub structure: Option<StructureReaeration>,

    /// DO load reported for an empty water column
    ///
    /// Default: zero
    pub zero_volume_policy: ZeroVolumePolicy,
}

impl Default for OxygenParameters {
    fn default() -> Self {
        Self {
            reaeration_coefficient: 0.08,
            reaeration_theta: Some(1.024),
            saturation: DoSaturation::Cox2003,
            primary_production_rate: 0.43,
            production_breaks: vec![3.0, 5.0, 8.0, 20.0],
            production_coefficients: vec![1.0, 0.75, 0.5, 0.25, 0.1],
            soil_oxygen_base: 148162.0,
            soil_oxygen_rate: 0.093,
            soil_oxygen_scaling_factor: 1.0,
            structure: None,
            zero_volume_policy: ZeroVolumePolicy::Zero,
        }
    }
}

impl OxygenParameters {
    /// Production multiplier for a DOC concentration (mg/L).
    ///
    /// The first tier whose break is at or above the concentration applies;
    /// concentrations above every break use the last multiplier.
    pub fn production_multiplier(&self, doc_mg_l: f64) -> f64 {
        let tier = self
            .production_breaks
            .iter()
            .position(|&b| doc_mg_l <= b)
            .unwrap_or(self.production_breaks.len());
        self.production_coefficients
            .get(tier)
            .copied()
            .unwrap_or(0.0)
    }

    /// Reaeration temperature adjustment at `temperature` (°C)
    pub fn reaeration_adjustment(&self, temperature: f64) -> f64 {
        self.reaeration_theta
            .map_or(1.0, |theta| theta.powf(temperature - 20.0))
    }

    pub fn validate(&self) -> DoDocResult<()> {
        if self.production_coefficients.len() != self.production_breaks.len() + 1 {
            return Err(DoDocError::Configuration(format!(
                "expected {} production coefficients for {} breaks, got {}",
                self.production_breaks.len() + 1,
                self.production_breaks.len(),
                self.production_coefficients.len()
            )));
        }
        if let Some(index) = self
            .production_breaks
            .windows(2)
            .position(|pair| pair[1] <= pair[0])
        {
            return Err(DoDocError::Configuration(format!(
                "production_breaks must be strictly increasing (at break {})",
                index + 1
            )));
        }
        if self.reaeration_coefficient < 0.0 || self.soil_oxygen_base < 0.0 {
            return Err(DoDocError::Configuration(
                "reaeration_coefficient and soil_oxygen_base must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
