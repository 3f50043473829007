//! Unit conversion factors and fixed model constants.
//!
//! The host simulator works in m², m³, kg and kg/m³. Litter is tracked as a
//! density in kg/ha and the DOC mass balance is carried in milligrams.

/// Square metres to hectares.
pub const M2_TO_HA: f64 = 1e-4;

/// Kilograms to milligrams.
pub const KG_TO_MG: f64 = 1e6;

/// Milligrams to kilograms.
pub const MG_TO_KG: f64 = 1e-6;

/// Grams per kilogram.
pub const G_PER_KG: f64 = 1e3;

/// mg/L (= g/m³) to kg/m³.
pub const MG_L_TO_KG_M3: f64 = 1e-3;

/// kg/m³ to mg/L.
pub const KG_M3_TO_MG_L: f64 = 1e3;

/// Mass of oxygen consumed per unit mass of carbon oxidised (32/12).
pub const O2_PER_DOC: f64 = 32.0 / 12.0;

/// Zones covering less than this area (m²) are dropped as numerically insignificant.
pub const SIGNIFICANT_AREA_M2: f64 = 1.0;

/// Tolerance used when comparing areas and volumes against zero.
pub const AREA_TOLERANCE: f64 = 1e-9;
