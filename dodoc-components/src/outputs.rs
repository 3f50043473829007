//! Model outputs and diagnostics
//!
//! The two loads are what the host applies to its mass balance. Everything else is
//! pass-through observability for reporting and is never fed back into the model.

use dodoc_core::units::M2_TO_HA;
use dodoc_core::zone_set::LitterTotals;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Output variables, keyed by name
pub type OutputState = HashMap<String, f64>;

pub const VAR_DOC_LOAD: &str = "Load|DOC";
pub const VAR_DO_LOAD: &str = "Load|DO";
pub const VAR_ZONE_COUNT: &str = "Zones|Total";
pub const VAR_INUNDATED_ZONES: &str = "Zones|Inundated";
pub const VAR_DRY_ZONES: &str = "Zones|Dry";
pub const VAR_LEAF_DRY_READILY: &str = "Leaf|Dry|Readily Degradable";
pub const VAR_LEAF_DRY_NON_READILY: &str = "Leaf|Dry|Non-Readily Degradable";
pub const VAR_LEAF_WET_READILY: &str = "Leaf|Wet|Readily Degradable";
pub const VAR_LEAF_WET_NON_READILY: &str = "Leaf|Wet|Non-Readily Degradable";
pub const VAR_WET_AREA: &str = "Floodplain Area|Wet";
pub const VAR_DRY_AREA: &str = "Floodplain Area|Dry";
pub const VAR_WATER_TEMPERATURE: &str = "Water Temperature";
pub const VAR_SIGMA: &str = "Sigma";
pub const VAR_SOIL_OXYGEN: &str = "Oxygen Demand|Soil";
pub const VAR_DOC_OXYGEN: &str = "Oxygen Demand|DOC";
pub const VAR_PRODUCTION: &str = "Oxygen|Primary Production";
pub const VAR_REAERATION: &str = "Oxygen|Reaeration";
pub const VAR_SATURATED_OXYGEN: &str = "Oxygen|Saturation";
pub const VAR_CONSUMED_DOC: &str = "DOC|Consumed";
pub const VAR_DOC_ENTERING_WATER: &str = "DOC|Entering Water";
pub const VAR_TOTAL_WET_LEAF: &str = "Leaf|Wet|Total";
pub const VAR_RELEASE_RATE_READILY: &str = "Release Rate|Readily Degradable";
pub const VAR_RELEASE_RATE_NON_READILY: &str = "Release Rate|Non-Readily Degradable";
pub const VAR_LEACHING_RATE_READILY: &str = "Leaching Rate|Readily Degradable";
pub const VAR_LEACHING_RATE_NON_READILY: &str = "Leaching Rate|Non-Readily Degradable";
pub const VAR_RELEASE_CAPACITY_READILY: &str = "Release Capacity|Readily Degradable";
pub const VAR_RELEASE_CAPACITY_NON_READILY: &str = "Release Capacity|Non-Readily Degradable";
pub const VAR_LEAF_ACCUMULATION: &str = "Leaf|Accumulation";
pub const VAR_FLOOD_COUNTER: &str = "Flood Counter";

/// Intermediate quantities from the last processed day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub zone_count: usize,
    pub inundated_zone_count: usize,
    pub dry_zone_count: usize,
    /// unit: kg
    pub leaf_dry_readily_degradable: f64,
    /// unit: kg
    pub leaf_dry_non_readily_degradable: f64,
    /// unit: kg
    pub leaf_wet_readily_degradable: f64,
    /// unit: kg
    pub leaf_wet_non_readily_degradable: f64,
    /// unit: ha
    pub wet_area: f64,
    /// unit: ha
    pub dry_area: f64,
    /// unit: °C
    pub water_temperature: f64,
    pub sigma: f64,
    /// unit: kg
    pub soil_oxygen: f64,
    /// unit: kg
    pub doc_oxygen: f64,
    /// unit: kg
    pub production: f64,
    /// unit: kg
    pub reaeration: f64,
    /// unit: mg/L
    pub saturated_oxygen: f64,
    /// unit: mg
    pub consumed_doc: f64,
    /// unit: mg
    pub doc_entering_water: f64,
    /// unit: kg
    pub total_wet_leaf: f64,
    /// unit: 1/day
    pub release_rate_readily_degradable: f64,
    /// unit: 1/day
    pub release_rate_non_readily_degradable: f64,
    pub leaching_rate_readily_degradable: f64,
    pub leaching_rate_non_readily_degradable: f64,
    /// unit: mg DOC / g litter
    pub release_capacity_readily_degradable: f64,
    /// unit: mg DOC / g litter
    pub release_capacity_non_readily_degradable: f64,
    /// unit: kg
    pub leaf_accumulation: f64,
    /// unit: days
    pub flood_counter: u32,
}

impl Diagnostics {
    /// Copy zone counts, litter masses and areas from the zone totals
    pub fn record_zones(&mut self, totals: &LitterTotals, wet: usize, dry: usize) {
        self.zone_count = wet + dry;
        self.inundated_zone_count = wet;
        self.dry_zone_count = dry;
        self.leaf_dry_readily_degradable = totals.dry_readily_degradable_kg;
        self.leaf_dry_non_readily_degradable = totals.dry_non_readily_degradable_kg;
        self.leaf_wet_readily_degradable = totals.wet_readily_degradable_kg;
        self.leaf_wet_non_readily_degradable = totals.wet_non_readily_degradable_kg;
        self.wet_area = totals.wet_area_m2 * M2_TO_HA;
        self.dry_area = totals.dry_area_m2 * M2_TO_HA;
    }
}

/// Loads and diagnostics produced by one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelOutputs {
    /// unit: kg
    pub doc_load: f64,
    /// unit: kg
    pub do_load: f64,
    pub diagnostics: Diagnostics,
}

impl ModelOutputs {
    /// Flatten the outputs into named variables
    pub fn to_output_state(&self) -> OutputState {
        let d = &self.diagnostics;
        let values = [
            (VAR_DOC_LOAD, self.doc_load),
            (VAR_DO_LOAD, self.do_load),
            (VAR_ZONE_COUNT, d.zone_count as f64),
            (VAR_INUNDATED_ZONES, d.inundated_zone_count as f64),
            (VAR_DRY_ZONES, d.dry_zone_count as f64),
            (VAR_LEAF_DRY_READILY, d.leaf_dry_readily_degradable),
            (VAR_LEAF_DRY_NON_READILY, d.leaf_dry_non_readily_degradable),
            (VAR_LEAF_WET_READILY, d.leaf_wet_readily_degradable),
            (VAR_LEAF_WET_NON_READILY, d.leaf_wet_non_readily_degradable),
            (VAR_WET_AREA, d.wet_area),
            (VAR_DRY_AREA, d.dry_area),
            (VAR_WATER_TEMPERATURE, d.water_temperature),
            (VAR_SIGMA, d.sigma),
            (VAR_SOIL_OXYGEN, d.soil_oxygen),
            (VAR_DOC_OXYGEN, d.doc_oxygen),
            (VAR_PRODUCTION, d.production),
            (VAR_REAERATION, d.reaeration),
            (VAR_SATURATED_OXYGEN, d.saturated_oxygen),
            (VAR_CONSUMED_DOC, d.consumed_doc),
            (VAR_DOC_ENTERING_WATER, d.doc_entering_water),
            (VAR_TOTAL_WET_LEAF, d.total_wet_leaf),
            (VAR_RELEASE_RATE_READILY, d.release_rate_readily_degradable),
            (
                VAR_RELEASE_RATE_NON_READILY,
                d.release_rate_non_readily_degradable,
            ),
            (VAR_LEACHING_RATE_READILY, d.leaching_rate_readily_degradable),
            (
                VAR_LEACHING_RATE_NON_READILY,
                d.leaching_rate_non_readily_degradable,
            ),
            (
                VAR_RELEASE_CAPACITY_READILY,
                d.release_capacity_readily_degradable,
            ),
            (
                VAR_RELEASE_CAPACITY_NON_READILY,
                d.release_capacity_non_readily_degradable,
            ),
            (VAR_LEAF_ACCUMULATION, d.leaf_accumulation),
            (VAR_FLOOD_COUNTER, d.flood_counter as f64),
        ];
        values
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}
