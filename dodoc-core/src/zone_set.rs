//! Zone-set manager
//!
//! Keeps an elevation-ordered partition of the floodplain into wet and dry zones
//! consistent with the wetted-area trajectory reported by the areal, moving leaf
//! litter between zones as the water line rises and falls.
//!
//! # Ordering
//!
//! After every update the zone list holds all dry zones first, ordered by
//! decreasing cumulative area, followed by all wet zones ordered by increasing
//! cumulative area. Walking the wet zones forwards and then the dry zones
//! backwards therefore visits the floodplain from the lowest band upwards.
//!
//! # Litter transfer
//!
//! Litter is held as a density (kg/ha). When part of a zone changes wetness the
//! mass over the affected area moves with it: each donor contributes
//! `density × transferred area` and the receiving zone takes the accumulated mass
//! divided by its own area. Restructuring alone never creates or destroys litter.

use crate::areal::Areal;
use crate::integrate::integrate_band;
use crate::lookup::LookupCurve;
use crate::units::{AREA_TOLERANCE, SIGNIFICANT_AREA_M2};
use crate::zone::Zone;
use log::debug;
use serde::{Deserialize, Serialize};

/// Classification of the change in wetted area between two steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaChange {
    /// Water rising: dry zones are submerged
    Increase,
    /// Water receding: wet zones are exposed
    Contract,
    /// Wetted area unchanged and non-zero
    Stable,
    /// Wetted area unchanged at zero
    EndOfFlood,
}

impl AreaChange {
    pub fn classify(delta_area: f64, area: f64) -> Self {
        if delta_area > 0.0 {
            AreaChange::Increase
        } else if delta_area < 0.0 {
            AreaChange::Contract
        } else if area > AREA_TOLERANCE {
            AreaChange::Stable
        } else {
            AreaChange::EndOfFlood
        }
    }

    /// Whether the flood duration counter keeps running after this change
    pub fn continues_flood(&self) -> bool {
        !matches!(self, AreaChange::EndOfFlood)
    }
}

/// Curves describing the litter present when the model starts.
#[derive(Debug, Clone, Copy)]
pub struct InitialLitter<'a> {
    /// unit: kg/ha against elevation
    pub readily_degradable: &'a LookupCurve,
    /// unit: kg/ha against elevation
    pub non_readily_degradable: &'a LookupCurve,
}

/// Litter and area totals split by wetness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LitterTotals {
    pub dry_readily_degradable_kg: f64,
    pub dry_non_readily_degradable_kg: f64,
    pub wet_readily_degradable_kg: f64,
    pub wet_non_readily_degradable_kg: f64,
    pub dry_area_m2: f64,
    pub wet_area_m2: f64,
}

/// Running litter transfer, in kg/ha × m².
#[derive(Debug, Default)]
struct Transfer {
    readily: f64,
    non_readily: f64,
}

impl Transfer {
    fn take(&mut self, zone: &Zone, area: f64) {
        self.readily += zone.leaf_readily_degradable * area;
        self.non_readily += zone.leaf_non_readily_degradable * area;
    }

    /// Densities for a receiving zone of `area` m²
    fn densities(&self, area: f64) -> (f64, f64) {
        if area < AREA_TOLERANCE {
            return (0.0, 0.0);
        }
        (self.readily / area, self.non_readily / area)
    }
}

/// Ordered collection of floodplain zones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneSet {
    zones: Vec<Zone>,
}

impl ZoneSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a zone set from existing zones, restoring the ordering and zone areas
    pub fn from_zones(zones: Vec<Zone>) -> Self {
        let mut set = Self { zones };
        set.group_dry_zones();
        set.refresh_zone_areas();
        set
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Mutable access to the zones; the structure of the list cannot change
    pub fn zones_mut(&mut self) -> &mut [Zone] {
        &mut self.zones
    }

    pub fn clear(&mut self) {
        self.zones.clear();
    }

    pub fn count_wet(&self) -> usize {
        self.zones.iter().filter(|z| z.is_wet()).count()
    }

    pub fn count_dry(&self) -> usize {
        self.zones.iter().filter(|z| z.is_dry()).count()
    }

    /// Cumulative area of the highest wet zone, zero when nothing is wet
    pub fn wet_top(&self) -> f64 {
        self.zones
            .iter()
            .filter(|z| z.is_wet())
            .map(|z| z.cumulative_area_m2)
            .fold(0.0, f64::max)
    }

    /// Zone indices from the lowest band to the highest.
    ///
    /// Bands are ordered by cumulative area; at equal area a wet zone sits below a
    /// dry one.
    pub fn elevation_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.zones.len()).collect();
        order.sort_by(|&a, &b| {
            let (za, zb) = (&self.zones[a], &self.zones[b]);
            za.cumulative_area_m2
                .total_cmp(&zb.cumulative_area_m2)
                .then(zb.is_wet().cmp(&za.is_wet()))
        });
        order
    }

    /// Lower and upper elevation of the band covered by zone `index`.
    ///
    /// The lower bound is the upper elevation of the zone immediately below, or
    /// `floor` for the lowest zone. Returns `None` for an out of range index.
    pub fn band_bounds(&self, index: usize, floor: f64) -> Option<(f64, f64)> {
        let zone = self.zones.get(index)?;
        let order = self.elevation_order();
        let position = order.iter().position(|&i| i == index)?;
        let lower = match position {
            0 => floor,
            p => self.zones[order[p - 1]].elevation_m,
        };
        Some((lower, zone.elevation_m))
    }

    /// Whether the list satisfies the dry-then-wet ordering
    pub fn is_ordered(&self) -> bool {
        let first_wet = self
            .zones
            .iter()
            .position(|z| z.is_wet())
            .unwrap_or(self.zones.len());
        let (dry, wet) = self.zones.split_at(first_wet);
        wet.iter().all(|z| z.is_wet())
            && dry
                .windows(2)
                .all(|p| p[0].cumulative_area_m2 >= p[1].cumulative_area_m2)
            && wet
                .windows(2)
                .all(|p| p[0].cumulative_area_m2 <= p[1].cumulative_area_m2)
    }

    /// Total litter across all zones (kg)
    pub fn total_litter_mass_kg(&self) -> f64 {
        self.zones.iter().map(|z| z.litter_mass_kg()).sum()
    }

    pub fn litter_totals(&self) -> LitterTotals {
        self.zones
            .iter()
            .fold(LitterTotals::default(), |mut totals, zone| {
                totals.dry_readily_degradable_kg += zone.dry_mass_kg(zone.leaf_readily_degradable);
                totals.dry_non_readily_degradable_kg +=
                    zone.dry_mass_kg(zone.leaf_non_readily_degradable);
                totals.wet_readily_degradable_kg += zone.wet_mass_kg(zone.leaf_readily_degradable);
                totals.wet_non_readily_degradable_kg +=
                    zone.wet_mass_kg(zone.leaf_non_readily_degradable);
                if zone.is_wet() {
                    totals.wet_area_m2 += zone.zone_area_m2;
                } else {
                    totals.dry_area_m2 += zone.zone_area_m2;
                }
                totals
            })
    }

    // ===== Seeding =====

    /// Seed a single dry zone covering the whole floodplain.
    pub fn seed_single(&mut self, areal: &dyn Areal, litter: InitialLitter, cumulative_area: f64) {
        let lower = areal.floodplain_elevation();
        let upper = areal.max_elevation();
        let zone = Zone::dry(
            cumulative_area,
            cumulative_area,
            upper,
            band_density(litter.readily_degradable, areal, lower, upper),
            band_density(litter.non_readily_degradable, areal, lower, upper),
        );
        self.zones = vec![zone];
        self.refresh_zone_areas();
        debug!(
            "Seeded single dry zone of {} m2 (readily {} kg/ha, non-readily {} kg/ha)",
            cumulative_area,
            self.zones[0].leaf_readily_degradable,
            self.zones[0].leaf_non_readily_degradable
        );
    }

    /// Seed one dry zone per elevation band.
    ///
    /// Band limits are the floodplain and maximum elevations plus every breakpoint
    /// of the initial litter curves and of `accumulation` lying between them.
    /// Cumulative areas are capped at `scaling_factor × max_area`; bands starting
    /// above the cap are dropped.
    pub fn seed_stratified(
        &mut self,
        areal: &dyn Areal,
        litter: InitialLitter,
        accumulation: &LookupCurve,
        scaling_factor: f64,
        max_area: f64,
    ) {
        let floor = areal.floodplain_elevation();
        let top = areal.max_elevation();

        let mut limits = vec![floor, top];
        for curve in [
            litter.readily_degradable,
            litter.non_readily_degradable,
            accumulation,
        ] {
            limits.extend(curve.breakpoints_between(floor, top));
        }
        limits.sort_by(f64::total_cmp);
        limits.dedup();

        let cap = scaling_factor * max_area;
        // Highest band first keeps the dry zones in decreasing area order
        self.zones = limits
            .windows(2)
            .rev()
            .filter(|band| scaling_factor * areal.area_for_height(band[0]) < cap)
            .map(|band| {
                let (lower, upper) = (band[0], band[1]);
                Zone::dry(
                    (scaling_factor * areal.area_for_height(upper)).min(cap),
                    0.0,
                    upper,
                    band_density(litter.readily_degradable, areal, lower, upper),
                    band_density(litter.non_readily_degradable, areal, lower, upper),
                )
            })
            .collect();

        self.refresh_zone_areas();
        self.remove_insignificant_zones();
        debug!("Seeded {} stratified dry zones", self.zones.len());
    }

    // ===== Update =====

    /// Restructure the zones for today's wetted `area`.
    ///
    /// `delta_area` is the change since the previous step; callers force it to
    /// zero when the working volume is negative. `elevation` is the current water
    /// level and becomes the upper boundary of any zone ending at the water line.
    pub fn update(&mut self, area: f64, elevation: f64, delta_area: f64) -> AreaChange {
        let change = AreaChange::classify(delta_area, area);
        match change {
            AreaChange::Increase => self.increase(area, elevation),
            AreaChange::Contract => self.expose_above(area.max(0.0), elevation),
            AreaChange::Stable => {}
            AreaChange::EndOfFlood => self.expose_above(area.max(0.0), elevation),
        }

        self.remove_insignificant_zones();
        self.group_dry_zones();
        self.refresh_zone_areas();

        debug!(
            "{:?}: delta {} m2, area {} m2, {} zones ({} wet)",
            change,
            delta_area,
            area,
            self.zones.len(),
            self.count_wet()
        );
        change
    }

    /// Submerge the dry floodplain between the current wet top and `new_area`.
    fn increase(&mut self, new_area: f64, elevation: f64) {
        let base = self.wet_top();
        if new_area <= base {
            return;
        }

        let mut transfer = Transfer::default();
        let mut covered = Vec::new();
        for (index, zone) in self.zones.iter_mut().enumerate() {
            if zone.is_wet() {
                continue;
            }
            let lower = zone.cumulative_area_m2 - zone.zone_area_m2;
            let submerged =
                (zone.cumulative_area_m2.min(new_area) - lower.max(base)).max(0.0);
            transfer.take(zone, submerged);
            if zone.cumulative_area_m2 <= new_area {
                covered.push(index);
            } else if submerged > 0.0 {
                zone.zone_area_m2 = zone.cumulative_area_m2 - new_area;
            }
        }
        self.remove_indices(&covered);

        let zone_area = new_area - base;
        let (readily, non_readily) = transfer.densities(zone_area);
        self.zones
            .push(Zone::wet(new_area, zone_area, elevation, readily, non_readily));
    }

    /// Expose the wet floodplain above `new_area`, collecting it into one dry zone.
    fn expose_above(&mut self, new_area: f64, elevation: f64) {
        let top = self.wet_top();
        if new_area >= top {
            return;
        }
        let top_elevation = self
            .zones
            .iter()
            .filter(|z| z.is_wet())
            .max_by(|a, b| a.cumulative_area_m2.total_cmp(&b.cumulative_area_m2))
            .map(|z| z.elevation_m)
            .unwrap_or(elevation);

        let mut transfer = Transfer::default();
        let mut exposed_zones = Vec::new();
        for (index, zone) in self.zones.iter_mut().enumerate() {
            if zone.is_dry() {
                continue;
            }
            let lower = zone.cumulative_area_m2 - zone.zone_area_m2;
            let exposed = (zone.cumulative_area_m2 - new_area.max(lower)).max(0.0);
            transfer.take(zone, exposed);
            if lower >= new_area {
                exposed_zones.push(index);
            } else if exposed > 0.0 {
                zone.cumulative_area_m2 = new_area;
                zone.zone_area_m2 = new_area - lower;
                zone.elevation_m = elevation;
            }
        }
        self.remove_indices(&exposed_zones);

        let zone_area = top - new_area;
        let (readily, non_readily) = transfer.densities(zone_area);
        self.zones
            .push(Zone::dry(top, zone_area, top_elevation, readily, non_readily));
    }

    // ===== Housekeeping =====

    fn remove_indices(&mut self, indices: &[usize]) {
        if indices.is_empty() {
            return;
        }
        let mut index = 0;
        self.zones.retain(|_| {
            let keep = !indices.contains(&index);
            index += 1;
            keep
        });
    }

    /// Fold zones smaller than the significance threshold into a neighbour.
    ///
    /// The neighbour in elevation order with the same wetness is preferred, the
    /// zone above before the zone below. The last remaining zone is kept.
    fn remove_insignificant_zones(&mut self) {
        while self.zones.len() > 1 {
            let order = self.elevation_order();
            let Some(position) = order
                .iter()
                .position(|&i| self.zones[i].zone_area_m2 < SIGNIFICANT_AREA_M2)
            else {
                break;
            };

            let pruned_index = order[position];
            let above = order.get(position + 1).copied();
            let below = position.checked_sub(1).map(|p| order[p]);
            let wet = self.zones[pruned_index].is_wet();
            let same_wetness = |i: &usize| self.zones[*i].is_wet() == wet;
            let target = above
                .filter(same_wetness)
                .or(below.filter(same_wetness))
                .or(above)
                .or(below);

            let pruned = self.zones.remove(pruned_index);
            if let Some(target) = target {
                // Indices after the removed zone shift down by one
                let target = if target > pruned_index {
                    target - 1
                } else {
                    target
                };
                let receiver = &mut self.zones[target];
                let combined = receiver.zone_area_m2 + pruned.zone_area_m2;
                if combined > AREA_TOLERANCE {
                    receiver.leaf_readily_degradable = (receiver.leaf_readily_degradable
                        * receiver.zone_area_m2
                        + pruned.leaf_readily_degradable * pruned.zone_area_m2)
                        / combined;
                    receiver.leaf_non_readily_degradable = (receiver.leaf_non_readily_degradable
                        * receiver.zone_area_m2
                        + pruned.leaf_non_readily_degradable * pruned.zone_area_m2)
                        / combined;
                }
                if receiver.cumulative_area_m2 < pruned.cumulative_area_m2 {
                    receiver.cumulative_area_m2 = pruned.cumulative_area_m2;
                    receiver.elevation_m = pruned.elevation_m;
                }
                receiver.zone_area_m2 = combined;
            }
            self.refresh_zone_areas();
        }
    }

    /// Stable partition moving dry zones ahead of wet ones.
    fn group_dry_zones(&mut self) {
        self.zones.sort_by_key(|z| z.is_wet());
    }

    /// Recompute every zone area from the cumulative areas in elevation order.
    fn refresh_zone_areas(&mut self) {
        let mut below = 0.0;
        for index in self.elevation_order() {
            let zone = &mut self.zones[index];
            zone.zone_area_m2 = (zone.cumulative_area_m2 - below).max(0.0);
            below = zone.cumulative_area_m2;
        }
    }
}

/// Area-weighted litter density over a band, falling back to the curve value at the
/// top of the band when the band covers no area.
fn band_density(curve: &LookupCurve, areal: &dyn Areal, lower: f64, upper: f64) -> f64 {
    let band = integrate_band(curve, areal, lower, upper);
    if band.area > AREA_TOLERANCE {
        band.average()
    } else {
        curve.evaluate(upper)
    }
}
