//! End-to-end scenarios for floodplain and routing models.

use approx::assert_relative_eq;
use chrono::{Days, NaiveDate};
use dodoc_components::model::DoDocModel;
use dodoc_components::outputs::{VAR_DOC_LOAD, VAR_DO_LOAD, VAR_FLOOD_COUNTER};
use dodoc_components::parameters::{DoDocParameters, ZeroVolumePolicy};
use dodoc_core::areal::{DivisionAreal, HydraulicState, StorageAreal};
use dodoc_core::lookup::LookupCurve;
use is_close::is_close;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 9, 1).unwrap()
}

fn floodplain(params: DoDocParameters) -> DoDocModel {
    // 100 m² per metre between 0 and 10 m
    let geometry = LookupCurve::new(vec![[0.0, 0.0], [10.0, 1000.0]]).unwrap();
    let areal = StorageAreal::new(geometry, 0.0).unwrap();
    DoDocModel::floodplain("Wetland 2", Box::new(areal), params)
}

fn routing(params: DoDocParameters) -> DoDocModel {
    let geometry = LookupCurve::new(vec![[0.0, 0.0], [5.0, 500.0]]).unwrap();
    let areal = DivisionAreal::new(geometry).unwrap();
    DoDocModel::routing("Reach 11", Box::new(areal), params)
}

fn littered() -> DoDocParameters {
    let mut params = DoDocParameters::default();
    params.doc.initial_readily_degradable = LookupCurve::constant(800.0);
    params.doc.initial_non_readily_degradable = LookupCurve::constant(1200.0);
    params.doc.leaf_accumulation = LookupCurve::new(vec![[0.0, 2.0], [10.0, 6.0]]).unwrap();
    params
}

/// Set one day's hydraulics and run
fn day(model: &mut DoDocModel, offset: u64, level: f64, volume: f64) {
    model.observe(&HydraulicState::at_level(level));
    model.set_working_volume(volume);
    let date = start() + Days::new(offset);
    model.run(date).unwrap();
}

// ===== Floodplain Scenarios =====

#[test]
fn test_rising_flood_splits_floodplain() {
    let mut model = floodplain(littered());
    day(&mut model, 0, 4.0, 800.0);

    let zones = model.zones().unwrap();
    assert_eq!(zones.len(), 2);
    assert_eq!(zones.count_wet(), 1);
    assert_eq!(zones.count_dry(), 1);

    let dry = &zones.zones()[0];
    let wet = &zones.zones()[1];
    assert_eq!(dry.cumulative_area_m2, 1000.0);
    assert!(is_close!(dry.zone_area_m2, 600.0));
    assert_eq!(wet.cumulative_area_m2, 400.0);
    assert!(is_close!(wet.zone_area_m2, 400.0));
    assert_eq!(wet.elevation_m, 4.0);

    assert_eq!(model.flood_counter(), 1);
    assert!(model.diagnostics().doc_entering_water > 0.0);
    assert!(model.doc_load() > 0.0);
}

#[test]
fn test_flood_counter_tracks_duration() {
    let mut model = floodplain(littered());
    for offset in 0..5 {
        day(&mut model, offset, 4.0 + offset as f64 * 0.5, 800.0);
    }
    assert_eq!(model.flood_counter(), 5);

    // Steady water keeps counting
    day(&mut model, 5, 6.0, 1200.0);
    assert_eq!(model.flood_counter(), 6);
}

#[test]
fn test_full_recession_dries_floodplain() {
    let mut model = floodplain(littered());
    day(&mut model, 0, 4.0, 800.0);
    day(&mut model, 1, 7.0, 1400.0);
    day(&mut model, 2, 2.0, 400.0);
    assert!(model.flood_counter() > 0);

    day(&mut model, 3, 0.0, 0.0);
    let zones = model.zones().unwrap();
    assert_eq!(zones.count_wet(), 0);
    assert!(zones.len() <= 3, "Zones: {:?}", zones);
    assert!(zones.is_ordered());
    assert_eq!(model.flood_counter(), 0);
    assert_eq!(model.diagnostics().inundated_zone_count, 0);
    assert_eq!(model.doc_load(), 0.0);
}

#[test]
fn test_long_run_stays_physical() {
    let mut model = floodplain(littered());
    let levels = [0.0, 2.0, 5.0, 8.0, 9.5, 9.5, 7.0, 4.0, 1.0, 0.0, 0.0, 3.0, 6.0, 2.0];
    for (offset, level) in levels.iter().cycle().take(120).enumerate() {
        day(&mut model, offset as u64, *level, level * 200.0);
        model.set_concentration_doc(0.003);
        model.set_concentration_do(0.006);

        let zones = model.zones().unwrap();
        assert!(zones.is_ordered(), "Day {}: {:?}", offset, zones);
        for zone in zones.zones() {
            assert!(zone.leaf_readily_degradable >= 0.0);
            assert!(zone.leaf_non_readily_degradable >= 0.0);
        }
        assert!(model.doc_load() >= 0.0);
        assert!(model.do_load() >= 0.0);
        assert!(model.do_load().is_finite());
    }
}

#[test]
fn test_soil_demand_lowers_oxygen_during_flood() {
    let mut model = floodplain(DoDocParameters::default());
    model.set_concentration_do(0.005);
    day(&mut model, 0, 4.0, 800.0);
    let first_demand = model.diagnostics().soil_oxygen;
    day(&mut model, 1, 4.0, 800.0);

    assert!(first_demand > 0.0);
    assert!(model.diagnostics().soil_oxygen > first_demand);
}

// ===== Routing Scenarios =====

#[test]
fn test_routing_first_order_decay() {
    let mut params = DoDocParameters::default();
    params.doc.doc_consumption_coefficient = 0.05;
    let mut model = routing(params);
    model.set_concentration_doc(0.01);
    day(&mut model, 0, 2.0, 1000.0);

    assert!(model.zones().is_none());
    assert_relative_eq!(model.doc_load(), 9.5, max_relative = 1e-12);
    assert_relative_eq!(model.diagnostics().consumed_doc, 500000.0, max_relative = 1e-12);
    assert_eq!(model.diagnostics().soil_oxygen, 0.0);
}

#[test]
fn test_production_tier_at_break() {
    let mut model = routing(DoDocParameters::default());
    // 5 mg/L
    model.set_concentration_doc(0.005);
    day(&mut model, 0, 2.0, 1000.0);

    assert_relative_eq!(
        model.diagnostics().production,
        0.43e-3 * 1000.0 * 0.75,
        max_relative = 1e-12
    );
}

// ===== Shared Behaviour =====

#[test]
fn test_same_day_run_is_ignored() {
    let mut model = floodplain(littered());
    day(&mut model, 0, 4.0, 800.0);
    let outputs = model.outputs().to_output_state();

    model.observe(&HydraulicState::at_level(9.0));
    model.set_working_volume(1800.0);
    assert!(!model.run(start()).unwrap());

    let repeated = model.outputs().to_output_state();
    assert_eq!(repeated[VAR_DOC_LOAD], outputs[VAR_DOC_LOAD]);
    assert_eq!(repeated[VAR_DO_LOAD], outputs[VAR_DO_LOAD]);
    assert_eq!(repeated[VAR_FLOOD_COUNTER], 1.0);
}

#[test]
fn test_zero_volume_policies() {
    let mut model = floodplain(littered());
    model.set_concentration_do(0.007);
    day(&mut model, 0, 0.0, 0.0);
    assert_eq!(model.do_load(), 0.0);

    let mut params = littered();
    params.oxygen.zero_volume_policy = ZeroVolumePolicy::NotANumber;
    let mut model = routing(params);
    model.set_concentration_do(0.007);
    day(&mut model, 0, 0.0, 0.0);
    assert!(model.do_load().is_nan());
    assert_eq!(model.doc_load(), 0.0);
}
