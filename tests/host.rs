//! Source/sink proxy plumbing between a host and the shared models.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use dodoc::dodoc_components::config::{ModelConfig, ModelVariant};
use dodoc::dodoc_components::parameters::DoDocParameters;
use dodoc::dodoc_components::registry::ModelContext;
use dodoc::dodoc_core::areal::{ArealId, DivisionAreal, HydraulicState, StorageAreal};
use dodoc::dodoc_core::lookup::LookupCurve;
use dodoc::host::{Constituent, InflowState, SourceSinkProxy};
use std::sync::Arc;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 1, day).unwrap()
}

fn storage_config() -> ModelConfig {
    let geometry = LookupCurve::new(vec![[0.0, 0.0], [10.0, 1000.0]]).unwrap();
    let mut parameters = DoDocParameters::default();
    parameters.doc.initial_readily_degradable = LookupCurve::constant(500.0);
    ModelConfig {
        id: ArealId::from("Lake Mokoan"),
        kind: ModelVariant::Floodplain,
        parameters,
        areal: Box::new(StorageAreal::new(geometry, 0.0).unwrap()),
        debug: false,
    }
}

fn inflow(load: f64, volume: f64, level: f64) -> InflowState {
    InflowState {
        unprocessed_load: load,
        total_volume: volume,
        hydraulics: HydraulicState::at_level(level),
    }
}

#[test]
fn test_doc_and_do_proxies_share_one_model() {
    let context = ModelContext::new();
    let mut doc = SourceSinkProxy::new(Constituent::DissolvedOrganicCarbon, storage_config());
    let mut oxygen = SourceSinkProxy::new(Constituent::DissolvedOxygen, storage_config());

    doc.inputs_updated(&context, inflow(4.0, 800.0, 4.0)).unwrap();
    oxygen.inputs_updated(&context, inflow(4.8, 800.0, 4.0)).unwrap();

    assert_eq!(context.len(), 1);
    assert!(Arc::ptr_eq(doc.worker().unwrap(), oxygen.worker().unwrap()));
    {
        let model = doc.worker().unwrap().lock();
        assert_relative_eq!(model.inputs().concentration_doc, 0.005, max_relative = 1e-12);
        assert_relative_eq!(model.inputs().concentration_do, 0.006, max_relative = 1e-12);
        assert_eq!(model.inputs().working_volume, 800.0);
        assert_eq!(model.areal().area(), 400.0);
    }

    let doc_load = doc.run_time_step(date(1)).unwrap();
    let do_load = oxygen.run_time_step(date(1)).unwrap();

    let model = doc.worker().unwrap().lock();
    assert_eq!(doc_load, model.doc_load());
    assert_eq!(do_load, model.do_load());
    // One run for both constituents
    assert_eq!(model.flood_counter(), 1);
    assert!(doc_load > 0.0);
}

#[test]
fn test_routing_proxy_returns_decayed_load() {
    let geometry = LookupCurve::new(vec![[0.0, 0.0], [4.0, 400.0]]).unwrap();
    let mut parameters = DoDocParameters::default();
    parameters.doc.doc_consumption_coefficient = 0.05;
    let config = ModelConfig {
        id: ArealId::from("Link 12"),
        kind: ModelVariant::Routing,
        parameters,
        areal: Box::new(DivisionAreal::new(geometry).unwrap()),
        debug: false,
    };

    let context = ModelContext::new();
    let mut proxy = SourceSinkProxy::new(Constituent::DissolvedOrganicCarbon, config);
    proxy.inputs_updated(&context, inflow(10.0, 1000.0, 1.0)).unwrap();

    let load = proxy.run_time_step(date(3)).unwrap();
    assert_relative_eq!(load, 9.5, max_relative = 1e-12);
}

#[test]
fn test_empty_volume_gives_zero_concentration() {
    let context = ModelContext::new();
    let mut proxy = SourceSinkProxy::new(Constituent::DissolvedOrganicCarbon, storage_config());
    proxy.inputs_updated(&context, inflow(2.0, 0.0, 0.0)).unwrap();

    let model = proxy.worker().unwrap().lock();
    assert_eq!(model.inputs().concentration_doc, 0.0);
}

#[test]
fn test_run_without_inputs_is_an_error() {
    let proxy = SourceSinkProxy::new(Constituent::DissolvedOxygen, storage_config());
    assert!(proxy.run_time_step(date(1)).is_err());
}

#[test]
fn test_reset_rebinds_a_fresh_model() {
    let context = ModelContext::new();
    let mut proxy = SourceSinkProxy::new(Constituent::DissolvedOrganicCarbon, storage_config());
    for day in 1..=3 {
        proxy.inputs_updated(&context, inflow(4.0, 800.0, 4.0)).unwrap();
        proxy.run_time_step(date(day)).unwrap();
    }
    let first = Arc::clone(proxy.worker().unwrap());
    assert_eq!(first.lock().flood_counter(), 3);

    proxy.reset(&context);
    assert!(proxy.worker().is_none());
    assert!(context.is_empty());

    proxy.inputs_updated(&context, inflow(4.0, 800.0, 4.0)).unwrap();
    proxy.run_time_step(date(1)).unwrap();
    let second = proxy.worker().unwrap();
    assert!(!Arc::ptr_eq(&first, second));
    assert_eq!(second.lock().flood_counter(), 1);
}
