//! DOC/DO process model
//!
//! One [`DoDocModel`] is attached to each areal. The host sets the day's inputs,
//! calls [`DoDocModel::run`] once per simulated day and reads the loads back.
//!
//! # What This Component Does
//!
//! 1. Tracks wet and dry floodplain zones as the wetted area changes
//!    (floodplain models only)
//! 2. Decays litter on dry ground and leaches DOC from submerged litter
//! 3. Consumes DOC in the water column and reports the remaining DOC load
//! 4. Closes a dissolved oxygen balance of reaeration, primary production,
//!    soil oxygen demand and DOC-driven consumption
//!
//! # Inputs
//!
//! - working volume (m³)
//! - DOC and DO concentrations of the inflow (kg/m³)
//! - observed water temperature (°C), optional
//! - wetted area and level, read from the areal
//!
//! # Outputs
//!
//! - `Load|DOC` (kg)
//! - `Load|DO` (kg)
//! - diagnostics, see [`crate::outputs::Diagnostics`]
//!
//! # Variants
//!
//! Floodplain models run the zone tracker and the full litter engine. Routing
//! models have no zones: DOC decays at a constant fractional rate and there is no
//! soil oxygen demand. Both share the same oxygen balance, which takes the
//! variant's soil oxygen demand as a function value.

mod floodplain;
mod oxygen;
mod routing;

pub use floodplain::FloodplainState;
pub use oxygen::{SoilDemandInputs, SoilOxygenDemand};

use crate::assurance::MaxAreaExceedance;
use crate::outputs::{Diagnostics, ModelOutputs};
use crate::parameters::DoDocParameters;
use chrono::NaiveDate;
use dodoc_core::areal::{Areal, ArealId, HydraulicState};
use dodoc_core::errors::DoDocResult;
use dodoc_core::temperature::estimate_water_temperature;
use dodoc_core::zone_set::ZoneSet;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Inputs set by the host before each run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInputs {
    /// unit: m³
    pub working_volume: f64,
    /// unit: kg/m³
    pub concentration_doc: f64,
    /// unit: kg/m³
    pub concentration_do: f64,
    /// Observed water temperature; estimated from the date when absent
    ///
    /// unit: °C
    pub water_temperature: Option<f64>,
}

/// Zoned or unzoned process strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelKind {
    Floodplain(FloodplainState),
    Routing,
}

impl ModelKind {
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Floodplain(_) => "floodplain",
            ModelKind::Routing => "routing",
        }
    }

    fn soil_oxygen_demand(&self) -> SoilOxygenDemand {
        match self {
            ModelKind::Floodplain(_) => floodplain::soil_oxygen_demand,
            ModelKind::Routing => routing::no_soil_oxygen_demand,
        }
    }

    fn flood_counter(&self) -> u32 {
        match self {
            ModelKind::Floodplain(state) => state.flood_counter(),
            ModelKind::Routing => 0,
        }
    }

    fn reset(&mut self) {
        if let ModelKind::Floodplain(state) = self {
            state.reset();
        }
    }
}

/// DOC mass balance result handed to the oxygen step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct DocStep {
    /// unit: kg
    pub doc_load: f64,
    /// unit: mg
    pub consumed_doc_mg: f64,
}

/// DOC/DO model attached to one areal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoDocModel {
    id: ArealId,
    areal: Box<dyn Areal>,
    parameters: DoDocParameters,
    kind: ModelKind,
    inputs: ModelInputs,
    last: Option<NaiveDate>,
    outputs: ModelOutputs,
    max_area_exceedance: Option<MaxAreaExceedance>,
    debug: bool,
}

impl DoDocModel {
    /// Create a floodplain model with zone tracking.
    pub fn floodplain(
        id: impl Into<ArealId>,
        areal: Box<dyn Areal>,
        parameters: DoDocParameters,
    ) -> Self {
        Self::new(
            id.into(),
            areal,
            parameters,
            ModelKind::Floodplain(FloodplainState::default()),
        )
    }

    /// Create a routing model without zones.
    pub fn routing(id: impl Into<ArealId>, areal: Box<dyn Areal>, parameters: DoDocParameters) -> Self {
        Self::new(id.into(), areal, parameters, ModelKind::Routing)
    }

    fn new(id: ArealId, areal: Box<dyn Areal>, parameters: DoDocParameters, kind: ModelKind) -> Self {
        info!("Creating {} DODOC model for {}", kind.name(), id);
        Self {
            id,
            areal,
            parameters,
            kind,
            inputs: ModelInputs::default(),
            last: None,
            outputs: ModelOutputs::default(),
            max_area_exceedance: None,
            debug: false,
        }
    }

    /// Log the zone list after every run
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn id(&self) -> &ArealId {
        &self.id
    }

    pub fn kind(&self) -> &ModelKind {
        &self.kind
    }

    pub fn parameters(&self) -> &DoDocParameters {
        &self.parameters
    }

    pub fn areal(&self) -> &dyn Areal {
        self.areal.as_ref()
    }

    pub fn areal_mut(&mut self) -> &mut dyn Areal {
        self.areal.as_mut()
    }

    pub fn inputs(&self) -> &ModelInputs {
        &self.inputs
    }

    pub fn set_working_volume(&mut self, volume: f64) {
        self.inputs.working_volume = volume;
    }

    pub fn set_concentration_doc(&mut self, concentration: f64) {
        self.inputs.concentration_doc = concentration;
    }

    pub fn set_concentration_do(&mut self, concentration: f64) {
        self.inputs.concentration_do = concentration;
    }

    pub fn set_water_temperature(&mut self, temperature: Option<f64>) {
        self.inputs.water_temperature = temperature;
    }

    /// Push the host's hydraulic state into the areal
    pub fn observe(&mut self, state: &HydraulicState) {
        self.areal.observe(state);
    }

    pub fn outputs(&self) -> &ModelOutputs {
        &self.outputs
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.outputs.diagnostics
    }

    pub fn doc_load(&self) -> f64 {
        self.outputs.doc_load
    }

    pub fn do_load(&self) -> f64 {
        self.outputs.do_load
    }

    /// Zone list of a floodplain model
    pub fn zones(&self) -> Option<&ZoneSet> {
        match &self.kind {
            ModelKind::Floodplain(state) => Some(state.zones()),
            ModelKind::Routing => None,
        }
    }

    /// Days since the floodplain was last fully dry; zero for routing models
    pub fn flood_counter(&self) -> u32 {
        self.kind.flood_counter()
    }

    pub fn last_run(&self) -> Option<NaiveDate> {
        self.last
    }

    /// Area above which the model reports a max-area exceedance (m²)
    pub fn effective_max_area(&self) -> f64 {
        if self.parameters.doc.max_accumulation_area > 0.0 {
            self.parameters.doc.max_accumulation_area
        } else {
            self.areal.max_area()
        }
    }

    /// Take the exceedance recorded by the last run, if any
    pub fn take_max_area_exceedance(&mut self) -> Option<MaxAreaExceedance> {
        self.max_area_exceedance.take()
    }

    /// Clear all state accumulated since the start of the run
    pub fn reset(&mut self) {
        self.kind.reset();
        self.last = None;
        self.outputs = ModelOutputs::default();
        self.max_area_exceedance = None;
    }

    /// Advance the model to `date`.
    ///
    /// Returns `false` without touching any state when `date` has already been
    /// processed. A date earlier than the last processed one restarts the model.
    pub fn run(&mut self, date: NaiveDate) -> DoDocResult<bool> {
        match self.last {
            Some(last) if last == date => return Ok(false),
            Some(last) if date < last => {
                debug!("{}: {} precedes {}, restarting", self.id, date, last);
                self.reset();
            }
            _ => {}
        }

        self.last = Some(date);
        self.areal.set_simulation_date(date);

        let temperature = self
            .inputs
            .water_temperature
            .unwrap_or_else(|| estimate_water_temperature(date));
        let sigma = self.parameters.doc.sigma.at(temperature);
        let mut diagnostics = Diagnostics {
            water_temperature: temperature,
            sigma,
            ..Default::default()
        };

        let doc = match &mut self.kind {
            ModelKind::Floodplain(state) => state.process_doc(
                self.areal.as_ref(),
                &self.parameters,
                &self.inputs,
                temperature,
                sigma,
                &mut diagnostics,
            ),
            ModelKind::Routing => {
                routing::process_doc(&self.parameters, &self.inputs, sigma, &mut diagnostics)
            }
        };

        let demand_inputs = SoilDemandInputs {
            parameters: &self.parameters.oxygen,
            temperature,
            flood_counter: self.kind.flood_counter(),
            area: self.areal.area(),
        };
        let do_load = oxygen::process_do(
            self.kind.soil_oxygen_demand(),
            &demand_inputs,
            &self.parameters,
            &self.inputs,
            doc.consumed_doc_mg,
            &mut diagnostics,
        );

        self.check_max_area();

        self.outputs = ModelOutputs {
            doc_load: doc.doc_load,
            do_load,
            diagnostics,
        };

        if self.debug && log::log_enabled!(log::Level::Debug) {
            if let Some(zones) = self.zones() {
                for (index, zone) in zones.zones().iter().enumerate() {
                    debug!("{} {} zone {}: {:?}", self.id, date, index, zone);
                }
            }
        }
        Ok(true)
    }

    fn check_max_area(&mut self) {
        let max_area = self.effective_max_area();
        let area = self.areal.area();
        if let Some(record) = MaxAreaExceedance::check(self.id.as_str(), area, max_area) {
            warn!(
                "{}: modelled area {} m2 exceeds max area {} m2",
                self.id, area, max_area
            );
            self.max_area_exceedance = Some(record);
        }
    }
}
