//! Source/sink proxies driven by a network simulator
//!
//! The host attaches one proxy per constituent to a storage or link. Every proxy
//! attached to the same areal binds to the same [`DoDocModel`] through the run's
//! [`ModelContext`], so the DOC and DO proxies of one storage see a single zone
//! history and a single run per day.
//!
//! Each timestep the host calls [`SourceSinkProxy::inputs_updated`] on every
//! proxy, then [`SourceSinkProxy::run_time_step`] to collect the processed load.

use chrono::NaiveDate;
use dodoc_components::config::ModelConfig;
use dodoc_components::model::DoDocModel;
use dodoc_components::registry::{ModelContext, SharedModel};
use dodoc_core::areal::{ArealId, HydraulicState};
use dodoc_core::errors::{DoDocError, DoDocResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Volumes below this are treated as empty (m³)
const EMPTY_VOLUME: f64 = 1e-9;

/// Constituent a proxy reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constituent {
    DissolvedOrganicCarbon,
    DissolvedOxygen,
}

/// What the host knows about a constituent before processing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InflowState {
    /// unit: kg
    pub unprocessed_load: f64,
    /// unit: m³
    pub total_volume: f64,
    pub hydraulics: HydraulicState,
}

impl InflowState {
    /// Concentration of the constituent, zero in an empty volume (kg/m³)
    pub fn concentration(&self) -> f64 {
        if self.total_volume.abs() < EMPTY_VOLUME {
            0.0
        } else {
            self.unprocessed_load / self.total_volume
        }
    }
}

/// Host-facing adapter between one constituent and a shared model.
#[derive(Debug)]
pub struct SourceSinkProxy {
    constituent: Constituent,
    config: ModelConfig,
    worker: Option<SharedModel>,
}

impl SourceSinkProxy {
    pub fn new(constituent: Constituent, config: ModelConfig) -> Self {
        Self {
            constituent,
            config,
            worker: None,
        }
    }

    pub fn id(&self) -> &ArealId {
        &self.config.id
    }

    pub fn constituent(&self) -> Constituent {
        self.constituent
    }

    /// The bound model, once [`Self::inputs_updated`] has run
    pub fn worker(&self) -> Option<&SharedModel> {
        self.worker.as_ref()
    }

    /// Push this step's inputs into the shared model, binding it on first use.
    pub fn inputs_updated(&mut self, context: &ModelContext, inflow: InflowState) -> DoDocResult<()> {
        let worker = match &self.worker {
            Some(worker) => Arc::clone(worker),
            None => {
                let config = &self.config;
                let worker = context.get_or_create(&config.id, || config.build())?;
                debug!("{:?} proxy bound to {}", self.constituent, config.id);
                self.worker = Some(Arc::clone(&worker));
                worker
            }
        };

        let mut model = worker.lock();
        model.set_working_volume(inflow.total_volume);
        model.observe(&inflow.hydraulics);
        let concentration = inflow.concentration();
        match self.constituent {
            Constituent::DissolvedOrganicCarbon => model.set_concentration_doc(concentration),
            Constituent::DissolvedOxygen => model.set_concentration_do(concentration),
        }
        Ok(())
    }

    /// Run the shared model for `date` if no proxy has yet, and return the
    /// processed load for this constituent (kg).
    pub fn run_time_step(&self, date: NaiveDate) -> DoDocResult<f64> {
        let worker = self.worker.as_ref().ok_or_else(|| {
            DoDocError::Error(format!(
                "{:?} proxy for {} has no inputs",
                self.constituent, self.config.id
            ))
        })?;
        let mut model = worker.lock();
        model.run(date)?;
        Ok(self.load(&model))
    }

    /// Drop the bound model and wipe the registry
    pub fn reset(&mut self, context: &ModelContext) {
        self.worker = None;
        context.reset();
    }

    fn load(&self, model: &DoDocModel) -> f64 {
        match self.constituent {
            Constituent::DissolvedOrganicCarbon => model.doc_load(),
            Constituent::DissolvedOxygen => model.do_load(),
        }
    }
}
