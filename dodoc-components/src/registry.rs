//! Per-run model registry
//!
//! A [`ModelContext`] owns one model per areal for the lifetime of a simulation run.
//! Models are created lazily on first reference and shared by every caller that
//! refers to the same areal, such as the DOC and DO source/sink proxies of one
//! storage. The context is passed explicitly to its users; a fresh run starts
//! from an empty context or a [`ModelContext::reset`].

use crate::assurance::MaxAreaExceedance;
use crate::model::DoDocModel;
use dodoc_core::areal::ArealId;
use dodoc_core::errors::{DoDocError, DoDocResult};
use log::info;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Model shared between the callers attached to one areal
pub type SharedModel = Arc<Mutex<DoDocModel>>;

/// Registry of the models in a simulation run.
///
/// Distinct areals may be created concurrently. Each model is guarded by its own
/// mutex so at most one run per areal is in flight.
#[derive(Debug, Default)]
pub struct ModelContext {
    models: RwLock<HashMap<ArealId, SharedModel>>,
}

impl ModelContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the model for `id`, creating it with `factory` on first reference.
    ///
    /// The factory runs at most once per areal, even under concurrent calls.
    pub fn get_or_create<F>(&self, id: &ArealId, factory: F) -> DoDocResult<SharedModel>
    where
        F: FnOnce() -> DoDocResult<DoDocModel>,
    {
        if let Some(model) = self.models.read().get(id) {
            return Ok(Arc::clone(model));
        }

        let mut models = self.models.write();
        if let Some(model) = models.get(id) {
            return Ok(Arc::clone(model));
        }
        let model = Arc::new(Mutex::new(factory()?));
        models.insert(id.clone(), Arc::clone(&model));
        Ok(model)
    }

    pub fn get(&self, id: &ArealId) -> Option<SharedModel> {
        self.models.read().get(id).cloned()
    }

    /// Register a model under its own id, replacing any existing one
    pub fn insert(&self, model: DoDocModel) -> SharedModel {
        let id = model.id().clone();
        let shared = Arc::new(Mutex::new(model));
        self.models.write().insert(id, Arc::clone(&shared));
        shared
    }

    pub fn len(&self) -> usize {
        self.models.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.read().is_empty()
    }

    /// Registered areal ids, sorted
    pub fn ids(&self) -> Vec<ArealId> {
        let mut ids: Vec<ArealId> = self.models.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Drop every model
    pub fn reset(&self) {
        let mut models = self.models.write();
        info!("Resetting DODOC model context ({} models)", models.len());
        models.clear();
    }

    /// Collect max-area exceedances recorded since the last check.
    ///
    /// Records are cleared as they are read. The first one, by areal id, is
    /// returned as an error; the run itself is never interrupted.
    pub fn check_max_area(&self) -> DoDocResult<()> {
        let exceedances = self.take_max_area_exceedances();
        match exceedances.into_iter().next() {
            Some(record) => Err(DoDocError::from(record)),
            None => Ok(()),
        }
    }

    /// Take all recorded exceedances, ordered by areal id
    pub fn take_max_area_exceedances(&self) -> Vec<MaxAreaExceedance> {
        let models = self.models.read();
        let mut ids: Vec<&ArealId> = models.keys().collect();
        ids.sort();
        ids.into_iter()
            .filter_map(|id| models[id].lock().take_max_area_exceedance())
            .collect()
    }
}
