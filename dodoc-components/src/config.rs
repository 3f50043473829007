//! Run configuration
//!
//! A run configuration lists the models of a simulation as TOML:
//!
//! ```toml
//! [[models]]
//! id = "Storage 1"
//! kind = "floodplain"
//!
//! [models.parameters]
//! scaling_factor = 1.0
//!
//! [models.parameters.doc]
//! leaf_accumulation = [[0.0, 2.0], [10.0, 6.0]]
//!
//! [models.areal]
//! type = "StorageAreal"
//! geometry = [[0.0, 0.0], [10.0, 1000.0]]
//! floodplain_elevation = 0.0
//! ```
//!
//! Every parameter not named takes its default. Configurations are validated as a
//! whole before any model is built.

use crate::model::DoDocModel;
use crate::parameters::DoDocParameters;
use crate::registry::ModelContext;
use dodoc_core::areal::{Areal, ArealId};
use dodoc_core::errors::{DoDocError, DoDocResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which process strategy a model uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    Floodplain,
    Routing,
}

/// Configuration of one model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub id: ArealId,
    pub kind: ModelVariant,
    #[serde(default)]
    pub parameters: DoDocParameters,
    pub areal: Box<dyn Areal>,
    /// Log the zone list after every run
    #[serde(default)]
    pub debug: bool,
}

impl ModelConfig {
    pub fn validate(&self) -> DoDocResult<()> {
        self.parameters
            .validate()
            .and_then(|_| self.areal.validate())
            .map_err(|e| DoDocError::Configuration(format!("model '{}': {}", self.id, e)))
    }

    /// Validate and build a fresh model
    pub fn build(&self) -> DoDocResult<DoDocModel> {
        self.validate()?;
        let areal = self.areal.clone();
        let parameters = self.parameters.clone();
        let model = match self.kind {
            ModelVariant::Floodplain => DoDocModel::floodplain(self.id.clone(), areal, parameters),
            ModelVariant::Routing => DoDocModel::routing(self.id.clone(), areal, parameters),
        };
        Ok(model.with_debug(self.debug))
    }
}

/// All models of a simulation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

impl RunConfig {
    /// Parse and validate a TOML run configuration
    pub fn from_toml_str(source: &str) -> DoDocResult<Self> {
        let config: RunConfig =
            toml::from_str(source).map_err(|e| DoDocError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DoDocResult<()> {
        let mut seen = HashSet::new();
        for model in &self.models {
            if !seen.insert(&model.id) {
                return Err(DoDocError::Configuration(format!(
                    "duplicate model id '{}'",
                    model.id
                )));
            }
            model.validate()?;
        }
        Ok(())
    }

    pub fn model(&self, id: &ArealId) -> Option<&ModelConfig> {
        self.models.iter().find(|m| &m.id == id)
    }

    /// Build every configured model into a fresh context
    pub fn build_context(&self) -> DoDocResult<ModelContext> {
        let context = ModelContext::new();
        for config in &self.models {
            context.insert(config.build()?);
        }
        Ok(context)
    }
}
