//! DOC and dissolved oxygen process models.
//!
//! Builds on the zone tracking and areal abstractions of `dodoc-core`:
//!
//! - [`model`]: the per-areal [`model::DoDocModel`] and its floodplain and routing variants
//! - [`parameters`]: serde-configurable parameter sets with documented defaults
//! - [`registry`]: the per-run [`registry::ModelContext`] shared by source/sink callers
//! - [`config`]: TOML run configuration
//! - [`outputs`]: named outputs and diagnostics
//! - [`assurance`]: max-area exceedance records

pub mod assurance;
pub mod config;
pub mod model;
pub mod outputs;
pub mod parameters;
pub mod registry;
