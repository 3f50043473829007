//! Floodplain dissolved organic carbon and dissolved oxygen sub-model.
//!
//! Re-exports the member crates and adds the [`host`] source/sink proxies that a
//! river network simulator drives once per timestep.

pub use dodoc_components;
pub use dodoc_core;

pub mod host;
