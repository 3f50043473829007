//! Core abstractions for the floodplain DOC/DO model
//!
//! This crate holds everything the process models share: the error type, unit
//! constants, the [`areal::Areal`] interface to the host's spatial units, lookup
//! curves and their integration over elevation bands, and the zone-set manager
//! that tracks which parts of a floodplain are under water.

pub mod areal;
pub mod errors;
pub mod integrate;
pub mod lookup;
pub mod temperature;
pub mod units;
pub mod zone;
pub mod zone_set;
