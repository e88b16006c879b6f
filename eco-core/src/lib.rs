//! Core types for EcoFish lake monitoring data.
//!
//! A realtime-database snapshot holds three independently nested datasets
//! (`Chemicals_Height`, `Ecolifloods`, `Heavy_Metals`). This crate turns
//! them into flat, typed [`sample::Sample`]s without ever failing on a
//! malformed branch: every branch that cannot be read is recorded as a
//! [`flatten::Skip`] and the walk moves on.

pub mod cleanup;
pub mod dataset;
pub mod error;
pub mod flatten;
pub mod flood;
pub mod metric;
pub mod sample;
pub mod snapshot;
pub mod value;
