//! Analysis over flattened EcoFish samples.
//!
//! Extractors turn [`eco_core::sample::Sample`]s into typed series and
//! readings; aggregators, analyzers and the threshold evaluator build the
//! dashboard views on top. [`pipeline::aggregate`] runs all of it for one
//! snapshot.

pub mod aggregate;
pub mod concerns;
pub mod config;
pub mod extract;
pub mod pipeline;
pub mod stats;
pub mod thresholds;

pub use config::{AnalysisConfig, ConcernThresholds};
pub use pipeline::{aggregate, DashboardReport, ReportCache, SampleGroup};
