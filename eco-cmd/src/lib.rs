//! Command implementations for the EcoFish CLI.
//!
//! Batch, one-shot utilities operating on a static JSON snapshot file:
//! report generation, flood/E.coli correlation, in-place cleanups and
//! CSV export.

use clap::Subcommand;

pub mod export;
pub mod maintenance;
pub mod snapshot_io;
pub mod summarize;

#[derive(Subcommand)]
pub enum Command {
    /// Run the analysis pipeline and write the dashboard report as JSON
    Summarize {
        /// Path to the snapshot JSON file
        snapshot: String,

        /// Analysis config JSON (thresholds, trend band)
        #[arg(short = 'c', long)]
        config: Option<String>,

        /// Output path for the report (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Compute the flood/E.coli correlation and store it in the snapshot file
    FloodCorrelation {
        /// Path to the snapshot JSON file (updated in-place)
        snapshot: String,
    },

    /// Rewrite boolean flood flags to 1/0 in-place
    NormalizeFloods {
        /// Path to the snapshot JSON file (updated in-place)
        snapshot: String,
    },

    /// Remove synthetic-data marker fields in-place
    StripSynthetic {
        /// Path to the snapshot JSON file (updated in-place)
        snapshot: String,
    },

    /// Count E.coli samples stored with numeric flood flag and count
    CountFloodSamples {
        /// Path to the snapshot JSON file
        snapshot: String,
    },

    /// Export a chemical metric series as date,value CSV
    Export {
        /// Path to the snapshot JSON file
        snapshot: String,

        #[arg(short = 'm', long, value_enum)]
        metric: export::SeriesMetric,

        /// Output path for the CSV
        #[arg(short = 'o', long)]
        output: String,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Summarize {
            snapshot,
            config,
            output,
        } => summarize::run_summarize(&snapshot, config.as_deref(), output.as_deref()).await,
        Command::FloodCorrelation { snapshot } => {
            summarize::run_flood_correlation(&snapshot).await
        }
        Command::NormalizeFloods { snapshot } => {
            maintenance::run_normalize_floods(&snapshot).await.map(|_| ())
        }
        Command::StripSynthetic { snapshot } => {
            maintenance::run_strip_synthetic(&snapshot).await.map(|_| ())
        }
        Command::CountFloodSamples { snapshot } => {
            maintenance::run_count_flood_samples(&snapshot).await.map(|_| ())
        }
        Command::Export {
            snapshot,
            metric,
            output,
        } => export::run_export(&snapshot, metric, &output).await,
    }
}
