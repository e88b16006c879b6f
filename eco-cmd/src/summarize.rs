//! Report generation over a static snapshot file.

use crate::snapshot_io::{load_snapshot, read_document, write_document};
use anyhow::{bail, Context};
use eco_core::dataset::Dataset;
use eco_core::sample::SampleBatch;
use eco_core::snapshot::Snapshot;
use eco_data::stats::{flood_ecoli_correlation, CorrelationStrength};
use eco_data::{aggregate, AnalysisConfig};
use log::info;
use serde_json::Value;

/// Key the flood/E.coli coefficient is stored under.
pub const FLOOD_CORRELATION_KEY: &str = "flood_ecoli_correlation";

/// Run the full pipeline and write the report as pretty JSON.
///
/// The report goes to stdout when no output path is given.
pub async fn run_summarize(
    snapshot_path: &str,
    config_path: Option<&str>,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => AnalysisConfig::from_path(path)?,
        None => AnalysisConfig::default(),
    };
    let snapshot = load_snapshot(snapshot_path).await?;
    let report = aggregate(&snapshot, &config);

    info!(
        "{} concerns, {} skipped branches in {}",
        report.concerns.len(),
        report.skipped_total(),
        snapshot_path
    );

    let json = serde_json::to_string_pretty(&report)?;
    match output {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("failed to write report {}", path))?;
            info!("Report written to {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Compute the flood/E.coli correlation and store it in the snapshot file.
///
/// The stored value is `null` when the coefficient cannot be computed.
pub async fn run_flood_correlation(snapshot_path: &str) -> anyhow::Result<()> {
    let mut document = read_document(snapshot_path).await?;
    let snapshot = Snapshot::from_root(&document);
    let ecoli = SampleBatch::from_snapshot(&snapshot, Dataset::Ecolifloods);
    let correlation = flood_ecoli_correlation(&ecoli.samples);

    let Some(root) = document.as_object_mut() else {
        bail!("snapshot {} must be a JSON object", snapshot_path);
    };
    let stored = correlation
        .coefficient
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null);
    root.insert(FLOOD_CORRELATION_KEY.to_string(), stored);
    write_document(snapshot_path, &document).await?;

    match correlation.coefficient {
        Some(r) => info!(
            "Correlation calculated and added: {:.4} ({})",
            r,
            CorrelationStrength::classify(r).description()
        ),
        None => info!("Correlation could not be calculated; stored null"),
    }
    info!(
        "Flood samples: {} Non-flood samples: {} Total valid: {}",
        correlation.flood_count, correlation.non_flood_count, correlation.total_valid
    );
    Ok(())
}
