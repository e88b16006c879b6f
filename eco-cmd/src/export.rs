//! CSV export of a metric series.

use crate::snapshot_io::load_snapshot;
use clap::ValueEnum;
use eco_core::dataset::Dataset;
use eco_core::metric::Metric;
use eco_core::sample::SampleBatch;
use eco_data::extract::{metric_series, MetricSeries};
use eco_utils::dates::format_date;
use log::info;

/// Chemical metrics that can be exported as a dated series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeriesMetric {
    Chlorophyll,
    Nitrate,
    Nitrite,
}

impl From<SeriesMetric> for Metric {
    fn from(metric: SeriesMetric) -> Self {
        match metric {
            SeriesMetric::Chlorophyll => Metric::Chlorophyll,
            SeriesMetric::Nitrate => Metric::Nitrate,
            SeriesMetric::Nitrite => Metric::Nitrite,
        }
    }
}

/// Write `date,value` rows, with a header, for one series.
pub fn write_series<W: std::io::Write>(writer: W, series: &MetricSeries) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["date", "value"])?;
    for point in &series.points {
        wtr.write_record([format_date(&point.date), point.value.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub async fn run_export(
    snapshot_path: &str,
    metric: SeriesMetric,
    output: &str,
) -> anyhow::Result<()> {
    let snapshot = load_snapshot(snapshot_path).await?;
    let chem = SampleBatch::from_snapshot(&snapshot, Dataset::ChemicalsHeight);
    let series = metric_series(&chem.samples, metric.into());

    let mut buffer = Vec::new();
    write_series(&mut buffer, &series)?;
    tokio::fs::write(output, buffer).await?;

    info!(
        "Exported {} {} values to {}",
        series.len(),
        series.metric,
        output
    );
    Ok(())
}
