//! Metric Extractors: pull named numeric fields out of flattened samples.

use chrono::NaiveDate;
use eco_core::flood::FloodIndicator;
use eco_core::metric::{Metal, Metric, FLOOD_IN_MONTH_FIELD, RAINFALL_FIELD, TEMPERATURE_FIELD};
use eco_core::sample::Sample;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Strings at most this long are offered as categorical fields.
pub const MAX_CATEGORICAL_LEN: usize = 30;

/// A dated value of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub year: i32,
}

/// Date-ordered values of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    pub metric: Metric,
    pub points: Vec<DataPoint>,
}

impl MetricSeries {
    pub fn empty(metric: Metric) -> Self {
        Self {
            metric,
            points: Vec::new(),
        }
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Collect every finite value of `metric`, sorted by date.
///
/// Samples sharing a date keep their flattening order. Undated samples
/// have no place on a time axis and are left out.
pub fn metric_series(samples: &[Sample], metric: Metric) -> MetricSeries {
    let mut points: Vec<DataPoint> = samples
        .iter()
        .filter_map(|s| {
            Some(DataPoint {
                date: s.date?,
                value: s.value(metric.field())?,
                year: s.year,
            })
        })
        .collect();
    points.sort_by_key(|p| p.date);
    MetricSeries { metric, points }
}

/// An E.coli count taken at a named site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteReading {
    pub site_name: String,
    pub year: i32,
    pub value: f64,
}

pub fn site_readings(samples: &[Sample]) -> Vec<SiteReading> {
    samples
        .iter()
        .filter_map(|s| {
            s.value(Metric::Ecoli.field()).map(|value| SiteReading {
                site_name: s.site_name().to_string(),
                year: s.year,
                value,
            })
        })
        .collect()
}

/// One heavy-metal concentration at a depth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetalReading {
    pub metal: Metal,
    pub depth: Option<f64>,
    pub year: i32,
    pub value: f64,
}

/// Readings for each of the eight metal fields present on each sample.
pub fn metal_readings(samples: &[Sample]) -> Vec<MetalReading> {
    samples
        .iter()
        .flat_map(|s| {
            Metal::ALL.iter().filter_map(move |metal| {
                s.value(&metal.field()).map(|value| MetalReading {
                    metal: *metal,
                    depth: s.depth,
                    year: s.year,
                    value,
                })
            })
        })
        .collect()
}

/// An E.coli sample with its weather context, for flood and weather charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EcoliFloodPoint {
    pub date: NaiveDate,
    pub ecoli: f64,
    pub rainfall: Option<f64>,
    pub temperature: Option<f64>,
    pub flood_in_month: Option<FloodIndicator>,
}

/// Undated samples are left out.
pub fn ecoli_flood_points(samples: &[Sample]) -> Vec<EcoliFloodPoint> {
    samples
        .iter()
        .filter_map(|s| {
            Some(EcoliFloodPoint {
                date: s.date?,
                ecoli: s.value(Metric::Ecoli.field())?,
                rainfall: s.value(RAINFALL_FIELD),
                temperature: s.value(TEMPERATURE_FIELD),
                flood_in_month: s.flood_in_month,
            })
        })
        .collect()
}

/// Field names usable as correlation axes, in first-seen order.
///
/// A field qualifies when at least one sample holds a finite number in it.
/// With `include_strings`, short string fields qualify too. `flood_in_month`
/// is offered whenever any sample carries an indicator for it.
pub fn numeric_fields(samples: &[Sample], include_strings: bool) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut fields = Vec::new();
    let mut offer = |name: &str, fields: &mut Vec<String>| {
        if seen.insert(name.to_string()) {
            fields.push(name.to_string());
        }
    };
    for sample in samples {
        for (name, raw) in sample.fields() {
            let numeric = sample.value(name).is_some();
            let categorical = include_strings
                && matches!(raw, Value::String(s) if s.chars().count() < MAX_CATEGORICAL_LEN);
            if numeric || categorical {
                offer(name, &mut fields);
            }
        }
        if sample.flood_in_month.is_some() {
            offer(FLOOD_IN_MONTH_FIELD, &mut fields);
        }
    }
    fields
}
