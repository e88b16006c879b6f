//! Aggregators: per-site, per-metal, per-depth and per-year views.

use crate::extract::{MetalReading, SiteReading};
use eco_core::metric::{normalize_metal_name, Metal, Metric};
use eco_core::sample::Sample;
use eco_utils::dates::year_month;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Average, minimum, maximum and count of a non-empty set of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl Summary {
    pub fn of(values: &[f64]) -> Option<Summary> {
        let average = mean(values)?;
        Some(Summary {
            average,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            count: values.len(),
        })
    }
}

// ───────────────────── Sites ─────────────────────

/// E.coli statistics for one monitored beach.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteAggregate {
    pub site_name: String,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Group readings by site, highest average first.
///
/// Sites with equal averages are ordered by name.
pub fn site_aggregates(readings: &[SiteReading]) -> Vec<SiteAggregate> {
    let mut by_site: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for reading in readings {
        by_site
            .entry(reading.site_name.as_str())
            .or_default()
            .push(reading.value);
    }
    let mut sites: Vec<SiteAggregate> = by_site
        .into_iter()
        .filter_map(|(site, values)| {
            Summary::of(&values).map(|s| SiteAggregate {
                site_name: site.to_string(),
                average: s.average,
                min: s.min,
                max: s.max,
                count: s.count,
            })
        })
        .collect();
    sites.sort_by(|a, b| b.average.total_cmp(&a.average));
    sites
}

/// Sites whose name contains `query`, ignoring case. An empty query keeps all.
pub fn filter_sites<'a>(sites: &'a [SiteAggregate], query: &str) -> Vec<&'a SiteAggregate> {
    let needle = query.trim().to_lowercase();
    sites
        .iter()
        .filter(|s| s.site_name.to_lowercase().contains(&needle))
        .collect()
}

// ───────────────────── Metals ─────────────────────

/// Raw values of one metal at one depth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthValues {
    /// meters
    pub depth: f64,
    pub values: Vec<f64>,
}

impl DepthValues {
    pub fn average(&self) -> Option<f64> {
        mean(&self.values)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepthAverage {
    pub depth: f64,
    pub average: f64,
}

/// Statistics for one heavy metal across all depths and times.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetalProfile {
    /// Normalized name, e.g. `Pb`
    pub metal_name: String,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    /// Values per depth, depth ascending
    pub per_depth: Vec<DepthValues>,
}

impl MetalProfile {
    /// Average at every sampled depth, shallowest first.
    pub fn depth_averages(&self) -> Vec<DepthAverage> {
        self.per_depth
            .iter()
            .filter_map(|d| {
                d.average().map(|average| DepthAverage {
                    depth: d.depth,
                    average,
                })
            })
            .collect()
    }

    pub fn depth_average(&self, depth: f64) -> Option<f64> {
        self.per_depth
            .iter()
            .find(|d| d.depth == depth)
            .and_then(DepthValues::average)
    }

    pub fn metal(&self) -> Option<Metal> {
        Metal::from_symbol(&self.metal_name)
    }
}

/// One profile per observed metal, highest average first.
pub fn metal_profiles(readings: &[MetalReading]) -> Vec<MetalProfile> {
    let mut by_metal: BTreeMap<Metal, Vec<&MetalReading>> = BTreeMap::new();
    for reading in readings {
        by_metal.entry(reading.metal).or_default().push(reading);
    }
    let mut profiles: Vec<MetalProfile> = by_metal
        .into_iter()
        .filter_map(|(metal, readings)| {
            let values: Vec<f64> = readings.iter().map(|r| r.value).collect();
            let summary = Summary::of(&values)?;
            Some(MetalProfile {
                metal_name: normalize_metal_name(&metal.field()).to_string(),
                average: summary.average,
                min: summary.min,
                max: summary.max,
                count: summary.count,
                per_depth: group_by_depth(&readings),
            })
        })
        .collect();
    profiles.sort_by(|a, b| b.average.total_cmp(&a.average));
    profiles
}

/// Depth as an ordered map key, compared numerically.
#[derive(Debug, Clone, Copy)]
struct DepthKey(f64);

impl DepthKey {
    fn new(depth: f64) -> Self {
        // fold -0.0 into 0.0
        Self(depth + 0.0)
    }
}

impl PartialEq for DepthKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DepthKey {}

impl PartialOrd for DepthKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DepthKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn group_by_depth(readings: &[&MetalReading]) -> Vec<DepthValues> {
    let mut groups: BTreeMap<DepthKey, Vec<f64>> = BTreeMap::new();
    for reading in readings {
        let Some(depth) = reading.depth else { continue };
        groups.entry(DepthKey::new(depth)).or_default().push(reading.value);
    }
    groups
        .into_iter()
        .map(|(DepthKey(depth), values)| DepthValues { depth, values })
        .collect()
}

/// Names of the profiled metals, in profile order.
pub fn metal_list(profiles: &[MetalProfile]) -> Vec<String> {
    profiles.iter().map(|p| p.metal_name.clone()).collect()
}

/// Average of one metal at one depth in one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetalTrendPoint {
    pub metal_name: String,
    pub depth: f64,
    pub year: i32,
    pub value: f64,
}

/// Yearly averages per metal and depth, ordered by metal, depth, year.
pub fn metal_trends(readings: &[MetalReading]) -> Vec<MetalTrendPoint> {
    let mut groups: BTreeMap<(Metal, DepthKey, i32), Vec<f64>> = BTreeMap::new();
    for reading in readings {
        let Some(depth) = reading.depth else { continue };
        groups
            .entry((reading.metal, DepthKey::new(depth), reading.year))
            .or_default()
            .push(reading.value);
    }
    groups
        .into_iter()
        .filter_map(|((metal, DepthKey(depth), year), values)| {
            mean(&values).map(|value| MetalTrendPoint {
                metal_name: normalize_metal_name(&metal.field()).to_string(),
                depth,
                year,
                value,
            })
        })
        .collect()
}

// ───────────────────── Years ─────────────────────

/// Per-year means of the three headline metrics.
///
/// A metric with no values in the year reports `0.0`, the same as a
/// measured zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyRollup {
    pub year: i32,
    pub chlorophyll_avg: f64,
    pub nitrate_avg: f64,
    pub ecoli_avg: f64,
    pub sample_count: usize,
}

impl YearlyRollup {
    pub fn average(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Chlorophyll => Some(self.chlorophyll_avg),
            Metric::Nitrate => Some(self.nitrate_avg),
            Metric::Ecoli => Some(self.ecoli_avg),
            Metric::Nitrite => None,
        }
    }
}

#[derive(Default)]
struct YearValues {
    chlorophyll: Vec<f64>,
    nitrate: Vec<f64>,
    ecoli: Vec<f64>,
}

/// Roll up chemical and E.coli samples by year, oldest first.
///
/// Years without any chlorophyll, nitrate or E.coli value are left out.
pub fn yearly_rollups(chemicals: &[Sample], ecoli: &[Sample]) -> Vec<YearlyRollup> {
    let mut years: BTreeMap<i32, YearValues> = BTreeMap::new();
    for sample in chemicals {
        let entry = years.entry(sample.year).or_default();
        if let Some(v) = sample.value(Metric::Chlorophyll.field()) {
            entry.chlorophyll.push(v);
        }
        if let Some(v) = sample.value(Metric::Nitrate.field()) {
            entry.nitrate.push(v);
        }
    }
    for sample in ecoli {
        let entry = years.entry(sample.year).or_default();
        if let Some(v) = sample.value(Metric::Ecoli.field()) {
            entry.ecoli.push(v);
        }
    }
    years
        .into_iter()
        .map(|(year, values)| YearlyRollup {
            year,
            chlorophyll_avg: mean(&values.chlorophyll).unwrap_or(0.0),
            nitrate_avg: mean(&values.nitrate).unwrap_or(0.0),
            ecoli_avg: mean(&values.ecoli).unwrap_or(0.0),
            sample_count: values.chlorophyll.len() + values.nitrate.len() + values.ecoli.len(),
        })
        .filter(|rollup| rollup.sample_count > 0)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extremes {
    pub max: f64,
    pub min: f64,
}

impl Extremes {
    fn of(values: &[f64]) -> Option<Extremes> {
        Summary::of(values).map(|s| Extremes {
            max: s.max,
            min: s.min,
        })
    }
}

/// Highest and lowest chemical readings of a year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyExtremes {
    pub year: i32,
    pub chlorophyll: Option<Extremes>,
    pub nitrate: Option<Extremes>,
    pub nitrite: Option<Extremes>,
}

pub fn chemical_extremes(chemicals: &[Sample]) -> Vec<YearlyExtremes> {
    let mut years: BTreeMap<i32, [Vec<f64>; 3]> = BTreeMap::new();
    let metrics = [Metric::Chlorophyll, Metric::Nitrate, Metric::Nitrite];
    for sample in chemicals {
        let entry = years.entry(sample.year).or_default();
        for (slot, metric) in metrics.iter().enumerate() {
            if let Some(v) = sample.value(metric.field()) {
                entry[slot].push(v);
            }
        }
    }
    years
        .into_iter()
        .map(|(year, [chl, nitrate, nitrite])| YearlyExtremes {
            year,
            chlorophyll: Extremes::of(&chl),
            nitrate: Extremes::of(&nitrate),
            nitrite: Extremes::of(&nitrite),
        })
        .collect()
}

/// E.coli average of a year and whether it saw a flood month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyFloodSummary {
    pub year: i32,
    pub ecoli_avg: Option<f64>,
    pub flood: bool,
}

pub fn yearly_flood_summary(ecoli: &[Sample]) -> Vec<YearlyFloodSummary> {
    let mut years: BTreeMap<i32, (Vec<f64>, bool)> = BTreeMap::new();
    for sample in ecoli {
        let entry = years.entry(sample.year).or_default();
        if let Some(v) = sample.value(Metric::Ecoli.field()) {
            entry.0.push(v);
        }
        if sample.flood_in_month.is_some_and(|f| f.is_flood()) {
            entry.1 = true;
        }
    }
    years
        .into_iter()
        .map(|(year, (values, flood))| YearlyFloodSummary {
            year,
            ecoli_avg: mean(&values),
            flood,
        })
        .collect()
}

/// Distinct `YYYY-MM` months flagged as flood months, first-seen order.
pub fn flood_months(ecoli: &[Sample]) -> Vec<String> {
    let mut seen = HashSet::new();
    ecoli
        .iter()
        .filter(|s| s.flood_in_month.is_some_and(|f| f.is_flood()))
        .map(|s| year_month(s.year, s.month))
        .filter(|m| seen.insert(m.clone()))
        .collect()
}
