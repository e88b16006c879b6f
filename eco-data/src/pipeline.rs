//! The aggregation entry point and its explicit report cache.
//!
//! [`aggregate`] runs every extractor, aggregator and analyzer over one
//! snapshot and bundles the outputs in a [`DashboardReport`]. The pipeline
//! only reads the snapshot, so a report can be shared freely once built.

use crate::aggregate::{
    chemical_extremes, filter_sites, flood_months, metal_list, metal_profiles, metal_trends,
    site_aggregates, yearly_flood_summary, yearly_rollups, MetalProfile, MetalTrendPoint,
    SiteAggregate, YearlyExtremes, YearlyFloodSummary, YearlyRollup,
};
use crate::concerns::{detect_concerns, trend_summary, Concern, TrendSummary};
use crate::config::AnalysisConfig;
use crate::extract::{
    ecoli_flood_points, metal_readings, metric_series, numeric_fields, site_readings,
    EcoliFloodPoint, MetricSeries,
};
use crate::stats::{correlate_fields, flood_ecoli_correlation, FieldCorrelation, FloodCorrelation};
use crate::thresholds::{evaluate_thresholds, ThresholdRow};
use eco_core::dataset::Dataset;
use eco_core::error::SkipReason;
use eco_core::flatten::Skip;
use eco_core::metric::Metric;
use eco_core::sample::{Sample, SampleBatch};
use eco_core::snapshot::Snapshot;
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;

/// Which retained samples an ad-hoc correlation runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SampleGroup {
    Chemicals,
    Metals,
    Ecoli,
}

/// Candidate X/Y fields for the correlation panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorrelationFields {
    pub chemicals: Vec<String>,
    pub metals: Vec<String>,
    pub ecoli: Vec<String>,
}

/// Everything derived from one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub chlorophyll: MetricSeries,
    pub nitrate: MetricSeries,
    pub nitrite: MetricSeries,
    pub sites: Vec<SiteAggregate>,
    pub metals: Vec<MetalProfile>,
    pub metal_list: Vec<String>,
    pub metal_trends: Vec<MetalTrendPoint>,
    pub yearly: Vec<YearlyRollup>,
    pub extremes: Vec<YearlyExtremes>,
    pub concerns: Vec<Concern>,
    pub trend: Option<TrendSummary>,
    pub thresholds: Vec<ThresholdRow>,
    pub ecoli_flood_points: Vec<EcoliFloodPoint>,
    pub flood_summary: Vec<YearlyFloodSummary>,
    pub flood_months: Vec<String>,
    pub flood_correlation: FloodCorrelation,
    pub correlation_fields: CorrelationFields,
    /// Skipped branches and records, per reason. Undated samples are counted
    /// under [`SkipReason::UnresolvableDate`]: they still feed site, yearly
    /// and metal outputs but are missing from the dated series.
    pub skipped: BTreeMap<SkipReason, usize>,

    #[serde(skip)]
    chemicals: Vec<Sample>,
    #[serde(skip)]
    metal_samples: Vec<Sample>,
    #[serde(skip)]
    ecoli: Vec<Sample>,
}

impl DashboardReport {
    pub fn samples(&self, group: SampleGroup) -> &[Sample] {
        match group {
            SampleGroup::Chemicals => &self.chemicals,
            SampleGroup::Metals => &self.metal_samples,
            SampleGroup::Ecoli => &self.ecoli,
        }
    }

    /// Correlate two fields of the retained samples of `group`.
    pub fn correlate(&self, group: SampleGroup, x_field: &str, y_field: &str) -> FieldCorrelation {
        correlate_fields(self.samples(group), x_field, y_field)
    }

    pub fn series(&self, metric: Metric) -> Option<&MetricSeries> {
        match metric {
            Metric::Chlorophyll => Some(&self.chlorophyll),
            Metric::Nitrate => Some(&self.nitrate),
            Metric::Nitrite => Some(&self.nitrite),
            Metric::Ecoli => None,
        }
    }

    /// Sites whose name contains `query`, ignoring case.
    pub fn find_sites(&self, query: &str) -> Vec<&SiteAggregate> {
        filter_sites(&self.sites, query)
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

fn count_skips<'a>(skips: impl Iterator<Item = &'a Skip>) -> BTreeMap<SkipReason, usize> {
    let mut counts = BTreeMap::new();
    for skip in skips {
        debug!(
            "[Eco Debug] aggregate: skipped {} at {}: {}",
            skip.dataset, skip.path, skip.reason
        );
        *counts.entry(skip.reason).or_insert(0) += 1;
    }
    counts
}

/// Run the whole pipeline over a snapshot.
pub fn aggregate(snapshot: &Snapshot, config: &AnalysisConfig) -> DashboardReport {
    let chem = SampleBatch::from_snapshot(snapshot, Dataset::ChemicalsHeight);
    let metals = SampleBatch::from_snapshot(snapshot, Dataset::HeavyMetals);
    let ecoli = SampleBatch::from_snapshot(snapshot, Dataset::Ecolifloods);

    let mut skipped = count_skips(
        chem.skipped
            .iter()
            .chain(metals.skipped.iter())
            .chain(ecoli.skipped.iter()),
    );
    let undated = chem
        .samples
        .iter()
        .chain(metals.samples.iter())
        .chain(ecoli.samples.iter())
        .filter(|s| s.date.is_none())
        .count();
    if undated > 0 {
        debug!("[Eco Debug] aggregate: {} undated samples left out of dated series", undated);
        *skipped.entry(SkipReason::UnresolvableDate).or_insert(0) += undated;
    }

    let metal_values = metal_readings(&metals.samples);
    let profiles = metal_profiles(&metal_values);
    let yearly = yearly_rollups(&chem.samples, &ecoli.samples);

    let report = DashboardReport {
        chlorophyll: metric_series(&chem.samples, Metric::Chlorophyll),
        nitrate: metric_series(&chem.samples, Metric::Nitrate),
        nitrite: metric_series(&chem.samples, Metric::Nitrite),
        sites: site_aggregates(&site_readings(&ecoli.samples)),
        metal_list: metal_list(&profiles),
        metal_trends: metal_trends(&metal_values),
        thresholds: evaluate_thresholds(&profiles),
        metals: profiles,
        concerns: detect_concerns(&yearly, &config.concerns),
        trend: trend_summary(&yearly, config.stable_trend_band),
        yearly,
        extremes: chemical_extremes(&chem.samples),
        ecoli_flood_points: ecoli_flood_points(&ecoli.samples),
        flood_summary: yearly_flood_summary(&ecoli.samples),
        flood_months: flood_months(&ecoli.samples),
        flood_correlation: flood_ecoli_correlation(&ecoli.samples),
        correlation_fields: CorrelationFields {
            chemicals: numeric_fields(&chem.samples, false),
            metals: numeric_fields(&metals.samples, false),
            ecoli: numeric_fields(&ecoli.samples, true),
        },
        skipped,
        chemicals: chem.samples,
        metal_samples: metals.samples,
        ecoli: ecoli.samples,
    };

    info!(
        "Aggregated snapshot: {} chlorophyll, {} nitrate, {} sites, {} metals, {} years",
        report.chlorophyll.len(),
        report.nitrate.len(),
        report.sites.len(),
        report.metals.len(),
        report.yearly.len()
    );
    report
}

/// Holds the report of the latest snapshot generation.
///
/// The caller bumps the generation whenever a new snapshot arrives; a
/// request for the cached generation with the config it was built under
/// returns the stored report untouched. A different config recomputes.
#[derive(Debug, Default)]
pub struct ReportCache {
    entry: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    generation: u64,
    config: AnalysisConfig,
    report: DashboardReport,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(
        &mut self,
        generation: u64,
        snapshot: &Snapshot,
        config: &AnalysisConfig,
    ) -> &DashboardReport {
        let fresh = self
            .entry
            .as_ref()
            .is_some_and(|e| e.generation == generation && e.config == *config);
        if !fresh {
            debug!("[Eco Debug] cache: recomputing for generation {}", generation);
            self.entry = None;
        }
        let entry = self.entry.get_or_insert_with(|| CacheEntry {
            generation,
            config: config.clone(),
            report: aggregate(snapshot, config),
        });
        &entry.report
    }

    /// Generation of the cached report, if any.
    pub fn generation(&self) -> Option<u64> {
        self.entry.as_ref().map(|e| e.generation)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lake_snapshot() -> Snapshot {
        Snapshot::from_root(&json!({
            "Ecolifloods": {
                "2020": [{ "01": [{ "Ecoli": 50, "flood_in_month": 0 }] }, null]
            },
            "Chemicals_Height": {
                "2020": [{ "01": [{ "chl_ug_l_avg": 4.0, "avg_nitrate": 1.2, "avg_nitrit": 0.1 }] }]
            },
            "Heavy_Metals": {
                "5": { "2020": [{ "01": [{ "Pb_µg_L": 0.02, "Fe_µg_L": 120 }] }] }
            }
        }))
    }

    #[test]
    fn single_ecoli_sample_scenario() {
        let report = aggregate(&lake_snapshot(), &AnalysisConfig::default());

        assert_eq!(report.sites.len(), 1);
        let site = &report.sites[0];
        assert_eq!(site.site_name, "Unknown");
        assert_eq!((site.average, site.min, site.max, site.count), (50.0, 50.0, 50.0, 1));

        assert_eq!(report.yearly.len(), 1);
        assert_eq!(report.yearly[0].year, 2020);
        assert_eq!(report.yearly[0].ecoli_avg, 50.0);
        assert_eq!(report.yearly[0].chlorophyll_avg, 4.0);

        assert_eq!(report.skipped.get(&SkipReason::Null), Some(&1));
        assert!(report.trend.is_none());
        assert!(report.concerns.is_empty());
    }

    #[test]
    fn report_covers_every_output() {
        let report = aggregate(&lake_snapshot(), &AnalysisConfig::default());
        assert_eq!(report.chlorophyll.len(), 1);
        assert_eq!(report.nitrite.len(), 1);
        assert_eq!(report.metal_list, vec!["Fe", "Pb"]);
        assert_eq!(report.metal_trends.len(), 2);
        assert_eq!(report.thresholds.len(), 8);
        let lead = report.thresholds.iter().find(|r| r.metal_name == "Pb").unwrap();
        assert!(lead.is_unsafe());
        assert_eq!(report.extremes.len(), 1);
        assert_eq!(report.ecoli_flood_points.len(), 1);
        assert!(report.flood_months.is_empty());
        assert_eq!(report.flood_correlation.coefficient, None);
        assert_eq!(report.correlation_fields.chemicals.len(), 3);
        assert!(report.correlation_fields.ecoli.contains(&"flood_in_month".to_string()));
        assert_eq!(report.find_sites("unk").len(), 1);
    }

    #[test]
    fn empty_snapshot_gives_empty_collections() {
        let report = aggregate(&Snapshot::default(), &AnalysisConfig::default());
        assert!(report.chlorophyll.is_empty());
        assert!(report.sites.is_empty());
        assert!(report.metals.is_empty());
        assert!(report.yearly.is_empty());
        assert_eq!(report.thresholds.len(), 8);
        assert_eq!(report.skipped_total(), 0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sites"], json!([]));
        assert!(json.get("chemicals").is_none());
    }

    #[test]
    fn correlation_runs_over_retained_samples() {
        let snapshot = Snapshot::from_root(&json!({
            "Chemicals_Height": { "2020": [{ "01": [
                { "chl_ug_l_avg": 1.0, "avg_nitrate": 3.0 },
                { "chl_ug_l_avg": 2.0, "avg_nitrate": 2.0 },
                { "chl_ug_l_avg": 3.0, "avg_nitrate": 1.0 }
            ] }] }
        }));
        let report = aggregate(&snapshot, &AnalysisConfig::default());
        let corr = report.correlate(SampleGroup::Chemicals, "chl_ug_l_avg", "avg_nitrate");
        assert!((corr.coefficient.unwrap() + 1.0).abs() < 1e-12);
        let same = report.correlate(SampleGroup::Chemicals, "avg_nitrate", "avg_nitrate");
        assert_eq!(same.coefficient, Some(1.0));
        assert_eq!(report.correlate(SampleGroup::Metals, "Pb_µg_L", "Fe_µg_L").coefficient, None);
    }

    #[test]
    fn cache_recomputes_only_for_new_generations() {
        let config = AnalysisConfig::default();
        let mut cache = ReportCache::new();
        assert_eq!(cache.generation(), None);

        let first = cache.get_or_compute(1, &lake_snapshot(), &config).sites.len();
        assert_eq!(first, 1);

        // same generation keeps the cached report even for a different snapshot
        let cached = cache.get_or_compute(1, &Snapshot::default(), &config);
        assert_eq!(cached.sites.len(), 1);

        let fresh = cache.get_or_compute(2, &Snapshot::default(), &config);
        assert!(fresh.sites.is_empty());
        assert_eq!(cache.generation(), Some(2));

        cache.invalidate();
        assert_eq!(cache.generation(), None);
        let rebuilt = cache.get_or_compute(2, &lake_snapshot(), &config);
        assert_eq!(rebuilt.sites.len(), 1);
    }

    #[test]
    fn cache_recomputes_when_config_changes() {
        let snapshot = Snapshot::from_root(&json!({ "Chemicals_Height": {
            "2019": [{ "01": [{ "chl_ug_l_avg": 5.0 }] }],
            "2020": [{ "01": [{ "chl_ug_l_avg": 10.0 }] }]
        } }));
        let config = AnalysisConfig::default();
        let mut cache = ReportCache::new();
        assert_eq!(cache.get_or_compute(1, &snapshot, &config).concerns.len(), 1);

        let mut strict = config.clone();
        strict.concerns.chlorophyll_spike_pct = 200.0;
        assert!(cache.get_or_compute(1, &snapshot, &strict).concerns.is_empty());
        assert_eq!(cache.generation(), Some(1));

        assert_eq!(cache.get_or_compute(1, &snapshot, &config).concerns.len(), 1);
    }

    #[test]
    fn undated_samples_still_reach_sites_yearly_and_metals() {
        let snapshot = Snapshot::from_root(&json!({
            "Ecolifloods": { "2020": [null, {
                "30": [{ "Ecoli": 50, "beach": "North" }],
                "01": [{ "Ecoli": 10, "beach": "North" }]
            }] },
            "Heavy_Metals": { "5": { "2020": [{ "d1": [{ "Pb_µg_L": 0.02 }] }] } }
        }));
        let report = aggregate(&snapshot, &AnalysisConfig::default());

        assert_eq!(report.sites.len(), 1);
        assert_eq!(report.sites[0].site_name, "North");
        assert_eq!(report.sites[0].average, 30.0);
        assert_eq!(report.sites[0].count, 2);

        assert_eq!(report.yearly.len(), 1);
        assert_eq!(report.yearly[0].ecoli_avg, 30.0);

        assert_eq!(report.metal_list, vec!["Pb"]);
        let lead = report.thresholds.iter().find(|r| r.metal_name == "Pb").unwrap();
        assert_eq!(lead.measured_average, 0.02);
        assert!(lead.is_unsafe());

        assert_eq!(report.ecoli_flood_points.len(), 1);
        assert_eq!(report.skipped.get(&SkipReason::UnresolvableDate), Some(&2));
        assert_eq!(report.skipped.get(&SkipReason::Null), Some(&1));
    }
}
