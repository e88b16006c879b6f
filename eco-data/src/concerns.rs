//! Year-over-year spike and absolute-level concern detection.

use crate::aggregate::YearlyRollup;
use crate::config::ConcernThresholds;
use eco_core::metric::Metric;
use eco_utils::format::{fixed, percent_change};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConcernKind {
    /// Chlorophyll spike
    EutrophicationCrisis,
    /// Nitrate spike
    NutrientPollutionCrisis,
    /// E.coli spike
    FecalContaminationOutbreak,
    /// Chlorophyll above the absolute limit
    SevereEutrophicationEvent,
    /// Nitrate above the absolute limit
    NitrateContaminationAlert,
    /// E.coli above the absolute limit
    HealthCrisisAlert,
}

impl ConcernKind {
    pub fn label(&self) -> &'static str {
        match self {
            ConcernKind::EutrophicationCrisis => "Eutrophication Crisis",
            ConcernKind::NutrientPollutionCrisis => "Nutrient Pollution Crisis",
            ConcernKind::FecalContaminationOutbreak => "Fecal Contamination Outbreak",
            ConcernKind::SevereEutrophicationEvent => "Severe Eutrophication Event",
            ConcernKind::NitrateContaminationAlert => "Nitrate Contamination Alert",
            ConcernKind::HealthCrisisAlert => "Health Crisis Alert",
        }
    }

    pub fn impact(&self) -> &'static str {
        match self {
            ConcernKind::EutrophicationCrisis => {
                "Severe algal blooms, oxygen depletion, fish kills, and ecosystem collapse"
            }
            ConcernKind::NutrientPollutionCrisis => {
                "Groundwater contamination, drinking water unsafe, blue baby syndrome risk"
            }
            ConcernKind::FecalContaminationOutbreak => {
                "Beach closures, waterborne diseases, tourism losses, public health emergency"
            }
            ConcernKind::SevereEutrophicationEvent => {
                "Massive algal blooms, dead zones, complete ecosystem disruption"
            }
            ConcernKind::NitrateContaminationAlert => {
                "Drinking water unsafe, infant health risks, environmental degradation"
            }
            ConcernKind::HealthCrisisAlert => {
                "Public health emergency, all water activities prohibited"
            }
        }
    }

    pub fn likely_causes(&self) -> &'static str {
        match self {
            ConcernKind::EutrophicationCrisis => {
                "Agricultural runoff peak, sewage overflow, or fertilizer dumping"
            }
            ConcernKind::NutrientPollutionCrisis => {
                "Intensive farming season, fertilizer overuse, or livestock waste event"
            }
            ConcernKind::FecalContaminationOutbreak => {
                "Sewage system failure, septic overflow, or storm-related contamination"
            }
            ConcernKind::SevereEutrophicationEvent => {
                "Perfect storm of nutrients, temperature, and weather conditions"
            }
            ConcernKind::NitrateContaminationAlert => {
                "Agricultural pollution peak or water treatment failure"
            }
            ConcernKind::HealthCrisisAlert => "Major sewage incident or catastrophic system failure",
        }
    }

    fn spike(metric: Metric) -> Option<ConcernKind> {
        match metric {
            Metric::Chlorophyll => Some(ConcernKind::EutrophicationCrisis),
            Metric::Nitrate => Some(ConcernKind::NutrientPollutionCrisis),
            Metric::Ecoli => Some(ConcernKind::FecalContaminationOutbreak),
            Metric::Nitrite => None,
        }
    }

    fn breach(metric: Metric) -> Option<ConcernKind> {
        match metric {
            Metric::Chlorophyll => Some(ConcernKind::SevereEutrophicationEvent),
            Metric::Nitrate => Some(ConcernKind::NitrateContaminationAlert),
            Metric::Ecoli => Some(ConcernKind::HealthCrisisAlert),
            Metric::Nitrite => None,
        }
    }
}

/// A flagged year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Concern {
    pub kind: ConcernKind,
    pub label: &'static str,
    pub year: i32,
    /// Year-over-year change; `None` for absolute breaches
    pub percent_change: Option<f64>,
    pub description: String,
    pub values: String,
    pub impact: &'static str,
    pub likely_causes: &'static str,
}

impl Concern {
    fn new(
        kind: ConcernKind,
        year: i32,
        percent_change: Option<f64>,
        description: String,
        values: String,
    ) -> Concern {
        Concern {
            kind,
            label: kind.label(),
            year,
            percent_change,
            description,
            values,
            impact: kind.impact(),
            likely_causes: kind.likely_causes(),
        }
    }
}

const TRACKED: [Metric; 3] = [Metric::Chlorophyll, Metric::Nitrate, Metric::Ecoli];

fn spike_threshold(metric: Metric, t: &ConcernThresholds) -> f64 {
    match metric {
        Metric::Chlorophyll => t.chlorophyll_spike_pct,
        Metric::Nitrate => t.nitrate_spike_pct,
        _ => t.ecoli_spike_pct,
    }
}

fn absolute_threshold(metric: Metric, t: &ConcernThresholds) -> f64 {
    match metric {
        Metric::Chlorophyll => t.chlorophyll_max,
        Metric::Nitrate => t.nitrate_max,
        _ => t.ecoli_max,
    }
}

/// Headline and percent suffix of a spike description.
fn spike_wording(metric: Metric) -> (&'static str, &'static str) {
    match metric {
        Metric::Chlorophyll => ("Massive chlorophyll-a spike", "% increase from previous year"),
        Metric::Nitrate => ("Critical nitrate contamination", "% surge"),
        _ => ("E.coli outbreak", "% explosion"),
    }
}

fn breach_wording(metric: Metric) -> (&'static str, &'static str) {
    match metric {
        Metric::Chlorophyll => ("Extremely high chlorophyll levels", "Critical threshold exceeded"),
        Metric::Nitrate => ("Dangerous nitrate levels", "EPA limit exceeded"),
        _ => ("Extreme E.coli contamination", "Swimming ban threshold exceeded"),
    }
}

/// Scan rollups (oldest first) for spikes and absolute-level breaches.
///
/// A spike check is skipped when the previous year's average is zero.
/// The result holds one concern per `(year, kind)`, newest year first.
pub fn detect_concerns(rollups: &[YearlyRollup], thresholds: &ConcernThresholds) -> Vec<Concern> {
    let mut concerns = Vec::new();
    for (index, current) in rollups.iter().enumerate() {
        for metric in TRACKED {
            let Some(now) = current.average(metric) else { continue };
            let places = metric.display_places();
            let unit = metric.unit();

            if let Some(previous) = index.checked_sub(1).map(|i| &rollups[i]) {
                let before = previous.average(metric).unwrap_or(0.0);
                let change = percent_change(before, now);
                if let (Some(change), Some(kind)) = (change, ConcernKind::spike(metric)) {
                    if change > spike_threshold(metric, thresholds) {
                        let (headline, suffix) = spike_wording(metric);
                        concerns.push(Concern::new(
                            kind,
                            current.year,
                            Some(change),
                            format!(
                                "{} in {}: {}{}",
                                headline,
                                current.year,
                                fixed(change, 1),
                                suffix
                            ),
                            format!("{} → {} {}", fixed(before, places), fixed(now, places), unit),
                        ));
                    }
                }
            }

            let limit = absolute_threshold(metric, thresholds);
            if now <= limit {
                continue;
            }
            if let Some(kind) = ConcernKind::breach(metric) {
                let (headline, verdict) = breach_wording(metric);
                concerns.push(Concern::new(
                    kind,
                    current.year,
                    None,
                    format!("{} in {}: {} {}", headline, current.year, fixed(now, places), unit),
                    format!("{} (>{} {})", verdict, limit, unit),
                ));
            }
        }
    }

    let mut seen = HashSet::new();
    concerns.retain(|c| seen.insert((c.year, c.kind)));
    concerns.sort_by(|a, b| b.year.cmp(&a.year));
    concerns
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

/// First-to-last-year movement of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTrend {
    pub metric: Metric,
    pub first: f64,
    pub last: f64,
    /// `0` when the first-year average is zero
    pub percent_change: f64,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    pub first_year: i32,
    pub last_year: i32,
    pub trends: Vec<MetricTrend>,
}

/// Compare the first and last rollups. `None` with fewer than two years.
pub fn trend_summary(rollups: &[YearlyRollup], stable_band: f64) -> Option<TrendSummary> {
    let (first, last) = match rollups {
        [first, .., last] => (first, last),
        _ => return None,
    };
    let trends = TRACKED
        .iter()
        .filter_map(|metric| {
            let from = first.average(*metric)?;
            let to = last.average(*metric)?;
            let change = if from > 0.0 {
                percent_change(from, to).unwrap_or(0.0)
            } else {
                0.0
            };
            let direction = if change.abs() < stable_band {
                TrendDirection::Stable
            } else if change > 0.0 {
                TrendDirection::Rising
            } else {
                TrendDirection::Falling
            };
            Some(MetricTrend {
                metric: *metric,
                first: from,
                last: to,
                percent_change: change,
                direction,
            })
        })
        .collect();
    Some(TrendSummary {
        first_year: first.year,
        last_year: last.year,
        trends,
    })
}
