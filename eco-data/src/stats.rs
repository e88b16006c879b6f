//! Statistical Analyzers: Pearson correlation and its interpretation.

use eco_core::metric::Metric;
use eco_core::sample::Sample;
use log::debug;
use serde::Serialize;

/// Pearson correlation coefficient of two equal-length series.
///
/// `None` when the lengths differ or fewer than two values are given.
/// Zero variance in either series is not guarded and yields `NaN`.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n != y.len() || n < 2 {
        return None;
    }
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;
    let (mut num, mut den_x, mut den_y) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        num += dx * dy;
        den_x += dx * dx;
        den_y += dy * dy;
    }
    Some(num / (den_x * den_y).sqrt())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Coefficient and underlying points for a chosen pair of fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCorrelation {
    pub x_field: String,
    pub y_field: String,
    pub points: Vec<Point>,
    pub coefficient: Option<f64>,
}

impl FieldCorrelation {
    pub fn strength(&self) -> Option<CorrelationStrength> {
        self.coefficient.map(CorrelationStrength::classify)
    }
}

/// Correlate two fields over every sample holding numbers in both.
///
/// Selecting the same field twice yields exactly `1` as soon as there is a
/// point, without evaluating the formula.
pub fn correlate_fields(samples: &[Sample], x_field: &str, y_field: &str) -> FieldCorrelation {
    let points: Vec<Point> = samples
        .iter()
        .filter_map(|s| match (s.value(x_field), s.value(y_field)) {
            (Some(x), Some(y)) => Some(Point { x, y }),
            _ => None,
        })
        .collect();
    let coefficient = if x_field == y_field {
        (!points.is_empty()).then_some(1.0)
    } else {
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        pearson(&xs, &ys)
    };
    FieldCorrelation {
        x_field: x_field.to_string(),
        y_field: y_field.to_string(),
        points,
        coefficient,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorrelationStrength {
    StrongPositive,
    ModeratePositive,
    Weak,
    ModerateNegative,
    StrongNegative,
    /// Not a finite coefficient, e.g. from zero variance
    Degenerate,
}

impl CorrelationStrength {
    pub fn classify(r: f64) -> CorrelationStrength {
        if !r.is_finite() {
            CorrelationStrength::Degenerate
        } else if r > 0.7 {
            CorrelationStrength::StrongPositive
        } else if r < -0.7 {
            CorrelationStrength::StrongNegative
        } else if r >= 0.3 {
            CorrelationStrength::ModeratePositive
        } else if r <= -0.3 {
            CorrelationStrength::ModerateNegative
        } else {
            CorrelationStrength::Weak
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CorrelationStrength::StrongPositive => {
                "Strong positive correlation: as X increases, Y tends to increase."
            }
            CorrelationStrength::StrongNegative => {
                "Strong negative correlation: as X increases, Y tends to decrease."
            }
            CorrelationStrength::ModeratePositive => "Moderate positive correlation.",
            CorrelationStrength::ModerateNegative => "Moderate negative correlation.",
            CorrelationStrength::Weak => "Weak or no correlation.",
            CorrelationStrength::Degenerate => "Not enough variation to calculate correlation.",
        }
    }
}

/// Correlation between a 0/1 flood indicator and E.coli counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloodCorrelation {
    pub coefficient: Option<f64>,
    pub flood_count: usize,
    pub non_flood_count: usize,
    pub total_valid: usize,
}

/// Pair every valid E.coli value with whether its sample was a flood.
///
/// The coefficient is only computed with at least two pairs and both
/// flood and non-flood samples present.
pub fn flood_ecoli_correlation(ecoli: &[Sample]) -> FloodCorrelation {
    let (floods, counts): (Vec<f64>, Vec<f64>) = ecoli
        .iter()
        .filter_map(|s| {
            s.value(Metric::Ecoli.field())
                .map(|count| (if s.is_flood() { 1.0 } else { 0.0 }, count))
        })
        .unzip();
    let flood_count = floods.iter().filter(|f| **f == 1.0).count();
    let non_flood_count = floods.len() - flood_count;
    let coefficient = if floods.len() > 1 && flood_count > 0 && non_flood_count > 0 {
        pearson(&floods, &counts)
    } else {
        None
    };
    debug!(
        "[Eco Debug] stats: flood/E.coli pairs={} flood={} non_flood={}",
        floods.len(),
        flood_count,
        non_flood_count
    );
    FloodCorrelation {
        coefficient,
        flood_count,
        non_flood_count,
        total_valid: floods.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_core::dataset::Dataset;
    use eco_core::sample::SampleBatch;
    use eco_core::snapshot::Snapshot;
    use serde_json::{json, Value};

    fn samples(dataset: Dataset, value: Value) -> Vec<Sample> {
        let snapshot = Snapshot::default().with_dataset(dataset, value);
        SampleBatch::from_snapshot(&snapshot, dataset).samples
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn perfect_correlations() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert!(close(pearson(&x, &x).unwrap(), 1.0));
        assert!(close(pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap(), -1.0));
    }

    #[test]
    fn undefined_inputs_give_none() {
        assert_eq!(pearson(&[], &[]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn correlation_is_symmetric() {
        let x = [1.0, 4.0, 2.0, 8.0, 5.0];
        let y = [2.0, 3.0, 9.0, 1.0, 7.0];
        let xy = pearson(&x, &y).unwrap();
        let yx = pearson(&y, &x).unwrap();
        assert!(close(xy, yx));
        assert!((-1.0..=1.0).contains(&xy));
    }

    #[test]
    fn zero_variance_propagates_nan() {
        let r = pearson(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!(r.is_nan());
        assert_eq!(CorrelationStrength::classify(r), CorrelationStrength::Degenerate);
    }

    #[test]
    fn same_field_is_exactly_one() {
        let chem = samples(
            Dataset::ChemicalsHeight,
            json!({ "2020": [{ "01": [{ "chl_ug_l_avg": 4.0 }, { "chl_ug_l_avg": 4.0 }] }] }),
        );
        let corr = correlate_fields(&chem, "chl_ug_l_avg", "chl_ug_l_avg");
        assert_eq!(corr.coefficient, Some(1.0));
        assert_eq!(corr.points.len(), 2);

        let single = correlate_fields(&chem[..1], "chl_ug_l_avg", "chl_ug_l_avg");
        assert_eq!(single.coefficient, Some(1.0));
        assert_eq!(correlate_fields(&[], "x", "x").coefficient, None);
    }

    #[test]
    fn correlation_uses_samples_with_both_fields() {
        let chem = samples(
            Dataset::ChemicalsHeight,
            json!({ "2020": [{ "01": [
                { "chl_ug_l_avg": 1.0, "avg_nitrate": 2.0 },
                { "chl_ug_l_avg": 2.0, "avg_nitrate": 4.0 },
                { "chl_ug_l_avg": 3.0 },
                { "chl_ug_l_avg": 3.0, "avg_nitrate": 6.0 }
            ] }] }),
        );
        let corr = correlate_fields(&chem, "chl_ug_l_avg", "avg_nitrate");
        assert_eq!(corr.points.len(), 3);
        assert!(close(corr.coefficient.unwrap(), 1.0));
        assert_eq!(corr.strength(), Some(CorrelationStrength::StrongPositive));
    }

    #[test]
    fn strength_boundaries() {
        assert_eq!(CorrelationStrength::classify(0.71), CorrelationStrength::StrongPositive);
        assert_eq!(CorrelationStrength::classify(0.7), CorrelationStrength::ModeratePositive);
        assert_eq!(CorrelationStrength::classify(0.3), CorrelationStrength::ModeratePositive);
        assert_eq!(CorrelationStrength::classify(0.29), CorrelationStrength::Weak);
        assert_eq!(CorrelationStrength::classify(-0.3), CorrelationStrength::ModerateNegative);
        assert_eq!(CorrelationStrength::classify(-0.7), CorrelationStrength::ModerateNegative);
        assert_eq!(CorrelationStrength::classify(-0.8), CorrelationStrength::StrongNegative);
    }

    #[test]
    fn flood_indicator_correlates_with_ecoli() {
        let ecoli = samples(
            Dataset::Ecolifloods,
            json!({ "2020": [
                { "flood_in_month": true, "01": [{ "Ecoli": 900 }, { "Ecoli": 1100 }] },
                { "01": [{ "Ecoli": 100, "flood_in_month": 0 }, { "Ecoli": 120 }, { "beach": "x" }] }
            ] }),
        );
        let corr = flood_ecoli_correlation(&ecoli);
        assert_eq!(corr.flood_count, 2);
        assert_eq!(corr.non_flood_count, 2);
        assert_eq!(corr.total_valid, 4);
        assert!(corr.coefficient.unwrap() > 0.9);
    }

    #[test]
    fn flood_correlation_needs_both_groups() {
        let ecoli = samples(
            Dataset::Ecolifloods,
            json!({ "2020": [{ "01": [{ "Ecoli": 10, "flood": 1 }, { "Ecoli": 20, "flood": 1 }] }] }),
        );
        let corr = flood_ecoli_correlation(&ecoli);
        assert_eq!(corr.coefficient, None);
        assert_eq!(corr.flood_count, 2);
        assert_eq!(corr.non_flood_count, 0);
    }
}
