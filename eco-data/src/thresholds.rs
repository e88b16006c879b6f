//! Threshold Evaluator: heavy-metal averages against fixed safety limits.

use crate::aggregate::MetalProfile;
use eco_core::metric::Metal;
use serde::Serialize;

/// Safety limits in µg/L, in presentation order.
pub const SAFETY_THRESHOLDS: [(Metal, f64); 8] = [
    (Metal::Cd, 0.005),
    (Metal::Pb, 0.01),
    (Metal::Hg, 1.0),
    (Metal::Cu, 1.0),
    (Metal::Zn, 10.0),
    (Metal::Fe, 300.0),
    (Metal::Mn, 50.0),
    (Metal::Al, 200.0),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdRow {
    pub metal_name: String,
    pub label: String,
    pub measured_average: f64,
    pub safety_threshold: f64,
}

impl ThresholdRow {
    /// Strictly above the limit; an average equal to it is safe.
    pub fn is_unsafe(&self) -> bool {
        self.measured_average > self.safety_threshold
    }
}

/// One row per table entry. Metals never observed report an average of 0.
pub fn evaluate_thresholds(profiles: &[MetalProfile]) -> Vec<ThresholdRow> {
    SAFETY_THRESHOLDS
        .iter()
        .map(|(metal, threshold)| {
            let measured_average = profiles
                .iter()
                .find(|p| p.metal_name == metal.symbol())
                .map(|p| p.average)
                .unwrap_or(0.0);
            ThresholdRow {
                metal_name: metal.symbol().to_string(),
                label: format!("{} ({})", metal.label(), metal.symbol()),
                measured_average,
                safety_threshold: *threshold,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(metal: &str, average: f64) -> MetalProfile {
        MetalProfile {
            metal_name: metal.to_string(),
            average,
            min: average,
            max: average,
            count: 1,
            per_depth: Vec::new(),
        }
    }

    #[test]
    fn lead_above_limit_is_unsafe() {
        let rows = evaluate_thresholds(&[profile("Pb", 0.02)]);
        let lead = rows.iter().find(|r| r.metal_name == "Pb").unwrap();
        assert_eq!(lead.measured_average, 0.02);
        assert_eq!(lead.safety_threshold, 0.01);
        assert_eq!(lead.label, "Lead (Pb)");
        assert!(lead.is_unsafe());
    }

    #[test]
    fn equal_to_limit_is_safe() {
        let rows = evaluate_thresholds(&[profile("Fe", 300.0)]);
        let iron = rows.iter().find(|r| r.metal_name == "Fe").unwrap();
        assert!(!iron.is_unsafe());
    }

    #[test]
    fn every_table_entry_gets_a_row() {
        let rows = evaluate_thresholds(&[]);
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].metal_name, "Cd");
        assert_eq!(rows[7].metal_name, "Al");
        assert!(rows.iter().all(|r| r.measured_average == 0.0 && !r.is_unsafe()));
    }
}
