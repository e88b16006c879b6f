//! Whole-document rewrites applied to a static snapshot file.
//!
//! These walk the raw JSON at any depth and are independent of the
//! year/month/day layout, so they also reach attributes stored at the
//! month level.

use crate::dataset::Dataset;
use crate::metric::{ECOLI_FIELD, FLOOD_FIELD, FLOOD_IN_MONTH_FIELD};
use serde_json::Value;

/// Keys marking generated test data.
pub const SYNTHETIC_KEYS: [&str; 2] = ["synthetic", "synthetic_source"];

/// Rewrite boolean `flood` / `flood_in_month` values to 1/0 in place.
///
/// Returns the number of values changed. Values that are not booleans are
/// left untouched.
pub fn normalize_flood_flags(value: &mut Value) -> usize {
    match value {
        Value::Array(items) => items.iter_mut().map(normalize_flood_flags).sum(),
        Value::Object(map) => {
            let mut changed = 0;
            for (key, child) in map.iter_mut() {
                if key == FLOOD_FIELD || key == FLOOD_IN_MONTH_FIELD {
                    if let Value::Bool(flag) = child {
                        *child = Value::from(u8::from(*flag));
                        changed += 1;
                    }
                } else {
                    changed += normalize_flood_flags(child);
                }
            }
            changed
        }
        _ => 0,
    }
}

/// Remove the [`SYNTHETIC_KEYS`] at any depth. Returns the number removed.
pub fn strip_synthetic(value: &mut Value) -> usize {
    match value {
        Value::Array(items) => items.iter_mut().map(strip_synthetic).sum(),
        Value::Object(map) => {
            let before = map.len();
            map.retain(|key, _| !SYNTHETIC_KEYS.contains(&key.as_str()));
            let removed = before - map.len();
            removed + map.values_mut().map(strip_synthetic).sum::<usize>()
        }
        _ => 0,
    }
}

/// An E.coli sample whose flood flag and count are both stored as numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericFloodSample {
    pub year: String,
    pub month_key: String,
    pub flood_in_month: f64,
    pub ecoli: f64,
}

/// Collect E.coli samples whose `flood_in_month` and `Ecoli` are JSON numbers.
///
/// Unlike [`crate::sample::Sample`], no coercion is applied: this is an
/// audit of how the stored data is typed.
pub fn numeric_flood_samples(root: &Value) -> Vec<NumericFloodSample> {
    let mut found = Vec::new();
    let Some(years) = root.get(Dataset::Ecolifloods.key()).and_then(Value::as_object) else {
        return found;
    };
    for (year, months) in years {
        let Some(months) = months.as_array() else { continue };
        for month in months.iter().filter_map(Value::as_object) {
            for (month_key, samples) in month {
                let Some(samples) = samples.as_array() else { continue };
                for sample in samples {
                    let flood = sample.get(FLOOD_IN_MONTH_FIELD).filter(|v| v.is_number());
                    let ecoli = sample.get(ECOLI_FIELD).filter(|v| v.is_number());
                    if let (Some(flood), Some(ecoli)) =
                        (flood.and_then(Value::as_f64), ecoli.and_then(Value::as_f64))
                    {
                        found.push(NumericFloodSample {
                            year: year.clone(),
                            month_key: month_key.clone(),
                            flood_in_month: flood,
                            ecoli,
                        });
                    }
                }
            }
        }
    }
    found
}
