//! Record Flattener.
//!
//! Walks the nested `year -> month array -> day key -> sample array` layout
//! (with an extra outer depth layer for heavy metals) and produces one
//! [`FlatRecord`] per sample object. Each branch of the walk resolves to a
//! [`Branch`]: either a record or a [`Skip`] naming where and why the walk
//! gave up on that branch. Nothing under a skipped branch is produced and
//! nothing outside it is affected.

use crate::dataset::Dataset;
use crate::error::SkipReason;
use crate::flood::FloodIndicator;
use crate::metric::{DATE_FIELD, FLOOD_FIELD, FLOOD_IN_MONTH_FIELD};
use crate::snapshot::Snapshot;
use chrono::NaiveDate;
use eco_utils::dates::{parse_sample_date, synthesize_date};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Position of a branch inside the nested snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchPath {
    pub depth: Option<String>,
    pub year: Option<String>,
    /// 1-based month
    pub month: Option<u32>,
    pub day: Option<String>,
    /// Index of the sample within its day array
    pub sample: Option<usize>,
}

impl fmt::Display for BranchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(depth) = &self.depth {
            parts.push(format!("depth={depth}"));
        }
        if let Some(year) = &self.year {
            parts.push(format!("year={year}"));
        }
        if let Some(month) = self.month {
            parts.push(format!("month={month}"));
        }
        if let Some(day) = &self.day {
            parts.push(format!("day={day}"));
        }
        if let Some(sample) = self.sample {
            parts.push(format!("sample={sample}"));
        }
        if parts.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&parts.join("/"))
        }
    }
}

/// A branch the flattener could not read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skip {
    pub dataset: Dataset,
    pub path: BranchPath,
    pub reason: SkipReason,
}

/// A raw sample object annotated with its resolved position.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord {
    pub dataset: Dataset,
    pub path: BranchPath,
    pub year: i32,
    /// 1-based month, from the position in the month array
    pub month: u32,
    /// Day of month parsed from the day key, if it is numeric
    pub day: Option<u32>,
    /// Depth in meters, heavy metals only
    pub depth: Option<f64>,
    /// Explicit `date` field if parseable, otherwise synthesized from the nesting.
    /// `None` when neither yields a calendar date; the record is still kept.
    pub date: Option<NaiveDate>,
    /// Month-level `flood` attribute
    pub month_flood: Option<FloodIndicator>,
    /// Month-level `flood_in_month` attribute
    pub month_flood_in_month: Option<FloodIndicator>,
    /// The sample's own fields, copied from the snapshot
    pub fields: Map<String, Value>,
}

pub type Branch = Result<FlatRecord, Skip>;

/// Records produced by one flattening pass, plus every skipped branch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenReport {
    pub records: Vec<FlatRecord>,
    pub skipped: Vec<Skip>,
}

impl FromIterator<Branch> for FlattenReport {
    fn from_iter<I: IntoIterator<Item = Branch>>(iter: I) -> Self {
        let mut report = FlattenReport::default();
        for branch in iter {
            match branch {
                Ok(record) => report.records.push(record),
                Err(skip) => report.skipped.push(skip),
            }
        }
        report
    }
}

/// Flatten one dataset of a snapshot.
pub fn flatten_dataset(snapshot: &Snapshot, dataset: Dataset) -> FlattenReport {
    let root = snapshot.dataset(dataset);
    let mut branches = Vec::new();
    if dataset.has_depth() {
        walk_depths(dataset, root, &mut branches);
    } else {
        walk_years(dataset, root, &BranchPath::default(), None, &mut branches);
    }
    let report: FlattenReport = branches.into_iter().collect();
    log::debug!(
        "[Eco Debug] flatten: {} yielded {} records, skipped {} branches",
        dataset,
        report.records.len(),
        report.skipped.len()
    );
    report
}

fn skip(dataset: Dataset, path: &BranchPath, reason: SkipReason) -> Branch {
    Err(Skip {
        dataset,
        path: path.clone(),
        reason,
    })
}

/// Classify a value that should have been a container.
fn shape_reason(value: &Value, expected_array: bool) -> SkipReason {
    match value {
        Value::Null => SkipReason::Null,
        _ if expected_array => SkipReason::NotAnArray,
        _ => SkipReason::NotAnObject,
    }
}

fn walk_depths(dataset: Dataset, root: &Value, out: &mut Vec<Branch>) {
    // A realtime database may hand back small integer-keyed objects as arrays.
    let entries: Vec<(String, &Value)> = match root {
        Value::Null => return,
        Value::Object(depths) => depths.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(depths) => depths
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => {
            out.push(skip(dataset, &BranchPath::default(), SkipReason::NotAnObject));
            return;
        }
    };

    for (depth_key, years) in entries {
        let path = BranchPath {
            depth: Some(depth_key.clone()),
            ..BranchPath::default()
        };
        let depth = match depth_key.trim().parse::<f64>() {
            Ok(d) if d.is_finite() => d,
            _ => {
                out.push(skip(dataset, &path, SkipReason::InvalidDepth));
                continue;
            }
        };
        if !years.is_object() {
            out.push(skip(dataset, &path, shape_reason(years, false)));
            continue;
        }
        walk_years(dataset, years, &path, Some(depth), out);
    }
}

fn walk_years(
    dataset: Dataset,
    years: &Value,
    parent: &BranchPath,
    depth: Option<f64>,
    out: &mut Vec<Branch>,
) {
    let years = match years {
        Value::Null => return,
        Value::Object(years) => years,
        other => {
            out.push(skip(dataset, parent, shape_reason(other, false)));
            return;
        }
    };

    for (year_key, months) in years {
        let path = BranchPath {
            year: Some(year_key.clone()),
            ..parent.clone()
        };
        let year = match year_key.trim().parse::<i32>() {
            Ok(y) => y,
            Err(_) => {
                out.push(skip(dataset, &path, SkipReason::InvalidYear));
                continue;
            }
        };
        let months = match months {
            Value::Array(months) => months,
            other => {
                out.push(skip(dataset, &path, shape_reason(other, true)));
                continue;
            }
        };
        for (month_index, month) in months.iter().enumerate() {
            let month_path = BranchPath {
                month: Some(month_index as u32 + 1),
                ..path.clone()
            };
            let position = Position {
                dataset,
                year_key,
                year,
                month: month_index as u32 + 1,
                depth,
            };
            walk_month(&position, month, &month_path, out);
        }
    }
}

/// Where a month sits in the nesting.
struct Position<'a> {
    dataset: Dataset,
    year_key: &'a str,
    year: i32,
    month: u32,
    depth: Option<f64>,
}

fn walk_month(position: &Position<'_>, month: &Value, path: &BranchPath, out: &mut Vec<Branch>) {
    let dataset = position.dataset;
    let days = match month {
        Value::Object(days) => days,
        other => {
            out.push(skip(dataset, path, shape_reason(other, false)));
            return;
        }
    };
    let month_flood = days.get(FLOOD_FIELD).and_then(FloodIndicator::from_value);
    let month_flood_in_month = days
        .get(FLOOD_IN_MONTH_FIELD)
        .and_then(FloodIndicator::from_value);

    for (day_key, samples) in days {
        if day_key == FLOOD_FIELD || day_key == FLOOD_IN_MONTH_FIELD {
            continue;
        }
        let day_path = BranchPath {
            day: Some(day_key.clone()),
            ..path.clone()
        };
        let samples = match samples {
            Value::Array(samples) => samples,
            other => {
                out.push(skip(dataset, &day_path, shape_reason(other, true)));
                continue;
            }
        };
        for (index, sample) in samples.iter().enumerate() {
            let sample_path = BranchPath {
                sample: Some(index),
                ..day_path.clone()
            };
            let fields = match sample {
                Value::Object(fields) => fields,
                other => {
                    out.push(skip(dataset, &sample_path, shape_reason(other, false)));
                    continue;
                }
            };
            let date = resolve_date(fields, position, day_key);
            out.push(Ok(FlatRecord {
                dataset,
                path: sample_path,
                year: position.year,
                month: position.month,
                day: day_key.trim().parse::<u32>().ok(),
                depth: position.depth,
                date,
                month_flood,
                month_flood_in_month,
                fields: fields.clone(),
            }));
        }
    }
}

/// Prefer the sample's own `date`, else synthesize one from the nesting.
fn resolve_date(fields: &Map<String, Value>, position: &Position<'_>, day_key: &str) -> Option<NaiveDate> {
    fields
        .get(DATE_FIELD)
        .and_then(Value::as_str)
        .and_then(parse_sample_date)
        .or_else(|| {
            parse_sample_date(&synthesize_date(
                position.year_key.trim(),
                position.month,
                day_key,
            ))
        })
}
