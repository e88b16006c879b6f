use crate::dataset::Dataset;
use crate::error::SkipReason;
use crate::flatten::{flatten_dataset, FlatRecord, Skip};
use crate::flood::FloodIndicator;
use crate::metric::{BEACH_FIELD, BEACH_NAME_FIELD, FLOOD_FIELD, FLOOD_IN_MONTH_FIELD, UNKNOWN_SITE};
use crate::snapshot::Snapshot;
use crate::value::{finite_number, non_empty_str};
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// A single observation.
///
/// Only built from records holding at least one finite value in one of the
/// dataset's relevant fields (see [`Dataset::relevant_fields`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub dataset: Dataset,
    /// `None` when no calendar date could be resolved
    pub date: Option<NaiveDate>,
    pub year: i32,
    pub month: u32,
    pub day: Option<u32>,
    pub depth: Option<f64>,
    /// `flood`, from the sample or else its month
    pub flood_flag: Option<FloodIndicator>,
    /// `flood_in_month`, from the sample or else its month
    pub flood_in_month: Option<FloodIndicator>,
    fields: Map<String, Value>,
}

impl Sample {
    /// Numeric value of a field.
    ///
    /// Flood fields answer with their normalized 0/1 indicator; every other
    /// field must hold a number or a numeric string.
    pub fn value(&self, field: &str) -> Option<f64> {
        match field {
            FLOOD_FIELD => self.flood_flag.map(|f| f.as_f64()),
            FLOOD_IN_MONTH_FIELD => self.flood_in_month.map(|f| f.as_f64()),
            _ => self.fields.get(field).and_then(finite_number),
        }
    }

    /// Raw field value as stored in the snapshot.
    pub fn raw(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Monitoring site, from `beach_name` then `beach`, else `"Unknown"`.
    pub fn site_name(&self) -> &str {
        self.fields
            .get(BEACH_NAME_FIELD)
            .and_then(non_empty_str)
            .or_else(|| self.fields.get(BEACH_FIELD).and_then(non_empty_str))
            .unwrap_or(UNKNOWN_SITE)
    }

    /// True when either flood indicator is set.
    pub fn is_flood(&self) -> bool {
        self.flood_in_month.is_some_and(|f| f.is_flood())
            || self.flood_flag.is_some_and(|f| f.is_flood())
    }
}

impl TryFrom<FlatRecord> for Sample {
    type Error = SkipReason;

    fn try_from(record: FlatRecord) -> Result<Self, Self::Error> {
        let has_value = record
            .dataset
            .relevant_fields()
            .iter()
            .any(|field| record.fields.get(field).and_then(finite_number).is_some());
        if !has_value {
            return Err(SkipReason::NoNumericFields);
        }
        let flood_flag = record
            .fields
            .get(FLOOD_FIELD)
            .and_then(FloodIndicator::from_value)
            .or(record.month_flood);
        let flood_in_month = record
            .fields
            .get(FLOOD_IN_MONTH_FIELD)
            .and_then(FloodIndicator::from_value)
            .or(record.month_flood_in_month);
        Ok(Sample {
            dataset: record.dataset,
            date: record.date,
            year: record.year,
            month: record.month,
            day: record.day,
            depth: record.depth,
            flood_flag,
            flood_in_month,
            fields: record.fields,
        })
    }
}

/// Samples of one dataset plus everything skipped on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleBatch {
    pub samples: Vec<Sample>,
    pub skipped: Vec<Skip>,
}

impl SampleBatch {
    /// Flatten a dataset and keep the records that carry relevant values.
    pub fn from_snapshot(snapshot: &Snapshot, dataset: Dataset) -> SampleBatch {
        let report = flatten_dataset(snapshot, dataset);
        let mut batch = SampleBatch {
            samples: Vec::with_capacity(report.records.len()),
            skipped: report.skipped,
        };
        for record in report.records {
            let path = record.path.clone();
            match Sample::try_from(record) {
                Ok(sample) => batch.samples.push(sample),
                Err(reason) => batch.skipped.push(Skip {
                    dataset,
                    path,
                    reason,
                }),
            }
        }
        batch
    }
}
