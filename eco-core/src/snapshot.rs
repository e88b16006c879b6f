use crate::dataset::Dataset;
use crate::error::SnapshotError;
use serde_json::Value;

/// An immutable copy of the monitoring database at one point in time.
///
/// Each dataset is held as untyped JSON; shape checking happens during
/// flattening. A dataset missing from the source is stored as `null` and
/// flattens to nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub chemicals_height: Value,
    pub ecolifloods: Value,
    pub heavy_metals: Value,
}

impl Snapshot {
    /// Build a snapshot from a root object keyed by dataset name.
    ///
    /// A root that is not an object yields an empty snapshot.
    pub fn from_root(root: &Value) -> Snapshot {
        let take = |dataset: Dataset| root.get(dataset.key()).cloned().unwrap_or(Value::Null);
        Snapshot {
            chemicals_height: take(Dataset::ChemicalsHeight),
            ecolifloods: take(Dataset::Ecolifloods),
            heavy_metals: take(Dataset::HeavyMetals),
        }
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json_str(json: &str) -> Result<Snapshot, SnapshotError> {
        let root: Value = serde_json::from_str(json)?;
        Ok(Snapshot::from_root(&root))
    }

    pub fn dataset(&self, dataset: Dataset) -> &Value {
        match dataset {
            Dataset::ChemicalsHeight => &self.chemicals_height,
            Dataset::Ecolifloods => &self.ecolifloods,
            Dataset::HeavyMetals => &self.heavy_metals,
        }
    }

    /// Replace one dataset, as a realtime subscription does on each update.
    pub fn with_dataset(mut self, dataset: Dataset, value: Value) -> Snapshot {
        match dataset {
            Dataset::ChemicalsHeight => self.chemicals_height = value,
            Dataset::Ecolifloods => self.ecolifloods = value,
            Dataset::HeavyMetals => self.heavy_metals = value,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_datasets_are_null() {
        let snapshot = Snapshot::from_root(&json!({ "Ecolifloods": { "2020": [] } }));
        assert!(snapshot.chemicals_height.is_null());
        assert!(snapshot.heavy_metals.is_null());
        assert_eq!(snapshot.dataset(Dataset::Ecolifloods), &json!({ "2020": [] }));
    }

    #[test]
    fn non_object_root_is_empty() {
        assert_eq!(Snapshot::from_root(&json!("oops")), Snapshot::default());
        assert_eq!(Snapshot::from_root(&json!([1, 2])), Snapshot::default());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(Snapshot::from_json_str("{ not json").is_err());
        assert!(Snapshot::from_json_str("{}").is_ok());
    }

    #[test]
    fn with_dataset_replaces_only_that_dataset() {
        let snapshot = Snapshot::default().with_dataset(Dataset::HeavyMetals, json!({ "5": {} }));
        assert_eq!(snapshot.heavy_metals, json!({ "5": {} }));
        assert!(snapshot.ecolifloods.is_null());
    }
}
