use crate::metric::{Metal, Metric};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three top-level collections of a monitoring snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dataset {
    /// `Chemicals_Height`: year -> months -> day -> samples
    ChemicalsHeight,
    /// `Ecolifloods`: year -> months -> day -> samples
    Ecolifloods,
    /// `Heavy_Metals`: depth -> year -> months -> day -> samples
    HeavyMetals,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [
        Dataset::ChemicalsHeight,
        Dataset::Ecolifloods,
        Dataset::HeavyMetals,
    ];

    /// Key of the dataset in the snapshot root.
    pub fn key(&self) -> &'static str {
        match self {
            Dataset::ChemicalsHeight => "Chemicals_Height",
            Dataset::Ecolifloods => "Ecolifloods",
            Dataset::HeavyMetals => "Heavy_Metals",
        }
    }

    /// Whether the dataset has an outer depth layer.
    pub fn has_depth(&self) -> bool {
        matches!(self, Dataset::HeavyMetals)
    }

    /// Numeric fields of which at least one must be present for a sample
    /// of this dataset to be kept.
    pub fn relevant_fields(&self) -> Vec<String> {
        match self {
            Dataset::ChemicalsHeight => [Metric::Chlorophyll, Metric::Nitrate, Metric::Nitrite]
                .iter()
                .map(|m| m.field().to_string())
                .collect(),
            Dataset::Ecolifloods => vec![Metric::Ecoli.field().to_string()],
            Dataset::HeavyMetals => Metal::ALL.iter().map(|m| m.field()).collect(),
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
