use serde::{Deserialize, Serialize};
use std::fmt;

/// Chlorophyll-a average, µg/L.
pub const CHLOROPHYLL_FIELD: &str = "chl_ug_l_avg";
/// Nitrate average, mg/L.
pub const NITRATE_FIELD: &str = "avg_nitrate";
/// Nitrite average, mg/L.
pub const NITRITE_FIELD: &str = "avg_nitrit";
/// E.coli count, CFU/100 mL.
pub const ECOLI_FIELD: &str = "Ecoli";
pub const BEACH_NAME_FIELD: &str = "beach_name";
pub const BEACH_FIELD: &str = "beach";
pub const FLOOD_FIELD: &str = "flood";
pub const FLOOD_IN_MONTH_FIELD: &str = "flood_in_month";
pub const RAINFALL_FIELD: &str = "rainfall";
pub const TEMPERATURE_FIELD: &str = "temperature";
pub const DATE_FIELD: &str = "date";

/// Site name used when a sample names no beach.
pub const UNKNOWN_SITE: &str = "Unknown";

/// Unit suffix carried by every heavy-metal field name.
pub const METAL_FIELD_SUFFIX: &str = "_µg_L";

/// A scalar water-quality metric tracked over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Chlorophyll,
    Nitrate,
    Nitrite,
    Ecoli,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Chlorophyll,
        Metric::Nitrate,
        Metric::Nitrite,
        Metric::Ecoli,
    ];

    /// Record field the metric is read from.
    pub fn field(&self) -> &'static str {
        match self {
            Metric::Chlorophyll => CHLOROPHYLL_FIELD,
            Metric::Nitrate => NITRATE_FIELD,
            Metric::Nitrite => NITRITE_FIELD,
            Metric::Ecoli => ECOLI_FIELD,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Chlorophyll => "µg/L",
            Metric::Nitrate | Metric::Nitrite => "mg/L",
            Metric::Ecoli => "CFU/100mL",
        }
    }

    /// Decimal places used when presenting values of this metric.
    pub fn display_places(&self) -> usize {
        match self {
            Metric::Ecoli => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Chlorophyll => "chlorophyll",
            Metric::Nitrate => "nitrate",
            Metric::Nitrite => "nitrite",
            Metric::Ecoli => "ecoli",
        };
        f.write_str(name)
    }
}

/// The eight heavy metals measured at depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metal {
    Al,
    Cd,
    Cu,
    Fe,
    Hg,
    Mn,
    Pb,
    Zn,
}

impl Metal {
    /// Metals in record-field order.
    pub const ALL: [Metal; 8] = [
        Metal::Al,
        Metal::Cd,
        Metal::Cu,
        Metal::Fe,
        Metal::Hg,
        Metal::Mn,
        Metal::Pb,
        Metal::Zn,
    ];

    /// Chemical symbol, which is also the normalized metal name.
    pub fn symbol(&self) -> &'static str {
        match self {
            Metal::Al => "Al",
            Metal::Cd => "Cd",
            Metal::Cu => "Cu",
            Metal::Fe => "Fe",
            Metal::Hg => "Hg",
            Metal::Mn => "Mn",
            Metal::Pb => "Pb",
            Metal::Zn => "Zn",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metal::Al => "Aluminum",
            Metal::Cd => "Cadmium",
            Metal::Cu => "Copper",
            Metal::Fe => "Iron",
            Metal::Hg => "Mercury",
            Metal::Mn => "Manganese",
            Metal::Pb => "Lead",
            Metal::Zn => "Zinc",
        }
    }

    /// Record field holding this metal's concentration, e.g. `Pb_µg_L`.
    pub fn field(&self) -> String {
        format!("{}{}", self.symbol(), METAL_FIELD_SUFFIX)
    }

    pub fn from_symbol(symbol: &str) -> Option<Metal> {
        Metal::ALL.iter().copied().find(|m| m.symbol() == symbol)
    }
}

impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Strip the unit suffix from a metal field name (`Pb_µg_L` -> `Pb`).
///
/// Names without the suffix are returned unchanged.
pub fn normalize_metal_name(field: &str) -> &str {
    field.strip_suffix(METAL_FIELD_SUFFIX).unwrap_or(field)
}
