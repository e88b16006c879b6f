//! Normalization of flood indicators to a typed 0/1 value.
//!
//! Flood flags arrive as booleans, numbers or strings depending on how a
//! record was written. They are normalized once, here, by this rule table:
//!
//! | raw value                              | indicator |
//! |----------------------------------------|-----------|
//! | `true` / `false`                       | 1 / 0     |
//! | number `0`                             | 0         |
//! | any other finite number                | 1         |
//! | string parsing to a finite number      | as number |
//! | string `"true"` / `"false"` (any case) | 1 / 0     |
//! | null, missing, anything else           | absent    |

use crate::value::finite_number;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum FloodIndicator {
    Dry,
    Flood,
}

impl FloodIndicator {
    /// Apply the rule table to a raw JSON value.
    pub fn from_value(value: &Value) -> Option<FloodIndicator> {
        match value {
            Value::Bool(b) => Some(FloodIndicator::from(*b)),
            Value::String(s) if s.trim().eq_ignore_ascii_case("true") => {
                Some(FloodIndicator::Flood)
            }
            Value::String(s) if s.trim().eq_ignore_ascii_case("false") => {
                Some(FloodIndicator::Dry)
            }
            other => finite_number(other).map(|n| FloodIndicator::from(n != 0.0)),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            FloodIndicator::Dry => 0,
            FloodIndicator::Flood => 1,
        }
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.as_u8())
    }

    pub fn is_flood(&self) -> bool {
        matches!(self, FloodIndicator::Flood)
    }
}

impl From<bool> for FloodIndicator {
    fn from(flood: bool) -> Self {
        if flood {
            FloodIndicator::Flood
        } else {
            FloodIndicator::Dry
        }
    }
}

impl From<FloodIndicator> for u8 {
    fn from(indicator: FloodIndicator) -> u8 {
        indicator.as_u8()
    }
}

impl TryFrom<u8> for FloodIndicator {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FloodIndicator::Dry),
            1 => Ok(FloodIndicator::Flood),
            other => Err(format!("flood indicator must be 0 or 1, got {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FloodIndicator;
    use serde_json::json;

    #[test]
    fn booleans_map_to_zero_and_one() {
        assert_eq!(FloodIndicator::from_value(&json!(true)), Some(FloodIndicator::Flood));
        assert_eq!(FloodIndicator::from_value(&json!(false)), Some(FloodIndicator::Dry));
    }

    #[test]
    fn numbers_are_zero_or_nonzero() {
        assert_eq!(FloodIndicator::from_value(&json!(0)), Some(FloodIndicator::Dry));
        assert_eq!(FloodIndicator::from_value(&json!(1)), Some(FloodIndicator::Flood));
        assert_eq!(FloodIndicator::from_value(&json!(2.5)), Some(FloodIndicator::Flood));
        assert_eq!(FloodIndicator::from_value(&json!(-1)), Some(FloodIndicator::Flood));
    }

    #[test]
    fn strings_follow_number_and_boolean_rules() {
        assert_eq!(FloodIndicator::from_value(&json!("1")), Some(FloodIndicator::Flood));
        assert_eq!(FloodIndicator::from_value(&json!("0")), Some(FloodIndicator::Dry));
        assert_eq!(FloodIndicator::from_value(&json!("TRUE")), Some(FloodIndicator::Flood));
        assert_eq!(FloodIndicator::from_value(&json!("false")), Some(FloodIndicator::Dry));
        assert_eq!(FloodIndicator::from_value(&json!("maybe")), None);
    }

    #[test]
    fn absent_values_have_no_indicator() {
        assert_eq!(FloodIndicator::from_value(&json!(null)), None);
        assert_eq!(FloodIndicator::from_value(&json!([])), None);
        assert_eq!(FloodIndicator::from_value(&json!({})), None);
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_value(FloodIndicator::Flood).unwrap(), json!(1));
        assert_eq!(serde_json::to_value(FloodIndicator::Dry).unwrap(), json!(0));
    }
}
