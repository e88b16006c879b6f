use serde_json::Value;

/// Read a JSON value as a finite number.
///
/// Numbers are taken as-is, strings are trimmed and parsed. Empty strings,
/// booleans, null, arrays and objects yield `None`, as does anything that
/// parses to NaN or an infinity.
pub fn finite_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Read a JSON value as a non-empty, trimmed string.
pub fn non_empty_str(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim()),
        _ => None,
    }
}
