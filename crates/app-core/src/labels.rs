//! Display formatting for card detail rows
//!
//! Backend field names become human labels with [`to_label_case`], values are
//! rounded for presentation with [`sig_digits`].

use serde_json::Value;
use std::fmt;

/// Significant digits used when a caller has no preference
pub const DEFAULT_SIG_DIGITS: usize = 3;

/// Turn a `snake_case` or `camelCase` field name into a label
///
/// `feels_like` becomes `Feels Like`, `rightAscension` becomes `Right Ascension`.
pub fn to_label_case(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    if input.contains('_') {
        return input
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
    }

    let mut spaced = String::with_capacity(input.len() + 4);
    for c in input.chars() {
        if c.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }

    let mut chars = spaced.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };

    capitalized.trim().to_string()
}

/// A value ready for display
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayValue {
    /// Rounded number
    Number(f64),
    /// Text shown verbatim
    Text(String),
}

impl DisplayValue {
    /// Numeric value, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DisplayValue::Number(n) => Some(*n),
            DisplayValue::Text(_) => None,
        }
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Number(n) => write!(f, "{}", n),
            DisplayValue::Text(s) => f.write_str(s),
        }
    }
}

/// Round a value to `digits` significant digits for display
///
/// Numbers are rounded. Strings that start with `0` are identifiers (postal
/// codes) and pass through untouched; other strings that parse as a finite
/// number are rounded like numbers. Anything else is shown as text.
pub fn sig_digits(value: &Value, digits: usize) -> DisplayValue {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(v) => DisplayValue::Number(round_significant(v, digits)),
            None => DisplayValue::Text(n.to_string()),
        },
        Value::String(s) => sig_digits_str(s, digits),
        other => DisplayValue::Text(display_text(other)),
    }
}

/// [`sig_digits`] for a string
pub fn sig_digits_str(s: &str, digits: usize) -> DisplayValue {
    if s.starts_with('0') {
        return DisplayValue::Text(s.to_string());
    }

    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && !s.trim().is_empty() => {
            DisplayValue::Number(round_significant(v, digits))
        }
        _ => DisplayValue::Text(s.to_string()),
    }
}

/// Round a number to `digits` significant digits (at least one)
pub fn round_significant(value: f64, digits: usize) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }

    let precision = digits.max(1) - 1;
    format!("{:.*e}", precision, value)
        .parse()
        .unwrap_or(value)
}

/// Plain text for a JSON value: strings unquoted, `null` empty
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_label_case_snake() {
        assert_eq!(to_label_case("feels_like"), "Feels Like");
        assert_eq!(to_label_case("temp_min"), "Temp Min");
        assert_eq!(to_label_case("SEA_LEVEL"), "Sea Level");
    }

    #[test]
    fn test_label_case_camel() {
        assert_eq!(to_label_case("rightAscension"), "Right Ascension");
        assert_eq!(to_label_case("declination"), "Declination");
        assert_eq!(to_label_case("regionName"), "Region Name");
    }

    #[test]
    fn test_label_case_pascal_and_acronyms() {
        assert_eq!(to_label_case("Altitude"), "Altitude");
        assert_eq!(to_label_case("isp"), "Isp");
        assert_eq!(to_label_case("AS"), "A S");
    }

    #[test]
    fn test_label_case_empty() {
        assert_eq!(to_label_case(""), "");
    }

    #[test]
    fn test_sig_digits_number() {
        assert_eq!(sig_digits(&json!(123.456), 3), DisplayValue::Number(123.0));
        assert_eq!(sig_digits(&json!(0.0012345), 3), DisplayValue::Number(0.00123));
        assert_eq!(sig_digits(&json!(1015), 4), DisplayValue::Number(1015.0));
        assert_eq!(sig_digits(&json!(98765), 2), DisplayValue::Number(99000.0));
        assert_eq!(sig_digits(&json!(-51.5074), 3), DisplayValue::Number(-51.5));
    }

    #[test]
    fn test_sig_digits_zero_leading_string_is_opaque() {
        assert_eq!(sig_digits(&json!("0123"), 3), DisplayValue::Text("0123".to_string()));
        assert_eq!(sig_digits(&json!("0.5"), 3), DisplayValue::Text("0.5".to_string()));
    }

    #[test]
    fn test_sig_digits_numeric_string() {
        assert_eq!(sig_digits(&json!("123.456"), 3), DisplayValue::Number(123.0));
        assert_eq!(sig_digits(&json!("10115"), 3), DisplayValue::Number(10100.0));
    }

    #[test]
    fn test_sig_digits_text_passthrough() {
        assert_eq!(
            sig_digits(&json!("Europe/London"), 3),
            DisplayValue::Text("Europe/London".to_string())
        );
        assert_eq!(sig_digits(&json!(""), 3), DisplayValue::Text(String::new()));
        assert_eq!(sig_digits(&json!("NaN"), 3), DisplayValue::Text("NaN".to_string()));
        assert_eq!(sig_digits(&json!(null), 3), DisplayValue::Text(String::new()));
        assert_eq!(sig_digits(&json!(true), 3), DisplayValue::Text("true".to_string()));
    }

    #[test]
    fn test_display_value_rendering() {
        assert_eq!(sig_digits(&json!(123.456), 3).to_string(), "123");
        assert_eq!(sig_digits(&json!(14.27), 3).to_string(), "14.3");
        assert_eq!(DisplayValue::Text("0123".into()).as_f64(), None);
    }

    #[test]
    fn test_round_significant_edges() {
        assert_eq!(round_significant(0.0, 3), 0.0);
        assert_eq!(round_significant(123.456, 0), 100.0);
    }
}
