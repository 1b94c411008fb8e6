//! Raw field values as they arrive from form inputs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

static DECIMAL_LITERAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$")
        .expect("decimal literal regex must compile")
});

/// Raw value carried by a field edit.
///
/// Inputs deliver either text or numbers. Leaves store one or the other, so
/// writes coerce through [`FieldValue::as_number`] or [`FieldValue::to_text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view of this value, following numeric form-input coercion.
    ///
    /// - Numbers are returned unchanged.
    /// - Blank text is `0`.
    /// - Decimal literals (`12`, `-1.5`, `.5`, `1e3`) are parsed after trimming.
    /// - `Infinity` with an optional sign is infinite; `inf` and `nan` are not.
    /// - Unsigned `0x`, `0o` and `0b` literals are integers in that radix.
    /// - Anything else is `NaN`; callers do not guard against it.
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(value) => *value,
            Self::Text(text) => parse_numeric_text(text),
        }
    }

    /// Text view of this value. Numbers render in shortest decimal form.
    pub fn to_text(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

fn parse_numeric_text(text: &str) -> f64 {
    let trimmed = text.trim();
    match trimmed {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if DECIMAL_LITERAL_RE.is_match(trimmed) {
        return trimmed.parse::<f64>().unwrap_or(f64::NAN);
    }

    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return f64::NAN,
    };
    let digits = &trimmed[2..];
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, ch| {
            ch.to_digit(radix)
                .map(|digit| acc * f64::from(radix) + f64::from(digit))
        })
        .unwrap_or(f64::NAN)
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::FieldValue;

    #[test]
    fn as_number_coerces_text_like_numeric_inputs() {
        assert_eq!(FieldValue::from("5").as_number(), 5.0);
        assert_eq!(FieldValue::from(" 2.5 ").as_number(), 2.5);
        assert_eq!(FieldValue::from("").as_number(), 0.0);
        assert!(FieldValue::from("Hot").as_number().is_nan());
        assert_eq!(FieldValue::from(7).as_number(), 7.0);
    }

    #[test]
    fn as_number_follows_numeric_literal_rules() {
        assert_eq!(FieldValue::from("1e3").as_number(), 1000.0);
        assert_eq!(FieldValue::from(".5").as_number(), 0.5);
        assert_eq!(FieldValue::from("-Infinity").as_number(), f64::NEG_INFINITY);
        assert_eq!(FieldValue::from("0x10").as_number(), 16.0);
        assert_eq!(FieldValue::from("0b101").as_number(), 5.0);
        assert!(FieldValue::from("inf").as_number().is_nan());
        assert!(FieldValue::from("NaN").as_number().is_nan());
        assert!(FieldValue::from("infinity").as_number().is_nan());
        assert!(FieldValue::from("-0x10").as_number().is_nan());
        assert!(FieldValue::from("0x").as_number().is_nan());
        assert!(FieldValue::from("1_000").as_number().is_nan());
    }

    #[test]
    fn to_text_renders_whole_numbers_without_fraction() {
        assert_eq!(FieldValue::from(500.0).to_text(), "500");
        assert_eq!(FieldValue::from(1.25).to_text(), "1.25");
        assert_eq!(FieldValue::from("Acme").to_text(), "Acme");
    }

    #[test]
    fn untagged_json_keeps_numbers_and_strings_apart() {
        let number: FieldValue = serde_json::from_str("5").expect("number decodes");
        let text: FieldValue = serde_json::from_str("\"5\"").expect("text decodes");
        assert_eq!(number, FieldValue::Number(5.0));
        assert_eq!(text, FieldValue::Text("5".to_string()));
    }
}
