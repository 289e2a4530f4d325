//! Value normalization for recognised header fields
//!
//! Converts raw header text into the canonical string representation of a
//! field. Numbers are rendered with the fixed number of decimals declared by
//! the field, never with general float formatting, so the same raw value
//! always yields the same string.
//!
//! A value that cannot be parsed for its declared kind returns
//! [`Error::FieldParse`](crate::Error::FieldParse). Callers drop the field;
//! nothing is coerced to zero.

use crate::app::models::{Extract, FieldSpec, ValueKind};
use crate::{Error, Result};
use chrono::NaiveDateTime;

const TIMESTAMP_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const TIMESTAMP_OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Normalize a raw header value according to its field spec
pub fn normalize(raw_value: &str, spec: &FieldSpec) -> Result<String> {
    let datum = extract_datum(raw_value, spec)?;

    match spec.kind {
        ValueKind::Text => Ok(datum.to_string()),
        ValueKind::Float { decimals } => {
            check_unit(raw_value, spec)?;
            let value = parse_float(datum, spec)?;
            let scaled = spec.unit_scale.map_or(value, |scale| value * scale);
            Ok(format_fixed(scaled, decimals))
        }
        ValueKind::Integer => datum
            .parse::<i64>()
            .map(|value| value.to_string())
            .map_err(|e| {
                Error::field_parse(spec.header_key, raw_value, format!("not an integer ({})", e))
            }),
        ValueKind::Timestamp => NaiveDateTime::parse_from_str(datum, TIMESTAMP_INPUT_FORMAT)
            .map(|timestamp| timestamp.format(TIMESTAMP_OUTPUT_FORMAT).to_string())
            .map_err(|e| {
                Error::field_parse(spec.header_key, raw_value, format!("not a timestamp ({})", e))
            }),
    }
}

/// Pick the part of the raw value that holds the datum
fn extract_datum<'a>(raw_value: &'a str, spec: &FieldSpec) -> Result<&'a str> {
    let trimmed = raw_value.trim();

    let datum = match spec.extract {
        Extract::Whole => Some(trimmed),
        Extract::FirstToken => trimmed.split_whitespace().next(),
        Extract::CommaField(n) => trimmed.split(',').nth(n).map(str::trim),
    };

    datum
        .filter(|d| !d.is_empty())
        .ok_or_else(|| Error::field_parse(spec.header_key, raw_value, "no value present"))
}

/// The unit token after the number must match the unit the scale expects
fn check_unit(raw_value: &str, spec: &FieldSpec) -> Result<()> {
    let (Some(expected), Some(found)) = (spec.source_unit, raw_value.split_whitespace().nth(1))
    else {
        return Ok(());
    };

    if found == expected {
        Ok(())
    } else {
        Err(Error::field_parse(
            spec.header_key,
            raw_value,
            format!("expected unit '{}', found '{}'", expected, found),
        ))
    }
}

fn parse_float(datum: &str, spec: &FieldSpec) -> Result<f64> {
    let value = datum.parse::<f64>().map_err(|e| {
        Error::field_parse(spec.header_key, datum, format!("not a decimal number ({})", e))
    })?;

    if !value.is_finite() {
        return Err(Error::field_parse(spec.header_key, datum, "value is not finite"));
    }

    Ok(value)
}

/// Render with exactly `decimals` fractional digits; negative zero loses its sign
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value);

    match rendered.strip_prefix('-') {
        Some(magnitude) if magnitude.chars().all(|c| c == '0' || c == '.') => {
            magnitude.to_string()
        }
        _ => rendered,
    }
}
