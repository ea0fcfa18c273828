//! Numeric coercion of loosely typed input values.
//!
//! Every other component funnels its input through this module, so that no
//! statistic is ever computed from `NaN` or an infinity.

use serde_value::Value;

/// Convert an arbitrary value to a finite number, falling back to `0.0`.
///
/// Numbers are returned unchanged when finite. Strings are parsed after
/// removing whitespace and turning decimal commas into dots (`"1 234,5"` is
/// `1234.5`). Null, booleans, sequences, maps and anything unparsable map to
/// `0.0`.
pub fn to_safe_number(value: &Value) -> f64 {
    try_finite(value).unwrap_or(0.0)
}

/// Like [`to_safe_number`], but reports absent or unusable values as `None`
/// instead of substituting zero.
pub fn try_finite(value: &Value) -> Option<f64> {
    let num = match value {
        Value::U8(num) => *num as f64,
        Value::U16(num) => *num as f64,
        Value::U32(num) => *num as f64,
        Value::U64(num) => *num as f64,
        Value::I8(num) => *num as f64,
        Value::I16(num) => *num as f64,
        Value::I32(num) => *num as f64,
        Value::I64(num) => *num as f64,
        Value::F32(num) => *num as f64,
        Value::F64(num) => *num,
        Value::String(text) => parse_localized(text)?,
        Value::Option(Some(inner)) | Value::Newtype(inner) => return try_finite(inner),
        _ => return None,
    };
    num.is_finite().then_some(num)
}

/// Replace a non-finite number with `0.0`.
pub fn finite_or_zero(num: f64) -> f64 {
    if num.is_finite() { num } else { 0.0 }
}

/// Sanitize a whole series with [`finite_or_zero`].
pub fn sanitize(series: &[f64]) -> Vec<f64> {
    series.iter().copied().map(finite_or_zero).collect()
}

fn parse_localized(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    parse_float_prefix(&cleaned)
}

/// Parse the longest leading float literal of `text`, ignoring trailing garbage
/// (`"12.5kg"` is `12.5`).
fn parse_float_prefix(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut n_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        n_digits += frac_end - frac_start;
        if frac_end > frac_start {
            end = frac_end;
        }
    }

    if n_digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok()
}
