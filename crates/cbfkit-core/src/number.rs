//! Numeric columns
//!
//! Integers are decimal. Reals are written in the shortest `%g`-style form
//! with [`REAL_PRECISION`] significant digits, which is what the reader
//! needs to get the same `f64` back.

use crate::config::REAL_PRECISION;

/// Format a real with [`REAL_PRECISION`] significant digits
pub fn format_real(value: f64) -> String {
    format_general(value, REAL_PRECISION)
}

/// `%.{precision}g` formatting: fixed notation when the decimal exponent lies
/// in `[-4, precision)`, scientific otherwise, trailing zeros removed.
pub fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    // The exponent must be taken after rounding to `precision` digits
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((&sci, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.unsigned_abs())
    } else {
        let decimals = (precision as i32 - 1 - exp) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

pub(crate) fn parse_i64(token: &str) -> Result<i64, String> {
    token
        .parse()
        .map_err(|e| format!("{:?} is not a 64-bit integer ({})", token, e))
}

pub(crate) fn parse_i32(token: &str) -> Result<i32, String> {
    token
        .parse()
        .map_err(|e| format!("{:?} is not a 32-bit integer ({})", token, e))
}

pub(crate) fn parse_f64(token: &str) -> Result<f64, String> {
    token
        .parse()
        .map_err(|e| format!("{:?} is not a real number ({})", token, e))
}
