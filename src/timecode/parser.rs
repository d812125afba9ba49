//! Timestamp parser
//!
//! Accepted spellings, told apart by colon-field count and a `.` in the
//! last field:
//!
//! | fields | `.` in last | layout          |
//! |--------|-------------|-----------------|
//! | 4      | any         | `HH:MM:SS:mmm`  |
//! | 3      | yes         | `MM:SS.fff`     |
//! | 3      | no          | `HH:MM:SS`      |
//! | 2      | any         | `MM:SS[.fff]`   |
//! | 1      | any         | `SS[.fff]`      |
//!
//! The parser never fails. Any component that does not read as a number
//! counts as zero, so a corrupt transcript degrades to "start of chapter".

use log::warn;

use super::TimeCode;

/// Parse free-form timestamp text into a [`TimeCode`]
///
/// # Example
/// ```
/// use recital::timecode::parse;
/// assert_eq!(parse("03:04").as_secs(), 184.0);
/// assert_eq!(parse("").as_secs(), 0.0);
/// ```
pub fn parse(text: &str) -> TimeCode {
    let text = text.trim();
    if text.is_empty() {
        return TimeCode::ZERO;
    }

    let fields: Vec<&str> = text.split(':').collect();
    let seconds = match fields.as_slice() {
        [h, m, s, ms] => {
            whole(h, text) * 3600.0 + whole(m, text) * 60.0 + decimal(s, text) + whole(ms, text) / 1000.0
        }
        [m, s, frac] if frac.contains('.') => {
            whole(m, text) * 60.0 + decimal(s, text) + fraction_after_point(frac, text)
        }
        [h, m, s] => whole(h, text) * 3600.0 + whole(m, text) * 60.0 + decimal(s, text),
        [m, s] => whole(m, text) * 60.0 + decimal(s, text),
        [s] => decimal(s, text),
        _ => {
            warn!("Unrecognised timestamp layout {:?}, using 0", text);
            0.0
        }
    };

    from_seconds(seconds)
}

/// Parse an optional attribute value; absent counts as zero
pub fn parse_opt(text: Option<&str>) -> TimeCode {
    text.map(parse).unwrap_or(TimeCode::ZERO)
}

/// Adopt an already-numeric time, e.g. from an aligned JSON transcript
///
/// Negative and non-finite inputs clamp to zero.
pub fn from_seconds(seconds: f64) -> TimeCode {
    if seconds.is_finite() && seconds > 0.0 {
        TimeCode::new_unchecked(seconds)
    } else {
        TimeCode::ZERO
    }
}

fn whole(field: &str, original: &str) -> f64 {
    match field.trim().parse::<i64>() {
        Ok(value) => value as f64,
        Err(_) => {
            warn!("Bad integer field {:?} in timestamp {:?}, using 0", field, original);
            0.0
        }
    }
}

fn decimal(field: &str, original: &str) -> f64 {
    match field.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            warn!("Bad seconds field {:?} in timestamp {:?}, using 0", field, original);
            0.0
        }
    }
}

// Only the digits after the point count; the integer part of the field is ignored.
fn fraction_after_point(field: &str, original: &str) -> f64 {
    let digits = field.trim().split_once('.').map(|(_, d)| d).unwrap_or_default();
    if digits.is_empty() {
        return 0.0;
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        warn!("Bad fractional field {:?} in timestamp {:?}, using 0", field, original);
        return 0.0;
    }
    format!("0.{}", digits).parse::<f64>().unwrap_or(0.0)
}
