//! Parsing of sexagesimal angle strings as they appear in catalogue exports.
//!
//! Right ascension arrives in hour-angle units (`"05 55 10.31"`, `"05:55:10.31"`),
//! declination in degrees (`"+07 24 25.4"`, `"-08:12:05.9"`). Components may be
//! separated by colons or whitespace; one to three components are accepted and
//! only the last one may carry a fractional part. A leading `-` applies to the
//! whole value, so `"-00 30 00"` is half a degree south.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SexagesimalError {
    #[error("empty angle string")]
    Empty,
    #[error("too many components in {0:?}")]
    TooManyComponents(String),
    #[error("invalid component {component:?} in {input:?}")]
    InvalidComponent { input: String, component: String },
    #[error("minutes or seconds out of range in {0:?}")]
    SubunitOutOfRange(String),
    #[error("value {value} out of range [{min}, {max}] in {input:?}")]
    OutOfRange {
        input: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Parse a generic sexagesimal string into its decimal value in the leading unit.
pub fn parse_sexagesimal(input: &str) -> Result<f64, SexagesimalError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SexagesimalError::Empty);
    }

    let (negative, body) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let parts: Vec<&str> = body
        .split(|c: char| c == ':' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        return Err(SexagesimalError::Empty);
    }
    if parts.len() > 3 {
        return Err(SexagesimalError::TooManyComponents(trimmed.to_string()));
    }

    let last = parts.len() - 1;
    let mut value = 0.0;
    let mut divisor = 1.0;
    for (idx, part) in parts.iter().enumerate() {
        let invalid = || SexagesimalError::InvalidComponent {
            input: trimmed.to_string(),
            component: part.to_string(),
        };
        // Signs inside the body, or fractions before the last component, are malformed.
        if part.starts_with(['+', '-']) || (idx < last && part.contains('.')) {
            return Err(invalid());
        }
        let component: f64 = part.parse().map_err(|_| invalid())?;
        if !component.is_finite() {
            return Err(invalid());
        }
        if idx > 0 && component >= 60.0 {
            return Err(SexagesimalError::SubunitOutOfRange(trimmed.to_string()));
        }
        value += component / divisor;
        divisor *= 60.0;
    }

    Ok(if negative { -value } else { value })
}

fn check_range(input: &str, value: f64, min: f64, max: f64) -> Result<f64, SexagesimalError> {
    if value < min || value > max {
        return Err(SexagesimalError::OutOfRange {
            input: input.trim().to_string(),
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// Parse a right ascension in hour-angle units, returning hours in `[0, 24]`.
pub fn parse_hour_angle(input: &str) -> Result<f64, SexagesimalError> {
    let hours = parse_sexagesimal(input)?;
    check_range(input, hours, 0.0, 24.0)
}

/// Parse a declination in degrees, returning degrees in `[-90, 90]`.
pub fn parse_degrees(input: &str) -> Result<f64, SexagesimalError> {
    let degrees = parse_sexagesimal(input)?;
    check_range(input, degrees, -90.0, 90.0)
}

/// Right ascension string to radians.
pub fn hour_angle_to_radians(input: &str) -> Result<f64, SexagesimalError> {
    Ok((parse_hour_angle(input)? * 15.0).to_radians())
}

/// Declination string to radians.
pub fn degrees_to_radians(input: &str) -> Result<f64, SexagesimalError> {
    Ok(parse_degrees(input)?.to_radians())
}
