//! Angle text parsing and wrapping.
//!
//! Catalog coordinates arrive as text in either decimal (`37.95`) or
//! colon-separated sexagesimal form (`02:31:49.1`, `+89:15:51`, `-05:23`).
//! A leading sign applies to the whole value, so `-00:30` is minus half a unit.
//! The first component carries the unit (hours for right ascension,
//! degrees for declination); minutes and seconds are sixtieths of it.

use std::f64::consts::TAU;

/// Parse decimal or colon-separated sexagesimal text into the unit of its
/// leading component. Returns `None` for anything else.
pub fn parse_sexagesimal(text: &str) -> Option<f64> {
    let text = text.trim();
    let (negative, body) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    if body.is_empty() {
        return None;
    }

    let mut value = 0.0;
    let mut scale = 1.0;
    let mut components = 0;
    for part in body.split(':') {
        components += 1;
        if components > 3 {
            return None;
        }
        let part = part.trim();
        // signs are only valid in front of the first component
        if part.is_empty() || part.starts_with(['+', '-']) {
            return None;
        }
        let v: f64 = part.parse().ok()?;
        if !v.is_finite() || v < 0.0 || (components > 1 && v >= 60.0) {
            return None;
        }
        value += v / scale;
        scale *= 60.0;
    }

    Some(if negative { -value } else { value })
}

/// Parse right ascension text given in hours; result in radians.
pub fn parse_hours(text: &str) -> Option<f64> {
    parse_sexagesimal(text).map(|h| (h * 15.0).to_radians())
}

/// Parse declination (or any degree-valued) text; result in radians.
pub fn parse_degrees(text: &str) -> Option<f64> {
    parse_sexagesimal(text).map(f64::to_radians)
}

/// Wrap an angle in radians into `[0, 2π)`.
pub fn wrap_two_pi(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
