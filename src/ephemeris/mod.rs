//! Solar-system bodies and the ephemeris seam.
//!
//! Bodies form a closed set ([`Body`]). Their positions come from an
//! [`Ephemeris`], a single-method capability that a caller can replace with a
//! more precise model. The crate ships [`OrbitalEphemeris`], a low-precision
//! analytic model good to a small fraction of a degree, which is plenty at
//! all-sky camera resolution.

pub mod orbital;

pub use orbital::OrbitalEphemeris;

use crate::angle::wrap_degrees;
use crate::horizon::{altaz_from_vector, horizontal_matrix};
use crate::observer::Observer;
use crate::Vector3;

/// A solar-system object that can appear in the sky set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Moon,
    Venus,
    Mars,
    Jupiter,
    Saturn,
}

impl Body {
    /// Bodies of the full catalog, in construction order.
    pub const FULL_SET: [Body; 6] = [
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Moon,
        Body::Sun,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
        }
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Apparent horizontal position and brightness of a body.
///
/// Implementations are not required to keep `alt_deg` inside `[-90, 90]`;
/// the catalog folds it back with [`znorm`](crate::horizon::znorm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPosition {
    pub alt_deg: f64,
    pub az_deg: f64,
    pub mag: f64,
}

/// Computes where a body is for an observer, and how bright it looks.
pub trait Ephemeris {
    fn compute_position(&self, body: Body, observer: &Observer) -> BodyPosition;
}

/// Horizontal coordinates (degrees) of a geocentric equatorial-of-date
/// position given in Earth radii, corrected for the observer's offset from
/// the geocenter.
pub fn topocentric_altaz(geocentric_er: &Vector3, observer: &Observer) -> (f64, f64) {
    let topocentric = geocentric_er - observer.geocentric_position();
    let m = horizontal_matrix(
        observer.location.latitude_rad,
        observer.local_sidereal_time(),
    );
    let (alt, az) = altaz_from_vector(&(m * topocentric));
    (alt.to_degrees(), wrap_degrees(az.to_degrees()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::Location;
    use approx::assert_abs_diff_eq;
    use chrono::{TimeZone, Utc};

    #[test]
    fn names() {
        let names: Vec<&str> = Body::FULL_SET.iter().map(Body::name).collect();
        assert_eq!(names, ["Venus", "Mars", "Jupiter", "Saturn", "Moon", "Sun"]);
        assert_eq!(Body::Moon.to_string(), "Moon");
    }

    #[test]
    fn distant_objects_have_no_parallax() {
        let observer = Observer::new(
            Location::from_degrees(52.0, 13.0, 40.0),
            Utc.with_ymd_and_hms(2021, 9, 1, 3, 0, 0).unwrap(),
        );
        // zenith direction at a huge distance stays at the zenith
        let up = observer.geocentric_position().normalize() * 1e9;
        let (alt, _) = topocentric_altaz(&up, &observer);
        // geodetic vs geocentric latitude differ by up to ~0.19°
        assert_abs_diff_eq!(alt, 90.0, epsilon = 0.25);
    }

    #[test]
    fn nearby_object_shows_parallax() {
        let observer = Observer::new(
            Location::from_degrees(0.0, 0.0, 0.0),
            Utc.with_ymd_and_hms(2021, 9, 1, 3, 0, 0).unwrap(),
        );
        // an object 60 Earth radii away on the observer's horizon plane
        // through the geocenter sits about 0.95° below the horizon
        let lst = observer.local_sidereal_time();
        let east = Vector3::new(-lst.sin(), lst.cos(), 0.0) * 60.0;
        let (alt, az) = topocentric_altaz(&east, &observer);
        assert_abs_diff_eq!(alt, -(1.0f64 / 60.0).atan().to_degrees(), epsilon = 1e-6);
        assert_abs_diff_eq!(az, 90.0, epsilon = 1e-6);
    }
}
