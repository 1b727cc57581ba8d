//! Observer location and time.
//!
//! An [`Observer`] is a geodetic location on the WGS84 ellipsoid plus a UTC
//! instant. It provides the time scales the coordinate transforms need:
//! Julian date, Julian centuries since J2000 and local mean sidereal time.

use chrono::{DateTime, Utc};

use crate::angle::wrap_two_pi;
use crate::Vector3;

/// Julian date of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Julian date of J2000.0 (2000-01-01 12:00 TT, used here on the UTC scale).
pub const J2000_JD: f64 = 2_451_545.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// WGS84 equatorial radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;
const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// Geodetic observer location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude_rad: f64,
    /// East positive.
    pub longitude_rad: f64,
    /// Height above the reference ellipsoid in meters.
    pub height_m: f64,
}

impl Location {
    pub fn new(latitude_rad: f64, longitude_rad: f64, height_m: f64) -> Self {
        Self {
            latitude_rad,
            longitude_rad,
            height_m,
        }
    }

    pub fn from_degrees(latitude_deg: f64, longitude_deg: f64, height_m: f64) -> Self {
        Self::new(latitude_deg.to_radians(), longitude_deg.to_radians(), height_m)
    }

    /// Geocentric position in Earth equatorial radii, in an Earth-fixed frame
    /// whose x axis points at the observer's meridian.
    fn meridian_position(&self) -> Vector3 {
        let e2 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);
        let (sin_lat, cos_lat) = self.latitude_rad.sin_cos();
        let n = EARTH_RADIUS_M / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        Vector3::new(
            (n + self.height_m) * cos_lat,
            0.0,
            (n * (1.0 - e2) + self.height_m) * sin_lat,
        ) / EARTH_RADIUS_M
    }
}

/// A location and an instant: everything needed to place the sky.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub location: Location,
    pub time: DateTime<Utc>,
}

impl Observer {
    pub fn new(location: Location, time: DateTime<Utc>) -> Self {
        Self { location, time }
    }

    /// Julian date of the observation instant (UTC).
    pub fn julian_date(&self) -> f64 {
        let seconds =
            self.time.timestamp() as f64 + self.time.timestamp_subsec_nanos() as f64 * 1e-9;
        UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
    }

    /// Days elapsed since J2000.0.
    pub fn days_since_j2000(&self) -> f64 {
        self.julian_date() - J2000_JD
    }

    /// Julian centuries elapsed since J2000.0.
    pub fn centuries_since_j2000(&self) -> f64 {
        self.days_since_j2000() / 36_525.0
    }

    /// Greenwich mean sidereal time in radians, `[0, 2π)` (IAU 1982).
    pub fn greenwich_sidereal_time(&self) -> f64 {
        let d = self.days_since_j2000();
        let t = d / 36_525.0;
        let gmst_deg = 280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0;
        wrap_two_pi(gmst_deg.to_radians())
    }

    /// Local mean sidereal time in radians, `[0, 2π)`.
    pub fn local_sidereal_time(&self) -> f64 {
        wrap_two_pi(self.greenwich_sidereal_time() + self.location.longitude_rad)
    }

    /// Observer position in Earth equatorial radii, in the equatorial frame of date.
    pub fn geocentric_position(&self) -> Vector3 {
        let p = self.location.meridian_position();
        let (sin_lst, cos_lst) = self.local_sidereal_time().sin_cos();
        Vector3::new(p.x * cos_lst, p.x * sin_lst, p.z)
    }
}
