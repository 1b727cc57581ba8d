//! Low-precision solar-system ephemeris from mean orbital elements.
//!
//! Elements are referred to the ecliptic and equinox of date and evolve
//! linearly with the day number `d` (days since 1999-12-31 00:00 UT).
//! The Moon gets its largest periodic terms (evection, variation, yearly
//! equation, ...) and Jupiter/Saturn get the great inequality; everything
//! else is pure two-body motion. Positions are good to a few arcminutes
//! for the planets and somewhat worse for the Moon.
//!
//! Magnitudes follow from heliocentric distance `r`, geocentric distance `R`
//! and phase angle `FV`, with a ring-tilt term for Saturn.

use crate::ephemeris::{topocentric_altaz, Body, BodyPosition, Ephemeris};
use crate::observer::{Observer, EARTH_RADIUS_M};
use crate::Vector3;

const AU_M: f64 = 149_597_870_700.0;
/// One astronomical unit in Earth equatorial radii.
const AU_EARTH_RADII: f64 = AU_M / EARTH_RADIUS_M;

const KEPLER_ITERATIONS: usize = 12;

fn sind(x: f64) -> f64 {
    x.to_radians().sin()
}

fn cosd(x: f64) -> f64 {
    x.to_radians().cos()
}

/// Mean orbital elements, angles in degrees.
#[derive(Debug, Clone, Copy)]
struct Elements {
    /// longitude of the ascending node
    node: f64,
    inclination: f64,
    /// argument of perihelion
    perihelion: f64,
    /// semi-major axis (AU, Earth radii for the Moon)
    a: f64,
    e: f64,
    mean_anomaly: f64,
}

impl Elements {
    fn of(body: Body, d: f64) -> Self {
        let (node, inclination, perihelion, a, e, mean_anomaly) = match body {
            Body::Sun => (
                0.0,
                0.0,
                282.9404 + 4.70935e-5 * d,
                1.0,
                0.016709 - 1.151e-9 * d,
                356.0470 + 0.985_600_258_5 * d,
            ),
            Body::Moon => (
                125.1228 - 0.052_953_808_3 * d,
                5.1454,
                318.0634 + 0.164_357_322_3 * d,
                60.2666,
                0.054900,
                115.3654 + 13.064_992_950_9 * d,
            ),
            Body::Venus => (
                76.6799 + 2.46590e-5 * d,
                3.3946 + 2.75e-8 * d,
                54.8910 + 1.38374e-5 * d,
                0.723330,
                0.006773 - 1.302e-9 * d,
                48.0052 + 1.602_130_224_4 * d,
            ),
            Body::Mars => (
                49.5574 + 2.11081e-5 * d,
                1.8497 - 1.78e-8 * d,
                286.5016 + 2.92961e-5 * d,
                1.523688,
                0.093405 + 2.516e-9 * d,
                18.6021 + 0.524_020_776_6 * d,
            ),
            Body::Jupiter => (
                100.4542 + 2.76854e-5 * d,
                1.3030 - 1.557e-7 * d,
                273.8777 + 1.64505e-5 * d,
                5.20256,
                0.048498 + 4.469e-9 * d,
                19.8950 + 0.083_085_300_1 * d,
            ),
            Body::Saturn => (
                113.6634 + 2.38980e-5 * d,
                2.4886 - 1.081e-7 * d,
                339.3939 + 2.97661e-5 * d,
                9.55475,
                0.055546 - 9.499e-9 * d,
                316.9670 + 0.033_444_228_2 * d,
            ),
        };
        Self {
            node,
            inclination,
            perihelion,
            a,
            e,
            mean_anomaly: mean_anomaly.rem_euclid(360.0),
        }
    }

    /// Eccentric anomaly in radians.
    fn eccentric_anomaly(&self) -> f64 {
        let m = self.mean_anomaly.to_radians();
        let e = self.e;
        let mut ea = m + e * m.sin() * (1.0 + e * m.cos());
        for _ in 0..KEPLER_ITERATIONS {
            ea -= (ea - e * ea.sin() - m) / (1.0 - e * ea.cos());
        }
        ea
    }

    /// Position relative to the central body in ecliptic rectangular coordinates.
    fn position(&self) -> Vector3 {
        let ea = self.eccentric_anomaly();
        let xv = self.a * (ea.cos() - self.e);
        let yv = self.a * (1.0 - self.e * self.e).sqrt() * ea.sin();
        let v = yv.atan2(xv).to_degrees();
        let r = xv.hypot(yv);

        let (sn, cn) = self.node.to_radians().sin_cos();
        let (si, ci) = self.inclination.to_radians().sin_cos();
        let (su, cu) = (v + self.perihelion).to_radians().sin_cos();
        Vector3::new(
            r * (cn * cu - sn * su * ci),
            r * (sn * cu + cn * su * ci),
            r * su * si,
        )
    }
}

/// Ecliptic longitude, latitude (degrees) and distance of a rectangular vector.
fn spherical(v: &Vector3) -> (f64, f64, f64) {
    let r = v.norm();
    let lon = v.y.atan2(v.x).to_degrees();
    let lat = v.z.atan2(v.x.hypot(v.y)).to_degrees();
    (lon, lat, r)
}

fn rectangular(lon: f64, lat: f64, r: f64) -> Vector3 {
    Vector3::new(r * cosd(lon) * cosd(lat), r * sind(lon) * cosd(lat), r * sind(lat))
}

/// Phase angle in degrees: Sun–body–Earth.
fn phase_angle(r: f64, big_r: f64, s: f64) -> f64 {
    ((r * r + big_r * big_r - s * s) / (2.0 * r * big_r))
        .clamp(-1.0, 1.0)
        .acos()
        .to_degrees()
}

/// Geometry of one body at one instant, before projection onto the sky.
struct BodyGeometry {
    /// Geocentric ecliptic position, AU.
    geocentric: Vector3,
    /// Heliocentric distance, AU.
    r: f64,
    /// Earth–Sun distance, AU.
    s: f64,
}

/// Analytic ephemeris for the six bodies of the sky catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrbitalEphemeris;

impl OrbitalEphemeris {
    pub fn new() -> Self {
        Self
    }

    /// Day number used by the element polynomials.
    fn day_number(observer: &Observer) -> f64 {
        observer.julian_date() - 2_451_543.5
    }

    fn obliquity(d: f64) -> f64 {
        23.4393 - 3.563e-7 * d
    }

    fn sun_geocentric(d: f64) -> Vector3 {
        // The Sun's elements describe the Earth's orbit seen from the Earth.
        Elements::of(Body::Sun, d).position()
    }

    fn moon_geocentric_er(d: f64) -> Vector3 {
        let moon = Elements::of(Body::Moon, d);
        let sun = Elements::of(Body::Sun, d);
        let (lon, lat, r) = spherical(&moon.position());

        let ms = sun.mean_anomaly;
        let mm = moon.mean_anomaly;
        let ls = ms + sun.perihelion;
        let lm = mm + moon.perihelion + moon.node;
        let dd = lm - ls;
        let f = lm - moon.node;

        let lon = lon - 1.274 * sind(mm - 2.0 * dd) + 0.658 * sind(2.0 * dd)
            - 0.186 * sind(ms)
            - 0.059 * sind(2.0 * mm - 2.0 * dd)
            - 0.057 * sind(mm - 2.0 * dd + ms)
            + 0.053 * sind(mm + 2.0 * dd)
            + 0.046 * sind(2.0 * dd - ms)
            + 0.041 * sind(mm - ms)
            - 0.035 * sind(dd)
            - 0.031 * sind(mm + ms)
            - 0.015 * sind(2.0 * f - 2.0 * dd)
            + 0.011 * sind(mm - 4.0 * dd);
        let lat = lat - 0.173 * sind(f - 2.0 * dd) - 0.055 * sind(mm - f - 2.0 * dd)
            - 0.046 * sind(mm + f - 2.0 * dd)
            + 0.033 * sind(f + 2.0 * dd)
            + 0.017 * sind(2.0 * mm + f);
        let r = r - 0.58 * cosd(mm - 2.0 * dd) - 0.46 * cosd(2.0 * dd);

        rectangular(lon, lat, r)
    }

    fn planet_heliocentric(body: Body, d: f64) -> Vector3 {
        let helio = Elements::of(body, d).position();
        if !matches!(body, Body::Jupiter | Body::Saturn) {
            return helio;
        }

        let mj = Elements::of(Body::Jupiter, d).mean_anomaly;
        let ms = Elements::of(Body::Saturn, d).mean_anomaly;
        let (lon, lat, r) = spherical(&helio);
        let (lon, lat) = if body == Body::Jupiter {
            let dlon = -0.332 * sind(2.0 * mj - 5.0 * ms - 67.6)
                - 0.056 * sind(2.0 * mj - 2.0 * ms + 21.0)
                + 0.042 * sind(3.0 * mj - 5.0 * ms + 21.0)
                - 0.036 * sind(mj - 2.0 * ms)
                + 0.022 * cosd(mj - ms)
                + 0.023 * sind(2.0 * mj - 3.0 * ms + 52.0)
                - 0.016 * sind(mj - 5.0 * ms - 69.0);
            (lon + dlon, lat)
        } else {
            let dlon = 0.812 * sind(2.0 * mj - 5.0 * ms - 67.6)
                - 0.229 * cosd(2.0 * mj - 4.0 * ms - 2.0)
                + 0.119 * sind(mj - 2.0 * ms - 3.0)
                + 0.046 * sind(2.0 * mj - 6.0 * ms - 69.0)
                + 0.014 * sind(mj - 3.0 * ms + 32.0);
            let dlat = -0.020 * cosd(2.0 * mj - 4.0 * ms - 2.0)
                + 0.018 * sind(2.0 * mj - 6.0 * ms - 49.0);
            (lon + dlon, lat + dlat)
        };
        rectangular(lon, lat, r)
    }

    fn geometry(body: Body, d: f64) -> BodyGeometry {
        let sun = Self::sun_geocentric(d);
        let s = sun.norm();
        match body {
            Body::Sun => BodyGeometry {
                geocentric: sun,
                r: 0.0,
                s,
            },
            Body::Moon => {
                let geocentric = Self::moon_geocentric_er(d) / AU_EARTH_RADII;
                BodyGeometry {
                    r: (geocentric - sun).norm(),
                    geocentric,
                    s,
                }
            }
            _ => {
                let helio = Self::planet_heliocentric(body, d);
                BodyGeometry {
                    r: helio.norm(),
                    geocentric: helio + sun,
                    s,
                }
            }
        }
    }

    fn magnitude(body: Body, geometry: &BodyGeometry, d: f64) -> f64 {
        let big_r = geometry.geocentric.norm();
        let r = geometry.r;
        // 5 log10(r R) and the phase angle only mean something for bodies off the Sun
        let distance_term = || 5.0 * (r * big_r).log10();
        let fv = || phase_angle(r, big_r, geometry.s);

        match body {
            Body::Sun => -26.74 + 5.0 * big_r.log10(),
            Body::Moon => {
                let fv = fv();
                0.23 + distance_term() + 0.026 * fv + 4.0e-9 * fv.powi(4)
            }
            Body::Venus => {
                let fv = fv();
                -4.34 + distance_term() + 0.013 * fv + 4.2e-7 * fv.powi(3)
            }
            Body::Mars => -1.51 + distance_term() + 0.016 * fv(),
            Body::Jupiter => -9.25 + distance_term() + 0.014 * fv(),
            Body::Saturn => {
                let (los, bs, _) = spherical(&geometry.geocentric);
                let ring_inclination = 28.06;
                let ring_node = 169.51 + 3.82e-5 * d;
                let sin_b = sind(ring_inclination) * cosd(bs) * sind(los - ring_node)
                    - cosd(ring_inclination) * sind(bs);
                let ring = -2.6 * sin_b.abs() + 1.2 * sin_b * sin_b;
                -9.0 + distance_term() + 0.044 * fv() + ring
            }
        }
    }
}

impl Ephemeris for OrbitalEphemeris {
    fn compute_position(&self, body: Body, observer: &Observer) -> BodyPosition {
        let d = Self::day_number(observer);
        let geometry = Self::geometry(body, d);
        let mag = Self::magnitude(body, &geometry, d);

        let (se, ce) = Self::obliquity(d).to_radians().sin_cos();
        let g = geometry.geocentric;
        let equatorial = Vector3::new(g.x, g.y * ce - g.z * se, g.y * se + g.z * ce);
        let (alt_deg, az_deg) = topocentric_altaz(&(equatorial * AU_EARTH_RADII), observer);

        BodyPosition {
            alt_deg,
            az_deg,
            mag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::Location;
    use approx::assert_abs_diff_eq;
    use chrono::{TimeZone, Utc};

    fn observer_at(y: i32, mo: u32, d: u32, h: u32) -> Observer {
        Observer::new(
            Location::from_degrees(0.0, 0.0, 0.0),
            Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap(),
        )
    }

    fn equatorial(body: Body, obs: &Observer) -> (f64, f64, f64) {
        let d = OrbitalEphemeris::day_number(obs);
        let g = OrbitalEphemeris::geometry(body, d).geocentric;
        let (se, ce) = OrbitalEphemeris::obliquity(d).to_radians().sin_cos();
        let eq = Vector3::new(g.x, g.y * ce - g.z * se, g.y * se + g.z * ce);
        let ra = eq.y.atan2(eq.x).to_degrees().rem_euclid(360.0);
        let dec = eq.z.atan2(eq.x.hypot(eq.y)).to_degrees();
        (ra, dec, eq.norm())
    }

    #[test]
    fn kepler_solution_satisfies_equation() {
        let el = Elements::of(Body::Mars, 7000.0);
        let ea = el.eccentric_anomaly();
        let m = el.mean_anomaly.to_radians();
        assert_abs_diff_eq!(ea - el.e * ea.sin(), m, epsilon = 1e-12);
    }

    #[test]
    fn sun_position_1990_04_19() {
        // Worked example for these elements: RA 26.658°, Dec 11.008°, r = 1.004323 AU
        let obs = observer_at(1990, 4, 19, 0);
        let (ra, dec, r) = equatorial(Body::Sun, &obs);
        assert_abs_diff_eq!(ra, 26.658, epsilon = 0.02);
        assert_abs_diff_eq!(dec, 11.008, epsilon = 0.02);
        assert_abs_diff_eq!(r, 1.004323, epsilon = 1e-4);
    }

    #[test]
    fn moon_position_1990_04_19() {
        // Geocentric RA 309.5°, Dec -19.1°, about 60.8 Earth radii away
        let obs = observer_at(1990, 4, 19, 0);
        let (ra, dec, r) = equatorial(Body::Moon, &obs);
        assert_abs_diff_eq!(ra, 309.5, epsilon = 0.5);
        assert_abs_diff_eq!(dec, -19.1, epsilon = 0.5);
        assert_abs_diff_eq!(r * AU_EARTH_RADII, 60.8, epsilon = 0.3);
    }

    #[test]
    fn equinox_sun_near_ra_zero() {
        let obs = observer_at(2016, 3, 20, 5);
        let (ra, dec, _) = equatorial(Body::Sun, &obs);
        let ra = if ra > 180.0 { ra - 360.0 } else { ra };
        assert!(ra.abs() < 0.2, "ra = {}", ra);
        assert!(dec.abs() < 0.1, "dec = {}", dec);
    }

    #[test]
    fn magnitudes_are_plausible() {
        let eph = OrbitalEphemeris::new();
        let obs = observer_at(2016, 3, 14, 22);
        let expected = [
            (Body::Sun, -26.9, -26.6),
            (Body::Moon, -13.0, -4.0),
            (Body::Venus, -4.9, -3.3),
            (Body::Mars, -3.0, 2.0),
            (Body::Jupiter, -2.9, -1.5),
            (Body::Saturn, -0.6, 1.5),
        ];
        for (body, lo, hi) in expected {
            let p = eph.compute_position(body, &obs);
            assert!(
                p.mag >= lo && p.mag <= hi,
                "{} magnitude {} outside [{}, {}]",
                body,
                p.mag,
                lo,
                hi
            );
        }
    }

    #[test]
    fn noon_sun_is_high_at_equator_on_equinox() {
        let eph = OrbitalEphemeris::new();
        // 2016-03-20 12:00 UTC, Greenwich meridian on the equator
        let obs = observer_at(2016, 3, 20, 12);
        let p = eph.compute_position(Body::Sun, &obs);
        assert!(p.alt_deg > 85.0, "alt = {}", p.alt_deg);
        let midnight = observer_at(2016, 3, 20, 0);
        let p = eph.compute_position(Body::Sun, &midnight);
        assert!(p.alt_deg < -85.0, "alt = {}", p.alt_deg);
    }

    #[test]
    fn positions_stay_in_range() {
        let eph = OrbitalEphemeris::new();
        for day in 0..40 {
            let obs = Observer::new(
                Location::from_degrees(-35.0 + day as f64 * 2.0, day as f64 * 9.0, 500.0),
                Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::hours(day * 101),
            );
            for body in Body::FULL_SET {
                let p = eph.compute_position(body, &obs);
                assert!((-90.0..=90.0).contains(&p.alt_deg));
                assert!((0.0..360.0).contains(&p.az_deg));
                assert!(p.mag.is_finite());
            }
        }
    }
}
