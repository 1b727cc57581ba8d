//! Equatorial → horizontal coordinate transforms.
//!
//! Horizontal frame conventions: altitude is measured up from the horizon,
//! azimuth from north through east. Vectors in the horizontal frame are
//! stored as `(north, east, up)`.
//!
//! Catalog stars are J2000; they are precessed to the mean equinox of date
//! (IAU 1976) and then rotated by local sidereal time and latitude. Both
//! steps collapse into a single 3×3 matrix that is applied to all stars at once.
//! Nutation, aberration and refraction are not modelled.

use nalgebra::Matrix3xX;

use crate::angle::{wrap_degrees, wrap_two_pi};
use crate::observer::Observer;
use crate::star::CatalogStar;
use crate::{Matrix3, Vector3};

const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// Precession matrix from the J2000 mean equator to the mean equator of date.
///
/// `t` is Julian centuries since J2000.0. `v_date = P * v_j2000`.
pub fn precession_matrix(t: f64) -> Matrix3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let zeta = (2306.2181 * t + 0.30188 * t2 + 0.017998 * t3) * ARCSEC_TO_RAD;
    let z = (2306.2181 * t + 1.09468 * t2 + 0.018203 * t3) * ARCSEC_TO_RAD;
    let theta = (2004.3109 * t - 0.42665 * t2 - 0.041833 * t3) * ARCSEC_TO_RAD;

    let (sz, cz) = zeta.sin_cos();
    let (szz, czz) = z.sin_cos();
    let (st, ct) = theta.sin_cos();

    Matrix3::new(
        cz * ct * czz - sz * szz,
        -sz * ct * czz - cz * szz,
        -st * czz,
        cz * ct * szz + sz * czz,
        -sz * ct * szz + cz * czz,
        -st * szz,
        cz * st,
        -sz * st,
        ct,
    )
}

/// Rotation from the equatorial frame of date to the local `(north, east, up)` frame.
pub fn horizontal_matrix(latitude_rad: f64, local_sidereal_rad: f64) -> Matrix3 {
    let (sp, cp) = latitude_rad.sin_cos();
    let (sl, cl) = local_sidereal_rad.sin_cos();
    Matrix3::new(
        -sp * cl, -sp * sl, cp, //
        -sl, cl, 0.0, //
        cp * cl, cp * sl, sp,
    )
}

/// Combined J2000 → horizontal rotation for an observer.
pub fn j2000_to_horizontal(observer: &Observer) -> Matrix3 {
    horizontal_matrix(
        observer.location.latitude_rad,
        observer.local_sidereal_time(),
    ) * precession_matrix(observer.centuries_since_j2000())
}

/// Altitude and azimuth (radians) of a horizontal-frame vector of any length.
///
/// Azimuth is in `[0, 2π)`. A zero vector maps to the zenith.
pub fn altaz_from_vector(v: &Vector3) -> (f64, f64) {
    let n = v.norm();
    if n == 0.0 {
        return (std::f64::consts::FRAC_PI_2, 0.0);
    }
    let alt = (v.z / n).clamp(-1.0, 1.0).asin();
    let az = wrap_two_pi(v.y.atan2(v.x));
    (alt, az)
}

/// Altitude and azimuth (radians) of an equatorial-of-date direction.
pub fn equatorial_to_horizontal(ra_rad: f64, dec_rad: f64, observer: &Observer) -> (f64, f64) {
    let (sra, cra) = ra_rad.sin_cos();
    let (sdec, cdec) = dec_rad.sin_cos();
    let m = horizontal_matrix(
        observer.location.latitude_rad,
        observer.local_sidereal_time(),
    );
    altaz_from_vector(&(m * Vector3::new(cdec * cra, cdec * sra, sdec)))
}

/// Horizontal coordinates of every star, in degrees, in input order.
///
/// All stars go through one matrix product.
pub fn stars_to_horizontal(stars: &[CatalogStar], observer: &Observer) -> Vec<(f64, f64)> {
    if stars.is_empty() {
        return Vec::new();
    }
    let uvecs: Vec<Vector3> = stars.iter().map(CatalogStar::uvec).collect();
    let horizontal = j2000_to_horizontal(observer) * Matrix3xX::from_columns(&uvecs);

    horizontal
        .column_iter()
        .map(|col| {
            let (alt, az) = altaz_from_vector(&col.into_owned());
            (alt.to_degrees(), wrap_degrees(az.to_degrees()))
        })
        .collect()
}

/// Fold an altitude into `[-90, 90]` degrees, turning the azimuth around by
/// 180° whenever the altitude passed over the zenith or nadir.
///
/// The azimuth is always returned wrapped into `[0, 360)`.
pub fn znorm(alt_deg: f64, az_deg: f64) -> (f64, f64) {
    // into (-180, 180]
    let mut alt = 180.0 - (180.0 - alt_deg).rem_euclid(360.0);
    let mut az = az_deg;
    if alt > 90.0 {
        alt = 180.0 - alt;
        az += 180.0;
    } else if alt < -90.0 {
        alt = -180.0 - alt;
        az += 180.0;
    }
    (alt, wrap_degrees(az))
}
