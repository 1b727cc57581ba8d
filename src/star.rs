use crate::angle::{parse_degrees, parse_hours};
use crate::catalogs::xephem::XephemRecord;
use crate::error::{SkyError, SkyResult};
use crate::Vector3;

/// A fixed catalog star.
/// RA & Dec are J2000 celestial-sphere coordinates and do not depend on the observer;
/// altitude and azimuth are derived per observer when the sky is calculated.
/// The magnitude is visual magnitude (lower is brighter).
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStar {
    pub name: String,
    pub ra_rad: f64,
    pub dec_rad: f64,
    pub mag: f64,
}

impl CatalogStar {
    /// Unit vector pointing to the star's position on the celestial sphere.
    pub fn uvec(&self) -> Vector3 {
        let (rasin, racos) = self.ra_rad.sin_cos();
        let (decsin, deccos) = self.dec_rad.sin_cos();
        Vector3::new(deccos * racos, deccos * rasin, decsin)
    }
}

/// Convert a raw XEphem record to a catalog star, parsing its angle text.
///
/// Right ascension is read as hours and declination as degrees; both may be
/// decimal or sexagesimal.
pub fn star_from_xephem(record: &XephemRecord) -> SkyResult<CatalogStar> {
    let ra_rad = parse_hours(&record.ra).ok_or_else(|| {
        SkyError::malformed(record.line, format!("invalid right ascension '{}'", record.ra))
    })?;
    let dec_rad = parse_degrees(&record.dec).ok_or_else(|| {
        SkyError::malformed(record.line, format!("invalid declination '{}'", record.dec))
    })?;
    if dec_rad.abs() > std::f64::consts::FRAC_PI_2 {
        return Err(SkyError::malformed(
            record.line,
            format!("declination '{}' out of range", record.dec),
        ));
    }

    Ok(CatalogStar {
        name: record.name.clone(),
        ra_rad,
        dec_rad,
        mag: record.mag,
    })
}
