//! The sky as seen by one observer: catalog stars plus solar-system bodies.
//!
//! A [`SkyCatalog`] owns the (expensive to load) static star table and the
//! list of bodies to track. Each [`SkyCatalog::calculate`] builds a fresh
//! [`ObservationSet`] from scratch, so repeated calls never accumulate
//! duplicate bodies.
//!
//! Bodies always lead the set, in reverse construction order, followed by
//! catalog stars in file order. For the full catalog that is
//! `[Sun, Moon, Saturn, Jupiter, Mars, Venus, star0, star1, ...]`.
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use skycat::{Location, SkyCatalog};
//!
//! let mut catalog = SkyCatalog::load("data/YBS.edb").unwrap();
//! catalog.set_location(Location::from_degrees(47.37, 8.54, 408.0));
//! catalog.set_time(Utc::now());
//! let total = catalog.calculate().unwrap().len();
//! let visible = catalog.filter(0.0, 5.0).unwrap();
//! println!("{} of {} objects visible", visible.len(), total);
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::catalogs::xephem::load_xephem_catalog_from_file;
use crate::ephemeris::{Body, Ephemeris, OrbitalEphemeris};
use crate::error::{SkyError, SkyResult};
use crate::horizon::{stars_to_horizontal, znorm};
use crate::observer::{Location, Observer};
use crate::star::{star_from_xephem, CatalogStar};

/// Which objects a catalog tracks.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogMode {
    /// Star table loaded from an XEphem file, plus Venus, Mars, Jupiter,
    /// Saturn, Moon and Sun.
    Full { catalog_path: PathBuf },
    /// Only the Sun, no star table.
    SunOnly,
    /// Only the Moon, no star table.
    MoonOnly,
}

/// One row of an [`ObservationSet`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyObject<'a> {
    pub name: Option<&'a str>,
    pub mag: f64,
    pub alt_deg: f64,
    pub az_deg: f64,
}

/// Names, magnitudes, altitudes and azimuths as four parallel sequences.
///
/// Angles are in degrees: altitude in `[-90, 90]`, azimuth in `[0, 360)`.
/// A `None` name marks an object with no usable label.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObservationSet {
    pub names: Vec<Option<String>>,
    pub magnitudes: Vec<f64>,
    pub altitudes_deg: Vec<f64>,
    pub azimuths_deg: Vec<f64>,
}

impl ObservationSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            names: Vec::with_capacity(capacity),
            magnitudes: Vec::with_capacity(capacity),
            altitudes_deg: Vec::with_capacity(capacity),
            azimuths_deg: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Append one object at the end.
    pub fn push(&mut self, name: Option<String>, mag: f64, alt_deg: f64, az_deg: f64) {
        self.names.push(name);
        self.magnitudes.push(mag);
        self.altitudes_deg.push(alt_deg);
        self.azimuths_deg.push(az_deg);
    }

    pub fn get(&self, index: usize) -> Option<SkyObject<'_>> {
        (index < self.len()).then(|| SkyObject {
            name: self.names[index].as_deref(),
            mag: self.magnitudes[index],
            alt_deg: self.altitudes_deg[index],
            az_deg: self.azimuths_deg[index],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = SkyObject<'_>> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Keep objects with `alt >= min_alt_deg`, then of those the ones with
    /// `mag < max_mag`. Order is preserved and `self` is left untouched.
    pub fn filter(&self, min_alt_deg: f64, max_mag: f64) -> ObservationSet {
        let above: Vec<usize> = (0..self.len())
            .filter(|&i| self.altitudes_deg[i] >= min_alt_deg)
            .collect();
        let keep: Vec<usize> = above
            .into_iter()
            .filter(|&i| self.magnitudes[i] < max_mag)
            .collect();

        let mut out = ObservationSet::with_capacity(keep.len());
        for i in keep {
            out.push(
                self.names[i].clone(),
                self.magnitudes[i],
                self.altitudes_deg[i],
                self.azimuths_deg[i],
            );
        }
        out
    }
}

/// Static star table plus tracked bodies, evaluated for a location and time.
pub struct SkyCatalog {
    stars: Option<Arc<[CatalogStar]>>,
    bodies: Vec<Body>,
    ephemeris: Box<dyn Ephemeris>,
    location: Option<Location>,
    time: Option<DateTime<Utc>>,
    observations: Option<ObservationSet>,
}

impl std::fmt::Debug for SkyCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkyCatalog")
            .field("stars", &self.stars.as_ref().map(|s| s.len()))
            .field("bodies", &self.bodies)
            .field("location", &self.location)
            .field("time", &self.time)
            .finish_non_exhaustive()
    }
}

impl SkyCatalog {
    /// Build a catalog for the given mode. Only [`CatalogMode::Full`] touches the disk.
    pub fn new(mode: &CatalogMode) -> SkyResult<Self> {
        match mode {
            CatalogMode::Full { catalog_path } => Self::load(catalog_path),
            CatalogMode::SunOnly => Ok(Self::sun_only()),
            CatalogMode::MoonOnly => Ok(Self::moon_only()),
        }
    }

    /// Full catalog: star table from an XEphem file plus all bodies.
    pub fn load<P: AsRef<Path>>(catalog_path: P) -> SkyResult<Self> {
        let path = catalog_path.as_ref();
        info!("Loading star catalog from {}", path.display());
        let records = load_xephem_catalog_from_file(path)?;
        let stars = records
            .iter()
            .map(star_from_xephem)
            .collect::<SkyResult<Vec<CatalogStar>>>()?;
        info!("Loaded {} catalog stars", stars.len());
        Ok(Self::from_stars(stars))
    }

    /// Full catalog from an already parsed star table.
    pub fn from_stars(stars: impl Into<Arc<[CatalogStar]>>) -> Self {
        Self::with_bodies(Some(stars.into()), Body::FULL_SET.to_vec())
    }

    pub fn sun_only() -> Self {
        Self::with_bodies(None, vec![Body::Sun])
    }

    pub fn moon_only() -> Self {
        Self::with_bodies(None, vec![Body::Moon])
    }

    fn with_bodies(stars: Option<Arc<[CatalogStar]>>, bodies: Vec<Body>) -> Self {
        Self {
            stars,
            bodies,
            ephemeris: Box::new(OrbitalEphemeris::new()),
            location: None,
            time: None,
            observations: None,
        }
    }

    /// Replace the body model.
    pub fn with_ephemeris(mut self, ephemeris: Box<dyn Ephemeris>) -> Self {
        self.ephemeris = ephemeris;
        self
    }

    /// The parsed star table, shareable with other catalogs via [`SkyCatalog::from_stars`].
    pub fn stars(&self) -> Option<&Arc<[CatalogStar]>> {
        self.stars.as_ref()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = Some(location);
    }

    pub fn set_time(&mut self, time: DateTime<Utc>) {
        self.time = Some(time);
    }

    /// The observer built from the stored location and time.
    pub fn observer(&self) -> SkyResult<Observer> {
        let location = self.location.ok_or(SkyError::PreconditionViolation(
            "set_location must be called before calculate",
        ))?;
        let time = self.time.ok_or(SkyError::PreconditionViolation(
            "set_time must be called before calculate",
        ))?;
        Ok(Observer::new(location, time))
    }

    /// Compute every star and body for the stored location and time.
    ///
    /// The result is also kept for [`SkyCatalog::filter`]; calling this again
    /// replaces it.
    pub fn calculate(&mut self) -> SkyResult<&ObservationSet> {
        let observer = self.observer()?;
        let n_stars = self.stars.as_ref().map_or(0, |s| s.len());
        let mut set = ObservationSet::with_capacity(self.bodies.len() + n_stars);

        // each body goes in front of the ones before it
        for &body in self.bodies.iter().rev() {
            let p = self.ephemeris.compute_position(body, &observer);
            let (alt, az) = znorm(p.alt_deg, p.az_deg);
            set.push(Some(body.name().to_string()), p.mag, alt, az);
        }

        if let Some(stars) = &self.stars {
            let altaz = stars_to_horizontal(stars, &observer);
            for (star, (alt, az)) in stars.iter().zip(altaz) {
                let name = (!star.name.is_empty()).then(|| star.name.clone());
                set.push(name, star.mag, alt, az);
            }
        }

        debug!(
            "Calculated {} objects ({} bodies) for {}",
            set.len(),
            self.bodies.len(),
            observer.time
        );
        Ok(self.observations.insert(set))
    }

    /// The set produced by the last [`SkyCatalog::calculate`], if any.
    pub fn observations(&self) -> Option<&ObservationSet> {
        self.observations.as_ref()
    }

    /// Objects at or above `min_alt_deg` and fainter-cut at `max_mag`, from the
    /// last calculation.
    pub fn filter(&self, min_alt_deg: f64, max_mag: f64) -> SkyResult<ObservationSet> {
        self.observations
            .as_ref()
            .map(|set| set.filter(min_alt_deg, max_mag))
            .ok_or(SkyError::PreconditionViolation(
                "calculate must be called before filter",
            ))
    }
}
