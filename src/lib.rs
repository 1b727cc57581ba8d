//! # skycat
//!
//! Predicted positions of catalog stars and the bright solar-system bodies for
//! a ground observer, and a fisheye projection that turns them into an
//! all-sky reference image.
//!
//! Given an observer location and a UTC instant, a [`SkyCatalog`] computes
//! altitude, azimuth and visual magnitude for every star in an XEphem-format
//! catalog plus the Sun, Moon, Venus, Mars, Jupiter and Saturn. A
//! [`SkyRenderer`] draws the visible subset onto a square, zenith-centred
//! canvas that can be lined up against frames from an upward-looking camera.
//!
//! ## Example
//!
//! ```no_run
//! use chrono::{TimeZone, Utc};
//! use skycat::{Location, SkyCatalog, SkyRenderer};
//!
//! let mut catalog = SkyCatalog::load("data/YBS.edb").unwrap();
//! catalog.set_location(Location::from_degrees(47.37, 8.54, 408.0));
//! catalog.set_time(Utc.with_ymd_and_hms(2016, 3, 14, 22, 30, 0).unwrap());
//! catalog.calculate().unwrap();
//!
//! let mut renderer = SkyRenderer::new(1024);
//! renderer.render_catalog(&catalog, 5.0).unwrap();
//!
//! // Which object sits near a pixel the user clicked?
//! if let Some(hit) = renderer.find_nearest(512.0, 300.0, 20.0).unwrap() {
//!     println!("{:?} at alt {:.1}, az {:.1}", hit.name, hit.alt_deg, hit.az_deg);
//! }
//! ```
//!
//! ## Accuracy
//!
//! Stars are precessed from J2000 to the date (IAU 1976) and rotated by the
//! local sidereal time. Bodies come from mean orbital elements with the main
//! lunar and Jupiter/Saturn perturbations and a topocentric correction.
//! Nutation, aberration and refraction are ignored; errors stay well below a
//! pixel for typical all-sky camera resolutions.

pub mod angle;
/// Raw star catalog readers; currently XEphem `.edb`
pub mod catalogs;
pub mod ephemeris;
mod error;
pub mod horizon;
pub mod observer;
#[cfg(feature = "image")]
pub mod renderer;
pub mod sky_catalog;
pub mod star;

pub use ephemeris::{Body, BodyPosition, Ephemeris, OrbitalEphemeris};
pub use error::{SkyError, SkyResult};
pub use observer::{Location, Observer};
#[cfg(feature = "image")]
pub use renderer::{AltAzPairs, NearestObject, PixelPoint, RenderConfig, SkyRenderer};
pub use sky_catalog::{CatalogMode, ObservationSet, SkyCatalog, SkyObject};
pub use star::CatalogStar;

// Commonly used types
// Ephemeris and precession need double precision throughout.
pub type Vector3 = nalgebra::Vector3<f64>;
pub type Matrix3 = nalgebra::Matrix3<f64>;
