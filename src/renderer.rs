//! Fisheye rendering of a computed sky.
//!
//! The projection is zenith-centred and polar: the zenith sits at the centre
//! of a square canvas, the horizon on the inscribed circle, and radial
//! distance grows linearly with zenith angle. North is at the top and
//! azimuth increases clockwise on the image, matching an upward-looking
//! all-sky camera.
//!
//! Requires the `image` feature to be enabled.
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use skycat::{Location, SkyCatalog, SkyRenderer};
//!
//! let mut catalog = SkyCatalog::load("data/YBS.edb").unwrap();
//! catalog.set_location(Location::from_degrees(47.37, 8.54, 408.0));
//! catalog.set_time(Utc::now());
//! catalog.calculate().unwrap();
//!
//! let mut renderer = SkyRenderer::new(1024);
//! let image = renderer.render_catalog(&catalog, 5.0).unwrap();
//! image.save("sky.png").unwrap();
//! ```

use std::borrow::Cow;
use std::f64::consts::FRAC_PI_2;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{GrayImage, Luma};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_text_mut, Canvas};
use tracing::{debug, warn};

use crate::error::{SkyError, SkyResult};
use crate::sky_catalog::{ObservationSet, SkyCatalog};

/// Marker and label styling.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Marker radius is `marker_base - magnitude`, truncated to whole pixels.
    /// Default: 7.0
    pub marker_base: f64,

    /// Smallest marker radius in pixels; faint objects never vanish.
    /// Default: 1
    pub min_radius: i32,

    /// Fill intensity of object markers.
    /// Default: 255
    pub marker_intensity: u8,

    /// Objects brighter than this magnitude get a name label.
    /// Default: 1.0
    pub label_max_mag: f64,

    /// Horizontal offset of a label from the marker centre, in pixels.
    /// Default: 6
    pub label_offset_px: i32,

    /// Intensity of label text.
    /// Default: 150
    pub label_intensity: u8,

    /// Label glyph height in pixels.
    /// Default: 22.0
    pub label_height_px: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            marker_base: 7.0,
            min_radius: 1,
            marker_intensity: 255,
            label_max_mag: 1.0,
            label_offset_px: 6,
            label_intensity: 150,
            label_height_px: 22.0,
        }
    }
}

/// DejaVu Sans Mono, used for labels unless another font is supplied.
/// License: `assets/DejaVuSansMono-LICENSE.txt`.
static DEFAULT_LABEL_FONT: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

fn default_label_font() -> Option<FontArc> {
    match FontArc::try_from_slice(DEFAULT_LABEL_FONT) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!("Bundled label font failed to load, labels disabled: {}", e);
            None
        }
    }
}

/// One or more `(altitude, azimuth)` pairs in radians, as accepted by
/// [`SkyRenderer::altaz_to_pixels`].
///
/// Converts from a single pair as well as from arrays, slices and vectors of
/// pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct AltAzPairs<'a>(Cow<'a, [(f64, f64)]>);

impl AltAzPairs<'_> {
    pub fn as_slice(&self) -> &[(f64, f64)] {
        &self.0
    }
}

impl From<(f64, f64)> for AltAzPairs<'static> {
    fn from(pair: (f64, f64)) -> Self {
        AltAzPairs(Cow::Owned(vec![pair]))
    }
}

impl<const N: usize> From<[(f64, f64); N]> for AltAzPairs<'static> {
    fn from(pairs: [(f64, f64); N]) -> Self {
        AltAzPairs(Cow::Owned(pairs.to_vec()))
    }
}

impl From<Vec<(f64, f64)>> for AltAzPairs<'static> {
    fn from(pairs: Vec<(f64, f64)>) -> Self {
        AltAzPairs(Cow::Owned(pairs))
    }
}

impl<'a> From<&'a [(f64, f64)]> for AltAzPairs<'a> {
    fn from(pairs: &'a [(f64, f64)]) -> Self {
        AltAzPairs(Cow::Borrowed(pairs))
    }
}

impl<'a> From<&'a Vec<(f64, f64)>> for AltAzPairs<'a> {
    fn from(pairs: &'a Vec<(f64, f64)>) -> Self {
        AltAzPairs(Cow::Borrowed(pairs.as_slice()))
    }
}

/// A projected position in canvas pixels. Origin top-left, +x right, +y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    /// Integer pixel, truncated toward zero.
    pub fn to_pixel(self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

/// Result of a pixel hit-test against the last render.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestObject {
    pub alt_deg: f64,
    pub az_deg: f64,
    pub name: Option<String>,
}

/// Renders observation sets onto a square single-channel canvas and keeps
/// the last render around for hit-testing.
pub struct SkyRenderer {
    size: u32,
    config: RenderConfig,
    font: Option<FontArc>,
    observations: ObservationSet,
    pixels: Option<Vec<PixelPoint>>,
    image: Option<GrayImage>,
}

impl SkyRenderer {
    /// Renderer for a `size`×`size` canvas with default styling.
    pub fn new(size: u32) -> Self {
        Self::with_config(size, RenderConfig::default())
    }

    pub fn with_config(size: u32, config: RenderConfig) -> Self {
        Self {
            size,
            config,
            font: default_label_font(),
            observations: ObservationSet::default(),
            pixels: None,
            image: None,
        }
    }

    /// Replace the bundled label font.
    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Project `(altitude, azimuth)` pairs, in radians, to canvas pixels.
    ///
    /// Takes a single pair or a sequence of pairs and always returns one
    /// point per pair. Objects below the horizon land outside the horizon
    /// circle and may fall off the canvas; nothing is clipped here.
    pub fn altaz_to_pixels<'a>(&self, altaz: impl Into<AltAzPairs<'a>>) -> Vec<PixelPoint> {
        let half = self.size as f64 / 2.0;
        altaz
            .into()
            .as_slice()
            .iter()
            .map(|&(alt, az)| {
                let r = (1.0 - alt / FRAC_PI_2) * half;
                let (s, c) = (-FRAC_PI_2 - az).sin_cos();
                PixelPoint {
                    x: r * c + half,
                    y: r * s + half,
                }
            })
            .collect()
    }

    /// Render every visible object of a calculated catalog brighter than
    /// `max_mag`. Visibility means at or above the horizon.
    pub fn render_catalog(&mut self, catalog: &SkyCatalog, max_mag: f64) -> SkyResult<&GrayImage> {
        let visible = catalog.filter(0.0, max_mag)?;
        Ok(self.render_observations(visible))
    }

    /// Make `observations` the current set and render it.
    pub fn render_observations(&mut self, observations: ObservationSet) -> &GrayImage {
        self.observations = observations;
        self.render()
    }

    /// Render the current set onto a fresh black canvas.
    ///
    /// Each object becomes a filled disc whose radius shrinks with magnitude;
    /// bright named objects also get a label to the right of the disc.
    pub fn render(&mut self) -> &GrayImage {
        let mut image = GrayImage::new(self.size, self.size);

        let altaz: Vec<(f64, f64)> = self
            .observations
            .altitudes_deg
            .iter()
            .zip(&self.observations.azimuths_deg)
            .map(|(alt, az)| (alt.to_radians(), az.to_radians()))
            .collect();
        let pixels = self.altaz_to_pixels(&altaz);

        let marker = Luma([self.config.marker_intensity]);
        let label = Luma([self.config.label_intensity]);
        let mut labels_drawn = 0;
        let mut labels_skipped = 0;

        for (obj, pos) in self.observations.iter().zip(&pixels) {
            let (x, y) = pos.to_pixel();
            draw_filled_circle_mut(&mut image, (x, y), self.marker_radius(obj.mag), marker);

            let Some(name) = obj.name else { continue };
            if obj.mag >= self.config.label_max_mag {
                continue;
            }
            match &self.font {
                Some(font) => {
                    let scale = PxScale::from(self.config.label_height_px);
                    // labels sit on their baseline at the marker centre row
                    let ascent = font.as_scaled(scale).ascent().round() as i32;
                    draw_text_mut(
                        &mut image,
                        label,
                        x + self.config.label_offset_px,
                        y - ascent,
                        scale,
                        font,
                        name,
                    );
                    labels_drawn += 1;
                }
                None => labels_skipped += 1,
            }
        }

        debug!(
            "Rendered {} objects on {}x{} canvas ({} labels, {} skipped without font)",
            pixels.len(),
            self.size,
            self.size,
            labels_drawn,
            labels_skipped
        );

        self.pixels = Some(pixels);
        self.image.insert(image)
    }

    /// Marker radius in pixels for a magnitude, never below `min_radius`.
    pub fn marker_radius(&self, mag: f64) -> i32 {
        ((self.config.marker_base - mag) as i32).max(self.config.min_radius)
    }

    /// The image produced by the last render.
    pub fn last_image(&self) -> Option<&GrayImage> {
        self.image.as_ref()
    }

    /// The set drawn by the last render (or to be drawn by the next).
    pub fn observations(&self) -> &ObservationSet {
        &self.observations
    }

    /// Projected positions from the last render, in set order.
    pub fn pixel_positions(&self) -> Option<&[PixelPoint]> {
        self.pixels.as_deref()
    }

    /// Find the rendered object closest to pixel `(x, y)`.
    ///
    /// Returns `None` unless the closest one lies strictly within `radius`
    /// pixels. Uses the positions cached by the last render.
    pub fn find_nearest(&self, x: f64, y: f64, radius: f64) -> SkyResult<Option<NearestObject>> {
        let pixels = self.pixels.as_ref().ok_or(SkyError::PreconditionViolation(
            "render must be called before find_nearest",
        ))?;

        let nearest = pixels
            .iter()
            .map(|p| {
                let dx = p.x - x;
                let dy = p.y - y;
                dx * dx + dy * dy
            })
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, d2)| match best {
                Some((_, best_d2)) if best_d2 <= d2 => best,
                _ => Some((i, d2)),
            });

        Ok(nearest
            .filter(|&(_, d2)| d2 < radius * radius)
            .and_then(|(i, _)| self.observations.get(i))
            .map(|obj| NearestObject {
                alt_deg: obj.alt_deg,
                az_deg: obj.az_deg,
                name: obj.name.map(str::to_string),
            }))
    }

    /// Draw a hollow circle around the projection of one `(altitude, azimuth)`
    /// pair, in radians, on any canvas (e.g. the camera frame being compared).
    pub fn highlight<C: Canvas>(&self, canvas: &mut C, altaz: (f64, f64), radius: i32, color: C::Pixel) {
        if let Some(center) = self.altaz_to_pixels(altaz).first() {
            draw_hollow_circle_mut(canvas, center.to_pixel(), radius, color);
        }
    }
}
