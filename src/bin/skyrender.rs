use std::path::PathBuf;

use ab_glyph::FontArc;
use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use image::Luma;
use skycat::{CatalogMode, Location, SkyCatalog, SkyRenderer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Catalog stars plus Sun, Moon, Venus, Mars, Jupiter and Saturn
    Full,
    /// Only the Sun
    Sun,
    /// Only the Moon
    Moon,
}

#[derive(Parser, Debug)]
#[command(name = "skyrender")]
#[command(about = "Render the predicted sky for an all-sky camera site")]
struct Args {
    /// XEphem .edb star catalog (required for --mode full)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Which objects to track
    #[arg(long, value_enum, default_value = "full")]
    mode: Mode,

    /// Observer geodetic latitude in degrees, north positive
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Observer longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Observer elevation in meters
    #[arg(long, default_value_t = 0.0)]
    elevation: f64,

    /// Observation time as RFC 3339, e.g. 2016-03-14T22:30:00Z (default: now)
    #[arg(long)]
    time: Option<DateTime<Utc>>,

    /// Output canvas edge length in pixels
    #[arg(long, default_value_t = 1024)]
    size: u32,

    /// Faintest magnitude to draw (exclusive)
    #[arg(long, default_value_t = 5.0)]
    max_mag: f64,

    /// TrueType/OpenType font for labels (default: bundled DejaVu Sans Mono)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Draw a ring around the named object
    #[arg(long)]
    highlight: Option<String>,

    /// Print every rendered object
    #[arg(long)]
    list: bool,

    /// Output PNG path
    #[arg(short, long, default_value = "sky.png")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mode = match args.mode {
        Mode::Full => match &args.catalog {
            Some(path) => CatalogMode::Full {
                catalog_path: path.clone(),
            },
            None => bail!("--catalog is required in full mode"),
        },
        Mode::Sun => CatalogMode::SunOnly,
        Mode::Moon => CatalogMode::MoonOnly,
    };

    let mut catalog = SkyCatalog::new(&mode).context("Failed to build sky catalog")?;
    let time = args.time.unwrap_or_else(Utc::now);
    catalog.set_location(Location::from_degrees(args.lat, args.lon, args.elevation));
    catalog.set_time(time);
    let total = catalog.calculate()?.len();

    let mut renderer = SkyRenderer::new(args.size);
    if let Some(path) = &args.font {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read font {}", path.display()))?;
        let font = FontArc::try_from_vec(bytes)
            .with_context(|| format!("Failed to parse font {}", path.display()))?;
        renderer = renderer.with_font(font);
    }

    let mut image = renderer.render_catalog(&catalog, args.max_mag)?.clone();
    let drawn = renderer.observations();
    info!(
        "{} of {} objects above the horizon and brighter than {} at {}",
        drawn.len(),
        total,
        args.max_mag,
        time.to_rfc3339()
    );

    if let Some(name) = &args.highlight {
        match drawn.iter().find(|obj| obj.name == Some(name.as_str())) {
            Some(obj) => {
                let altaz = (obj.alt_deg.to_radians(), obj.az_deg.to_radians());
                renderer.highlight(&mut image, altaz, 15, Luma([255]));
            }
            None => warn!("{} is not in the rendered set", name),
        }
    }

    if args.list {
        for obj in drawn.iter() {
            println!(
                "{:<20} {:>6.2} {:>7.2} {:>7.2}",
                obj.name.unwrap_or("-"),
                obj.mag,
                obj.alt_deg,
                obj.az_deg
            );
        }
    }

    image
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!("Wrote {}", args.output.display());
    Ok(())
}
