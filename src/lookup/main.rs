//! Command-line level lookup.
//!
//! Loads a GeoJSON feature collection and resolves coordinates given on the
//! command line or as `lat,lon` lines on stdin.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use geolevel::config::Config;
use geolevel::loader::load_file;
use geolevel::pip::format_level;
use geolevel::{Coordinate, FeatureStore};

#[derive(Parser, Debug)]
#[command(name = "lookup")]
#[command(about = "Resolve levels for coordinates against a GeoJSON file")]
struct Args {
    /// GeoJSON FeatureCollection to load
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Feature property holding the level
    #[arg(long)]
    property: Option<String>,

    /// Skip polygon features without a numeric level instead of failing
    #[arg(long)]
    lenient: bool,

    /// Point as "lat,lon" (repeatable). Reads stdin when omitted
    #[arg(short, long = "point", allow_hyphen_values = true)]
    points: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load_or_default(args.config.as_deref())?;

    // Logs go to stderr, results to stdout
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.global.max_level()?)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut options = config.loader.to_options();
    if let Some(property) = args.property {
        options.level_property = property;
    }
    if args.lenient {
        options.strict = false;
    }

    let file = args
        .file
        .or(config.loader.data_file)
        .context("No GeoJSON file given (use --file or loader.data_file)")?;

    let polygons = load_file(&file, &options)
        .with_context(|| format!("Failed to load features from {}", file.display()))?;
    let store = FeatureStore::new();
    store.load(polygons);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut resolved = 0usize;

    if args.points.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read stdin")?;
            if resolve_line(&store, &line, &mut out)? {
                resolved += 1;
            }
        }
    } else {
        for point in &args.points {
            if resolve_line(&store, point, &mut out)? {
                resolved += 1;
            }
        }
    }

    out.flush()?;
    info!("Resolved {} points", resolved);

    Ok(())
}

/// Resolve one `lat,lon` line and print `lat,lon<TAB>level = X` or `N/A`.
///
/// Returns false for blank or unparseable lines, which print nothing.
fn resolve_line<W: Write>(store: &FeatureStore, line: &str, out: &mut W) -> io::Result<bool> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(false);
    }

    let point: Coordinate = match line.parse() {
        Ok(point) => point,
        Err(e) => {
            warn!("Skipping line {:?}: {}", line, e);
            return Ok(false);
        }
    };

    writeln!(out, "{}\t{}", point, format_level(store.find_level(point)))?;
    Ok(true)
}
