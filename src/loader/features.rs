//! FeatureCollection parsing.

use geojson::{Feature, GeoJson, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Coordinate, InvalidGeometry, InvalidReason, LevelPolygon, RingRole};

/// Property holding the level in the bundled and imported data sets
pub const DEFAULT_LEVEL_PROPERTY: &str = "norma_N";

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Feature property the level is read from
    pub level_property: String,
    /// Reject polygon features without a numeric level. When false they
    /// are skipped, which is how the bundled data sets were read before.
    pub strict: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            level_property: DEFAULT_LEVEL_PROPERTY.to_string(),
            strict: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse GeoJSON: {0}")]
    Parse(#[from] geojson::Error),

    #[error("expected a FeatureCollection, got a bare geometry")]
    NotFeatureCollection,

    #[error("feature {index} has no numeric `{property}` property")]
    MissingLevel { index: usize, property: String },

    #[error("feature {index}: {source}")]
    InvalidGeometry {
        index: usize,
        #[source]
        source: InvalidGeometry,
    },

    #[error("no polygon features with a numeric `{property}` property")]
    Empty { property: String },
}

/// Read and parse a GeoJSON file
pub fn load_file<P: AsRef<Path>>(
    path: P,
    options: &LoadOptions,
) -> Result<Vec<LevelPolygon>, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loading features from {}", path.display());
    parse_feature_collection(&content, options)
}

/// Parse a FeatureCollection (or a single Feature) into level polygons.
///
/// Every part of a MultiPolygon becomes its own polygon carrying the
/// feature's level. Output keeps file order. Non-polygon features are
/// skipped.
pub fn parse_feature_collection(
    text: &str,
    options: &LoadOptions,
) -> Result<Vec<LevelPolygon>, LoadError> {
    let features = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => return Err(LoadError::NotFeatureCollection),
    };

    let feature_count = features.len();
    let mut polygons = Vec::new();
    let mut skipped = 0;

    for (index, feature) in features.iter().enumerate() {
        let parts = match polygon_parts(feature) {
            Some(parts) => parts,
            None => {
                debug!("Skipping feature {}: not a polygon geometry", index);
                skipped += 1;
                continue;
            }
        };

        let level = match feature
            .property(&options.level_property)
            .and_then(|value| value.as_f64())
        {
            Some(level) => level,
            None if options.strict => {
                return Err(LoadError::MissingLevel {
                    index,
                    property: options.level_property.clone(),
                })
            }
            None => {
                debug!(
                    "Skipping feature {}: no numeric `{}` property",
                    index, options.level_property
                );
                skipped += 1;
                continue;
            }
        };

        for rings in parts {
            let polygon = polygon_from_rings(rings, level)
                .map_err(|source| LoadError::InvalidGeometry { index, source })?;
            polygons.push(polygon);
        }
    }

    info!(
        "Parsed {} polygons from {} features ({} skipped)",
        polygons.len(),
        feature_count,
        skipped
    );

    if polygons.is_empty() {
        return Err(LoadError::Empty {
            property: options.level_property.clone(),
        });
    }

    Ok(polygons)
}

/// Polygon ring lists of a feature, or `None` for other geometry types
fn polygon_parts(feature: &Feature) -> Option<Vec<&Vec<Vec<Vec<f64>>>>> {
    match &feature.geometry.as_ref()?.value {
        Value::Polygon(rings) => Some(vec![rings]),
        Value::MultiPolygon(polygons) => Some(polygons.iter().collect()),
        _ => None,
    }
}

/// First ring is the exterior, the rest are holes
fn polygon_from_rings(
    rings: &[Vec<Vec<f64>>],
    level: f64,
) -> Result<LevelPolygon, InvalidGeometry> {
    let mut converted = rings.iter().enumerate().map(|(i, ring)| {
        let role = if i == 0 {
            RingRole::Outer
        } else {
            RingRole::Hole(i - 1)
        };
        ring_coordinates(ring).map_err(|reason| InvalidGeometry { ring: role, reason })
    });

    let outer = match converted.next() {
        Some(outer) => outer?,
        None => Vec::new(),
    };
    let holes = converted.collect::<Result<Vec<_>, _>>()?;

    LevelPolygon::new(outer, holes, level)
}

/// GeoJSON positions are `[lon, lat, (alt)]`
fn ring_coordinates(ring: &[Vec<f64>]) -> Result<Vec<Coordinate>, InvalidReason> {
    ring.iter()
        .enumerate()
        .map(|(i, position)| match position.as_slice() {
            [lon, lat, ..] => Ok(Coordinate::new(*lat, *lon)),
            _ => Err(InvalidReason::MalformedPosition(i)),
        })
        .collect()
}
