//! Level-tagged polygon.

use geo::{BoundingRect, Coord, LineString, Polygon, Rect};
use thiserror::Error;

use super::Coordinate;
use crate::pip::ring::{locate_in_ring, RingPosition};

/// Which ring of a polygon a geometry problem was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingRole {
    Outer,
    /// Hole, by position in the hole list
    Hole(usize),
}

impl std::fmt::Display for RingRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RingRole::Outer => write!(f, "outer ring"),
            RingRole::Hole(i) => write!(f, "hole {}", i),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("{0} distinct points, at least 3 required")]
    TooFewPoints(usize),
    #[error("non-finite coordinate at position {0}")]
    NonFinite(usize),
    #[error("position {0} has fewer than 2 ordinates")]
    MalformedPosition(usize),
}

/// A ring that cannot bound a polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid geometry in {ring}: {reason}")]
pub struct InvalidGeometry {
    pub ring: RingRole,
    pub reason: InvalidReason,
}

/// A polygon (outer ring plus holes) carrying a numeric level.
///
/// Rings are validated and closed on construction and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelPolygon {
    geometry: Polygon<f64>,
    bbox: Rect<f64>,
    level: f64,
}

impl LevelPolygon {
    /// Build from an outer ring and holes given as geographic coordinates.
    ///
    /// Rings may be open or closed. Each needs at least 3 distinct positions
    /// once the closing point is dropped.
    pub fn new(
        outer: Vec<Coordinate>,
        holes: Vec<Vec<Coordinate>>,
        level: f64,
    ) -> Result<Self, InvalidGeometry> {
        let outer = ring_from_coords(outer.into_iter().map(Coordinate::to_coord).collect())
            .map_err(|reason| InvalidGeometry {
                ring: RingRole::Outer,
                reason,
            })?;

        let holes = holes
            .into_iter()
            .enumerate()
            .map(|(i, hole)| {
                ring_from_coords(hole.into_iter().map(Coordinate::to_coord).collect()).map_err(
                    |reason| InvalidGeometry {
                        ring: RingRole::Hole(i),
                        reason,
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_rings(outer, holes, level)
    }

    /// Build from an existing `geo` polygon (x = lon, y = lat)
    pub fn from_polygon(polygon: Polygon<f64>, level: f64) -> Result<Self, InvalidGeometry> {
        let (exterior, interiors) = polygon.into_inner();

        let outer = ring_from_coords(exterior.0).map_err(|reason| InvalidGeometry {
            ring: RingRole::Outer,
            reason,
        })?;
        let holes = interiors
            .into_iter()
            .enumerate()
            .map(|(i, hole)| {
                ring_from_coords(hole.0).map_err(|reason| InvalidGeometry {
                    ring: RingRole::Hole(i),
                    reason,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_rings(outer, holes, level)
    }

    fn from_rings(
        outer: LineString<f64>,
        holes: Vec<LineString<f64>>,
        level: f64,
    ) -> Result<Self, InvalidGeometry> {
        let geometry = Polygon::new(outer, holes);
        let bbox = geometry.bounding_rect().ok_or(InvalidGeometry {
            ring: RingRole::Outer,
            reason: InvalidReason::TooFewPoints(0),
        })?;

        Ok(Self {
            geometry,
            bbox,
            level,
        })
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn geometry(&self) -> &Polygon<f64> {
        &self.geometry
    }

    pub fn outer(&self) -> &LineString<f64> {
        self.geometry.exterior()
    }

    pub fn holes(&self) -> &[LineString<f64>] {
        self.geometry.interiors()
    }

    /// Bounding box as (min_lon, min_lat, max_lon, max_lat)
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        (
            self.bbox.min().x,
            self.bbox.min().y,
            self.bbox.max().x,
            self.bbox.max().y,
        )
    }

    /// Strict-interior containment under the even-odd rule.
    ///
    /// A point on the outer ring or on a hole's boundary is not contained.
    pub fn contains(&self, point: Coordinate) -> bool {
        let p = point.to_coord();
        let (min, max) = (self.bbox.min(), self.bbox.max());
        if p.x < min.x || p.x > max.x || p.y < min.y || p.y > max.y {
            return false;
        }

        if locate_in_ring(p, self.outer()) != RingPosition::Inside {
            return false;
        }

        self.holes()
            .iter()
            .all(|hole| locate_in_ring(p, hole) == RingPosition::Outside)
    }
}

/// Validate a ring and return it closed
fn ring_from_coords(mut coords: Vec<Coord<f64>>) -> Result<LineString<f64>, InvalidReason> {
    if let Some(i) = coords
        .iter()
        .position(|c| !c.x.is_finite() || !c.y.is_finite())
    {
        return Err(InvalidReason::NonFinite(i));
    }

    // Drop the closing point and consecutive repeats before counting
    coords.dedup();
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }

    if coords.len() < 3 {
        return Err(InvalidReason::TooFewPoints(coords.len()));
    }

    coords.push(coords[0]);
    Ok(LineString::new(coords))
}
