//! Immutable, R-tree indexed polygon set.

use rstar::{RTree, RTreeObject, AABB};
use tracing::debug;

use crate::models::{Coordinate, LevelPolygon};

/// R-tree entry pointing back into the ordered polygon list
#[derive(Debug, Clone)]
struct IndexedPolygon {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedPolygon {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// One loaded feature set.
///
/// Keeps polygons in load order; the tree only narrows candidates, so
/// lookups return exactly what a linear first-match scan would.
pub struct FeatureSet {
    polygons: Vec<LevelPolygon>,
    tree: RTree<IndexedPolygon>,
    generation: u64,
}

impl FeatureSet {
    /// Build the index for `polygons`
    pub fn build(polygons: Vec<LevelPolygon>) -> Self {
        let indexed: Vec<IndexedPolygon> = polygons
            .iter()
            .enumerate()
            .map(|(position, polygon)| {
                let (min_x, min_y, max_x, max_y) = polygon.bbox();
                IndexedPolygon {
                    position,
                    envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
                }
            })
            .collect();

        let tree = RTree::bulk_load(indexed);
        debug!("Feature set indexed with {} entries", tree.size());

        Self {
            polygons,
            tree,
            generation: 0,
        }
    }

    pub fn empty() -> Self {
        Self::build(Vec::new())
    }

    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Load counter of the store this set was published by (0 = initial)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Polygons in load order
    pub fn polygons(&self) -> &[LevelPolygon] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// First polygon in load order containing `point`
    pub fn find_feature(&self, point: Coordinate) -> Option<(usize, &LevelPolygon)> {
        let query_envelope = AABB::from_point([point.lon, point.lat]);

        self.tree
            .locate_in_envelope_intersecting(&query_envelope)
            .filter(|ip| self.polygons[ip.position].contains(point))
            .min_by_key(|ip| ip.position)
            .map(|ip| (ip.position, &self.polygons[ip.position]))
    }

    /// Level of the first polygon containing `point`
    pub fn find_level(&self, point: Coordinate) -> Option<f64> {
        let found = self.find_feature(point).map(|(_, polygon)| polygon.level());
        debug!(
            "Level lookup at ({}, {}): {:?} (generation {})",
            point.lat, point.lon, found, self.generation
        );
        found
    }
}

impl std::fmt::Debug for FeatureSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureSet")
            .field("polygons", &self.polygons.len())
            .field("generation", &self.generation)
            .finish()
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::empty()
    }
}
