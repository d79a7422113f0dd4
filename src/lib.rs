//! GeoLevel - level lookup for a location against level-tagged polygons
//!
//! This library provides shared types and modules for the lookup and serve binaries.

pub mod config;
pub mod loader;
pub mod models;
pub mod pip;

pub use models::{Coordinate, LevelPolygon};
pub use pip::{find_level, FeatureSet, FeatureStore};
