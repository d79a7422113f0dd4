//! Core data models for level lookup.

pub mod coordinate;
pub mod polygon;

pub use coordinate::{Coordinate, CoordinateParseError};
pub use polygon::{InvalidGeometry, InvalidReason, LevelPolygon, RingRole};
