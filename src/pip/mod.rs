//! Point-in-Polygon (PIP) level lookup.
//!
//! Even-odd containment over level-tagged polygons, an R-tree indexed
//! feature set, and a store that swaps whole sets atomically.

mod index;
pub mod lookup;
pub mod ring;
mod store;

pub use index::FeatureSet;
pub use lookup::{find_feature, find_level, format_level};
pub use ring::{locate_in_ring, RingPosition};
pub use store::FeatureStore;
