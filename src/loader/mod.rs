//! GeoJSON import of level-tagged polygons.

mod features;

pub use features::{load_file, parse_feature_collection, LoadError, LoadOptions};
