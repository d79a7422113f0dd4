//! First-match level lookup over an ordered polygon list.

use crate::models::{Coordinate, LevelPolygon};

/// Find the first polygon (in slice order) containing `point`.
///
/// Returns its index and a reference. Earlier polygons win when geometries
/// overlap.
pub fn find_feature(
    point: Coordinate,
    polygons: &[LevelPolygon],
) -> Option<(usize, &LevelPolygon)> {
    polygons
        .iter()
        .enumerate()
        .find(|(_, polygon)| polygon.contains(point))
}

/// Level of the first polygon containing `point`, or `None`
pub fn find_level(point: Coordinate, polygons: &[LevelPolygon]) -> Option<f64> {
    find_feature(point, polygons).map(|(_, polygon)| polygon.level())
}

/// Render a lookup result the way it is shown to the user
pub fn format_level(level: Option<f64>) -> String {
    match level {
        Some(level) => format!("level = {}", level),
        None => "N/A".to_string(),
    }
}
