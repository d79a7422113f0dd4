//! Even-odd ray casting against a single ring.

use geo::{Coord, LineString};

/// Where a point lies relative to one ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingPosition {
    Inside,
    Outside,
    OnBoundary,
}

/// Locate `point` relative to `ring` (x = lon, y = lat).
///
/// Casts a ray towards +x and counts edge crossings; an odd count means
/// inside. Points lying exactly on an edge or vertex are reported as
/// `OnBoundary` before any crossing is counted, so the half-open crossing
/// rule never decides a boundary point. The ring may be open or closed.
/// Plain floating-point comparisons, no tolerance.
pub fn locate_in_ring(point: Coord<f64>, ring: &LineString<f64>) -> RingPosition {
    let coords = &ring.0;
    let n = coords.len();
    if n == 0 {
        return RingPosition::Outside;
    }

    let mut inside = false;

    for i in 0..n {
        let a = coords[i];
        let b = coords[(i + 1) % n];

        if on_segment(point, a, b) {
            return RingPosition::OnBoundary;
        }

        // Half-open in y: an edge counts if exactly one endpoint is above the ray
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
    }

    if inside {
        RingPosition::Inside
    } else {
        RingPosition::Outside
    }
}

fn on_segment(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    if cross != 0.0 {
        return false;
    }
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coordinate_position::{CoordPos, CoordinatePosition};
    use geo::{coord, line_string, Polygon};

    fn square() -> LineString<f64> {
        line_string![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 10.0),
            (x: 10.0, y: 10.0),
            (x: 10.0, y: 0.0),
            (x: 0.0, y: 0.0)
        ]
    }

    /// U shape, opening towards +y
    fn concave() -> LineString<f64> {
        line_string![
            (x: 0.0, y: 0.0),
            (x: 6.0, y: 0.0),
            (x: 6.0, y: 6.0),
            (x: 4.0, y: 6.0),
            (x: 4.0, y: 2.0),
            (x: 2.0, y: 2.0),
            (x: 2.0, y: 6.0),
            (x: 0.0, y: 6.0)
        ]
    }

    #[test]
    fn test_square() {
        let ring = square();
        assert_eq!(locate_in_ring(coord! { x: 5.0, y: 5.0 }, &ring), RingPosition::Inside);
        assert_eq!(locate_in_ring(coord! { x: 15.0, y: 15.0 }, &ring), RingPosition::Outside);
        assert_eq!(locate_in_ring(coord! { x: -1.0, y: 5.0 }, &ring), RingPosition::Outside);
    }

    #[test]
    fn test_boundary() {
        let ring = square();
        assert_eq!(locate_in_ring(coord! { x: 0.0, y: 0.0 }, &ring), RingPosition::OnBoundary);
        assert_eq!(locate_in_ring(coord! { x: 10.0, y: 3.0 }, &ring), RingPosition::OnBoundary);
        assert_eq!(locate_in_ring(coord! { x: 5.0, y: 10.0 }, &ring), RingPosition::OnBoundary);
    }

    #[test]
    fn test_concave_notch() {
        let ring = concave();
        assert_eq!(locate_in_ring(coord! { x: 1.0, y: 4.0 }, &ring), RingPosition::Inside);
        assert_eq!(locate_in_ring(coord! { x: 5.0, y: 4.0 }, &ring), RingPosition::Inside);
        assert_eq!(locate_in_ring(coord! { x: 3.0, y: 4.0 }, &ring), RingPosition::Outside);
        assert_eq!(locate_in_ring(coord! { x: 3.0, y: 1.0 }, &ring), RingPosition::Inside);
        // Ray through the notch floor vertices
        assert_eq!(locate_in_ring(coord! { x: 1.0, y: 2.0 }, &ring), RingPosition::Inside);
        assert_eq!(locate_in_ring(coord! { x: 3.0, y: 2.0 }, &ring), RingPosition::OnBoundary);
    }

    #[test]
    fn test_open_ring_implicitly_closed() {
        let mut ring = square();
        ring.0.pop();
        assert_eq!(locate_in_ring(coord! { x: 5.0, y: 5.0 }, &ring), RingPosition::Inside);
        assert_eq!(locate_in_ring(coord! { x: 5.0, y: 0.0 }, &ring), RingPosition::OnBoundary);
    }

    #[test]
    fn test_rotated_ring() {
        // Diamond, no axis-aligned edges
        let ring = line_string![
            (x: 0.0, y: -3.0),
            (x: 3.0, y: 0.0),
            (x: 0.0, y: 3.0),
            (x: -3.0, y: 0.0)
        ];
        assert_eq!(locate_in_ring(coord! { x: 1.0, y: 1.0 }, &ring), RingPosition::Inside);
        assert_eq!(locate_in_ring(coord! { x: 2.0, y: 2.0 }, &ring), RingPosition::Outside);
        assert_eq!(locate_in_ring(coord! { x: 1.5, y: 1.5 }, &ring), RingPosition::OnBoundary);
        // Ray passes exactly through the right-hand vertex
        assert_eq!(locate_in_ring(coord! { x: -1.0, y: 0.0 }, &ring), RingPosition::Inside);
        assert_eq!(locate_in_ring(coord! { x: -4.0, y: 0.0 }, &ring), RingPosition::Outside);
    }

    #[test]
    fn test_agrees_with_geo_on_grid() {
        let ring = concave();
        let polygon = Polygon::new(ring.clone(), vec![]);

        for xi in -2..=14 {
            for yi in -2..=14 {
                let c = coord! { x: xi as f64 * 0.5, y: yi as f64 * 0.5 };
                let expected = match polygon.coordinate_position(&c) {
                    CoordPos::Inside => RingPosition::Inside,
                    CoordPos::Outside => RingPosition::Outside,
                    CoordPos::OnBoundary => RingPosition::OnBoundary,
                };
                assert_eq!(locate_in_ring(c, &ring), expected, "at {:?}", c);
            }
        }
    }
}
