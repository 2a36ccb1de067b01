//! Route geometry extracted from a track log.

use geo::Point;

/// An ordered sequence of route points.
///
/// Points use the `geo` convention: x = longitude, y = latitude (WGS84
/// degrees). Insertion order is traversal order along the recorded path
/// and is never reordered or deduplicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    pub points: Vec<Point<f64>>,
}

impl Route {
    pub fn new(points: Vec<Point<f64>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean of all point coordinates, used to center the map figure.
    /// Returns `None` for an empty route.
    pub fn centroid(&self) -> Option<Point<f64>> {
        if self.points.is_empty() {
            return None;
        }
        let count = self.points.len() as f64;
        let (sum_x, sum_y) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(x, y), p| (x + p.x(), y + p.y()));
        Some(Point::new(sum_x / count, sum_y / count))
    }
}

impl From<Vec<Point<f64>>> for Route {
    fn from(points: Vec<Point<f64>>) -> Self {
        Self { points }
    }
}
