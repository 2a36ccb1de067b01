//! Proximity snapping of closure spans onto the route.

use geo::{Distance, Geodesic, Point};

/// Collect the route points covered by a closed section.
///
/// A single forward scan over the route: the sub-path opens at the
/// first point within `threshold_m` of the span's start OR end (the
/// check is symmetric — when the end is encountered first the span is
/// collapsed to a degenerate one ending at its start), then accumulates
/// points until one lies within `threshold_m` of the end.
///
/// Returns `None` when no end is found before the route is exhausted:
/// an unmatched span is assumed to be off-route or a snapping miss, not
/// an error.
pub fn snap_closed_section(
    route: &[Point<f64>],
    start: Point<f64>,
    end: Point<f64>,
    threshold_m: f64,
) -> Option<Vec<Point<f64>>> {
    let mut section = Vec::new();
    let mut start_found = false;
    let mut end = end;

    for &point in route {
        if !start_found {
            if Geodesic.distance(start, point) < threshold_m {
                start_found = true;
            }
            if Geodesic.distance(end, point) < threshold_m {
                start_found = true;
                end = start;
            }
        }
        if start_found {
            section.push(point);
            if Geodesic.distance(end, point) < threshold_m {
                return Some(section);
            }
        }
    }
    None
}
