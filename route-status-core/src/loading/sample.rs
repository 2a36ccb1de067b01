//! Fixed-stride route decimation.

use geo::Point;

use crate::Error;
use crate::model::Route;

/// Take every `stride`-th point of the route, starting at index 0.
///
/// This is index decimation, not distance-based sampling: the subsequence
/// at indices {0, stride, 2*stride, ...} is returned, so the result
/// always holds ceil(len / stride) points and the route endpoint is not
/// forced in.
///
/// # Errors
///
/// Returns [`Error::Config`] when `stride` is zero.
pub fn sample_route(route: &Route, stride: usize) -> Result<Vec<Point<f64>>, Error> {
    if stride == 0 {
        return Err(Error::Config(
            "sampling interval must be positive".to_string(),
        ));
    }
    Ok(route.points.iter().copied().step_by(stride).collect())
}
