//! GPX track-log extraction.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;

use crate::Error;
use crate::model::Route;

/// A readable route input: a file on disk or an already-uploaded buffer.
///
/// Both satisfy the same extraction path, so callers that receive route
/// bytes over the wire never touch the filesystem.
#[derive(Debug, Clone, Copy)]
pub enum RouteSource<'a> {
    Path(&'a Path),
    Bytes(&'a [u8]),
}

impl<'a> From<&'a Path> for RouteSource<'a> {
    fn from(path: &'a Path) -> Self {
        Self::Path(path)
    }
}

impl<'a> From<&'a [u8]> for RouteSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

/// Extract the ordered point sequence from a GPX source.
///
/// Tracks, segments within a track and points within a segment are
/// flattened in file order.
///
/// # Errors
///
/// Returns [`Error::RouteParse`] when the input is not well-formed GPX,
/// or [`Error::IoError`] when a path-backed source cannot be read.
pub fn extract_route(source: RouteSource<'_>) -> Result<Route, Error> {
    let parsed = match source {
        RouteSource::Path(path) => gpx::read(BufReader::new(File::open(path)?))?,
        RouteSource::Bytes(bytes) => gpx::read(bytes)?,
    };

    let points: Vec<_> = parsed
        .tracks
        .iter()
        .flat_map(|track| &track.segments)
        .flat_map(|segment| &segment.points)
        .map(|waypoint| waypoint.point())
        .collect();

    info!("Extracted {} route points", points.len());
    Ok(Route::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SEGMENTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <trkseg>
      <trkpt lat="35.0" lon="139.0"/>
      <trkpt lat="35.001" lon="139.001"/>
    </trkseg>
    <trkseg>
      <trkpt lat="35.002" lon="139.002"/>
    </trkseg>
  </trk>
  <trk>
    <trkseg>
      <trkpt lat="35.003" lon="139.003"/>
    </trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn flattens_tracks_and_segments_in_order() {
        let route = extract_route(RouteSource::Bytes(TWO_SEGMENTS.as_bytes())).unwrap();
        assert_eq!(route.len(), 4);
        // geo convention: x = lon, y = lat
        assert_eq!(route.points[0].x(), 139.0);
        assert_eq!(route.points[0].y(), 35.0);
        assert_eq!(route.points[3].y(), 35.003);
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        let result = extract_route(RouteSource::Bytes(b"not a gpx file"));
        assert!(matches!(result, Err(Error::RouteParse(_))));
    }

    #[test]
    fn empty_gpx_yields_empty_route() {
        let gpx = r#"<?xml version="1.0"?><gpx version="1.1" creator="t" xmlns="http://www.topografix.com/GPX/1/1"></gpx>"#;
        let route = extract_route(RouteSource::Bytes(gpx.as_bytes())).unwrap();
        assert!(route.is_empty());
    }
}
