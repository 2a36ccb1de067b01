//! Map-figure assembly: the full route plus highlighted closed sections.

mod snap;

pub use snap::snap_closed_section;

use geo::{LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoJsonValue};
use log::debug;
use serde_json::json;

use crate::Error;
use crate::config::PipelineConfig;
use crate::model::Route;

/// Default zoom level for the rendered map.
pub const FIGURE_ZOOM: u8 = 10;

/// Renderable description of the output map.
///
/// The rendering library itself is a sink: it receives the route
/// polyline, zero or more closed-section polylines and the style /
/// credential pair, all carried here.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteFigure {
    /// The full recorded route, drawn as one blue line.
    pub route: Vec<Point<f64>>,
    /// Closed sections snapped onto the route, drawn red on top.
    pub closed_sections: Vec<Vec<Point<f64>>>,
    /// Mean route coordinate, where the map is centered.
    pub center: Point<f64>,
    pub style: String,
    pub access_token: String,
}

/// Snap every eligible closure span onto the route and assemble the
/// figure.
///
/// Each span is scanned independently against the full route, so
/// overlapping highlights are possible and are not merged. Spans whose
/// endpoints never come within the snap threshold of the route are
/// dropped silently.
pub fn build_route_figure(
    route: &Route,
    spans: &[(Point<f64>, Point<f64>)],
    config: &PipelineConfig,
) -> RouteFigure {
    let closed_sections: Vec<Vec<Point<f64>>> = spans
        .iter()
        .filter_map(|&(start, end)| {
            let section =
                snap_closed_section(&route.points, start, end, config.snap_threshold_m);
            if section.is_none() {
                debug!("Closure span at ({start:?}) did not snap onto the route");
            }
            section
        })
        .collect();

    RouteFigure {
        route: route.points.clone(),
        closed_sections,
        center: route.centroid().unwrap_or_else(|| Point::new(0.0, 0.0)),
        style: config.map_style.clone(),
        access_token: config.map_access_token.clone(),
    }
}

impl RouteFigure {
    /// Render the figure as a GeoJSON `FeatureCollection`: one feature
    /// for the route and one per closed section, with styling carried
    /// in feature properties and map setup in the collection's foreign
    /// members.
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features = Vec::with_capacity(1 + self.closed_sections.len());
        features.push(line_feature(&self.route, "Route", "blue", 3));
        for section in &self.closed_sections {
            features.push(line_feature(section, "Closed Road", "red", 5));
        }

        let mut foreign_members = JsonObject::new();
        foreign_members.insert("style".to_string(), json!(self.style));
        foreign_members.insert(
            "center".to_string(),
            json!({"lat": self.center.y(), "lon": self.center.x()}),
        );
        foreign_members.insert("zoom".to_string(), json!(FIGURE_ZOOM));
        foreign_members.insert("access_token".to_string(), json!(self.access_token));

        FeatureCollection {
            features,
            bbox: None,
            foreign_members: Some(foreign_members),
        }
    }

    /// The figure serialized as a GeoJSON string.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization fails.
    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson())
            .map_err(|e| Error::InvalidData(format!("GeoJSON serialization failed: {e}")))
    }
}

fn line_feature(points: &[Point<f64>], name: &str, color: &str, width: u8) -> Feature {
    let line = LineString::from(points.to_vec());
    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), json!(name));
    properties.insert("color".to_string(), json!(color));
    properties.insert("width".to_string(), json!(width));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoJsonValue::from(&line))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PipelineConfig {
        PipelineConfig {
            sampling_interval: 400,
            snap_threshold_m: 50.0,
            map_style: "dark-v11".to_string(),
            map_access_token: "pk.test".to_string(),
            telemetry_token: None,
        }
    }

    fn route() -> Route {
        Route::new(
            (0..5)
                .map(|i| Point::new(139.0, 35.0 + i as f64 * 0.001))
                .collect(),
        )
    }

    #[test]
    fn snapped_span_becomes_red_section() {
        let route = route();
        let spans = vec![(route.points[1], route.points[3])];
        let figure = build_route_figure(&route, &spans, &config());
        assert_eq!(figure.closed_sections.len(), 1);
        assert_eq!(figure.closed_sections[0].len(), 3);
    }

    #[test]
    fn unsnappable_span_is_dropped() {
        let route = route();
        let spans = vec![(Point::new(140.0, 36.0), Point::new(140.0, 36.1))];
        let figure = build_route_figure(&route, &spans, &config());
        assert!(figure.closed_sections.is_empty());
    }

    #[test]
    fn geojson_has_route_plus_sections() {
        let route = route();
        let spans = vec![(route.points[0], route.points[2])];
        let figure = build_route_figure(&route, &spans, &config());
        let collection = figure.to_geojson();
        assert_eq!(collection.features.len(), 2);

        let first = &collection.features[0];
        let properties = first.properties.as_ref().unwrap();
        assert_eq!(properties["color"], json!("blue"));
        let second = &collection.features[1];
        assert_eq!(second.properties.as_ref().unwrap()["color"], json!("red"));

        let foreign = collection.foreign_members.as_ref().unwrap();
        assert_eq!(foreign["style"], json!("dark-v11"));
    }

    #[test]
    fn center_is_route_mean() {
        let figure = build_route_figure(&route(), &[], &config());
        assert!((figure.center.y() - 35.002).abs() < 1e-9);
        assert_eq!(figure.center.x(), 139.0);
    }
}
