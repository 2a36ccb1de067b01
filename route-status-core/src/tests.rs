//! End-to-end pipeline tests against in-memory collaborators.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::Error;
use crate::classify::COMPLETE_CLOSURE_MARKER;
use crate::config::PipelineConfig;
use crate::feed::{FeedPayload, TrafficFeed};
use crate::loading::RouteSource;
use crate::model::Address;
use crate::pipeline::RoutePipeline;
use crate::resolve::{AddressCache, ReverseGeocoder, RoadNumberProvider};

fn test_config(sampling_interval: usize) -> PipelineConfig {
    PipelineConfig {
        sampling_interval,
        snap_threshold_m: 50.0,
        map_style: "dark-v11".to_string(),
        map_access_token: "pk.test".to_string(),
        telemetry_token: None,
    }
}

/// Ten points walking north along a meridian, ~111m apart.
fn ten_point_gpx() -> String {
    let mut points = String::new();
    for i in 0..10 {
        points.push_str(&format!(
            r#"<trkpt lat="{}" lon="139.0"/>"#,
            35.0 + i as f64 * 0.001
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><trkseg>{points}</trkseg></trk>
</gpx>"#
    )
}

struct StaticGeocoder {
    road: &'static str,
    region: &'static str,
    calls: Arc<AtomicUsize>,
}

impl StaticGeocoder {
    fn new(road: &'static str, region: &'static str) -> Self {
        Self {
            road,
            region,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl ReverseGeocoder for StaticGeocoder {
    async fn reverse(&self, _lat: f64, _lon: f64) -> Result<Address, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Address {
            road: Some(self.road.to_string()),
            region_code: Some(self.region.to_string()),
            raw: serde_json::Value::Null,
        })
    }
}

/// Provider with no code for any name: every name falls back to itself.
struct NoCodes;

impl RoadNumberProvider for NoCodes {
    async fn road_number(&self, _road_name: &str) -> Result<Option<String>, Error> {
        Ok(None)
    }
}

struct StaticFeed {
    payloads: HashMap<String, String>,
}

impl TrafficFeed for StaticFeed {
    async fn restrictions(&self, region_code: &str) -> Result<FeedPayload, Error> {
        let raw = self
            .payloads
            .get(region_code)
            .ok_or_else(|| Error::FeedUnavailable {
                region: region_code.to_string(),
                status: 404,
            })?;
        serde_json::from_str(raw).map_err(|e| Error::InvalidData(e.to_string()))
    }
}

fn closure_feed(region: &str, route_name: &str, description: &str) -> StaticFeed {
    // Span endpoints sit on the 2nd and 6th route points.
    let payload = format!(
        r#"{{"features": [{{
            "geometry": {{"type": "LineString", "coordinates": [[139.0, 35.001], [139.0, 35.005]]}},
            "properties": {{
                "c": "事故",
                "i": "区間内",
                "p": [[139.0, 35.001], [139.0, 35.005]],
                "r": "{route_name}",
                "rd": "{description}"
            }}
        }}]}}"#
    );
    StaticFeed {
        payloads: HashMap::from([(region.to_string(), payload)]),
    }
}

#[tokio::test]
async fn full_pipeline_flags_complete_closure() {
    let pipeline = RoutePipeline::new(
        StaticGeocoder::new("Test Route", "JP-13"),
        NoCodes,
        closure_feed("JP-13", "Test Route", COMPLETE_CLOSURE_MARKER),
        AddressCache::default(),
        test_config(5),
    )
    .unwrap();

    let gpx = ten_point_gpx();
    let output = pipeline
        .run(RouteSource::Bytes(gpx.as_bytes()))
        .await
        .unwrap();

    assert_eq!(output.affected_roads.len(), 1);
    assert_eq!(output.complete_closures.len(), 1);
    let record = &output.complete_closures.records[0];
    assert_eq!(record.restriction_description, COMPLETE_CLOSURE_MARKER);
    assert_eq!(record.route_name.as_deref(), Some("Test Route"));
    assert!(record.distance_km > 0.0);

    assert_eq!(output.figure.route.len(), 10);
    assert_eq!(output.figure.closed_sections.len(), 1);
    // Points 2 through 6 of the route fall inside the span.
    assert_eq!(output.figure.closed_sections[0].len(), 5);
}

#[tokio::test]
async fn sampling_interval_bounds_geocode_calls() {
    let geocoder = StaticGeocoder::new("Test Route", "JP-13");
    let calls = Arc::clone(&geocoder.calls);
    let pipeline = RoutePipeline::new(
        geocoder,
        NoCodes,
        closure_feed("JP-13", "Test Route", COMPLETE_CLOSURE_MARKER),
        AddressCache::default(),
        test_config(5),
    )
    .unwrap();

    let gpx = ten_point_gpx();
    pipeline
        .run(RouteSource::Bytes(gpx.as_bytes()))
        .await
        .unwrap();
    // 10 points at stride 5 -> 2 sampled points -> 2 geocode calls.
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn partial_restriction_stays_out_of_closures() {
    let pipeline = RoutePipeline::new(
        StaticGeocoder::new("Test Route", "JP-13"),
        NoCodes,
        closure_feed("JP-13", "Test Route", "片側交互通行"),
        AddressCache::default(),
        test_config(5),
    )
    .unwrap();

    let gpx = ten_point_gpx();
    let output = pipeline
        .run(RouteSource::Bytes(gpx.as_bytes()))
        .await
        .unwrap();

    assert_eq!(output.affected_roads.len(), 1);
    assert!(output.complete_closures.is_empty());
    assert!(output.figure.closed_sections.is_empty());
}

#[tokio::test]
async fn unmatched_route_yields_empty_tables() {
    let pipeline = RoutePipeline::new(
        StaticGeocoder::new("Other Road", "JP-13"),
        NoCodes,
        closure_feed("JP-13", "Test Route", COMPLETE_CLOSURE_MARKER),
        AddressCache::default(),
        test_config(5),
    )
    .unwrap();

    let gpx = ten_point_gpx();
    let output = pipeline
        .run(RouteSource::Bytes(gpx.as_bytes()))
        .await
        .unwrap();

    assert!(output.affected_roads.is_empty());
    assert!(output.complete_closures.is_empty());
    assert!(output.figure.closed_sections.is_empty());
    assert_eq!(output.figure.route.len(), 10);
}

#[tokio::test]
async fn feed_outage_for_one_region_is_isolated() {
    // Geocoder reports a region the feed has no payload for; the run
    // still completes with empty tables instead of failing.
    let pipeline = RoutePipeline::new(
        StaticGeocoder::new("Test Route", "JP-99"),
        NoCodes,
        closure_feed("JP-13", "Test Route", COMPLETE_CLOSURE_MARKER),
        AddressCache::default(),
        test_config(5),
    )
    .unwrap();

    let gpx = ten_point_gpx();
    let output = pipeline
        .run(RouteSource::Bytes(gpx.as_bytes()))
        .await
        .unwrap();
    assert!(output.affected_roads.is_empty());
}

#[tokio::test]
async fn malformed_route_is_fatal() {
    let pipeline = RoutePipeline::new(
        StaticGeocoder::new("Test Route", "JP-13"),
        NoCodes,
        closure_feed("JP-13", "Test Route", COMPLETE_CLOSURE_MARKER),
        AddressCache::default(),
        test_config(5),
    )
    .unwrap();

    let result = pipeline.run(RouteSource::Bytes(b"<html>nope</html>")).await;
    assert!(matches!(result, Err(Error::RouteParse(_))));
}

#[test]
fn invalid_config_rejected_before_any_network_call() {
    let result = RoutePipeline::new(
        StaticGeocoder::new("Test Route", "JP-13"),
        NoCodes,
        closure_feed("JP-13", "Test Route", COMPLETE_CLOSURE_MARKER),
        AddressCache::default(),
        test_config(0),
    );
    assert!(matches!(result, Err(Error::Config(_))));
}
