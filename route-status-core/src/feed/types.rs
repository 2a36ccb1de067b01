//! Typed traffic-feed payload.
//!
//! The upstream feed serializes restriction properties under one- and
//! two-letter codes. They are renamed to semantic fields at parse time;
//! codes in [`DROPPED_FEED_CODES`] carry no value for this system and
//! are intentionally not modeled.

use serde::Deserialize;

/// Short codes present in the feed but not carried into the table:
/// `cs` (closure state), `l` (lane type), `lo` (lane occupancy),
/// `pd` (road type), `rn` (restriction id), `j` (additional info).
pub const DROPPED_FEED_CODES: [&str; 6] = ["cs", "l", "lo", "pd", "rn", "j"];

/// A feature collection returned for one region.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedPayload {
    #[serde(default)]
    pub features: Vec<FeedFeature>,
}

/// One restriction feature: a geometry plus the coded properties.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedFeature {
    #[serde(default)]
    pub geometry: Option<geojson::Geometry>,
    #[serde(default)]
    pub properties: FeedProperties,
}

/// Restriction properties, renamed from the feed's short-code schema.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedProperties {
    #[serde(rename = "c")]
    pub work_type: Option<String>,
    #[serde(rename = "d")]
    pub direction: Option<String>,
    #[serde(rename = "i")]
    pub location_description: Option<String>,
    /// Span of the restriction, `[lon, lat]` per point. Usually two
    /// points; single points and longer chains occur.
    #[serde(rename = "p")]
    pub coordinates: Option<Vec<[f64; 2]>>,
    #[serde(rename = "r")]
    pub route_name: Option<String>,
    #[serde(rename = "rd")]
    pub restriction_description: Option<String>,
}

impl FeedFeature {
    /// Latitude and longitude sequences of the feature geometry, for
    /// callers that want the drawn line rather than the two-point span.
    ///
    /// LineString geometry is used as-is; for MultiLineString the first
    /// line is taken. Other geometry shapes yield `None`.
    pub fn geometry_lat_lon(&self) -> Option<(Vec<f64>, Vec<f64>)> {
        let line = match &self.geometry.as_ref()?.value {
            geojson::Value::LineString { coordinates: line } => line,
            geojson::Value::MultiLineString { coordinates: lines } => lines.first()?,
            _ => return None,
        };
        let (lons, lats) = line
            .iter()
            .filter(|position| position.len() >= 2)
            .map(|position| (position[0], position[1]))
            .unzip();
        Some((lats, lons))
    }
}
