//! Reverse-geocoded metadata for a single route point.

use serde::{Deserialize, Serialize};

/// Resolved address details for one coordinate pair.
///
/// Both fields are optional: points in open country resolve to no road,
/// and some responses omit the administrative subdivision entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Human-readable road name, when the point lies on a named way.
    pub road: Option<String>,
    /// ISO-3166-2 level-4 subdivision code, e.g. `JP-13`.
    pub region_code: Option<String>,
    /// The raw `address` payload as returned by the geocoder, kept for
    /// diagnostics.
    pub raw: serde_json::Value,
}

impl Address {
    /// Build an address from the geocoder's `address` JSON object.
    pub fn from_raw(raw: serde_json::Value) -> Self {
        let road = raw
            .get("road")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let region_code = raw
            .get("ISO3166-2-lvl4")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        Self {
            road,
            region_code,
            raw,
        }
    }
}
