//! Classification of matched restriction features into the output table.

use geo::{Distance, Geodesic, Point};

use crate::feed::FeedFeature;
use crate::model::{RestrictionRecord, RestrictionTable};

/// Restriction description marking a full road closure, as opposed to
/// lane or partial restrictions.
pub const COMPLETE_CLOSURE_MARKER: &str = "通行止";

/// A feed feature tagged with the region whose shard it came from.
#[derive(Debug, Clone)]
pub struct MatchedFeature {
    pub region: String,
    pub feature: FeedFeature,
}

/// Geodesic length of a coordinate span in kilometers, rounded to three
/// decimals.
///
/// Only spans of exactly two points have a well-defined length here;
/// single points and longer chains yield 0.0 so the column stays
/// numeric. Span points arrive `[lon, lat]` and are read into the
/// x = lon / y = lat point convention before measuring.
pub fn span_distance_km(span: Option<&[[f64; 2]]>) -> f64 {
    match span {
        Some([start, end]) => {
            let start = Point::new(start[0], start[1]);
            let end = Point::new(end[0], end[1]);
            let km = Geodesic.distance(start, end) / 1000.0;
            (km * 1000.0).round() / 1000.0
        }
        _ => 0.0,
    }
}

/// Build the affected-roads table and its complete-closures subset.
///
/// Features without a restriction description are not actionable and
/// are filtered out. Rows whose description equals
/// [`COMPLETE_CLOSURE_MARKER`] exactly form the subset; every surviving
/// row lands in the full table. Empty input produces two empty tables.
pub fn classify_restrictions(
    matched: Vec<MatchedFeature>,
) -> (RestrictionTable, RestrictionTable) {
    let records: Vec<RestrictionRecord> = matched
        .into_iter()
        .filter_map(|m| {
            let properties = m.feature.properties;
            let restriction_description = properties.restriction_description?;
            let distance_km = span_distance_km(properties.coordinates.as_deref());
            Some(RestrictionRecord {
                region: m.region,
                work_type: properties.work_type,
                direction: properties.direction,
                location_description: properties.location_description,
                coordinates: properties.coordinates,
                route_name: properties.route_name,
                restriction_description,
                distance_km,
            })
        })
        .collect();

    let complete = records
        .iter()
        .filter(|record| record.restriction_description == COMPLETE_CLOSURE_MARKER)
        .cloned()
        .collect();

    (RestrictionTable::new(records), RestrictionTable::new(complete))
}
