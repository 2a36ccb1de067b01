//! Typed restriction rows and the exportable table.

use std::io::Write;

use serde::Serialize;

use crate::Error;

/// Column order of the exported table. Fixed: downstream consumers key
/// on the header row.
pub const TABLE_COLUMNS: [&str; 7] = [
    "work_type",
    "direction",
    "location_description",
    "coordinates",
    "route_name",
    "restriction_description",
    "distance_km",
];

/// One restriction matched against the route.
///
/// The feed's single-letter property codes are already renamed to
/// semantic names by the typed parser; rows reaching this struct always
/// carry a restriction description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestrictionRecord {
    /// Region code of the feed shard this record came from.
    pub region: String,
    pub work_type: Option<String>,
    pub direction: Option<String>,
    pub location_description: Option<String>,
    /// Coordinate span as reported by the feed, `[lon, lat]` per point.
    pub coordinates: Option<Vec<[f64; 2]>>,
    pub route_name: Option<String>,
    pub restriction_description: String,
    /// Geodesic length of a two-point span in kilometers; 0.0 otherwise.
    pub distance_km: f64,
}

/// A collection of restriction records with CSV export.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RestrictionTable {
    pub records: Vec<RestrictionRecord>,
}

impl RestrictionTable {
    pub fn new(records: Vec<RestrictionRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RestrictionRecord> {
        self.records.iter()
    }

    /// Coordinate spans of records with exactly two points, as
    /// `(start, end)` pairs in `geo` convention (x = lon, y = lat).
    /// Only these spans are eligible for highlighting on the map.
    pub fn two_point_spans(&self) -> Vec<(geo::Point<f64>, geo::Point<f64>)> {
        self.records
            .iter()
            .filter_map(|record| match record.coordinates.as_deref() {
                Some([start, end]) => Some((
                    geo::Point::new(start[0], start[1]),
                    geo::Point::new(end[0], end[1]),
                )),
                _ => None,
            })
            .collect()
    }

    /// Write the table as delimited text with a header row.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying writer fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(TABLE_COLUMNS)
            .map_err(|e| Error::InvalidData(format!("CSV write failed: {e}")))?;
        for record in &self.records {
            let coordinates = match &record.coordinates {
                Some(span) => serde_json::to_string(span)
                    .map_err(|e| Error::InvalidData(format!("CSV write failed: {e}")))?,
                None => String::new(),
            };
            csv.write_record([
                record.work_type.clone().unwrap_or_default(),
                record.direction.clone().unwrap_or_default(),
                record.location_description.clone().unwrap_or_default(),
                coordinates,
                record.route_name.clone().unwrap_or_default(),
                record.restriction_description.clone(),
                record.distance_km.to_string(),
            ])
            .map_err(|e| Error::InvalidData(format!("CSV write failed: {e}")))?;
        }
        csv.flush()?;
        Ok(())
    }

    /// The table rendered as a CSV string.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization fails.
    pub fn to_csv_string(&self) -> Result<String, Error> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::InvalidData(format!("CSV is not UTF-8: {e}")))
    }
}
