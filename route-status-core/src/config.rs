//! Environment-sourced pipeline configuration.

use crate::Error;

/// Default number of route points skipped between reverse-geocode lookups.
pub const DEFAULT_SAMPLING_INTERVAL: usize = 400;

/// Default snapping threshold for matching closure endpoints to route
/// points, in meters.
pub const DEFAULT_SNAP_THRESHOLD_M: f64 = 50.0;

/// Configuration for a pipeline run.
///
/// Built explicitly and passed in rather than read from process-wide
/// state, so tests can construct arbitrary configurations.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Stride between sampled route points. Any positive value is
    /// accepted; 200/300/400 are the recommended range.
    pub sampling_interval: usize,
    /// Closure endpoints further than this from every route point are
    /// treated as off-route.
    pub snap_threshold_m: f64,
    /// Map style identifier handed to the rendering sink.
    pub map_style: String,
    /// Access credential for the tile backend.
    pub map_access_token: String,
    /// Optional observability token. Only surfaced to the caller; the
    /// pipeline itself does not export telemetry.
    pub telemetry_token: Option<String>,
}

impl PipelineConfig {
    /// Read the configuration from the process environment.
    ///
    /// Recognized variables: `SAMPLING_INTERVAL` (optional, default 400),
    /// `MAP_STYLE`, `MAP_ACCESS_TOKEN` (both required) and
    /// `TELEMETRY_TOKEN` (optional).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a required variable is missing or
    /// the interval is not a positive integer. Validation happens before
    /// any network call is made.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let sampling_interval = match lookup("SAMPLING_INTERVAL") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| Error::Config(format!("SAMPLING_INTERVAL is not an integer: {raw}")))?,
            None => DEFAULT_SAMPLING_INTERVAL,
        };

        let map_style = lookup("MAP_STYLE")
            .ok_or_else(|| Error::Config("MAP_STYLE is not set".to_string()))?;
        let map_access_token = lookup("MAP_ACCESS_TOKEN")
            .ok_or_else(|| Error::Config("MAP_ACCESS_TOKEN is not set".to_string()))?;

        let config = Self {
            sampling_interval,
            snap_threshold_m: DEFAULT_SNAP_THRESHOLD_M,
            map_style,
            map_access_token,
            telemetry_token: lookup("TELEMETRY_TOKEN"),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that must hold before the pipeline starts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero sampling interval or a
    /// non-positive snap threshold.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sampling_interval == 0 {
            return Err(Error::Config(
                "sampling interval must be positive".to_string(),
            ));
        }
        if self.snap_threshold_m <= 0.0 {
            return Err(Error::Config(
                "snap threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
