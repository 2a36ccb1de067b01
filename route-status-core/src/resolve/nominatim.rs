//! Reverse-geocoding client.

use std::time::Duration;

use super::ReverseGeocoder;
use crate::Error;
use crate::model::Address;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

pub(super) const GEOCODER_USER_AGENT: &str = concat!(
    "gpx-route-status/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/route-status/gpx-route-status)"
);

/// Nominatim reverse-geocoding client.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    /// Build a client for the public Nominatim instance.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Build a client against a self-hosted instance or a test server.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(GEOCODER_USER_AGENT)
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(180))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl ReverseGeocoder for NominatimClient {
    async fn reverse(&self, lat: f64, lon: f64) -> Result<Address, Error> {
        let url = format!("{}/reverse", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "json"),
                ("lat", &lat.to_string()),
                ("lon", &lon.to_string()),
                ("zoom", "18"),
                ("addressdetails", "1"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;
        let raw = body
            .get("address")
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        Ok(Address::from_raw(raw))
    }
}
