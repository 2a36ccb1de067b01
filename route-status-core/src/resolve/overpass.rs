//! Road-number lookup against the map-data query service.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use super::RoadNumberProvider;
use crate::Error;

const DEFAULT_BASE_URL: &str = "https://overpass-api.de/api/interpreter";

#[derive(Debug, Default, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Default, Deserialize)]
struct OverpassElement {
    #[serde(default)]
    tags: HashMap<String, String>,
}

/// Overpass API client resolving road names to route numbers.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: reqwest::Client,
    base_url: String,
}

impl OverpassClient {
    /// Build a client for the public Overpass instance.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Build a client against a mirror or a test server.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(super::nominatim::GEOCODER_USER_AGENT)
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(180))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl RoadNumberProvider for OverpassClient {
    async fn road_number(&self, road_name: &str) -> Result<Option<String>, Error> {
        let query = format!("[out:json];\nway[\"name\"=\"{road_name}\"];\nout tags;");
        let response: OverpassResponse = self
            .client
            .get(&self.base_url)
            .query(&[("data", query.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // The first tagged way wins; ways for the same name rarely
        // disagree on `ref`.
        Ok(response
            .elements
            .iter()
            .find_map(|element| element.tags.get("ref"))
            .map(|code| format!("{code}号")))
    }
}
