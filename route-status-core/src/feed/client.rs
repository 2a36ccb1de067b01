//! Live traffic-restriction feed client.

use std::time::Duration;

use log::debug;
use serde::Deserialize;

use super::TrafficFeed;
use super::types::FeedPayload;
use crate::Error;

const DEFAULT_BASE_URL: &str = "https://www.jartic.or.jp";

// The upstream rejects non-browser user agents.
const FEED_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Deserialize)]
struct TargetResponse {
    target: String,
}

/// Client for the JARTIC restriction feed.
///
/// Fetching is two-step: the live-generation endpoint names the current
/// dataset ("target"), then the feature collection for a region is
/// addressed by that target and the region code.
#[derive(Debug, Clone)]
pub struct JarticClient {
    client: reqwest::Client,
    base_url: String,
}

impl JarticClient {
    /// Build a client with the production endpoint and the shared
    /// request timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Build a client against a different endpoint (tests, mirrors).
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(FEED_USER_AGENT)
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(180))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        region: &str,
    ) -> Result<T, Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::FeedUnavailable {
                region: region.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}

impl TrafficFeed for JarticClient {
    async fn restrictions(&self, region_code: &str) -> Result<FeedPayload, Error> {
        let code = region_code.strip_prefix("JP-").unwrap_or(region_code);
        // Cache-busting timestamp, value itself is irrelevant upstream.
        let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");

        let target_url = format!("{}/d/traffic_info/r1/target.json?_={stamp}", self.base_url);
        let target: TargetResponse = self.get_json(&target_url, region_code).await?;
        debug!("Feed target for region {region_code}: {}", target.target);

        let feed_url = format!(
            "{}/d/traffic_info/r1/{}/d/301/R{code}.json",
            self.base_url, target.target
        );
        self.get_json(&feed_url, region_code).await
    }
}
