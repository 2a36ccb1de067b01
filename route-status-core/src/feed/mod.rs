//! Traffic-restriction feed: typed payload and the fetch seam.

mod client;
mod types;

pub use client::JarticClient;
pub use types::{DROPPED_FEED_CODES, FeedFeature, FeedPayload, FeedProperties};

use crate::Error;

/// Source of current restriction records for a region.
///
/// The production implementation is [`JarticClient`]; tests substitute
/// in-memory fakes.
pub trait TrafficFeed {
    /// Fetch the current restriction features for one region code
    /// (ISO-3166-2 level-4 style, e.g. `JP-13`).
    fn restrictions(
        &self,
        region_code: &str,
    ) -> impl Future<Output = Result<FeedPayload, Error>> + Send;
}
