//! Pipeline orchestration: route file in, restriction table and map
//! figure out.

use itertools::Itertools;
use log::{info, warn};

use crate::Error;
use crate::classify::{MatchedFeature, classify_restrictions};
use crate::config::PipelineConfig;
use crate::loading::{RouteSource, extract_route, sample_route};
use crate::matching::match_features;
use crate::model::RestrictionTable;
use crate::plot::{RouteFigure, build_route_figure};
use crate::feed::{JarticClient, TrafficFeed};
use crate::resolve::{
    AddressCache, NominatimClient, OverpassClient, ReverseGeocoder, RoadNumberProvider,
    lookup_road_numbers, resolve_roads,
};

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// All matched restrictions with a description.
    pub affected_roads: RestrictionTable,
    /// The subset marking complete closures.
    pub complete_closures: RestrictionTable,
    /// Route figure with the closed sections highlighted.
    pub figure: RouteFigure,
}

/// The matching pipeline with its collaborators injected.
///
/// Clients and cache are constructed by the caller and passed in; the
/// pipeline holds no process-wide state, so tests run it against
/// in-memory fakes and a server can share one cache across runs.
pub struct RoutePipeline<G, P, F> {
    geocoder: G,
    road_numbers: P,
    feed: F,
    cache: AddressCache,
    config: PipelineConfig,
}

impl<G, P, F> RoutePipeline<G, P, F>
where
    G: ReverseGeocoder,
    P: RoadNumberProvider,
    F: TrafficFeed,
{
    /// Assemble a pipeline from its collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the configuration is invalid;
    /// validation happens here, before any network call.
    pub fn new(
        geocoder: G,
        road_numbers: P,
        feed: F,
        cache: AddressCache,
        config: PipelineConfig,
    ) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            geocoder,
            road_numbers,
            feed,
            cache,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline for one route.
    ///
    /// Zero sampled points, zero matched restrictions and zero closed
    /// sections are all valid outcomes producing empty tables and an
    /// empty-highlight figure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RouteParse`] for a malformed route file. Lookup
    /// failures follow the per-stage policies: reverse geocoding is
    /// best-effort, road-number lookups fall back to the road name, and
    /// a failing feed region is skipped without aborting the others.
    pub async fn run(&self, source: RouteSource<'_>) -> Result<PipelineOutput, Error> {
        let route = extract_route(source)?;
        let sampled = sample_route(&route, self.config.sampling_interval)?;
        info!(
            "Sampled {} of {} route points (interval {})",
            sampled.len(),
            route.len(),
            self.config.sampling_interval
        );

        info!("Resolving roads from map data");
        let resolved = resolve_roads(&self.geocoder, &self.cache, &sampled).await;
        info!(
            "Resolved {} unique roads across {} regions",
            resolved.road_names.len(),
            resolved.region_codes.len()
        );

        info!("Looking up road numbers");
        let road_numbers = lookup_road_numbers(&self.road_numbers, &resolved.road_names).await;

        info!("Fetching traffic restrictions");
        let mut payloads = Vec::new();
        for region in &resolved.region_codes {
            match self.feed.restrictions(region).await {
                Ok(payload) => payloads.push((region.clone(), payload)),
                // One region's outage must not abort the others.
                Err(e) => warn!("Skipping region {region}: {e}"),
            }
        }

        info!("Filtering restricted roads");
        let matched: Vec<MatchedFeature> = road_numbers
            .values()
            .unique()
            .flat_map(|canonical| {
                payloads.iter().flat_map(|(region, payload)| {
                    match_features(canonical, payload)
                        .into_iter()
                        .map(|feature| MatchedFeature {
                            region: region.clone(),
                            feature,
                        })
                })
            })
            .collect();

        let (affected_roads, complete_closures) = classify_restrictions(matched);
        info!(
            "{} affected roads, {} complete closures",
            affected_roads.len(),
            complete_closures.len()
        );

        let spans = complete_closures.two_point_spans();
        let figure = build_route_figure(&route, &spans, &self.config);

        Ok(PipelineOutput {
            affected_roads,
            complete_closures,
            figure,
        })
    }
}

impl RoutePipeline<NominatimClient, OverpassClient, JarticClient> {
    /// Assemble a pipeline with the production clients and a fresh
    /// 24-hour cache.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid or an HTTP
    /// client cannot be built.
    pub fn with_default_clients(config: PipelineConfig) -> Result<Self, Error> {
        Self::new(
            NominatimClient::new()?,
            OverpassClient::new()?,
            JarticClient::new()?,
            AddressCache::default(),
            config,
        )
    }
}
