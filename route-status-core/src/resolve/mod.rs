//! Resolving sampled route points to road names and region codes, and
//! road names to canonical route numbers.

mod cache;
mod nominatim;
mod overpass;

pub use cache::{AddressCache, DEFAULT_CACHE_TTL};
pub use nominatim::NominatimClient;
pub use overpass::OverpassClient;

use std::collections::{HashMap, HashSet};

use futures_util::StreamExt;
use futures_util::future::join_all;
use futures_util::stream;
use geo::Point;
use log::{debug, warn};

use crate::Error;
use crate::model::Address;

/// Concurrency cap for road-number lookups. The map-data service
/// throttles aggressively, so the fan-out stays narrow.
pub const ROAD_LOOKUP_CONCURRENCY: usize = 4;

/// Reverse-geocoding seam. The production implementation is
/// [`NominatimClient`]; tests substitute in-memory fakes.
pub trait ReverseGeocoder {
    /// Resolve one coordinate pair to address metadata.
    fn reverse(&self, lat: f64, lon: f64) -> impl Future<Output = Result<Address, Error>> + Send;
}

/// Road-number seam. The production implementation is [`OverpassClient`].
pub trait RoadNumberProvider {
    /// Resolve a road name to its route number, `None` when the map
    /// data carries no code for it.
    fn road_number(
        &self,
        road_name: &str,
    ) -> impl Future<Output = Result<Option<String>, Error>> + Send;
}

/// Deduplicated output of the reverse-geocode stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedRoads {
    pub road_names: HashSet<String>,
    pub region_codes: HashSet<String>,
}

/// Reverse-geocode every sampled point concurrently and collect the
/// unique road names and region codes.
///
/// All lookups are issued at once and joined; the cache short-circuits
/// repeated coordinates within its TTL. Failed lookups are dropped from
/// the batch and logged (best-effort policy): with three external
/// services in one pipeline run, a single flaky response must not sink
/// the route. Points that resolve without a road name or region code
/// are filtered out of the respective set.
pub async fn resolve_roads<G: ReverseGeocoder>(
    geocoder: &G,
    cache: &AddressCache,
    points: &[Point<f64>],
) -> ResolvedRoads {
    let lookups = points.iter().map(|point| {
        // Points are stored x = lon, y = lat.
        let (lat, lon) = (point.y(), point.x());
        async move {
            if let Some(address) = cache.get(lat, lon) {
                debug!("Cache hit for ({lat}, {lon})");
                return Some(address);
            }
            match geocoder.reverse(lat, lon).await {
                Ok(address) => {
                    cache.insert(lat, lon, address.clone());
                    Some(address)
                }
                Err(e) => {
                    warn!("Dropping reverse-geocode result for ({lat}, {lon}): {e}");
                    None
                }
            }
        }
    });

    let addresses: Vec<Address> = join_all(lookups).await.into_iter().flatten().collect();

    let mut resolved = ResolvedRoads::default();
    for address in addresses {
        if let Some(road) = address.road {
            resolved.road_names.insert(road);
        }
        if let Some(region) = address.region_code {
            resolved.region_codes.insert(region);
        }
    }
    resolved
}

/// Map each road name to its canonical road number.
///
/// Lookups run as a bounded fan-out ([`ROAD_LOOKUP_CONCURRENCY`] at a
/// time). A name with no code in the map data, or whose lookup fails,
/// falls back to the name itself so one unreachable service degrades
/// matching instead of aborting the run.
pub async fn lookup_road_numbers<P: RoadNumberProvider>(
    provider: &P,
    road_names: &HashSet<String>,
) -> HashMap<String, String> {
    stream::iter(road_names.iter().cloned())
        .map(|name| async move {
            let number = match provider.road_number(&name).await {
                Ok(Some(code)) => code,
                Ok(None) => name.clone(),
                Err(e) => {
                    warn!("Road-number lookup failed for {name}: {e}");
                    name.clone()
                }
            };
            (name, number)
        })
        .buffer_unordered(ROAD_LOOKUP_CONCURRENCY)
        .collect()
        .await
}
