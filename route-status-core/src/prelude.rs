// Re-export of the key pipeline components
pub use crate::classify::{COMPLETE_CLOSURE_MARKER, classify_restrictions};
pub use crate::config::{DEFAULT_SAMPLING_INTERVAL, PipelineConfig};
pub use crate::error::Error;
pub use crate::feed::{FeedPayload, JarticClient, TrafficFeed};
pub use crate::loading::{RouteSource, extract_route, sample_route};
pub use crate::matching::{match_features, normalize_road_name};
pub use crate::model::{Address, RestrictionRecord, RestrictionTable, Route};
pub use crate::pipeline::{PipelineOutput, RoutePipeline};
pub use crate::plot::{RouteFigure, build_route_figure};
pub use crate::resolve::{
    AddressCache, NominatimClient, OverpassClient, ReverseGeocoder, RoadNumberProvider,
};
