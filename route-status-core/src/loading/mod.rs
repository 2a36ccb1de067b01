//! This module is responsible for loading a recorded route from a track
//! log and downsampling it for the lookup stages.

mod gpx;
mod sample;

pub use gpx::{RouteSource, extract_route};
pub use sample::sample_route;
