use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to parse route file: {0}")]
    RouteParse(#[from] gpx::errors::GpxError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Traffic feed unavailable for region {region} (HTTP {status})")]
    FeedUnavailable { region: String, status: u16 },
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
