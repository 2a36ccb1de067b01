//! HTTP surface for the route-status pipeline: upload a GPX track,
//! receive the restriction table and the closure-highlight figure.

mod app;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::http::StatusCode;
use clap::Parser;
use tower::limit::ConcurrencyLimitLayer;
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tracing::info;
use tracing_subscriber::prelude::*;

use route_status_core::PipelineConfig;

use crate::app::{AppState, app};

#[derive(Parser, Debug)]
#[command(name = "route-status-server", about = "GPX route closure checker")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:3000")]
    listen: SocketAddr,
    /// Per-request timeout in seconds. A full pipeline run makes dozens
    /// of upstream calls, so this is generous by default.
    #[arg(long, default_value_t = 300)]
    request_timeout: u64,
    /// Maximum concurrently processed requests.
    #[arg(long, default_value_t = 16)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PipelineConfig::from_env()?;
    if config.telemetry_token.is_some() {
        info!("Telemetry token configured");
    }
    let state = Arc::new(AppState::new(config)?);

    let service = app(state).layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .layer(TimeoutLayer::new(Duration::from_secs(args.request_timeout)))
            .layer(ConcurrencyLimitLayer::new(args.concurrency)),
    );

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!("Listening on {}", args.listen);
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            "Request took too long to process".to_string(),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {err}"),
        )
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown handler: {e}");
    }
}
