//! Router, handlers and error mapping.

use std::sync::Arc;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use route_status_core::feed::JarticClient;
use route_status_core::loading::RouteSource;
use route_status_core::resolve::{AddressCache, NominatimClient, OverpassClient};
use route_status_core::{Error, PipelineConfig, PipelineOutput, RoutePipeline};

// Track logs for long rides run to a few megabytes of XML.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared collaborators for every request. The cache outlives single
/// requests, so repeated uploads of overlapping routes stay cheap.
pub struct AppState {
    pub geocoder: NominatimClient,
    pub road_numbers: OverpassClient,
    pub feed: JarticClient,
    pub cache: AddressCache,
    pub config: PipelineConfig,
}

impl AppState {
    /// Build the production clients around a validated configuration.
    pub fn new(config: PipelineConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            geocoder: NominatimClient::new()?,
            road_numbers: OverpassClient::new()?,
            feed: JarticClient::new()?,
            cache: AddressCache::default(),
            config,
        })
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/routes/status", post(route_status))
        .route("/routes/status/csv", post(route_status_csv))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Default, Deserialize)]
struct StatusParams {
    /// Optional per-request override of the sampling interval.
    interval: Option<usize>,
}

/// Upload a GPX file, get the affected-roads table and the map figure.
async fn route_status(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatusParams>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let output = run_pipeline(&state, params, multipart).await?;
    let body = json!({
        "affected_roads": output.affected_roads.records,
        "complete_closures": output.complete_closures.records,
        "figure": output.figure.to_geojson(),
    });
    Ok(axum::Json(body).into_response())
}

/// Same pipeline, affected-roads table as downloadable CSV.
async fn route_status_csv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatusParams>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let output = run_pipeline(&state, params, multipart).await?;
    let csv = output.affected_roads.to_csv_string().map_err(ApiError)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"closed_roads.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

async fn run_pipeline(
    state: &AppState,
    params: StatusParams,
    mut multipart: Multipart,
) -> Result<PipelineOutput, ApiError> {
    let mut route_bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError(Error::InvalidData(format!("Bad upload: {e}"))))?
    {
        if field.name() == Some("route") || route_bytes.is_none() {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError(Error::InvalidData(format!("Bad upload: {e}"))))?;
            route_bytes = Some(bytes);
        }
    }
    let route_bytes = route_bytes
        .ok_or_else(|| ApiError(Error::InvalidData("No route file uploaded".to_string())))?;

    let mut config = state.config.clone();
    if let Some(interval) = params.interval {
        config.sampling_interval = interval;
    }
    info!(
        interval = config.sampling_interval,
        bytes = route_bytes.len(),
        "Processing uploaded route"
    );

    let pipeline = RoutePipeline::new(
        state.geocoder.clone(),
        state.road_numbers.clone(),
        state.feed.clone(),
        state.cache.clone(),
        config,
    )
    .map_err(ApiError)?;

    pipeline
        .run(RouteSource::Bytes(route_bytes.as_ref()))
        .await
        .map_err(ApiError)
}

/// Maps pipeline errors onto status codes; the body is the single
/// human-readable error description.
struct ApiError(Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::RouteParse(_) | Error::Config(_) | Error::InvalidData(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::FeedUnavailable { .. } | Error::Network(_) => StatusCode::BAD_GATEWAY,
            Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.0.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    fn test_state() -> Arc<AppState> {
        Arc::new(
            AppState::new(PipelineConfig {
                sampling_interval: 400,
                snap_threshold_m: 50.0,
                map_style: "dark-v11".to_string(),
                map_access_token: "pk.test".to_string(),
                telemetry_token: None,
            })
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn healthz_responds() {
        let response = app(test_state())
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_upload_is_a_bad_request() {
        let response = app(test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/routes/status")
                    .header(header::CONTENT_TYPE, "multipart/form-data; boundary=x")
                    .body(Body::from("--x--\r\n"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
