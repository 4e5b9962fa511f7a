//! District API Server
//!
//! HTTP API exposing the district resolver and the distance service to the
//! search and listing UI.

use crate::application::{DistrictResolver, ResolverError};
use crate::domain::entities::ManualDistrict;
use crate::domain::services::{format_distance, haversine_distance_km, initial_bearing_deg};
use crate::domain::value_objects::{GeoError, GeoPoint};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Query string for the distance endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceQuery {
    pub from_lat: f64,
    pub from_lng: f64,
    pub to_lat: f64,
    pub to_lng: f64,
}

/// Distance between two points, ready for display.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceResponse {
    pub km: f64,
    pub meters: f64,
    pub label: String,
    pub bearing_deg: f64,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub district: Option<String>,
}

/// API Server state.
#[derive(Clone)]
pub struct ApiState {
    pub resolver: Arc<DistrictResolver>,
}

impl ApiState {
    pub fn new(resolver: Arc<DistrictResolver>) -> Self {
        Self { resolver }
    }
}

/// Build the router. Split from `run` so tests can drive it directly.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/v1/district",
            get(get_district_handler)
                .put(set_district_handler)
                .delete(reset_district_handler),
        )
        .route("/api/v1/district/detect", post(detect_handler))
        .route("/api/v1/distance", get(distance_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API Server for district resolution.
pub struct ApiServer {
    listen_addr: String,
    state: ApiState,
}

impl ApiServer {
    pub fn new(listen_addr: String, resolver: Arc<DistrictResolver>) -> Self {
        Self {
            listen_addr,
            state: ApiState::new(resolver),
        }
    }

    /// Run the API server.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run(&self) -> anyhow::Result<()> {
        let app = router(self.state.clone());

        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("district API listening on {}", self.listen_addr);

        axum::serve(listener, app).await?;
        Ok(())
    }
}

// Handler functions

async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        district: state.resolver.district().map(|d| d.id.to_string()),
    };
    Json(response)
}

async fn get_district_handler(State(state): State<ApiState>) -> impl IntoResponse {
    Json(state.resolver.snapshot())
}

async fn detect_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let district = state.resolver.detect().await;
    Json(district)
}

async fn set_district_handler(
    State(state): State<ApiState>,
    Json(data): Json<ManualDistrict>,
) -> Response {
    match state.resolver.set_district_manual(data) {
        Ok(district) => (StatusCode::OK, Json(district)).into_response(),
        Err(ResolverError::ManualDistrictInvalid(reason)) => {
            tracing::debug!("rejected manual district: {}", reason);
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "invalid district",
                    "reason": reason
                })),
            )
                .into_response()
        }
    }
}

async fn reset_district_handler(State(state): State<ApiState>) -> impl IntoResponse {
    state.resolver.reset_district();
    StatusCode::NO_CONTENT
}

async fn distance_handler(Query(q): Query<DistanceQuery>) -> Response {
    match distance_between(&q) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": e.to_string()
            })),
        )
            .into_response(),
    }
}

fn distance_between(q: &DistanceQuery) -> Result<DistanceResponse, GeoError> {
    let from = GeoPoint::new(q.from_lat, q.from_lng)?;
    let to = GeoPoint::new(q.to_lat, q.to_lng)?;

    let km = haversine_distance_km(&from, &to)?;
    let meters = km * 1000.0;
    Ok(DistanceResponse {
        km,
        meters,
        label: format_distance(meters)?,
        bearing_deg: initial_bearing_deg(&from, &to)?,
    })
}
