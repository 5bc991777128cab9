//! web.rs - the hub's HTTP surface
//!
//! two routes, JSON over plain HTTP, CORS open (the dashboard is served
//! from a different origin, and the meter pushes cross-origin too):
//!
//! ```text
//!     POST /readings          store the pushed sample, always {"ok": true}
//!     GET  /latest?deviceId=  latest sample as JSON, or {} if none yet
//! ```
//!
//! absence is a response shape, not a status code: a device that never
//! pushed reads back as an empty object with status 200, and consumers
//! branch on whether telemetry fields are present.
//!
//! TLS, auth and rate limiting are a front-line proxy's problem, not ours.

use crate::reading::{RawReading, DEFAULT_DEVICE_ID};
use crate::store::LatestStore;
use anyhow::Result;
use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use log::{debug, info};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LatestStore>,
    /// echo each stored reading to the log (config: logging.show_readings)
    pub show_readings: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/readings", post(post_reading))
        .route("/latest", get(get_latest))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// bind and serve until the process exits
pub async fn run_server(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP API listening on {}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// ingest push. any JSON body is accepted: object fields coerce leniently,
/// and a non-object body stores an all-default reading (the meter never
/// sees an error for a malformed payload).
async fn post_reading(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let raw: RawReading = serde_json::from_value(body).unwrap_or_default();
    let stored = state.store.put(raw).await;

    if state.show_readings {
        info!(
            "Stored reading for {}: {:.2} V, {:.1} mA, {:.1} W (adc {}, ts {})",
            stored.device_id,
            stored.voltage,
            stored.current,
            stored.power,
            stored.raw_adc,
            stored.timestamp
        );
    }

    Json(json!({ "ok": true }))
}

#[derive(Debug, Deserialize)]
struct LatestParams {
    #[serde(rename = "deviceId")]
    device_id: Option<String>,
}

/// latest reading for a device; `{}` when nothing was ever stored
async fn get_latest(
    State(state): State<AppState>,
    Query(params): Query<LatestParams>,
) -> Json<Value> {
    let device_id = match params.device_id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => DEFAULT_DEVICE_ID.to_string(),
    };

    match state.store.get(&device_id).await {
        Some(reading) => {
            debug!("GET /latest for {}: has data", device_id);
            // serialization of a fully-populated struct is deterministic,
            // so repeated reads with no intervening push are byte-identical
            Json(serde_json::to_value(reading).unwrap_or_else(|_| json!({})))
        }
        None => {
            debug!("GET /latest for {}: no reading stored", device_id);
            Json(json!({}))
        }
    }
}
