use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use receipt_core::domain::receipt::Receipt;
use receipt_core::scoring::error::ScoringError;
use receipt_core::scoring::{score_receipt, PointsBreakdown, ScoringPolicy};
use receipt_core::storage::ReceiptStore;

pub const GREETING: &str = "Welcome to the receipt processor!\n";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReceiptStore>,
    pub policy: ScoringPolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn ReceiptStore>, policy: ScoringPolicy) -> Self {
        Self { store, policy }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/healthz", get(healthz))
        .route("/receipts/process", post(process_receipt))
        .route("/receipts/:id", get(get_receipt))
        .route("/receipts/:id/points", get(get_points))
        .route("/receipts/:id/breakdown", get(get_breakdown))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound,
    InvalidReceipt(ScoringError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => f.write_str(msg),
            ApiError::NotFound => f.write_str("Receipt not found"),
            ApiError::InvalidReceipt(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidReceipt(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, self.to_string()).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ProcessResponse {
    id: Uuid,
}

#[derive(Debug, Serialize)]
struct PointsResponse {
    points: u64,
}

#[derive(Debug, Serialize)]
struct BreakdownResponse {
    points: u64,
    breakdown: PointsBreakdown,
}

async fn home() -> &'static str {
    GREETING
}

async fn healthz() -> &'static str {
    "ok"
}

// The body is decoded by hand so that any JSON error maps to 400 regardless of content type.
async fn process_receipt(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ProcessResponse>), ApiError> {
    let receipt = serde_json::from_slice::<Receipt>(&body).map_err(|e| {
        tracing::debug!(error = %e, "rejecting malformed receipt body");
        ApiError::BadRequest(e.to_string())
    })?;

    let items = receipt.items.len();
    let id = state.store.insert(receipt).await;
    let stored = state.store.len().await;
    tracing::info!(%id, items, stored, "receipt processed");

    Ok((StatusCode::CREATED, Json(ProcessResponse { id })))
}

async fn get_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Receipt>, ApiError> {
    let receipt = state.store.lookup(&id).await.ok_or(ApiError::NotFound)?;
    Ok(Json(receipt))
}

async fn get_points(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PointsResponse>, ApiError> {
    let breakdown = score_stored(&state, &id).await?;
    Ok(Json(PointsResponse {
        points: breakdown.points(),
    }))
}

async fn get_breakdown(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BreakdownResponse>, ApiError> {
    let breakdown = score_stored(&state, &id).await?;
    Ok(Json(BreakdownResponse {
        points: breakdown.points(),
        breakdown,
    }))
}

async fn score_stored(state: &AppState, id: &str) -> Result<PointsBreakdown, ApiError> {
    let receipt = state.store.lookup(id).await.ok_or(ApiError::NotFound)?;

    score_receipt(&receipt, state.policy).map_err(|err| {
        tracing::warn!(
            %id,
            failed_rules = ?err.failed_rules(),
            error = %err,
            "receipt cannot be scored"
        );
        ApiError::InvalidReceipt(err)
    })
}
