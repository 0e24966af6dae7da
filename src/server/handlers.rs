//! Request handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::Uri,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use super::error::{ApiError, ApiResult};
use super::stats::StatsSnapshot;
use super::AppState;
use crate::core::{EnsembleWeights, LOW_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD, VERIFIED_THRESHOLD, WEIGHTS};
use crate::domain::VerificationResult;

const ENDPOINTS: &[&str] = &["/", "/verify", "/health", "/stats", "/model-info"];

/// Request body for `POST /verify`
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub text: String,
}

/// Service banner
pub async fn index(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": "TruthLens",
        "version": state.version,
        "description": "Claim verification and hallucination scoring",
        "endpoints": ENDPOINTS,
    }))
}

/// Response body for `POST /verify`
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    #[serde(flatten)]
    pub result: VerificationResult,
    pub timestamp: DateTime<Utc>,
}

/// Verify a block of text
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn verify(
    State(state): State<AppState>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> ApiResult<Json<VerifyResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let result = state.verifier.verify(&request.text)?;
    state.stats.record(&result);

    info!(
        claims = result.claims.len(),
        risk = %result.hallucination_risk,
        "Request served"
    );
    Ok(Json(VerifyResponse {
        result,
        timestamp: Utc::now(),
    }))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub fact_table: String,
    pub entities: usize,
    pub timestamp: DateTime<Utc>,
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        fact_table: "loaded".to_string(),
        entities: state.verifier.facts().entities.len(),
        timestamp: Utc::now(),
    })
}

/// Cumulative counters since process start
pub async fn stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.stats.snapshot())
}

/// Model description response
#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub model_type: String,
    pub version: String,
    pub weights: EnsembleWeights,
    pub verified_threshold: f64,
    pub risk_thresholds: RiskThresholds,
    pub fact_table: FactTableInfo,
}

#[derive(Debug, Serialize)]
pub struct RiskThresholds {
    pub low: f64,
    pub medium: f64,
}

#[derive(Debug, Serialize)]
pub struct FactTableInfo {
    pub entities: usize,
    pub facts: usize,
}

/// Fixed ensemble description
pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    let facts = state.verifier.facts();
    Json(ModelInfoResponse {
        model_type: "rule-based ensemble".to_string(),
        version: state.version.clone(),
        weights: WEIGHTS,
        verified_threshold: VERIFIED_THRESHOLD,
        risk_thresholds: RiskThresholds {
            low: LOW_RISK_THRESHOLD,
            medium: MEDIUM_RISK_THRESHOLD,
        },
        fact_table: FactTableInfo {
            entities: facts.entities.len(),
            facts: facts.fact_count(),
        },
    })
}

/// JSON 404 for unknown routes
pub async fn not_found(uri: Uri) -> axum::response::Response {
    ApiError::NotFound(uri.path().to_string())
        .with_details(json!({ "available_endpoints": ENDPOINTS }))
}
