//! REST API Server for the finance advisor
//!
//! Exposes metrics and analysis over HTTP for the dashboard frontend.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::analyzer::{profile_digest, FinanceAnalyzer};
use crate::currency::SUPPORTED_CURRENCIES;
use crate::error::AdvisorError;
use crate::models::FinancialProfile;

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

fn failure(err: &AdvisorError) -> (StatusCode, Json<ApiResponse>) {
    let status = match err {
        AdvisorError::Validation(_) | AdvisorError::SerializationError(_) => StatusCode::BAD_REQUEST,
        e if e.is_analysis_failure() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::error(err.user_message())))
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub analyzer: Arc<FinanceAnalyzer>,
}

/// Parse a submitted profile. Negative amounts are rejected here even
/// though the model itself accepts them.
fn read_profile(body: Value) -> crate::Result<FinancialProfile> {
    let profile = FinancialProfile::from_value(body)?;
    profile.ensure_valid()?;
    Ok(profile)
}

/// =============================
/// Handlers
/// =============================

async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn list_currencies() -> Json<ApiResponse> {
    Json(ApiResponse::success(&SUPPORTED_CURRENCIES))
}

async fn compute_metrics(Json(body): Json<Value>) -> (StatusCode, Json<ApiResponse>) {
    let profile = match read_profile(body) {
        Ok(p) => p,
        Err(e) => {
            warn!(kind = e.kind(), "Rejected profile: {}", e);
            return failure(&e);
        }
    };

    let metrics = profile.metrics();
    let formatted: Vec<Value> = metrics
        .budget_split
        .iter()
        .map(|slice| {
            serde_json::json!({
                "name": slice.category.label(),
                "amount": slice.amount,
                "formatted": profile.format(slice.amount),
            })
        })
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "currency": profile.currency,
            "metrics": metrics,
            "budgetSplit": formatted,
            "formatted": {
                "totalSavings": profile.format(metrics.total_savings),
                "totalOutflow": profile.format(metrics.total_outflow),
                "surplus": profile.format(metrics.surplus),
                "shortfall": profile.format(metrics.shortfall),
            },
        }))),
    )
}

async fn run_analysis(
    State(state): State<ApiState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<ApiResponse>) {
    let profile = match read_profile(body) {
        Ok(p) => p,
        Err(e) => {
            warn!(kind = e.kind(), "Rejected profile: {}", e);
            return failure(&e);
        }
    };

    info!(profile_digest = %profile_digest(&profile), "Received analysis request");

    match state.analyzer.analyze(&profile).await {
        Ok(analysis) => (StatusCode::OK, Json(ApiResponse::success(analysis))),
        // detail already logged by the analyzer
        Err(e) => failure(&e),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(analyzer: Arc<FinanceAnalyzer>) -> Router {
    let state = ApiState { analyzer };

    Router::new()
        .route("/health", get(health))
        .route("/api/currencies", get(list_currencies))
        .route("/api/metrics", post(compute_metrics))
        .route("/api/analyze", post(run_analysis))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(analyzer: Arc<FinanceAnalyzer>, port: u16) -> crate::Result<()> {
    let router = create_router(analyzer);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
