/*!
 * # Health Check Module
 *
 * - `/` service banner
 * - `/health` liveness, no dependencies touched
 * - `/health/db` readiness, pings the database
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{debug, error};

/// Basic health status
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseHealth {
    pub status: HealthStatus,
    pub latency_ms: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub db_pool: Arc<DatabaseConnection>,
    pub start_time: SystemTime,
}

impl HealthState {
    pub fn new(db_pool: Arc<DatabaseConnection>) -> Self {
        Self {
            db_pool,
            start_time: SystemTime::now(),
        }
    }

    pub fn uptime(&self) -> u64 {
        SystemTime::now()
            .duration_since(self.start_time)
            .unwrap_or(Duration::from_secs(0))
            .as_secs()
    }
}

/// Service banner
pub async fn root_info() -> impl IntoResponse {
    Json(json!({
        "status": HealthStatus::Up,
        "message": "Plastics quotation API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Liveness check endpoint
pub async fn liveness_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    debug!("Liveness check endpoint called");

    (
        StatusCode::OK,
        Json(json!({
            "status": HealthStatus::Up,
            "uptimeSeconds": state.uptime(),
            "timestamp": Utc::now(),
        })),
    )
}

/// Readiness check endpoint
pub async fn database_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let (status_code, health) = match crate::db::check_connection(&state.db_pool).await {
        Ok(latency) => (
            StatusCode::OK,
            DatabaseHealth {
                status: HealthStatus::Up,
                latency_ms: Some(latency.as_millis() as u64),
                timestamp: Utc::now(),
            },
        ),
        Err(e) => {
            error!("Database health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                DatabaseHealth {
                    status: HealthStatus::Down,
                    latency_ms: None,
                    timestamp: Utc::now(),
                },
            )
        }
    };

    (status_code, Json(health))
}

/// Creates router with health check endpoints
pub fn health_routes(db_pool: Arc<DatabaseConnection>) -> Router {
    let health_state = Arc::new(HealthState::new(db_pool));

    Router::new()
        .route("/", get(root_info))
        .route("/health", get(liveness_check))
        .route("/health/db", get(database_check))
        .with_state(health_state)
}
