// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health check HTTP handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::AppState;

/// Overall health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub timestamp: String,
	pub database: bool,
	pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "System is healthy", body = HealthResponse),
        (status = 503, description = "System is unhealthy", body = HealthResponse)
    ),
    tag = "health"
)]
/// GET /health - Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let database = sqlx::query("SELECT 1")
		.fetch_one(&state.pool)
		.await
		.is_ok();

	let status = if database {
		HealthStatus::Healthy
	} else {
		HealthStatus::Unhealthy
	};

	let http_status = match status {
		HealthStatus::Healthy => StatusCode::OK,
		HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
	};

	(
		http_status,
		Json(HealthResponse {
			status,
			timestamp: chrono::Utc::now().to_rfc3339(),
			database,
			version: env!("CARGO_PKG_VERSION").to_string(),
		}),
	)
}
