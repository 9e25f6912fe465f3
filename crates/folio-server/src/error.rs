// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error types and their HTTP mappings.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use folio_server_db::DbError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard error response body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
	/// Machine-readable error code.
	pub error: String,
	/// Human-readable message.
	pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("Database error: {0}")]
	Database(#[from] DbError),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Internal error: {0}")]
	Internal(String),
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, error, message) = match &self {
			ServerError::Database(DbError::NotFound(m)) | ServerError::NotFound(m) => {
				(StatusCode::NOT_FOUND, "not_found", m.clone())
			}
			ServerError::Database(DbError::Conflict(m)) => {
				(StatusCode::CONFLICT, "conflict", m.clone())
			}
			// Internal detail stays in the log, not the response body.
			other => {
				tracing::error!(error = %other, "request failed");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					"internal_error",
					"Internal server error".to_string(),
				)
			}
		};

		(
			status,
			Json(ErrorResponse {
				error: error.to_string(),
				message,
			}),
		)
			.into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn not_found_maps_to_404() {
		let resp = ServerError::NotFound("book x".to_string()).into_response();
		assert_eq!(resp.status(), StatusCode::NOT_FOUND);
	}

	#[test]
	fn conflict_maps_to_409() {
		let resp = ServerError::Database(DbError::Conflict("dup".to_string())).into_response();
		assert_eq!(resp.status(), StatusCode::CONFLICT);
	}

	#[test]
	fn internal_detail_is_not_leaked() {
		let resp = ServerError::Internal("secret detail".to_string()).into_response();
		assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}
}
