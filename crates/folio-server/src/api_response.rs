// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! API response helpers.
//!
//! Every error body follows the same `{error, message}` envelope so clients
//! can branch on the machine-readable code without parsing prose.

use axum::{http::StatusCode, Json};

use crate::error::ErrorResponse;

/// Create a 400 Bad Request response.
pub fn bad_request(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
	(
		StatusCode::BAD_REQUEST,
		Json(ErrorResponse {
			error: error.into(),
			message: message.into(),
		}),
	)
}

/// Create a 409 Conflict response.
pub fn conflict(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
	(
		StatusCode::CONFLICT,
		Json(ErrorResponse {
			error: error.into(),
			message: message.into(),
		}),
	)
}

/// Create a 404 Not Found response.
pub fn not_found(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
	(
		StatusCode::NOT_FOUND,
		Json(ErrorResponse {
			error: "not_found".to_string(),
			message: message.into(),
		}),
	)
}

/// Create a 401 Unauthorized response.
pub fn unauthorized(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
	(
		StatusCode::UNAUTHORIZED,
		Json(ErrorResponse {
			error: "unauthorized".to_string(),
			message: message.into(),
		}),
	)
}

/// Create a 403 Forbidden response.
pub fn forbidden(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
	(
		StatusCode::FORBIDDEN,
		Json(ErrorResponse {
			error: "forbidden".to_string(),
			message: message.into(),
		}),
	)
}

/// Create a 500 Internal Server Error response.
pub fn internal_error(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
	(
		StatusCode::INTERNAL_SERVER_ERROR,
		Json(ErrorResponse {
			error: "internal_error".to_string(),
			message: message.into(),
		}),
	)
}
