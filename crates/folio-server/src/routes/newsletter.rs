// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Newsletter HTTP handlers.
//!
//! Subscribing is public; the subscriber list is part of the settings
//! surface and guarded accordingly in the router.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use folio_server_db::SubscriberStore;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
	api::AppState,
	api_response::{bad_request, conflict, internal_error, not_found},
	validation::{parse_subscriber_id, sanitize_email, validate_email},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubscribeRequest {
	pub email: String,
}

#[utoipa::path(
    post,
    path = "/api/newsletter/subscribe",
    request_body = SubscribeRequest,
    responses(
        (status = 201, description = "Subscribed"),
        (status = 400, description = "Invalid email"),
        (status = 409, description = "Already subscribed")
    ),
    tag = "newsletter"
)]
/// POST /api/newsletter/subscribe - Subscribe an email address.
pub async fn subscribe(
	State(state): State<AppState>,
	Json(payload): Json<SubscribeRequest>,
) -> impl IntoResponse {
	let email = sanitize_email(&payload.email);
	if !validate_email(&email) {
		return bad_request("invalid_email", "Email address is not valid").into_response();
	}

	match state.subscriber_repo.create_subscriber(&email).await {
		Ok(subscriber) => {
			tracing::info!(subscriber_id = %subscriber.id, "newsletter subscription added");
			(
				StatusCode::CREATED,
				Json(serde_json::json!({"message": "Subscribed"})),
			)
				.into_response()
		}
		Err(e) if e.is_conflict() => {
			conflict("already_subscribed", e.to_string()).into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "newsletter subscription failed");
			internal_error("Subscription failed").into_response()
		}
	}
}

/// GET /api/admin/subscribers - List all subscribers.
pub async fn list_subscribers(State(state): State<AppState>) -> impl IntoResponse {
	match state.subscriber_repo.list_subscribers().await {
		Ok(subscribers) => Json(subscribers).into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list subscribers");
			internal_error("Failed to list subscribers").into_response()
		}
	}
}

/// DELETE /api/admin/subscribers/{id} - Remove a subscriber.
pub async fn delete_subscriber(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let id = match parse_subscriber_id(&id, "Invalid subscriber ID") {
		Ok(id) => id,
		Err(e) => return bad_request(e.error, e.message).into_response(),
	};

	match state.subscriber_repo.delete_subscriber(&id).await {
		Ok(true) => Json(serde_json::json!({"message": "Subscriber removed"})).into_response(),
		Ok(false) => not_found("Subscriber not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, subscriber_id = %id, "failed to delete subscriber");
			internal_error("Failed to delete subscriber").into_response()
		}
	}
}
