// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OpenAPI document for the HTTP API.

use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

/// OpenAPI documentation aggregator.
#[derive(OpenApi)]
#[openapi(
	paths(
		crate::routes::health::health_check,
		crate::routes::books::list_books,
		crate::routes::books::get_book,
		crate::routes::posts::list_posts,
		crate::routes::posts::get_post_by_slug,
		crate::routes::newsletter::subscribe,
		crate::routes::auth::login,
		crate::routes::auth::register,
		crate::routes::auth::current_session,
		crate::routes::auth::current_role,
		crate::routes::auth::logout,
	),
	components(schemas(
		crate::error::ErrorResponse,
		crate::routes::health::HealthResponse,
		crate::routes::health::HealthStatus,
		crate::routes::auth::LoginRequest,
		crate::routes::auth::RegisterRequest,
		crate::routes::auth::SessionResponse,
		crate::routes::auth::RoleResponse,
		crate::routes::auth::LoginResponse,
		crate::routes::newsletter::SubscribeRequest,
	)),
	tags(
		(name = "health", description = "Health checks"),
		(name = "auth", description = "Authentication and sessions"),
		(name = "books", description = "Public catalogue"),
		(name = "posts", description = "Public blog"),
		(name = "newsletter", description = "Newsletter subscriptions"),
	)
)]
pub struct ApiDoc;

/// GET /api/openapi.json - Machine-readable API description.
pub async fn openapi_spec() -> impl IntoResponse {
	Json(ApiDoc::openapi())
}
