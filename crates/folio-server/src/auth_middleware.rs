// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Authentication middleware for Axum.
//!
//! # Security Properties
//!
//! - **Token Protection**: Tokens are hashed with SHA-256 before database
//!   lookup; raw tokens are never stored or logged.
//! - **Session Expiry**: Sessions are validated against expiry timestamps on
//!   every request.
//! - **Bounded Restore**: The session lookup is wrapped in a timeout; if the
//!   database stalls, the request proceeds unauthenticated rather than
//!   hanging. Guards therefore always see a settled auth state.
//! - **Dev Mode Bypass**: With `FOLIO_SERVER_AUTH_DEV_MODE=1`, unauthenticated
//!   requests are authenticated as a synthetic global admin. This MUST NOT be
//!   enabled in production.
//!
//! # Usage
//!
//! Add the [`auth_layer`] middleware to your router, then use the
//! [`RequireAuth`] extractor in handlers:
//!
//! ```ignore
//! async fn protected_handler(RequireAuth(session): RequireAuth) -> impl IntoResponse {
//!     format!("Hello, {}!", session.display_name)
//! }
//! ```

use axum::{
	body::Body,
	extract::{FromRequestParts, State},
	http::{request::Parts, Request, StatusCode},
	middleware::Next,
	response::{IntoResponse, Response},
	Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use folio_server_auth::{
	hash_token, is_session_token,
	middleware::{extract_session_token, AuthContext},
	Role, Session, SessionId, UserId,
};
use folio_server_db::SessionStore;
use std::time::Duration;
use tracing::instrument;

use crate::{api::AppState, error::ErrorResponse};

/// Authentication middleware that extracts auth context from requests.
///
/// This middleware:
/// 1. Extracts the session token from the cookie or Authorization header
/// 2. Restores the session from the database, bounded by the configured
///    restore timeout
/// 3. Stores [`AuthContext`] as a request extension for downstream handlers
///    and guards
///
/// Restoration failures of any kind (missing token, unknown token, expiry,
/// timeout, database error) all settle to the unauthenticated context.
#[instrument(
	name = "auth_layer",
	skip(state, request, next),
	fields(
		authenticated = tracing::field::Empty,
		user_id = tracing::field::Empty,
	)
)]
pub async fn auth_layer(
	State(state): State<AppState>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	let span = tracing::Span::current();

	let auth_ctx = restore_auth_context(&state, request.headers()).await;

	match auth_ctx.session() {
		Some(session) => {
			span.record("authenticated", true);
			span.record("user_id", tracing::field::display(&session.user_id));
		}
		None => {
			span.record("authenticated", false);
		}
	}

	request.extensions_mut().insert(auth_ctx);
	next.run(request).await
}

/// Restore the auth context for one request.
async fn restore_auth_context(state: &AppState, headers: &http::HeaderMap) -> AuthContext {
	let token = extract_session_token(headers, &state.auth_config.session_cookie_name);

	if let Some(token) = token {
		if is_session_token(&token) {
			let token_hash = hash_token(&token);
			let lookup = state.session_repo.restore_by_token_hash(&token_hash);

			match tokio::time::timeout(Duration::from_millis(state.restore_timeout_ms), lookup).await
			{
				Ok(Ok(Some(session))) => {
					return AuthContext::authenticated(session);
				}
				Ok(Ok(None)) => {
					tracing::debug!("session restore: token not recognized");
				}
				Ok(Err(e)) => {
					tracing::warn!(error = %e, "session restore: database error");
				}
				Err(_) => {
					tracing::warn!(
						timeout_ms = state.restore_timeout_ms,
						"session restore: timed out, treating request as unauthenticated"
					);
				}
			}
		} else {
			tracing::debug!("session restore: token has unexpected format");
		}
	}

	if state.auth_config.dev_mode {
		tracing::debug!("dev mode: authenticating as synthetic admin");
		return AuthContext::authenticated(dev_session());
	}

	AuthContext::unauthenticated()
}

/// Synthetic session used by the dev-mode bypass.
fn dev_session() -> Session {
	Session {
		id: SessionId::generate(),
		user_id: UserId::generate(),
		display_name: "Dev Admin".to_string(),
		email: "dev@localhost".to_string(),
		role: Role::GlobalAdmin,
		avatar_url: None,
		expires_at: Utc::now() + ChronoDuration::hours(1),
	}
}

/// Middleware that rejects unauthenticated requests with 401.
///
/// Layer this inside [`auth_layer`] on route groups that require a signed-in
/// user regardless of role.
#[instrument(
	name = "require_auth_layer",
	skip(_state, request, next),
	fields(authenticated = tracing::field::Empty)
)]
pub async fn require_auth_layer(
	State(_state): State<AppState>,
	request: Request<Body>,
	next: Next,
) -> Response {
	let auth_ctx = request
		.extensions()
		.get::<AuthContext>()
		.cloned()
		.unwrap_or_else(AuthContext::unauthenticated);

	if !auth_ctx.is_authenticated() {
		tracing::Span::current().record("authenticated", false);
		return (
			StatusCode::UNAUTHORIZED,
			Json(ErrorResponse {
				error: "unauthorized".to_string(),
				message: "Authentication required".to_string(),
			}),
		)
			.into_response();
	}

	tracing::Span::current().record("authenticated", true);
	next.run(request).await
}

/// Extractor that requires an authenticated session.
///
/// Rejects with 401 Unauthorized when no session is active.
pub struct RequireAuth(pub Session);

impl<S> FromRequestParts<S> for RequireAuth
where
	S: Send + Sync,
{
	type Rejection = Response;

	#[instrument(name = "RequireAuth::from_request_parts", skip_all)]
	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let auth_ctx = parts
			.extensions
			.get::<AuthContext>()
			.cloned()
			.unwrap_or_else(AuthContext::unauthenticated);

		match auth_ctx.session() {
			Some(session) => {
				tracing::debug!(user_id = %session.user_id, "Authentication required: success");
				Ok(RequireAuth(session.clone()))
			}
			None => {
				tracing::debug!("Authentication required: no valid credentials");
				let response = (
					StatusCode::UNAUTHORIZED,
					Json(ErrorResponse {
						error: "unauthorized".to_string(),
						message: "Authentication required".to_string(),
					}),
				);
				Err(response.into_response())
			}
		}
	}
}

/// Extractor for optional authentication.
///
/// Always succeeds, returning `None` if not authenticated. Used by probe
/// endpoints that report "no session" as data rather than as an error.
pub struct OptionalAuth(pub Option<Session>);

impl<S> FromRequestParts<S> for OptionalAuth
where
	S: Send + Sync,
{
	type Rejection = std::convert::Infallible;

	#[instrument(name = "OptionalAuth::from_request_parts", skip_all)]
	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let auth_ctx = parts
			.extensions
			.get::<AuthContext>()
			.cloned()
			.unwrap_or_else(AuthContext::unauthenticated);

		Ok(OptionalAuth(auth_ctx.session().cloned()))
	}
}
