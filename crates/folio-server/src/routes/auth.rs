// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Authentication HTTP handlers: login, register, logout, and session
//! introspection.
//!
//! # Security Properties
//!
//! - Login failures return the same generic 401 whether the email is unknown
//!   or the password is wrong
//! - Session cookies are HttpOnly and SameSite=Lax; the raw token appears in
//!   the response body once (for non-browser clients) and is never logged
//! - Logout revokes the server-side session, not just the cookie

use axum::{
	extract::State,
	http::{header, HeaderMap, StatusCode},
	response::IntoResponse,
	Json,
};
use chrono::{DateTime, Duration, Utc};
use folio_server_auth::{
	generate_token, hash_password, hash_token,
	middleware::extract_session_token,
	verify_password, Profile, Role,
};
use folio_server_db::{session_for_profile, ProfileStore, SessionStore};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
	api::AppState,
	api_response::{bad_request, conflict, internal_error, unauthorized},
	error::ErrorResponse,
	auth_middleware::{OptionalAuth, RequireAuth},
	validation::{sanitize_email, validate_email},
};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
	pub email: String,
	pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
	pub full_name: String,
	pub email: String,
	pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
	pub user_id: String,
	pub display_name: String,
	pub email: String,
	#[schema(value_type = String)]
	pub role: Role,
	pub avatar_url: Option<String>,
	pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleResponse {
	#[schema(value_type = String)]
	pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
	/// Bearer token for non-browser clients. Browsers get it as a cookie.
	pub token: String,
	pub session: SessionResponse,
}

fn session_response(session: &folio_server_auth::Session) -> SessionResponse {
	SessionResponse {
		user_id: session.user_id.to_string(),
		display_name: session.display_name.clone(),
		email: session.email.clone(),
		role: session.role,
		avatar_url: session.avatar_url.clone(),
		expires_at: session.expires_at,
	}
}

fn session_cookie(name: &str, token: &str, max_age_secs: i64) -> String {
	format!("{name}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

fn clear_session_cookie(name: &str) -> String {
	format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// POST /api/auth/login - Sign in with email and password.
pub async fn login(
	State(state): State<AppState>,
	Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
	let email = sanitize_email(&payload.email);

	let credentials = match state.profile_repo.get_credentials(&email).await {
		Ok(credentials) => credentials,
		Err(e) => {
			tracing::error!(error = %e, "login: credential lookup failed");
			return internal_error("Login failed").into_response();
		}
	};

	// Same response for unknown email and wrong password.
	let Some((profile, password_hash)) = credentials else {
		tracing::debug!("login: unknown email");
		return unauthorized("Invalid email or password").into_response();
	};

	if !verify_password(&payload.password, &password_hash) {
		tracing::debug!(user_id = %profile.id, "login: password mismatch");
		return unauthorized("Invalid email or password").into_response();
	}

	issue_session(&state, &profile).await.into_response()
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = LoginResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Signups are disabled", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// POST /api/auth/register - Create an account.
///
/// New accounts start as collaborators; roles are elevated by an
/// administrator afterwards.
pub async fn register(
	State(state): State<AppState>,
	Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
	if state.auth_config.signups_disabled {
		return (
			StatusCode::FORBIDDEN,
			Json(ErrorResponse {
				error: "signups_disabled".to_string(),
				message: "New signups are currently disabled".to_string(),
			}),
		)
			.into_response();
	}

	let email = sanitize_email(&payload.email);
	if !validate_email(&email) {
		return bad_request("invalid_email", "Email address is not valid").into_response();
	}

	let full_name = payload.full_name.trim();
	if full_name.is_empty() {
		return bad_request("invalid_name", "Name must not be empty").into_response();
	}

	if payload.password.len() < MIN_PASSWORD_LEN {
		return bad_request(
			"weak_password",
			format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
		)
		.into_response();
	}

	let password_hash = match hash_password(&payload.password) {
		Ok(hash) => hash,
		Err(e) => {
			tracing::error!(error = %e, "register: password hashing failed");
			return internal_error("Registration failed").into_response();
		}
	};

	let profile = Profile::new(full_name, &email, Role::Collaborator);

	match state.profile_repo.create_profile(&profile, &password_hash).await {
		Ok(()) => {}
		Err(e) if e.is_conflict() => {
			return conflict("email_taken", "Email is already registered").into_response();
		}
		Err(e) => {
			tracing::error!(error = %e, "register: profile creation failed");
			return internal_error("Registration failed").into_response();
		}
	}

	tracing::info!(user_id = %profile.id, "account registered");

	match issue_session(&state, &profile).await {
		Ok((_, headers, body)) => (StatusCode::CREATED, headers, body).into_response(),
		Err(resp) => resp.into_response(),
	}
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "The active session", body = SessionResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// GET /api/auth/session - Describe the active session.
pub async fn current_session(RequireAuth(session): RequireAuth) -> impl IntoResponse {
	Json(session_response(&session))
}

#[utoipa::path(
    get,
    path = "/api/auth/role",
    responses(
        (status = 200, description = "The active role", body = RoleResponse),
        (status = 401, description = "No active session; role is null")
    ),
    tag = "auth"
)]
/// GET /api/auth/role - The active session's role.
///
/// Unauthenticated callers get `{"role": null}` with 401 rather than an
/// error envelope; "not signed in" is an answer here, not a failure.
pub async fn current_role(OptionalAuth(session): OptionalAuth) -> impl IntoResponse {
	match session {
		Some(session) => Json(RoleResponse { role: session.role }).into_response(),
		None => (
			StatusCode::UNAUTHORIZED,
			Json(serde_json::json!({"role": null})),
		)
			.into_response(),
	}
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Signed out"),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// POST /api/auth/logout - Revoke the active session.
pub async fn logout(
	State(state): State<AppState>,
	RequireAuth(session): RequireAuth,
	headers: HeaderMap,
) -> impl IntoResponse {
	if let Some(token) = extract_session_token(&headers, &state.auth_config.session_cookie_name) {
		match state.session_repo.delete_by_token_hash(&hash_token(&token)).await {
			Ok(_) => {
				tracing::info!(user_id = %session.user_id, "signed out");
			}
			Err(e) => {
				tracing::error!(error = %e, "logout: session deletion failed");
				return internal_error("Logout failed").into_response();
			}
		}
	}

	(
		[(
			header::SET_COOKIE,
			clear_session_cookie(&state.auth_config.session_cookie_name),
		)],
		Json(serde_json::json!({"message": "Signed out"})),
	)
		.into_response()
}

/// Create and persist a session for a profile, returning the response parts.
async fn issue_session(
	state: &AppState,
	profile: &Profile,
) -> Result<
	(
		StatusCode,
		[(header::HeaderName, String); 1],
		Json<LoginResponse>,
	),
	(StatusCode, Json<ErrorResponse>),
> {
	let ttl = Duration::hours(i64::from(state.session_ttl_hours));
	let session = session_for_profile(profile, Utc::now() + ttl);
	let token = generate_token();

	if let Err(e) = state
		.session_repo
		.create_session(&session, &hash_token(&token))
		.await
	{
		tracing::error!(error = %e, "failed to persist session");
		return Err(internal_error("Login failed"));
	}

	tracing::info!(user_id = %profile.id, session_id = %session.id, "session issued");

	let cookie = session_cookie(
		&state.auth_config.session_cookie_name,
		&token,
		ttl.num_seconds(),
	);

	Ok((
		StatusCode::OK,
		[(header::SET_COOKIE, cookie)],
		Json(LoginResponse {
			token,
			session: session_response(&session),
		}),
	))
}
