// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for authentication routes.
//!
//! Tests cover:
//! - Registration and login flow
//! - Credential failure responses
//! - Session cookie attributes
//! - Bearer token authentication
//! - Logout revocation

use axum::{
	body::Body,
	http::{
		header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE},
		Request, StatusCode,
	},
};
use folio_server::{create_app_state, create_router};
use folio_server_config::ServerConfig;
use tempfile::tempdir;
use tower::ServiceExt;

/// Creates a test app with an isolated database.
async fn setup_test_app() -> (axum::Router, tempfile::TempDir) {
	let dir = tempdir().unwrap();
	let db_path = dir.path().join("test_auth.db");
	let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
	let pool = folio_server_db::create_pool(&db_url).await.unwrap();
	folio_server_db::run_migrations(&pool).await.unwrap();
	let config = ServerConfig::default();
	let state = create_app_state(pool, &config);
	(create_router(state), dir)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
	Request::builder()
		.method(method)
		.uri(uri)
		.header(CONTENT_TYPE, "application/json")
		.body(Body::from(body.to_string()))
		.unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

async fn register(
	app: &axum::Router,
	name: &str,
	email: &str,
	password: &str,
) -> axum::response::Response {
	app.clone()
		.oneshot(json_request(
			"POST",
			"/api/auth/register",
			serde_json::json!({
				"full_name": name,
				"email": email,
				"password": password,
			}),
		))
		.await
		.unwrap()
}

#[tokio::test]
async fn register_sets_session_cookie_and_returns_token() {
	let (app, _dir) = setup_test_app().await;

	let response = register(&app, "Ana Silva", "ana@example.com", "correct horse").await;
	assert_eq!(response.status(), StatusCode::CREATED);

	let cookie = response
		.headers()
		.get(SET_COOKIE)
		.unwrap()
		.to_str()
		.unwrap()
		.to_string();
	assert!(cookie.starts_with("folio_session=fs_"));
	assert!(cookie.contains("HttpOnly"));
	assert!(cookie.contains("SameSite=Lax"));

	let json = body_json(response).await;
	assert!(json["token"].as_str().unwrap().starts_with("fs_"));
	assert_eq!(json["session"]["role"], "COLLABORATOR");
}

#[tokio::test]
async fn registered_user_can_login_and_inspect_session() {
	let (app, _dir) = setup_test_app().await;
	register(&app, "Ana Silva", "ana@example.com", "correct horse").await;

	let response = app
		.clone()
		.oneshot(json_request(
			"POST",
			"/api/auth/login",
			serde_json::json!({"email": "ana@example.com", "password": "correct horse"}),
		))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	let token = body_json(response).await["token"]
		.as_str()
		.unwrap()
		.to_string();

	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.uri("/api/auth/session")
				.header(COOKIE, format!("folio_session={token}"))
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::OK);

	let json = body_json(response).await;
	assert_eq!(json["email"], "ana@example.com");
	assert_eq!(json["display_name"], "Ana Silva");
	assert_eq!(json["role"], "COLLABORATOR");
}

#[tokio::test]
async fn login_email_is_case_insensitive() {
	let (app, _dir) = setup_test_app().await;
	register(&app, "Ana Silva", "ana@example.com", "correct horse").await;

	let response = app
		.clone()
		.oneshot(json_request(
			"POST",
			"/api/auth/login",
			serde_json::json!({"email": "  Ana@Example.COM ", "password": "correct horse"}),
		))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_get_the_same_401() {
	let (app, _dir) = setup_test_app().await;
	register(&app, "Ana Silva", "ana@example.com", "correct horse").await;

	let wrong_password = app
		.clone()
		.oneshot(json_request(
			"POST",
			"/api/auth/login",
			serde_json::json!({"email": "ana@example.com", "password": "nope nope"}),
		))
		.await
		.unwrap();
	let unknown_email = app
		.clone()
		.oneshot(json_request(
			"POST",
			"/api/auth/login",
			serde_json::json!({"email": "nobody@example.com", "password": "nope nope"}),
		))
		.await
		.unwrap();

	assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(
		body_json(wrong_password).await,
		body_json(unknown_email).await
	);
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
	let (app, _dir) = setup_test_app().await;
	register(&app, "Ana Silva", "ana@example.com", "correct horse").await;

	let response = register(&app, "Other Ana", "ana@example.com", "another pass").await;
	assert_eq!(response.status(), StatusCode::CONFLICT);
	assert_eq!(body_json(response).await["error"], "email_taken");
}

#[tokio::test]
async fn short_passwords_are_rejected() {
	let (app, _dir) = setup_test_app().await;

	let response = register(&app, "Ana Silva", "ana@example.com", "short").await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(body_json(response).await["error"], "weak_password");
}

#[tokio::test]
async fn bearer_token_authenticates_without_a_cookie() {
	let (app, _dir) = setup_test_app().await;
	let response = register(&app, "Ana Silva", "ana@example.com", "correct horse").await;
	let token = body_json(response).await["token"]
		.as_str()
		.unwrap()
		.to_string();

	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.uri("/api/auth/role")
				.header(AUTHORIZATION, format!("Bearer {token}"))
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_json(response).await["role"], "COLLABORATOR");
}

#[tokio::test]
async fn role_probe_answers_null_for_anonymous_callers() {
	let (app, _dir) = setup_test_app().await;

	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.uri("/api/auth/role")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(body_json(response).await["role"], serde_json::Value::Null);
}

#[tokio::test]
async fn session_endpoint_requires_authentication() {
	let (app, _dir) = setup_test_app().await;

	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.uri("/api/auth/session")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_the_session_server_side() {
	let (app, _dir) = setup_test_app().await;
	let response = register(&app, "Ana Silva", "ana@example.com", "correct horse").await;
	let token = body_json(response).await["token"]
		.as_str()
		.unwrap()
		.to_string();
	let cookie = format!("folio_session={token}");

	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/api/auth/logout")
				.header(COOKIE, &cookie)
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::OK);

	// The cookie is cleared and the token no longer restores a session
	let cleared = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
	assert!(cleared.contains("Max-Age=0"));

	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.uri("/api/auth/session")
				.header(COOKIE, &cookie)
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
