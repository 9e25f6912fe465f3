// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for route authorization.
//!
//! Tests cover:
//! - Anonymous access to admin routes (401 for API clients, redirect for browsers)
//! - Permission gating per role on the admin surface
//! - Ownership checks on blog posts
//! - Draft content staying invisible on the public site

use axum::{
	body::Body,
	http::{
		header::{ACCEPT, CONTENT_TYPE, COOKIE, LOCATION},
		Request, StatusCode,
	},
};
use chrono::{Duration, Utc};
use folio_server::{create_app_state, create_router, AppState};
use folio_server_auth::{generate_token, hash_token, Profile, Role};
use folio_server_config::ServerConfig;
use folio_server_db::{session_for_profile, ProfileStore, SessionStore};
use tempfile::tempdir;
use tower::ServiceExt;

async fn setup_test_app() -> (axum::Router, AppState, tempfile::TempDir) {
	let dir = tempdir().unwrap();
	let db_path = dir.path().join("test_authz.db");
	let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
	let pool = folio_server_db::create_pool(&db_url).await.unwrap();
	folio_server_db::run_migrations(&pool).await.unwrap();
	let config = ServerConfig::default();
	let state = create_app_state(pool, &config);
	(create_router(state.clone()), state, dir)
}

/// Create an account with the given role and return its session cookie.
async fn signed_in_as(state: &AppState, email: &str, role: Role) -> String {
	let profile = Profile::new("Test User", email, role);
	state.profile_repo.create_profile(&profile, "hash").await.unwrap();

	let session = session_for_profile(&profile, Utc::now() + Duration::hours(1));
	let token = generate_token();
	state
		.session_repo
		.create_session(&session, &hash_token(&token))
		.await
		.unwrap();

	format!("folio_session={token}")
}

fn get(uri: &str, cookie: &str) -> Request<Body> {
	Request::builder()
		.uri(uri)
		.header(COOKIE, cookie)
		.body(Body::empty())
		.unwrap()
}

fn post_json(uri: &str, cookie: &str, body: serde_json::Value) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header(COOKIE, cookie)
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

#[tokio::test]
async fn anonymous_admin_request_gets_401_json() {
	let (app, _state, _dir) = setup_test_app().await;

	let response = app
		.oneshot(
			Request::builder()
				.uri("/api/admin/books")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn anonymous_browser_request_is_redirected_home() {
	let (app, _state, _dir) = setup_test_app().await;

	let response = app
		.oneshot(
			Request::builder()
				.uri("/api/admin/books")
				.header(ACCEPT, "text/html,application/xhtml+xml")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(response.headers().get(LOCATION).unwrap(), "/");
}

#[tokio::test]
async fn collaborator_cannot_reach_settings_routes() {
	let (app, state, _dir) = setup_test_app().await;
	let cookie = signed_in_as(&state, "collab@example.com", Role::Collaborator).await;

	let response = app
		.clone()
		.oneshot(get("/api/admin/users", &cookie))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	// Same denial, browser flavour
	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.uri("/api/admin/users")
				.header(COOKIE, &cookie)
				.header(ACCEPT, "text/html")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn collaborator_cannot_manage_the_catalogue() {
	let (app, state, _dir) = setup_test_app().await;
	let cookie = signed_in_as(&state, "collab@example.com", Role::Collaborator).await;

	let response = app
		.clone()
		.oneshot(post_json(
			"/api/admin/books",
			&cookie,
			serde_json::json!({"title": "Atlas", "author": "A", "category": "education", "year": 2024}),
		))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn content_admin_cannot_reach_settings_but_manages_catalogue() {
	let (app, state, _dir) = setup_test_app().await;
	let cookie = signed_in_as(&state, "editor@example.com", Role::ContentAdmin).await;

	let response = app
		.clone()
		.oneshot(get("/api/admin/users", &cookie))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	let response = app
		.clone()
		.oneshot(get("/api/admin/books", &cookie))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn global_admin_reaches_settings_routes() {
	let (app, state, _dir) = setup_test_app().await;
	let cookie = signed_in_as(&state, "admin@example.com", Role::GlobalAdmin).await;

	let response = app
		.clone()
		.oneshot(get("/api/admin/users", &cookie))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::OK);

	let users = body_json(response).await;
	assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn drafts_stay_off_the_public_site_until_published() {
	let (app, state, _dir) = setup_test_app().await;
	let cookie = signed_in_as(&state, "editor@example.com", Role::ContentAdmin).await;

	let response = app
		.clone()
		.oneshot(post_json(
			"/api/admin/books",
			&cookie,
			serde_json::json!({"title": "Atlas Escolar", "author": "A", "category": "education", "year": 2024}),
		))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::CREATED);
	let book_id = body_json(response).await["id"].as_str().unwrap().to_string();

	// Draft: invisible publicly, 404 by ID
	let response = app
		.clone()
		.oneshot(Request::builder().uri("/api/books").body(Body::empty()).unwrap())
		.await
		.unwrap();
	assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);

	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.uri(format!("/api/books/{book_id}"))
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	// Publish and it appears
	let response = app
		.clone()
		.oneshot(post_json(
			&format!("/api/admin/books/{book_id}/status"),
			&cookie,
			serde_json::json!({"status": "published"}),
		))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::OK);

	let response = app
		.clone()
		.oneshot(Request::builder().uri("/api/books").body(Body::empty()).unwrap())
		.await
		.unwrap();
	assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn collaborators_only_see_and_edit_their_own_posts() {
	let (app, state, _dir) = setup_test_app().await;
	let alice = signed_in_as(&state, "alice@example.com", Role::Collaborator).await;
	let bob = signed_in_as(&state, "bob@example.com", Role::Collaborator).await;

	let response = app
		.clone()
		.oneshot(post_json(
			"/api/admin/posts",
			&alice,
			serde_json::json!({"title": "Alice writes", "slug": "alice-writes"}),
		))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::CREATED);
	let post_id = body_json(response).await["id"].as_str().unwrap().to_string();

	// Bob's admin listing does not include Alice's post
	let response = app.clone().oneshot(get("/api/admin/posts", &bob)).await.unwrap();
	assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);

	// Bob cannot edit or publish it either
	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.method("PUT")
				.uri(format!("/api/admin/posts/{post_id}"))
				.header(COOKIE, &bob)
				.header(CONTENT_TYPE, "application/json")
				.body(Body::from(
					serde_json::json!({"title": "Hijacked", "slug": "alice-writes"}).to_string(),
				))
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	let response = app
		.clone()
		.oneshot(post_json(
			&format!("/api/admin/posts/{post_id}/status"),
			&bob,
			serde_json::json!({"status": "published"}),
		))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn content_admin_sees_and_publishes_everyones_posts() {
	let (app, state, _dir) = setup_test_app().await;
	let alice = signed_in_as(&state, "alice@example.com", Role::Collaborator).await;
	let editor = signed_in_as(&state, "editor@example.com", Role::ContentAdmin).await;

	let response = app
		.clone()
		.oneshot(post_json(
			"/api/admin/posts",
			&alice,
			serde_json::json!({"title": "Alice writes", "slug": "alice-writes"}),
		))
		.await
		.unwrap();
	let post_id = body_json(response).await["id"].as_str().unwrap().to_string();

	let response = app.clone().oneshot(get("/api/admin/posts", &editor)).await.unwrap();
	assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

	let response = app
		.clone()
		.oneshot(post_json(
			&format!("/api/admin/posts/{post_id}/status"),
			&editor,
			serde_json::json!({"status": "published"}),
		))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::OK);

	// Now public by slug
	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.uri("/api/posts/alice-writes")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn role_change_revokes_existing_sessions() {
	let (app, state, _dir) = setup_test_app().await;
	let admin = signed_in_as(&state, "admin@example.com", Role::GlobalAdmin).await;
	let collab = signed_in_as(&state, "collab@example.com", Role::Collaborator).await;

	let response = app.clone().oneshot(get("/api/admin/users", &admin)).await.unwrap();
	let users = body_json(response).await;
	let collab_id = users
		.as_array()
		.unwrap()
		.iter()
		.find(|u| u["email"] == "collab@example.com")
		.unwrap()["id"]
		.as_str()
		.unwrap()
		.to_string();

	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.method("PATCH")
				.uri(format!("/api/admin/users/{collab_id}/role"))
				.header(COOKIE, &admin)
				.header(CONTENT_TYPE, "application/json")
				.body(Body::from(
					serde_json::json!({"role": "CONTENT_ADMIN"}).to_string(),
				))
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::OK);

	// The collaborator's old session is gone; they must sign in again
	let response = app
		.clone()
		.oneshot(get("/api/auth/session", &collab))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_newsletter_subscription_is_a_conflict() {
	let (app, _state, _dir) = setup_test_app().await;

	let subscribe = || {
		Request::builder()
			.method("POST")
			.uri("/api/newsletter/subscribe")
			.header(CONTENT_TYPE, "application/json")
			.body(Body::from(
				serde_json::json!({"email": "reader@example.com"}).to_string(),
			))
			.unwrap()
	};

	let response = app.clone().oneshot(subscribe()).await.unwrap();
	assert_eq!(response.status(), StatusCode::CREATED);

	let response = app.clone().oneshot(subscribe()).await.unwrap();
	assert_eq!(response.status(), StatusCode::CONFLICT);
	assert_eq!(body_json(response).await["error"], "already_subscribed");
}

#[tokio::test]
async fn unknown_role_tag_is_a_bad_request() {
	let (app, state, _dir) = setup_test_app().await;
	let admin = signed_in_as(&state, "admin@example.com", Role::GlobalAdmin).await;

	let response = app.clone().oneshot(get("/api/admin/users", &admin)).await.unwrap();
	let users = body_json(response).await;
	let id = users.as_array().unwrap()[0]["id"].as_str().unwrap().to_string();

	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.method("PATCH")
				.uri(format!("/api/admin/users/{id}/role"))
				.header(COOKIE, &admin)
				.header(CONTENT_TYPE, "application/json")
				.body(Body::from(serde_json::json!({"role": "OVERLORD"}).to_string()))
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
