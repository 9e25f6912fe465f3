// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router assembly.
//!
//! Route groups and their authentication stack:
//!
//! - **Public**: catalogue, blog, newsletter signup, login/register, health.
//!   No auth layers at all.
//! - **Authed**: session introspection and logout. `auth_layer` restores the
//!   session, `require_auth_layer` rejects anonymous requests with 401.
//! - **Admin**: management endpoints. On top of the authed stack each route
//!   group carries a [`RequirePermission`] guard for its permission.
//!
//! Layer ordering matters: `auth_layer` must run first so that the guards
//! only ever see a settled session state.

use axum::{
	extract::DefaultBodyLimit,
	middleware::from_fn_with_state,
	routing::{delete, get, patch, post, put},
	Router,
};
use folio_server_auth::{AuthConfig, Permission};
use folio_server_config::ServerConfig;
use folio_server_db::{
	BookRepository, PostRepository, ProfileRepository, SessionRepository, SubscriberRepository,
};
use sqlx::SqlitePool;
use tower_http::services::ServeDir;

use crate::auth_middleware::{auth_layer, require_auth_layer};
use crate::guard::RequirePermission;
use crate::routes;

/// Shared state for all request handlers.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub profile_repo: ProfileRepository,
	pub session_repo: SessionRepository,
	pub book_repo: BookRepository,
	pub post_repo: PostRepository,
	pub subscriber_repo: SubscriberRepository,
	pub auth_config: AuthConfig,
	/// Lifetime of newly issued sessions, in hours.
	pub session_ttl_hours: u32,
	/// Upper bound on one session-restore lookup, in milliseconds.
	pub restore_timeout_ms: u64,
	pub media: folio_server_config::MediaConfig,
}

/// Build the application state from a database pool and configuration.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	let auth_config = AuthConfig::new()
		.with_dev_mode(config.auth.dev_mode)
		.with_signups_disabled(config.auth.signups_disabled);

	AppState {
		pool: pool.clone(),
		profile_repo: ProfileRepository::new(pool.clone()),
		session_repo: SessionRepository::new(pool.clone()),
		book_repo: BookRepository::new(pool.clone()),
		post_repo: PostRepository::new(pool.clone()),
		subscriber_repo: SubscriberRepository::new(pool),
		auth_config,
		session_ttl_hours: config.auth.session_ttl_hours,
		restore_timeout_ms: config.auth.restore_timeout_ms,
		media: config.media.clone(),
	}
}

fn admin_routes(state: AppState) -> Router<AppState> {
	// Catalogue management. Publication is a separate permission from editing.
	let books = Router::new()
		.route("/books", get(routes::admin_books::list_books))
		.route("/books", post(routes::admin_books::create_book))
		.route("/books/{id}", put(routes::admin_books::update_book))
		.route("/books/{id}", delete(routes::admin_books::delete_book))
		.route_layer(RequirePermission::new(Permission::ManageProducts));

	let book_status = Router::new()
		.route(
			"/books/{id}/status",
			post(routes::admin_books::set_book_status),
		)
		.route_layer(RequirePermission::new(Permission::PublishProducts));

	// Blog management. The route guard admits anyone who can manage their
	// own posts; cross-author access is decided per-handler.
	let posts = Router::new()
		.route("/posts", get(routes::admin_posts::list_posts))
		.route("/posts", post(routes::admin_posts::create_post))
		.route("/posts/{id}", put(routes::admin_posts::update_post))
		.route("/posts/{id}", delete(routes::admin_posts::delete_post))
		.route_layer(RequirePermission::new(Permission::ManageBlogOwn));

	let post_status = Router::new()
		.route(
			"/posts/{id}/status",
			post(routes::admin_posts::set_post_status),
		)
		.route_layer(RequirePermission::new(Permission::PublishBlog));

	// Site administration.
	let settings = Router::new()
		.route("/users", get(routes::admin_users::list_users))
		.route("/users/{id}/role", patch(routes::admin_users::update_user_role))
		.route("/users/{id}", delete(routes::admin_users::delete_user))
		.route("/subscribers", get(routes::newsletter::list_subscribers))
		.route(
			"/subscribers/{id}",
			delete(routes::newsletter::delete_subscriber),
		)
		.route_layer(RequirePermission::new(Permission::ManageSettings));

	Router::new()
		.merge(books)
		.merge(book_status)
		.merge(posts)
		.merge(post_status)
		.merge(settings)
		.layer(from_fn_with_state(state.clone(), require_auth_layer))
		.layer(from_fn_with_state(state, auth_layer))
}

/// Create the API router with all routes.
pub fn create_router(state: AppState) -> Router {
	// Public routes - no authentication required
	let public = Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/openapi.json", get(routes::docs::openapi_spec))
		.route("/api/books", get(routes::books::list_books))
		.route("/api/books/{id}", get(routes::books::get_book))
		.route("/api/posts", get(routes::posts::list_posts))
		.route("/api/posts/{slug}", get(routes::posts::get_post_by_slug))
		.route(
			"/api/newsletter/subscribe",
			post(routes::newsletter::subscribe),
		)
		.route("/api/auth/login", post(routes::auth::login))
		.route("/api/auth/register", post(routes::auth::register));

	// Session introspection and logout - requires a signed-in user
	let authed = Router::new()
		.route("/api/auth/session", get(routes::auth::current_session))
		.route("/api/auth/logout", post(routes::auth::logout))
		.layer(from_fn_with_state(state.clone(), require_auth_layer))
		.layer(from_fn_with_state(state.clone(), auth_layer));

	// Role probe - answers for anonymous callers too, so only the restore
	// layer applies
	let role_probe = Router::new()
		.route("/api/auth/role", get(routes::auth::current_role))
		.layer(from_fn_with_state(state.clone(), auth_layer));

	// Media upload - any role with the upload permission. The body limit is
	// raised to the configured cap plus slack for multipart framing; the
	// handler enforces the exact cap.
	let media_upload = Router::new()
		.route("/api/media/upload", post(routes::media::upload))
		.route_layer(RequirePermission::new(Permission::UploadMedia))
		.layer(from_fn_with_state(state.clone(), require_auth_layer))
		.layer(from_fn_with_state(state.clone(), auth_layer))
		.layer(DefaultBodyLimit::max(
			state.media.max_upload_bytes as usize + 64 * 1024,
		));

	let media_dir = state.media.dir.clone();

	Router::new()
		.merge(public)
		.merge(authed)
		.merge(role_probe)
		.merge(media_upload)
		.nest("/api/admin", admin_routes(state.clone()))
		.nest_service("/media", ServeDir::new(media_dir))
		.with_state(state)
}
