// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Blog management HTTP handlers.
//!
//! The route guard admits anyone who may manage their own posts. Whether a
//! caller may touch a *particular* post is decided here: holders of the
//! blog-wide permission can touch any post, everyone else only their own.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use folio_server_auth::{role_grants, Permission, Session};
use folio_server_db::{ContentStatus, DbError, Post, PostDraft, PostStore};
use serde::Deserialize;

use crate::{
	api::AppState,
	api_response::{bad_request, conflict, forbidden, internal_error, not_found},
	auth_middleware::RequireAuth,
	validation::{parse_post_id, validate_slug},
};

const SLUG_MIN_LEN: usize = 1;
const SLUG_MAX_LEN: usize = 120;

#[derive(Debug, Deserialize)]
pub struct StatusChange {
	pub status: ContentStatus,
}

/// Whether this session may modify this post.
fn may_touch(session: &Session, post: &Post) -> bool {
	role_grants(session.role, Permission::ManageBlogAll)
		|| post.author_id.as_ref() == Some(&session.user_id)
}

/// GET /api/admin/posts - Posts visible to this session.
///
/// Blog-wide managers see every post; collaborators only their own.
pub async fn list_posts(
	State(state): State<AppState>,
	RequireAuth(session): RequireAuth,
) -> impl IntoResponse {
	let result = if role_grants(session.role, Permission::ManageBlogAll) {
		state.post_repo.list_all_posts().await
	} else {
		state.post_repo.list_posts_by_author(&session.user_id).await
	};

	match result {
		Ok(posts) => Json(posts).into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list posts for admin");
			internal_error("Failed to list posts").into_response()
		}
	}
}

/// POST /api/admin/posts - Create a post as a draft, authored by the caller.
pub async fn create_post(
	State(state): State<AppState>,
	RequireAuth(session): RequireAuth,
	Json(draft): Json<PostDraft>,
) -> impl IntoResponse {
	if draft.title.trim().is_empty() {
		return bad_request("invalid_title", "Title must not be empty").into_response();
	}
	if !validate_slug(&draft.slug, SLUG_MIN_LEN, SLUG_MAX_LEN) {
		return bad_request(
			"invalid_slug",
			"Slug must be lowercase letters, digits, and hyphens",
		)
		.into_response();
	}

	match state.post_repo.create_post(&draft, Some(&session.user_id)).await {
		Ok(post) => (StatusCode::CREATED, Json(post)).into_response(),
		Err(e) if e.is_conflict() => {
			conflict("slug_taken", "A post with this slug already exists").into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to create post");
			internal_error("Failed to create post").into_response()
		}
	}
}

/// PUT /api/admin/posts/{id} - Replace a post's editable fields.
pub async fn update_post(
	State(state): State<AppState>,
	RequireAuth(session): RequireAuth,
	Path(id): Path<String>,
	Json(draft): Json<PostDraft>,
) -> impl IntoResponse {
	let id = match parse_post_id(&id, "Invalid post ID") {
		Ok(id) => id,
		Err(e) => return bad_request(e.error, e.message).into_response(),
	};

	if draft.title.trim().is_empty() {
		return bad_request("invalid_title", "Title must not be empty").into_response();
	}
	if !validate_slug(&draft.slug, SLUG_MIN_LEN, SLUG_MAX_LEN) {
		return bad_request(
			"invalid_slug",
			"Slug must be lowercase letters, digits, and hyphens",
		)
		.into_response();
	}

	let post = match state.post_repo.get_post(&id).await {
		Ok(Some(post)) => post,
		Ok(None) => return not_found("Post not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, post_id = %id, "failed to fetch post");
			return internal_error("Failed to update post").into_response();
		}
	};

	if !may_touch(&session, &post) {
		return forbidden("You can only edit your own posts").into_response();
	}

	match state.post_repo.update_post(&id, &draft).await {
		Ok(post) => Json(post).into_response(),
		Err(DbError::NotFound(_)) => not_found("Post not found").into_response(),
		Err(e) if e.is_conflict() => {
			conflict("slug_taken", "A post with this slug already exists").into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, post_id = %id, "failed to update post");
			internal_error("Failed to update post").into_response()
		}
	}
}

/// DELETE /api/admin/posts/{id} - Remove a post.
pub async fn delete_post(
	State(state): State<AppState>,
	RequireAuth(session): RequireAuth,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let id = match parse_post_id(&id, "Invalid post ID") {
		Ok(id) => id,
		Err(e) => return bad_request(e.error, e.message).into_response(),
	};

	let post = match state.post_repo.get_post(&id).await {
		Ok(Some(post)) => post,
		Ok(None) => return not_found("Post not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, post_id = %id, "failed to fetch post");
			return internal_error("Failed to delete post").into_response();
		}
	};

	if !may_touch(&session, &post) {
		return forbidden("You can only delete your own posts").into_response();
	}

	match state.post_repo.delete_post(&id).await {
		Ok(_) => Json(serde_json::json!({"message": "Post deleted"})).into_response(),
		Err(e) => {
			tracing::error!(error = %e, post_id = %id, "failed to delete post");
			internal_error("Failed to delete post").into_response()
		}
	}
}

/// POST /api/admin/posts/{id}/status - Publish or unpublish a post.
///
/// Publication still honours ownership: a collaborator can only publish
/// their own posts even though they hold the publish permission.
pub async fn set_post_status(
	State(state): State<AppState>,
	RequireAuth(session): RequireAuth,
	Path(id): Path<String>,
	Json(change): Json<StatusChange>,
) -> impl IntoResponse {
	let id = match parse_post_id(&id, "Invalid post ID") {
		Ok(id) => id,
		Err(e) => return bad_request(e.error, e.message).into_response(),
	};

	let post = match state.post_repo.get_post(&id).await {
		Ok(Some(post)) => post,
		Ok(None) => return not_found("Post not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, post_id = %id, "failed to fetch post");
			return internal_error("Failed to change post status").into_response();
		}
	};

	if !may_touch(&session, &post) {
		return forbidden("You can only publish your own posts").into_response();
	}

	match state.post_repo.set_post_status(&id, change.status).await {
		Ok(()) => {
			tracing::info!(
				post_id = %id,
				status = %change.status,
				user_id = %session.user_id,
				"post status changed"
			);
			Json(serde_json::json!({"status": change.status})).into_response()
		}
		Err(DbError::NotFound(_)) => not_found("Post not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, post_id = %id, "failed to change post status");
			internal_error("Failed to change post status").into_response()
		}
	}
}
