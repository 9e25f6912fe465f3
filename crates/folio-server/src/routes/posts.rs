// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Public blog HTTP handlers. Posts are addressed by slug and only visible
//! once published.

use axum::{
	extract::{Path, State},
	Json,
};
use folio_server_db::{Post, PostStore};

use crate::{api::AppState, error::ServerError};

#[utoipa::path(
    get,
    path = "/api/posts",
    responses(
        (status = 200, description = "Published posts, most recent first")
    ),
    tag = "posts"
)]
/// GET /api/posts - List published posts.
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ServerError> {
	Ok(Json(state.post_repo.list_published_posts().await?))
}

#[utoipa::path(
    get,
    path = "/api/posts/{slug}",
    params(
        ("slug" = String, Path, description = "Post slug")
    ),
    responses(
        (status = 200, description = "The post"),
        (status = 404, description = "No published post with this slug")
    ),
    tag = "posts"
)]
/// GET /api/posts/{slug} - Fetch one published post by slug.
pub async fn get_post_by_slug(
	State(state): State<AppState>,
	Path(slug): Path<String>,
) -> Result<Json<Post>, ServerError> {
	state
		.post_repo
		.get_published_post_by_slug(&slug)
		.await?
		.map(Json)
		.ok_or_else(|| ServerError::NotFound("Post not found".to_string()))
}
