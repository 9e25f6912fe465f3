// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Blog post repository.
//!
//! Posts are addressed publicly by slug and internally by ID. Ownership is
//! tracked via `author_id` so collaborators can be limited to their own
//! posts; `published_at` is stamped the first time a post is published.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_server_auth::{PostId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::types::{parse_timestamp, parse_uuid, ContentStatus};

/// A blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
	pub id: PostId,
	pub title: String,
	pub slug: String,
	pub excerpt: Option<String>,
	pub content: Option<String>,
	pub category: Option<String>,
	pub cover_image: Option<String>,
	pub status: ContentStatus,
	pub author_id: Option<UserId>,
	pub published_at: Option<DateTime<Utc>>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Fields a caller may set when creating or updating a post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostDraft {
	pub title: String,
	pub slug: String,
	pub excerpt: Option<String>,
	pub content: Option<String>,
	pub category: Option<String>,
	pub cover_image: Option<String>,
}

#[async_trait]
pub trait PostStore: Send + Sync {
	async fn create_post(&self, draft: &PostDraft, author_id: Option<&UserId>) -> Result<Post, DbError>;
	async fn get_post(&self, id: &PostId) -> Result<Option<Post>, DbError>;
	async fn get_published_post_by_slug(&self, slug: &str) -> Result<Option<Post>, DbError>;
	async fn list_published_posts(&self) -> Result<Vec<Post>, DbError>;
	async fn list_all_posts(&self) -> Result<Vec<Post>, DbError>;
	async fn list_posts_by_author(&self, author_id: &UserId) -> Result<Vec<Post>, DbError>;
	async fn update_post(&self, id: &PostId, draft: &PostDraft) -> Result<Post, DbError>;
	async fn set_post_status(&self, id: &PostId, status: ContentStatus) -> Result<(), DbError>;
	async fn delete_post(&self, id: &PostId) -> Result<bool, DbError>;
}

/// Repository for post database operations.
#[derive(Clone)]
pub struct PostRepository {
	pool: SqlitePool,
}

impl PostRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	fn row_to_post(row: &sqlx::sqlite::SqliteRow) -> Result<Post, DbError> {
		let id: String = row.get("id");
		let status: String = row.get("status");
		let author_id: Option<String> = row.get("author_id");
		let published_at: Option<String> = row.get("published_at");
		let created_at: String = row.get("created_at");
		let updated_at: String = row.get("updated_at");

		Ok(Post {
			id: PostId::new(parse_uuid(&id, "posts.id")?),
			title: row.get("title"),
			slug: row.get("slug"),
			excerpt: row.get("excerpt"),
			content: row.get("content"),
			category: row.get("category"),
			cover_image: row.get("cover_image"),
			status: ContentStatus::parse(&status),
			author_id: author_id
				.map(|v| parse_uuid(&v, "posts.author_id").map(UserId::new))
				.transpose()?,
			published_at: published_at
				.map(|v| parse_timestamp(&v, "posts.published_at"))
				.transpose()?,
			created_at: parse_timestamp(&created_at, "posts.created_at")?,
			updated_at: parse_timestamp(&updated_at, "posts.updated_at")?,
		})
	}
}

#[async_trait]
impl PostStore for PostRepository {
	/// Create a post as a draft.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the slug is already taken.
	#[tracing::instrument(skip(self, draft), fields(slug = %draft.slug))]
	async fn create_post(&self, draft: &PostDraft, author_id: Option<&UserId>) -> Result<Post, DbError> {
		let id = PostId::generate();
		let now = Utc::now();

		let result = sqlx::query(
			r#"
			INSERT INTO posts (id, title, slug, excerpt, content, category, cover_image,
			                   status, author_id, published_at, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?, ?)
			"#,
		)
		.bind(id.to_string())
		.bind(&draft.title)
		.bind(&draft.slug)
		.bind(&draft.excerpt)
		.bind(&draft.content)
		.bind(&draft.category)
		.bind(&draft.cover_image)
		.bind(ContentStatus::Draft.as_str())
		.bind(author_id.map(|u| u.to_string()))
		.bind(now.to_rfc3339())
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await;

		match result {
			Ok(_) => {}
			Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
				return Err(DbError::Conflict(format!("slug already in use: {}", draft.slug)));
			}
			Err(e) => return Err(e.into()),
		}

		tracing::debug!(post_id = %id, "post created");
		self.get_post(&id)
			.await?
			.ok_or_else(|| DbError::Internal("post vanished after insert".to_string()))
	}

	#[tracing::instrument(skip(self), fields(post_id = %id))]
	async fn get_post(&self, id: &PostId) -> Result<Option<Post>, DbError> {
		let row = sqlx::query("SELECT * FROM posts WHERE id = ?")
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(Self::row_to_post).transpose()
	}

	/// Fetch one published post by slug. Drafts are invisible here even when
	/// the slug matches.
	#[tracing::instrument(skip(self))]
	async fn get_published_post_by_slug(&self, slug: &str) -> Result<Option<Post>, DbError> {
		let row = sqlx::query("SELECT * FROM posts WHERE slug = ? AND status = 'published'")
			.bind(slug)
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(Self::row_to_post).transpose()
	}

	/// Published posts, most recently published first.
	#[tracing::instrument(skip(self))]
	async fn list_published_posts(&self) -> Result<Vec<Post>, DbError> {
		let rows = sqlx::query(
			"SELECT * FROM posts WHERE status = 'published' ORDER BY published_at DESC",
		)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(Self::row_to_post).collect()
	}

	/// Every post regardless of status, for the admin screens.
	#[tracing::instrument(skip(self))]
	async fn list_all_posts(&self) -> Result<Vec<Post>, DbError> {
		let rows = sqlx::query("SELECT * FROM posts ORDER BY created_at DESC")
			.fetch_all(&self.pool)
			.await?;

		rows.iter().map(Self::row_to_post).collect()
	}

	#[tracing::instrument(skip(self), fields(author_id = %author_id))]
	async fn list_posts_by_author(&self, author_id: &UserId) -> Result<Vec<Post>, DbError> {
		let rows = sqlx::query("SELECT * FROM posts WHERE author_id = ? ORDER BY created_at DESC")
			.bind(author_id.to_string())
			.fetch_all(&self.pool)
			.await?;

		rows.iter().map(Self::row_to_post).collect()
	}

	/// Replace the editable fields of a post. Status, authorship and the
	/// publication timestamp are untouched.
	#[tracing::instrument(skip(self, draft), fields(post_id = %id))]
	async fn update_post(&self, id: &PostId, draft: &PostDraft) -> Result<Post, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE posts
			SET title = ?, slug = ?, excerpt = ?, content = ?, category = ?,
			    cover_image = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&draft.title)
		.bind(&draft.slug)
		.bind(&draft.excerpt)
		.bind(&draft.content)
		.bind(&draft.category)
		.bind(&draft.cover_image)
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await;

		match result {
			Ok(result) if result.rows_affected() == 0 => {
				return Err(DbError::NotFound(format!("post {id}")));
			}
			Ok(_) => {}
			Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
				return Err(DbError::Conflict(format!("slug already in use: {}", draft.slug)));
			}
			Err(e) => return Err(e.into()),
		}

		self.get_post(id)
			.await?
			.ok_or_else(|| DbError::NotFound(format!("post {id}")))
	}

	/// Change publication status. The first transition to published stamps
	/// `published_at`; re-publishing keeps the original timestamp.
	#[tracing::instrument(skip(self), fields(post_id = %id, status = %status))]
	async fn set_post_status(&self, id: &PostId, status: ContentStatus) -> Result<(), DbError> {
		let now = Utc::now().to_rfc3339();
		let result = match status {
			ContentStatus::Published => {
				sqlx::query(
					"UPDATE posts SET status = ?, published_at = COALESCE(published_at, ?), updated_at = ? WHERE id = ?",
				)
				.bind(status.as_str())
				.bind(&now)
				.bind(&now)
				.bind(id.to_string())
				.execute(&self.pool)
				.await?
			}
			ContentStatus::Draft => {
				sqlx::query("UPDATE posts SET status = ?, updated_at = ? WHERE id = ?")
					.bind(status.as_str())
					.bind(&now)
					.bind(id.to_string())
					.execute(&self.pool)
					.await?
			}
		};

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("post {id}")));
		}
		tracing::debug!(post_id = %id, status = %status, "post status changed");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(post_id = %id))]
	async fn delete_post(&self, id: &PostId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM posts WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}
