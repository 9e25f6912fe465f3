// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Book catalogue repository.
//!
//! Books carry the full catalogue record: bibliographic fields, optional
//! commerce data (price, affiliate links), and a draft/published status.
//! The public site only ever sees published rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_server_auth::{BookId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::types::{parse_timestamp, parse_uuid, ContentStatus};

/// A catalogue entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
	pub id: BookId,
	pub title: String,
	pub subtitle: Option<String>,
	pub author: String,
	pub category: String,
	pub year: i64,
	pub isbn: Option<String>,
	pub pages: Option<i64>,
	pub price: Option<f64>,
	pub description: Option<String>,
	pub cover_url: Option<String>,
	pub pdf_url: Option<String>,
	/// Retailer name to URL, stored as a JSON object.
	pub affiliate_links: Option<serde_json::Value>,
	pub is_digital_only: bool,
	pub status: ContentStatus,
	pub created_by: Option<UserId>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Fields a caller may set when creating or updating a book.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookDraft {
	pub title: String,
	pub subtitle: Option<String>,
	pub author: String,
	pub category: String,
	pub year: i64,
	pub isbn: Option<String>,
	pub pages: Option<i64>,
	pub price: Option<f64>,
	pub description: Option<String>,
	pub cover_url: Option<String>,
	pub pdf_url: Option<String>,
	pub affiliate_links: Option<serde_json::Value>,
	#[serde(default)]
	pub is_digital_only: bool,
}

/// Filter for public catalogue listings.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
	/// Restrict to one category when set.
	pub category: Option<String>,
}

#[async_trait]
pub trait BookStore: Send + Sync {
	async fn create_book(&self, draft: &BookDraft, created_by: Option<&UserId>) -> Result<Book, DbError>;
	async fn get_book(&self, id: &BookId) -> Result<Option<Book>, DbError>;
	async fn list_published_books(&self, filter: &BookFilter) -> Result<Vec<Book>, DbError>;
	async fn list_all_books(&self) -> Result<Vec<Book>, DbError>;
	async fn update_book(&self, id: &BookId, draft: &BookDraft) -> Result<Book, DbError>;
	async fn set_book_status(&self, id: &BookId, status: ContentStatus) -> Result<(), DbError>;
	async fn delete_book(&self, id: &BookId) -> Result<bool, DbError>;
}

/// Repository for book database operations.
#[derive(Clone)]
pub struct BookRepository {
	pool: SqlitePool,
}

impl BookRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	fn row_to_book(row: &sqlx::sqlite::SqliteRow) -> Result<Book, DbError> {
		let id: String = row.get("id");
		let created_at: String = row.get("created_at");
		let updated_at: String = row.get("updated_at");
		let status: String = row.get("status");
		let created_by: Option<String> = row.get("created_by");
		let affiliate_links: Option<String> = row.get("affiliate_links");

		let affiliate_links = affiliate_links
			.map(|raw| serde_json::from_str(&raw))
			.transpose()
			.map_err(DbError::Serialization)?;

		Ok(Book {
			id: BookId::new(parse_uuid(&id, "books.id")?),
			title: row.get("title"),
			subtitle: row.get("subtitle"),
			author: row.get("author"),
			category: row.get("category"),
			year: row.get("year"),
			isbn: row.get("isbn"),
			pages: row.get("pages"),
			price: row.get("price"),
			description: row.get("description"),
			cover_url: row.get("cover_url"),
			pdf_url: row.get("pdf_url"),
			affiliate_links,
			is_digital_only: row.get::<i64, _>("is_digital_only") != 0,
			status: ContentStatus::parse(&status),
			created_by: created_by
				.map(|v| parse_uuid(&v, "books.created_by").map(UserId::new))
				.transpose()?,
			created_at: parse_timestamp(&created_at, "books.created_at")?,
			updated_at: parse_timestamp(&updated_at, "books.updated_at")?,
		})
	}

	fn links_to_text(links: &Option<serde_json::Value>) -> Result<Option<String>, DbError> {
		links
			.as_ref()
			.map(serde_json::to_string)
			.transpose()
			.map_err(DbError::Serialization)
	}
}

#[async_trait]
impl BookStore for BookRepository {
	/// Create a book as a draft.
	#[tracing::instrument(skip(self, draft))]
	async fn create_book(&self, draft: &BookDraft, created_by: Option<&UserId>) -> Result<Book, DbError> {
		let id = BookId::generate();
		let now = Utc::now();

		sqlx::query(
			r#"
			INSERT INTO books (id, title, subtitle, author, category, year, isbn, pages,
			                   price, description, cover_url, pdf_url, affiliate_links,
			                   is_digital_only, status, created_by, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(id.to_string())
		.bind(&draft.title)
		.bind(&draft.subtitle)
		.bind(&draft.author)
		.bind(&draft.category)
		.bind(draft.year)
		.bind(&draft.isbn)
		.bind(draft.pages)
		.bind(draft.price)
		.bind(&draft.description)
		.bind(&draft.cover_url)
		.bind(&draft.pdf_url)
		.bind(Self::links_to_text(&draft.affiliate_links)?)
		.bind(draft.is_digital_only as i64)
		.bind(ContentStatus::Draft.as_str())
		.bind(created_by.map(|u| u.to_string()))
		.bind(now.to_rfc3339())
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(book_id = %id, "book created");
		self.get_book(&id)
			.await?
			.ok_or_else(|| DbError::Internal("book vanished after insert".to_string()))
	}

	#[tracing::instrument(skip(self), fields(book_id = %id))]
	async fn get_book(&self, id: &BookId) -> Result<Option<Book>, DbError> {
		let row = sqlx::query("SELECT * FROM books WHERE id = ?")
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(Self::row_to_book).transpose()
	}

	/// Published books only, newest first. This is the public catalogue view.
	#[tracing::instrument(skip(self))]
	async fn list_published_books(&self, filter: &BookFilter) -> Result<Vec<Book>, DbError> {
		let rows = match &filter.category {
			Some(category) => {
				sqlx::query(
					"SELECT * FROM books WHERE status = 'published' AND category = ? ORDER BY year DESC, created_at DESC",
				)
				.bind(category)
				.fetch_all(&self.pool)
				.await?
			}
			None => {
				sqlx::query("SELECT * FROM books WHERE status = 'published' ORDER BY year DESC, created_at DESC")
					.fetch_all(&self.pool)
					.await?
			}
		};

		rows.iter().map(Self::row_to_book).collect()
	}

	/// Every book regardless of status, for the admin screens.
	#[tracing::instrument(skip(self))]
	async fn list_all_books(&self) -> Result<Vec<Book>, DbError> {
		let rows = sqlx::query("SELECT * FROM books ORDER BY created_at DESC")
			.fetch_all(&self.pool)
			.await?;

		rows.iter().map(Self::row_to_book).collect()
	}

	/// Replace the editable fields of a book. Status and ownership are
	/// untouched; publication goes through [`BookStore::set_book_status`].
	#[tracing::instrument(skip(self, draft), fields(book_id = %id))]
	async fn update_book(&self, id: &BookId, draft: &BookDraft) -> Result<Book, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE books
			SET title = ?, subtitle = ?, author = ?, category = ?, year = ?, isbn = ?,
			    pages = ?, price = ?, description = ?, cover_url = ?, pdf_url = ?,
			    affiliate_links = ?, is_digital_only = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&draft.title)
		.bind(&draft.subtitle)
		.bind(&draft.author)
		.bind(&draft.category)
		.bind(draft.year)
		.bind(&draft.isbn)
		.bind(draft.pages)
		.bind(draft.price)
		.bind(&draft.description)
		.bind(&draft.cover_url)
		.bind(&draft.pdf_url)
		.bind(Self::links_to_text(&draft.affiliate_links)?)
		.bind(draft.is_digital_only as i64)
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("book {id}")));
		}
		self.get_book(id)
			.await?
			.ok_or_else(|| DbError::NotFound(format!("book {id}")))
	}

	#[tracing::instrument(skip(self), fields(book_id = %id, status = %status))]
	async fn set_book_status(&self, id: &BookId, status: ContentStatus) -> Result<(), DbError> {
		let result = sqlx::query("UPDATE books SET status = ?, updated_at = ? WHERE id = ?")
			.bind(status.as_str())
			.bind(Utc::now().to_rfc3339())
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("book {id}")));
		}
		tracing::debug!(book_id = %id, status = %status, "book status changed");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(book_id = %id))]
	async fn delete_book(&self, id: &BookId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM books WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}
