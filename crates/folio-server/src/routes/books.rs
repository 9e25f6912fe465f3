// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Public catalogue HTTP handlers. Only published books are visible here.

use axum::{
	extract::{Path, Query, State},
	response::{IntoResponse, Response},
	Json,
};
use folio_server_db::{Book, BookFilter, BookStore, ContentStatus};
use serde::Deserialize;

use crate::{
	api::AppState, api_response::bad_request, error::ServerError, validation::parse_book_id,
};

#[derive(Debug, Deserialize)]
pub struct BookListQuery {
	/// Restrict the listing to one category.
	pub category: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/books",
    params(
        ("category" = Option<String>, Query, description = "Filter by category")
    ),
    responses(
        (status = 200, description = "Published books, newest first")
    ),
    tag = "books"
)]
/// GET /api/books - List published books.
pub async fn list_books(
	State(state): State<AppState>,
	Query(query): Query<BookListQuery>,
) -> Result<Json<Vec<Book>>, ServerError> {
	let filter = BookFilter {
		category: query.category,
	};

	Ok(Json(state.book_repo.list_published_books(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "The book"),
        (status = 404, description = "No published book with this ID")
    ),
    tag = "books"
)]
/// GET /api/books/{id} - Fetch one published book.
///
/// Drafts are indistinguishable from missing books.
pub async fn get_book(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Response, ServerError> {
	let id = match parse_book_id(&id, "Invalid book ID") {
		Ok(id) => id,
		Err(e) => return Ok(bad_request(e.error, e.message).into_response()),
	};

	match state.book_repo.get_book(&id).await? {
		Some(book) if book.status == ContentStatus::Published => {
			Ok(Json(book).into_response())
		}
		_ => Err(ServerError::NotFound("Book not found".to_string())),
	}
}
