// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Catalogue management HTTP handlers.
//!
//! Editing and publication are separate permissions; the router guards
//! `/books/{id}/status` more strictly than the CRUD routes.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use folio_server_db::{BookDraft, BookStore, ContentStatus, DbError};
use serde::Deserialize;

use crate::{
	api::AppState,
	api_response::{bad_request, internal_error, not_found},
	auth_middleware::RequireAuth,
	validation::parse_book_id,
};

#[derive(Debug, Deserialize)]
pub struct StatusChange {
	pub status: ContentStatus,
}

/// GET /api/admin/books - Every book regardless of status.
pub async fn list_books(State(state): State<AppState>) -> impl IntoResponse {
	match state.book_repo.list_all_books().await {
		Ok(books) => Json(books).into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list books for admin");
			internal_error("Failed to list books").into_response()
		}
	}
}

/// POST /api/admin/books - Create a book as a draft.
pub async fn create_book(
	State(state): State<AppState>,
	RequireAuth(session): RequireAuth,
	Json(draft): Json<BookDraft>,
) -> impl IntoResponse {
	if draft.title.trim().is_empty() {
		return bad_request("invalid_title", "Title must not be empty").into_response();
	}

	match state.book_repo.create_book(&draft, Some(&session.user_id)).await {
		Ok(book) => (StatusCode::CREATED, Json(book)).into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to create book");
			internal_error("Failed to create book").into_response()
		}
	}
}

/// PUT /api/admin/books/{id} - Replace a book's editable fields.
pub async fn update_book(
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(draft): Json<BookDraft>,
) -> impl IntoResponse {
	let id = match parse_book_id(&id, "Invalid book ID") {
		Ok(id) => id,
		Err(e) => return bad_request(e.error, e.message).into_response(),
	};

	if draft.title.trim().is_empty() {
		return bad_request("invalid_title", "Title must not be empty").into_response();
	}

	match state.book_repo.update_book(&id, &draft).await {
		Ok(book) => Json(book).into_response(),
		Err(DbError::NotFound(_)) => not_found("Book not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, book_id = %id, "failed to update book");
			internal_error("Failed to update book").into_response()
		}
	}
}

/// DELETE /api/admin/books/{id} - Remove a book.
pub async fn delete_book(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let id = match parse_book_id(&id, "Invalid book ID") {
		Ok(id) => id,
		Err(e) => return bad_request(e.error, e.message).into_response(),
	};

	match state.book_repo.delete_book(&id).await {
		Ok(true) => Json(serde_json::json!({"message": "Book deleted"})).into_response(),
		Ok(false) => not_found("Book not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, book_id = %id, "failed to delete book");
			internal_error("Failed to delete book").into_response()
		}
	}
}

/// POST /api/admin/books/{id}/status - Publish or unpublish a book.
pub async fn set_book_status(
	State(state): State<AppState>,
	RequireAuth(session): RequireAuth,
	Path(id): Path<String>,
	Json(change): Json<StatusChange>,
) -> impl IntoResponse {
	let id = match parse_book_id(&id, "Invalid book ID") {
		Ok(id) => id,
		Err(e) => return bad_request(e.error, e.message).into_response(),
	};

	match state.book_repo.set_book_status(&id, change.status).await {
		Ok(()) => {
			tracing::info!(
				book_id = %id,
				status = %change.status,
				user_id = %session.user_id,
				"book status changed"
			);
			Json(serde_json::json!({"status": change.status})).into_response()
		}
		Err(DbError::NotFound(_)) => not_found("Book not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, book_id = %id, "failed to change book status");
			internal_error("Failed to change book status").into_response()
		}
	}
}
