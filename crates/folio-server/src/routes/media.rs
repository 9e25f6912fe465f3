// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Media upload HTTP handler.
//!
//! Uploads land in the configured media directory under a random filename
//! and are served back via the static `/media` mount.
//!
//! # Security Properties
//!
//! - Content types are allow-listed (JPEG, PNG, WebP, PDF)
//! - The stored filename is server-generated; client filenames only
//!   contribute their extension via the declared content type
//! - Uploads larger than the configured cap are rejected with 413

use axum::{
	extract::{Multipart, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use rand::RngCore;

use crate::{
	api::AppState,
	api_response::{bad_request, internal_error},
	auth_middleware::RequireAuth,
	error::ErrorResponse,
};

/// Allowed upload content types and their stored extensions.
const ALLOWED_TYPES: &[(&str, &str)] = &[
	("image/jpeg", "jpg"),
	("image/png", "png"),
	("image/webp", "webp"),
	("application/pdf", "pdf"),
];

fn extension_for(content_type: &str) -> Option<&'static str> {
	ALLOWED_TYPES
		.iter()
		.find(|(mime, _)| *mime == content_type)
		.map(|(_, ext)| *ext)
}

fn random_filename(extension: &str) -> String {
	let mut bytes = [0u8; 16];
	rand::thread_rng().fill_bytes(&mut bytes);
	format!("{}.{extension}", hex::encode(bytes))
}

/// POST /api/media/upload - Upload one file as multipart form data.
///
/// Expects a single `file` field. Responds with the public URL of the
/// stored file.
pub async fn upload(
	State(state): State<AppState>,
	RequireAuth(session): RequireAuth,
	mut multipart: Multipart,
) -> impl IntoResponse {
	let field = match multipart.next_field().await {
		Ok(Some(field)) => field,
		Ok(None) => {
			return bad_request("missing_file", "Expected a multipart 'file' field")
				.into_response();
		}
		Err(e) => {
			tracing::debug!(error = %e, "upload: malformed multipart body");
			return bad_request("invalid_multipart", "Malformed multipart body").into_response();
		}
	};

	let content_type = field.content_type().map(str::to_string).unwrap_or_default();
	let Some(extension) = extension_for(&content_type) else {
		tracing::debug!(content_type = %content_type, "upload: rejected content type");
		return bad_request(
			"unsupported_type",
			"Only JPEG, PNG, WebP, and PDF uploads are accepted",
		)
		.into_response();
	};

	let data = match field.bytes().await {
		Ok(data) => data,
		Err(e) => {
			tracing::debug!(error = %e, "upload: failed reading field body");
			return bad_request("invalid_multipart", "Malformed multipart body").into_response();
		}
	};

	if data.len() as u64 > state.media.max_upload_bytes {
		return (
			StatusCode::PAYLOAD_TOO_LARGE,
			Json(ErrorResponse {
				error: "too_large".to_string(),
				message: format!(
					"Upload exceeds the {} byte limit",
					state.media.max_upload_bytes
				),
			}),
		)
			.into_response();
	}

	if data.is_empty() {
		return bad_request("empty_file", "Uploaded file is empty").into_response();
	}

	let filename = random_filename(extension);
	let dir = std::path::Path::new(&state.media.dir);
	let path = dir.join(&filename);

	if let Err(e) = tokio::fs::create_dir_all(dir).await {
		tracing::error!(error = %e, "upload: failed to create media directory");
		return internal_error("Upload failed").into_response();
	}

	if let Err(e) = tokio::fs::write(&path, &data).await {
		tracing::error!(error = %e, path = %path.display(), "upload: write failed");
		return internal_error("Upload failed").into_response();
	}

	let url = format!(
		"{}/{filename}",
		state.media.public_base_url.trim_end_matches('/')
	);

	tracing::info!(
		user_id = %session.user_id,
		size = data.len(),
		content_type = %content_type,
		url = %url,
		"media uploaded"
	);

	(
		StatusCode::CREATED,
		Json(serde_json::json!({
			"url": url,
			"size": data.len(),
			"content_type": content_type,
		})),
	)
		.into_response()
}
