// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared validation utilities for API handlers.

use folio_server_auth::{BookId, PostId, SubscriberId, UserId};
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

static SLUG_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*[a-z0-9]$|^[a-z0-9]$").unwrap());

static EMAIL_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Validate a slug against format and length constraints.
///
/// Slugs must:
/// - Be between `min_len` and `max_len` characters
/// - Start and end with alphanumeric characters
/// - Contain only lowercase letters, numbers, and hyphens
pub fn validate_slug(slug: &str, min_len: usize, max_len: usize) -> bool {
	slug.len() >= min_len && slug.len() <= max_len && SLUG_REGEX.is_match(slug)
}

/// Sanitize an email address by trimming whitespace and lowercasing.
pub fn sanitize_email(email: &str) -> String {
	email.trim().to_lowercase()
}

/// Check that a (sanitized) email has the basic user@host.tld shape.
pub fn validate_email(email: &str) -> bool {
	EMAIL_REGEX.is_match(email)
}

/// Error type for ID parsing failures.
#[derive(Debug, Clone)]
pub struct IdParseError {
	pub error: String,
	pub message: String,
}

impl IdParseError {
	pub fn invalid_uuid(message: impl Into<String>) -> Self {
		Self {
			error: "invalid_id".to_string(),
			message: message.into(),
		}
	}
}

/// Parse a string as a BookId.
pub fn parse_book_id(id_str: &str, error_message: &str) -> Result<BookId, IdParseError> {
	Uuid::parse_str(id_str)
		.map(BookId::new)
		.map_err(|_| IdParseError::invalid_uuid(error_message))
}

/// Parse a string as a PostId.
pub fn parse_post_id(id_str: &str, error_message: &str) -> Result<PostId, IdParseError> {
	Uuid::parse_str(id_str)
		.map(PostId::new)
		.map_err(|_| IdParseError::invalid_uuid(error_message))
}

/// Parse a string as a UserId.
pub fn parse_user_id(id_str: &str, error_message: &str) -> Result<UserId, IdParseError> {
	Uuid::parse_str(id_str)
		.map(UserId::new)
		.map_err(|_| IdParseError::invalid_uuid(error_message))
}

/// Parse a string as a SubscriberId.
pub fn parse_subscriber_id(id_str: &str, error_message: &str) -> Result<SubscriberId, IdParseError> {
	Uuid::parse_str(id_str)
		.map(SubscriberId::new)
		.map_err(|_| IdParseError::invalid_uuid(error_message))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn valid_slugs() {
		assert!(validate_slug("hello-world", 1, 100));
		assert!(validate_slug("a", 1, 100));
		assert!(validate_slug("post-123", 1, 100));
	}

	#[test]
	fn invalid_slugs() {
		assert!(!validate_slug("-leading", 1, 100));
		assert!(!validate_slug("trailing-", 1, 100));
		assert!(!validate_slug("UPPER", 1, 100));
		assert!(!validate_slug("has space", 1, 100));
		assert!(!validate_slug("", 1, 100));
		assert!(!validate_slug("ab", 3, 100));
	}

	#[test]
	fn email_sanitization_and_shape() {
		assert_eq!(sanitize_email("  Reader@Example.COM "), "reader@example.com");
		assert!(validate_email("reader@example.com"));
		assert!(!validate_email("not-an-email"));
		assert!(!validate_email("two@@example.com"));
		assert!(!validate_email("missing@tld"));
	}

	#[test]
	fn id_parsing() {
		let id = BookId::generate();
		assert_eq!(parse_book_id(&id.to_string(), "bad id").unwrap(), id);
		assert!(parse_book_id("not-a-uuid", "bad id").is_err());
	}
}
