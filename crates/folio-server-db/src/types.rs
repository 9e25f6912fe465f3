// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared persistence types and row-mapping helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DbError;

/// Publication status shared by books and posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
	/// Visible only in the admin screens.
	#[default]
	Draft,
	/// Visible on the public site.
	Published,
}

impl ContentStatus {
	/// The persisted tag for this status.
	pub fn as_str(&self) -> &'static str {
		match self {
			ContentStatus::Draft => "draft",
			ContentStatus::Published => "published",
		}
	}

	/// Parse a persisted status tag. Unknown tags are treated as drafts so
	/// a corrupt row can never leak onto the public site.
	pub fn parse(tag: &str) -> ContentStatus {
		match tag {
			"published" => ContentStatus::Published,
			_ => ContentStatus::Draft,
		}
	}
}

impl fmt::Display for ContentStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Parse an RFC 3339 timestamp stored as text.
pub(crate) fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("invalid timestamp in {column}: {e}")))
}

/// Parse a UUID stored as text.
pub(crate) fn parse_uuid(value: &str, column: &str) -> Result<uuid::Uuid, DbError> {
	uuid::Uuid::parse_str(value)
		.map_err(|e| DbError::Internal(format!("invalid uuid in {column}: {e}")))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_tags_roundtrip() {
		assert_eq!(ContentStatus::parse("draft"), ContentStatus::Draft);
		assert_eq!(ContentStatus::parse("published"), ContentStatus::Published);
	}

	#[test]
	fn unknown_status_falls_back_to_draft() {
		assert_eq!(ContentStatus::parse("archived"), ContentStatus::Draft);
		assert_eq!(ContentStatus::parse(""), ContentStatus::Draft);
	}

	#[test]
	fn default_is_draft() {
		assert_eq!(ContentStatus::default(), ContentStatus::Draft);
	}

	#[test]
	fn parse_timestamp_rejects_garbage() {
		assert!(parse_timestamp("not-a-date", "created_at").is_err());
		assert!(parse_timestamp("2024-03-01T10:00:00Z", "created_at").is_ok());
	}
}
