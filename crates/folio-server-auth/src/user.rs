// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User profile types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Role, UserId};

/// A user profile.
///
/// The password hash is deliberately not part of this struct; it never
/// leaves the persistence layer. `full_name` and `email` are PII and are
/// redacted from logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
	/// Unique identifier for this user.
	pub id: UserId,

	/// Display name shown in the UI and as post author.
	pub full_name: String,

	/// Sign-in email, unique per profile.
	pub email: String,

	/// The role governing this user's permissions.
	pub role: Role,

	/// URL to the user's avatar image.
	pub avatar_url: Option<String>,

	/// When the profile was created.
	pub created_at: DateTime<Utc>,

	/// When the profile was last updated.
	pub updated_at: DateTime<Utc>,
}

impl Profile {
	/// Create a new profile with the given identity and role.
	pub fn new(full_name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
		let now = Utc::now();
		Self {
			id: UserId::generate(),
			full_name: full_name.into(),
			email: email.into(),
			role,
			avatar_url: None,
			created_at: now,
			updated_at: now,
		}
	}
}
