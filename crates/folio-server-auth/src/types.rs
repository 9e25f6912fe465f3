// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for authentication and authorization.
//!
//! This module defines the foundational types used throughout the auth system:
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs for different entity types
//!   ([`UserId`], [`SessionId`], [`BookId`], etc.) preventing accidental mixing
//! - **[`Role`]**: the closed enumeration of actor roles used as the unit of
//!   privilege assignment
//!
//! All ID types implement transparent serde serialization (as UUID strings) and
//! provide conversion to/from [`uuid::Uuid`]. Roles serialize as the persisted
//! tags (`GLOBAL_ADMIN`, `CONTENT_ADMIN`, `COLLABORATOR`).

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user profile.");
define_id_type!(SessionId, "Unique identifier for a session.");
define_id_type!(BookId, "Unique identifier for a catalog book.");
define_id_type!(PostId, "Unique identifier for a journal post.");
define_id_type!(SubscriberId, "Unique identifier for a newsletter subscriber.");

// =============================================================================
// Roles
// =============================================================================

/// Actor roles, ordered from most to least privileged.
///
/// Roles form a hierarchy of privilege by permission-set inclusion (see
/// [`crate::permissions::permissions_for`]): each role's set is a superset of
/// the next. That property is emergent from the static table and asserted by
/// tests, not enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
	/// Full site control: settings, users, catalog, and all blog content.
	GlobalAdmin,
	/// Manages catalog and all blog content, but not settings or users.
	ContentAdmin,
	/// Writes and publishes their own blog posts only.
	Collaborator,
}

impl Role {
	/// Returns all available roles.
	pub fn all() -> &'static [Role] {
		&[Role::GlobalAdmin, Role::ContentAdmin, Role::Collaborator]
	}

	/// The persisted tag for this role (`GLOBAL_ADMIN`, ...).
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::GlobalAdmin => "GLOBAL_ADMIN",
			Role::ContentAdmin => "CONTENT_ADMIN",
			Role::Collaborator => "COLLABORATOR",
		}
	}

	/// Parse a persisted role tag.
	///
	/// Unknown tags yield `None`. Callers treat an unparseable role as "no
	/// role" (and therefore no permissions) rather than failing.
	pub fn parse(tag: &str) -> Option<Role> {
		match tag {
			"GLOBAL_ADMIN" => Some(Role::GlobalAdmin),
			"CONTENT_ADMIN" => Some(Role::ContentAdmin),
			"COLLABORATOR" => Some(Role::Collaborator),
			_ => None,
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	mod id_types {
		use super::*;

		#[test]
		fn user_id_roundtrips() {
			let uuid = Uuid::new_v4();
			let user_id = UserId::new(uuid);
			assert_eq!(user_id.into_inner(), uuid);
		}

		#[test]
		fn user_id_generates_unique() {
			let id1 = UserId::generate();
			let id2 = UserId::generate();
			assert_ne!(id1, id2);
		}

		#[test]
		fn user_id_serializes_as_uuid() {
			let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
			let user_id = UserId::new(uuid);
			let json = serde_json::to_string(&user_id).unwrap();
			assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");
		}

		proptest! {
				#[test]
				fn user_id_roundtrip_any_uuid(
						a: u128
				) {
						let uuid = Uuid::from_u128(a);
						let user_id = UserId::new(uuid);
						prop_assert_eq!(user_id.into_inner(), uuid);
						prop_assert_eq!(Uuid::from(user_id), uuid);
				}

				#[test]
				fn session_id_roundtrip_any_uuid(
						a: u128
				) {
						let uuid = Uuid::from_u128(a);
						let session_id = SessionId::new(uuid);
						prop_assert_eq!(session_id.into_inner(), uuid);
				}

				#[test]
				fn user_id_display_matches_uuid(
						a: u128
				) {
						let uuid = Uuid::from_u128(a);
						let user_id = UserId::new(uuid);
						prop_assert_eq!(user_id.to_string(), uuid.to_string());
				}
		}
	}

	mod roles {
		use super::*;

		#[test]
		fn all_returns_three_roles() {
			assert_eq!(Role::all().len(), 3);
		}

		#[test]
		fn tags_roundtrip() {
			for role in Role::all() {
				assert_eq!(Role::parse(role.as_str()), Some(*role));
			}
		}

		#[test]
		fn unknown_tag_parses_to_none() {
			assert_eq!(Role::parse("EDITOR"), None);
			assert_eq!(Role::parse(""), None);
			assert_eq!(Role::parse("global_admin"), None);
		}

		#[test]
		fn serializes_as_persisted_tag() {
			let json = serde_json::to_string(&Role::GlobalAdmin).unwrap();
			assert_eq!(json, "\"GLOBAL_ADMIN\"");
			let back: Role = serde_json::from_str(&json).unwrap();
			assert_eq!(back, Role::GlobalAdmin);
		}

		#[test]
		fn display_matches_as_str() {
			assert_eq!(Role::Collaborator.to_string(), "COLLABORATOR");
		}
	}
}
