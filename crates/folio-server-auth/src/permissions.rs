// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The static role → permission table and its lookup functions.
//!
//! This is the heart of the authorization model: a fixed, compile-time
//! mapping from each [`Role`] to the closed set of [`Permission`]s it grants.
//!
//! # Design Principles
//!
//! 1. **Pure data**: the table has no behavior and is never mutated at
//!    runtime; changing it requires a code change and redeploy
//! 2. **Total**: every role has exactly one entry
//! 3. **No I/O**: lookups are synchronous, in-memory, and infallible
//!
//! The privilege hierarchy (GlobalAdmin ⊇ ContentAdmin ⊇ Collaborator) is an
//! emergent property of the table contents, asserted by the tests below.

use crate::types::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A grantable capability, identified by an opaque snake_case tag.
///
/// Permissions are pure capability tokens; they are not owned by any entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
	/// Global settings and user management.
	ManageSettings,
	/// Create/edit/delete catalog books.
	ManageProducts,
	/// Publish books to the live catalog.
	PublishProducts,
	/// Edit/delete any blog post.
	ManageBlogAll,
	/// Edit/delete own blog posts.
	ManageBlogOwn,
	/// Publish blog posts.
	PublishBlog,
	/// Upload images and files.
	UploadMedia,
}

impl Permission {
	/// Returns all defined permissions.
	pub fn all() -> &'static [Permission] {
		&[
			Permission::ManageSettings,
			Permission::ManageProducts,
			Permission::PublishProducts,
			Permission::ManageBlogAll,
			Permission::ManageBlogOwn,
			Permission::PublishBlog,
			Permission::UploadMedia,
		]
	}

	/// The wire tag for this permission (`manage_settings`, ...).
	pub fn as_str(&self) -> &'static str {
		match self {
			Permission::ManageSettings => "manage_settings",
			Permission::ManageProducts => "manage_products",
			Permission::PublishProducts => "publish_products",
			Permission::ManageBlogAll => "manage_blog_all",
			Permission::ManageBlogOwn => "manage_blog_own",
			Permission::PublishBlog => "publish_blog",
			Permission::UploadMedia => "upload_media",
		}
	}

	/// Parse a permission tag. Unknown tags yield `None`, which downstream
	/// checks treat as "not granted to anyone".
	pub fn parse(tag: &str) -> Option<Permission> {
		match tag {
			"manage_settings" => Some(Permission::ManageSettings),
			"manage_products" => Some(Permission::ManageProducts),
			"publish_products" => Some(Permission::PublishProducts),
			"manage_blog_all" => Some(Permission::ManageBlogAll),
			"manage_blog_own" => Some(Permission::ManageBlogOwn),
			"publish_blog" => Some(Permission::PublishBlog),
			"upload_media" => Some(Permission::UploadMedia),
			_ => None,
		}
	}
}

impl fmt::Display for Permission {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

const GLOBAL_ADMIN_PERMISSIONS: &[Permission] = &[
	Permission::ManageSettings,
	Permission::ManageProducts,
	Permission::PublishProducts,
	Permission::ManageBlogAll,
	Permission::ManageBlogOwn,
	Permission::PublishBlog,
	Permission::UploadMedia,
];

const CONTENT_ADMIN_PERMISSIONS: &[Permission] = &[
	Permission::ManageProducts,
	Permission::PublishProducts,
	Permission::ManageBlogAll,
	Permission::ManageBlogOwn,
	Permission::PublishBlog,
	Permission::UploadMedia,
];

const COLLABORATOR_PERMISSIONS: &[Permission] = &[
	Permission::ManageBlogOwn,
	Permission::PublishBlog,
	Permission::UploadMedia,
];

/// Returns the fixed permission set granted to a role.
///
/// Total over the [`Role`] enumeration; the returned slice is `'static` and
/// identical between calls. The defensive "unknown role → empty set" default
/// lives at the parsing boundary instead ([`Role::parse`] yields `None` for
/// unrecognized tags, and no session means no permissions).
pub fn permissions_for(role: Role) -> &'static [Permission] {
	match role {
		Role::GlobalAdmin => GLOBAL_ADMIN_PERMISSIONS,
		Role::ContentAdmin => CONTENT_ADMIN_PERMISSIONS,
		Role::Collaborator => COLLABORATOR_PERMISSIONS,
	}
}

/// Returns true if the role's permission set contains the given permission.
pub fn role_grants(role: Role, permission: Permission) -> bool {
	permissions_for(role).contains(&permission)
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn table_is_total_and_non_empty() {
		for role in Role::all() {
			assert!(
				!permissions_for(*role).is_empty(),
				"{role} has an empty permission set"
			);
		}
	}

	#[test]
	fn table_is_referentially_stable() {
		for role in Role::all() {
			let a = permissions_for(*role);
			let b = permissions_for(*role);
			assert_eq!(a.as_ptr(), b.as_ptr());
			assert_eq!(a, b);
		}
	}

	#[test]
	fn global_admin_has_every_permission() {
		for p in Permission::all() {
			assert!(role_grants(Role::GlobalAdmin, *p), "missing {p}");
		}
	}

	#[test]
	fn content_admin_has_all_but_settings() {
		assert!(!role_grants(Role::ContentAdmin, Permission::ManageSettings));
		for p in Permission::all() {
			if *p != Permission::ManageSettings {
				assert!(role_grants(Role::ContentAdmin, *p), "missing {p}");
			}
		}
	}

	#[test]
	fn collaborator_has_exactly_own_blog_permissions() {
		let expected = [
			Permission::ManageBlogOwn,
			Permission::PublishBlog,
			Permission::UploadMedia,
		];
		for p in Permission::all() {
			assert_eq!(
				role_grants(Role::Collaborator, *p),
				expected.contains(p),
				"unexpected grant state for {p}"
			);
		}
	}

	#[test]
	fn unknown_permission_tag_parses_to_none() {
		assert_eq!(Permission::parse("manage_everything"), None);
		assert_eq!(Permission::parse(""), None);
		assert_eq!(Permission::parse("MANAGE_SETTINGS"), None);
	}

	#[test]
	fn permission_tags_roundtrip() {
		for p in Permission::all() {
			assert_eq!(Permission::parse(p.as_str()), Some(*p));
		}
	}

	#[test]
	fn serializes_snake_case() {
		let json = serde_json::to_string(&Permission::ManageBlogOwn).unwrap();
		assert_eq!(json, "\"manage_blog_own\"");
	}

	mod property_tests {
		use super::*;

		fn arb_role() -> impl Strategy<Value = Role> {
			prop_oneof![
				Just(Role::GlobalAdmin),
				Just(Role::ContentAdmin),
				Just(Role::Collaborator),
			]
		}

		proptest! {
			#[test]
			fn hierarchy_is_superset_inclusion(role in arb_role()) {
				// Every permission a lesser role holds is also held by the
				// greater role: Collaborator is contained in ContentAdmin,
				// which is contained in GlobalAdmin.
				for p in permissions_for(Role::Collaborator) {
					prop_assert!(role_grants(Role::ContentAdmin, *p));
				}
				for p in permissions_for(Role::ContentAdmin) {
					prop_assert!(role_grants(Role::GlobalAdmin, *p));
				}
				// And role_grants agrees with permissions_for membership.
				for p in Permission::all() {
					prop_assert_eq!(
						role_grants(role, *p),
						permissions_for(role).contains(p)
					);
				}
			}
		}
	}
}
