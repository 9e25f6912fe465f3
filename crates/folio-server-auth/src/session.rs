// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session state and the permission-checking contract.
//!
//! This module provides:
//! - [`Session`] - the live record of the currently authenticated actor
//! - [`SessionState`] - an explicit, injectable single-slot session store
//! - [`check_permission`] - the pure authorization check
//! - Session token generation and hashing helpers
//!
//! # Semantics
//!
//! A [`SessionState`] holds at most one active [`Session`]. The last
//! `begin`/`end` call wins; there is no queueing or coalescing of concurrent
//! sign-in attempts. While no session is active, every permission check
//! returns `false`.
//!
//! # Security Notes
//!
//! - Session tokens are bearer secrets; only their SHA-256 hash is persisted
//! - Token values are never logged

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::permissions::{role_grants, Permission};
use crate::types::{Role, SessionId, UserId};

/// Prefix for session tokens issued by this server.
pub const SESSION_TOKEN_PREFIX: &str = "fs_";

/// The currently authenticated actor and their role.
///
/// Sessions are value records: they are copied into responses and request
/// contexts, never shared by reference across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
	/// Unique identifier for this session.
	pub id: SessionId,
	/// The authenticated user.
	pub user_id: UserId,
	/// Display name shown in the admin UI.
	pub display_name: String,
	/// The user's email address.
	pub email: String,
	/// The user's role, fixed for the lifetime of the session.
	pub role: Role,
	/// Optional avatar reference.
	pub avatar_url: Option<String>,
	/// When this session stops being restorable.
	pub expires_at: DateTime<Utc>,
}

impl Session {
	/// Returns true if the session has passed its expiry instant.
	pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
		self.expires_at <= now
	}
}

/// Answers "may the actor of `session` perform `permission`?".
///
/// Pure with respect to its inputs: no session means no permissions;
/// otherwise the static permission table decides. Never errors.
pub fn check_permission(session: Option<&Session>, permission: Permission) -> bool {
	match session {
		Some(session) => role_grants(session.role, permission),
		None => false,
	}
}

/// Explicit single-slot store for the active session.
///
/// Constructed once per application (or request) context and passed where
/// needed instead of living in a hidden global. `begin` installs a session
/// synchronously; `end` clears it; `check_permission` consults the slot and
/// the static permission table. Test harnesses drive `begin` directly to
/// simulate any role.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
	active: Option<Session>,
}

impl SessionState {
	/// Create an empty (unauthenticated) state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a state with an already-restored session.
	pub fn restored(session: Session) -> Self {
		Self {
			active: Some(session),
		}
	}

	/// Install a new active session. Replaces any prior session; the last
	/// call wins.
	pub fn begin(&mut self, session: Session) {
		self.active = Some(session);
	}

	/// Clear the active session. Subsequent checks behave unauthenticated.
	pub fn end(&mut self) {
		self.active = None;
	}

	/// The active session, if any.
	pub fn current(&self) -> Option<&Session> {
		self.active.as_ref()
	}

	/// Returns true if a session is active.
	pub fn is_authenticated(&self) -> bool {
		self.active.is_some()
	}

	/// The active role, if any.
	pub fn role(&self) -> Option<Role> {
		self.active.as_ref().map(|s| s.role)
	}

	/// Check a permission against the active session.
	pub fn check_permission(&self, permission: Permission) -> bool {
		check_permission(self.active.as_ref(), permission)
	}
}

/// Generate a new session token: `fs_` followed by 64 hex characters.
///
/// The raw token is returned to the client once; only [`hash_token`] output
/// is persisted.
pub fn generate_token() -> String {
	let mut bytes = [0u8; 32];
	rand::thread_rng().fill_bytes(&mut bytes);
	format!("{SESSION_TOKEN_PREFIX}{}", hex::encode(bytes))
}

/// SHA-256 hash of a session token, hex encoded, for storage and lookup.
pub fn hash_token(token: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(token.as_bytes());
	hex::encode(hasher.finalize())
}

/// Check if a string looks like a session token issued by this server.
pub fn is_session_token(token: &str) -> bool {
	token.starts_with(SESSION_TOKEN_PREFIX)
}
