// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request-credential extraction and authentication configuration.
//!
//! This module provides:
//! - [`AuthContext`] - per-request auth state carried through the pipeline
//! - [`AuthConfig`] - configuration for authentication behavior
//! - Helper functions for extracting session cookies and bearer tokens
//!
//! # Authentication Flow
//!
//! ```text
//! Request → Extract Cookie/Bearer → Session lookup (bounded) → AuthContext
//! ```
//!
//! # Security Notes
//!
//! - Session tokens are extracted from cookies (HttpOnly, Secure recommended)
//!   or from the Authorization header
//! - Token values are never logged

use http::header::{AUTHORIZATION, COOKIE};
use http::HeaderMap;

use crate::permissions::Permission;
use crate::session::{Session, SessionState};
use crate::types::Role;

/// Default name for the session cookie.
pub const SESSION_COOKIE_NAME: &str = "folio_session";

/// Environment variable to enable dev mode (bypass authentication).
pub const DEV_MODE_ENV_VAR: &str = "FOLIO_SERVER_AUTH_DEV_MODE";
pub const FOLIO_ENV_VAR: &str = "FOLIO_SERVER_ENV";

/// Authentication state for request processing.
///
/// Wraps the restored [`SessionState`] for one request. Inserted into
/// request extensions by the auth middleware after session restoration has
/// settled, so downstream guards never observe an in-flight restore.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	state: SessionState,
}

impl AuthContext {
	/// Create a new unauthenticated context.
	pub fn unauthenticated() -> Self {
		Self {
			state: SessionState::new(),
		}
	}

	/// Create a context for a restored session.
	pub fn authenticated(session: Session) -> Self {
		Self {
			state: SessionState::restored(session),
		}
	}

	/// Whether a session is active.
	pub fn is_authenticated(&self) -> bool {
		self.state.is_authenticated()
	}

	/// The active session, if any.
	pub fn session(&self) -> Option<&Session> {
		self.state.current()
	}

	/// The active role, if any.
	pub fn role(&self) -> Option<Role> {
		self.state.role()
	}

	/// Check a permission against the active session.
	pub fn check_permission(&self, permission: Permission) -> bool {
		self.state.check_permission(permission)
	}

	/// Require authentication, returning the session or an error.
	pub fn require_session(&self) -> Result<&Session, AuthRequired> {
		self.state.current().ok_or(AuthRequired)
	}
}

/// Error returned when authentication is required but not present.
#[derive(Debug, Clone, Copy)]
pub struct AuthRequired;

impl std::fmt::Display for AuthRequired {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "authentication required")
	}
}

impl std::error::Error for AuthRequired {}

/// Configuration for authentication middleware.
#[derive(Debug, Clone)]
pub struct AuthConfig {
	/// Enable dev mode (bypass authentication when FOLIO_SERVER_AUTH_DEV_MODE=1).
	pub dev_mode: bool,
	/// Name of the session cookie.
	pub session_cookie_name: String,
	/// Disable new user signups (existing users can still log in).
	pub signups_disabled: bool,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			dev_mode: false,
			session_cookie_name: SESSION_COOKIE_NAME.to_string(),
			signups_disabled: false,
		}
	}
}

impl AuthConfig {
	/// Create a new AuthConfig with default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create AuthConfig from environment variables.
	///
	/// # Panics
	///
	/// Panics if both `FOLIO_SERVER_AUTH_DEV_MODE=1` and
	/// `FOLIO_SERVER_ENV=production` are set; dev mode must never be enabled
	/// in production environments.
	pub fn from_env() -> Self {
		let dev_mode = std::env::var(DEV_MODE_ENV_VAR)
			.map(|v| v == "1" || v.to_lowercase() == "true")
			.unwrap_or(false);

		let folio_env = std::env::var(FOLIO_ENV_VAR).unwrap_or_default();

		if dev_mode && folio_env.to_lowercase() == "production" {
			panic!(
				"FATAL: FOLIO_SERVER_AUTH_DEV_MODE=1 is set while FOLIO_SERVER_ENV=production. \
				 Dev mode authentication bypass MUST NOT be enabled in production. \
				 Remove FOLIO_SERVER_AUTH_DEV_MODE or set FOLIO_SERVER_ENV to a non-production value."
			);
		}

		Self {
			dev_mode,
			..Default::default()
		}
	}

	/// Set dev mode.
	pub fn with_dev_mode(mut self, enabled: bool) -> Self {
		self.dev_mode = enabled;
		self
	}

	/// Set the session cookie name.
	pub fn with_session_cookie_name(mut self, name: impl Into<String>) -> Self {
		self.session_cookie_name = name.into();
		self
	}

	/// Set signups disabled.
	pub fn with_signups_disabled(mut self, disabled: bool) -> Self {
		self.signups_disabled = disabled;
		self
	}
}

/// Extract the session token from the Cookie header.
pub fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
	extract_session_cookie_with_name(headers, SESSION_COOKIE_NAME)
}

/// Extract the session token from the Cookie header with a custom cookie name.
pub fn extract_session_cookie_with_name(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	headers
		.get(COOKIE)?
		.to_str()
		.ok()?
		.split(';')
		.find_map(|cookie| {
			let cookie = cookie.trim();
			let (name, value) = cookie.split_once('=')?;

			if name == cookie_name {
				Some(value.to_string())
			} else {
				None
			}
		})
}

/// Extract a bearer token from the Authorization header.
///
/// Expects the format: `Authorization: Bearer <token>`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth_header = headers.get(AUTHORIZATION)?;
	let auth_str = auth_header.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(|token| token.to_string())
}

/// Extract the session token from either the cookie or the bearer header,
/// cookie taking precedence.
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	extract_session_cookie_with_name(headers, cookie_name)
		.or_else(|| extract_bearer_token(headers))
}
