// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication and session configuration.

use serde::Deserialize;

/// Auth configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct AuthConfig {
	/// Bypass authentication entirely. Refused in production.
	pub dev_mode: bool,
	/// Deployment environment name ("development", "staging", "production").
	pub environment: String,
	/// Lifetime of a newly issued session.
	pub session_ttl_hours: u32,
	/// Upper bound on a single session-restore lookup before the request is
	/// treated as unauthenticated.
	pub restore_timeout_ms: u64,
	/// How often the background sweep deletes expired sessions.
	pub session_cleanup_interval_secs: u64,
	/// When set, the register endpoint refuses new accounts.
	pub signups_disabled: bool,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			dev_mode: false,
			environment: "development".to_string(),
			session_ttl_hours: 720,
			restore_timeout_ms: 3000,
			session_cleanup_interval_secs: 3600,
			signups_disabled: false,
		}
	}
}

/// Auth configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub dev_mode: Option<bool>,
	#[serde(default)]
	pub environment: Option<String>,
	#[serde(default)]
	pub session_ttl_hours: Option<u32>,
	#[serde(default)]
	pub restore_timeout_ms: Option<u64>,
	#[serde(default)]
	pub session_cleanup_interval_secs: Option<u64>,
	#[serde(default)]
	pub signups_disabled: Option<bool>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.dev_mode.is_some() {
			self.dev_mode = other.dev_mode;
		}
		if other.environment.is_some() {
			self.environment = other.environment;
		}
		if other.session_ttl_hours.is_some() {
			self.session_ttl_hours = other.session_ttl_hours;
		}
		if other.restore_timeout_ms.is_some() {
			self.restore_timeout_ms = other.restore_timeout_ms;
		}
		if other.session_cleanup_interval_secs.is_some() {
			self.session_cleanup_interval_secs = other.session_cleanup_interval_secs;
		}
		if other.signups_disabled.is_some() {
			self.signups_disabled = other.signups_disabled;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		let defaults = AuthConfig::default();
		AuthConfig {
			dev_mode: self.dev_mode.unwrap_or(defaults.dev_mode),
			environment: self.environment.unwrap_or(defaults.environment),
			session_ttl_hours: self.session_ttl_hours.unwrap_or(defaults.session_ttl_hours),
			restore_timeout_ms: self.restore_timeout_ms.unwrap_or(defaults.restore_timeout_ms),
			session_cleanup_interval_secs: self
				.session_cleanup_interval_secs
				.unwrap_or(defaults.session_cleanup_interval_secs),
			signups_disabled: self.signups_disabled.unwrap_or(defaults.signups_disabled),
		}
	}
}
