// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Media storage configuration.

use serde::Deserialize;

const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Media configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct MediaConfig {
	/// Directory uploaded files are written to.
	pub dir: String,
	/// URL prefix uploaded files are served under.
	pub public_base_url: String,
	pub max_upload_bytes: u64,
}

impl Default for MediaConfig {
	fn default() -> Self {
		Self {
			dir: "./media".to_string(),
			public_base_url: "/media".to_string(),
			max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
		}
	}
}

/// Media configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaConfigLayer {
	#[serde(default)]
	pub dir: Option<String>,
	#[serde(default)]
	pub public_base_url: Option<String>,
	#[serde(default)]
	pub max_upload_bytes: Option<u64>,
}

impl MediaConfigLayer {
	pub fn merge(&mut self, other: MediaConfigLayer) {
		if other.dir.is_some() {
			self.dir = other.dir;
		}
		if other.public_base_url.is_some() {
			self.public_base_url = other.public_base_url;
		}
		if other.max_upload_bytes.is_some() {
			self.max_upload_bytes = other.max_upload_bytes;
		}
	}

	pub fn finalize(self) -> MediaConfig {
		let defaults = MediaConfig::default();
		MediaConfig {
			dir: self.dir.unwrap_or(defaults.dir),
			public_base_url: self.public_base_url.unwrap_or(defaults.public_base_url),
			max_upload_bytes: self.max_upload_bytes.unwrap_or(defaults.max_upload_bytes),
		}
	}
}
