// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the folio server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`FOLIO_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use folio_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}:{}", config.http.host, config.http.port);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub auth: AuthConfig,
	pub media: MediaConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`FOLIO_SERVER_*`)
/// 2. Config file (`/etc/folio/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize();
	let media = layer.media.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&auth)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		media_dir = %media.dir,
		signups_disabled = auth.signups_disabled,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		auth,
		media,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(auth: &AuthConfig) -> Result<(), ConfigError> {
	if auth.dev_mode && auth.environment == "production" {
		return Err(ConfigError::Validation(
			"FOLIO_SERVER_AUTH_DEV_MODE=1 is set while FOLIO_SERVER_ENV=production. \
			 This is a security risk. Remove FOLIO_SERVER_AUTH_DEV_MODE or set FOLIO_SERVER_ENV \
			 to a non-production value."
				.to_string(),
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_dev_mode_production_validation() {
		let auth = AuthConfig {
			dev_mode: true,
			environment: "production".to_string(),
			..Default::default()
		};
		let result = validate_config(&auth);
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("security risk"));
	}

	#[test]
	fn test_dev_mode_development_ok() {
		let auth = AuthConfig {
			dev_mode: true,
			environment: "development".to_string(),
			..Default::default()
		};
		assert!(validate_config(&auth).is_ok());
	}

	#[test]
	fn test_socket_addr() {
		let config = ServerConfig {
			http: HttpConfig {
				host: "127.0.0.1".to_string(),
				port: 9000,
				base_url: "http://localhost:9000".to_string(),
			},
			..Default::default()
		};
		assert_eq!(config.socket_addr(), "127.0.0.1:9000");
	}

	#[test]
	fn test_config_file_overrides_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("server.toml");
		std::fs::write(&path, "[http]\nport = 4242\n").unwrap();

		let config = load_config_with_file(&path).unwrap();
		assert_eq!(config.http.port, 4242);
		assert_eq!(config.http.host, "127.0.0.1");
	}
}
