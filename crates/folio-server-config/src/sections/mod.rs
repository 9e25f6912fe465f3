// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections, one per concern.

pub mod auth;
pub mod database;
pub mod http;
pub mod logging;
pub mod media;

pub use auth::{AuthConfig, AuthConfigLayer};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use media::{MediaConfig, MediaConfigLayer};
