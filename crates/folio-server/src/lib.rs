// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Folio publishing server.
//!
//! This crate provides the HTTP server for the Folio publishing house: a
//! public catalogue and blog backed by SQLite, plus a role-gated admin API
//! for managing books, posts, users, media, and newsletter subscribers.

pub mod api;
pub mod api_response;
pub mod auth_middleware;
pub mod error;
pub mod guard;
pub mod jobs;
pub mod routes;
pub mod validation;
pub mod version;

pub use api::{create_app_state, create_router, AppState};
pub use error::ServerError;
pub use folio_server_config::ServerConfig;
pub use routes::docs::ApiDoc;
