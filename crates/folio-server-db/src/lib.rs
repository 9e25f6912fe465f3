// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Persistence layer for the folio server.
//!
//! SQLite via sqlx, with one repository per aggregate:
//!
//! - [`ProfileRepository`]: user accounts, credentials, and roles
//! - [`SessionRepository`]: durable sessions keyed by token hash
//! - [`BookRepository`]: the catalogue
//! - [`PostRepository`]: the blog
//! - [`SubscriberRepository`]: newsletter subscriptions
//!
//! Conventions: UUIDs and RFC 3339 timestamps are stored as text, schema is
//! applied idempotently on startup via [`run_migrations`], and every
//! repository is also reachable through its `*Store` trait for test doubles.

pub mod book;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod post;
pub mod profile;
pub mod session;
pub mod subscriber;
pub mod testing;
pub mod types;

pub use book::{Book, BookDraft, BookFilter, BookRepository, BookStore};
pub use error::{DbError, Result};
pub use migrations::run_migrations;
pub use pool::create_pool;
pub use post::{Post, PostDraft, PostRepository, PostStore};
pub use profile::{ProfileRepository, ProfileStore};
pub use session::{session_for_profile, SessionRepository, SessionStore};
pub use subscriber::{Subscriber, SubscriberRepository, SubscriberStore};
pub use types::ContentStatus;
