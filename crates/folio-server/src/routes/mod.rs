// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP route handlers, grouped by surface.

pub mod admin_books;
pub mod admin_posts;
pub mod admin_users;
pub mod auth;
pub mod books;
pub mod docs;
pub mod health;
pub mod media;
pub mod newsletter;
pub mod posts;
