// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication and role-based authorization for Folio.
//!
//! This crate contains the authorization core of the publishing platform:
//!
//! - [`types`] - ID newtypes and the [`Role`] enumeration
//! - [`permissions`] - the static role → permission table and lookups
//! - [`session`] - session records, the single-slot [`SessionState`], and
//!   the pure [`check_permission`] function
//! - [`password`] - Argon2id password hashing
//! - [`middleware`] - request-credential extraction and [`AuthConfig`]
//! - [`user`] - the [`Profile`] entity
//!
//! Authorization decisions never perform I/O: session restoration happens
//! once per request in the server's middleware, and every later check is a
//! synchronous lookup against the static table.

pub mod middleware;
pub mod password;
pub mod permissions;
pub mod session;
pub mod types;
pub mod user;

pub use middleware::{AuthConfig, AuthContext, AuthRequired, SESSION_COOKIE_NAME};
pub use password::{hash_password, verify_password};
pub use permissions::{permissions_for, role_grants, Permission};
pub use session::{
	check_permission, generate_token, hash_token, is_session_token, Session, SessionState,
	SESSION_TOKEN_PREFIX,
};
pub use types::{BookId, PostId, Role, SessionId, SubscriberId, UserId};
pub use user::Profile;
