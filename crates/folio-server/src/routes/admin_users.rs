// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! User administration HTTP handlers, guarded by the settings permission.
//!
//! Role changes and account deletion both revoke the affected user's
//! sessions so stale permissions cannot outlive the change.

use axum::{
	extract::{Path, State},
	response::IntoResponse,
	Json,
};
use folio_server_auth::Role;
use folio_server_db::{DbError, ProfileStore, SessionStore};
use serde::Deserialize;

use crate::{
	api::AppState,
	api_response::{bad_request, internal_error, not_found},
	auth_middleware::RequireAuth,
	validation::parse_user_id,
};

#[derive(Debug, Deserialize)]
pub struct RoleChange {
	pub role: String,
}

/// GET /api/admin/users - List all accounts.
pub async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
	match state.profile_repo.list_profiles().await {
		Ok(profiles) => Json(profiles).into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list users");
			internal_error("Failed to list users").into_response()
		}
	}
}

/// PATCH /api/admin/users/{id}/role - Change an account's role.
///
/// The user's existing sessions are revoked; they sign in again under the
/// new role.
pub async fn update_user_role(
	State(state): State<AppState>,
	RequireAuth(session): RequireAuth,
	Path(id): Path<String>,
	Json(change): Json<RoleChange>,
) -> impl IntoResponse {
	let id = match parse_user_id(&id, "Invalid user ID") {
		Ok(id) => id,
		Err(e) => return bad_request(e.error, e.message).into_response(),
	};

	let Some(role) = Role::parse(&change.role) else {
		return bad_request("invalid_role", format!("Unknown role: {}", change.role))
			.into_response();
	};

	if let Err(e) = state.profile_repo.update_role(&id, role).await {
		return match e {
			DbError::NotFound(_) => not_found("User not found").into_response(),
			e => {
				tracing::error!(error = %e, user_id = %id, "failed to update role");
				internal_error("Failed to update role").into_response()
			}
		};
	}

	if let Err(e) = state.session_repo.delete_for_user(&id).await {
		tracing::error!(error = %e, user_id = %id, "failed to revoke sessions after role change");
		return internal_error("Failed to update role").into_response();
	}

	tracing::info!(
		user_id = %id,
		role = %role.as_str(),
		changed_by = %session.user_id,
		"user role changed"
	);

	Json(serde_json::json!({"role": role.as_str()})).into_response()
}

/// DELETE /api/admin/users/{id} - Remove an account.
///
/// Sessions go with the profile via the foreign key cascade; content
/// authored by the user stays, with its ownership cleared.
pub async fn delete_user(
	State(state): State<AppState>,
	RequireAuth(session): RequireAuth,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let id = match parse_user_id(&id, "Invalid user ID") {
		Ok(id) => id,
		Err(e) => return bad_request(e.error, e.message).into_response(),
	};

	if id == session.user_id {
		return bad_request("self_delete", "You cannot delete your own account")
			.into_response();
	}

	match state.profile_repo.delete_profile(&id).await {
		Ok(true) => {
			tracing::info!(user_id = %id, deleted_by = %session.user_id, "user deleted");
			Json(serde_json::json!({"message": "User deleted"})).into_response()
		}
		Ok(false) => not_found("User not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, user_id = %id, "failed to delete user");
			internal_error("Failed to delete user").into_response()
		}
	}
}
