// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session repository: the durable slot behind session restoration.
//!
//! Sessions are addressed by the SHA-256 hash of an opaque bearer token.
//! Restoration is fail-safe: an expired or corrupt row yields "no session"
//! and the remnant is deleted, never an error to the caller's sign-in state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_server_auth::{Role, Session, SessionId, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::types::{parse_timestamp, parse_uuid};

#[async_trait]
pub trait SessionStore: Send + Sync {
	async fn create_session(&self, session: &Session, token_hash: &str) -> Result<(), DbError>;
	async fn restore_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, DbError>;
	async fn delete_by_token_hash(&self, token_hash: &str) -> Result<bool, DbError>;
	async fn delete_for_user(&self, user_id: &UserId) -> Result<u64, DbError>;
	async fn delete_expired(&self) -> Result<u64, DbError>;
}

/// Repository for session database operations.
#[derive(Clone)]
pub struct SessionRepository {
	pool: SqlitePool,
}

impl SessionRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	async fn delete_by_id(&self, id: &str) -> Result<(), DbError> {
		sqlx::query("DELETE FROM sessions WHERE id = ?")
			.bind(id)
			.execute(&self.pool)
			.await?;
		Ok(())
	}
}

#[async_trait]
impl SessionStore for SessionRepository {
	/// Persist a new session row keyed by token hash.
	#[tracing::instrument(skip(self, session, token_hash), fields(session_id = %session.id, user_id = %session.user_id))]
	async fn create_session(&self, session: &Session, token_hash: &str) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO sessions (id, user_id, token_hash, created_at, expires_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(session.id.to_string())
		.bind(session.user_id.to_string())
		.bind(token_hash)
		.bind(Utc::now().to_rfc3339())
		.bind(session.expires_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(session_id = %session.id, "session created");
		Ok(())
	}

	/// Restore a session from its token hash.
	///
	/// Returns `None` (and deletes the row) when the session is expired or
	/// the joined profile row carries data that no longer parses - a corrupt
	/// remnant must not become a live session.
	#[tracing::instrument(skip_all)]
	async fn restore_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT s.id AS session_id, s.expires_at, p.id AS user_id, p.full_name,
			       p.email, p.role, p.avatar_url
			FROM sessions s
			JOIN profiles p ON p.id = s.user_id
			WHERE s.token_hash = ?
			"#,
		)
		.bind(token_hash)
		.fetch_optional(&self.pool)
		.await?;

		let Some(row) = row else {
			return Ok(None);
		};

		let session_id: String = row.get("session_id");
		let expires_at: String = row.get("expires_at");
		let user_id: String = row.get("user_id");
		let role_tag: String = row.get("role");

		let parsed = (|| -> Result<Session, DbError> {
			let role = Role::parse(&role_tag)
				.ok_or_else(|| DbError::Internal(format!("unknown role tag: {role_tag}")))?;
			Ok(Session {
				id: SessionId::new(parse_uuid(&session_id, "sessions.id")?),
				user_id: UserId::new(parse_uuid(&user_id, "sessions.user_id")?),
				display_name: row.get("full_name"),
				email: row.get("email"),
				role,
				avatar_url: row.get("avatar_url"),
				expires_at: parse_timestamp(&expires_at, "sessions.expires_at")?,
			})
		})();

		let session = match parsed {
			Ok(session) => session,
			Err(e) => {
				tracing::warn!(session_id = %session_id, error = %e, "corrupt session row, clearing");
				self.delete_by_id(&session_id).await?;
				return Ok(None);
			}
		};

		if session.is_expired(Utc::now()) {
			tracing::debug!(session_id = %session.id, "session expired, clearing");
			self.delete_by_id(&session_id).await?;
			return Ok(None);
		}

		Ok(Some(session))
	}

	#[tracing::instrument(skip_all)]
	async fn delete_by_token_hash(&self, token_hash: &str) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
			.bind(token_hash)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	async fn delete_for_user(&self, user_id: &UserId) -> Result<u64, DbError> {
		let result = sqlx::query("DELETE FROM sessions WHERE user_id = ?")
			.bind(user_id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected())
	}

	/// Delete every session past its expiry. Returns the number removed.
	#[tracing::instrument(skip(self))]
	async fn delete_expired(&self) -> Result<u64, DbError> {
		let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
			.bind(Utc::now().to_rfc3339())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() > 0 {
			tracing::debug!(count = result.rows_affected(), "expired sessions removed");
		}
		Ok(result.rows_affected())
	}
}

/// Build a [`Session`] for a freshly signed-in profile.
pub fn session_for_profile(
	profile: &folio_server_auth::Profile,
	expires_at: DateTime<Utc>,
) -> Session {
	Session {
		id: SessionId::generate(),
		user_id: profile.id,
		display_name: profile.full_name.clone(),
		email: profile.email.clone(),
		role: profile.role,
		avatar_url: profile.avatar_url.clone(),
		expires_at,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::migrations::run_migrations;
	use crate::profile::{ProfileRepository, ProfileStore};
	use crate::testing::create_test_pool;
	use chrono::Duration;
	use folio_server_auth::{hash_token, Profile};

	async fn setup() -> (SessionRepository, ProfileRepository, Profile) {
		let pool = create_test_pool().await;
		run_migrations(&pool).await.unwrap();
		let profiles = ProfileRepository::new(pool.clone());
		let profile = Profile::new("Ana Editora", "ana@example.com", Role::ContentAdmin);
		profiles.create_profile(&profile, "hash").await.unwrap();
		(SessionRepository::new(pool), profiles, profile)
	}

	#[tokio::test]
	async fn create_and_restore_session() {
		let (sessions, _, profile) = setup().await;
		let session = session_for_profile(&profile, Utc::now() + Duration::hours(1));
		let token_hash = hash_token("fs_test_token");
		sessions.create_session(&session, &token_hash).await.unwrap();

		let restored = sessions.restore_by_token_hash(&token_hash).await.unwrap().unwrap();
		assert_eq!(restored.id, session.id);
		assert_eq!(restored.role, Role::ContentAdmin);
		assert_eq!(restored.email, "ana@example.com");
	}

	#[tokio::test]
	async fn unknown_token_restores_nothing() {
		let (sessions, _, _) = setup().await;
		let restored = sessions
			.restore_by_token_hash(&hash_token("fs_never_issued"))
			.await
			.unwrap();
		assert!(restored.is_none());
	}

	#[tokio::test]
	async fn expired_session_restores_nothing_and_is_cleared() {
		let (sessions, _, profile) = setup().await;
		let session = session_for_profile(&profile, Utc::now() - Duration::seconds(1));
		let token_hash = hash_token("fs_expired");
		sessions.create_session(&session, &token_hash).await.unwrap();

		assert!(sessions.restore_by_token_hash(&token_hash).await.unwrap().is_none());
		// Row was deleted, so a second restore also finds nothing.
		assert!(sessions.restore_by_token_hash(&token_hash).await.unwrap().is_none());
		assert!(!sessions.delete_by_token_hash(&token_hash).await.unwrap());
	}

	#[tokio::test]
	async fn corrupt_role_restores_nothing_and_is_cleared() {
		let (sessions, _, profile) = setup().await;
		let session = session_for_profile(&profile, Utc::now() + Duration::hours(1));
		let token_hash = hash_token("fs_corrupt");
		sessions.create_session(&session, &token_hash).await.unwrap();

		// Corrupt the persisted role behind the repository's back.
		sqlx::query("UPDATE profiles SET role = 'SUPERUSER' WHERE id = ?")
			.bind(profile.id.to_string())
			.execute(&sessions.pool)
			.await
			.unwrap();

		let restored = sessions.restore_by_token_hash(&token_hash).await.unwrap();
		assert!(restored.is_none());
		assert!(!sessions.delete_by_token_hash(&token_hash).await.unwrap());
	}

	#[tokio::test]
	async fn logout_deletes_by_token_hash() {
		let (sessions, _, profile) = setup().await;
		let session = session_for_profile(&profile, Utc::now() + Duration::hours(1));
		let token_hash = hash_token("fs_logout");
		sessions.create_session(&session, &token_hash).await.unwrap();

		assert!(sessions.delete_by_token_hash(&token_hash).await.unwrap());
		assert!(sessions.restore_by_token_hash(&token_hash).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn delete_expired_sweeps_only_stale_rows() {
		let (sessions, _, profile) = setup().await;
		let live = session_for_profile(&profile, Utc::now() + Duration::hours(1));
		let stale = session_for_profile(&profile, Utc::now() - Duration::hours(1));
		sessions.create_session(&live, &hash_token("fs_live")).await.unwrap();
		sessions.create_session(&stale, &hash_token("fs_stale")).await.unwrap();

		assert_eq!(sessions.delete_expired().await.unwrap(), 1);
		assert!(sessions
			.restore_by_token_hash(&hash_token("fs_live"))
			.await
			.unwrap()
			.is_some());
	}
}
