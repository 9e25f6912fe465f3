// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Profile repository for database operations.
//!
//! Profiles are the user records behind authentication: identity, role, and
//! the password hash (which never leaves this module's return values except
//! through [`ProfileRepository::get_credentials`]).

use async_trait::async_trait;
use chrono::Utc;
use folio_server_auth::{Profile, Role, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::types::{parse_timestamp, parse_uuid};

#[async_trait]
pub trait ProfileStore: Send + Sync {
	async fn create_profile(&self, profile: &Profile, password_hash: &str) -> Result<(), DbError>;
	async fn get_profile_by_id(&self, id: &UserId) -> Result<Option<Profile>, DbError>;
	async fn get_credentials(&self, email: &str) -> Result<Option<(Profile, String)>, DbError>;
	async fn list_profiles(&self) -> Result<Vec<Profile>, DbError>;
	async fn update_role(&self, id: &UserId, role: Role) -> Result<(), DbError>;
	async fn delete_profile(&self, id: &UserId) -> Result<bool, DbError>;
}

/// Repository for user profile database operations.
#[derive(Clone)]
pub struct ProfileRepository {
	pool: SqlitePool,
}

impl ProfileRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	fn row_to_profile(row: &sqlx::sqlite::SqliteRow) -> Result<Profile, DbError> {
		let id: String = row.get("id");
		let role_tag: String = row.get("role");
		let created_at: String = row.get("created_at");
		let updated_at: String = row.get("updated_at");

		// A row with an unparseable role is corrupt; the caller decides
		// whether to drop it or fail. Here it is a hard error because
		// profiles are only written through Role::as_str.
		let role = Role::parse(&role_tag)
			.ok_or_else(|| DbError::Internal(format!("unknown role tag: {role_tag}")))?;

		Ok(Profile {
			id: UserId::new(parse_uuid(&id, "profiles.id")?),
			full_name: row.get("full_name"),
			email: row.get("email"),
			role,
			avatar_url: row.get("avatar_url"),
			created_at: parse_timestamp(&created_at, "profiles.created_at")?,
			updated_at: parse_timestamp(&updated_at, "profiles.updated_at")?,
		})
	}
}

#[async_trait]
impl ProfileStore for ProfileRepository {
	/// Create a new profile.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the email is already registered.
	#[tracing::instrument(skip(self, profile, password_hash), fields(user_id = %profile.id))]
	async fn create_profile(&self, profile: &Profile, password_hash: &str) -> Result<(), DbError> {
		let result = sqlx::query(
			r#"
			INSERT INTO profiles (id, full_name, email, password_hash, role, avatar_url, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(profile.id.to_string())
		.bind(&profile.full_name)
		.bind(&profile.email)
		.bind(password_hash)
		.bind(profile.role.as_str())
		.bind(&profile.avatar_url)
		.bind(profile.created_at.to_rfc3339())
		.bind(profile.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await;

		match result {
			Ok(_) => {
				tracing::debug!(user_id = %profile.id, "profile created");
				Ok(())
			}
			Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
				Err(DbError::Conflict(db.message().to_string()))
			}
			Err(e) => Err(e.into()),
		}
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	async fn get_profile_by_id(&self, id: &UserId) -> Result<Option<Profile>, DbError> {
		let row = sqlx::query("SELECT * FROM profiles WHERE id = ?")
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(Self::row_to_profile).transpose()
	}

	/// Fetch a profile and its password hash by email, for sign-in.
	#[tracing::instrument(skip_all)]
	async fn get_credentials(&self, email: &str) -> Result<Option<(Profile, String)>, DbError> {
		let row = sqlx::query("SELECT * FROM profiles WHERE email = ?")
			.bind(email)
			.fetch_optional(&self.pool)
			.await?;

		match row {
			Some(row) => {
				let profile = Self::row_to_profile(&row)?;
				let password_hash: String = row.get("password_hash");
				Ok(Some((profile, password_hash)))
			}
			None => Ok(None),
		}
	}

	#[tracing::instrument(skip(self))]
	async fn list_profiles(&self) -> Result<Vec<Profile>, DbError> {
		let rows = sqlx::query("SELECT * FROM profiles ORDER BY created_at ASC")
			.fetch_all(&self.pool)
			.await?;

		rows.iter().map(Self::row_to_profile).collect()
	}

	#[tracing::instrument(skip(self), fields(user_id = %id, role = %role))]
	async fn update_role(&self, id: &UserId, role: Role) -> Result<(), DbError> {
		let result = sqlx::query("UPDATE profiles SET role = ?, updated_at = ? WHERE id = ?")
			.bind(role.as_str())
			.bind(Utc::now().to_rfc3339())
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("profile {id}")));
		}
		tracing::debug!(user_id = %id, "role updated");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	async fn delete_profile(&self, id: &UserId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM profiles WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::migrations::run_migrations;
	use crate::testing::create_test_pool;

	async fn setup() -> ProfileRepository {
		let pool = create_test_pool().await;
		run_migrations(&pool).await.unwrap();
		ProfileRepository::new(pool)
	}

	#[tokio::test]
	async fn create_and_fetch_profile() {
		let repo = setup().await;
		let profile = Profile::new("Ana Editora", "ana@example.com", Role::ContentAdmin);
		repo.create_profile(&profile, "hash").await.unwrap();

		let fetched = repo.get_profile_by_id(&profile.id).await.unwrap().unwrap();
		assert_eq!(fetched.email, "ana@example.com");
		assert_eq!(fetched.role, Role::ContentAdmin);
	}

	#[tokio::test]
	async fn duplicate_email_is_conflict() {
		let repo = setup().await;
		let a = Profile::new("Ana", "dup@example.com", Role::Collaborator);
		let b = Profile::new("Bea", "dup@example.com", Role::Collaborator);
		repo.create_profile(&a, "hash").await.unwrap();

		let err = repo.create_profile(&b, "hash").await.unwrap_err();
		assert!(err.is_conflict(), "expected conflict, got: {err}");
	}

	#[tokio::test]
	async fn get_credentials_returns_hash() {
		let repo = setup().await;
		let profile = Profile::new("Ana", "ana@example.com", Role::GlobalAdmin);
		repo.create_profile(&profile, "the-hash").await.unwrap();

		let (fetched, hash) = repo.get_credentials("ana@example.com").await.unwrap().unwrap();
		assert_eq!(fetched.id, profile.id);
		assert_eq!(hash, "the-hash");

		assert!(repo.get_credentials("nobody@example.com").await.unwrap().is_none());
	}

	#[tokio::test]
	async fn update_role_persists() {
		let repo = setup().await;
		let profile = Profile::new("Ana", "ana@example.com", Role::Collaborator);
		repo.create_profile(&profile, "hash").await.unwrap();

		repo.update_role(&profile.id, Role::ContentAdmin).await.unwrap();
		let fetched = repo.get_profile_by_id(&profile.id).await.unwrap().unwrap();
		assert_eq!(fetched.role, Role::ContentAdmin);
	}

	#[tokio::test]
	async fn update_role_of_missing_profile_is_not_found() {
		let repo = setup().await;
		let err = repo
			.update_role(&UserId::generate(), Role::Collaborator)
			.await
			.unwrap_err();
		assert!(matches!(err, DbError::NotFound(_)));
	}

	#[tokio::test]
	async fn delete_profile_reports_whether_it_existed() {
		let repo = setup().await;
		let profile = Profile::new("Ana", "ana@example.com", Role::Collaborator);
		repo.create_profile(&profile, "hash").await.unwrap();

		assert!(repo.delete_profile(&profile.id).await.unwrap());
		assert!(!repo.delete_profile(&profile.id).await.unwrap());
	}
}
