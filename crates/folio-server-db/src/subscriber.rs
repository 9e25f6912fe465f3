// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Newsletter subscriber repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_server_auth::SubscriberId;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::types::{parse_timestamp, parse_uuid};

/// A newsletter subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
	pub id: SubscriberId,
	pub email: String,
	pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait SubscriberStore: Send + Sync {
	async fn create_subscriber(&self, email: &str) -> Result<Subscriber, DbError>;
	async fn list_subscribers(&self) -> Result<Vec<Subscriber>, DbError>;
	async fn delete_subscriber(&self, id: &SubscriberId) -> Result<bool, DbError>;
}

/// Repository for subscriber database operations.
#[derive(Clone)]
pub struct SubscriberRepository {
	pool: SqlitePool,
}

impl SubscriberRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	fn row_to_subscriber(row: &sqlx::sqlite::SqliteRow) -> Result<Subscriber, DbError> {
		let id: String = row.get("id");
		let created_at: String = row.get("created_at");

		Ok(Subscriber {
			id: SubscriberId::new(parse_uuid(&id, "subscribers.id")?),
			email: row.get("email"),
			created_at: parse_timestamp(&created_at, "subscribers.created_at")?,
		})
	}
}

#[async_trait]
impl SubscriberStore for SubscriberRepository {
	/// Record a subscription.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the email is already subscribed.
	#[tracing::instrument(skip_all)]
	async fn create_subscriber(&self, email: &str) -> Result<Subscriber, DbError> {
		let id = SubscriberId::generate();
		let now = Utc::now();

		let result = sqlx::query("INSERT INTO subscribers (id, email, created_at) VALUES (?, ?, ?)")
			.bind(id.to_string())
			.bind(email)
			.bind(now.to_rfc3339())
			.execute(&self.pool)
			.await;

		match result {
			Ok(_) => Ok(Subscriber { id, email: email.to_string(), created_at: now }),
			Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
				Err(DbError::Conflict("email already subscribed".to_string()))
			}
			Err(e) => Err(e.into()),
		}
	}

	#[tracing::instrument(skip(self))]
	async fn list_subscribers(&self) -> Result<Vec<Subscriber>, DbError> {
		let rows = sqlx::query("SELECT * FROM subscribers ORDER BY created_at DESC")
			.fetch_all(&self.pool)
			.await?;

		rows.iter().map(Self::row_to_subscriber).collect()
	}

	#[tracing::instrument(skip(self), fields(subscriber_id = %id))]
	async fn delete_subscriber(&self, id: &SubscriberId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM subscribers WHERE id = ?")
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

	async fn setup() -> SubscriberRepository {
		let pool = create_test_pool().await;
		run_migrations(&pool).await.unwrap();
		SubscriberRepository::new(pool)
	}

	#[tokio::test]
	async fn subscribe_and_list() {
		let repo = setup().await;
		repo.create_subscriber("reader@example.com").await.unwrap();

		let listed = repo.list_subscribers().await.unwrap();
		assert_eq!(listed.len(), 1);
		assert_eq!(listed[0].email, "reader@example.com");
	}

	#[tokio::test]
	async fn duplicate_subscription_is_conflict() {
		let repo = setup().await;
		repo.create_subscriber("reader@example.com").await.unwrap();

		let err = repo.create_subscriber("reader@example.com").await.unwrap_err();
		assert!(err.is_conflict());
	}

	#[tokio::test]
	async fn unsubscribe_removes_row() {
		let repo = setup().await;
		let sub = repo.create_subscriber("reader@example.com").await.unwrap();

		assert!(repo.delete_subscriber(&sub.id).await.unwrap());
		assert!(repo.list_subscribers().await.unwrap().is_empty());
	}
}
