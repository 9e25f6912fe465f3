// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database schema migrations.
//!
//! Idempotent `CREATE TABLE IF NOT EXISTS` statements applied on startup.
//! All IDs are UUIDs stored as text; all timestamps are RFC 3339 text.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

/// Apply the full schema to the given pool.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS profiles (
			id TEXT PRIMARY KEY,
			full_name TEXT NOT NULL,
			email TEXT NOT NULL UNIQUE,
			password_hash TEXT NOT NULL,
			role TEXT NOT NULL,
			avatar_url TEXT,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS sessions (
			id TEXT PRIMARY KEY,
			user_id TEXT NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
			token_hash TEXT NOT NULL UNIQUE,
			created_at TEXT NOT NULL,
			expires_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS books (
			id TEXT PRIMARY KEY,
			title TEXT NOT NULL,
			subtitle TEXT,
			author TEXT NOT NULL,
			category TEXT NOT NULL,
			year INTEGER NOT NULL,
			isbn TEXT,
			pages INTEGER,
			price REAL,
			description TEXT,
			cover_url TEXT,
			pdf_url TEXT,
			affiliate_links TEXT,
			is_digital_only INTEGER NOT NULL DEFAULT 0,
			status TEXT NOT NULL DEFAULT 'draft',
			created_by TEXT REFERENCES profiles(id) ON DELETE SET NULL,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS posts (
			id TEXT PRIMARY KEY,
			title TEXT NOT NULL,
			slug TEXT NOT NULL UNIQUE,
			excerpt TEXT,
			content TEXT,
			category TEXT,
			cover_image TEXT,
			status TEXT NOT NULL DEFAULT 'draft',
			author_id TEXT REFERENCES profiles(id) ON DELETE SET NULL,
			published_at TEXT,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS subscribers (
			id TEXT PRIMARY KEY,
			email TEXT NOT NULL UNIQUE,
			created_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at)")
		.execute(pool)
		.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_status ON books(status)")
		.execute(pool)
		.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_status ON posts(status)")
		.execute(pool)
		.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_author ON posts(author_id)")
		.execute(pool)
		.await?;

	tracing::debug!("migrations applied");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;

	#[tokio::test]
	async fn migrations_are_idempotent() {
		let pool = create_test_pool().await;
		run_migrations(&pool).await.unwrap();
		run_migrations(&pool).await.unwrap();
	}
}
