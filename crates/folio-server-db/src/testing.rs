// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::SqlitePool;

use crate::migrations::run_migrations;

pub async fn create_test_pool() -> SqlitePool {
	SqlitePool::connect(":memory:").await.unwrap()
}

/// In-memory pool with the full schema applied.
pub async fn create_migrated_test_pool() -> SqlitePool {
	let pool = create_test_pool().await;
	run_migrations(&pool).await.unwrap();
	pool
}
