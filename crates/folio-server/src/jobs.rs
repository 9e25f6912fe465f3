// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Background maintenance tasks.
//!
//! The only task today is the session sweep. Expired sessions are already
//! unusable (restore refuses them) so the sweep is pure housekeeping and
//! safe to run at any cadence.

use std::time::Duration;

use folio_server_db::{SessionRepository, SessionStore};

/// Spawn the periodic expired-session sweep.
///
/// Runs for the lifetime of the process. Errors are logged and the next
/// tick tries again.
pub fn spawn_session_cleanup(
	session_repo: SessionRepository,
	interval_secs: u64,
) -> tokio::task::JoinHandle<()> {
	tokio::spawn(async move {
		let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
		// The first tick fires immediately; skip it so startup stays quiet.
		interval.tick().await;

		loop {
			interval.tick().await;
			match session_repo.delete_expired().await {
				Ok(0) => {
					tracing::debug!("session sweep: nothing to delete");
				}
				Ok(deleted) => {
					tracing::info!(deleted, "session sweep: removed expired sessions");
				}
				Err(e) => {
					tracing::error!(error = %e, "session sweep failed");
				}
			}
		}
	})
}
