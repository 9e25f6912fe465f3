// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Folio publishing server binary.

use clap::{Parser, Subcommand};
use folio_server::{create_app_state, create_router, version};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Folio server - HTTP server for the Folio publishing house.
#[derive(Parser, Debug)]
#[command(name = "folio-server", about = "Folio publishing house server", version)]
struct Args {
	/// Subcommands for folio-server (e.g., `version`)
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Handle subcommands that should not start the server
	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = folio_server_config::load_config()?;

	// Setup tracing; RUST_LOG wins over the configured level
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());
	if config.logging.json {
		tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer().json())
			.init();
	} else {
		tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer())
			.init();
	}

	tracing::info!(
			host = %config.http.host,
			port = config.http.port,
			database = %config.database.url,
			"starting folio-server"
	);

	if config.auth.dev_mode {
		tracing::warn!("dev mode is enabled; requests without a session run as a synthetic admin");
	}

	// Create database pool and run migrations
	let pool = folio_server_db::create_pool(&config.database.url).await?;
	folio_server_db::run_migrations(&pool).await?;

	// The media directory must exist before ServeDir mounts it
	tokio::fs::create_dir_all(&config.media.dir).await?;

	let state = create_app_state(pool, &config);

	// Background expired-session sweep
	let cleanup = folio_server::jobs::spawn_session_cleanup(
		state.session_repo.clone(),
		config.auth.session_cleanup_interval_secs,
	);

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	// Run server with graceful shutdown
	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
			cleanup.abort();
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
