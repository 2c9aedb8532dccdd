//! PM2.5 Simulator HTTP Server Binary
//!
//! Initializes the history repository, sets up the HTTP router, and starts
//! serving requests.
//!
//! # Usage
//!
//! ```bash
//! # JSON history file in the working directory (default)
//! cargo run --bin pm25-server
//!
//! # In-memory history
//! REPOSITORY_TYPE=local cargo run --bin pm25-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log level (default: info)
//! - `REPOSITORY_TYPE`: `json_file` or `local` (ignored when `repository.toml` exists)
//! - `HISTORY_FILE`: History file path (default: pm25_history.json)
//! - `SESSION_IDLE_SECS`: Idle seconds before a session is dropped (default: 3600)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use pm25_sim::db::RepositoryFactory;
use pm25_sim::http::state::DEFAULT_SESSION_IDLE_SECS;
use pm25_sim::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting PM2.5 simulator HTTP server");

    let repository = RepositoryFactory::from_default_config()?;
    info!(backend = repository.backend_name(), "Repository initialized");

    let session_idle_secs: i64 = env::var("SESSION_IDLE_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SESSION_IDLE_SECS);
    let state = AppState::new(repository)
        .with_session_idle(chrono::Duration::seconds(session_idle_secs));

    let app = create_router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
