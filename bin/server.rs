// DSS Dashboard - Web Server
// REST API with Axum, frontend served from the static directory

use anyhow::{Context, Result};
use dss_dashboard::api::{build_router, AppState};
use dss_dashboard::logging::init_logging;
use dss_dashboard::{setup_database, Config};
use rusqlite::Connection;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    println!("🌐 DSS Dashboard - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = Config::from_env()?;
    let addr = config.socket_addr()?;

    // Open database (created on first start)
    let conn = Connection::open(&config.database_path)
        .with_context(|| format!("Failed to open database {:?}", config.database_path))?;
    setup_database(&conn).context("Failed to initialize database schema")?;
    info!(path = ?config.database_path, "database ready");

    if !config.static_dir.is_dir() {
        warn!(dir = ?config.static_dir, "static directory missing, only /api will respond");
    }

    let app = build_router(AppState::new(conn), &config.static_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/health", addr);
    println!("   UI:  http://{}", addr);
    println!("\n   Press Ctrl+C to stop\n");
    info!(%addr, "listening");

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
