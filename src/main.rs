//! HTTP server for the roster engine.

use std::env;
use std::io;

use roster_engine::api::{AppState, create_router};
use roster_engine::config::ConfigLoader;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("ROSTER_LOG_JSON", false) {
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
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
}

// ctrl_c errors at once when the handler cannot be installed. Without the
// fallback that error would resolve this future and stop the server.
async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(err) = signal.await {
        error!(error = %err, "Failed to listen for shutdown signal; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let config_dir =
        env::var("ROSTER_CONFIG_DIR").unwrap_or_else(|_| "config/default".to_string());
    let bind_addr = env::var("ROSTER_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let config = ConfigLoader::load(&config_dir).map_err(|e| format!("config load failed: {e}"))?;
    let app = create_router(AppState::new(config));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind failed: {e}"))?;
    info!(config_dir = %config_dir, "roster-engine listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))
}
