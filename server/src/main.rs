use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use events_server::auth::JwtVerifier;
use events_server::config::{create_cors_layer, Config};
use events_server::routes::{create_routes, AppState};
use events_server::store::PgDocumentStore;

const DEFAULT_LOG_FILTER: &str = "events_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env()?;

    let target = &config.store.target;
    let store = PgDocumentStore::connect(target.url(), config.store.max_connections).await?;
    if target.is_local() {
        tracing::info!("Connected to local document store");
    } else {
        tracing::info!("Connected to production document store");
    }

    store.migrate().await?;
    tracing::info!("Migrations run successfully");

    let state = AppState::new(
        Arc::new(store),
        Arc::new(JwtVerifier::from_config(&config.auth)),
    );
    let app = create_routes(state).layer(create_cors_layer(&config.cors_allowed_origins));

    let addr = config.bind_addr();
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
