//! wordbank-server - HTTP transport binary.

use std::net::SocketAddr;

use tokio::signal;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wordbank_core::{WordbankConfig, WordbankRuntime};
use wordbank_dictionary::NormalizerFactory;
use wordbank_server::{create_server, AppState};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("wordbank_server=debug".parse()?),
        )
        .init();

    // Configuration from a file if WORDBANK_CONFIG is set, otherwise from environment
    let config = match std::env::var("WORDBANK_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Loading configuration file");
            WordbankConfig::from_file(&path)?
        }
        Err(_) => WordbankConfig::from_env()?,
    };

    let host = std::env::var("WORDBANK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("WORDBANK_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    let normalizer = NormalizerFactory::from_config(&config.normalizer)?;
    info!(provider = normalizer.provider_name(), "Dictionary provider ready");

    let runtime = WordbankRuntime::new(config, normalizer).await?;
    runtime.start().await?;

    let state = AppState::new_with_runtime(runtime);
    let app = create_server(state.clone());

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting wordbank-server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received, taking final snapshot...");
        })
        .await?;

    // Explicit shutdown of runtime
    if let Some(mut runtime) = state.take_runtime() {
        runtime.shutdown().await?;
    }

    info!("Server stopped cleanly");
    Ok(())
}
