use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rps_persistence::{DatabaseGateway, PersistenceGateway, connection::connect_and_migrate};
use rps_server::{config::Config, create_routes, websocket::ConnectionManager};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting RPS Arena server...");

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };
    let gateway: Arc<dyn PersistenceGateway> = Arc::new(DatabaseGateway::new(db));
    let connection_manager = Arc::new(ConnectionManager::new());

    let routes = create_routes(connection_manager.clone(), gateway, config.clone());

    // Drop sockets that stopped talking
    let cleanup_connection_manager = connection_manager.clone();
    let connection_timeout = Duration::from_secs(config.connection_timeout_seconds);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30));
        loop {
            interval.tick().await;
            cleanup_connection_manager
                .cleanup_inactive_connections(connection_timeout)
                .await;
        }
    });

    let ip = match config.host.parse::<std::net::IpAddr>() {
        Ok(ip) => ip,
        Err(e) => {
            error!("Invalid HOST {}: {}", config.host, e);
            std::process::exit(1);
        }
    };

    info!("Server starting on {}:{}", ip, config.port);

    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown((ip, config.port), shutdown_signal());

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let (mut sigint, mut sigterm) = match (
            signal::unix::signal(signal::unix::SignalKind::interrupt()),
            signal::unix::signal(signal::unix::SignalKind::terminate()),
        ) {
            (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
            _ => {
                error!("Failed to install signal handlers");
                return std::future::pending().await;
            }
        };

        tokio::select! {
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down gracefully...");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl+c: {}", e);
            return std::future::pending().await;
        }
        info!("Received Ctrl+C, shutting down gracefully...");
    }
}
