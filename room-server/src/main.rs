use std::sync::Arc;

use tokio::signal;
use tracing::info;

use room_core::WordRepository;
use room_server::{
    config::Config, create_routes, orchestrator::GameOrchestrator,
    websocket::connection::ConnectionManager,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    info!("Starting word-rooms server...");

    let config = Config::new();

    info!("Loading words from directory: {}", config.words_dir);
    let words = match WordRepository::from_dir(&config.words_dir) {
        Ok(repo) => Arc::new(repo),
        Err(e) => {
            tracing::error!("Failed to load words from '{}': {}", config.words_dir, e);
            tracing::error!("The server requires word lists to function.");
            tracing::error!(
                "Set WORDS_DIRECTORY to a directory containing one word per line in .txt files."
            );
            std::process::exit(1);
        }
    };

    let connections = Arc::new(ConnectionManager::new());
    let orchestrator = Arc::new(GameOrchestrator::new(words, connections.clone()));
    let routes = create_routes(connections, orchestrator);

    let addr = (
        config
            .host
            .parse::<std::net::IpAddr>()
            .expect("Invalid HOST"),
        config.port,
    );

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt()).unwrap();
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate()).unwrap();

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
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!("Server started on {}. Press Ctrl+C to stop.", addr);
    server.await;
    info!("Server shutdown complete.");
}
