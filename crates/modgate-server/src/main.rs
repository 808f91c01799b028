//! ModGate moderation server.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use modgate_server::datastore::{NoopNotifier, PostgresNotifier, StatusNotifier};
use modgate_server::{http, models, AppState, Config, TaskQueue, Worker, WorkerPool};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load config
    let config = Config::parse();
    let http_addr: SocketAddr = config.http_addr.parse()?;
    let worker_count = config.worker_count as usize;

    info!(
        http_addr = %http_addr,
        input_folder = %config.input_folder.display(),
        workers = worker_count,
        queue_capacity = config.queue_capacity,
        "Starting ModGate server"
    );

    if !config.input_folder.is_dir() {
        warn!(input_folder = %config.input_folder.display(), "Input folder does not exist yet");
    }

    // Models are loaded once and shared by every worker
    let pipeline = {
        let config = config.clone();
        tokio::task::spawn_blocking(move || models::build_pipeline(&config)).await??
    };

    let notifier: Arc<dyn StatusNotifier> = if config.datastore.disabled {
        info!("Datastore disabled - verdicts are kept in memory only");
        Arc::new(NoopNotifier)
    } else {
        info!(
            host = %config.datastore.db_host,
            database = %config.datastore.db_name,
            "Mirroring verdicts to datastore"
        );
        Arc::new(PostgresNotifier::new(&config.datastore))
    };

    // Create shared state
    let state = AppState::new(
        config.input_folder.clone(),
        TaskQueue::new(config.queue_capacity as usize),
        worker_count,
    );

    // Start workers
    let shutdown = CancellationToken::new();
    let worker = Worker::new(state.clone(), Arc::new(pipeline), notifier);
    let pool = WorkerPool::spawn(worker_count, worker, shutdown.clone());

    // Start HTTP server
    let listener = TcpListener::bind(http_addr).await?;
    info!("HTTP server listening on {}", http_addr);

    let server_shutdown = shutdown.clone();
    axum::serve(listener, http::create_router(state))
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("Shutdown requested");
            server_shutdown.cancel();
        })
        .await?;

    // Let workers finish the task they hold
    shutdown.cancel();
    pool.join().await;
    info!("ModGate server stopped");

    Ok(())
}
