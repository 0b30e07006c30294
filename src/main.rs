mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::router::{build_router, AppServices};
use crate::features::auth::AuthService;
use crate::features::notifications::NotificationService;
use crate::features::reports::{mock_reports, InMemoryReportRepository, ReportService};
use crate::features::status::StatusService;
use crate::modules::storage::FileKvStore;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    // Users and the current session persist across restarts
    let store = Arc::new(FileKvStore::open(&config.storage.data_dir).await?);
    tracing::info!(
        "Key-value store opened at {}",
        config.storage.data_dir.display()
    );

    let auth_service = Arc::new(AuthService::new(store));

    // Reports live in memory for the lifetime of the process
    let repository = if config.reports.seed_mock_reports {
        let seed = mock_reports(chrono::Utc::now());
        tracing::info!("Seeding {} sample reports", seed.len());
        Arc::new(InMemoryReportRepository::new(seed))
    } else {
        Arc::new(InMemoryReportRepository::empty())
    };

    let notification_service = Arc::new(NotificationService::new(&config.notifications));
    let report_service = Arc::new(ReportService::new(
        repository.clone(),
        Arc::clone(&notification_service),
        &config.reports,
        &config.notifications,
    ));
    let status_service = Arc::new(StatusService::new(repository));
    tracing::info!("Services initialized");

    let services = AppServices {
        auth: auth_service,
        reports: report_service,
        status: status_service,
        notifications: notification_service,
    };
    let app = build_router(&services, &config);

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
