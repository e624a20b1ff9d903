use clap::Parser;
use error_common::{log_error, FolioError};
use folio_server::{create_app, server::spawn_session_cleanup, Args, FolioServer, Settings};
use logger_redacted::{init_tracing, LoggerConfig};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Duration;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let settings = match Settings::load(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&LoggerConfig::for_env(&settings.env)) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_config_error() {
                eprintln!("{e}");
            }
            log_error("run server", &e);
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: Settings) -> Result<(), FolioError> {
    tracing::info!(
        env = %settings.env,
        session_backend = ?settings.session_backend,
        "Starting Folio server"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let cleanup_every = Duration::from_secs(settings.session_cleanup_interval_secs);

    let server = FolioServer::connect(settings).await?;
    let cleanup = spawn_session_cleanup(server.session_store().clone(), cleanup_every);
    let app = create_app(server);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| FolioError::NetworkError(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!(%addr, "Folio server listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FolioError::ServerError(e.to_string()));

    cleanup.abort();
    tracing::info!("Folio server stopped");
    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
