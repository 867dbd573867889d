mod cli;

use crate::cli::{Command, LogFormatArg, CLI};
use abbr_gateway::{App, AppState};
use abbr_storage::{Database, DatabaseConfig};
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::try_parse()?;
    init_tracing(config.log_format);

    let db_config = DatabaseConfig::builder().path(config.database.clone()).build();
    let db = Database::connect(&db_config).await?;

    match config.command {
        Command::InitDb => {
            db.init_schema().await?;
            println!("Initialized the database");
        }
        Command::Serve {
            listen_addr,
            public_base_url,
        } => {
            info!(
                listen_addr = %listen_addr,
                database = %config.database.display(),
                public_base_url = %public_base_url,
                "starting gateway server"
            );
            serve(listen_addr, AppState::new(db.clone(), public_base_url)).await?;
        }
    }

    db.close().await;
    Ok(())
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

async fn serve(listen_addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}
