use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use crate::logging;
use crate::server::{AppState, create_router};

mod cli;
mod settings;
mod startup;

pub async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let loaded = settings::load_settings(&cli);

    logging::init(&loaded.settings.logging).context("failed to initialize logging")?;
    loaded.report();

    let settings = loaded.settings;
    startup::report_library(&settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let app = create_router(AppState::new(settings));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(startup::shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
