use tracing::{info, warn};

use crate::config::Settings;

/// Log where the library lives. A missing root is served as an empty catalog.
pub fn report_library(settings: &Settings) {
    let root = &settings.library.root;
    if root.is_dir() {
        info!(root = %root.display(), "music library");
    } else {
        warn!(root = %root.display(), "music library root is not a directory; the catalog will be empty");
    }
}

/// Resolves on Ctrl-C so the server can drain in-flight requests.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
