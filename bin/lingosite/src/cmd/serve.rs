//! Serve command - HTTP server for the SEO endpoints

use std::{path::Path, sync::Arc};

use color_eyre::eyre::{Result, WrapErr};
use lingosite_generator::FontSource;
use tokio::net::TcpListener;

use crate::{
    server::{AppState, create_router},
    site::Site,
};

/// Run the serve command.
///
/// The OpenGraph font is fetched over HTTP from the origin of each request,
/// which this server answers from its public directory.
pub async fn run(config_path: &Path, host: Option<&str>, port: Option<u16>) -> Result<()> {
    let mut site = Site::load(config_path)?;

    if let Some(host) = host {
        site.config.server.host = host.to_string();
    }
    if let Some(port) = port {
        site.config.server.port = port;
    }

    let addr = format!("{}:{}", site.config.server.host, site.config.server.port);
    tracing::info!(
        %addr,
        content = %site.content_dir().display(),
        public = %site.public_dir().display(),
        "starting server"
    );

    let font = FontSource::http(site.config.opengraph.font_path.clone());
    let app = create_router(Arc::new(AppState { site, font }));

    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Server running at http://{addr}");
    println!("  Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
