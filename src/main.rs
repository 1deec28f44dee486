//! StackSearch: a search front end for open digital collections
//!
//! This is the main entry point for the application.

use anyhow::Result;
use stacksearch_rs::{
    catalog::CatalogClient,
    config::Settings,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; STACKSEARCH_DEBUG raises the level before the
    // settings file is even read.
    let level = if debug_env() { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .init();

    info!("Starting StackSearch v{}", stacksearch_rs::VERSION);

    // Load configuration
    let settings = Settings::load()?;
    info!(
        "Loaded configuration for instance: {}",
        settings.general.instance_name
    );
    if let Some(base_url) = &settings.server.base_url {
        info!("Public base URL: {}", base_url);
    }

    // Initialize the catalog client
    let catalog = CatalogClient::new(&settings.catalog)?;
    info!("Catalog client ready for {}", catalog.base_url());

    // Create application state
    let state = AppState::new(settings.clone(), catalog)?;

    // Create router
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    info!("Starting server on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn debug_env() -> bool {
    std::env::var("STACKSEARCH_DEBUG")
        .map(|value| value == "true" || value == "1")
        .unwrap_or(false)
}
