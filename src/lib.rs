pub mod airtable;
pub mod error;
pub mod mapping;
pub mod routes;
pub mod services;
pub mod state;
pub mod types;
pub mod webhooks;

use std::net::SocketAddr;

use state::AppState;
use types::Config;

/// Serve the dashboard API until Ctrl-C.
pub async fn run(config: Config) -> Result<(), String> {
    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .map_err(|e| format!("Invalid CRM_BIND_ADDR '{}': {}", config.bind_addr, e))?;

    log::info!(
        "Airtable base {:?}, tables: leads '{}', messages '{}', posts '{}' (view '{}')",
        config.airtable_base_id.as_deref().map(airtable::normalize_base_id),
        config.leads_table,
        config.messages_table,
        config.posts_table,
        config.view
    );

    let app = routes::build_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;
    log::info!("CRM dashboard API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    log::info!("CRM dashboard API shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
