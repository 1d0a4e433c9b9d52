pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export all model types
pub use model::*;

pub use error::{Error, Result};

// Export store types
pub use store::{InMemoryStore, PostgresStore, Store};

/// Log at info by default and keep sqlx quiet; `RUST_LOG` overrides both.
pub fn init_logging() {
    use log::LevelFilter;

    let _ = env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn)
        .parse_default_env()
        .try_init();
}

/// Serve the API for `store` on the configured address until the listener fails.
pub async fn run_server<S: Store + 'static>(
    store: std::sync::Arc<S>,
    config: &config::AppConfig,
) -> anyhow::Result<()> {
    use tokio::net::TcpListener;

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("knowledge base API listening on http://{}", bind_address);

    axum::serve(listener, api::routes::app(store)).await?;

    Ok(())
}
