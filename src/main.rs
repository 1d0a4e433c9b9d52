use anyhow::Context;
use kb_hierarchy::config::AppConfig;
use kb_hierarchy::store::PostgresStore;
use kb_hierarchy::{init_logging, run_server};
use std::sync::Arc;

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::load().context("error initializing configs")?;
    log::info!(
        "configuration loaded: server={}:{} database={}@{}:{}/{}",
        config.server.host,
        config.server.port,
        config.database.user,
        config.database.host,
        config.database.port,
        config.database.dbname
    );

    let postgres_store = PostgresStore::connect(&config.database)
        .await
        .context("error connecting to the database")?;

    if config.database.migrate {
        log::info!("creating hierarchy tables if missing");
        postgres_store
            .migrate()
            .await
            .context("error creating hierarchy tables")?;
    }

    run_server(Arc::new(postgres_store), &config).await
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    init_logging();

    if let Err(e) = run().await {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
