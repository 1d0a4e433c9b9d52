use anyhow::Context;
use kb_hierarchy::config::AppConfig;
use kb_hierarchy::export::{export_graph, GraphRenderer};
use kb_hierarchy::init_logging;
use kb_hierarchy::store::PostgresStore;

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::load().context("error initializing configs")?;

    let store = PostgresStore::connect(&config.database)
        .await
        .context("error connecting to the database")?;

    let renderer = GraphRenderer::from_config(&config.export);
    export_graph(&store, &renderer)
        .await
        .context("error rendering graph")?;

    log::info!("graph written to {}", renderer.output_path().display());
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    init_logging();

    if let Err(e) = run().await {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
