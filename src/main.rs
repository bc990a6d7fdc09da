use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod models;
mod notion;
mod sync;
mod weread;

use config::Config;
use notion::NotionClient;
use sync::{DocumentStore, SyncContext, SyncOrchestrator};
use weread::WeReadClient;

#[derive(Parser)]
#[command(name = "weread-sync")]
#[command(version)]
#[command(about = "Sync WeRead highlights into a Notion database", long_about = None)]
struct Cli {
    /// WeRead cookie string copied from the browser
    weread_cookie: String,

    /// Notion integration token
    notion_token: String,

    /// Id of the Notion database that holds one page per book
    database_id: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weread_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(Config::path_from_env())?;
    if let Some(path) = &config.config_file {
        tracing::debug!("Config file: {}", path.display());
    }
    tracing::debug!(
        "Pacing: {}ms ({})",
        config.pacing_ms.value,
        config.pacing_ms.source
    );

    let source = WeReadClient::new(&cli.weread_cookie, &config)?;
    source.warm_up().await?;
    let store = NotionClient::new(&cli.notion_token, &cli.database_id, &config)?;

    let watermark = store.query_latest_sync_date().await?;
    let ctx = SyncContext::new(&config, watermark);

    let report = SyncOrchestrator::new(&source, &store).run(&ctx).await?;
    println!("{}", report);

    Ok(())
}
