use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use diet_tracker::cli::{self, Cli};
use diet_tracker::config::Config;
use diet_tracker::store::{MemoryStore, RestStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if cli.demo {
        info!("running against an in-memory demo store");
        let config = Config::demo();
        return cli::run(cli.command, MemoryStore::new(), &config).await;
    }

    let config = Config::from_env()?;
    let store = RestStore::new(&config.store_url, &config.store_key)?;
    cli::run(cli.command, store, &config).await
}
