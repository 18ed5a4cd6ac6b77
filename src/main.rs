use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use channel_harvest::{Cli, Config, DateRange, HarvestPipeline};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "channel_harvest=debug"
    } else {
        "channel_harvest=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // A missing .env is fine, the key may come from the real environment
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let range = DateRange::new(cli.start, cli.end)?;

    let mut config = Config::load()?;
    config.apply_cli(&cli);
    config.validate()?;

    let pipeline = HarvestPipeline::new(config)?;

    tracing::info!("Harvesting {} for {}", cli.handle, range);

    let summary = pipeline
        .run(&cli.handle, &range)
        .await
        .with_context(|| format!("Harvest of {} failed", cli.handle))?;

    summary.display();

    Ok(())
}
