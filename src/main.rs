use anyhow::{Context, Result};
use clap::Parser;
use secondbrain::{config::Config, logging, processing::SecondBrain};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "second-brain",
    about = "Index topic notes and synthesize a critical perspective from them"
)]
struct Cli {
    /// Topic tag; files ending in `<topic>.txt` are ingested.
    #[arg(long, default_value = "learning")]
    topic: String,
    /// JSON settings file with service endpoints and keys.
    #[arg(long, default_value = "appsettings.json")]
    settings: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init_tracing();

    let config = Config::load(&cli.settings)
        .with_context(|| format!("failed to load configuration from {}", cli.settings.display()))?;
    let brain = SecondBrain::new(&config).context("failed to initialize service clients")?;

    brain
        .recreate_index()
        .await
        .context("failed to recreate search index")?;
    brain
        .ingest_topic(&cli.topic)
        .await
        .with_context(|| format!("failed to ingest topic '{}'", cli.topic))?;

    if brain
        .report_synthesis(&cli.topic, &mut std::io::stdout())
        .await
    {
        tracing::info!(topic = %cli.topic, "Run complete");
    }
    Ok(())
}
