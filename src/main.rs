use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cepe::cli::{run_command, Cli};
use cepe::config::Config;
use cepe::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config)?;
    if let Some(api_url) = &cli.api_url {
        config.server.api_url = api_url.clone();
    }

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Restore attempt happens here: a valid persisted session boots straight
    // into the dashboard commands, otherwise only login is useful.
    let mut state = AppState::boot(config);

    run_command(&cli, &mut state).await
}
