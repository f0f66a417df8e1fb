use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fintech_console::cli::{self, Cli, Commands};
use fintech_console::config::{Config, LogFormat};

fn init_tracing(format: LogFormat) {
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(base_url) = cli.api_base_url {
        config.api_base_url = base_url;
    }

    // Setup logging
    init_tracing(config.log_format);

    if let Commands::Config = cli.command {
        return cli::handle_config_validate(&config);
    }

    let console = cli::build_console(&config)?;
    tracing::debug!("Console initialized with base URL: {}", config.api_base_url);

    match cli.command {
        Commands::Accounts(command) => cli::handle_accounts(&console, command).await,
        Commands::Cards(command) => cli::handle_cards(&console, command).await,
        Commands::Tx(command) => cli::handle_tx(&console, command).await,
        Commands::Config => Ok(()),
    }
}
