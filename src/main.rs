use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use forgecred::config::Config;
use forgecred::github::{AssertionMinter, TokenExchanger};
use forgecred::observe::TracingObserver;
use forgecred::secrets::{
    EnvSource, SecretResolver, SecretSource, Secrets, VaultClient, VaultSource,
};

#[derive(Parser, Debug)]
#[command(name = "forgecred")]
#[command(author, version, about = "GitHub App credential issuance", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "forgecred.toml")]
    config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Mint an installation access token and print it on stdout
    Token {
        /// Installation id to scope the token to
        #[arg(short, long, env = "GITHUB_INSTALLATION_ID")]
        installation: i64,
    },

    /// Resolve every known secret and report where each came from
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    // Initialize logging; stdout is reserved for command output
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

    // Build the resolution chain: vault first, environment fallback
    let observer = Arc::new(TracingObserver);
    let vault = VaultClient::new(&config.vault);
    let sources: Vec<Arc<dyn SecretSource>> =
        vec![Arc::new(VaultSource::new(vault)), Arc::new(EnvSource)];
    let resolver = Arc::new(SecretResolver::new(sources, observer.clone()));
    let secrets = Secrets::new(resolver.clone());

    match cli.command {
        Commands::Token { installation } => {
            let minter = AssertionMinter::new(secrets);
            let exchanger = TokenExchanger::new(&config.github, minter, observer);
            let token = exchanger.exchange(installation).await?;
            tracing::info!(
                installation_id = installation,
                expires_at = %token.expires_at,
                "Issued installation access token"
            );
            println!("{}", token.token);
        }
        Commands::Check => {
            for name in Secrets::ALL {
                let resolved = resolver.resolve_with_origin(name).await;
                println!("{:<24} {}", name, resolved.origin.as_str());
            }
        }
    }

    Ok(())
}
