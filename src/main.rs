//! Chatsweep - Interactive chat inspection, export, and purge CLI
//!
//! Main entry point for the chatsweep shell.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatsweep::cli::Cli;
use chatsweep::config::Config;
use chatsweep::service::{ChatService, HttpChatService};
use chatsweep::shell::Shell;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let mut config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Connect to the messaging service and confirm the credentials work
    let service = HttpChatService::new(config.service.clone())?;
    let username = service.whoami().await?;
    println!("Logged in as {}", username);

    // Run the interactive shell
    let mut shell = Shell::new(Box::new(service), &config);
    shell.run().await?;

    Ok(())
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "chatsweep=debug"
    } else {
        "chatsweep=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
