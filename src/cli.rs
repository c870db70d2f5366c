//! Command-line interface definition for chatsweep
//!
//! This module defines the CLI structure using clap's derive API. The tool
//! itself is interactive; flags only control startup configuration.

use clap::Parser;

/// chatsweep - interactive chat inspection, export, and purge CLI
///
/// Starts an interactive shell connected to the configured messaging
/// service. Type `help` at the prompt for the command reference.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "chatsweep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the service base URL from config
    #[arg(long, env = "CHATSWEEP_API_BASE")]
    pub api_base: Option<String>,

    /// Override the default message fetch limit from config
    #[arg(long)]
    pub limit: Option<i64>,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
