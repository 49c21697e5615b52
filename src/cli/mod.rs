//! CLI module for Fiet
//!
//! Command-line parsing for the fiet-server binary. Flags override values
//! read from the environment.

use crate::utils::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Fiet - user-account REST service
#[derive(Parser, Debug)]
#[command(
    name = "fiet-server",
    version,
    about = "Fiet - user-account REST service with JWT-protected profile routes",
    after_help = "EXAMPLES:\n    \
                  fiet-server                        # Start with dev.env and defaults\n    \
                  fiet-server --env-file prod.env    # Load a different env file\n    \
                  fiet-server --port 9000 --verbose  # Override port, debug logging"
)]
pub struct Cli {
    /// Env file loaded before reading configuration
    #[arg(long, default_value = "dev.env")]
    pub env_file: PathBuf,

    /// Address to bind (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Applies command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.verbose {
            config.server.log_level = "debug".to_string();
        }
    }
}
