//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

use crate::state::PanelMode;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "producer-panel")]
#[command(about = "A state-managed HTTP server backing the producer panel session widget")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Path of the JSON file used for session persistence
    #[arg(short, long, default_value = "dcpn-state.json")]
    pub data_file: PathBuf,

    /// Launch in reduced panel presentation mode
    #[arg(long)]
    pub panel: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Get the presentation mode selected by the panel flag
    pub fn mode(&self) -> PanelMode {
        if self.panel {
            PanelMode::Panel
        } else {
            PanelMode::Embedded
        }
    }
}
