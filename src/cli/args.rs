//! Command-line argument parsing for ollamakit
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::config::ClientConfig;
use crate::errors::Result;
use crate::logging::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// ollamakit - talk to a local Ollama server from the terminal
#[derive(Parser, Debug)]
#[command(name = "ollamakit")]
#[command(version)]
#[command(about = "Typed client for a local Ollama server", long_about = None)]
pub struct Args {
    /// Ollama base URL (overrides config file and OLLAMA_HOST)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Log request and response bodies
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat with a model
    Chat {
        /// Model name
        #[arg(short, long)]
        model: String,

        /// User message
        prompt: String,

        /// System prompt
        #[arg(short, long)]
        system: Option<String>,

        /// Wait for the whole reply instead of streaming tokens
        #[arg(long)]
        no_stream: bool,
    },

    /// Complete a prompt
    Generate {
        #[arg(short, long)]
        model: String,

        prompt: String,

        /// Skip the model's prompt template
        #[arg(long)]
        raw: bool,

        #[arg(long)]
        no_stream: bool,
    },

    /// Embed one or more strings
    Embed {
        #[arg(short, long)]
        model: String,

        #[arg(required = true)]
        inputs: Vec<String>,
    },

    /// List local models
    Models,

    /// Show details for a model
    Show { model: String },

    /// List models loaded in memory
    Ps,

    /// Print the server version
    Version,

    /// Download a model from the registry
    Pull { model: String },

    /// Remove a local model
    Delete { model: String },
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Config file, then OLLAMA_* variables, then flags
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::load(self.config.clone())?.with_env()?;

        if let Some(host) = &self.host {
            config = config.with_base_url(host.clone());
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if self.debug {
            config = config.with_debug(true);
        }
        config.log_level = self.verbosity().log_level(config.log_level);

        config.validate()?;
        Ok(config)
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Log level for this verbosity; `Normal` keeps the configured one
    pub fn log_level(&self, configured: LogLevel) -> LogLevel {
        match self {
            Verbosity::Quiet => LogLevel::Error,
            Verbosity::Normal => configured,
            Verbosity::Verbose => LogLevel::Info.max(configured),
            Verbosity::VeryVerbose => LogLevel::Debug,
        }
    }

    /// Check if should show generation statistics
    pub fn show_stats(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}
