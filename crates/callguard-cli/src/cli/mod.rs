//! CLI for the callguard web API dispatcher.

mod commands;

use anyhow::Result;
use callguard_core::config;
use callguard_core::http::Method;
use clap::{Parser, Subcommand};

use commands::{run_call, run_config, CallArgs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "callguard")]
#[command(about = "Call a web API with rate-limit aware retries", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Send one request and print the response.
    Call {
        /// Absolute URL, or a path appended to `base_url` from the config.
        target: String,

        /// HTTP method.
        #[arg(short = 'X', long, default_value = "GET")]
        method: Method,

        /// Request body.
        #[arg(short, long)]
        data: Option<String>,

        /// Extra header as "Name: value". May be repeated.
        #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
        headers: Vec<String>,

        /// Access token; sent as "Bearer <token>" unless it already has a scheme.
        #[arg(long, env = "CALLGUARD_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Show the config file location and effective settings.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Call {
                target,
                method,
                data,
                headers,
                token,
            } => run_call(
                &cfg,
                CallArgs {
                    target,
                    method,
                    data,
                    headers,
                    token,
                },
            )?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
