//! CLI for the RESQ request layer.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use resq_core::config::{self, ClientConfig};
use resq_core::Method;
use std::path::PathBuf;

use commands::{run_batch_file, run_call, run_config_path};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "resq")]
#[command(about = "RESQ: HTTP requests with rate limiting, retries and batch windows", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/resq/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Send one request and print the response.
    Call {
        /// Absolute URL, or a path resolved against base_url.
        target: String,
        /// HTTP method.
        #[arg(long, short = 'X', default_value = "GET")]
        method: Method,
        /// Extra header as `Name: value`. Repeatable.
        #[arg(long = "header", short = 'H', value_name = "NAME:VALUE", value_parser = parse_header)]
        headers: Vec<(String, String)>,
        /// Request body.
        #[arg(long, short = 'd')]
        data: Option<String>,
    },

    /// Send one request per line of FILE in concurrent windows.
    Batch {
        /// File with one target per line; blank lines and `#` comments are skipped.
        file: PathBuf,
        /// Window size (default from config).
        #[arg(long, short = 'c', value_name = "N")]
        concurrency: Option<usize>,
        /// HTTP method for every request.
        #[arg(long, short = 'X', default_value = "GET")]
        method: Method,
    },

    /// Print the path of the configuration file.
    ConfigPath,
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:VALUE, got {:?}", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in {:?}", s));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

impl Cli {
    fn load_config(&self) -> Result<ClientConfig> {
        let cfg = match &self.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        Ok(cfg)
    }

    /// Parses arguments, runs the command, and returns the process exit code.
    pub async fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::ConfigPath => {
                run_config_path(cli.config.as_deref())?;
                Ok(0)
            }
            CliCommand::Call {
                ref target,
                method,
                ref headers,
                ref data,
            } => {
                let cfg = cli.load_config()?;
                run_call(cfg, target, method, headers, data.as_deref()).await
            }
            CliCommand::Batch {
                ref file,
                concurrency,
                method,
            } => {
                let cfg = cli.load_config()?;
                run_batch_file(cfg, file, concurrency, method).await
            }
        }
    }
}

#[cfg(test)]
mod tests;
