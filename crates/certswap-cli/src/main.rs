//! # certswap
//!
//! Runs a single command with extra CAs trusted, by bind-mounting a
//! synthetic bundle over the system certificate directory inside private
//! user and mount namespaces.

mod commands;

use std::process::ExitCode;

use certswap_common::types::StatusCode;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match commands::execute(cli) {
        Ok(status) => ExitCode::from(status.exit_byte()),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(StatusCode::FAILURE.exit_byte())
        }
    }
}
