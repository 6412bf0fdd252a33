//! Command-line definition and dispatch.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Context;
use certswap_common::config::SwapConfig;
use certswap_common::constants::{CERT_DIR_ENV, SYSTEM_CERT_DIR, USAGE};
use certswap_common::types::StatusCode;
use clap::Parser;

/// Run a command with additional CAs in the system trust store.
#[derive(Parser, Debug)]
#[command(
    name = "certswap",
    version,
    about,
    long_about = None,
    override_usage = "certswap [--ca PATH]... -- COMMAND [ARGUMENTS...]"
)]
pub struct Cli {
    /// Path to a CA PEM file which should be in the system cert pool.
    #[arg(long = "ca", value_name = "PATH")]
    pub ca: Vec<PathBuf>,

    /// Certificate directory to replace with the synthetic bundle.
    #[arg(long, value_name = "DIR", env = CERT_DIR_ENV, default_value = SYSTEM_CERT_DIR)]
    pub cert_dir: PathBuf,

    /// Command to run, followed by its arguments.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<OsString>,
}

impl Cli {
    /// Converts the parsed flags into the invocation configuration.
    pub fn into_config(self) -> SwapConfig {
        SwapConfig {
            cert_dir: self.cert_dir,
            ca_files: self.ca,
            command: self.command,
        }
    }
}

/// Runs the invocation and returns the status to exit with.
///
/// Without a target command the usage synopsis is printed and
/// [`StatusCode::USAGE`] returned before anything is created.
///
/// # Errors
///
/// Returns an error for any fatal failure of either process role.
pub fn execute(cli: Cli) -> anyhow::Result<StatusCode> {
    let config = cli.into_config();
    if config.target().is_none() {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("{USAGE}");
        }
        return Ok(StatusCode::USAGE);
    }

    certswap_runtime::engine::run(&config).context("certswap failed")
}
