//! The namespaced stage: mount the bundle, then run the target command.

use std::ffi::{OsStr, OsString};
use std::process::{Command, Stdio};

use certswap_common::config::SwapConfig;
use certswap_common::error::{CertswapError, Result};
use certswap_common::types::{Handoff, StatusCode};
use certswap_core::filesystem::mount::bind_mount_readonly;
use certswap_core::namespace::mount::make_mounts_private;

use crate::status::status_code;

/// Replaces the certificate directory with the bundle and runs the target.
///
/// Any mount failure is returned before the target is started, so the
/// command never runs against the unmodified trust store.
///
/// # Errors
///
/// Returns an error if no target command is configured, the bundle
/// directory is missing, or either mount step fails.
pub fn mount_and_exec(config: &SwapConfig, handoff: &Handoff) -> Result<StatusCode> {
    let (program, args) = config.target().ok_or_else(|| CertswapError::Config {
        message: "no target command given".into(),
    })?;
    if !handoff.bundle_dir.is_dir() {
        return Err(CertswapError::Config {
            message: format!(
                "bundle directory {} does not exist",
                handoff.bundle_dir.display()
            ),
        });
    }

    make_mounts_private()?;
    bind_mount_readonly(&handoff.bundle_dir, &config.cert_dir)?;
    tracing::info!(
        bundle = %handoff.bundle_dir.display(),
        cert_dir = %config.cert_dir.display(),
        "certificate directory replaced"
    );

    Ok(run_target(program, args))
}

/// Runs the target command with inherited stdio and a marker-free
/// environment.
///
/// A command that cannot be started at all is logged and reported as
/// [`StatusCode::UNKNOWN`], distinct from the command exiting non-zero.
pub fn run_target(program: &OsStr, args: &[OsString]) -> StatusCode {
    let mut cmd = Command::new(program);
    let _ = cmd
        .args(args)
        .env_clear()
        .envs(target_env(std::env::vars_os()))
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    tracing::debug!(program = %program.to_string_lossy(), args = ?args, "running target command");
    match cmd.status() {
        Ok(status) => status_code(status, "target command"),
        Err(e) => {
            tracing::error!(
                program = %program.to_string_lossy(),
                error = %e,
                "failed to run child"
            );
            StatusCode::UNKNOWN
        }
    }
}

/// Filters the handoff markers out of an environment.
pub fn target_env<I>(vars: I) -> Vec<(OsString, OsString)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter(|(key, _)| !Handoff::is_marker(key))
        .collect()
}
