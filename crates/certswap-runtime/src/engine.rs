//! Role dispatch for a single invocation.
//!
//! `Start -> Outer: build bundle -> re-exec -> wait -> cleanup -> exit`
//! or `Start -> Inner: mount -> run target -> exit`. No retries.

use certswap_common::config::SwapConfig;
use certswap_common::error::{CertswapError, Result};
use certswap_common::types::{Handoff, Role, StatusCode};
use certswap_core::bundle::CaBundle;

use crate::{exec, process};

/// Runs the role selected by the current process environment.
///
/// # Errors
///
/// Returns any fatal error of the selected role.
pub fn run(config: &SwapConfig) -> Result<StatusCode> {
    run_as(Role::from_env(), config)
}

/// Runs the given role.
///
/// A configuration without a target command is rejected before any
/// bundle, namespace or mount is created.
///
/// # Errors
///
/// Returns a configuration error for a missing target command, and any
/// fatal error of the selected role.
pub fn run_as(role: Role, config: &SwapConfig) -> Result<StatusCode> {
    if config.target().is_none() {
        return Err(CertswapError::Config {
            message: "no target command given".into(),
        });
    }
    tracing::debug!(%role, "starting");
    match role {
        Role::Outer => run_outer(config),
        Role::Inner => run_inner(config),
    }
}

fn run_outer(config: &SwapConfig) -> Result<StatusCode> {
    let bundle = CaBundle::build(&config.ca_files)?;
    let status = process::reexec_in_namespace(&bundle.handoff());
    // The inner process has exited whichever way it went.
    bundle.cleanup();
    status
}

fn run_inner(config: &SwapConfig) -> Result<StatusCode> {
    let handoff = Handoff::from_env()?;
    exec::mount_and_exec(config, &handoff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_command_is_rejected_for_both_roles() {
        let config = SwapConfig::default();
        for role in [Role::Outer, Role::Inner] {
            let err = run_as(role, &config).unwrap_err();
            assert!(matches!(err, CertswapError::Config { .. }));
        }
    }

    #[test]
    fn inner_role_without_handoff_is_config_error() {
        if std::env::var_os(certswap_common::constants::PATH_ENV).is_some() {
            return;
        }
        let config = SwapConfig {
            command: vec!["true".into()],
            ..SwapConfig::default()
        };
        let err = run_as(Role::Inner, &config).unwrap_err();
        assert!(matches!(err, CertswapError::Config { .. }));
    }

    #[test]
    fn outer_role_fails_on_unreadable_ca_before_reexec() {
        let scratch = tempfile::tempdir().expect("tempdir");
        let config = SwapConfig {
            ca_files: vec![scratch.path().join("missing.pem")],
            command: vec!["true".into()],
            ..SwapConfig::default()
        };
        let err = run_as(Role::Outer, &config).unwrap_err();
        assert!(matches!(err, CertswapError::Io { .. }));
    }
}
