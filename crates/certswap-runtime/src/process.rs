//! Self re-execution inside new user and mount namespaces.
//!
//! The running binary launches `/proc/self/exe` with its own argument
//! vector. Between `fork(2)` and `exec(2)` the child unshares a user and a
//! mount namespace in one call, maps its real UID/GID to root, and becomes
//! root there. The handoff travels in the child's initial environment.

use std::ffi::OsString;
use std::io;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};

use certswap_common::constants::SELF_EXE;
use certswap_common::error::{CertswapError, Result};
use certswap_common::types::{Handoff, StatusCode};
use certswap_core::namespace::{self, UserMapping};

use crate::status::status_code;

/// Re-executes the current program in new namespaces and waits for it.
///
/// # Errors
///
/// Returns an error if the namespaces cannot be created or the child
/// cannot be waited on. There is no fallback path.
pub fn reexec_in_namespace(handoff: &Handoff) -> Result<StatusCode> {
    let argv: Vec<OsString> = std::env::args_os().collect();
    spawn_in_namespace(Path::new(SELF_EXE), &argv, handoff)
}

/// Runs `exe` with `argv` inside new user and mount namespaces.
///
/// `argv[0]` is passed through as the child's `argv[0]`. Standard streams
/// are inherited unchanged, and the child's environment is this process's
/// environment plus the handoff markers.
///
/// The namespace request, the ID mapping and the switch to root all happen
/// on the single thread of the forked child, so the credentials never
/// attach to a thread of this process. The calling thread blocks until
/// the child has been spawned and again until it exits.
///
/// # Errors
///
/// Returns [`CertswapError::Namespace`] if the host rejects the namespaces
/// or the mapping, or `exe` cannot be executed, and [`CertswapError::Io`]
/// if waiting fails.
pub fn spawn_in_namespace(exe: &Path, argv: &[OsString], handoff: &Handoff) -> Result<StatusCode> {
    let mapping = UserMapping::for_current_user();
    tracing::debug!(
        exe = %exe.display(),
        uid = mapping.uid().outside,
        gid = mapping.gid().outside,
        bundle = %handoff.bundle_dir.display(),
        "re-executing in user and mount namespaces"
    );

    let mut cmd = Command::new(exe);
    if let Some((arg0, args)) = argv.split_first() {
        let _ = cmd.arg0(arg0).args(args);
    }
    let _ = cmd
        .envs(handoff.to_env())
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    // SAFETY: the hook runs in the forked child before exec. It only issues
    // raw syscalls through nix with pre-rendered buffers and touches no
    // lock held by another thread of the parent.
    unsafe {
        let _ = cmd.pre_exec(move || {
            namespace::enter_user_and_mount_namespace(&mapping).map_err(io::Error::from)
        });
    }

    let mut child = cmd
        .spawn()
        .map_err(|e| CertswapError::Namespace { source: e })?;
    tracing::debug!(pid = child.id(), "namespaced child started");

    let status = child.wait().map_err(|e| CertswapError::Io {
        path: exe.to_path_buf(),
        source: e,
    })?;
    Ok(status_code(status, "namespaced child"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<OsString> {
        vec!["sh".into(), "-c".into(), script.into()]
    }

    /// Runs a shell script in the namespaces, or `None` when the host
    /// forbids unprivileged user namespaces.
    fn run(script: &str, handoff: &Handoff) -> Option<StatusCode> {
        match spawn_in_namespace(Path::new("/bin/sh"), &sh(script), handoff) {
            Ok(code) => Some(code),
            Err(CertswapError::Namespace { source }) => {
                eprintln!("skipping: user namespaces unavailable: {source}");
                None
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn child_exit_code_is_relayed() {
        let handoff = Handoff::new("/nonexistent");
        if let Some(code) = run("exit 7", &handoff) {
            assert_eq!(code, StatusCode::new(7));
        }
    }

    #[test]
    fn child_is_root_inside_namespace() {
        let handoff = Handoff::new("/nonexistent");
        if let Some(code) = run(r#"test "$(id -u)" = 0 && test "$(id -g)" = 0"#, &handoff) {
            assert_eq!(code, StatusCode::SUCCESS);
        }
    }

    #[test]
    fn child_receives_handoff_markers() {
        let handoff = Handoff::new("/tmp/certswap-marker");
        let script = r#"test "$CERTSWAP_CHILD" = true && test "$CERTSWAP_PATH" = /tmp/certswap-marker"#;
        if let Some(code) = run(script, &handoff) {
            assert_eq!(code, StatusCode::SUCCESS);
        }
    }
}
