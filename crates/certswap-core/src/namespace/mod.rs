//! Linux namespace management for the re-executed child.
//!
//! The user and mount namespaces are requested together in one
//! `unshare(2)` call: only the root identity granted by the new user
//! namespace allows mounting inside the new mount namespace.

pub mod mount;
pub mod user;

pub use user::{IdMap, UserMapping};

/// Enters fresh user and mount namespaces and becomes root inside them.
///
/// Intended for a `pre_exec` hook: it runs in the single-threaded child
/// between `fork(2)` and `exec(2)`, so the namespace and credential state
/// is bound to that one thread and the parent is never affected. Nothing
/// here allocates; the mapping lines are rendered beforehand.
///
/// # Errors
///
/// Returns the raw errno if the host forbids unprivileged user namespaces
/// or rejects the ID mapping.
#[cfg(target_os = "linux")]
pub fn enter_user_and_mount_namespace(mapping: &UserMapping) -> nix::Result<()> {
    use nix::sched::{CloneFlags, unshare};

    unshare(CloneFlags::CLONE_NEWUSER | CloneFlags::CLONE_NEWNS)?;
    mapping.apply()?;
    user::become_root()
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns `ENOSYS`: namespaces require Linux.
#[cfg(not(target_os = "linux"))]
pub fn enter_user_and_mount_namespace(_mapping: &UserMapping) -> nix::Result<()> {
    Err(nix::errno::Errno::ENOSYS)
}
