//! Read-only bind mounts.
//!
//! `MS_RDONLY` is ignored on the initial `MS_BIND`, so the bind is
//! followed by a bind-remount. Inside a user namespace the remount must
//! keep the `nosuid`, `nodev`, `noexec` and atime flags the mount
//! inherited from a more privileged namespace, or the kernel refuses it.

use std::path::Path;

use certswap_common::error::{CertswapError, Result};
#[cfg(target_os = "linux")]
use nix::mount::MsFlags;
#[cfg(target_os = "linux")]
use nix::sys::statvfs::FsFlags;

/// Bind-mounts `source` over `target` and makes the mount read-only.
///
/// # Errors
///
/// Returns an error if the bind, the flag lookup, or the read-only
/// remount fails. A failed remount leaves a writable bind in this
/// namespace only; the caller must treat it as fatal.
#[cfg(target_os = "linux")]
pub fn bind_mount_readonly(source: &Path, target: &Path) -> Result<()> {
    use nix::mount::mount;
    use nix::sys::statvfs::statvfs;

    let mount_err = |e: nix::errno::Errno| CertswapError::Mount {
        from: source.to_path_buf(),
        target: target.to_path_buf(),
        source: e.into(),
    };

    mount(
        Some(source),
        target,
        None::<&str>,
        MsFlags::MS_BIND,
        None::<&str>,
    )
    .map_err(mount_err)?;

    let inherited = statvfs(target)
        .map(|st| locked_flags(st.flags()))
        .map_err(mount_err)?;

    mount(
        None::<&str>,
        target,
        None::<&str>,
        MsFlags::MS_BIND | MsFlags::MS_REMOUNT | MsFlags::MS_RDONLY | inherited,
        None::<&str>,
    )
    .map_err(mount_err)?;

    tracing::debug!(
        source = %source.display(),
        target = %target.display(),
        flags = ?inherited,
        "created read-only bind mount"
    );
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error: bind mounts require Linux.
#[cfg(not(target_os = "linux"))]
pub fn bind_mount_readonly(_source: &Path, _target: &Path) -> Result<()> {
    Err(CertswapError::Config {
        message: "Linux required for bind mounts".into(),
    })
}

/// Translates the `statvfs(3)` flags of a mount into the `MS_*` flags a
/// bind-remount has to repeat.
#[cfg(target_os = "linux")]
#[must_use]
pub fn locked_flags(flags: FsFlags) -> MsFlags {
    const LOCKED: [(FsFlags, MsFlags); 6] = [
        (FsFlags::ST_NOSUID, MsFlags::MS_NOSUID),
        (FsFlags::ST_NODEV, MsFlags::MS_NODEV),
        (FsFlags::ST_NOEXEC, MsFlags::MS_NOEXEC),
        (FsFlags::ST_NOATIME, MsFlags::MS_NOATIME),
        (FsFlags::ST_NODIRATIME, MsFlags::MS_NODIRATIME),
        (FsFlags::ST_RELATIME, MsFlags::MS_RELATIME),
    ];

    LOCKED
        .iter()
        .filter(|(st, _)| flags.contains(*st))
        .fold(MsFlags::empty(), |acc, (_, ms)| acc | *ms)
}
