//! Mount namespace propagation.

use certswap_common::error::{CertswapError, Result};

/// Marks every mount in the current namespace as private.
///
/// Mount events created afterwards cannot propagate back to the host's
/// mount namespace.
///
/// # Errors
///
/// Returns an error if the `mount(2)` syscall fails.
#[cfg(target_os = "linux")]
pub fn make_mounts_private() -> Result<()> {
    use nix::mount::{MsFlags, mount};

    mount(
        None::<&str>,
        "/",
        None::<&str>,
        MsFlags::MS_REC | MsFlags::MS_PRIVATE,
        None::<&str>,
    )
    .map_err(|e| CertswapError::Mount {
        from: "none".into(),
        target: "/".into(),
        source: e.into(),
    })?;
    tracing::debug!("mount propagation set to private");
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error: mount namespaces require Linux.
#[cfg(not(target_os = "linux"))]
pub fn make_mounts_private() -> Result<()> {
    Err(CertswapError::Config {
        message: "Linux required for mount namespaces".into(),
    })
}
