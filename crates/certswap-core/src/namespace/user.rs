//! User namespace ID mapping.
//!
//! Maps namespace ID 0 onto the invoking user's real UID/GID with a range
//! of one, and denies `setgroups(2)` so the mapping is accepted without
//! privileges.

use std::fmt;

use nix::errno::Errno;
use nix::unistd::{Gid, Uid};

/// One line of `/proc/[pid]/uid_map` or `/proc/[pid]/gid_map`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdMap {
    /// First ID inside the namespace.
    pub inside: u32,
    /// First ID outside the namespace.
    pub outside: u32,
    /// Number of IDs mapped.
    pub count: u32,
}

impl IdMap {
    /// Maps namespace root onto a single outer ID.
    #[must_use]
    pub const fn root_to(outside: u32) -> Self {
        Self {
            inside: 0,
            outside,
            count: 1,
        }
    }
}

impl fmt::Display for IdMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} {}", self.inside, self.outside, self.count)
    }
}

/// Pre-rendered UID and GID maps for the child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMapping {
    uid: IdMap,
    gid: IdMap,
    uid_line: String,
    gid_line: String,
}

impl UserMapping {
    /// Builds the mapping from explicit outer IDs.
    #[must_use]
    pub fn new(uid: u32, gid: u32) -> Self {
        let uid = IdMap::root_to(uid);
        let gid = IdMap::root_to(gid);
        Self {
            uid,
            gid,
            uid_line: uid.to_string(),
            gid_line: gid.to_string(),
        }
    }

    /// Builds the mapping for the calling process's real UID and GID.
    #[must_use]
    pub fn for_current_user() -> Self {
        Self::new(Uid::current().as_raw(), Gid::current().as_raw())
    }

    /// Returns the UID map entry.
    #[must_use]
    pub const fn uid(&self) -> IdMap {
        self.uid
    }

    /// Returns the GID map entry.
    #[must_use]
    pub const fn gid(&self) -> IdMap {
        self.gid
    }

    /// Writes the maps for the calling process.
    ///
    /// `setgroups` is denied before the GID map is written, as the kernel
    /// requires for unprivileged writers.
    ///
    /// # Errors
    ///
    /// Returns the errno of the first rejected write.
    pub fn apply(&self) -> nix::Result<()> {
        write_proc_file("/proc/self/uid_map", self.uid_line.as_bytes())?;
        deny_setgroups()?;
        write_proc_file("/proc/self/gid_map", self.gid_line.as_bytes())
    }
}

/// Disables `setgroups(2)` in the current user namespace.
///
/// Kernels older than 3.19 have no `setgroups` file and need no denial.
///
/// # Errors
///
/// Returns the errno if the file exists but cannot be written.
pub fn deny_setgroups() -> nix::Result<()> {
    match write_proc_file("/proc/self/setgroups", b"deny") {
        Err(Errno::ENOENT) => Ok(()),
        other => other,
    }
}

/// Switches to GID 0 and UID 0 inside the namespace.
///
/// # Errors
///
/// Returns the errno if the IDs are not mapped.
pub fn become_root() -> nix::Result<()> {
    nix::unistd::setgid(Gid::from_raw(0))?;
    nix::unistd::setuid(Uid::from_raw(0))
}

/// Writes `data` to a procfs control file in a single `write(2)`.
fn write_proc_file(path: &str, data: &[u8]) -> nix::Result<()> {
    use nix::fcntl::{OFlag, open};
    use nix::sys::stat::Mode;

    let fd = open(path, OFlag::O_WRONLY | OFlag::O_CLOEXEC, Mode::empty())?;
    let written = nix::unistd::write(&fd, data)?;
    if written == data.len() {
        Ok(())
    } else {
        Err(Errno::EIO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_map_renders_proc_line() {
        assert_eq!(IdMap::root_to(1000).to_string(), "0 1000 1\n");
    }

    #[test]
    fn mapping_is_a_single_root_entry() {
        let mapping = UserMapping::new(1000, 100);
        assert_eq!(mapping.uid(), IdMap { inside: 0, outside: 1000, count: 1 });
        assert_eq!(mapping.gid(), IdMap { inside: 0, outside: 100, count: 1 });
    }

    #[test]
    fn current_user_mapping_uses_real_ids() {
        let mapping = UserMapping::for_current_user();
        assert_eq!(mapping.uid().outside, Uid::current().as_raw());
        assert_eq!(mapping.gid().outside, Gid::current().as_raw());
    }
}
