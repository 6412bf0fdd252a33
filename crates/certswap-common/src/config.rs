//! Invocation configuration shared by the outer and inner roles.

use std::ffi::OsString;
use std::path::PathBuf;

/// Everything a single `certswap` invocation needs.
///
/// The inner role is re-executed with the identical argument vector, so
/// both roles reconstruct the same value from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapConfig {
    /// Directory replaced by the bind mount.
    pub cert_dir: PathBuf,
    /// CA files concatenated into the bundle, in order.
    pub ca_files: Vec<PathBuf>,
    /// Target command followed by its arguments.
    pub command: Vec<OsString>,
}

impl SwapConfig {
    /// Returns the program and its arguments, or `None` when no target
    /// command was supplied.
    #[must_use]
    pub fn target(&self) -> Option<(&OsString, &[OsString])> {
        self.command.split_first()
    }
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            cert_dir: PathBuf::from(crate::constants::SYSTEM_CERT_DIR),
            ca_files: Vec::new(),
            command: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets_system_cert_dir() {
        let config = SwapConfig::default();
        assert_eq!(config.cert_dir, PathBuf::from("/etc/ssl/certs"));
        assert!(config.target().is_none());
    }

    #[test]
    fn target_splits_program_from_arguments() {
        let config = SwapConfig {
            command: vec!["echo".into(), "hello".into(), "world".into()],
            ..SwapConfig::default()
        };
        let (program, args) = config.target().expect("target");
        assert_eq!(program, "echo");
        assert_eq!(args, ["hello", "world"]);
    }
}
