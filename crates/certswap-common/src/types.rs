//! Domain primitive types used across the certswap workspace.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;

use crate::constants::{CHILD_ENV, CHILD_ENV_VALUE, PATH_ENV};
use crate::error::{CertswapError, Result};

/// Exit status relayed through both process generations.
///
/// Wraps the raw code so that the sentinel for "status could not be
/// determined" stays distinct from every code a command can exit with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(i32);

impl StatusCode {
    /// The command ran and exited successfully.
    pub const SUCCESS: Self = Self(0);
    /// A fatal error inside certswap itself.
    pub const FAILURE: Self = Self(1);
    /// No target command was supplied.
    pub const USAGE: Self = Self(2);
    /// Exit status unknown: killed by a signal or never started.
    pub const UNKNOWN: Self = Self(-1);

    /// Wraps a raw exit code.
    #[must_use]
    pub const fn new(code: i32) -> Self {
        Self(code)
    }

    /// Returns the raw exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Returns `true` for the sentinel status.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        self.0 == Self::UNKNOWN.0
    }

    /// Returns the byte the operating system reports for this status.
    ///
    /// Codes are truncated modulo 256 the way `exit(2)` does, so the
    /// sentinel surfaces as 255.
    #[must_use]
    pub fn exit_byte(self) -> u8 {
        u8::try_from(self.0.rem_euclid(256)).unwrap_or(u8::MAX)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            write!(f, "unknown")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Which of the two process generations is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Unprivileged invocation started by the user.
    Outer,
    /// Re-executed copy running inside the user and mount namespaces.
    Inner,
}

impl Role {
    /// Determines the role from an environment lookup.
    ///
    /// Only the exact marker value selects [`Role::Inner`]; anything else,
    /// including an absent variable, is the outer role.
    pub fn detect<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        match lookup(CHILD_ENV) {
            Some(value) if value == CHILD_ENV_VALUE => Self::Inner,
            _ => Self::Outer,
        }
    }

    /// Determines the role of the current process.
    #[must_use]
    pub fn from_env() -> Self {
        Self::detect(|key| std::env::var_os(key))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outer => write!(f, "outer"),
            Self::Inner => write!(f, "inner"),
        }
    }
}

/// One-way message from the outer role to the inner role.
///
/// Travels as environment variables set on the re-executed child and is
/// stripped again before the target command starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    /// Directory holding the synthetic bundle.
    pub bundle_dir: PathBuf,
}

impl Handoff {
    /// Creates a handoff pointing at the given bundle directory.
    #[must_use]
    pub fn new(bundle_dir: impl Into<PathBuf>) -> Self {
        Self {
            bundle_dir: bundle_dir.into(),
        }
    }

    /// Returns the environment entries carrying this handoff.
    #[must_use]
    pub fn to_env(&self) -> [(&'static str, OsString); 2] {
        [
            (CHILD_ENV, OsString::from(CHILD_ENV_VALUE)),
            (PATH_ENV, self.bundle_dir.clone().into_os_string()),
        ]
    }

    /// Reads the handoff from an environment lookup.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the bundle path marker is absent
    /// or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        match lookup(PATH_ENV) {
            Some(path) if !path.is_empty() => Ok(Self::new(path)),
            _ => Err(CertswapError::Config {
                message: format!("{PATH_ENV} is not set for the namespaced process"),
            }),
        }
    }

    /// Reads the handoff from the current process environment.
    ///
    /// # Errors
    ///
    /// See [`Handoff::from_lookup`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Returns `true` if `key` is one of the internal marker variables.
    #[must_use]
    pub fn is_marker(key: &OsStr) -> bool {
        key == CHILD_ENV || key == PATH_ENV
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), OsString::from(v)))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn role_is_outer_without_marker() {
        assert_eq!(Role::detect(lookup(&[])), Role::Outer);
    }

    #[test]
    fn role_is_inner_with_marker() {
        assert_eq!(Role::detect(lookup(&[(CHILD_ENV, "true")])), Role::Inner);
    }

    #[test]
    fn role_ignores_other_marker_values() {
        assert_eq!(Role::detect(lookup(&[(CHILD_ENV, "1")])), Role::Outer);
        assert_eq!(Role::detect(lookup(&[(CHILD_ENV, "")])), Role::Outer);
    }

    #[test]
    fn handoff_env_is_read_back_by_inner_role() {
        let handoff = Handoff::new("/tmp/certswapXYZ");
        let env: Vec<(String, String)> = handoff
            .to_env()
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.to_string_lossy().into_owned()))
            .collect();
        let pairs: Vec<(&str, &str)> = env.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

        assert_eq!(Role::detect(lookup(&pairs)), Role::Inner);
        assert_eq!(Handoff::from_lookup(lookup(&pairs)).expect("handoff"), handoff);
    }

    #[test]
    fn handoff_without_path_is_config_error() {
        let err = Handoff::from_lookup(lookup(&[(CHILD_ENV, "true")])).unwrap_err();
        assert!(matches!(err, CertswapError::Config { .. }));
    }

    #[test]
    fn markers_are_recognised() {
        assert!(Handoff::is_marker(OsStr::new(CHILD_ENV)));
        assert!(Handoff::is_marker(OsStr::new(PATH_ENV)));
        assert!(!Handoff::is_marker(OsStr::new("PATH")));
    }

    #[test]
    fn sentinel_status_surfaces_as_255() {
        assert_eq!(StatusCode::UNKNOWN.exit_byte(), 255);
        assert_eq!(StatusCode::new(7).exit_byte(), 7);
        assert_eq!(StatusCode::new(256).exit_byte(), 0);
        assert!(StatusCode::UNKNOWN.is_unknown());
        assert!(!StatusCode::SUCCESS.is_unknown());
    }

    #[test]
    fn status_display() {
        assert_eq!(StatusCode::new(3).to_string(), "3");
        assert_eq!(StatusCode::UNKNOWN.to_string(), "unknown");
    }
}
