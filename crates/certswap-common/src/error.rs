//! Unified error types for the certswap workspace.
//!
//! Every fallible operation in the library crates reports through
//! [`CertswapError`]; the binary wraps it in `anyhow` at its outer edge.
//! Messages leave the underlying OS error to the `source()` chain, which
//! the binary prints once.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum CertswapError {
    /// An I/O operation failed.
    #[error("I/O error at {path}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value or process handoff is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// The namespaced re-exec failed: the host refused the user and mount
    /// namespaces or the ID mapping, or the executable could not be started.
    #[error("namespaced re-exec failed")]
    Namespace {
        /// Underlying error reported by the forked child or by `exec(2)`.
        source: std::io::Error,
    },

    /// A mount operation was rejected inside the namespace.
    #[error("mount of {from} over {target} failed")]
    Mount {
        /// Directory being mounted.
        from: PathBuf,
        /// Mount point.
        target: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, CertswapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let err = CertswapError::Io {
            path: PathBuf::from("/tmp/a.pem"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/tmp/a.pem"));
    }

    #[test]
    fn mount_error_names_both_paths() {
        let err = CertswapError::Mount {
            from: PathBuf::from("/tmp/certswap1"),
            target: PathBuf::from("/etc/ssl/certs"),
            source: std::io::Error::from_raw_os_error(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/certswap1"));
        assert!(msg.contains("/etc/ssl/certs"));
    }

    #[test]
    fn os_error_is_reported_through_source_only() {
        use std::error::Error as _;

        let errors = [
            CertswapError::Io {
                path: PathBuf::from("/tmp/a.pem"),
                source: std::io::Error::from_raw_os_error(2),
            },
            CertswapError::Namespace {
                source: std::io::Error::from_raw_os_error(1),
            },
            CertswapError::Mount {
                from: PathBuf::from("/tmp/certswap1"),
                target: PathBuf::from("/etc/ssl/certs"),
                source: std::io::Error::from_raw_os_error(2),
            },
        ];
        for err in errors {
            assert!(!err.to_string().contains("os error"), "{err}");
            let source = err.source().expect("source").to_string();
            assert!(source.contains("os error"));
        }
    }

    #[test]
    fn namespace_error_covers_exec_failures() {
        let err = CertswapError::Namespace {
            source: std::io::Error::from_raw_os_error(13),
        };
        assert_eq!(err.to_string(), "namespaced re-exec failed");
    }
}
