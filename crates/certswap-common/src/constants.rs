//! System-wide constants and well-known paths.

/// System certificate directory overridden inside the mount namespace.
pub const SYSTEM_CERT_DIR: &str = "/etc/ssl/certs";

/// File name of the synthetic bundle inside its temporary directory.
pub const BUNDLE_FILE_NAME: &str = "ca-certificates.crt";

/// Prefix for the temporary bundle directory.
pub const BUNDLE_DIR_PREFIX: &str = "certswap";

/// Permission bits of the bundle file (world-readable, owner-writable).
pub const BUNDLE_FILE_MODE: u32 = 0o644;

/// Environment variable carrying the role marker across the re-exec.
pub const CHILD_ENV: &str = "CERTSWAP_CHILD";

/// Environment variable carrying the bundle directory across the re-exec.
pub const PATH_ENV: &str = "CERTSWAP_PATH";

/// Value of [`CHILD_ENV`] marking the inner, namespaced role.
pub const CHILD_ENV_VALUE: &str = "true";

/// Environment variable overriding the certificate directory.
pub const CERT_DIR_ENV: &str = "CERTSWAP_CERT_DIR";

/// Self-reference to the running executable image.
pub const SELF_EXE: &str = "/proc/self/exe";

/// Usage synopsis printed when no target command is given.
pub const USAGE: &str = "usage: certswap [--ca PATH]... -- COMMAND [ARGUMENTS...]";
