//! Exit status translation.

use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use certswap_common::types::StatusCode;
use nix::sys::signal::Signal;

/// Converts a child's exit status into the code this process relays.
///
/// A normal exit relays its code unchanged. Termination by a signal has
/// no exit code and yields [`StatusCode::UNKNOWN`].
pub fn status_code(status: ExitStatus, what: &str) -> StatusCode {
    if let Some(code) = status.code() {
        tracing::debug!(code, "{what} exited");
        return StatusCode::new(code);
    }
    if let Some(sig) = status.signal() {
        tracing::warn!(
            signal = sig,
            name = %signal_name(sig),
            "{what} terminated by signal"
        );
    }
    StatusCode::UNKNOWN
}

/// Returns the conventional name of a signal, or its number if unknown.
pub fn signal_name(sig: i32) -> String {
    Signal::try_from(sig).map_or_else(|_| sig.to_string(), |s| s.as_str().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_is_relayed() {
        let status = ExitStatus::from_raw(42 << 8);
        assert_eq!(status_code(status, "test"), StatusCode::new(42));
    }

    #[test]
    fn zero_is_success() {
        let status = ExitStatus::from_raw(0);
        assert_eq!(status_code(status, "test"), StatusCode::SUCCESS);
    }

    #[test]
    fn signal_is_unknown() {
        // SIGKILL, no core dump.
        let status = ExitStatus::from_raw(9);
        assert!(status_code(status, "test").is_unknown());
    }

    #[test]
    fn signal_names() {
        assert_eq!(signal_name(9), "SIGKILL");
        assert_eq!(signal_name(15), "SIGTERM");
        assert_eq!(signal_name(1000), "1000");
    }
}
