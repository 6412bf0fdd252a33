//! Filesystem operations performed inside the mount namespace.

pub mod mount;
