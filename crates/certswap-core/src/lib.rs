//! # certswap-core
//!
//! Low-level building blocks for swapping the system CA bundle of a
//! single command.
//!
//! This crate provides:
//! - **Bundle**: concatenation of PEM files into a private temporary
//!   directory.
//! - **Namespaces**: user + mount namespace entry with a single-ID
//!   mapping that makes the caller root inside.
//! - **Filesystem**: read-only bind mounts that respect the flags a user
//!   namespace is not allowed to clear.
//!
//! The namespace and mount functions run inside the re-executed child
//! and never touch the host's mount table.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod bundle;
pub mod filesystem;
pub mod namespace;
