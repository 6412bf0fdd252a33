//! Process orchestration for certswap.
//!
//! A single invocation runs as one of two roles. The outer role builds
//! the bundle and re-executes itself inside new user and mount
//! namespaces ([`process`]); the inner role mounts the bundle and runs the
//! target command ([`exec`]). [`engine`] picks the role.

#![allow(unsafe_code)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod engine;
pub mod exec;
pub mod process;
pub mod status;
