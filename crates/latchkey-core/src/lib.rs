//! Core types for the latchkey lock controller.
//!
//! This crate defines the domain vocabulary shared by every other crate in
//! the workspace: credential UIDs, the allow-list they are matched against,
//! and the wrapping millisecond tick used for all timing decisions. It has
//! no async or hardware dependencies and is usable from `no_std`-adjacent
//! tooling such as benches and property tests.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
