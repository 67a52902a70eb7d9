//! # Shared
//! The components shared across the profile backup crates: logging,
//! log-context prefixes, and fatal-failure helpers.
//!

#![warn(missing_docs)]

mod context;
mod failure;
mod host;
mod logger;

pub use context::Context;
pub use failure::{Failure, log_and_panic};
pub use host::host_name;
pub use logger::{LoggerError, init_logger};
