#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub, clippy::pedantic)]

//! Logging primitives shared across the mictl workspace.
//!
//! Layout: `init.rs` (subscriber installation and configuration), `error.rs`
//! (installation failures).

pub mod error;
pub mod init;

pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, VERBOSE_LOG_LEVEL, init_logging};
