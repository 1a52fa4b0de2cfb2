#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub, clippy::pedantic)]
#![allow(clippy::redundant_pub_crate)]

//! Administrative CLI for Micro Integrator runtimes.
//!
//! Layout:
//! - `cli.rs`: argument parsing and command dispatch
//! - `commands/`: command handlers grouped by concern
//! - `artifact.rs`: per-artifact descriptors (paths, arity, default formats)
//! - `resolver.rs`: descriptor + target to management API path
//! - `client.rs`: shared HTTP client, session-bound API client, and errors
//! - `template.rs`, `fields.rs`: the `--format` template dialect and the
//!   fields each payload exposes to it
//! - `output.rs`: renderers and column alignment
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod artifact;
pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod fields;
pub(crate) mod output;
pub(crate) mod resolver;
pub(crate) mod template;

pub use cli::run;
