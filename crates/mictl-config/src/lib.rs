#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub, clippy::pedantic)]

//! File-backed environment and credential store for the CLI.
//!
//! Layout: `model.rs` (persisted document and the `Session` handed to the API
//! client), `validate.rs` (name/URL checks), `store.rs` (`EnvironmentStore` +
//! the `CredentialSource` seam), `error.rs`.

pub mod error;
pub mod model;
pub mod store;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use model::{EnvironmentEntry, EnvironmentsDocument, Session};
pub use store::{CredentialSource, ENVIRONMENTS_FILE, EnvironmentStore};
