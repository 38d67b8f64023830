//! Viddler v2 API client.
//!
//! A typed client for the Viddler video-hosting REST API. A call names a
//! logical method (`users_getProfile` or `users.getProfile`) and supplies an
//! argument mapping; the client resolves transport security, HTTP verb and
//! encoding from a static method table, injects the API key, retries
//! empty/failed responses up to a configurable bound and decodes the winning
//! response in the active format.
//!
//! # Features
//!
//! - **Explicit dispatch**: one typed [`Client::call`] entry point over a
//!   static method-descriptor table, no reflection.
//! - **Bounded retry**: first non-empty response wins; the retry budget and
//!   optional inter-attempt delay are configuration.
//! - **File upload**: binary methods (`videos_upload`, `videos_setThumbnail`)
//!   send multipart bodies with the `file` argument attached.
//! - **Safe defaults**: TLS peer verification on, finite per-attempt
//!   timeout, zeroized credential storage.
//!
//! # Example
//!
//! ```rust,no_run
//! use viddler::{Client, ClientConfig, Params, ResponseFormat};
//!
//! # async fn example() -> viddler::Result<()> {
//! let config = ClientConfig::builder()
//!     .api_key("YOUR KEY")
//!     .response_format(ResponseFormat::Json)
//!     .build();
//! let client = Client::new(config)?;
//!
//! let mut params = Params::new();
//! params.insert("user".into(), "phpfunk".into());
//! let profile = client.call("users_getProfile", params).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Global suppressions: common library patterns that would otherwise need
// scattered local annotations.
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_possible_truncation)]

// Re-exports of external dependencies
pub use serde_json;

// Core modules
pub mod attempt_log;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod format;
pub mod logging;
pub mod method;
pub mod request;
pub mod retry;
pub mod transport;

// Re-exports of core types for convenience
pub use attempt_log::{AttemptLogger, AttemptRecord, FileAttemptLogger, NoopAttemptLogger};
pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder, RetryPolicy};
pub use credentials::SecretString;
pub use error::{Error, Result};
pub use format::{ApiResponse, ResponseFormat};
pub use method::MethodDescriptor;
pub use request::{ApiRequest, FileUpload, HttpMethod, Params};
pub use transport::{AttemptOutcome, HttpTransport, Transport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::client::Client;
    pub use crate::config::{ClientConfig, RetryPolicy};
    pub use crate::error::{Error, Result};
    pub use crate::format::{ApiResponse, ResponseFormat};
    pub use crate::request::Params;
}
