//! The Viddler API client.
//!
//! One [`Client`] holds the immutable configuration, the transport and the
//! attempt-log sink. Every call builds its request, runs the bounded attempt
//! loop and decodes the winning response; all per-call state lives on the
//! stack of that call, so a single client is safely shareable across tasks.

use std::sync::Arc;
use std::time::Instant;

use tracing::instrument;

use crate::attempt_log::{AttemptLogger, AttemptRecord, FileAttemptLogger, NoopAttemptLogger};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::format::ApiResponse;
use crate::request::{ApiRequest, Params};
use crate::retry::run_with_retry;
use crate::transport::{HttpTransport, Transport};

/// Client for the Viddler v2 REST API.
///
/// # Example
///
/// ```rust,no_run
/// use viddler::{Client, ClientConfig, Params};
///
/// # async fn example() -> viddler::Result<()> {
/// let client = Client::new(ClientConfig::new("YOUR KEY"))?;
///
/// let mut params = Params::new();
/// params.insert("user".into(), "phpfunk".into());
/// let profile = client.call("users_getProfile", params).await?;
/// # Ok(())
/// # }
/// ```
pub struct Client {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    logger: Arc<dyn AttemptLogger>,
}

impl Client {
    /// Creates a client with the production HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Creates a client over a custom [`Transport`].
    ///
    /// Used by tests to drive the attempt loop with stubs, and by callers
    /// that need a specially-configured transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let logger: Arc<dyn AttemptLogger> = match &config.log_path {
            Some(path) => Arc::new(FileAttemptLogger::new(path)),
            None => Arc::new(NoopAttemptLogger),
        };
        Self {
            config,
            transport,
            logger,
        }
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Calls an API method.
    ///
    /// `method` uses the underscore convention (`users_getProfile`); dotted
    /// paths are accepted as well. Arguments map string keys to string
    /// values; binary methods additionally require a `file` argument naming
    /// the file to attach.
    ///
    /// # Errors
    ///
    /// Precondition failures (missing credential or file argument) surface
    /// before any network activity. Transient failures are retried up to the
    /// configured budget; the final failure is wrapped in
    /// [`Error::Exhausted`]. A malformed body for the active response format
    /// is an [`Error::Parse`] and is never retried.
    pub async fn call(&self, method: &str, params: Params) -> Result<ApiResponse> {
        let request = ApiRequest::build(method, &params, &self.config, None)?;
        self.dispatch(request).await
    }

    /// Calls an API method against an explicit URL.
    ///
    /// The URL replaces endpoint construction (typically to target the
    /// dedicated upload endpoint); verb, encoding and credential rules for
    /// the method still apply.
    pub async fn call_with_url(
        &self,
        method: &str,
        params: Params,
        url: &str,
    ) -> Result<ApiResponse> {
        let request = ApiRequest::build(method, &params, &self.config, Some(url))?;
        self.dispatch(request).await
    }

    #[instrument(
        name = "viddler_call",
        skip(self, request),
        fields(method = %request.path, url = %request.url)
    )]
    async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse> {
        let started = Instant::now();
        let policy = self.config.retry;
        let request = &request;

        let body = run_with_retry(&policy, Error::is_retryable, |attempt| async move {
            let attempt_started = Instant::now();
            let outcome = self.transport.send(request).await;

            let (status, response_text, response_time) = match &outcome {
                Ok(o) => (Some(o.status), o.body.clone(), o.elapsed),
                Err(e) => (e.status_code(), e.to_string(), attempt_started.elapsed()),
            };
            self.logger.record(&AttemptRecord {
                attempt,
                max_attempts: policy.max_attempts,
                status,
                response: &response_text,
                response_time,
                total_time: started.elapsed(),
            });

            outcome.and_then(crate::transport::AttemptOutcome::into_body)
        })
        .await?;

        request.format.decode(&body)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
