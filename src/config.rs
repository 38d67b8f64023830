//! Client configuration types.
//!
//! [`ClientConfig`] is immutable once the client is constructed; every
//! per-call value (URL, parameter set, attempt counter) lives on the stack of
//! the call instead, so a single client can be shared across tasks.

use std::path::PathBuf;
use std::time::Duration;

use crate::credentials::SecretString;
use crate::format::ResponseFormat;

/// Retry policy for API requests.
///
/// The observed API behaves best with immediate retries, so the default
/// delay is zero; a bounded fixed delay can be configured when hammering the
/// endpoint is undesirable. The first non-empty response always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::ZERO,
        }
    }
}

/// Configuration for a [`Client`](crate::client::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Opaque API key identifying the caller.
    pub api_key: SecretString,
    /// Default response format; individual calls may override it with a
    /// `response_format` argument.
    pub response_format: ResponseFormat,
    /// Retry policy for the attempt loop.
    pub retry: RetryPolicy,
    /// Per-attempt request timeout. Always finite.
    pub timeout: Duration,
    /// TCP connection timeout.
    pub connect_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// When set, a human-readable record of every attempt is appended to
    /// this file.
    pub log_path: Option<PathBuf>,
    /// Disables TLS peer verification. Off by default; only enable this to
    /// reach self-signed test endpoints, never in production.
    pub danger_accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: SecretString::default(),
            response_format: ResponseFormat::default(),
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("viddler-rust/", env!("CARGO_PKG_VERSION")).to_string(),
            log_path: None,
            danger_accept_invalid_certs: false,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with the given API key and defaults for
    /// everything else.
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Returns a builder for fluent construction.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, key: impl Into<SecretString>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Sets the default response format.
    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.config.response_format = format;
        self
    }

    /// Sets the maximum number of attempts per call.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.retry.max_attempts = attempts;
        self
    }

    /// Sets the delay between attempts.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry.delay = delay;
        self
    }

    /// Sets the per-attempt request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets the User-Agent header value.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Enables the per-attempt log file at the given path.
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_path = Some(path.into());
        self
    }

    /// Disables TLS peer verification. Only for self-signed test endpoints.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.danger_accept_invalid_certs = accept;
        self
    }

    /// Finalizes the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retry_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.delay, Duration::ZERO);
    }

    #[test]
    fn test_default_config_is_safe() {
        let config = ClientConfig::default();
        assert!(!config.danger_accept_invalid_certs);
        assert_eq!(config.response_format, ResponseFormat::Json);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.log_path.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .api_key("abc123")
            .response_format(ResponseFormat::Xml)
            .max_attempts(3)
            .retry_delay(Duration::from_millis(250))
            .timeout(Duration::from_secs(5))
            .log_path("/tmp/viddler.log")
            .build();

        assert_eq!(config.api_key.expose_secret(), "abc123");
        assert_eq!(config.response_format, ResponseFormat::Xml);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay, Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.log_path.as_deref(), Some(std::path::Path::new("/tmp/viddler.log")));
    }
}
