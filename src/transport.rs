//! Transport executor.
//!
//! [`Transport`] performs exactly one network call per invocation and never
//! retries internally; the retry loop lives in [`crate::retry`]. The trait
//! seam exists so tests can drive the retry controller with stub transports.
//!
//! The production implementation, [`HttpTransport`], wraps a shared
//! `reqwest::Client`. TLS peer verification is on by default; the
//! `danger_accept_invalid_certs` configuration knob is the only opt-out and
//! exists for self-signed test endpoints.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::request::{ApiRequest, FILE_PARAM, HttpMethod};

/// Raw outcome of a single attempt that reached the HTTP layer.
#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body (possibly empty).
    pub body: String,
    /// Wall-clock duration of this attempt.
    pub elapsed: Duration,
}

impl AttemptOutcome {
    /// Whether this outcome counts as a success: status 200 with a
    /// non-empty body.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == 200 && !self.body.is_empty()
    }

    /// Converts the outcome into its body, classifying failures for the
    /// retry predicate.
    pub fn into_body(self) -> Result<String> {
        if self.status != 200 {
            Err(Error::status(self.status, self.body))
        } else if self.body.is_empty() {
            Err(Error::EmptyResponse)
        } else {
            Ok(self.body)
        }
    }
}

/// A side-effecting sender of built requests.
///
/// Implementations perform one blocking network call per `send` and report
/// the raw outcome; classification and retrying happen in the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] for transport-level failures that never
    /// produced an HTTP status (connection, TLS, timeout).
    async fn send(&self, request: &ApiRequest) -> Result<AttemptOutcome>;
}

/// Production transport on top of `reqwest`.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds the transport from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(config.danger_accept_invalid_certs)
            .build()
            .map_err(|e| Error::network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(
        name = "viddler_send",
        skip(self, request),
        fields(method = request.method.as_str(), url = %request.url)
    )]
    async fn send(&self, request: &ApiRequest) -> Result<AttemptOutcome> {
        let started = Instant::now();

        let builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => {
                let builder = self.client.post(&request.url);
                if request.upload.is_some() {
                    builder.multipart(multipart_form(request).await?)
                } else {
                    builder.form(&request.params)
                }
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("failed to read response body: {e}")))?;
        let elapsed = started.elapsed();

        let body_preview: String = body.chars().take(200).collect();
        debug!(
            status,
            body_length = body.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            body_preview = %body_preview,
            "HTTP response received"
        );

        Ok(AttemptOutcome {
            status,
            body,
            elapsed,
        })
    }
}

/// Assembles the multipart body for a binary-transfer request: every
/// parameter as a text field plus the file attachment under `file`.
async fn multipart_form(request: &ApiRequest) -> Result<Form> {
    let upload = request
        .upload
        .as_ref()
        .ok_or_else(|| Error::invalid_request("binary request without an upload"))?;

    let mut form = Form::new();
    for (key, value) in &request.params {
        form = form.text(key.clone(), value.clone());
    }

    let bytes = tokio::fs::read(&upload.path).await.map_err(|e| {
        Error::invalid_request(format!(
            "cannot read upload file {}: {e}",
            upload.path.display()
        ))
    })?;
    let file_name = upload
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("upload"));

    Ok(form.part(FILE_PARAM, Part::bytes(bytes).file_name(file_name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: u16, body: &str) -> AttemptOutcome {
        AttemptOutcome {
            status,
            body: body.to_string(),
            elapsed: Duration::from_millis(10),
        }
    }

    #[test]
    fn test_success_requires_200_and_nonempty_body() {
        assert!(outcome(200, "{}").is_success());
        assert!(!outcome(200, "").is_success());
        assert!(!outcome(503, "busy").is_success());
    }

    #[test]
    fn test_non_200_classified_as_status_error() {
        let err = outcome(503, "busy").into_body().unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_empty_body_classified_as_empty_response() {
        let err = outcome(200, "").into_body().unwrap_err();
        assert!(matches!(err, Error::EmptyResponse));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_successful_outcome_yields_body() {
        assert_eq!(outcome(200, "ok").into_body().unwrap(), "ok");
    }
}
