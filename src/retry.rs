//! Bounded-retry combinator.
//!
//! The attempt loop is an explicit combinator over an async operation, a
//! retryability predicate and a maximum attempt count. No retry state lives
//! anywhere else: the counter is local to one invocation, so independent
//! calls never see each other's attempts.
//!
//! Attempts run strictly one after another. The first success wins and is
//! returned immediately; a non-retryable error surfaces as-is; spending the
//! whole budget wraps the final error in [`Error::Exhausted`].

use std::future::Future;

use tracing::{debug, error, warn};

use crate::config::RetryPolicy;
use crate::error::{Error, Result};

/// Runs `operation` up to `policy.max_attempts` times.
///
/// The operation receives the 1-based attempt number. `is_retryable` decides
/// whether a failed attempt may be followed by another one; the policy's
/// delay (zero by default) is slept between attempts.
///
/// # Errors
///
/// Propagates non-retryable errors immediately and returns
/// [`Error::Exhausted`] when every attempt failed.
pub async fn run_with_retry<T, F, Fut, P>(
    policy: &RetryPolicy,
    is_retryable: P,
    mut operation: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&Error) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation(attempt).await {
            Ok(value) => {
                debug!(attempt, "attempt succeeded");
                return Ok(value);
            }
            Err(e) if !is_retryable(&e) => {
                error!(attempt, error = %e, "attempt failed, not retrying");
                return Err(e);
            }
            Err(e) if attempt >= max_attempts => {
                error!(
                    attempts = max_attempts,
                    error = %e,
                    "retry budget exhausted"
                );
                return Err(Error::exhausted(max_attempts, e));
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = policy.delay.as_millis() as u64,
                    error = %e,
                    "attempt failed, retrying"
                );
                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
                attempt += 1;
            }
        }
    }
}
