//! Secure credential type with automatic memory zeroization.
//!
//! The Viddler API key is an opaque string that identifies the caller. It is
//! held in a [`SecretString`] so the memory is overwritten with zeros when
//! dropped and so accidental `Debug`/`Display` output stays redacted.
//!
//! # Example
//!
//! ```rust
//! use viddler::credentials::SecretString;
//!
//! let api_key = SecretString::new("my-api-key");
//! let key_value = api_key.expose_secret();
//!
//! // Debug output is redacted
//! println!("{:?}", api_key); // Prints: [REDACTED]
//! ```

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A secure string that is automatically zeroed when dropped.
///
/// Use this for the API key and any other sensitive value. Debug and Display
/// implementations are redacted to prevent accidental logging.
#[derive(Clone, Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Creates a new secret string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value.
    ///
    /// # Security
    ///
    /// Use the returned reference immediately; do not persist it.
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Whether the secret is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl Default for SecretString {
    fn default() -> Self {
        Self(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expose_secret() {
        let secret = SecretString::new("api-key-12345");
        assert_eq!(secret.expose_secret(), "api-key-12345");
        assert!(!secret.is_empty());
    }

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretString::new("top-secret");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
        assert_eq!(format!("{secret}"), "[REDACTED]");
    }

    #[test]
    fn test_default_is_empty() {
        assert!(SecretString::default().is_empty());
    }
}
