//! Response formats and body decoding.
//!
//! Viddler endpoints select their wire format through the URL suffix
//! (`.json`, `.xml`, `.php`). The client treats JSON as the native structured
//! mode and deserializes it into a [`serde_json::Value`]; every other format
//! is returned to the caller as raw text, verbatim.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{Error, Result};

/// Wire format requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// JSON, deserialized into a structured value. The default.
    #[default]
    Json,
    /// XML, returned as raw text.
    Xml,
    /// PHP-serialized, returned as raw text.
    Php,
}

impl ResponseFormat {
    /// URL suffix for this format (without the leading dot).
    #[must_use]
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Php => "php",
        }
    }

    /// Whether responses in this format are deserialized rather than
    /// handed back verbatim.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Json)
    }

    /// Decodes a response body according to this format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the body is not valid for the format.
    /// This is deliberately distinct from an empty-body outcome: a malformed
    /// body is terminal, never retried.
    pub fn decode(&self, body: &str) -> Result<ApiResponse> {
        if self.is_structured() {
            let value: Value =
                serde_json::from_str(body).map_err(|e| Error::parse(e.to_string(), body))?;
            Ok(ApiResponse::Structured(value))
        } else {
            Ok(ApiResponse::Raw(body.to_string()))
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for ResponseFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            "php" => Ok(Self::Php),
            other => Err(Error::invalid_request(format!(
                "unsupported response format: {other:?}"
            ))),
        }
    }
}

/// A decoded API response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Structured value decoded from the native JSON format.
    Structured(Value),
    /// Raw response text for the non-structured formats.
    Raw(String),
}

impl ApiResponse {
    /// The structured value, when this response was decoded from JSON.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Structured(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// The raw text, when this response was returned verbatim.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Raw(text) => Some(text),
            Self::Structured(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixes() {
        assert_eq!(ResponseFormat::Json.suffix(), "json");
        assert_eq!(ResponseFormat::Xml.suffix(), "xml");
        assert_eq!(ResponseFormat::Php.suffix(), "php");
    }

    #[test]
    fn test_parse_known_formats() {
        assert_eq!("json".parse::<ResponseFormat>().unwrap(), ResponseFormat::Json);
        assert_eq!("xml".parse::<ResponseFormat>().unwrap(), ResponseFormat::Xml);
        assert_eq!("php".parse::<ResponseFormat>().unwrap(), ResponseFormat::Php);
        assert!("yaml".parse::<ResponseFormat>().is_err());
    }

    #[test]
    fn test_decode_json_is_structured() {
        let response = ResponseFormat::Json
            .decode(r#"{"success": {"apiInfo": {"version": "2.0"}}}"#)
            .unwrap();
        let value = response.as_value().unwrap();
        assert_eq!(value["success"]["apiInfo"]["version"], "2.0");
    }

    #[test]
    fn test_decode_malformed_json_is_parse_error() {
        let err = ResponseFormat::Json.decode("<html>not json</html>").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_decode_xml_is_verbatim() {
        let body = "<?xml version=\"1.0\"?><response/>";
        let response = ResponseFormat::Xml.decode(body).unwrap();
        assert_eq!(response.as_text(), Some(body));
        assert!(response.as_value().is_none());
    }
}
