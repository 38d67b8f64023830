//! Request construction.
//!
//! [`ApiRequest::build`] is a pure function of the method name, the caller's
//! argument mapping and the client configuration. It performs no I/O and
//! holds no state between calls, so building the same request twice yields
//! identical URL, verb and parameter sets.
//!
//! Rules, in order:
//! - the method name is normalized and looked up in the descriptor table,
//!   which fixes scheme (`https` iff secure), verb (POST iff marked) and
//!   encoding (multipart iff binary);
//! - an explicit URL, when supplied, replaces endpoint construction but
//!   leaves every other rule in force (used to target the upload endpoint);
//! - a caller-supplied `response_format` argument overrides the configured
//!   format for this call and rewrites the URL suffix;
//! - the credential travels in the body for POST and as the first query
//!   parameter for GET, exactly once;
//! - reserved argument keys (`response_format`, `response_type`, `key`,
//!   `api_key`, `file`) never appear in the generic parameter set.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::format::ResponseFormat;
use crate::method::MethodDescriptor;

/// Query/body parameter name carrying the credential.
pub const API_KEY_PARAM: &str = "key";

/// Argument key designating the file attachment for binary methods.
pub const FILE_PARAM: &str = "file";

/// Argument keys that override the response format for one call.
const FORMAT_PARAMS: &[&str] = &["response_format", "response_type"];

/// Argument keys never forwarded as generic parameters.
const RESERVED_PARAMS: &[&str] = &["response_format", "response_type", "key", "api_key", "file"];

/// Caller-supplied argument mapping.
pub type Params = BTreeMap<String, String>;

/// HTTP request methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    /// GET request - parameters in the URL query string.
    #[default]
    Get,
    /// POST request - parameters in the form body.
    Post,
}

impl HttpMethod {
    /// Uppercase string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// File attachment for a binary-transfer method.
///
/// The builder records the path only; the bytes are read by the transport
/// when the request is sent, keeping construction free of I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Path of the file to attach under the `file` multipart field.
    pub path: PathBuf,
}

/// A fully-formed API request, ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Normalized dot-separated method path.
    pub path: String,
    /// Resolved target URL. For GET this already carries the full query
    /// string, credential first.
    pub url: String,
    /// HTTP verb.
    pub method: HttpMethod,
    /// Body parameters for POST requests (credential included). Empty for
    /// GET, whose parameters live in the URL.
    pub params: BTreeMap<String, String>,
    /// File attachment for binary-transfer methods.
    pub upload: Option<FileUpload>,
    /// Effective response format for this call.
    pub format: ResponseFormat,
}

impl ApiRequest {
    /// Builds a request for `method` with the given arguments.
    ///
    /// # Errors
    ///
    /// Fails fast, before any network activity, with
    /// [`Error::Authentication`] when no API key is configured and with
    /// [`Error::InvalidRequest`] when a binary method is missing its `file`
    /// argument or a format override is not a known format.
    pub fn build(
        method: &str,
        args: &Params,
        config: &ClientConfig,
        explicit_url: Option<&str>,
    ) -> Result<Self> {
        if method.trim().is_empty() {
            return Err(Error::invalid_request("method name is empty"));
        }

        let credential = resolve_credential(args, config)?;
        let descriptor = MethodDescriptor::resolve(method);
        let format = resolve_format(args, config)?;

        let mut url = match explicit_url {
            Some(explicit) => rewrite_suffix(explicit, config.response_format, format),
            None => format!(
                "{}://api.viddler.com/api/v2/{}.{}",
                descriptor.scheme(),
                descriptor.path,
                format.suffix()
            ),
        };

        let mut params: BTreeMap<String, String> = args
            .iter()
            .filter(|(k, _)| !RESERVED_PARAMS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let upload = if descriptor.binary {
            let path = args.get(FILE_PARAM).ok_or_else(|| {
                Error::invalid_request(format!(
                    "{} requires a file parameter",
                    descriptor.path
                ))
            })?;
            Some(FileUpload {
                path: PathBuf::from(path),
            })
        } else {
            None
        };

        let method = if descriptor.post {
            params.insert(API_KEY_PARAM.to_string(), credential);
            HttpMethod::Post
        } else {
            url.push_str(&format!(
                "?{}={}",
                API_KEY_PARAM,
                urlencoding::encode(&credential)
            ));
            for (k, v) in &params {
                url.push_str(&format!("&{}={}", k, urlencoding::encode(v)));
            }
            params.clear();
            HttpMethod::Get
        };

        Ok(Self {
            path: descriptor.path,
            url,
            method,
            params,
            upload,
            format,
        })
    }
}

/// Picks the credential for this call: a caller-supplied `key`/`api_key`
/// argument wins over the configured one.
fn resolve_credential(args: &Params, config: &ClientConfig) -> Result<String> {
    if let Some(value) = args.get("key").or_else(|| args.get("api_key")) {
        if !value.is_empty() {
            return Ok(value.clone());
        }
    }
    if config.api_key.is_empty() {
        return Err(Error::authentication("API key is not set"));
    }
    Ok(config.api_key.expose_secret().to_string())
}

/// Effective response format: per-call override, else the configured one.
fn resolve_format(args: &Params, config: &ClientConfig) -> Result<ResponseFormat> {
    for key in FORMAT_PARAMS {
        if let Some(value) = args.get(*key) {
            return value.parse();
        }
    }
    Ok(config.response_format)
}

/// Applies a per-call format override to an explicitly-supplied URL by
/// swapping its format suffix, when it carries one.
fn rewrite_suffix(url: &str, from: ResponseFormat, to: ResponseFormat) -> String {
    let old = format!(".{}", from.suffix());
    if from != to && url.ends_with(&old) {
        let new = format!(".{}", to.suffix());
        format!("{}{}", &url[..url.len() - old.len()], new)
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new("test-key")
    }

    fn args(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_get_request_has_credential_in_query() {
        let request = ApiRequest::build(
            "users_getProfile",
            &args(&[("user", "phpfunk")]),
            &config(),
            None,
        )
        .unwrap();

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.url,
            "http://api.viddler.com/api/v2/viddler.users.getProfile.json?key=test-key&user=phpfunk"
        );
        assert!(request.params.is_empty());
        assert_eq!(request.url.matches("key=").count(), 1);
    }

    #[test]
    fn test_secure_method_uses_https() {
        let request = ApiRequest::build(
            "users_auth",
            &args(&[("user", "phpfunk"), ("password", "hunter2")]),
            &config(),
            None,
        )
        .unwrap();

        assert!(request.url.starts_with("https://api.viddler.com/api/v2/viddler.users.auth.json"));
    }

    #[test]
    fn test_post_request_carries_credential_in_body() {
        let request = ApiRequest::build(
            "videos_setDetails",
            &args(&[("video_id", "abc123"), ("title", "My Video")]),
            &config(),
            None,
        )
        .unwrap();

        assert_eq!(request.method, HttpMethod::Post);
        assert!(!request.url.contains("key="));
        assert_eq!(request.params.get("key").map(String::as_str), Some("test-key"));
        assert_eq!(request.params.get("video_id").map(String::as_str), Some("abc123"));
        assert_eq!(request.params.get("title").map(String::as_str), Some("My Video"));
    }

    #[test]
    fn test_binary_method_without_file_fails_fast() {
        let err =
            ApiRequest::build("videos_upload", &args(&[("title", "x")]), &config(), None)
                .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_binary_method_attaches_file_and_credential() {
        let request = ApiRequest::build(
            "videos_upload",
            &args(&[("file", "/videos/cat.mp4"), ("title", "Cat")]),
            &config(),
            None,
        )
        .unwrap();

        assert_eq!(request.method, HttpMethod::Post);
        let upload = request.upload.expect("binary request carries an upload");
        assert_eq!(upload.path, PathBuf::from("/videos/cat.mp4"));
        assert_eq!(request.params.get("key").map(String::as_str), Some("test-key"));
        assert_eq!(request.params.get("title").map(String::as_str), Some("Cat"));
        assert!(!request.params.contains_key("file"));
    }

    #[test]
    fn test_format_override_rewrites_suffix_and_is_excluded() {
        let request = ApiRequest::build(
            "videos_getDetails",
            &args(&[("video_id", "abc123"), ("response_format", "xml")]),
            &config(),
            None,
        )
        .unwrap();

        assert!(request.url.contains("viddler.videos.getDetails.xml?"));
        assert_eq!(request.format, ResponseFormat::Xml);
        assert!(!request.url.contains("response_format"));
    }

    #[test]
    fn test_unknown_format_override_is_rejected() {
        let err = ApiRequest::build(
            "videos_getDetails",
            &args(&[("response_format", "yaml")]),
            &config(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn test_explicit_url_overrides_endpoint() {
        let request = ApiRequest::build(
            "videos_upload",
            &args(&[("file", "/videos/cat.mp4")]),
            &config(),
            Some("http://upload.viddler.com/api/v2/viddler.videos.upload.json"),
        )
        .unwrap();

        assert_eq!(
            request.url,
            "http://upload.viddler.com/api/v2/viddler.videos.upload.json"
        );
        // Verb and credential rules still apply.
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.params.get("key").map(String::as_str), Some("test-key"));
    }

    #[test]
    fn test_explicit_url_honors_format_override() {
        let request = ApiRequest::build(
            "videos_upload",
            &args(&[("file", "/videos/cat.mp4"), ("response_format", "xml")]),
            &config(),
            Some("http://upload.viddler.com/api/v2/viddler.videos.upload.json"),
        )
        .unwrap();

        assert_eq!(
            request.url,
            "http://upload.viddler.com/api/v2/viddler.videos.upload.xml"
        );
    }

    #[test]
    fn test_empty_args_yields_credential_only() {
        let request = ApiRequest::build("api_getInfo", &Params::new(), &config(), None).unwrap();
        assert_eq!(
            request.url,
            "http://api.viddler.com/api/v2/viddler.api.getInfo.json?key=test-key"
        );
        assert!(request.params.is_empty());
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let err = ApiRequest::build(
            "users_getProfile",
            &Params::new(),
            &ClientConfig::default(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[test]
    fn test_caller_supplied_key_wins_and_appears_once() {
        let request = ApiRequest::build(
            "users_getProfile",
            &args(&[("key", "caller-key")]),
            &config(),
            None,
        )
        .unwrap();
        assert_eq!(request.url.matches("key=").count(), 1);
        assert!(request.url.ends_with("?key=caller-key"));
    }

    #[test]
    fn test_query_values_are_percent_encoded() {
        let request = ApiRequest::build(
            "videos_search",
            &args(&[("query", "cats & dogs")]),
            &config(),
            None,
        )
        .unwrap();
        assert!(request.url.ends_with("&query=cats%20%26%20dogs"));
    }

    #[test]
    fn test_build_is_idempotent() {
        let arguments = args(&[("video_id", "abc123"), ("title", "My Video")]);
        let first = ApiRequest::build("videos_setDetails", &arguments, &config(), None).unwrap();
        let second = ApiRequest::build("videos_setDetails", &arguments, &config(), None).unwrap();
        assert_eq!(first, second);
    }
}
