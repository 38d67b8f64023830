//! Static method-descriptor table.
//!
//! Every Viddler v2 API method is addressed by a dot-separated path such as
//! `viddler.users.getProfile`. Callers may spell the method with underscores
//! (`users_getProfile`) and may omit the `viddler` prefix; both are
//! normalized here before lookup.
//!
//! The table is configuration data fixed at build time: it records which
//! methods must travel over TLS, which must use POST, and which carry a file
//! attachment. Methods absent from every list are plain HTTP GETs, which is
//! the API's default.

use std::collections::HashSet;

use lazy_static::lazy_static;

const VENDOR_PREFIX: &str = "viddler.";

/// Methods that require HTTPS.
const SECURE_METHODS: &[&str] = &["viddler.users.auth"];

/// Methods that require POST.
const POST_METHODS: &[&str] = &[
    "viddler.encoding.cancel",
    "viddler.encoding.encode",
    "viddler.encoding.setOptions",
    "viddler.groups.addVideo",
    "viddler.groups.join",
    "viddler.groups.leave",
    "viddler.groups.removeVideo",
    "viddler.playlists.addVideo",
    "viddler.playlists.create",
    "viddler.playlists.delete",
    "viddler.playlists.moveVideo",
    "viddler.playlists.removeVideo",
    "viddler.playlists.setDetails",
    "viddler.users.acceptFriendRequest",
    "viddler.users.ignoreFriendRequest",
    "viddler.users.sendFriendRequest",
    "viddler.users.setOptions",
    "viddler.users.setProfile",
    "viddler.users.setSettings",
    "viddler.users.subscribe",
    "viddler.users.unsubscribe",
    "viddler.videos.comments.add",
    "viddler.videos.comments.remove",
    "viddler.videos.delFile",
    "viddler.videos.delete",
    "viddler.videos.disableAds",
    "viddler.videos.enableAds",
    "viddler.videos.favorite",
    "viddler.videos.setDetails",
    "viddler.videos.setPermalink",
    "viddler.videos.setThumbnail",
    "viddler.videos.unfavorite",
    "viddler.videos.upload",
];

/// Methods whose request body carries a file attachment.
const BINARY_METHODS: &[&str] = &["viddler.videos.setThumbnail", "viddler.videos.upload"];

lazy_static! {
    static ref SECURE_SET: HashSet<&'static str> = SECURE_METHODS.iter().copied().collect();
    static ref POST_SET: HashSet<&'static str> = POST_METHODS.iter().copied().collect();
    static ref BINARY_SET: HashSet<&'static str> = BINARY_METHODS.iter().copied().collect();
}

/// Transport/verb/encoding requirements for one API method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Normalized dot-separated method path, e.g. `viddler.users.auth`.
    pub path: String,
    /// Whether the method must be called over HTTPS.
    pub secure: bool,
    /// Whether the method must be called with POST.
    pub post: bool,
    /// Whether the request body carries a file attachment.
    pub binary: bool,
}

impl MethodDescriptor {
    /// Resolves the descriptor for a caller-supplied method name.
    ///
    /// Accepts `users_auth`, `users.auth`, `viddler_users_auth` and
    /// `viddler.users.auth` interchangeably. Methods not present in any list
    /// resolve to a plain-HTTP GET descriptor.
    #[must_use]
    pub fn resolve(method: &str) -> Self {
        let path = normalize(method);
        let key = path.as_str();
        Self {
            secure: SECURE_SET.contains(key),
            post: POST_SET.contains(key),
            binary: BINARY_SET.contains(key),
            path,
        }
    }

    /// URL scheme implied by the transport requirement.
    #[must_use]
    pub fn scheme(&self) -> &'static str {
        if self.secure { "https" } else { "http" }
    }
}

/// Normalizes a caller-supplied method name to the vendor's dot path.
fn normalize(method: &str) -> String {
    let dotted = method.replace('_', ".");
    if dotted.starts_with(VENDOR_PREFIX) || dotted == "viddler" {
        dotted
    } else {
        format!("{VENDOR_PREFIX}{dotted}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_underscores_and_prefix() {
        assert_eq!(normalize("users_auth"), "viddler.users.auth");
        assert_eq!(normalize("users.auth"), "viddler.users.auth");
        assert_eq!(normalize("viddler_users_auth"), "viddler.users.auth");
        assert_eq!(normalize("viddler.users.auth"), "viddler.users.auth");
    }

    #[test]
    fn test_auth_requires_tls() {
        let descriptor = MethodDescriptor::resolve("users_auth");
        assert_eq!(descriptor.path, "viddler.users.auth");
        assert!(descriptor.secure);
        assert_eq!(descriptor.scheme(), "https");
        assert!(!descriptor.post);
        assert!(!descriptor.binary);
    }

    #[test]
    fn test_upload_is_binary_post() {
        let descriptor = MethodDescriptor::resolve("videos_upload");
        assert!(descriptor.post);
        assert!(descriptor.binary);
        assert!(!descriptor.secure);
        assert_eq!(descriptor.scheme(), "http");
    }

    #[test]
    fn test_set_thumbnail_is_binary_post() {
        let descriptor = MethodDescriptor::resolve("videos_setThumbnail");
        assert!(descriptor.post);
        assert!(descriptor.binary);
    }

    #[test]
    fn test_unlisted_method_defaults_to_plain_get() {
        let descriptor = MethodDescriptor::resolve("users_getProfile");
        assert_eq!(descriptor.path, "viddler.users.getProfile");
        assert!(!descriptor.secure);
        assert!(!descriptor.post);
        assert!(!descriptor.binary);
    }

    #[test]
    fn test_playlist_mutations_are_post() {
        for method in ["playlists_create", "playlists_delete", "playlists_setDetails"] {
            assert!(MethodDescriptor::resolve(method).post, "{method} should POST");
        }
    }

    #[test]
    fn test_binary_methods_are_all_post() {
        for path in super::BINARY_METHODS {
            assert!(MethodDescriptor::resolve(path).post, "{path} should POST");
        }
    }
}
