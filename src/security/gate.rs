//! Static-file whitelist and traversal guard.
//!
//! # Responsibilities
//! - Reject traversal-shaped paths before any filesystem access
//! - Reject blocked extensions and blocked path segments with 403
//! - Serve whitelisted assets from the web root, or fall through
//!
//! # Design Decisions
//! - Deny rules are checked before allow rules
//! - Registered application routes bypass the block lists (explicit route
//!   allow-list instead of the fragile substring matching they replace),
//!   but never the traversal heuristics
//! - Segment matching is exact and case-insensitive
//! - A whitelisted path whose file is missing falls through to the router
//!   rather than producing a 404 here (soft-fail)
//! - The decision procedure is pure; only the serve step touches disk

use std::path::{Component, Path, PathBuf};

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::config::{SecurityConfig, StaticSiteConfig};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Outcome of evaluating a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Reject with 403.
    Deny(DenyReason),
    /// Serve this root-relative candidate if it exists, else fall through.
    Serve(String),
    /// Hand the request to the router untouched.
    PassThrough,
}

/// Why a path was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Path contained `..` or `//`.
    Traversal,
    /// Percent-encoding did not decode to valid UTF-8.
    MalformedEncoding,
    /// Extension is on the blocked list.
    BlockedExtension,
    /// A path segment is on the blocked list.
    BlockedSegment,
    /// Resolved path escaped the web root.
    RootEscape,
}

impl DenyReason {
    fn as_str(self) -> &'static str {
        match self {
            DenyReason::Traversal => "traversal",
            DenyReason::MalformedEncoding => "malformed_encoding",
            DenyReason::BlockedExtension => "blocked_extension",
            DenyReason::BlockedSegment => "blocked_segment",
            DenyReason::RootEscape => "root_escape",
        }
    }
}

/// The whitelist/traversal gate.
pub struct StaticGate {
    root: PathBuf,
    blocked_extensions: Vec<String>,
    blocked_segments: Vec<String>,
    allowed_extensions: Vec<String>,
    allowed_paths: Vec<String>,
    allowed_routes: Vec<String>,
    allowed_route_prefixes: Vec<String>,
}

impl StaticGate {
    /// Build a gate from the site layout and security lists.
    ///
    /// Extension and segment lists are normalized to lowercase once here
    /// so per-request matching never allocates for case folding of the
    /// configured side.
    pub fn from_config(site: &StaticSiteConfig, security: &SecurityConfig) -> Self {
        let lower = |values: &[String]| values.iter().map(|v| v.to_lowercase()).collect();
        Self {
            root: site.root.clone(),
            blocked_extensions: lower(&security.blocked_extensions),
            blocked_segments: lower(&security.blocked_segments),
            allowed_extensions: lower(&security.allowed_extensions),
            allowed_paths: security.allowed_paths.clone(),
            allowed_routes: security.allowed_routes.clone(),
            allowed_route_prefixes: security.allowed_route_prefixes.clone(),
        }
    }

    /// Decide what to do with a percent-decoded request path.
    pub fn evaluate(&self, path: &str) -> GateDecision {
        // Traversal heuristics run first and apply to every path, routes
        // included.
        if path.contains("..") || path.contains("//") {
            return GateDecision::Deny(DenyReason::Traversal);
        }

        if self.allowed_routes.iter().any(|route| route == path) {
            return GateDecision::PassThrough;
        }
        if self.allowed_route_prefixes.iter().any(|prefix| {
            path == prefix || path.starts_with(&format!("{}/", prefix))
        }) {
            return GateDecision::PassThrough;
        }

        let ext = extension_of(path);
        if let Some(ext) = &ext {
            if self.blocked_extensions.iter().any(|blocked| blocked == ext) {
                return GateDecision::Deny(DenyReason::BlockedExtension);
            }
        }

        let blocked_segment = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .any(|segment| {
                let segment = segment.to_lowercase();
                self.blocked_segments.iter().any(|blocked| *blocked == segment)
            });
        if blocked_segment {
            return GateDecision::Deny(DenyReason::BlockedSegment);
        }

        let extension_allowed = ext
            .map(|ext| self.allowed_extensions.iter().any(|allowed| *allowed == ext))
            .unwrap_or(false);
        if extension_allowed || self.allowed_paths.iter().any(|allowed| allowed == path) {
            return GateDecision::Serve(path.trim_start_matches('/').to_string());
        }

        GateDecision::PassThrough
    }

    /// Resolve a whitelisted candidate against the web root and read it.
    ///
    /// Returns `Err` if the resolved path escapes the root (re-verified
    /// here even though `evaluate` already rejected traversal shapes),
    /// `Ok(None)` if the file does not exist.
    pub async fn read_static(&self, candidate: &str) -> Result<Option<(String, Vec<u8>)>, DenyReason> {
        let relative = Path::new(candidate);
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
        {
            return Err(DenyReason::RootEscape);
        }

        let resolved = self.root.join(relative);
        if !resolved.starts_with(&self.root) {
            return Err(DenyReason::RootEscape);
        }

        match tokio::fs::read(&resolved).await {
            Ok(bytes) => {
                let mime = mime_guess::from_path(&resolved).first_or_octet_stream();
                Ok(Some((mime.essence_str().to_string(), bytes)))
            }
            Err(_) => Ok(None),
        }
    }
}

/// Extension of the path's final segment, lowercased, dot included.
///
/// A leading dot alone does not make an extension, so dotfiles like
/// `.env` are handled by the segment list instead.
fn extension_of(path: &str) -> Option<String> {
    let segment = path.rsplit('/').next()?;
    match segment.rfind('.') {
        Some(i) if i > 0 => Some(segment[i..].to_lowercase()),
        _ => None,
    }
}

fn deny_response(reason: DenyReason) -> Response {
    metrics::record_gate_rejection(reason.as_str());
    (StatusCode::FORBIDDEN, axum::Json(json!({ "error": "Access Denied" }))).into_response()
}

/// Middleware: gate every request before it reaches a route handler.
pub async fn static_gate(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let raw = request.uri().path();
    let decoded = match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => {
            tracing::warn!(path = %raw, "Rejecting request with malformed percent-encoding");
            return deny_response(DenyReason::MalformedEncoding);
        }
    };

    match state.gate.evaluate(&decoded) {
        GateDecision::Deny(reason) => {
            tracing::warn!(path = %decoded, reason = reason.as_str(), "Request rejected by gate");
            deny_response(reason)
        }
        GateDecision::PassThrough => next.run(request).await,
        GateDecision::Serve(candidate) => match state.gate.read_static(&candidate).await {
            Err(reason) => {
                tracing::warn!(path = %decoded, "Resolved path escaped the web root");
                deny_response(reason)
            }
            Ok(Some((mime, bytes))) => {
                ([(header::CONTENT_TYPE, mime)], bytes).into_response()
            }
            // Whitelisted but absent: soft-fail to the router.
            Ok(None) => next.run(request).await,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> StaticGate {
        StaticGate::from_config(&StaticSiteConfig::default(), &SecurityConfig::default())
    }

    fn gate_rooted(root: &Path) -> StaticGate {
        let site = StaticSiteConfig {
            root: root.to_path_buf(),
            ..StaticSiteConfig::default()
        };
        StaticGate::from_config(&site, &SecurityConfig::default())
    }

    #[test]
    fn traversal_shapes_are_denied() {
        let gate = gate();
        assert_eq!(gate.evaluate("/../etc/passwd"), GateDecision::Deny(DenyReason::Traversal));
        assert_eq!(gate.evaluate("/a/../b.css"), GateDecision::Deny(DenyReason::Traversal));
        assert_eq!(gate.evaluate("//double"), GateDecision::Deny(DenyReason::Traversal));
        // Routes do not bypass the traversal check.
        assert_eq!(gate.evaluate("/admin/.."), GateDecision::Deny(DenyReason::Traversal));
    }

    #[test]
    fn registered_routes_pass_through() {
        let gate = gate();
        assert_eq!(gate.evaluate("/"), GateDecision::PassThrough);
        assert_eq!(gate.evaluate("/admin"), GateDecision::PassThrough);
        assert_eq!(gate.evaluate("/api/config"), GateDecision::PassThrough);
        assert_eq!(gate.evaluate("/api/logs"), GateDecision::PassThrough);
        assert_eq!(gate.evaluate("/.well-known/security.txt"), GateDecision::PassThrough);
    }

    #[test]
    fn route_prefix_match_is_segment_aligned() {
        let gate = gate();
        // A prefix only matches at a segment boundary.
        assert_ne!(gate.evaluate("/.well-known-evil.css"), GateDecision::PassThrough);
    }

    #[test]
    fn blocked_extensions_are_denied() {
        let gate = gate();
        for path in ["/app.js", "/data.json", "/notes.txt", "/schema.sql", "/app.CONFIG"] {
            assert_eq!(
                gate.evaluate(path),
                GateDecision::Deny(DenyReason::BlockedExtension),
                "{path} should be denied"
            );
        }
    }

    #[test]
    fn blocked_segments_are_denied_exactly() {
        let gate = gate();
        assert_eq!(gate.evaluate("/.env"), GateDecision::Deny(DenyReason::BlockedSegment));
        assert_eq!(gate.evaluate("/.git/config"), GateDecision::Deny(DenyReason::BlockedExtension));
        assert_eq!(gate.evaluate("/.git/HEAD"), GateDecision::Deny(DenyReason::BlockedSegment));
        assert_eq!(gate.evaluate("/admin.html"), GateDecision::Deny(DenyReason::BlockedSegment));
        assert_eq!(gate.evaluate("/index.html"), GateDecision::Deny(DenyReason::BlockedSegment));
        // Case-insensitive.
        assert_eq!(gate.evaluate("/ADMIN"), GateDecision::Deny(DenyReason::BlockedSegment));
        // Exact segment matching, not substring: a name merely containing
        // a blocked word is fine.
        assert_eq!(gate.evaluate("/packaged-goods.png"), GateDecision::Serve("packaged-goods.png".into()));
    }

    #[test]
    fn deny_rules_win_over_allow_rules() {
        let gate = gate();
        // Allowed extension under a blocked segment still 403s.
        assert_eq!(
            gate.evaluate("/node_modules/pkg/logo.png"),
            GateDecision::Deny(DenyReason::BlockedSegment)
        );
    }

    #[test]
    fn whitelisted_assets_are_served() {
        let gate = gate();
        assert_eq!(gate.evaluate("/logo.png"), GateDecision::Serve("logo.png".into()));
        assert_eq!(gate.evaluate("/fonts/inter.woff2"), GateDecision::Serve("fonts/inter.woff2".into()));
        assert_eq!(gate.evaluate("/output.css"), GateDecision::Serve("output.css".into()));
        assert_eq!(gate.evaluate("/styles.css"), GateDecision::Serve("styles.css".into()));
    }

    #[test]
    fn unknown_extensions_fall_through() {
        let gate = gate();
        assert_eq!(gate.evaluate("/page.html"), GateDecision::PassThrough);
        assert_eq!(gate.evaluate("/whatever"), GateDecision::PassThrough);
    }

    #[test]
    fn dotfile_has_no_extension() {
        assert_eq!(extension_of("/.env"), None);
        assert_eq!(extension_of("/a/b.CSS"), Some(".css".to_string()));
        assert_eq!(extension_of("/plain"), None);
    }

    #[tokio::test]
    async fn read_static_serves_existing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("output.css"), "body{}").expect("write asset");

        let gate = gate_rooted(dir.path());
        let (mime, bytes) = gate
            .read_static("output.css")
            .await
            .expect("no escape")
            .expect("file exists");
        assert_eq!(mime, "text/css");
        assert_eq!(bytes, b"body{}");
    }

    #[tokio::test]
    async fn read_static_soft_fails_on_missing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gate = gate_rooted(dir.path());
        assert!(gate.read_static("missing.css").await.expect("no escape").is_none());
    }

    #[tokio::test]
    async fn read_static_rejects_absolute_candidates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gate = gate_rooted(dir.path());
        assert_eq!(gate.read_static("/etc/passwd").await, Err(DenyReason::RootEscape));
    }
}
