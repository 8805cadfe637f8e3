//! Response hardening headers.
//!
//! # Responsibilities
//! - Attach a restrictive Content-Security-Policy
//! - Attach HSTS, frame, sniffing, referrer, and permissions policies
//!
//! # Design Decisions
//! - Applied outermost so gate 403s and limiter 429s are hardened too
//! - Values are fixed: the allowances cover the CDNs and SaaS endpoints
//!   the pages actually talk to, nothing per-request

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
    script-src 'self' 'unsafe-inline' https://cdn.tailwindcss.com https://cdn.jsdelivr.net; \
    style-src 'self' 'unsafe-inline' https://cdn.tailwindcss.com; \
    img-src 'self' data: https:; \
    connect-src 'self' https://*.supabase.co https://cdn.clerk.com https://cdn.jsdelivr.net; \
    frame-src 'none'; \
    object-src 'none'";

/// Middleware: add hardening headers to every response.
pub async fn security_headers(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        HeaderName::from_static("x-xss-protection"),
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );

    response
}
