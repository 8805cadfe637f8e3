//! End-to-end tests for the security gate, routes, and rate limiting.

use serde_json::Value;

mod common;

#[tokio::test]
async fn whitelisted_stylesheet_is_served() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (addr, _shutdown) = common::spawn_server(common::site_config(dir.path())).await;

    let res = common::client()
        .get(format!("http://{}/output.css", addr))
        .send()
        .await
        .expect("server reachable");

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers().get("content-type").and_then(|v| v.to_str().ok()),
        Some("text/css")
    );
    assert_eq!(res.text().await.expect("body"), "body { margin: 0 }");
}

#[tokio::test]
async fn missing_whitelisted_asset_falls_through_to_404() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (addr, _shutdown) = common::spawn_server(common::site_config(dir.path())).await;

    let res = common::client()
        .get(format!("http://{}/absent.css", addr))
        .send()
        .await
        .expect("server reachable");

    // Soft-fail: the gate falls through and the catch-all serves the
    // landing body with a 404 status.
    assert_eq!(res.status(), 404);
    assert!(res.text().await.expect("body").contains("landing page body"));
}

#[tokio::test]
async fn encoded_traversal_is_denied() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (addr, _shutdown) = common::spawn_server(common::site_config(dir.path())).await;

    // A literal ".." would be collapsed by the client's URL parser before
    // it ever left the test, so encode the separator instead.
    for path in ["/..%2fsecret.css", "//etc/passwd"] {
        let res = common::client()
            .get(format!("http://{}{}", addr, path))
            .send()
            .await
            .expect("server reachable");
        assert_eq!(res.status(), 403, "{path} should be denied");
        let body: Value = res.json().await.expect("json body");
        assert_eq!(body["error"], "Access Denied");
    }
}

#[tokio::test]
async fn blocked_extensions_and_segments_are_denied() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (addr, _shutdown) = common::spawn_server(common::site_config(dir.path())).await;

    for path in ["/notes.txt", "/data.json", "/.env", "/node_modules/pkg/logo.png", "/admin.html"] {
        let res = common::client()
            .get(format!("http://{}{}", addr, path))
            .send()
            .await
            .expect("server reachable");
        assert_eq!(res.status(), 403, "{path} should be denied");
    }
}

#[tokio::test]
async fn page_routes_are_reachable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (addr, _shutdown) = common::spawn_server(common::site_config(dir.path())).await;
    let client = common::client();

    let res = client.get(format!("http://{}/", addr)).send().await.expect("landing");
    assert_eq!(res.status(), 200);
    assert!(res.text().await.expect("body").contains("landing page body"));

    // The admin page is served through its route even though admin.html
    // is blocked as a direct static path.
    let res = client.get(format!("http://{}/admin", addr)).send().await.expect("admin");
    assert_eq!(res.status(), 200);
    assert!(res.text().await.expect("body").contains("admin page body"));
}

#[tokio::test]
async fn well_known_probes_get_404() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (addr, _shutdown) = common::spawn_server(common::site_config(dir.path())).await;

    let res = common::client()
        .get(format!("http://{}/.well-known/security.txt", addr))
        .send()
        .await
        .expect("server reachable");
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn fallback_serves_landing_body_with_404() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (addr, _shutdown) = common::spawn_server(common::site_config(dir.path())).await;

    let res = common::client()
        .get(format!("http://{}/no-such-page", addr))
        .send()
        .await
        .expect("server reachable");
    assert_eq!(res.status(), 404);
    assert!(res.text().await.expect("body").contains("landing page body"));
}

#[tokio::test]
async fn responses_carry_hardening_headers_and_request_id() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (addr, _shutdown) = common::spawn_server(common::site_config(dir.path())).await;

    let res = common::client()
        .get(format!("http://{}/", addr))
        .send()
        .await
        .expect("server reachable");

    let headers = res.headers();
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert!(headers.get("content-security-policy").is_some());
    assert!(headers.get("strict-transport-security").is_some());
    assert!(headers.get("x-request-id").is_some());

    // Gate rejections are hardened too.
    let res = common::client()
        .get(format!("http://{}/data.json", addr))
        .send()
        .await
        .expect("server reachable");
    assert_eq!(res.status(), 403);
    assert_eq!(res.headers().get("x-frame-options").unwrap(), "DENY");
}

#[tokio::test]
async fn logs_api_requires_the_admin_token() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (addr, _shutdown) = common::spawn_server(common::site_config(dir.path())).await;
    let client = common::client();

    // Generate some traffic first.
    for _ in 0..3 {
        let _ = client.get(format!("http://{}/", addr)).send().await.expect("traffic");
    }

    let res = client.get(format!("http://{}/api/logs", addr)).send().await.expect("no auth");
    assert_eq!(res.status(), 401);

    let res = client
        .get(format!("http://{}/api/logs", addr))
        .header("Authorization", "Bearer wrong-key")
        .send()
        .await
        .expect("wrong key");
    assert_eq!(res.status(), 401);

    let res = client
        .get(format!("http://{}/api/logs", addr))
        .header("Authorization", "Bearer test-admin-key")
        .send()
        .await
        .expect("right key");
    assert_eq!(res.status(), 200);

    let entries: Vec<Value> = res.json().await.expect("json body");
    assert!(entries.len() >= 3);
    assert!(entries.len() <= 50);
    let first = &entries[0];
    assert_eq!(first["ip"], "127.0.0.1");
    assert_eq!(first["method"], "GET");
    assert!(first["timestamp"].is_string());
}

#[tokio::test]
async fn general_rate_limit_rejects_over_quota() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = common::site_config(dir.path());
    config.rate_limit.general.max_requests = 3;
    config.rate_limit.general.window_secs = 60;
    let (addr, _shutdown) = common::spawn_server(config).await;
    let client = common::client();

    for _ in 0..3 {
        let res = client.get(format!("http://{}/", addr)).send().await.expect("in quota");
        assert_eq!(res.status(), 200);
    }

    let res = client.get(format!("http://{}/", addr)).send().await.expect("over quota");
    assert_eq!(res.status(), 429);
    assert!(res.headers().get("retry-after").is_some());
    assert_eq!(
        res.text().await.expect("body"),
        "Too many requests, please try again later"
    );
}

#[tokio::test]
async fn admin_rate_limit_is_independent_and_scoped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = common::site_config(dir.path());
    config.rate_limit.admin.max_requests = 2;
    config.rate_limit.admin.window_secs = 60;
    let (addr, _shutdown) = common::spawn_server(config).await;
    let client = common::client();

    // Non-admin traffic does not count against the admin window.
    for _ in 0..3 {
        let res = client.get(format!("http://{}/", addr)).send().await.expect("general");
        assert_eq!(res.status(), 200);
    }

    for _ in 0..2 {
        let res = client.get(format!("http://{}/admin", addr)).send().await.expect("in quota");
        assert_eq!(res.status(), 200);
    }

    let res = client.get(format!("http://{}/admin", addr)).send().await.expect("over quota");
    assert_eq!(res.status(), 429);
    assert_eq!(res.text().await.expect("body"), "Admin access too frequent");
}

#[tokio::test]
async fn config_endpoint_reflects_the_environment() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (addr, _shutdown) = common::spawn_server(common::site_config(dir.path())).await;

    std::env::set_var("CLERK_PUBLISHABLE_KEY", "pk_test_123");
    std::env::set_var("INSTAGRAM_URL", "https://instagram.com/example");

    let res = common::client()
        .get(format!("http://{}/api/config", addr))
        .send()
        .await
        .expect("server reachable");
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.expect("json body");
    assert_eq!(body["clerk"]["publishableKey"], "pk_test_123");
    assert_eq!(body["social"]["instagram"], "https://instagram.com/example");
    // Unset variables surface as null, not as an error.
    assert!(body["social"]["whatsapp"].is_null());
}
