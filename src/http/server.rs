//! HTTP server setup and route handlers.
//!
//! # Responsibilities
//! - Create the Axum router with all routes and the middleware chain
//! - Own the injected stores (activity log, rate-limit counters, gate)
//! - Serve whitelisted static assets and the page routes
//! - Expose the public config, admin logs, and contact APIs
//! - Run with graceful shutdown, plain HTTP or TLS
//!
//! # Middleware order (request direction)
//! trace → request-id → timeout → body limit → security headers →
//! general limiter → admin limiter → activity log → static gate → routes

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{PublicRuntimeConfig, SiteConfig};
use crate::contact::{ContactForm, SupabaseClient};
use crate::http::request::RequestIdLayer;
use crate::http::response::AppError;
use crate::observability::activity::{self, ActivityLog};
use crate::observability::metrics;
use crate::security::gate::{self, StaticGate};
use crate::security::headers::security_headers;
use crate::security::rate_limit::{self, FixedWindowLimiter};

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub gate: Arc<StaticGate>,
    pub activity: Arc<ActivityLog>,
    pub general_limiter: Arc<FixedWindowLimiter>,
    pub admin_limiter: Arc<FixedWindowLimiter>,
    pub supabase: Option<Arc<SupabaseClient>>,
}

/// HTTP server for the site.
pub struct HttpServer {
    router: Router,
    config: SiteConfig,
}

impl HttpServer {
    /// Create a new server with the given configuration.
    pub fn new(config: SiteConfig) -> Self {
        let general = &config.rate_limit.general;
        let admin = &config.rate_limit.admin;

        let state = AppState {
            gate: Arc::new(StaticGate::from_config(&config.site, &config.security)),
            activity: Arc::new(ActivityLog::new(config.activity_log.capacity)),
            general_limiter: Arc::new(FixedWindowLimiter::new(
                general.max_requests,
                Duration::from_secs(general.window_secs),
            )),
            admin_limiter: Arc::new(FixedWindowLimiter::new(
                admin.max_requests,
                Duration::from_secs(admin.window_secs),
            )),
            supabase: SupabaseClient::from_config(&config.supabase).map(Arc::new),
            config: Arc::new(config.clone()),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &SiteConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/", get(landing_page))
            .route("/admin", get(admin_page))
            .route("/healthz", get(healthz))
            .route("/api/config", get(runtime_config))
            .route("/api/logs", get(activity_logs))
            .route("/api/contact", post(submit_contact))
            .route("/.well-known/{*rest}", any(well_known))
            .fallback(not_found)
            .with_state(state.clone())
            // Layers run bottom-up on the way in: the gate is the last
            // stop before the routes, the limiters run before the log.
            .layer(middleware::from_fn_with_state(state.clone(), gate::static_gate))
            .layer(middleware::from_fn_with_state(state.clone(), activity::record_activity))
            .layer(middleware::from_fn_with_state(state.clone(), rate_limit::admin_rate_limit))
            .layer(middleware::from_fn_with_state(state.clone(), rate_limit::general_rate_limit));

        if config.security.enable_headers {
            router = router.layer(middleware::from_fn(security_headers));
        }

        router
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.listener.request_timeout_secs)))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server on the given listener until shutdown is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS until shutdown is signalled.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: axum_server::tls_rustls::RustlsConfig,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let graceful = handle.clone();
        tokio::spawn(async move {
            shutdown_signal(shutdown).await;
            graceful.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(app)
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }
}

/// Wait for Ctrl-C or an internal shutdown trigger.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(error) = result {
                tracing::error!(%error, "Failed to install Ctrl+C handler");
            }
        }
        _ = shutdown.recv() => {}
    }
    tracing::info!("Shutdown signal received");
}

fn page_path(state: &AppState, file: &str) -> PathBuf {
    state.config.site.root.join(file)
}

async fn read_page(state: &AppState, file: &str) -> Result<String, AppError> {
    let path = page_path(state, file);
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read {}: {}", path.display(), error)))
}

/// `GET /` — the landing page.
async fn landing_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let landing = state.config.site.landing_page.clone();
    read_page(&state, &landing).await.map(Html)
}

/// `GET /admin` — the admin page (admin rate limiter applies upstream).
async fn admin_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let admin = state.config.site.admin_page.clone();
    read_page(&state, &admin).await.map(Html)
}

/// `GET /healthz` — liveness probe.
async fn healthz() -> &'static str {
    "ok"
}

/// `GET /api/config` — non-secret runtime configuration for the browser.
///
/// Re-reads the environment on every call; absent variables surface as
/// `null`. No caching, no validation of the values.
async fn runtime_config() -> Json<serde_json::Value> {
    let public = PublicRuntimeConfig::from_env();
    Json(json!({
        "clerk": {
            "publishableKey": public.clerk_publishable_key,
        },
        "supabase": {
            "url": public.supabase_url,
            "key": public.supabase_key,
        },
        "social": {
            "instagram": public.instagram_url,
            "whatsapp": public.whatsapp_number,
        },
    }))
}

/// `GET /api/logs` — the newest activity entries, admin-authenticated.
async fn activity_logs(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match token {
        Some(token) if token == state.config.admin.api_key => {
            let entries = state.activity.tail(state.config.activity_log.api_page_size);
            Json(entries).into_response()
        }
        _ => (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response(),
    }
}

/// `POST /api/contact` — validate, sanitize, and persist a lead record.
async fn submit_contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Response, AppError> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let submission = form.sanitize();
    let client = state.supabase.as_ref().ok_or(AppError::NotConfigured)?;

    match client.insert(&submission).await {
        Ok(()) => {
            tracing::info!(endpoint = client.endpoint(), "Contact submission stored");
            metrics::record_contact_submission("accepted");
            Ok((
                StatusCode::CREATED,
                Json(json!({
                    "message": "Thank you for your interest! We will contact you shortly."
                })),
            )
                .into_response())
        }
        Err(error) => {
            metrics::record_contact_submission("failed");
            Err(AppError::Persistence(error))
        }
    }
}

/// `GET /.well-known/*` — system probes are ignored outright.
async fn well_known() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Catch-all: serve the landing page body with a 404 status.
async fn not_found(State(state): State<AppState>) -> Response {
    let landing = state.config.site.landing_page.clone();
    match read_page(&state, &landing).await {
        Ok(body) => (StatusCode::NOT_FOUND, Html(body)).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}
