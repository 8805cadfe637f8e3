//! HTTP subsystem.
//!
//! # Responsibilities
//! - Router construction and the middleware chain (server.rs)
//! - Request ID stamping (request.rs)
//! - Application error → response mapping (response.rs)

pub mod request;
pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};
