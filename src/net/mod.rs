//! Network helpers: TLS loading and certificate generation.
//!
//! # Design Decisions
//! - The server only consumes certificates from configured PEM paths
//! - `cert.rs` generates a development pair on demand (via the CLI); it
//!   is deliberately not part of the listen path

pub mod cert;
pub mod tls;

pub use cert::{generate_self_signed, SelfSignedCert};
