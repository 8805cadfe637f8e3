//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overlay: PORT, SUPABASE_*, ADMIN_API_KEY)
//!     → validation.rs (semantic checks)
//!     → SiteConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults so running with no file at all is valid
//! - Validation separates syntactic (serde) from semantic checks
//! - The public `/api/config` payload is NOT part of this snapshot: it is
//!   re-read from the environment on every request

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::PublicRuntimeConfig;
pub use schema::SecurityConfig;
pub use schema::SiteConfig;
pub use schema::StaticSiteConfig;
