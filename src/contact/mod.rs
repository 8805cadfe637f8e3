//! Contact submission subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/contact
//!     → form.rs (validate: collect ALL errors, reject with 422)
//!     → form.rs (sanitize: trim, truncate, stamp submitted_at)
//!     → supabase.rs (single-attempt REST insert)
//!     → 201 on success / generic error on failure
//! ```

pub mod form;
pub mod supabase;

pub use form::{ContactForm, ContactSubmission};
pub use supabase::{SupabaseClient, SupabaseError};
