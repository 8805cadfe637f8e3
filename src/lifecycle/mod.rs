//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init tracing/metrics → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl-C or Shutdown::trigger() → stop accepting → drain → exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
