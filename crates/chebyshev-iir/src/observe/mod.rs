//! # Observability
//!
//! Structured logging for applications embedding the designer. The library
//! only emits `tracing` events; installing a subscriber is up to the caller.
//!
//! ```rust,ignore
//! use chebyshev_iir::observe::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::default());
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
