//! Logging setup for the auction binaries
//!
//! Reports go to stdout; everything emitted through `tracing` goes to stderr
//! so the two never interleave in a captured report.
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("lobx", LogFormat::Compact, false)?;
//! ```

pub mod logging;

pub use logging::{init_logging, LogFormat};
