//! Output processing and reporting.
//!
//! This module turns collected results into what the operator sees:
//! - ANSI escape code stripping
//! - Per-round, per-host report blocks
//!
//! # Example
//!
//! ```
//! use batch_ssh::output::OutputSanitizer;
//!
//! let raw = b"\x1b[31mRed text\x1b[0m\r\n";
//! let clean = OutputSanitizer::strip_ansi(raw);
//! assert_eq!(clean, "Red text\n");
//! ```

mod report;
mod sanitizer;

pub use report::{
    write_failures, write_round, write_teardown, ReportStyle, NO_RESPONSE, ROUND_HEADER,
};
pub use sanitizer::OutputSanitizer;
