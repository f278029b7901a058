//! Console output for people watching the run.
//!
//! The rendered report is the only thing written to stdout; everything here
//! goes to stderr so the report can be piped or redirected cleanly.

pub mod formatter;

pub use formatter::{
    display_error, display_run_summary, display_status, display_success, display_warning,
};
