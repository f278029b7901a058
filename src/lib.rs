pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod normalize;
pub mod publish;
pub mod render;
pub mod resolver;
pub mod source;
pub mod ui;
pub mod version;
pub mod warning;

pub use error::{ReportError, Result};
