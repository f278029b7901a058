//! Tag listing abstraction
//!
//! The previous-version lookup only needs one git capability: list the tags
//! matching a glob, newest version first. [TagSource] captures that so the
//! resolver can run against the real `git` binary or an in-memory list.
//!
//! - [repository::GitCli]: runs `git tag -l <pattern> --sort=-version:refname`
//! - [mock::MockTags]: in-memory tags for tests
//!
//! ```rust
//! # use version_report::git::{MockTags, TagSource};
//! let tags = MockTags::new(["vApi/1.2.0", "vApi/1.1.0", "v3.0.0"]);
//! let listed = tags.list_tags("vApi/*").unwrap();
//! assert_eq!(listed, vec!["vApi/1.2.0", "vApi/1.1.0"]);
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockTags;
pub use repository::GitCli;

use crate::error::Result;

/// Lists version tags.
///
/// Ordering is the implementor's job: results come back sorted by descending
/// version, the way `git tag --sort=-version:refname` orders them. Callers
/// never compare versions themselves.
pub trait TagSource {
    /// List tag names matching a glob pattern (e.g. `vApi/*`).
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Matching tags, highest version first; empty when none match
    /// * `Err` - If the tags could not be listed at all
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>>;
}
