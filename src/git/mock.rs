use regex::Regex;
use std::cell::RefCell;
use std::collections::HashSet;

use crate::error::{ReportError, Result};
use crate::git::TagSource;

/// In-memory tag list for tests.
///
/// Tags are kept in the order given, which callers use to stand in for git's
/// descending version sort. Patterns follow git's `tag -l` globbing, where
/// `*` also matches `/`.
pub struct MockTags {
    tags: Vec<String>,
    failing_patterns: HashSet<String>,
    queries: RefCell<Vec<String>>,
}

impl MockTags {
    /// Create a mock holding the given tags, highest version first
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockTags {
            tags: tags.into_iter().map(Into::into).collect(),
            failing_patterns: HashSet::new(),
            queries: RefCell::new(Vec::new()),
        }
    }

    /// Make listing the given pattern fail
    pub fn fail_on(mut self, pattern: impl Into<String>) -> Self {
        self.failing_patterns.insert(pattern.into());
        self
    }

    /// Patterns queried so far, in call order
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

impl Default for MockTags {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let escaped = regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");
    Regex::new(&format!("^{}$", escaped))
        .map_err(|e| ReportError::tag(format!("Invalid tag pattern '{}': {}", pattern, e)))
}

impl TagSource for MockTags {
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>> {
        self.queries.borrow_mut().push(pattern.to_string());

        if self.failing_patterns.contains(pattern) {
            return Err(ReportError::tag(format!("listing '{}' failed", pattern)));
        }

        let re = glob_to_regex(pattern)?;
        Ok(self
            .tags
            .iter()
            .filter(|tag| re.is_match(tag))
            .cloned()
            .collect())
    }
}
