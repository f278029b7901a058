use std::cell::{Cell, RefCell};

use crate::error::{ReportError, Result};
use crate::publish::github::{CommentApi, IssueComment};

/// A comment operation recorded by [`MockComments`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentCall {
    List(u64),
    Create { number: u64, body: String },
    Update { id: u64, body: String },
}

/// In-memory comment thread for testing the publisher without network access
pub struct MockComments {
    comments: RefCell<Vec<IssueComment>>,
    calls: RefCell<Vec<CommentCall>>,
    next_id: Cell<u64>,
    fail: bool,
}

impl MockComments {
    pub fn new() -> Self {
        MockComments {
            comments: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            next_id: Cell::new(1000),
            fail: false,
        }
    }

    /// Seed an existing comment
    pub fn with_comment(self, id: u64, body: impl Into<String>) -> Self {
        self.comments.borrow_mut().push(IssueComment {
            id,
            body: Some(body.into()),
        });
        self
    }

    /// Make every API call fail
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<CommentCall> {
        self.calls.borrow().clone()
    }

    pub fn comments(&self) -> Vec<IssueComment> {
        self.comments.borrow().clone()
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            Err(ReportError::github("Bad credentials"))
        } else {
            Ok(())
        }
    }
}

impl Default for MockComments {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentApi for MockComments {
    fn list_comments(&self, number: u64) -> Result<Vec<IssueComment>> {
        self.calls.borrow_mut().push(CommentCall::List(number));
        self.check()?;
        Ok(self.comments())
    }

    fn create_comment(&self, number: u64, body: &str) -> Result<IssueComment> {
        self.calls.borrow_mut().push(CommentCall::Create {
            number,
            body: body.to_string(),
        });
        self.check()?;

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let comment = IssueComment {
            id,
            body: Some(body.to_string()),
        };
        self.comments.borrow_mut().push(comment.clone());
        Ok(comment)
    }

    fn update_comment(&self, comment_id: u64, body: &str) -> Result<IssueComment> {
        self.calls.borrow_mut().push(CommentCall::Update {
            id: comment_id,
            body: body.to_string(),
        });
        self.check()?;

        let mut comments = self.comments.borrow_mut();
        let comment = comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| ReportError::github(format!("Comment {} not found", comment_id)))?;
        comment.body = Some(body.to_string());
        Ok(comment.clone())
    }
}
