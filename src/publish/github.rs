use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReportError, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const PER_PAGE: usize = 100;

/// One comment on an issue or pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
}

/// The three comment operations the publisher needs.
pub trait CommentApi {
    /// List every comment on the issue or pull request, oldest first
    fn list_comments(&self, number: u64) -> Result<Vec<IssueComment>>;

    fn create_comment(&self, number: u64, body: &str) -> Result<IssueComment>;

    fn update_comment(&self, comment_id: u64, body: &str) -> Result<IssueComment>;
}

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: String,
}

/// Blocking client for the GitHub issue comments REST API.
pub struct GitHubClient {
    client: Client,
    api_url: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Create a client for `owner/repo`, authenticated with `token`.
    pub fn new(api_url: &str, repository: &str, token: &str) -> Result<Self> {
        let (owner, repo) = split_repository(repository).ok_or_else(|| {
            ReportError::github(format!(
                "Invalid repository '{}', expected owner/repo",
                repository
            ))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ReportError::github("GitHub token contains invalid characters"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(concat!("version-report/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(GitHubClient {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            owner,
            repo,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url, self.owner, self.repo, path
        )
    }

    fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request.send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().unwrap_or_default();
        let message = serde_json::from_str::<GitHubErrorBody>(&text)
            .map(|e| e.message)
            .unwrap_or(text);
        Err(ReportError::github(format!(
            "{} failed with status {}: {}",
            what, status, message
        )))
    }
}

impl CommentApi for GitHubClient {
    fn list_comments(&self, number: u64) -> Result<Vec<IssueComment>> {
        let url = self.repo_url(&format!("issues/{}/comments", number));
        let mut comments = Vec::new();

        for page in 1.. {
            debug!(%url, page, "listing PR comments");
            let request = self
                .client
                .get(&url)
                .query(&[("per_page", PER_PAGE), ("page", page)]);
            let batch: Vec<IssueComment> = self.send(request, "Listing comments")?.json()?;
            let done = batch.len() < PER_PAGE;
            comments.extend(batch);
            if done {
                break;
            }
        }

        Ok(comments)
    }

    fn create_comment(&self, number: u64, body: &str) -> Result<IssueComment> {
        let url = self.repo_url(&format!("issues/{}/comments", number));
        debug!(%url, "creating PR comment");
        let request = self.client.post(&url).json(&CommentBody { body });
        Ok(self.send(request, "Creating comment")?.json()?)
    }

    fn update_comment(&self, comment_id: u64, body: &str) -> Result<IssueComment> {
        let url = self.repo_url(&format!("issues/comments/{}", comment_id));
        debug!(%url, "updating PR comment");
        let request = self.client.patch(&url).json(&CommentBody { body });
        Ok(self.send(request, "Updating comment")?.json()?)
    }
}

/// A connected [GitHubClient], or the reason one could not be built.
///
/// Every call on an unavailable client fails with that reason, so the
/// publisher reports the real cause in its comment warning.
pub enum CommentClient {
    Ready(GitHubClient),
    Unavailable(String),
}

impl CommentClient {
    pub fn connect(api_url: &str, repository: &str, token: &str) -> Self {
        match GitHubClient::new(api_url, repository, token) {
            Ok(client) => CommentClient::Ready(client),
            Err(e) => {
                debug!(error = %e, "GitHub client unavailable");
                let reason = match e {
                    ReportError::GitHub(message) => message,
                    other => other.to_string(),
                };
                CommentClient::Unavailable(reason)
            }
        }
    }

    fn ready(&self) -> Result<&GitHubClient> {
        match self {
            CommentClient::Ready(client) => Ok(client),
            CommentClient::Unavailable(reason) => Err(ReportError::github(reason.clone())),
        }
    }
}

impl CommentApi for CommentClient {
    fn list_comments(&self, number: u64) -> Result<Vec<IssueComment>> {
        self.ready()?.list_comments(number)
    }

    fn create_comment(&self, number: u64, body: &str) -> Result<IssueComment> {
        self.ready()?.create_comment(number, body)
    }

    fn update_comment(&self, comment_id: u64, body: &str) -> Result<IssueComment> {
        self.ready()?.update_comment(comment_id, body)
    }
}

/// Splits `owner/repo`, rejecting empty parts and extra segments.
pub fn split_repository(repository: &str) -> Option<(String, String)> {
    let (owner, repo) = repository.trim().split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}
