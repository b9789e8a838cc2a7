// GitHub Contents API client. A single blocking PUT is all the tool
// needs, so the client stays small and synchronous. The `ContentsApi`
// trait is the seam the push command talks to; `GithubClient` is the
// real implementation on top of `reqwest::blocking`.

use crate::error::PushError;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use tracing::debug;

/// Default API root, overridable with [`API_URL_ENV`].
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Environment variable holding an alternative API root.
pub const API_URL_ENV: &str = "BLOG_TOOL_API_URL";
/// Media type pinned for every request.
pub const GITHUB_V3_JSON: &str = "application/vnd.github.v3+json";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Body of a create-or-update-file request. `remote_path` only shapes the
/// URL and never appears in the JSON.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
    pub message: String,
    /// File bytes, standard padded base64 without line breaks.
    #[serde(rename = "content")]
    pub content_base64: String,
    /// Blob SHA of the file being replaced; GitHub wants it for updates.
    #[serde(rename = "sha", skip_serializing_if = "Option::is_none")]
    pub blob_sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip)]
    pub remote_path: String,
}

/// Basic auth credentials. The username doubles as the repository owner.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

/// Status and raw body of an API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Anything able to PUT a file body to the Contents API.
pub trait ContentsApi {
    fn put_file(
        &self,
        credentials: &Credentials,
        repository: &str,
        remote_path: &str,
        body: Vec<u8>,
    ) -> Result<ApiResponse, PushError>;
}

/// `{base}/repos/{owner}/{repo}/contents{remote_path}`.
///
/// `remote_path` is appended verbatim; callers provide the leading `/`.
pub fn contents_url(base_url: &str, owner: &str, repository: &str, remote_path: &str) -> String {
    format!(
        "{}/repos/{}/{}/contents{}",
        base_url.trim_end_matches('/'),
        owner,
        repository,
        remote_path
    )
}

/// Blocking client for the GitHub REST API.
#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    base_url: String,
}

impl GithubClient {
    /// Create a client for `BLOG_TOOL_API_URL`, falling back to
    /// `https://api.github.com`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.into());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(GithubClient {
            client,
            base_url: base_url.into(),
        })
    }
}

impl ContentsApi for GithubClient {
    fn put_file(
        &self,
        credentials: &Credentials,
        repository: &str,
        remote_path: &str,
        body: Vec<u8>,
    ) -> Result<ApiResponse, PushError> {
        let url = contents_url(&self.base_url, &credentials.username, repository, remote_path);
        debug!(%url, bytes = body.len(), "PUT contents");

        let res = self
            .client
            .put(&url)
            .header(ACCEPT, GITHUB_V3_JSON)
            .header(CONTENT_TYPE, "application/json")
            .basic_auth(&credentials.username, Some(&credentials.token))
            .body(body)
            .send()?;

        let status = res.status().as_u16();
        let body = res.text().unwrap_or_else(|_| "".into());
        debug!(status, "response received");
        Ok(ApiResponse { status, body })
    }
}
