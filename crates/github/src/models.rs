//! Wire types for the subset of the contents API we use.

use serde::{Deserialize, Serialize};

/// `GET /repos/{owner}/{repo}/contents/{path}` for a single file.
#[derive(Debug, Deserialize)]
pub(crate) struct ContentsEntry {
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub size: u64,
    /// Base64, wrapped with newlines by GitHub.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Serialize)]
pub(crate) struct PutContentsRequest<'a> {
    pub message: &'a str,
    pub content: String,
    pub branch: &'a str,
    /// Present only when overwriting an existing file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PutContentsResponse {
    pub content: PutContent,
    pub commit: PutCommit,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PutContent {
    pub path: String,
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PutCommit {
    pub sha: String,
}
