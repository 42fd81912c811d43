//! HTTP client for the GitHub contents API.
//!
//! GitHub refuses to overwrite a file unless the request names the file's
//! current blob `sha`. [`GitHubContentsClient::commit`] performs that lookup
//! itself, so callers get a single "put this content at this path" call.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::{debug, info, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use scrollkeeper_core::errors::{Error, Result};
use scrollkeeper_core::remote::{CommitOutcome, RemoteFile, RemoteFileRef, RemoteStore};
use scrollkeeper_core::utils::filename_utils::check_remote_path;

use crate::models::{ContentsEntry, PutContentsRequest, PutContentsResponse};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default base URL of the GitHub REST API.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

const GITHUB_API_VERSION: &str = "2022-11-28";
const CLIENT_USER_AGENT: &str = concat!("scrollkeeper/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub api_url: String,
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

pub struct GitHubContentsClient {
    client: reqwest::Client,
    base_url: String,
    owner: String,
    repo: String,
    branch: String,
    auth_header: Option<HeaderValue>,
}

impl GitHubContentsClient {
    /// Create a new contents API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the token contains characters that cannot appear in
    /// a header, or if the HTTP client cannot be initialized.
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let auth_header = if config.token.trim().is_empty() {
            None
        } else {
            Some(
                HeaderValue::from_str(&format!("Bearer {}", config.token.trim()))
                    .map_err(|e| Error::Unexpected(format!("Invalid GitHub token format: {}", e)))?,
            )
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            branch: config.branch.clone(),
            auth_header,
        })
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        if let Some(auth) = &self.auth_header {
            headers.insert(AUTHORIZATION, auth.clone());
        }
        headers
    }

    fn contents_url(&self, path: &str) -> Result<String> {
        check_remote_path(path)?;
        let encoded = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        Ok(format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url,
            urlencoding::encode(&self.owner),
            urlencoding::encode(&self.repo),
            encoded
        ))
    }

    /// Fetch the contents entry for `path`, or `None` when GitHub reports 404.
    async fn get_entry(&self, path: &str) -> Result<Option<ContentsEntry>> {
        let url = self.contents_url(path)?;
        debug!("[GitHub] GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await
            .map_err(|e| Error::Unexpected(format!("Request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        // Directories come back as an array of entries.
        let body: serde_json::Value = parse_response(response).await?;
        if body.is_array() {
            return Err(Error::Validation(format!("'{}' is a directory", path)));
        }
        serde_json::from_value(body)
            .map(Some)
            .map_err(|e| Error::Unexpected(format!("Unexpected contents entry for {}: {}", path, e)))
    }

    /// Current blob sha of `path`, if the file exists on the branch.
    pub async fn current_revision(&self, path: &str) -> Result<Option<String>> {
        Ok(self.get_entry(path).await?.map(|entry| entry.sha))
    }

    /// Issue the write described by `file`.
    ///
    /// `file.revision` decides between create (absent) and update (present).
    pub async fn put(&self, file: &RemoteFileRef, message: &str) -> Result<CommitOutcome> {
        let url = self.contents_url(&file.path)?;
        let body = PutContentsRequest {
            message,
            content: BASE64.encode(&file.content),
            branch: &file.branch,
            sha: file.revision.as_deref(),
        };
        debug!(
            "[GitHub] PUT {} ({})",
            url,
            if file.is_update() { "update" } else { "create" }
        );

        let response = self
            .client
            .put(&url)
            .headers(self.headers())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Unexpected(format!("Request failed: {}", e)))?;

        let parsed: PutContentsResponse = parse_response(response).await?;
        Ok(CommitOutcome {
            path: parsed.content.path,
            content_revision: parsed.content.sha,
            commit_revision: parsed.commit.sha,
        })
    }
}

#[async_trait]
impl RemoteStore for GitHubContentsClient {
    async fn commit(&self, path: &str, content: &[u8], message: &str) -> Result<CommitOutcome> {
        let revision = self.current_revision(path).await?;
        let file = RemoteFileRef {
            path: path.to_string(),
            content: content.to_vec(),
            revision,
            branch: self.branch.clone(),
        };
        let outcome = self.put(&file, message).await?;
        info!(
            "[GitHub] {} {} on {}",
            if file.is_update() { "Updated" } else { "Created" },
            outcome.path,
            self.branch
        );
        Ok(outcome)
    }

    async fn read(&self, path: &str) -> Result<RemoteFile> {
        let entry = self
            .get_entry(path)
            .await?
            .ok_or_else(|| Error::NotFound(path.to_string()))?;

        let content = match (entry.content.as_deref(), entry.encoding.as_deref()) {
            (Some(encoded), Some("base64") | None) => decode_wrapped_base64(encoded)?,
            // Files over 1 MB are listed without inline content.
            (_, Some("none")) => {
                return Err(Error::Validation(format!(
                    "'{}' is too large to read through the contents API",
                    entry.path
                )))
            }
            (Some(_), Some(other)) => {
                return Err(Error::Unexpected(format!(
                    "Unsupported content encoding '{}' for {}",
                    other, entry.path
                )))
            }
            (None, _) => Vec::new(),
        };

        Ok(RemoteFile {
            path: entry.path,
            content,
            revision: entry.sha,
            size: entry.size,
        })
    }
}

/// Turn a response into `T`, or into [`Error::RemoteSync`] for any non-2xx status.
async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::Unexpected(format!("Failed to read response: {}", e)))?;

    if !status.is_success() {
        return Err(Error::remote_sync(status.as_u16(), body));
    }

    serde_json::from_str(&body).map_err(|e| {
        warn!("[GitHub] Unparseable response body ({} bytes): {}", body.len(), e);
        Error::Unexpected(format!("Failed to parse response: {}", e))
    })
}

fn decode_wrapped_base64(encoded: &str) -> Result<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64
        .decode(compact)
        .map_err(|e| Error::Unexpected(format!("Invalid base64 content: {}", e)))
}
