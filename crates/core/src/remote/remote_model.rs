use serde::Serialize;

/// A pending write against the remote store.
///
/// `revision` is the store's current content hash for `path`. It must be
/// present to overwrite an existing file and absent to create a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileRef {
    pub path: String,
    pub content: Vec<u8>,
    pub revision: Option<String>,
    pub branch: String,
}

impl RemoteFileRef {
    pub fn is_update(&self) -> bool {
        self.revision.is_some()
    }
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitOutcome {
    pub path: String,
    pub content_revision: String,
    pub commit_revision: String,
}

/// A file fetched from the remote store, already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub path: String,
    pub content: Vec<u8>,
    pub revision: String,
    pub size: u64,
}

impl RemoteFile {
    pub fn content_lossy(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}
