use async_trait::async_trait;

use super::{CommitOutcome, RemoteFile};
use crate::errors::Result;

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Writes `content` at `path`, creating the file or overwriting it.
    ///
    /// Implementations look up the current revision first so callers never
    /// deal with the store's optimistic concurrency. Upstream rejections come
    /// back as [`crate::Error::RemoteSync`].
    async fn commit(&self, path: &str, content: &[u8], message: &str) -> Result<CommitOutcome>;

    /// Reads `path`. A missing file is [`crate::Error::NotFound`].
    async fn read(&self, path: &str) -> Result<RemoteFile>;
}
