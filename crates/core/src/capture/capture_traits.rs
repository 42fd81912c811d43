use async_trait::async_trait;

use super::FetchedFile;
use crate::errors::Result;
use crate::sessions::ChatId;

/// Outbound side of the chat platform.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<()>;

    /// Resolves a platform file id and downloads its bytes.
    async fn fetch_file(&self, file_id: &str) -> Result<FetchedFile>;
}
