use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::ChatId;
use crate::errors::{Error, Result};

/// Storage for the last filename each chat declared.
///
/// Writes are last-write-wins; no ordering is promised between concurrent
/// calls for the same chat.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Records `filename` as the chat's current target, replacing any prior value.
    async fn set(&self, chat_id: ChatId, filename: &str) -> Result<()>;

    /// Returns the last filename set for the chat, if any.
    async fn get(&self, chat_id: ChatId) -> Result<Option<String>>;
}

/// Process-local session store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<ChatId, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn set(&self, chat_id: ChatId, filename: &str) -> Result<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| Error::Unexpected("Session store lock poisoned".into()))?;
        sessions.insert(chat_id, filename.to_string());
        Ok(())
    }

    async fn get(&self, chat_id: ChatId) -> Result<Option<String>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| Error::Unexpected("Session store lock poisoned".into()))?;
        Ok(sessions.get(&chat_id).cloned())
    }
}
