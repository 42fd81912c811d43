use std::{collections::HashMap, io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::{fs, sync::Mutex};

use scrollkeeper_core::{
    sessions::{ChatId, SessionStore},
    Result,
};

const CURRENT_VERSION: u32 = 1;

/// Session store persisted as a single JSON document.
///
/// Every write rewrites the whole map through a temp file and a rename, so a
/// crash mid-write leaves the previous state intact.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

#[derive(Serialize, Deserialize, Default)]
struct SessionsFile {
    version: u32,
    sessions: HashMap<String, String>,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    async fn load_locked(&self) -> Result<HashMap<String, String>> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.is_empty() {
            return Ok(HashMap::new());
        }
        let file: SessionsFile = serde_json::from_slice(&raw)?;
        Ok(file.sessions)
    }

    async fn persist_locked(&self, sessions: HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let file = SessionsFile {
            version: CURRENT_VERSION,
            sessions,
        };
        let json = serde_json::to_string_pretty(&file)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn set(&self, chat_id: ChatId, filename: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut sessions = self.load_locked().await?;
        sessions.insert(chat_id.to_string(), filename.to_string());
        self.persist_locked(sessions).await
    }

    async fn get(&self, chat_id: ChatId) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        let sessions = self.load_locked().await?;
        Ok(sessions.get(&chat_id.to_string()).cloned())
    }
}
