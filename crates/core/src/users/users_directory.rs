use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;

use super::UserAccount;
use crate::constants::UNKNOWN_AUTHOR;
use crate::errors::{Error, Result};
use crate::sessions::ChatId;

#[derive(Debug, Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<UserAccount>,
}

/// Immutable lookup table built once at startup.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<UserAccount>,
}

impl UserDirectory {
    pub fn new(users: Vec<UserAccount>) -> Self {
        let mut seen = std::collections::HashSet::new();
        for user in &users {
            if !seen.insert(user.api_key.as_str()) {
                warn!("Duplicate API key configured for user '{}'", user.name);
            }
        }
        Self { users }
    }

    /// Loads a JSON document of the form `{"users": [...]}`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: UsersFile = serde_json::from_str(raw)?;
        Ok(Self::new(parsed.users))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Unexpected(format!("Failed to read users file {}: {}", path.display(), e))
        })?;
        let directory = Self::from_json(&raw)?;
        debug!(
            "Loaded {} user(s) from {}",
            directory.users.len(),
            path.display()
        );
        Ok(directory)
    }

    /// Finds the account owning `api_key`. Blank keys never match.
    pub fn find_by_api_key(&self, api_key: &str) -> Option<&UserAccount> {
        let candidate = api_key.trim();
        if candidate.is_empty() {
            return None;
        }
        self.users.iter().find(|u| u.api_key == candidate)
    }

    pub fn find_by_chat(&self, chat_id: ChatId) -> Option<&UserAccount> {
        self.users.iter().find(|u| u.chat_ids.contains(&chat_id))
    }

    /// Author name used in capture frontmatter.
    pub fn display_name_for_chat(&self, chat_id: ChatId) -> String {
        self.find_by_chat(chat_id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
