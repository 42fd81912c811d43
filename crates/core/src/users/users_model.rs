use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::sessions::ChatId;

/// A person allowed to use the proxy API and whose chats are attributed to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub name: String,
    pub api_key: String,
    /// Reference date for this user's notation labels.
    pub epoch_date: NaiveDate,
    #[serde(default)]
    pub chat_ids: Vec<ChatId>,
}
