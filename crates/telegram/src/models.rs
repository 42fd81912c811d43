use serde::{Deserialize, Serialize};

use scrollkeeper_core::capture::ChatEvent;
use scrollkeeper_core::sessions::ChatId;

/// Incoming webhook update. Only the fields the capture flow reads are modelled.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
    /// Available sizes of a photo, smallest first.
    #[serde(default)]
    pub photo: Option<Vec<PhotoSize>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl Update {
    /// Maps the update onto a capture event. Text wins over photos, and the
    /// largest (last) photo size is the one captured.
    pub fn into_event(self) -> ChatEvent {
        let Some(message) = self.message else {
            return ChatEvent::Ignored;
        };
        let chat_id = ChatId(message.chat.id);

        if let Some(text) = message.text {
            return ChatEvent::from_text(chat_id, text);
        }

        match message.photo.and_then(|sizes| sizes.into_iter().last()) {
            Some(largest) => ChatEvent::Photo {
                chat_id,
                file_id: largest.file_id,
            },
            None => ChatEvent::Ignored,
        }
    }
}

/// Standard Bot API envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct TelegramResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TelegramFile {
    pub file_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    pub disable_web_page_preview: bool,
}
