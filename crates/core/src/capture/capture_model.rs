use chrono_tz::Tz;

use crate::constants::{DEFAULT_TEXT_FILENAME, SAVE_AS_PREFIX};
use crate::remote::CommitOutcome;
use crate::sessions::ChatId;
use crate::utils::time_utils::DEFAULT_REFERENCE_TZ;

/// An inbound chat message, reduced to what the capture flow needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// "save as: <name>" - changes the chat's target filename.
    Directive { chat_id: ChatId, raw_name: String },
    Text { chat_id: ChatId, text: String },
    /// A photo, identified by the platform's id for its largest rendition.
    Photo { chat_id: ChatId, file_id: String },
    /// Anything without text or a photo.
    Ignored,
}

impl ChatEvent {
    /// Classifies a text message as a directive or content.
    pub fn from_text(chat_id: ChatId, text: impl Into<String>) -> Self {
        let text = text.into();
        let is_directive = text
            .get(..SAVE_AS_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(SAVE_AS_PREFIX));
        if is_directive {
            let raw_name = text
                .split_once(':')
                .map(|(_, rest)| rest.trim().to_string())
                .unwrap_or_default();
            ChatEvent::Directive { chat_id, raw_name }
        } else {
            ChatEvent::Text { chat_id, text }
        }
    }

    pub fn chat_id(&self) -> Option<ChatId> {
        match self {
            ChatEvent::Directive { chat_id, .. }
            | ChatEvent::Text { chat_id, .. }
            | ChatEvent::Photo { chat_id, .. } => Some(*chat_id),
            ChatEvent::Ignored => None,
        }
    }
}

/// A file downloaded from the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    /// Platform-side path, e.g. `photos/file_3.jpg`.
    pub remote_path: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Photo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    FilenameSet {
        filename: String,
    },
    /// The directive's name sanitized to nothing; the session was left alone.
    FilenameRejected,
    Saved {
        filename: String,
        kind: ContentKind,
        commit: CommitOutcome,
    },
    Ignored,
}

#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub default_text_filename: String,
    /// Zone used for the frontmatter date and timestamp.
    pub timezone: Tz,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            default_text_filename: DEFAULT_TEXT_FILENAME.to_string(),
            timezone: DEFAULT_REFERENCE_TZ,
        }
    }
}
