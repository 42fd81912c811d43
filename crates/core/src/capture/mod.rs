//! Capture module - turns inbound chat events into stored, committed documents.

mod capture_model;
mod capture_service;
mod capture_traits;
mod frontmatter;

pub use capture_model::{CaptureOutcome, CaptureSettings, ChatEvent, ContentKind, FetchedFile};
pub use capture_service::CaptureService;
pub use capture_traits::ChatPlatform;
pub use frontmatter::{normalize_smart_quotes, render_text_document, Frontmatter};
