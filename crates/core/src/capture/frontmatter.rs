use chrono::{DateTime, SecondsFormat};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::FRONTMATTER_MARKER;
use crate::errors::Result;

/// Metadata block prepended to captured text. Field order is the on-disk order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontmatter {
    pub title: String,
    pub author: String,
    pub date: String,
    pub timestamp: String,
}

impl Frontmatter {
    pub fn new(title: &str, author: &str, now: DateTime<Tz>) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            date: now.format("%Y-%m-%d").to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }
}

/// Replaces curly quotes with their ASCII counterparts.
pub fn normalize_smart_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            other => other,
        })
        .collect()
}

/// Builds the stored form of a text capture.
///
/// Text that already opens with `---` carries its own frontmatter and is
/// returned unchanged.
pub fn render_text_document(
    text: &str,
    filename: &str,
    author: &str,
    now: DateTime<Tz>,
) -> Result<String> {
    if text.trim().starts_with(FRONTMATTER_MARKER) {
        return Ok(text.to_string());
    }
    let body = normalize_smart_quotes(text);
    let yaml = serde_yaml::to_string(&Frontmatter::new(filename, author, now))?;
    Ok(format!("{FRONTMATTER_MARKER}\n{yaml}{FRONTMATTER_MARKER}\n\n{body}"))
}
