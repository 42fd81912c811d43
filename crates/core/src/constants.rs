/// Filename used for text captures when the chat never declared one.
pub const DEFAULT_TEXT_FILENAME: &str = "scroll.md";

/// Author recorded in frontmatter for chats without a known user.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Number of days in one notation cycle.
pub const NOTATION_CYCLE_LENGTH: i64 = 9;

/// Name reported by the notation endpoint metadata.
pub const NOTATION_SYSTEM_NAME: &str = "spiral";

/// Prefix (case-insensitive) that turns a text message into a filename directive.
pub const SAVE_AS_PREFIX: &str = "save as:";

/// Marker that opens a frontmatter block; text starting with it is stored as-is.
pub const FRONTMATTER_MARKER: &str = "---";
