//! Scrollkeeper Telegram - Bot API client and webhook payload types.

mod client;
mod models;

pub use client::{TelegramClient, DEFAULT_TELEGRAM_API_URL};
pub use models::{Chat, Message, PhotoSize, Update, User};
