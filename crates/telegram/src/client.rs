use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;

use scrollkeeper_core::capture::{ChatPlatform, FetchedFile};
use scrollkeeper_core::errors::{Error, Result};
use scrollkeeper_core::sessions::ChatId;

use crate::models::{SendMessageRequest, TelegramFile, TelegramResponse};

/// Default timeout for Bot API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

pub struct TelegramClient {
    client: Client,
    /// `<api>/bot<token>`
    method_base: String,
    /// `<api>/file/bot<token>`
    file_base: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, bot_token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;
        let api_url = api_url.trim_end_matches('/');
        Ok(Self {
            client,
            method_base: format!("{api_url}/bot{bot_token}"),
            file_base: format!("{api_url}/file/bot{bot_token}"),
        })
    }

    async fn get_file_path(&self, file_id: &str) -> Result<String> {
        let url = format!("{}/getFile", self.method_base);
        let response = self
            .client
            .get(url)
            .query(&[("file_id", file_id)])
            .send()
            .await
            .map_err(|e| Error::Chat(format!("getFile request failed: {}", e.without_url())))?;

        let file: TelegramFile = unwrap_envelope(response, "getFile").await?;
        file.file_path
            .ok_or_else(|| Error::Chat(format!("Telegram returned no file_path for {}", file_id)))
    }

    async fn download(&self, file_path: &str) -> Result<Vec<u8>> {
        let url = format!("{}/{}", self.file_base, file_path);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Chat(format!("File download failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Chat(format!(
                "File download for {} returned {}",
                file_path, status
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Chat(format!("Failed to read file body: {}", e.without_url())))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ChatPlatform for TelegramClient {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<()> {
        let url = format!("{}/sendMessage", self.method_base);
        let body = SendMessageRequest {
            chat_id: chat_id.0,
            text,
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Chat(format!("sendMessage request failed: {}", e.without_url())))?;

        let _: serde_json::Value = unwrap_envelope(response, "sendMessage").await?;
        debug!("[Telegram] Sent message to chat {}", chat_id);
        Ok(())
    }

    async fn fetch_file(&self, file_id: &str) -> Result<FetchedFile> {
        let remote_path = self.get_file_path(file_id).await?;
        let bytes = self.download(&remote_path).await?;
        debug!(
            "[Telegram] Downloaded {} ({} bytes)",
            remote_path,
            bytes.len()
        );
        Ok(FetchedFile { remote_path, bytes })
    }
}

/// Reads a Bot API envelope, turning HTTP errors and `ok: false` into [`Error::Chat`].
async fn unwrap_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
    method: &str,
) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::Chat(format!("Failed to read {} response: {}", method, e.without_url())))?;

    let envelope: TelegramResponse<T> = serde_json::from_str(&body).map_err(|_| {
        Error::Chat(format!(
            "telegram {} failed with {}: {}",
            method,
            status,
            body.chars().take(200).collect::<String>()
        ))
    })?;

    if !status.is_success() || !envelope.ok {
        let description = envelope
            .description
            .unwrap_or_else(|| format!("telegram {} failed", method));
        return Err(Error::Chat(description));
    }

    envelope
        .result
        .ok_or_else(|| Error::Chat(format!("telegram {} returned no result", method)))
}
