use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use scrollkeeper_telegram::Update;
use serde::Serialize;

use crate::main_lib::AppState;

const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl WebhookResponse {
    fn ok() -> Json<Self> {
        Json(Self {
            ok: true,
            error: None,
        })
    }

    fn failed(error: impl Into<String>) -> Json<Self> {
        Json(Self {
            ok: false,
            error: Some(error.into()),
        })
    }
}

/// Telegram webhook. Always answers 200 so the platform never retries
/// because of our own failures; problems are reported in the body.
pub async fn receive_update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<WebhookResponse> {
    if let Some(expected) = state.webhook_secret.as_deref() {
        let supplied = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if supplied != Some(expected) {
            tracing::warn!("Dropping webhook call with a missing or wrong secret token");
            return WebhookResponse::failed("invalid webhook secret");
        }
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(err) => {
            tracing::error!("Unparseable webhook payload: {}", err);
            return WebhookResponse::failed(format!("invalid update payload: {}", err));
        }
    };

    let update_id = update.update_id;
    match state.capture_service.handle(update.into_event()).await {
        Ok(outcome) => {
            tracing::debug!("Update {} handled: {:?}", update_id, outcome);
            WebhookResponse::ok()
        }
        Err(err) => {
            tracing::error!("Exception in webhook handler for update {}: {}", update_id, err);
            WebhookResponse::failed(err.to_string())
        }
    }
}
