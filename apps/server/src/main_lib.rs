use std::sync::Arc;

use chrono_tz::Tz;
use scrollkeeper_core::{
    capture::{CaptureService, CaptureSettings, ChatPlatform},
    documents::LocalDocumentStore,
    remote::RemoteStore,
    sessions::{InMemorySessionStore, SessionStore},
    users::UserDirectory,
};
use scrollkeeper_github::GitHubContentsClient;
use scrollkeeper_telegram::TelegramClient;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    config::{Config, SessionBackend},
    sessions::FileSessionStore,
};

pub struct AppState {
    pub capture_service: Arc<CaptureService>,
    pub documents: LocalDocumentStore,
    pub remote_store: Arc<dyn RemoteStore>,
    pub users: Arc<UserDirectory>,
    pub timezone: Tz,
    pub journal_unit: String,
    pub webhook_secret: Option<String>,
}

pub fn init_tracing() {
    let log_format = std::env::var("SCROLL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    tokio::fs::create_dir_all(&config.data_dir).await?;
    tracing::info!("Capture directory in use: {}", config.data_dir.display());

    let sessions: Arc<dyn SessionStore> = match &config.session_backend {
        SessionBackend::Memory => {
            tracing::warn!("Sessions are kept in memory and will not survive a restart");
            Arc::new(InMemorySessionStore::new())
        }
        SessionBackend::File(path) => {
            tracing::info!("Session file: {}", path.display());
            Arc::new(FileSessionStore::new(path.clone()))
        }
    };

    let users = match &config.users_file {
        Some(path) => UserDirectory::load(path)?,
        None => {
            tracing::warn!("SCROLL_USERS_FILE not set; every credential-gated route will answer 403");
            UserDirectory::default()
        }
    };
    let users = Arc::new(users);

    if config.github.token.is_empty() {
        tracing::warn!("GITHUB_TOKEN not set; commits will be rejected upstream");
    }
    let remote_store: Arc<dyn RemoteStore> = Arc::new(GitHubContentsClient::new(&config.github)?);

    if config.telegram.bot_token.is_empty() {
        tracing::warn!("TELEGRAM_BOT_TOKEN not set; chat replies will fail");
    }
    let chat: Arc<dyn ChatPlatform> = Arc::new(TelegramClient::new(
        &config.telegram.api_url,
        &config.telegram.bot_token,
    )?);

    let documents = LocalDocumentStore::new(config.data_dir.clone());
    let capture_service = Arc::new(CaptureService::new(
        sessions,
        remote_store.clone(),
        chat,
        documents.clone(),
        users.clone(),
        CaptureSettings {
            timezone: config.timezone,
            ..CaptureSettings::default()
        },
    ));

    Ok(Arc::new(AppState {
        capture_service,
        documents,
        remote_store,
        users,
        timezone: config.timezone,
        journal_unit: config.journal_unit.clone(),
        webhook_secret: config.telegram.webhook_secret.clone(),
    }))
}
