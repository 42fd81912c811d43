use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::{anyhow, Context};
use chrono_tz::Tz;
use scrollkeeper_core::utils::time_utils::{parse_timezone, DEFAULT_REFERENCE_TZ};
use scrollkeeper_github::{GitHubConfig, DEFAULT_GITHUB_API_URL};
use scrollkeeper_telegram::DEFAULT_TELEGRAM_API_URL;

/// Where per-chat filename sessions live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct TelegramSettings {
    pub api_url: String,
    pub bot_token: String,
    /// Expected `X-Telegram-Bot-Api-Secret-Token`; unchecked when `None`.
    pub webhook_secret: Option<String>,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub session_backend: SessionBackend,
    pub users_file: Option<PathBuf>,
    pub timezone: Tz,
    pub journal_unit: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub telegram: TelegramSettings,
    pub github: GitHubConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("SCROLL_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid SCROLL_LISTEN_ADDR")?;
        let data_dir = PathBuf::from(env_or("SCROLL_DATA_DIR", "/tmp/scrolls"));
        let session_backend = match env_opt("SCROLL_SESSION_FILE") {
            Some(v) if v.eq_ignore_ascii_case("memory") => SessionBackend::Memory,
            Some(v) => SessionBackend::File(PathBuf::from(v)),
            None => SessionBackend::File(data_dir.join(".sessions.json")),
        };
        let timezone_name = env_or("SCROLL_TIMEZONE", DEFAULT_REFERENCE_TZ.name());
        let timezone = parse_timezone(&timezone_name)
            .ok_or_else(|| anyhow!("Invalid SCROLL_TIMEZONE: {}", timezone_name))?;
        let cors_allow = env_or("SCROLL_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_or("SCROLL_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .unwrap_or(30000);

        let telegram = TelegramSettings {
            api_url: env_or("TELEGRAM_API_URL", DEFAULT_TELEGRAM_API_URL),
            bot_token: env_opt("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            webhook_secret: env_opt("TELEGRAM_WEBHOOK_SECRET"),
        };
        let github = GitHubConfig {
            api_url: env_or("GITHUB_API_URL", DEFAULT_GITHUB_API_URL),
            token: env_opt("GITHUB_TOKEN").unwrap_or_default(),
            owner: env_or("GITHUB_USERNAME", "adgedenkers"),
            repo: env_or("GITHUB_REPO", "mythos-scroll-library"),
            branch: env_or("GITHUB_BRANCH", "main"),
        };

        Ok(Self {
            listen_addr,
            data_dir,
            session_backend,
            users_file: env_opt("SCROLL_USERS_FILE").map(PathBuf::from),
            timezone,
            journal_unit: env_or("SCROLL_JOURNAL_UNIT", "spire"),
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            telegram,
            github,
        })
    }
}
