//! Scrollkeeper GitHub - remote document store backed by the GitHub contents API.

mod client;
mod models;

pub use client::{GitHubConfig, GitHubContentsClient, DEFAULT_GITHUB_API_URL};
