use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::{error::ApiError, main_lib::AppState};

/// Header carrying the API credential. Takes precedence over the `api_key` query parameter.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Deserialize)]
struct CredentialQuery {
    api_key: Option<String>,
}

fn credential_from_request(request: &Request<Body>) -> Option<String> {
    let from_header = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    if from_header.is_some() {
        return from_header;
    }

    Query::<CredentialQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(q)| q.api_key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Gate for every credential-protected route.
///
/// Rejects with 401 when no credential is supplied and 403 when it matches no
/// user. On success the matching [`scrollkeeper_core::users::UserAccount`] is
/// inserted into the request extensions for handlers to pick up.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let credential = credential_from_request(&request).ok_or(ApiError::AuthRequired)?;
    let user = state
        .users
        .find_by_api_key(&credential)
        .cloned()
        .ok_or_else(|| {
            tracing::warn!("Rejected unknown API key on {}", request.uri().path());
            ApiError::AuthInvalid
        })?;

    tracing::debug!("Authenticated {} for {}", user.name, request.uri().path());
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
