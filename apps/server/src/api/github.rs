use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use scrollkeeper_core::users::UserAccount;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResponse {
    path: String,
    content: String,
    revision: String,
    size: u64,
    user_name: String,
}

pub async fn read_file(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserAccount>,
    Path(path): Path<String>,
) -> ApiResult<Json<ReadResponse>> {
    let file = state.remote_store.read(&path).await?;
    Ok(Json(ReadResponse {
        content: file.content_lossy(),
        path: file.path,
        revision: file.revision,
        size: file.size,
        user_name: user.name,
    }))
}

#[derive(Debug, Deserialize)]
pub struct WriteRequest {
    path: Option<String>,
    content: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResponse {
    path: String,
    revision: String,
    commit_revision: String,
    user_name: String,
    message: String,
}

pub async fn write_file(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserAccount>,
    payload: Result<Json<WriteRequest>, JsonRejection>,
) -> ApiResult<Json<WriteResponse>> {
    let Json(request) =
        payload.map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?;

    let path = request
        .path
        .map(|p| p.trim().trim_start_matches('/').to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Field 'path' is required".into()))?;
    let content = request
        .content
        .ok_or_else(|| ApiError::BadRequest("Field 'content' is required".into()))?;
    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Update {} via API", path));

    let outcome = state
        .remote_store
        .commit(&path, content.as_bytes(), &message)
        .await?;
    tracing::info!("{} committed {} via API", user.name, outcome.path);

    Ok(Json(WriteResponse {
        path: outcome.path,
        revision: outcome.content_revision,
        commit_revision: outcome.commit_revision,
        user_name: user.name,
        message,
    }))
}
