use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Serialize)]
pub struct FileListResponse {
    files: Vec<String>,
}

pub async fn list_files(State(state): State<Arc<AppState>>) -> ApiResult<Json<FileListResponse>> {
    let files = state.documents.list().await?;
    Ok(Json(FileListResponse { files }))
}

pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> ApiResult<String> {
    Ok(state.documents.read_text(&path).await?)
}
