use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{NaiveDate, SecondsFormat, Utc};
use scrollkeeper_core::{
    constants::{NOTATION_CYCLE_LENGTH, NOTATION_SYSTEM_NAME},
    notation::notate,
    users::UserAccount,
    utils::time_utils::{parse_calendar_date, today_in},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SpiralQuery {
    target_date: Option<String>,
    format: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpiralMeta {
    system: &'static str,
    cycle_length: i64,
    timezone: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpiralResponse {
    notation: String,
    display: String,
    date: NaiveDate,
    timestamp: String,
    user_name: String,
    epoch_date: NaiveDate,
    days_elapsed: i64,
    meta: SpiralMeta,
}

enum OutputFormat {
    Json,
    Short,
}

impl OutputFormat {
    fn parse(raw: Option<&str>) -> ApiResult<Self> {
        match raw.map(str::trim) {
            None | Some("") => Ok(OutputFormat::Json),
            Some(f) if f.eq_ignore_ascii_case("json") => Ok(OutputFormat::Json),
            Some(f) if f.eq_ignore_ascii_case("short") => Ok(OutputFormat::Short),
            Some(other) => Err(ApiError::BadRequest(format!(
                "Unsupported format '{}'; use 'json' or 'short'",
                other
            ))),
        }
    }
}

/// Notation of `target_date` (default: today in the reference zone) against
/// the caller's epoch.
pub async fn spiral_date(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserAccount>,
    Query(query): Query<SpiralQuery>,
) -> ApiResult<Response> {
    let format = OutputFormat::parse(query.format.as_deref())?;
    let target = match query.target_date.as_deref().map(str::trim) {
        None | Some("") => today_in(state.timezone),
        Some(raw) => parse_calendar_date(raw).ok_or_else(|| {
            ApiError::BadRequest(format!("Invalid target_date '{}'; expected YYYY-MM-DD", raw))
        })?,
    };

    let notation = notate(target, user.epoch_date)?;

    match format {
        OutputFormat::Short => Ok(notation.to_string().into_response()),
        OutputFormat::Json => {
            let now = Utc::now().with_timezone(&state.timezone);
            Ok(Json(SpiralResponse {
                notation: notation.to_string(),
                display: notation.display_string(),
                date: target,
                timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, false),
                user_name: user.name,
                epoch_date: user.epoch_date,
                days_elapsed: notation.days_elapsed,
                meta: SpiralMeta {
                    system: NOTATION_SYSTEM_NAME,
                    cycle_length: NOTATION_CYCLE_LENGTH,
                    timezone: state.timezone.name(),
                },
            })
            .into_response())
        }
    }
}
