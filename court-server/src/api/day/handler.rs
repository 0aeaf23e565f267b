//! Day API Handlers

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use shared::models::{DayConfig, DayConfigUpdate};
use shared::schedule::DayGrid;

use crate::auth::AdminAuth;
use crate::core::ServerState;
use crate::day;
use crate::utils::{ApiResponse, AppError, AppResult};

const DAY_CACHE_CONTROL: &str = "public, max-age=600, stale-while-revalidate=3600";

fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').any(|tag| tag.trim() == etag || tag.trim() == "*"))
}

/// GET /api/day - 当前营业日配置
pub async fn current(State(state): State<ServerState>, headers: HeaderMap) -> AppResult<Response> {
    let config = state.days.current()?;
    let (body, etag) = day::render(config.as_ref())?;
    let etag_value = HeaderValue::from_str(&etag)
        .map_err(|e| AppError::internal(format!("Invalid ETag: {}", e)))?;
    let cache_control = HeaderValue::from_static(DAY_CACHE_CONTROL);

    if if_none_match(&headers, &etag) {
        return Ok((
            StatusCode::NOT_MODIFIED,
            [(header::ETAG, etag_value), (header::CACHE_CONTROL, cache_control)],
        )
            .into_response());
    }

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ),
            (header::ETAG, etag_value),
            (header::CACHE_CONTROL, cache_control),
        ],
        body,
    )
        .into_response())
}

/// PUT /api/day - 激活营业日 (整体替换)
pub async fn activate(
    State(state): State<ServerState>,
    _admin: AdminAuth,
    Json(payload): Json<DayConfigUpdate>,
) -> AppResult<Json<ApiResponse<DayConfig>>> {
    let config = state.days.activate(payload)?;
    Ok(Json(ApiResponse::success(config)))
}

/// GET /api/day/grid - 场地 × 时段网格，无营业日时为 null
pub async fn grid(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Option<DayGrid>>>> {
    let grid = state.bookings.grid()?;
    Ok(Json(ApiResponse::success(grid)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_if_none_match_list() {
        let mut headers = HeaderMap::new();
        assert!(!if_none_match(&headers, "W/\"a\""));
        headers.insert(
            header::IF_NONE_MATCH,
            HeaderValue::from_static("W/\"b\", W/\"a\""),
        );
        assert!(if_none_match(&headers, "W/\"a\""));
        assert!(!if_none_match(&headers, "W/\"c\""));
    }
}
