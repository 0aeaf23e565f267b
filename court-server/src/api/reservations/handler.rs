//! Reservation API Handlers

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use shared::models::{DeleteResult, ReservationCancel, ReservationCreate, ReservationView};

use crate::auth::{Owner, admin_pin, authorize_admin};
use crate::core::ServerState;
use crate::utils::time::parse_date;
use crate::utils::validation::{MAX_IDEMPOTENCY_KEY_LEN, validate_text_len};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub date: Option<String>,
    pub court_id: Option<String>,
}

/// GET /api/reservations - 按日期 (可选场地) 列出，不带日期时列出全部
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<ReservationView>>>> {
    let date = match query.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => Some(parse_date(raw)?),
        None => None,
    };
    let court_id = match query.court_id.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
            AppError::with_message(ErrorCode::UnknownCourt, format!("Invalid courtId: {}", raw))
        })?),
        None => None,
    };

    let list = state.bookings.list(date, court_id)?;
    Ok(Json(ApiResponse::success(
        list.iter().map(|r| r.public_view()).collect(),
    )))
}

/// POST /api/reservations - 创建预约
pub async fn create(
    State(state): State<ServerState>,
    owner: Owner,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<ApiResponse<ReservationView>>> {
    if let Some(key) = &payload.idempotency_key {
        validate_text_len(
            key,
            "idempotencyKey",
            MAX_IDEMPOTENCY_KEY_LEN,
            ErrorCode::InvalidRequest,
        )?;
    }
    let reservation = state.bookings.create(owner.as_str(), payload).await?;
    Ok(Json(ApiResponse::success(reservation.public_view())))
}

/// DELETE /api/reservations/{id} - 取消预约
///
/// 携带 `x-admin-pin` 时按管理员强制删除处理 (对已删除的 id 幂等)，
/// 否则需要请求体中的预约 PIN。
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<ApiResponse<DeleteResult>>> {
    if let Some(pin) = admin_pin(&headers) {
        authorize_admin(&state, Some(pin), &format!("/api/reservations/{}", id))?;
        let deleted = state.bookings.force_delete(&id)?;
        return Ok(Json(ApiResponse::success(DeleteResult { deleted })));
    }

    // 请求体缺失或格式错误时视为未提供 PIN
    let cancel: ReservationCancel = serde_json::from_slice(&body).unwrap_or_default();
    state.bookings.cancel_with_pin(&id, cancel.pin.as_deref())?;
    Ok(Json(ApiResponse::success(DeleteResult { deleted: 1 })))
}
