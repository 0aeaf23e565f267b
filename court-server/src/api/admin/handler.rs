//! Admin API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{
    AdminPinChange, DeleteResult, PurgeRequest, PurgeResult, ReservationNamesUpdate,
    ReservationView, ResetRequest,
};

use crate::auth::AdminAuth;
use crate::core::ServerState;
use crate::utils::time::parse_date;
use crate::utils::{ApiResponse, AppResult};

/// DELETE /api/admin/reservations/{id} - 强制删除
pub async fn force_delete(
    State(state): State<ServerState>,
    _admin: AdminAuth,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DeleteResult>>> {
    let deleted = state.bookings.force_delete(&id)?;
    Ok(Json(ApiResponse::success(DeleteResult { deleted })))
}

/// PUT /api/admin/reservations/{id}/names - 修改姓名
pub async fn update_names(
    State(state): State<ServerState>,
    _admin: AdminAuth,
    Path(id): Path<String>,
    Json(payload): Json<ReservationNamesUpdate>,
) -> AppResult<Json<ApiResponse<ReservationView>>> {
    let updated = state.bookings.update_names(&id, &payload.player_names)?;
    Ok(Json(ApiResponse::success(updated.public_view())))
}

/// POST /api/admin/reset - 清空当天 (或 `all` 时全部) 预约
pub async fn reset(
    State(state): State<ServerState>,
    _admin: AdminAuth,
    payload: Option<Json<ResetRequest>>,
) -> AppResult<Json<ApiResponse<DeleteResult>>> {
    let req = payload.map(|Json(r)| r).unwrap_or_default();
    let deleted = state.bookings.reset(req.all)?;
    Ok(Json(ApiResponse::success(DeleteResult { deleted })))
}

/// POST /api/admin/purge - 删除截止日期之前的预约 (默认今天)
pub async fn purge(
    State(state): State<ServerState>,
    _admin: AdminAuth,
    payload: Option<Json<PurgeRequest>>,
) -> AppResult<Json<ApiResponse<PurgeResult>>> {
    let req = payload.map(|Json(r)| r).unwrap_or_default();
    let before = match req.before.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => Some(parse_date(raw)?),
        None => None,
    };
    let result = state.bookings.purge_before(before)?;
    Ok(Json(ApiResponse::success(result)))
}

/// POST /api/admin/pin - 更换管理员 PIN (需当前 PIN)
pub async fn change_pin(
    State(state): State<ServerState>,
    _admin: AdminAuth,
    Json(payload): Json<AdminPinChange>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.admin.rotate(&payload.new_pin)?;
    Ok(Json(ApiResponse::ok()))
}
