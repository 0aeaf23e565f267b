//! Reservation API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/reservations | GET | 列表 (`date`, `courtId`) | 无 |
//! | /api/reservations | POST | 创建预约 | 所有者 |
//! | /api/reservations/{id} | DELETE | 取消 (PIN 或管理员) | PIN / 管理员 |

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", delete(handler::cancel))
}
