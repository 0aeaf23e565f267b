//! Admin API 模块
//!
//! 全部路由需要 `x-admin-pin`。
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/admin/reservations/{id} | DELETE | 强制删除 |
//! | /api/admin/reservations/{id}/names | PUT | 修改姓名 (不经同人守卫) |
//! | /api/admin/reset | POST | 清空当天或全部预约 |
//! | /api/admin/purge | POST | 删除指定日期之前的预约 |
//! | /api/admin/pin | POST | 更换管理员 PIN |

mod handler;

use axum::{
    Router,
    routing::{delete, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/reservations/{id}", delete(handler::force_delete))
        .route("/reservations/{id}/names", put(handler::update_names))
        .route("/reset", post(handler::reset))
        .route("/purge", post(handler::purge))
        .route("/pin", post(handler::change_pin))
}
