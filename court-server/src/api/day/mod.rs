//! Day API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/day | GET | 当前营业日配置 (ETag) | 无 |
//! | /api/day | PUT | 激活营业日 | 管理员 |
//! | /api/day/grid | GET | 场地 × 时段网格 | 无 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/day", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::current).put(handler::activate))
        .route("/grid", get(handler::grid))
}
