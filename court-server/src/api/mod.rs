//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`day`] - 营业日配置与网格
//! - [`reservations`] - 预约创建、列表、取消
//! - [`admin`] - 管理员操作

pub mod admin;
pub mod day;
pub mod health;
pub mod reservations;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};
