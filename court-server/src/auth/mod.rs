//! 认证模块
//!
//! - [`AdminService`] - 管理员凭据 (持久化 SHA-256 摘要)
//! - [`AdminAuth`] - 管理员凭据提取器
//! - [`Owner`] - 预约所有者 (`x-user-id` 或 guest)

pub mod admin;
pub mod extractor;

pub use admin::AdminService;
pub use extractor::{ADMIN_PIN_HEADER, AdminAuth, Owner, USER_ID_HEADER, admin_pin, authorize_admin};
