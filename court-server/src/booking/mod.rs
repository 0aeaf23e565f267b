//! Booking engine
//!
//! # 模块结构
//!
//! - [`names`] - 姓名规范化与字符规则
//! - [`guard`] - 同一人单一有效预约守卫
//! - [`validation`] - 请求校验与营业日闸门
//! - [`idempotency`] - 幂等缓存 (TtlStore)
//! - [`store`] - 持久化接口 (ReservationStore)
//! - [`manager`] - 写入流程与管理操作

pub mod error;
pub mod guard;
pub mod idempotency;
pub mod manager;
pub mod names;
pub mod store;
pub mod validation;

pub use error::BookingError;
pub use idempotency::{IdempotencyCache, MemoryTtlStore, TtlStore};
pub use manager::BookingManager;
pub use names::NamePolicy;
pub use store::{CommitOutcome, CommitRequest, ReservationStore};
