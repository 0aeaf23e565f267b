//! Court Server - 单日网球场预约服务
//!
//! # 架构概述
//!
//! - **预约引擎** (`booking`): 校验、同人守卫、容量、幂等写事务
//! - **营业日** (`day`): 管理员激活的唯一营业日配置
//! - **数据库** (`db`): 嵌入式 redb 存储
//! - **认证** (`auth`): 管理员 PIN 与预约所有者
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! court-server/src/
//! ├── core/          # 配置、状态、错误、后台任务
//! ├── booking/       # 预约引擎
//! ├── day/           # 营业日配置
//! ├── auth/          # 管理员凭据、所有者
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # Router 组装与中间件层
//! ├── middleware/    # 请求日志
//! ├── utils/         # 日志、时间、校验
//! └── db/            # redb 存储层
//! ```

pub mod api;
pub mod auth;
pub mod booking;
pub mod core;
pub mod day;
pub mod db;
pub mod middleware;
pub mod routes;
pub mod utils;

// Re-export 公共类型
pub use booking::{BookingError, BookingManager};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 .env 并初始化日志
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    let log_dir = config.is_production().then(|| config.log_dir());
    init_logger_with_file(&config.log_level, config.log_json, log_dir.as_deref())?;
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______                  __
  / ____/___  __  _______/ /_
 / /   / __ \/ / / / ___/ __/
/ /___/ /_/ / /_/ / /  / /_
\____/\____/\__,_/_/   \__/
    "#
    );
}
