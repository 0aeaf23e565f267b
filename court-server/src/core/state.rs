use std::sync::Arc;
use std::time::Duration;

use crate::auth::AdminService;
use crate::booking::{BookingManager, IdempotencyCache, MemoryTtlStore, NamePolicy};
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, Result};
use crate::day::DayService;
use crate::db::{AdminRepository, DayConfigRepository, DbService, ReservationRepository};
use crate::utils::time::{Clock, SystemClock, parse_timezone};

/// 幂等令牌清理间隔
const TOKEN_PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，可直接作为 axum 的 `State`。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | redb 句柄 |
/// | bookings | 预约写入路径与管理操作 |
/// | days | 营业日配置 |
/// | admin | 管理员凭据 |
/// | clock | 业务时区时钟 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub bookings: Arc<BookingManager>,
    pub days: Arc<DayService>,
    pub admin: Arc<AdminService>,
    pub clock: Arc<dyn Clock>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 打开数据库 (work_dir/database/courts.redb)
    /// 2. 构建各服务
    /// 3. 写入初始管理员凭据 (仅在未持久化时)
    pub fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::open(config.database_path())?;
        let clock = Arc::new(SystemClock::new(parse_timezone(&config.timezone)));
        Self::build(config.clone(), db, clock)
    }

    /// 内存数据库 + 指定时钟，用于测试
    pub fn in_memory(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let db = DbService::open_in_memory()?;
        Self::build(config, db, clock)
    }

    fn build(config: Config, db: DbService, clock: Arc<dyn Clock>) -> Result<Self> {
        let days = DayConfigRepository::new(db.clone());

        let admin = AdminService::new(AdminRepository::new(db.clone()), config.admin_pin.clone());
        admin.seed()?;

        let cache = IdempotencyCache::new(Arc::new(MemoryTtlStore::new()), config.idempotency_ttl());
        let bookings = BookingManager::new(
            Arc::new(ReservationRepository::new(db.clone())),
            days.clone(),
            cache,
            clock.clone(),
        )
        .with_policy(NamePolicy::new(config.max_name_chars))
        .with_retry_delay(config.commit_retry_delay());

        Ok(Self {
            config,
            db,
            bookings: Arc::new(bookings),
            days: Arc::new(DayService::new(days)),
            admin: Arc::new(admin),
            clock,
        })
    }

    /// 启动后台任务
    ///
    /// - 启动时清理一次过期幂等令牌
    /// - 之后每分钟清理一次
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let bookings = self.bookings.clone();
        tasks.spawn("token_purge_warmup", TaskKind::Warmup, async move {
            if let Err(e) = bookings.purge_expired_tokens() {
                tracing::warn!(error = %e, "Initial token purge failed");
            }
        });

        let bookings = self.bookings.clone();
        let shutdown = tasks.shutdown_token();
        tasks.spawn("token_purge", TaskKind::Periodic, async move {
            let mut interval = tokio::time::interval(TOKEN_PURGE_INTERVAL);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // 第一次 tick 立即返回，由 warmup 负责
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = interval.tick() => {
                        if let Err(e) = bookings.purge_expired_tokens() {
                            tracing::warn!(error = %e, "Token purge failed");
                        }
                    }
                }
            }
        });

        tasks.log_summary();
        tasks
    }
}
