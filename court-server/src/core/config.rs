use std::path::PathBuf;
use std::time::Duration;

/// 服务器配置 - 预约服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | ADMIN_PIN | (空) | 初始管理员 PIN，持久化后不再使用 |
/// | TIMEZONE | Asia/Tokyo | 业务时区 |
/// | IDEMPOTENCY_TTL_SECS | 600 | 幂等令牌保留时间 |
/// | COMMIT_RETRY_DELAY_MS | 150 | 提交重试前的固定等待 |
/// | MAX_NAME_CHARS | 20 | 单个姓名的最大字符数 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | 控制台 JSON 日志 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/courts HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 初始管理员 PIN
    pub admin_pin: Option<String>,
    /// 业务时区名 (IANA)
    pub timezone: String,
    /// 幂等令牌保留秒数
    pub idempotency_ttl_secs: u64,
    /// 提交重试前等待的毫秒数
    pub commit_retry_delay_ms: u64,
    /// 单个姓名规范化后的最大字符数
    pub max_name_chars: usize,
    pub log_level: String,
    pub log_json: bool,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_parse("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            admin_pin: std::env::var("ADMIN_PIN")
                .ok()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            timezone: std::env::var("TIMEZONE").unwrap_or_else(|_| "Asia/Tokyo".into()),
            idempotency_ttl_secs: env_parse("IDEMPOTENCY_TTL_SECS", 600),
            commit_retry_delay_ms: env_parse("COMMIT_RETRY_DELAY_MS", 150),
            max_name_chars: env_parse("MAX_NAME_CHARS", 20),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON", false),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库文件路径: {work_dir}/database/courts.redb
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir)
            .join("database")
            .join("courts.redb")
    }

    /// 日志目录: {work_dir}/logs
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn idempotency_ttl(&self) -> Duration {
        Duration::from_secs(self.idempotency_ttl_secs)
    }

    pub fn commit_retry_delay(&self) -> Duration {
        Duration::from_millis(self.commit_retry_delay_ms)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_derive_from_work_dir() {
        let config = Config::with_overrides("/tmp/courts", 3100);
        assert_eq!(config.http_port, 3100);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/courts/database/courts.redb")
        );
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/courts/logs"));
    }

    #[test]
    fn test_durations() {
        let mut config = Config::with_overrides("/tmp/courts", 0);
        config.commit_retry_delay_ms = 25;
        config.idempotency_ttl_secs = 60;
        assert_eq!(config.commit_retry_delay(), Duration::from_millis(25));
        assert_eq!(config.idempotency_ttl(), Duration::from_secs(60));
    }
}
