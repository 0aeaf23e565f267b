//! 时间工具函数 - 业务时区时钟
//!
//! "今天" 与 "现在" 一律按业务时区计算，守卫与默认清理日期都依赖这里。

use chrono::{NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use parking_lot::Mutex;

use super::{AppError, AppResult, ErrorCode};

/// 业务时钟
pub trait Clock: Send + Sync {
    /// 业务时区的本地时间
    fn now(&self) -> NaiveDateTime;

    /// 业务时区的今天
    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// 今天已经过去的分钟数
    fn minute_of_day(&self) -> u32 {
        let now = self.now();
        now.hour() * 60 + now.minute()
    }
}

/// 系统时钟 (业务时区)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }
}

/// 固定时钟，测试用
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// 日期 + 分钟数
    pub fn at(date: NaiveDate, minute_of_day: u32) -> Self {
        let now = date
            .and_hms_opt(minute_of_day / 60, minute_of_day % 60, 0)
            .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN));
        Self::new(now)
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}

/// 当前 Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::with_message(ErrorCode::InvalidDate, format!("Invalid date format: {}", date))
    })
}

/// 解析时区名，失败时回退到 Asia/Tokyo
pub fn parse_timezone(name: &str) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|e| {
        tracing::warn!("Failed to parse timezone '{}': {}, falling back to Asia/Tokyo", name, e);
        chrono_tz::Asia::Tokyo
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let d = parse_date("2025-05-01").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        assert_eq!(parse_date(" 2025-05-01 ").unwrap(), d);

        let err = parse_date("05/01/2025").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDate);
    }

    #[test]
    fn test_parse_timezone_fallback() {
        assert_eq!(parse_timezone("Europe/Madrid"), chrono_tz::Europe::Madrid);
        assert_eq!(parse_timezone("Mars/Olympus"), chrono_tz::Asia::Tokyo);
    }

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let clock = FixedClock::at(date, 10 * 60 + 15);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.minute_of_day(), 615);

        clock.set(date.and_hms_opt(23, 59, 0).unwrap());
        assert_eq!(clock.minute_of_day(), 23 * 60 + 59);
    }
}
