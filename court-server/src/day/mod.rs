//! Day configuration service
//!
//! 管理员激活营业日: 校验并保存唯一的 [`DayConfig`]。保存后新配置立即对
//! 所有预约请求生效。

use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use shared::models::{
    BlackoutBlock, BlackoutBlockInput, DayConfig, DayConfigUpdate, MAX_COURTS, letter_label,
};
use shared::schedule::grid::{
    DEFAULT_END_MIN, DEFAULT_SLOT_MINUTES, DEFAULT_START_MIN, MINUTES_PER_DAY,
};
use shared::schedule::is_five_minute_aligned;

use crate::db::DayConfigRepository;
use crate::utils::time::{now_millis, parse_date};
use crate::utils::validation::{
    MAX_COURT_NAME_LEN, MAX_NOTICE_LEN, MAX_REASON_LEN, validate_optional_text, validate_text_len,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

const MIN_SLOT_MINUTES: u32 = 5;
const MAX_SLOT_MINUTES: u32 = 240;

fn invalid(msg: impl Into<String>) -> AppError {
    AppError::with_message(ErrorCode::InvalidDayConfig, msg)
}

/// Validate an admin update into a storable config
pub fn build_config(update: DayConfigUpdate, updated_at: i64) -> AppResult<DayConfig> {
    let date: NaiveDate = parse_date(&update.date)?;

    if update.court_count < 1 || update.court_count > MAX_COURTS {
        return Err(invalid(format!("courtCount must be 1..{}", MAX_COURTS)));
    }
    if update.court_names.len() != update.court_count as usize {
        return Err(invalid("courtNames length must equal courtCount"));
    }

    let start_min = update.start_min.unwrap_or(DEFAULT_START_MIN);
    let end_min = update.end_min.unwrap_or(DEFAULT_END_MIN);
    let slot_minutes = update.slot_minutes.unwrap_or(DEFAULT_SLOT_MINUTES);

    if !is_five_minute_aligned(start_min)
        || !is_five_minute_aligned(end_min)
        || !is_five_minute_aligned(slot_minutes)
    {
        return Err(invalid("Times must be aligned to 5 minutes"));
    }
    if start_min >= end_min || end_min > MINUTES_PER_DAY {
        return Err(invalid("startMin must be before endMin"));
    }
    if !(MIN_SLOT_MINUTES..=MAX_SLOT_MINUTES).contains(&slot_minutes) {
        return Err(invalid(format!(
            "slotMinutes must be {}..{}",
            MIN_SLOT_MINUTES, MAX_SLOT_MINUTES
        )));
    }
    if (end_min - start_min) % slot_minutes != 0 {
        return Err(invalid("Range must be divisible by slotMinutes"));
    }

    let notice = update.notice.unwrap_or_default();
    validate_text_len(&notice, "notice", MAX_NOTICE_LEN, ErrorCode::InvalidDayConfig)?;

    let mut court_names = Vec::with_capacity(update.court_names.len());
    for (i, name) in update.court_names.iter().enumerate() {
        let name = name.trim();
        validate_text_len(name, "courtName", MAX_COURT_NAME_LEN, ErrorCode::InvalidDayConfig)?;
        court_names.push(if name.is_empty() {
            letter_label(i as u32 + 1)
        } else {
            name.to_string()
        });
    }

    let mut blocks = Vec::with_capacity(update.blocks.len());
    for input in update.blocks {
        validate_optional_text(&input.reason, "reason", MAX_REASON_LEN, ErrorCode::InvalidDayConfig)?;
        match accept_block(&input, update.court_count, start_min, end_min) {
            Some(block) => blocks.push(block),
            None => tracing::warn!(
                court_id = input.court_id,
                start_min = input.start_min,
                end_min = input.end_min,
                "Dropping invalid blackout block"
            ),
        }
    }

    Ok(DayConfig {
        date,
        court_count: update.court_count,
        court_names,
        start_min,
        end_min,
        slot_minutes,
        preparing: update.preparing,
        notice,
        blocks,
        updated_at,
    })
}

/// Blocks with an unknown court, an unusable window, or a window outside
/// the opening hours `[day_start, day_end)` are ignored
fn accept_block(
    input: &BlackoutBlockInput,
    court_count: u32,
    day_start: u32,
    day_end: u32,
) -> Option<BlackoutBlock> {
    let court_id = u32::try_from(input.court_id).ok()?;
    let start_min = u32::try_from(input.start_min).ok()?;
    let end_min = u32::try_from(input.end_min).ok()?;
    if court_id < 1 || court_id > court_count {
        return None;
    }
    if start_min >= end_min
        || start_min < day_start
        || end_min > day_end
        || !is_five_minute_aligned(start_min)
        || !is_five_minute_aligned(end_min)
    {
        return None;
    }
    Some(BlackoutBlock {
        court_id,
        start_min,
        end_min,
        reason: input
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string),
    })
}

/// Serialized response body and weak ETag for the day-config read
///
/// The ETag covers the exact bytes sent to the client.
pub fn render(config: Option<&DayConfig>) -> AppResult<(Vec<u8>, String)> {
    let body = serde_json::to_vec(&ApiResponse::success(config))
        .map_err(|e| AppError::internal(format!("Failed to serialize day config: {}", e)))?;
    let etag = format!("W/\"{}\"", hex::encode(Sha256::digest(&body)));
    Ok((body, etag))
}

#[derive(Clone)]
pub struct DayService {
    repo: DayConfigRepository,
}

impl DayService {
    pub fn new(repo: DayConfigRepository) -> Self {
        Self { repo }
    }

    pub fn current(&self) -> AppResult<Option<DayConfig>> {
        Ok(self.repo.find_active()?)
    }

    /// Validate and activate, replacing the previous day
    pub fn activate(&self, update: DayConfigUpdate) -> AppResult<DayConfig> {
        let config = build_config(update, now_millis())?;
        self.repo.save(&config)?;
        tracing::info!(
            date = %config.date,
            court_count = config.court_count,
            preparing = config.preparing,
            blocks = config.blocks.len(),
            "Day configuration activated"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn update() -> DayConfigUpdate {
        DayConfigUpdate {
            date: "2025-05-01".into(),
            court_count: 3,
            court_names: vec!["Center".into(), " ".into(), "".into()],
            start_min: None,
            end_min: None,
            slot_minutes: None,
            preparing: false,
            notice: Some("雨天中止".into()),
            blocks: vec![],
        }
    }

    #[test]
    fn test_defaults_and_letter_labels() {
        let cfg = build_config(update(), 7).unwrap();
        assert_eq!(cfg.start_min, DEFAULT_START_MIN);
        assert_eq!(cfg.end_min, DEFAULT_END_MIN);
        assert_eq!(cfg.slot_minutes, DEFAULT_SLOT_MINUTES);
        assert_eq!(cfg.court_names, vec!["Center", "B", "C"]);
        assert_eq!(cfg.updated_at, 7);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let mut u = update();
        u.court_count = 22;
        assert_eq!(build_config(u, 0).unwrap_err().code, ErrorCode::InvalidDayConfig);

        let mut u = update();
        u.court_names.pop();
        assert!(build_config(u, 0).is_err());

        let mut u = update();
        u.slot_minutes = Some(250);
        assert!(build_config(u, 0).is_err());

        let mut u = update();
        u.start_min = Some(540);
        u.end_min = Some(560);
        u.slot_minutes = Some(15);
        assert!(build_config(u, 0).is_err());

        let mut u = update();
        u.start_min = Some(542);
        assert!(build_config(u, 0).is_err());

        let mut u = update();
        u.notice = Some("x".repeat(MAX_NOTICE_LEN + 1));
        assert!(build_config(u, 0).is_err());

        let mut u = update();
        u.date = "May 1".into();
        assert_eq!(build_config(u, 0).unwrap_err().code, ErrorCode::InvalidDate);
    }

    #[test]
    fn test_invalid_blocks_are_dropped() {
        let mut u = update();
        u.blocks = vec![
            BlackoutBlockInput {
                court_id: 1,
                start_min: 600,
                end_min: 660,
                reason: Some(" lesson ".into()),
            },
            BlackoutBlockInput {
                court_id: 9,
                start_min: 600,
                end_min: 660,
                reason: None,
            },
            BlackoutBlockInput {
                court_id: 2,
                start_min: 660,
                end_min: 600,
                reason: None,
            },
        ];
        let cfg = build_config(u, 0).unwrap();
        assert_eq!(cfg.blocks.len(), 1);
        assert_eq!(cfg.blocks[0].reason.as_deref(), Some("lesson"));
    }

    #[test]
    fn test_blocks_outside_opening_hours_are_dropped() {
        let mut u = update();
        u.start_min = Some(540);
        u.end_min = Some(1260);
        let block = |start_min, end_min| BlackoutBlockInput {
            court_id: 1,
            start_min,
            end_min,
            reason: None,
        };
        u.blocks = vec![
            block(420, 480),
            block(1200, 1320),
            block(510, 570),
            block(540, 600),
            block(1200, 1260),
        ];
        let cfg = build_config(u, 0).unwrap();
        let kept: Vec<(u32, u32)> = cfg.blocks.iter().map(|b| (b.start_min, b.end_min)).collect();
        assert_eq!(kept, vec![(540, 600), (1200, 1260)]);
    }

    #[test]
    fn test_render_etag_tracks_content() {
        let (body, etag) = render(None).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], 0);
        assert!(json.get("data").is_some_and(|d| d.is_null()));
        assert!(etag.starts_with("W/\""));

        let cfg = build_config(update(), 1).unwrap();
        let (_, a) = render(Some(&cfg)).unwrap();
        let (_, b) = render(Some(&cfg)).unwrap();
        let touched = DayConfig {
            updated_at: 2,
            ..cfg.clone()
        };
        let (_, c) = render(Some(&touched)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, etag);
    }

    #[test]
    fn test_activate_replaces_current() {
        let service = DayService::new(DayConfigRepository::new(DbService::open_in_memory().unwrap()));
        assert!(service.current().unwrap().is_none());

        service.activate(update()).unwrap();
        let mut next = update();
        next.date = "2025-05-02".into();
        next.preparing = true;
        service.activate(next).unwrap();

        let current = service.current().unwrap().unwrap();
        assert_eq!(current.date, NaiveDate::from_ymd_opt(2025, 5, 2).unwrap());
        assert!(current.preparing);
    }
}
