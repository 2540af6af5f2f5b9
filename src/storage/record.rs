//! 存储记录的宽松解码
//!
//! 旧版本数据可能缺少调度字段或写入了无法解析的值。单条记录的问题不应导致整个词库加载失败：
//! 调度字段有问题的记录以 `next_due_at = None` 载入，交由到期筛选修复。

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use tracing::warn;

use crate::models::WordEntry;
use crate::srs::MAX_LEVEL;

/// 与存储格式无关的原始记录
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawWordRecord {
    pub term: String,
    pub definition: String,
    pub example: String,
    pub correct_attempts: Option<i64>,
    pub total_attempts: Option<i64>,
    pub last_reviewed_at: Option<String>,
    pub repetition_level: Option<i64>,
    pub next_due_at: Option<String>,
}

/// 时间戳统一格式（RFC 3339，保留原始精度）
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// 解析时间戳，兼容 RFC 3339 与 SQLite `datetime()` 格式
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn to_count(value: Option<i64>) -> u32 {
    value
        .map(|v| v.clamp(0, i64::from(u32::MAX)) as u32)
        .unwrap_or(0)
}

impl RawWordRecord {
    /// 转换为条目；单词为空的记录无法识别，返回 `None`
    pub fn into_entry(self) -> Option<WordEntry> {
        let term = self.term.trim().to_string();
        if term.is_empty() {
            warn!("skipping stored record without a term");
            return None;
        }

        let correct_attempts = to_count(self.correct_attempts);
        let total_attempts = to_count(self.total_attempts).max(correct_attempts);

        let last_reviewed_at = match self.last_reviewed_at.as_deref() {
            Some(raw) => {
                let parsed = parse_timestamp(raw);
                if parsed.is_none() {
                    warn!(term = %term, value = raw, "unparseable last-reviewed timestamp dropped");
                }
                parsed
            }
            None => None,
        };

        let level = self
            .repetition_level
            .filter(|level| (0..=MAX_LEVEL as i64).contains(level))
            .map(|level| level as usize);
        let next_due_at = self.next_due_at.as_deref().and_then(parse_timestamp);

        let (repetition_level, next_due_at) = match (level, next_due_at) {
            (Some(level), Some(due_at)) => (level, Some(due_at)),
            _ => {
                warn!(
                    term = %term,
                    level = ?self.repetition_level,
                    next_due_at = ?self.next_due_at,
                    "stored schedule is missing or invalid, marked for repair"
                );
                (0, None)
            }
        };

        Some(WordEntry {
            term,
            definition: self.definition,
            example: self.example,
            correct_attempts,
            total_attempts,
            last_reviewed_at,
            repetition_level,
            next_due_at,
        })
    }
}

impl From<&WordEntry> for RawWordRecord {
    fn from(entry: &WordEntry) -> Self {
        Self {
            term: entry.term.clone(),
            definition: entry.definition.clone(),
            example: entry.example.clone(),
            correct_attempts: Some(i64::from(entry.correct_attempts)),
            total_attempts: Some(i64::from(entry.total_attempts)),
            last_reviewed_at: entry.last_reviewed_at.map(format_timestamp),
            repetition_level: Some(entry.repetition_level as i64),
            next_due_at: entry.next_due_at.map(format_timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn valid_raw() -> RawWordRecord {
        RawWordRecord {
            term: "ephemeral".to_string(),
            definition: "short-lived".to_string(),
            example: String::new(),
            correct_attempts: Some(2),
            total_attempts: Some(3),
            last_reviewed_at: Some("2026-10-17T09:00:00Z".to_string()),
            repetition_level: Some(2),
            next_due_at: Some("2026-10-20T09:00:00.123Z".to_string()),
        }
    }

    #[test]
    fn test_valid_record_decodes() {
        let entry = valid_raw().into_entry().unwrap();

        assert_eq!(entry.repetition_level, 2);
        assert_eq!(entry.total_attempts, 3);
        assert_eq!(
            entry.next_due_at.map(format_timestamp).as_deref(),
            Some("2026-10-20T09:00:00.123Z")
        );
    }

    #[test]
    fn test_out_of_range_level_marks_for_repair() {
        for level in [Some(-1), Some(MAX_LEVEL as i64 + 1), None] {
            let raw = RawWordRecord {
                repetition_level: level,
                ..valid_raw()
            };
            let entry = raw.into_entry().unwrap();
            assert_eq!(entry.repetition_level, 0);
            assert!(entry.next_due_at.is_none());
        }
    }

    #[test]
    fn test_unparseable_due_date_marks_for_repair() {
        let raw = RawWordRecord {
            next_due_at: Some("Invalid Date".to_string()),
            ..valid_raw()
        };
        assert!(raw.into_entry().unwrap().needs_repair());
    }

    #[test]
    fn test_counters_are_made_consistent() {
        let raw = RawWordRecord {
            correct_attempts: Some(5),
            total_attempts: Some(-2),
            ..valid_raw()
        };
        let entry = raw.into_entry().unwrap();
        assert_eq!((entry.correct_attempts, entry.total_attempts), (5, 5));
    }

    #[test]
    fn test_blank_term_is_skipped() {
        let raw = RawWordRecord {
            term: "  ".to_string(),
            ..valid_raw()
        };
        assert!(raw.into_entry().is_none());
    }

    #[test]
    fn test_parse_sqlite_datetime() {
        assert_eq!(
            parse_timestamp("2026-10-18 09:30:00"),
            Some(Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap())
        );
    }
}
