//! 复习结果处理
//!
//! 记住：等级 +1（封顶）；没记住：等级归零。下次到期 = 本次时间 + 间隔表[等级] 天。
//! 结果立即生效，没有撤销。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::WordEntry;
use crate::srs::intervals::{clamp_level, next_due_after, MAX_LEVEL};

/// 一次评判的结果摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub term: String,
    pub passed: bool,
    pub previous_level: usize,
    pub new_level: usize,
    pub next_due_at: DateTime<Utc>,
}

/// 就地更新条目的复习进度
pub fn record_outcome(entry: &mut WordEntry, passed: bool, now: DateTime<Utc>) -> ReviewOutcome {
    let previous_level = entry.repetition_level;

    entry.total_attempts = entry.total_attempts.saturating_add(1);
    entry.last_reviewed_at = Some(now);

    entry.repetition_level = if passed {
        entry.correct_attempts = entry.correct_attempts.saturating_add(1);
        (clamp_level(previous_level) + 1).min(MAX_LEVEL)
    } else {
        0
    };

    let next_due_at = next_due_after(now, entry.repetition_level);
    entry.next_due_at = Some(next_due_at);

    ReviewOutcome {
        term: entry.term.clone(),
        passed,
        previous_level,
        new_level: entry.repetition_level,
        next_due_at,
    }
}
