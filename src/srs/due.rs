//! 到期筛选
//!
//! 按自然日比较（丢弃时分秒）：`next_due_at` 所在日期不晚于今天即到期。
//! 调度字段缺失或越界的旧数据会被就地修复为等级 0、立即到期，并计入到期集合。

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::models::WordEntry;

/// 到期筛选结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DueSet {
    /// 到期单词，保持词库顺序
    pub terms: Vec<String>,
    /// 本次被修复的条目数
    pub repaired: usize,
}

impl DueSet {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }
}

fn local_date(at: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    at.with_timezone(offset).date_naive()
}

/// 判断单个条目是否到期（不修改条目，待修复条目视为到期）
pub fn is_due(entry: &WordEntry, now: DateTime<Utc>, offset: &FixedOffset) -> bool {
    if entry.needs_repair() {
        return true;
    }
    match entry.next_due_at {
        Some(due_at) => local_date(due_at, offset) <= local_date(now, offset),
        None => true,
    }
}

/// 筛选到期单词
///
/// 给定相同的 `now` 且词库未变时结果幂等；修复只会在第一次调用时发生。
pub fn select_due(entries: &mut [WordEntry], now: DateTime<Utc>, offset: &FixedOffset) -> DueSet {
    let mut due = DueSet::default();

    for entry in entries.iter_mut() {
        if entry.needs_repair() {
            warn!(
                term = %entry.term,
                level = entry.repetition_level,
                "scheduling fields missing or invalid, resetting to level 0"
            );
            entry.repetition_level = 0;
            entry.next_due_at = Some(now);
            due.repaired += 1;
            due.terms.push(entry.term.clone());
            continue;
        }

        if is_due(entry, now, offset) {
            due.terms.push(entry.term.clone());
        }
    }

    debug!(
        due = due.terms.len(),
        repaired = due.repaired,
        total = entries.len(),
        "due-set selected"
    );
    due
}
