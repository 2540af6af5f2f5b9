//! 数据模型定义
//!
//! 生词本中单个条目的结构，以及列表展示所需的派生数据。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lookup::is_example_placeholder;
use crate::srs::MAX_LEVEL;

// ============================================================
// WordEntry - 单词条目
// ============================================================

/// 单词条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    /// 单词拼写，忽略大小写唯一
    pub term: String,
    /// 释义
    pub definition: String,
    /// 例句，可为空
    #[serde(default)]
    pub example: String,
    /// 记住次数
    pub correct_attempts: u32,
    /// 总复习次数
    pub total_attempts: u32,
    /// 最后复习时间
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// 复习等级，间隔表下标
    pub repetition_level: usize,
    /// 下次到期时间；`None` 表示旧数据缺失，等待到期筛选修复
    pub next_due_at: Option<DateTime<Utc>>,
}

impl WordEntry {
    /// 新建条目：等级 0，立即到期
    pub fn new(
        term: impl Into<String>,
        definition: impl Into<String>,
        example: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
            example: example.into(),
            correct_attempts: 0,
            total_attempts: 0,
            last_reviewed_at: None,
            repetition_level: 0,
            next_due_at: Some(now),
        }
    }

    /// 忽略大小写比较单词
    pub fn matches_term(&self, term: &str) -> bool {
        same_term(&self.term, term)
    }

    /// 调度字段缺失或越界
    pub fn needs_repair(&self) -> bool {
        self.next_due_at.is_none() || self.repetition_level > MAX_LEVEL
    }

    pub fn is_mastered(&self) -> bool {
        self.repetition_level == MAX_LEVEL
    }

    /// 正确率百分比，未复习过为 0
    pub fn accuracy_percent(&self) -> f64 {
        if self.total_attempts == 0 {
            return 0.0;
        }
        f64::from(self.correct_attempts) / f64::from(self.total_attempts) * 100.0
    }

    pub fn performance_band(&self) -> PerformanceBand {
        PerformanceBand::from_percent(self.accuracy_percent())
    }

    /// 可展示的例句（过滤空白与查词占位文本）
    pub fn display_example(&self) -> Option<&str> {
        let example = self.example.trim();
        if is_example_placeholder(example, &self.term) {
            None
        } else {
            Some(example)
        }
    }
}

/// 忽略大小写的单词比较
pub(crate) fn same_term(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

// ============================================================
// PerformanceBand - 掌握程度分档
// ============================================================

/// 正确率分档（列表进度条配色）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceBand {
    /// >= 80%
    High,
    /// >= 50%
    Medium,
    Low,
}

impl PerformanceBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            Self::High
        } else if percent >= 50.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_new_entry_is_due_now() {
        let entry = WordEntry::new("ephemeral", "short-lived", "", now());

        assert_eq!(entry.repetition_level, 0);
        assert_eq!(entry.next_due_at, Some(now()));
        assert_eq!(entry.total_attempts, 0);
        assert!(!entry.needs_repair());
    }

    #[test]
    fn test_matches_term_ignores_case() {
        let entry = WordEntry::new("Ephemeral", "short-lived", "", now());
        assert!(entry.matches_term("ephemeral"));
        assert!(entry.matches_term(" EPHEMERAL "));
        assert!(!entry.matches_term("ephemera"));
    }

    #[test]
    fn test_accuracy_and_band() {
        let mut entry = WordEntry::new("word", "def", "", now());
        assert_eq!(entry.accuracy_percent(), 0.0);
        assert_eq!(entry.performance_band(), PerformanceBand::Low);

        entry.total_attempts = 4;
        entry.correct_attempts = 2;
        assert_eq!(entry.performance_band(), PerformanceBand::Medium);

        entry.correct_attempts = 4;
        assert_eq!(entry.accuracy_percent(), 100.0);
        assert_eq!(entry.performance_band(), PerformanceBand::High);
    }

    #[test]
    fn test_display_example_hides_placeholders() {
        let mut entry = WordEntry::new("word", "def", "(No example found for this word.)", now());
        assert_eq!(entry.display_example(), None);

        entry.example = "  A word to the wise. ".to_string();
        assert_eq!(entry.display_example(), Some("A word to the wise."));
    }

    #[test]
    fn test_needs_repair() {
        let mut entry = WordEntry::new("word", "def", "", now());
        entry.next_due_at = None;
        assert!(entry.needs_repair());

        entry.next_due_at = Some(now());
        entry.repetition_level = MAX_LEVEL + 1;
        assert!(entry.needs_repair());
    }
}
