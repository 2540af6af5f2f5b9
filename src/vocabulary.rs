//! 生词本门面
//!
//! [`Vocabulary`] 显式持有单词集合、存储、时钟与随机数生成器，
//! 所有修改（录入、编辑、删除、评判、旧数据修复）都会在返回前同步写入存储。
//! 写入失败以 [`ReviewError::Storage`] 返回，此时内存中的修改已经生效。

use chrono::{DateTime, FixedOffset, Offset, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::clock::{Clock, SystemClock};
use crate::error::{ReviewError, ReviewResult};
use crate::lookup::WordDraft;
use crate::models::{same_term, WordEntry};
use crate::practice::pick_practice_word;
use crate::srs::{self, ReviewOutcome, ReviewSession};
use crate::storage::VocabularyStore;

// ============================================================
// 响应类型定义
// ============================================================

/// 开始复习的结果
#[derive(Debug)]
pub enum SessionStart {
    /// 会话已就绪
    Ready(ReviewSession),
    /// 今日没有到期单词；调用方需询问用户是否改为复习整个词库
    NothingDue { total_words: usize },
    /// 词库为空，无法开始复习
    EmptyVocabulary,
}

/// 词库统计
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VocabularyStats {
    pub total_words: usize,
    pub due_today: usize,
    /// 达到最高复习等级的单词数
    pub mastered_words: usize,
    pub total_attempts: u64,
    pub correct_attempts: u64,
    /// 总正确率 (0-100)
    pub accuracy_percent: f64,
}

// ============================================================
// Vocabulary
// ============================================================

/// 生词本
pub struct Vocabulary<S, C = SystemClock> {
    entries: Vec<WordEntry>,
    store: S,
    clock: C,
    rng: ChaCha8Rng,
    day_offset: FixedOffset,
}

impl<S: VocabularyStore, C: Clock> Vocabulary<S, C> {
    /// 从存储加载词库
    pub fn open(store: S, clock: C) -> ReviewResult<Self> {
        let entries = store.load()?;
        info!(count = entries.len(), "vocabulary loaded");

        // 未指定种子时使用系统时间
        let seed = {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        };

        Ok(Self {
            entries,
            store,
            clock,
            rng: ChaCha8Rng::seed_from_u64(seed),
            day_offset: Utc.fix(),
        })
    }

    /// 固定洗牌种子（用于测试与复现）
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// 设置判定自然日所用的时区偏移
    pub fn with_day_offset(mut self, offset: FixedOffset) -> Self {
        self.day_offset = offset;
        self
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn day_offset(&self) -> FixedOffset {
        self.day_offset
    }

    // ========== 查询 ==========

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 忽略大小写查找
    pub fn get(&self, term: &str) -> Option<&WordEntry> {
        self.entries.iter().find(|entry| entry.matches_term(term))
    }

    fn position_of(&self, term: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.matches_term(term))
    }

    /// 按字母顺序（忽略大小写）排列的条目，用于列表展示
    pub fn sorted_entries(&self) -> Vec<&WordEntry> {
        let mut sorted: Vec<&WordEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| {
            a.term
                .to_lowercase()
                .cmp(&b.term.to_lowercase())
                .then_with(|| a.term.cmp(&b.term))
        });
        sorted
    }

    pub fn stats(&self) -> VocabularyStats {
        let now = self.clock.now();
        let total_attempts: u64 = self.entries.iter().map(|e| u64::from(e.total_attempts)).sum();
        let correct_attempts: u64 = self.entries.iter().map(|e| u64::from(e.correct_attempts)).sum();

        VocabularyStats {
            total_words: self.entries.len(),
            due_today: self
                .entries
                .iter()
                .filter(|entry| srs::is_due(entry, now, &self.day_offset))
                .count(),
            mastered_words: self.entries.iter().filter(|entry| entry.is_mastered()).count(),
            total_attempts,
            correct_attempts,
            accuracy_percent: if total_attempts == 0 {
                0.0
            } else {
                correct_attempts as f64 / total_attempts as f64 * 100.0
            },
        }
    }

    // ========== 持久化 ==========

    fn persist(&self) -> ReviewResult<()> {
        self.store.save(&self.entries).map_err(|err| {
            error!(error = %err, "failed to persist vocabulary");
            ReviewError::Storage(err)
        })
    }

    fn ensure_unique(&self, term: &str, except: Option<usize>) -> ReviewResult<()> {
        let duplicate = self
            .entries
            .iter()
            .enumerate()
            .any(|(idx, entry)| Some(idx) != except && entry.matches_term(term));
        if duplicate {
            return Err(ReviewError::Duplicate(term.to_string()));
        }
        Ok(())
    }

    fn lookup_failed(term: &str, operation: &str) -> ReviewError {
        error!(term = %term, operation, "word not found in vocabulary");
        ReviewError::Lookup(term.to_string())
    }

    // ========== 录入 / 编辑 / 删除 ==========

    /// 录入新单词：等级 0，立即到期
    pub fn add_word(&mut self, draft: WordDraft) -> ReviewResult<&WordEntry> {
        let draft = draft.validate()?;
        self.ensure_unique(&draft.term, None)?;

        let entry = WordEntry::new(draft.term, draft.definition, draft.example, self.clock.now());
        info!(term = %entry.term, "word added");
        self.entries.push(entry);
        self.persist()?;

        let idx = self.entries.len() - 1;
        Ok(&self.entries[idx])
    }

    /// 编辑单词
    ///
    /// 复习计数保留；若单词拼写（忽略大小写）发生变化，视为新的学习项，等级归零并立即到期。
    pub fn edit_word(&mut self, original_term: &str, draft: WordDraft) -> ReviewResult<&WordEntry> {
        let idx = self
            .position_of(original_term)
            .ok_or_else(|| Self::lookup_failed(original_term, "edit"))?;
        let draft = draft.validate()?;
        self.ensure_unique(&draft.term, Some(idx))?;

        let now = self.clock.now();
        let entry = &mut self.entries[idx];
        let term_changed = !same_term(&entry.term, &draft.term);

        entry.term = draft.term;
        entry.definition = draft.definition;
        entry.example = draft.example;
        if term_changed {
            entry.repetition_level = 0;
            entry.next_due_at = Some(now);
        }
        info!(from = %original_term, to = %entry.term, term_changed, "word updated");

        self.persist()?;
        Ok(&self.entries[idx])
    }

    pub fn remove_word(&mut self, term: &str) -> ReviewResult<WordEntry> {
        let idx = self
            .position_of(term)
            .ok_or_else(|| Self::lookup_failed(term, "remove"))?;

        let removed = self.entries.remove(idx);
        info!(term = %removed.term, "word removed");
        self.persist()?;
        Ok(removed)
    }

    // ========== 复习会话 ==========

    /// 筛选今日到期的单词并开启会话
    ///
    /// 筛选中修复过的旧数据会立即写回存储。
    pub fn start_session(&mut self) -> ReviewResult<SessionStart> {
        if self.entries.is_empty() {
            info!("vocabulary is empty, no session started");
            return Ok(SessionStart::EmptyVocabulary);
        }

        let now = self.clock.now();
        let due = srs::select_due(&mut self.entries, now, &self.day_offset);
        if due.repaired > 0 {
            self.persist()?;
        }

        if due.is_empty() {
            info!(total = self.entries.len(), "no words due today");
            return Ok(SessionStart::NothingDue {
                total_words: self.entries.len(),
            });
        }

        let session = ReviewSession::start(due.terms, &mut self.rng);
        info!(cards = session.len(), "review session started");
        Ok(SessionStart::Ready(session))
    }

    /// 用户确认后复习整个词库
    pub fn start_full_review(&mut self) -> ReviewResult<SessionStart> {
        if self.entries.is_empty() {
            return Ok(SessionStart::EmptyVocabulary);
        }

        let terms = self.entries.iter().map(|entry| entry.term.clone()).collect();
        let session = ReviewSession::start_full_review(terms, &mut self.rng);
        info!(cards = session.len(), "full review session started");
        Ok(SessionStart::Ready(session))
    }

    /// 当前卡片对应的条目
    pub fn current_card(&self, session: &ReviewSession) -> Option<&WordEntry> {
        session.current_term().and_then(|term| self.get(term))
    }

    /// 对当前卡片做出评判
    ///
    /// 仅在答案面朝上且本卡尚未评判时有效。
    pub fn judge(&mut self, session: &mut ReviewSession, passed: bool) -> ReviewResult<ReviewOutcome> {
        if !session.can_judge() {
            debug!(position = session.position(), face = ?session.face(), "judgment rejected");
            return Err(ReviewError::JudgmentUnavailable);
        }
        let term = session
            .current_term()
            .map(str::to_owned)
            .ok_or(ReviewError::JudgmentUnavailable)?;

        let result = self.record_outcome(&term, passed);
        if !matches!(result, Err(ReviewError::Lookup(_))) {
            session.mark_judged();
        }
        result
    }

    /// 记录一次复习结果；单词不存在时返回 [`ReviewError::Lookup`] 且不做任何修改
    pub fn record_outcome(&mut self, term: &str, passed: bool) -> ReviewResult<ReviewOutcome> {
        let now = self.clock.now();
        self.record_outcome_at(term, passed, now)
    }

    fn record_outcome_at(&mut self, term: &str, passed: bool, now: DateTime<Utc>) -> ReviewResult<ReviewOutcome> {
        let idx = self
            .position_of(term)
            .ok_or_else(|| Self::lookup_failed(term, "record_outcome"))?;

        let outcome = srs::record_outcome(&mut self.entries[idx], passed, now);
        info!(
            term = %outcome.term,
            passed,
            from = outcome.previous_level,
            to = outcome.new_level,
            next_due_at = %outcome.next_due_at,
            "review outcome recorded"
        );

        self.persist()?;
        Ok(outcome)
    }

    // ========== 造句练习 ==========

    /// 随机抽取一个练习单词
    pub fn practice_word(&mut self) -> Option<&WordEntry> {
        pick_practice_word(&self.entries, &mut self.rng)
    }
}
