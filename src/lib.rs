//! # danci-review - 生词本复习引擎
//!
//! 本 crate 实现个人生词本的间隔复习核心:
//!
//! - **Interval Table** - 固定的复习间隔阶梯 (天)
//! - **Due-Set Selector** - 按自然日筛选今日到期的单词，并修复旧版数据
//! - **Session Sequencer** - 打乱到期单词，维护卡片游标与正反面状态
//! - **Review Outcome Processor** - 根据记住/没记住更新复习等级与下次到期时间
//!
//! ## 模块结构
//!
//! - [`srs`] - 间隔表、到期筛选、复习会话、结果处理
//! - [`models`] - 单词条目数据结构
//! - [`vocabulary`] - 持有单词集合与存储的门面
//! - [`storage`] - JSON 文件 / SQLite / 内存存储实现
//! - [`lookup`] - 词典查询边界与录入校验
//! - [`practice`] - 造句练习检查
//! - [`clock`] - 可注入的时钟
//! - [`config`] / [`logging`] - 环境变量配置与 tracing 初始化
//!
//! ## 使用示例
//!
//! ```rust
//! use danci_review::{FixedClock, MemoryStore, SessionStart, Vocabulary, WordDraft};
//!
//! let clock = FixedClock::at_ymd(2026, 10, 18);
//! let mut vocab = Vocabulary::open(MemoryStore::new(), clock).unwrap().with_seed(7);
//! vocab
//!     .add_word(WordDraft::new("ephemeral", "lasting for a very short time", ""))
//!     .unwrap();
//!
//! if let SessionStart::Ready(mut session) = vocab.start_session().unwrap() {
//!     session.flip();
//!     let outcome = vocab.judge(&mut session, true).unwrap();
//!     assert_eq!(outcome.new_level, 1);
//! }
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod models;
pub mod practice;
pub mod srs;
pub mod storage;
pub mod vocabulary;

// ============================================================================
// 重新导出
// ============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, StoreKind};
pub use error::{ReviewError, ReviewResult};
pub use lookup::{DictionaryLookup, LookupOutcome, WordDraft};
pub use models::{PerformanceBand, WordEntry};
pub use practice::{check_sentence, SentenceFeedback, SentenceIssue};
pub use srs::{
    record_outcome, select_due, CardFace, DueSet, ReviewOutcome, ReviewSession, SessionState,
    INTERVAL_DAYS, MAX_LEVEL,
};
pub use storage::{JsonFileStore, MemoryStore, SqliteStore, StorageError, VocabularyStore};
pub use vocabulary::{SessionStart, Vocabulary, VocabularyStats};
