//! 间隔复习核心
//!
//! 数据流: 词库 → [`select_due`] → [`ReviewSession`] → 用户评判 → [`record_outcome`] → 词库

pub mod due;
pub mod intervals;
pub mod outcome;
pub mod session;

pub use due::{is_due, select_due, DueSet};
pub use intervals::{interval_days, next_due_after, INTERVAL_DAYS, MAX_LEVEL};
pub use outcome::{record_outcome, ReviewOutcome};
pub use session::{CardFace, ReviewSession, SessionState};
