//! 时钟抽象
//!
//! 所有与时间相关的逻辑都通过显式的 `now` 参数计算，
//! 门面层从注入的 [`Clock`] 读取当前时间，测试中可替换为 [`FixedClock`]。

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};

/// 当前时间来源
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 可手动拨动的固定时钟（用于测试）
///
/// 克隆出的实例共享同一个时间点，门面持有一份、测试代码持有一份即可从外部推进时间。
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    /// 指定日期的 UTC 09:00
    ///
    /// 非法日期回退到 Unix 纪元。
    pub fn at_ymd(year: i32, month: u32, day: u32) -> Self {
        let now = Utc
            .with_ymd_and_hms(year, month, day, 9, 0, 0)
            .single()
            .unwrap_or_default();
        Self::new(now)
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_days(&self, days: i64) {
        self.advance(Duration::days(days));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}
