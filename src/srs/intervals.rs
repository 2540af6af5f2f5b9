//! 复习间隔表
//!
//! 等级 i 表示本次复习后 `INTERVAL_DAYS[i]` 天再次到期，等级 0 即下次打开就到期。

use chrono::{DateTime, Duration, Utc};

/// 各复习等级对应的间隔天数
pub const INTERVAL_DAYS: [i64; 8] = [0, 1, 3, 7, 15, 30, 60, 120];

/// 最高复习等级
pub const MAX_LEVEL: usize = INTERVAL_DAYS.len() - 1;

/// 将等级钳制到 `[0, MAX_LEVEL]`
pub fn clamp_level(level: usize) -> usize {
    level.min(MAX_LEVEL)
}

pub fn interval_days(level: usize) -> i64 {
    INTERVAL_DAYS[clamp_level(level)]
}

/// 以 `now` 为起点计算给定等级的下次到期时间
pub fn next_due_after(now: DateTime<Utc>, level: usize) -> DateTime<Utc> {
    now + Duration::days(interval_days(level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_intervals_are_non_decreasing() {
        for pair in INTERVAL_DAYS.windows(2) {
            assert!(pair[0] <= pair[1], "{:?} is not monotonic", pair);
        }
    }

    #[test]
    fn test_level_zero_is_immediate() {
        assert_eq!(interval_days(0), 0);
    }

    #[test]
    fn test_level_is_clamped() {
        assert_eq!(clamp_level(MAX_LEVEL + 5), MAX_LEVEL);
        assert_eq!(interval_days(100), 120);
    }

    #[test]
    fn test_next_due_after() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 21, 30, 0).unwrap();
        assert_eq!(
            next_due_after(now, 3),
            Utc.with_ymd_and_hms(2026, 10, 25, 21, 30, 0).unwrap()
        );
    }
}
