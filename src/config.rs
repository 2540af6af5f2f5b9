use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Local};
use serde::{Deserialize, Serialize};

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreKind {
    Sqlite,
    Json,
}

impl StoreKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "sqlite" | "db" => Some(Self::Sqlite),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// 根据文件扩展名推断，默认 SQLite
    pub fn infer(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Sqlite,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub store: StoreKind,
    /// 判定"今天"所用的时区偏移
    pub day_offset: FixedOffset,
    pub shuffle_seed: Option<u64>,
    pub log_level: String,
    /// 文件日志目录；`None` 表示只输出到终端
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let data_path = std::env::var("DANCI_DATA_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_path);

        let store = std::env::var("DANCI_STORE")
            .ok()
            .and_then(|value| StoreKind::parse(&value))
            .unwrap_or_else(|| StoreKind::infer(&data_path));

        let day_offset = std::env::var("DANCI_UTC_OFFSET")
            .ok()
            .and_then(|value| parse_utc_offset(&value))
            .unwrap_or_else(|| *Local::now().offset());

        let shuffle_seed = std::env::var("DANCI_SHUFFLE_SEED")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok());

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let log_dir = file_logging_enabled().then(|| {
            std::env::var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./logs"))
        });

        Self {
            data_path,
            store,
            day_offset,
            shuffle_seed,
            log_level,
            log_dir,
        }
    }

    /// 覆盖数据路径，存储类型随扩展名重新推断
    pub fn with_data_path(mut self, path: PathBuf) -> Self {
        self.store = StoreKind::infer(&path);
        self.data_path = path;
        self
    }
}

pub fn file_logging_enabled() -> bool {
    std::env::var("ENABLE_FILE_LOGS")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

fn default_data_path() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("danci")
        .join("vocabulary.db")
}

/// 解析 `+08:00` / `-0530` / `Z` 形式的时区偏移
pub fn parse_utc_offset(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match value.chars().next()? {
        '+' => (1, &value[1..]),
        '-' => (-1, &value[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 2 && digits.len() != 4 {
        return None;
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = if digits.len() == 4 { digits[2..].parse().ok()? } else { 0 };
    if hours > 14 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("+08:00"), FixedOffset::east_opt(8 * 3600));
        assert_eq!(parse_utc_offset("-0530"), FixedOffset::east_opt(-(5 * 3600 + 30 * 60)));
        assert_eq!(parse_utc_offset("+09"), FixedOffset::east_opt(9 * 3600));
        assert_eq!(parse_utc_offset("Z"), FixedOffset::east_opt(0));
        assert_eq!(parse_utc_offset("08:00"), None);
        assert_eq!(parse_utc_offset("+25:00"), None);
        assert_eq!(parse_utc_offset("+ab:cd"), None);
    }

    #[test]
    fn test_store_kind() {
        assert_eq!(StoreKind::infer(Path::new("words.JSON")), StoreKind::Json);
        assert_eq!(StoreKind::infer(Path::new("words.db")), StoreKind::Sqlite);
        assert_eq!(StoreKind::infer(Path::new("words")), StoreKind::Sqlite);
        assert_eq!(StoreKind::parse(" Json "), Some(StoreKind::Json));
        assert_eq!(StoreKind::parse("yaml"), None);
    }

    #[test]
    fn test_with_data_path_reinfers_store() {
        let config = Config {
            data_path: PathBuf::from("a.db"),
            store: StoreKind::Sqlite,
            day_offset: FixedOffset::east_opt(0).unwrap(),
            shuffle_seed: None,
            log_level: "info".to_string(),
            log_dir: None,
        };

        let config = config.with_data_path(PathBuf::from("b.json"));
        assert_eq!(config.store, StoreKind::Json);
    }
}
