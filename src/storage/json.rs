//! JSON 文件存储
//!
//! 文件格式:
//! ```json
//! { "schema_version": 1, "words": [ { "term": "...", ... } ] }
//! ```
//! 读取时兼容旧版无版本的裸数组，以及旧字段名 (`word`, `srLevel`, `nextReviewDate` 等)。

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::WordEntry;
use crate::storage::record::{format_timestamp, RawWordRecord};
use crate::storage::{StorageError, StorageResult, VocabularyStore};

/// 当前 JSON 文件格式版本
pub const JSON_SCHEMA_VERSION: u32 = 1;

// ============================================================
// 文件格式
// ============================================================

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VocabularyFile {
    Versioned { schema_version: u32, words: Vec<Value> },
    Legacy(Vec<Value>),
}

#[derive(Debug, Serialize)]
struct VersionedFileOut<'a> {
    schema_version: u32,
    words: Vec<PersistedWord<'a>>,
}

#[derive(Debug, Serialize)]
struct PersistedWord<'a> {
    term: &'a str,
    definition: &'a str,
    example: &'a str,
    correct_attempts: u32,
    total_attempts: u32,
    last_reviewed_at: Option<String>,
    repetition_level: usize,
    next_due_at: Option<String>,
}

impl<'a> From<&'a WordEntry> for PersistedWord<'a> {
    fn from(entry: &'a WordEntry) -> Self {
        Self {
            term: &entry.term,
            definition: &entry.definition,
            example: &entry.example,
            correct_attempts: entry.correct_attempts,
            total_attempts: entry.total_attempts,
            last_reviewed_at: entry.last_reviewed_at.map(format_timestamp),
            repetition_level: entry.repetition_level,
            next_due_at: entry.next_due_at.map(format_timestamp),
        }
    }
}

/// 单条记录的宽松形式：任何字段都可能类型不符、为 null 或缺失
#[derive(Debug, Default, Deserialize)]
struct StoredWordRecord {
    #[serde(default, alias = "word")]
    term: Value,
    #[serde(default)]
    definition: Value,
    #[serde(default)]
    example: Value,
    #[serde(default, alias = "correctAttempts")]
    correct_attempts: Value,
    #[serde(default, alias = "totalAttempts")]
    total_attempts: Value,
    #[serde(default, alias = "lastReviewed")]
    last_reviewed_at: Value,
    #[serde(default, alias = "srLevel")]
    repetition_level: Value,
    #[serde(default, alias = "nextReviewDate")]
    next_due_at: Value,
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// 文本字段：数字也按文本保留，null 与其他类型视为空
fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

impl From<StoredWordRecord> for RawWordRecord {
    fn from(stored: StoredWordRecord) -> Self {
        Self {
            term: value_as_text(&stored.term),
            definition: value_as_text(&stored.definition),
            example: value_as_string(&stored.example).unwrap_or_default(),
            correct_attempts: value_as_i64(&stored.correct_attempts),
            total_attempts: value_as_i64(&stored.total_attempts),
            last_reviewed_at: value_as_string(&stored.last_reviewed_at),
            repetition_level: value_as_i64(&stored.repetition_level),
            next_due_at: value_as_string(&stored.next_due_at),
        }
    }
}

// ============================================================
// JsonFileStore
// ============================================================

/// JSON 文件存储
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 解析文件内容
    pub fn decode(contents: &str) -> StorageResult<Vec<WordEntry>> {
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let words = match serde_json::from_str::<VocabularyFile>(contents)? {
            VocabularyFile::Versioned {
                schema_version,
                words,
            } => {
                if schema_version > JSON_SCHEMA_VERSION {
                    return Err(StorageError::UnsupportedSchema(schema_version));
                }
                words
            }
            VocabularyFile::Legacy(words) => {
                debug!(count = words.len(), "reading legacy unversioned vocabulary file");
                words
            }
        };

        let entries = words
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<StoredWordRecord>(value) {
                Ok(stored) => RawWordRecord::from(stored).into_entry(),
                Err(err) => {
                    warn!(error = %err, "skipping malformed vocabulary record");
                    None
                }
            })
            .collect();

        Ok(entries)
    }

    /// 序列化为当前版本格式
    pub fn encode(entries: &[WordEntry]) -> StorageResult<String> {
        let file = VersionedFileOut {
            schema_version: JSON_SCHEMA_VERSION,
            words: entries.iter().map(PersistedWord::from).collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }
}

impl VocabularyStore for JsonFileStore {
    fn load(&self) -> StorageResult<Vec<WordEntry>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Self::decode(&contents),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// 先写临时文件再重命名，避免写到一半的文件覆盖旧数据
    fn save(&self, entries: &[WordEntry]) -> StorageResult<()> {
        let contents = Self::encode(entries)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), count = entries.len(), "vocabulary saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_entries() -> Vec<WordEntry> {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        let mut reviewed = WordEntry::new("serene", "calm", "A serene lake.", now);
        reviewed.correct_attempts = 1;
        reviewed.total_attempts = 2;
        reviewed.last_reviewed_at = Some(now);
        reviewed.repetition_level = 1;
        reviewed.next_due_at = Some(now + chrono::Duration::days(1));

        vec![WordEntry::new("ephemeral", "short-lived", "", now), reviewed]
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("missing.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("vocabulary.json"));
        let entries = sample_entries();

        store.save(&entries).unwrap();
        assert_eq!(store.load().unwrap(), entries);

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"schema_version\": 1"));
    }

    #[test]
    fn test_legacy_array_is_read_and_repaired_later() {
        let legacy = r#"[
            {"word": "ephemeral", "definition": "short-lived", "example": "",
             "correctAttempts": 1, "totalAttempts": 1, "lastReviewed": "2026-10-17T08:00:00.000Z",
             "srLevel": 1, "nextReviewDate": "2026-10-18T08:00:00.000Z"},
            {"word": "serene", "definition": "calm", "correctAttempts": 0, "totalAttempts": 0,
             "lastReviewed": null},
            {"word": "garbled", "definition": "mixed up", "srLevel": "two",
             "nextReviewDate": "Invalid Date"}
        ]"#;

        let entries = JsonFileStore::decode(legacy).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].repetition_level, 1);
        assert!(!entries[0].needs_repair());
        assert!(entries[1].needs_repair());
        assert!(entries[2].needs_repair());
    }

    #[test]
    fn test_null_or_mistyped_text_fields_are_kept() {
        let legacy = r#"[
            {"word": "kept", "definition": null, "srLevel": 2,
             "nextReviewDate": "2026-10-18T08:00:00.000Z"},
            {"word": 1984, "definition": ["not", "text"]},
            {"word": null, "definition": "no term"}
        ]"#;

        let entries = JsonFileStore::decode(legacy).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].term, "kept");
        assert_eq!(entries[0].definition, "");
        assert_eq!(entries[0].repetition_level, 2);
        assert_eq!(entries[1].term, "1984");
        assert_eq!(entries[1].definition, "");
    }

    #[test]
    fn test_future_schema_is_rejected() {
        let result = JsonFileStore::decode(r#"{"schema_version": 99, "words": []}"#);
        assert!(matches!(result, Err(StorageError::UnsupportedSchema(99))));
    }

    #[test]
    fn test_malformed_record_is_skipped() {
        let entries =
            JsonFileStore::decode(r#"{"schema_version": 1, "words": [42, {"term": "ok", "definition": "fine"}]}"#)
                .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].term, "ok");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        assert!(matches!(
            JsonFileStore::decode("{not json"),
            Err(StorageError::Serialization(_))
        ));
    }
}
