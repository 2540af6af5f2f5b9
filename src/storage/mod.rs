//! 词库持久化模块
//!
//! 引擎只通过 [`VocabularyStore`] 的 `load` / `save` 两个操作与存储交互，提供：
//! - JSON 文件存储（带 schema 版本，兼容旧版无版本数组）
//! - SQLite 存储（带迁移记录）
//! - 内存存储（测试与嵌入使用，可注入写入失败）

// ============================================================
// 子模块声明
// ============================================================

pub mod json;
pub mod memory;
pub mod migrations;
pub mod record;
pub mod sqlite;

// ============================================================
// 重新导出主要类型
// ============================================================

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use record::RawWordRecord;
pub use sqlite::SqliteStore;

use std::path::Path;

use thiserror::Error;

use crate::config::StoreKind;
use crate::models::WordEntry;

// ============================================================
// 错误类型定义
// ============================================================

/// 存储模块错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("文件读写错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("迁移错误: {0}")]
    Migration(String),

    #[error("不支持的数据版本: {0}")]
    UnsupportedSchema(u32),

    #[error("锁获取失败: {0}")]
    LockError(String),

    #[error("存储不可用: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

// ============================================================
// VocabularyStore - 存储接口
// ============================================================

/// 词库存储
///
/// `save` 总是写入完整集合（保持顺序），写入失败必须返回错误而不是吞掉。
pub trait VocabularyStore {
    fn load(&self) -> StorageResult<Vec<WordEntry>>;

    fn save(&self, entries: &[WordEntry]) -> StorageResult<()>;
}

impl<T: VocabularyStore + ?Sized> VocabularyStore for Box<T> {
    fn load(&self) -> StorageResult<Vec<WordEntry>> {
        (**self).load()
    }

    fn save(&self, entries: &[WordEntry]) -> StorageResult<()> {
        (**self).save(entries)
    }
}

/// 按配置打开存储
pub fn open_store(kind: StoreKind, path: &Path) -> StorageResult<Box<dyn VocabularyStore>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let store: Box<dyn VocabularyStore> = match kind {
        StoreKind::Sqlite => Box::new(SqliteStore::new(path)?),
        StoreKind::Json => Box::new(JsonFileStore::new(path)),
    };
    tracing::info!(path = %path.display(), ?kind, "vocabulary store opened");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_open_store_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vocabulary.json");

        let store = open_store(StoreKind::Json, &path).unwrap();
        store
            .save(&[WordEntry::new("word", "def", "", Utc::now())])
            .unwrap();

        assert!(path.exists());
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_open_sqlite_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocabulary.db");

        let store = open_store(StoreKind::Sqlite, &path).unwrap();
        assert!(store.load().unwrap().is_empty());
    }
}
