//! 内存存储
//!
//! 进程内保存一份快照，可通过 [`MemoryStore::fail_writes`] 模拟写入失败。
//! 克隆出的实例共享同一份数据。

use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::WordEntry;
use crate::storage::{StorageError, StorageResult, VocabularyStore};

#[derive(Debug, Default)]
struct MemoryState {
    entries: Vec<WordEntry>,
    fail_writes: bool,
    save_count: usize,
}

/// 内存词库存储
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以已有条目初始化
    pub fn with_entries(entries: Vec<WordEntry>) -> Self {
        let store = Self::default();
        if let Ok(mut state) = store.state.lock() {
            state.entries = entries;
        }
        store
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|e| StorageError::LockError(e.to_string()))
    }

    /// 之后的写入全部失败（或恢复正常）
    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_writes = fail;
        }
    }

    /// 已成功写入的次数
    pub fn save_count(&self) -> usize {
        self.state.lock().map(|s| s.save_count).unwrap_or(0)
    }

    /// 当前持久化内容的副本
    pub fn snapshot(&self) -> Vec<WordEntry> {
        self.state
            .lock()
            .map(|s| s.entries.clone())
            .unwrap_or_default()
    }
}

impl VocabularyStore for MemoryStore {
    fn load(&self) -> StorageResult<Vec<WordEntry>> {
        Ok(self.lock()?.entries.clone())
    }

    fn save(&self, entries: &[WordEntry]) -> StorageResult<()> {
        let mut state = self.lock()?;
        if state.fail_writes {
            return Err(StorageError::Unavailable("memory store rejects writes".to_string()));
        }
        state.entries = entries.to_vec();
        state.save_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_clones_share_state() {
        let store = MemoryStore::new();
        let handle = store.clone();

        store.save(&[WordEntry::new("word", "def", "", Utc::now())]).unwrap();

        assert_eq!(handle.snapshot().len(), 1);
        assert_eq!(handle.save_count(), 1);
    }

    #[test]
    fn test_failing_writes_keep_previous_snapshot() {
        let store = MemoryStore::with_entries(vec![WordEntry::new("old", "def", "", Utc::now())]);
        store.fail_writes(true);

        let result = store.save(&[]);

        assert!(matches!(result, Err(StorageError::Unavailable(_))));
        assert_eq!(store.load().unwrap().len(), 1);
        assert_eq!(store.save_count(), 0);
    }
}
