//! SQLite 存储
//!
//! `word_entry.term` 以 `COLLATE NOCASE` 作为主键，`position` 保存集合顺序。
//! `save` 在单个事务中整体替换表内容。

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row};
use tracing::debug;

use crate::models::WordEntry;
use crate::storage::migrations;
use crate::storage::record::RawWordRecord;
use crate::storage::{StorageError, StorageResult, VocabularyStore};

/// SQLite 词库存储
pub struct SqliteStore {
    connection: Mutex<Connection>,
    db_path: String,
}

impl SqliteStore {
    /// 打开（或创建）数据库文件并运行迁移
    pub fn new<P: AsRef<Path>>(db_path: P) -> StorageResult<Self> {
        let path_str = db_path.as_ref().to_string_lossy().to_string();
        let connection = Connection::open(&db_path)?;

        connection.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=FULL;",
        )?;

        Self::with_connection(connection, path_str)
    }

    /// 内存数据库（用于测试）
    pub fn in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?, ":memory:".to_string())
    }

    fn with_connection(connection: Connection, db_path: String) -> StorageResult<Self> {
        migrations::run_migrations(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
            db_path,
        })
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    fn get_conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|e| StorageError::LockError(e.to_string()))
    }

    /// 当前 schema 版本
    pub fn schema_version(&self) -> StorageResult<i32> {
        let conn = self.get_conn()?;
        migrations::current_version(&conn)
    }
}

// ============================================================
// 行解析
// ============================================================

/// 宽松读取整数列：SQLite 是动态类型，旧数据里可能存成文本
fn lenient_i64(row: &Row, column: &str) -> rusqlite::Result<Option<i64>> {
    Ok(match row.get_ref(column)? {
        ValueRef::Integer(v) => Some(v),
        ValueRef::Real(v) if v.fract() == 0.0 => Some(v as i64),
        ValueRef::Text(text) => std::str::from_utf8(text)
            .ok()
            .and_then(|s| s.trim().parse().ok()),
        _ => None,
    })
}

fn lenient_text(row: &Row, column: &str) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(column)? {
        ValueRef::Text(text) => Some(String::from_utf8_lossy(text).into_owned()),
        _ => None,
    })
}

fn raw_from_row(row: &Row) -> rusqlite::Result<RawWordRecord> {
    Ok(RawWordRecord {
        term: row.get("term")?,
        definition: lenient_text(row, "definition")?.unwrap_or_default(),
        example: lenient_text(row, "example")?.unwrap_or_default(),
        correct_attempts: lenient_i64(row, "correct_attempts")?,
        total_attempts: lenient_i64(row, "total_attempts")?,
        last_reviewed_at: lenient_text(row, "last_reviewed_at")?,
        repetition_level: lenient_i64(row, "repetition_level")?,
        next_due_at: lenient_text(row, "next_due_at")?,
    })
}

impl VocabularyStore for SqliteStore {
    fn load(&self) -> StorageResult<Vec<WordEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT term, definition, example, correct_attempts, total_attempts,
                   last_reviewed_at, repetition_level, next_due_at
            FROM word_entry
            ORDER BY position ASC, rowid ASC
            "#,
        )?;

        let raws = stmt
            .query_map([], raw_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(raws.into_iter().filter_map(RawWordRecord::into_entry).collect())
    }

    fn save(&self, entries: &[WordEntry]) -> StorageResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM word_entry", [])?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO word_entry (
                    term, definition, example, correct_attempts, total_attempts,
                    last_reviewed_at, repetition_level, next_due_at, position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )?;

            for (position, entry) in entries.iter().enumerate() {
                let raw = RawWordRecord::from(entry);
                stmt.execute(params![
                    raw.term,
                    raw.definition,
                    raw.example,
                    raw.correct_attempts,
                    raw.total_attempts,
                    raw.last_reviewed_at,
                    raw.repetition_level,
                    raw.next_due_at,
                    position as i64,
                ])?;
            }
        }
        tx.commit()?;

        debug!(db = %self.db_path, count = entries.len(), "vocabulary saved");
        Ok(())
    }
}
