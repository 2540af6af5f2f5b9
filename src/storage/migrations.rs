//! SQLite 迁移
//!
//! 已应用的版本记录在 `schema_migrations` 中。每个迁移与它的版本记录在同一个
//! `IMMEDIATE` 事务里提交，失败时整体回滚。

use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use tracing::{error, info};

use crate::storage::{StorageError, StorageResult};

/// 当前数据库 schema 版本
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// 迁移定义
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i32,
    pub name: &'static str,
    pub sql: &'static str,
}

/// 按版本号排序的迁移列表
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "word_entry",
    // term 忽略大小写唯一；position 保存集合顺序，load 按它排序
    sql: r#"
        CREATE TABLE IF NOT EXISTS word_entry (
            term TEXT PRIMARY KEY COLLATE NOCASE,
            definition TEXT NOT NULL DEFAULT '',
            example TEXT NOT NULL DEFAULT '',
            correct_attempts INTEGER NOT NULL DEFAULT 0,
            total_attempts INTEGER NOT NULL DEFAULT 0,
            last_reviewed_at TEXT,
            repetition_level INTEGER,
            next_due_at TEXT,
            position INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_word_entry_position
            ON word_entry(position);
    "#,
}];

fn ensure_ledger(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        );
        "#,
    )
    .map_err(|e| StorageError::Migration(format!("无法创建迁移记录表: {e}")))
}

/// 已记录的最高版本，空库为 0
pub fn current_version(conn: &Connection) -> StorageResult<i32> {
    ensure_ledger(conn)?;
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn apply(conn: &Connection, migration: &Migration) -> StorageResult<()> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    tx.execute_batch(migration.sql).map_err(|e| {
        StorageError::Migration(format!("迁移 v{} ({}) 失败: {e}", migration.version, migration.name))
    })?;
    tx.execute(
        "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
        params![
            migration.version,
            migration.name,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;

    // 提前返回时 tx 被 drop，自动回滚
    tx.commit()?;
    Ok(())
}

/// 依次应用尚未执行的迁移，返回最终版本号
///
/// 数据库版本高于本程序支持的版本时返回 [`StorageError::UnsupportedSchema`]。
pub fn run_migrations(conn: &Connection) -> StorageResult<i32> {
    let mut version = current_version(conn)?;
    if version > CURRENT_SCHEMA_VERSION {
        return Err(StorageError::UnsupportedSchema(version as u32));
    }

    for migration in MIGRATIONS.iter().filter(move |m| m.version > version) {
        info!(version = migration.version, name = migration.name, "applying migration");
        if let Err(err) = apply(conn, migration) {
            error!(version = migration.version, error = %err, "migration failed");
            return Err(err);
        }
        version = migration.version;
    }

    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_migrations_are_contiguous() {
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version, i as i32 + 1);
        }
        assert_eq!(MIGRATIONS.last().map(|m| m.version), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_fresh_database_is_migrated() {
        let conn = Connection::open_in_memory().unwrap();

        assert_eq!(run_migrations(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
        assert_eq!(current_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
        assert!(table_exists(&conn, "word_entry"));
    }

    #[test]
    fn test_rerun_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let applied: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, MIGRATIONS.len() as i64);
    }

    #[test]
    fn test_newer_database_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO schema_migrations (version, name, applied_at) VALUES (99, 'future', '')",
            [],
        )
        .unwrap();

        assert!(matches!(
            run_migrations(&conn),
            Err(StorageError::UnsupportedSchema(99))
        ));
    }

    #[test]
    fn test_failed_migration_rolls_back() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_ledger(&conn).unwrap();

        let broken = Migration {
            version: 7,
            name: "broken",
            sql: "CREATE TABLE partial (id INTEGER); NOT SQL;",
        };

        assert!(matches!(apply(&conn, &broken), Err(StorageError::Migration(_))));
        assert_eq!(current_version(&conn).unwrap(), 0);
        assert!(!table_exists(&conn, "partial"));
    }
}
