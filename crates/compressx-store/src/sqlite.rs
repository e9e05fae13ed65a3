use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::{KeyValueStore, RecordKind, Result, StoreKey, UserId};

/// Key-value records in a single sqlite table keyed by `(user, kind)`
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS records (
                user TEXT NOT NULL,
                kind TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user, kind)
            );
            CREATE INDEX IF NOT EXISTS idx_kind ON records(kind);
            ",
        )?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &StoreKey) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM records WHERE user = ?1 AND kind = ?2",
                params![key.user.as_str(), key.kind.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&mut self, key: &StoreKey, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO records (user, kind, value, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user, kind) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![
                key.user.as_str(),
                key.kind.as_str(),
                value,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &StoreKey) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM records WHERE user = ?1 AND kind = ?2",
            params![key.user.as_str(), key.kind.as_str()],
        )?;
        Ok(removed > 0)
    }

    fn users(&self, kind: RecordKind) -> Result<Vec<UserId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT user FROM records WHERE kind = ?1 ORDER BY user")?;
        let rows = stmt.query_map(params![kind.as_str()], |row| row.get::<_, String>(0))?;

        let mut users = Vec::new();
        for row in rows {
            users.push(UserId::new(row?)?);
        }
        Ok(users)
    }
}
