//! Database
//!
//! SQLite persistence for todos and the signed-in session.

pub mod models;
pub mod session;
pub mod todos;

use std::path::Path;

use rusqlite::Connection;

use crate::error::DashboardResult;

pub use models::Todo;
pub use todos::{create_todo, delete_todo, get_todos_for_user, set_completed, set_due_date, set_text};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS todos (
    id         TEXT PRIMARY KEY,
    text       TEXT NOT NULL,
    completed  INTEGER NOT NULL DEFAULT 0,
    user_id    TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    due_date   INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_todos_user_created ON todos(user_id, created_at);

CREATE TABLE IF NOT EXISTS session (
    id           INTEGER PRIMARY KEY CHECK (id = 1),
    user_id      TEXT NOT NULL,
    signed_in_at INTEGER NOT NULL
);
";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> DashboardResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> DashboardResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> DashboardResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deskboard.db");
        let db = Database::open(&path).unwrap();
        assert!(path.exists());

        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM todos", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deskboard.db");
        drop(Database::open(&path).unwrap());
        assert!(Database::open(&path).is_ok());
    }
}
