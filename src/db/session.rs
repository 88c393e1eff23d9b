//! Signed-in session row

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

pub fn get_session_user(conn: &Connection) -> rusqlite::Result<Option<String>> {
    conn.query_row("SELECT user_id FROM session WHERE id = 1", [], |r| r.get(0))
        .optional()
}

pub fn save_session(conn: &Connection, user_id: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO session (id, user_id, signed_in_at) VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET user_id = excluded.user_id, signed_in_at = excluded.signed_in_at",
        params![user_id, Utc::now().timestamp_millis()],
    )?;
    Ok(())
}

pub fn clear_session(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM session", [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_session_lifecycle() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(get_session_user(db.conn()).unwrap(), None);

        save_session(db.conn(), "kim").unwrap();
        save_session(db.conn(), "lee").unwrap();
        assert_eq!(get_session_user(db.conn()).unwrap().as_deref(), Some("lee"));

        clear_session(db.conn()).unwrap();
        assert_eq!(get_session_user(db.conn()).unwrap(), None);
    }
}
