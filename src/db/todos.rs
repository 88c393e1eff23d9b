//! Todo queries

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use super::models::Todo;

const COLUMNS: &str = "id, text, completed, user_id, created_at, due_date";

fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

fn row_to_todo(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        text: row.get(1)?,
        completed: row.get(2)?,
        user_id: row.get(3)?,
        created_at: from_millis(row.get(4)?),
        due_date: from_millis(row.get(5)?),
    })
}

pub fn create_todo(conn: &Connection, todo: &Todo) -> rusqlite::Result<()> {
    conn.execute(
        &format!("INSERT INTO todos ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
        params![
            todo.id,
            todo.text,
            todo.completed,
            todo.user_id,
            todo.created_at.timestamp_millis(),
            todo.due_date.timestamp_millis(),
        ],
    )?;
    Ok(())
}

#[cfg(test)]
pub fn get_todo(conn: &Connection, id: &str) -> rusqlite::Result<Todo> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM todos WHERE id = ?1"),
        params![id],
        row_to_todo,
    )
}

/// Todos owned by `user_id`, oldest first
pub fn get_todos_for_user(conn: &Connection, user_id: &str) -> rusqlite::Result<Vec<Todo>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM todos WHERE user_id = ?1 ORDER BY created_at ASC, rowid ASC"
    ))?;
    let rows = stmt.query_map(params![user_id], row_to_todo)?;
    rows.collect()
}

fn update_one(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> rusqlite::Result<()> {
    match conn.execute(sql, params)? {
        0 => Err(rusqlite::Error::QueryReturnedNoRows),
        _ => Ok(()),
    }
}

pub fn set_text(conn: &Connection, id: &str, text: &str) -> rusqlite::Result<()> {
    update_one(conn, "UPDATE todos SET text = ?1 WHERE id = ?2", params![text, id])
}

pub fn set_completed(conn: &Connection, id: &str, completed: bool) -> rusqlite::Result<()> {
    update_one(conn, "UPDATE todos SET completed = ?1 WHERE id = ?2", params![completed, id])
}

pub fn set_due_date(conn: &Connection, id: &str, due: DateTime<Utc>) -> rusqlite::Result<()> {
    update_one(
        conn,
        "UPDATE todos SET due_date = ?1 WHERE id = ?2",
        params![due.timestamp_millis(), id],
    )
}

pub fn delete_todo(conn: &Connection, id: &str) -> rusqlite::Result<()> {
    update_one(conn, "DELETE FROM todos WHERE id = ?1", params![id])
}
