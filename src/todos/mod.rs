//! Todo Store
//!
//! Write operations on the todo collection plus a live query that re-runs
//! after every write and pushes the fresh snapshot to its subscribers.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver, Sender};

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::db::{self, Database, Todo};
use crate::error::{DashboardError, DashboardResult};

/// Default due date when the user leaves the field empty
pub const DEFAULT_DUE_DAYS: i64 = 7;

/// One delivery of the live query: the full ordered list or the failure
pub type Snapshot = DashboardResult<Vec<Todo>>;

pub trait TodoStore {
    fn add(&self, user_id: &str, text: &str, due_date: DateTime<Utc>) -> DashboardResult<Todo>;
    fn set_text(&self, id: &str, text: &str) -> DashboardResult<()>;
    fn set_completed(&self, id: &str, completed: bool) -> DashboardResult<()>;
    fn set_due_date(&self, id: &str, due_date: DateTime<Utc>) -> DashboardResult<()>;
    fn delete(&self, id: &str) -> DashboardResult<()>;
    fn list_for_user(&self, user_id: &str) -> DashboardResult<Vec<Todo>>;
    /// Live query. Delivers the current snapshot immediately and again after each write.
    fn subscribe(&self, user_id: &str) -> Receiver<Snapshot>;
}

struct Subscriber {
    user_id: String,
    tx: Sender<Snapshot>,
}

pub struct SqliteTodoStore {
    db: Rc<Database>,
    subscribers: RefCell<Vec<Subscriber>>,
}

impl SqliteTodoStore {
    pub fn new(db: Rc<Database>) -> Self {
        Self { db, subscribers: RefCell::new(Vec::new()) }
    }

    /// Re-runs every live query, dropping subscribers whose receiver is gone
    fn publish(&self) {
        self.subscribers.borrow_mut().retain(|sub| {
            let snapshot = self.list_for_user(&sub.user_id);
            if let Err(e) = &snapshot {
                tracing::warn!(error = %e, "todo live query failed");
            }
            sub.tx.send(snapshot).is_ok()
        });
    }

    fn write(&self, op: &str, result: rusqlite::Result<()>) -> DashboardResult<()> {
        match result {
            Ok(()) => {
                tracing::debug!(op, "todo write");
                self.publish();
                Ok(())
            }
            Err(e) => {
                tracing::error!(op, error = %e, "todo write failed");
                Err(e.into())
            }
        }
    }
}

impl TodoStore for SqliteTodoStore {
    fn add(&self, user_id: &str, text: &str, due_date: DateTime<Utc>) -> DashboardResult<Todo> {
        let Some(text) = normalize_text(text) else {
            return Err(DashboardError::validation("Todo text cannot be empty"));
        };
        let todo = Todo::new(text, user_id, due_date);
        self.write("add", db::create_todo(self.db.conn(), &todo))?;
        Ok(todo)
    }

    fn set_text(&self, id: &str, text: &str) -> DashboardResult<()> {
        let Some(text) = normalize_text(text) else {
            return Err(DashboardError::validation("Todo text cannot be empty"));
        };
        self.write("set_text", db::set_text(self.db.conn(), id, &text))
    }

    fn set_completed(&self, id: &str, completed: bool) -> DashboardResult<()> {
        self.write("set_completed", db::set_completed(self.db.conn(), id, completed))
    }

    fn set_due_date(&self, id: &str, due_date: DateTime<Utc>) -> DashboardResult<()> {
        self.write("set_due_date", db::set_due_date(self.db.conn(), id, due_date))
    }

    fn delete(&self, id: &str) -> DashboardResult<()> {
        self.write("delete", db::delete_todo(self.db.conn(), id))
    }

    fn list_for_user(&self, user_id: &str) -> DashboardResult<Vec<Todo>> {
        Ok(db::get_todos_for_user(self.db.conn(), user_id)?)
    }

    fn subscribe(&self, user_id: &str) -> Receiver<Snapshot> {
        let (tx, rx) = channel();
        // Receiver is still in hand, send cannot fail here.
        let _ = tx.send(self.list_for_user(user_id));
        self.subscribers.borrow_mut().push(Subscriber { user_id: user_id.to_string(), tx });
        rx
    }
}

/// Trims the text; `None` when nothing is left
pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parses the due-date field. Empty means a week from `now`;
/// otherwise `YYYY-MM-DD`, pinned to local noon.
pub fn parse_due_date(input: &str, now: DateTime<Utc>) -> DashboardResult<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(now + Duration::days(DEFAULT_DUE_DAYS));
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| DashboardError::validation(format!("Invalid due date '{}', use YYYY-MM-DD", input)))?;
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());

    Local
        .from_local_datetime(&noon)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| DashboardError::validation(format!("Due date '{}' does not exist locally", input)))
}

pub fn format_due_date(due: DateTime<Utc>) -> String {
    due.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn store() -> SqliteTodoStore {
        SqliteTodoStore::new(Rc::new(Database::open_in_memory().unwrap()))
    }

    fn due() -> DateTime<Utc> {
        Utc::now() + Duration::days(7)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    #[test]
    fn test_add_trims_and_rejects_empty() {
        let store = store();
        let todo = store.add("kim", "  buy milk  ", due()).unwrap();
        assert_eq!(todo.text, "buy milk");

        let err = store.add("kim", "   ", due()).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
        assert_eq!(store.list_for_user("kim").unwrap().len(), 1);
    }

    #[test]
    fn test_update_and_delete() {
        let store = store();
        let todo = store.add("kim", "draft", due()).unwrap();

        store.set_text(&todo.id, "final").unwrap();
        store.set_completed(&todo.id, true).unwrap();
        let list = store.list_for_user("kim").unwrap();
        assert_eq!(list[0].text, "final");
        assert!(list[0].completed);

        store.delete(&todo.id).unwrap();
        assert!(store.list_for_user("kim").unwrap().is_empty());
    }

    #[test]
    fn test_missing_todo_is_remote_error() {
        let store = store();
        let err = store.set_completed("missing", true).unwrap_err();
        assert!(err.is_retryable());
    }

    // ========================================================================
    // Live query
    // ========================================================================

    #[test]
    fn test_subscribe_delivers_initial_and_updates() {
        let store = store();
        store.add("kim", "first", due()).unwrap();

        let rx = store.subscribe("kim");
        assert_eq!(rx.try_recv().unwrap().unwrap().len(), 1);

        store.add("kim", "second", due()).unwrap();
        store.add("lee", "not mine", due()).unwrap();

        let texts: Vec<String> = rx.try_recv().unwrap().unwrap().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["first", "second"]);

        let latest = rx.try_iter().last().unwrap().unwrap();
        assert_eq!(latest.len(), 2);
    }

    #[test]
    fn test_dropped_receivers_are_pruned() {
        let store = store();
        drop(store.subscribe("kim"));
        store.add("kim", "anything", due()).unwrap();
        assert!(store.subscribers.borrow().is_empty());
    }

    // ========================================================================
    // Due dates
    // ========================================================================

    #[test]
    fn test_empty_due_date_is_a_week_out() {
        let now = Utc::now();
        assert_eq!(parse_due_date("", now).unwrap(), now + Duration::days(7));
    }

    #[test]
    fn test_due_date_parses_iso_day() {
        let parsed = parse_due_date("2030-03-15", Utc::now()).unwrap();
        let local = parsed.with_timezone(&Local);
        assert_eq!((local.year(), local.month(), local.day()), (2030, 3, 15));
        assert_eq!(format_due_date(parsed), "2030-03-15");
    }

    #[test]
    fn test_bad_due_date_is_validation_error() {
        let err = parse_due_date("next tuesday", Utc::now()).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
        assert!(parse_due_date("2030-02-30", Utc::now()).is_err());
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  a b "), Some("a b".to_string()));
        assert_eq!(normalize_text("\t\n"), None);
    }
}
