//! Database models

use chrono::{DateTime, Local, NaiveDate, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

impl Todo {
    pub fn new(text: impl Into<String>, user_id: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            completed: false,
            user_id: user_id.into(),
            created_at: Utc::now(),
            due_date,
        }
    }

    pub fn due_local_date(&self) -> NaiveDate {
        self.due_date.with_timezone(&Local).date_naive()
    }

    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.due_local_date() == date
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_local_date() < today
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_todo_defaults() {
        let due = Utc::now() + Duration::days(7);
        let todo = Todo::new("buy milk", "kim", due);
        assert!(!todo.completed);
        assert_eq!(todo.user_id, "kim");
        assert_eq!(todo.id.len(), 36);
        assert_ne!(todo.id, Todo::new("buy milk", "kim", due).id);
    }

    #[test]
    fn test_overdue_ignores_completed() {
        let due = Utc::now() - Duration::days(3);
        let mut todo = Todo::new("late", "kim", due);
        let today = Local::now().date_naive();
        assert!(todo.is_overdue(today));
        todo.completed = true;
        assert!(!todo.is_overdue(today));
    }
}
