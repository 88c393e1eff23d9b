use chrono::Utc;

use crate::error::{DashboardError, DashboardResult};
use crate::event::FieldId;
use crate::input::TextBuffer;
use crate::todos::{format_due_date, normalize_text, parse_due_date};
use crate::ui::MessageType;

use super::{App, PendingAction};

impl App {
    /// Adds a todo from the new-todo and due-date fields. Blank text is
    /// ignored without a message.
    pub(crate) fn submit_new_todo(&mut self) -> DashboardResult<()> {
        let Some(user_id) = self.user.as_ref().map(|u| u.id.clone()) else {
            return Ok(());
        };
        let Some(text) = normalize_text(self.fields.new_todo.content()) else {
            return Ok(());
        };
        let due = parse_due_date(self.fields.due_date.content(), Utc::now())?;

        self.store.add(&user_id, &text, due)?;
        self.fields.new_todo.clear();
        self.fields.due_date.clear();
        self.publish_focused();
        self.set_message("Todo added", MessageType::Success);
        Ok(())
    }

    pub(crate) fn toggle_completed(&mut self, index: usize) -> DashboardResult<()> {
        let Some(todo) = self.todos.get(index) else {
            return Ok(());
        };
        let (id, completed) = (todo.id.clone(), !todo.completed);
        self.list_state.select(index);
        self.store.set_completed(&id, completed)
    }

    /// Loads the todo into the edit field and the shared due-date field
    pub(crate) fn begin_edit(&mut self, index: usize) {
        let Some(todo) = self.todos.get(index) else { return };
        self.editing = Some(todo.id.clone());
        self.fields.edit = TextBuffer::with_content(todo.text.as_str());
        self.fields.due_date.set_content(&format_due_date(todo.due_date));
        self.list_state.select(index);
        self.move_focus(Some(FieldId::EditTodo));
    }

    pub(crate) fn save_edit(&mut self) -> DashboardResult<()> {
        let Some(id) = self.editing.clone() else {
            return Ok(());
        };
        if normalize_text(self.fields.edit.content()).is_none() {
            return Err(DashboardError::validation("Todo text cannot be empty"));
        }
        let due = parse_due_date(self.fields.due_date.content(), Utc::now())?;

        self.store.set_text(&id, self.fields.edit.content())?;
        self.store.set_due_date(&id, due)?;
        self.finish_edit();
        self.set_message("Todo updated", MessageType::Success);
        Ok(())
    }

    pub(crate) fn cancel_edit(&mut self) {
        self.finish_edit();
    }

    fn finish_edit(&mut self) {
        self.editing = None;
        self.fields.edit.clear();
        self.fields.due_date.clear();
        if matches!(self.native_focus, Some(FieldId::EditTodo | FieldId::DueDate)) {
            self.move_focus(None);
        }
    }

    pub(crate) fn request_delete(&mut self, index: usize) {
        let Some(todo) = self.todos.get(index) else { return };
        self.pending_action = Some(PendingAction::DeleteTodo(todo.id.clone()));
        self.list_state.select(index);
        self.move_focus(None);
        self.mode_state.to_confirm();
    }

    pub(crate) fn delete_todo(&mut self, id: &str) -> DashboardResult<()> {
        self.store.delete(id)?;
        if self.editing.as_deref() == Some(id) {
            self.finish_edit();
        }
        self.set_message("Todo deleted", MessageType::Success);
        Ok(())
    }

    /// Applies the newest live-query result, if any arrived
    pub(crate) fn drain_todo_feed(&mut self) {
        let Some(feed) = self.todo_feed.as_ref() else { return };
        let Some(latest) = feed.try_iter().last() else { return };

        match latest {
            Ok(todos) => {
                self.todos = todos;
                self.todos_error = None;
                self.list_state.set_total(self.todos.len());
                if self.editing.is_some() && self.editing_index().is_none() {
                    self.finish_edit();
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "todo feed error");
                self.todos_error = Some(format!("Failed to load todos: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use super::super::test_support::*;
    use super::*;

    fn add(app: &mut App, text: &str, due: &str) {
        app.fields.new_todo.set_content(text);
        app.fields.due_date.set_content(due);
        app.submit_new_todo().expect("add");
        app.tick();
    }

    #[test]
    fn test_todos_listed_in_creation_order() {
        let mut app = app();
        add(&mut app, "first", "");
        add(&mut app, "second", "");
        let texts: Vec<&str> = app.todos.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(app.list_state.total(), 2);
    }

    #[test]
    fn test_explicit_due_date() {
        let mut app = app();
        add(&mut app, "taxes", "2027-04-15");
        let due = app.todos[0].due_local_date();
        assert_eq!((due.year(), due.month(), due.day()), (2027, 4, 15));
    }

    #[test]
    fn test_blank_edit_is_rejected() {
        let mut app = app();
        add(&mut app, "keep me", "");
        app.begin_edit(0);
        app.fields.edit.set_content("  ");
        assert!(app.save_edit().is_err());
        app.tick();
        assert_eq!(app.todos[0].text, "keep me");
        assert!(app.editing.is_some());
    }

    #[test]
    fn test_cancel_edit_restores_fields() {
        let mut app = app();
        add(&mut app, "a", "");
        app.begin_edit(0);
        assert!(!app.fields.due_date.is_empty());
        app.cancel_edit();
        assert!(app.editing.is_none());
        assert!(app.fields.due_date.is_empty());
        assert_eq!(app.native_focus, None);
    }

    #[test]
    fn test_deleting_edited_todo_ends_edit() {
        let mut app = app();
        add(&mut app, "gone soon", "");
        app.begin_edit(0);
        let id = app.todos[0].id.clone();
        app.delete_todo(&id).expect("delete");
        app.tick();
        assert!(app.todos.is_empty());
        assert!(app.editing.is_none());
    }

    #[test]
    fn test_feed_only_shows_own_todos() {
        let mut app = app();
        add(&mut app, "mine", "");
        let later = chrono::Utc::now();
        app.store.add("someone-else", "theirs", later).expect("add");
        app.tick();
        assert_eq!(app.todos.len(), 1);
        assert_eq!(app.todos[0].text, "mine");
    }
}
