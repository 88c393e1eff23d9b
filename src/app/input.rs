use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::DashboardResult;
use crate::event::{route, run, DomEvent, ElementId, EventKind, FieldId, Panel, Phase};
use crate::input::{
    handle_text_key,
    keymap::{confirm_action, normal_mode_action, text_input_action, Action},
    modes::InputMode,
};
use crate::keyboard::KeySymbol;

use super::{App, PendingAction};

/// Tab order while creating a todo
const CREATE_FIELDS: [FieldId; 2] = [FieldId::NewTodo, FieldId::DueDate];
/// Tab order while a todo is being edited
const EDIT_FIELDS: [FieldId; 2] = [FieldId::EditTodo, FieldId::DueDate];

impl App {
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let action = self.resolve_action(key);
        if let Err(e) = self.execute_action(action) {
            self.report_error(&e);
        }
    }

    fn resolve_action(&mut self, key: KeyEvent) -> Action {
        match self.mode_state.mode {
            InputMode::Normal => self.resolve_normal_action(key),
            InputMode::Insert | InputMode::Login => text_input_action(key),
            InputMode::Confirm => confirm_action(key),
        }
    }

    fn resolve_normal_action(&mut self, key: KeyEvent) -> Action {
        let (action, pending) = normal_mode_action(key, self.mode_state.pending);
        self.mode_state.pending = pending;
        action
    }

    pub(crate) fn execute_action(&mut self, action: Action) -> DashboardResult<()> {
        if !self.is_signed_in() {
            return self.execute_signed_out(action);
        }
        if self.blackout && !matches!(action, Action::Quit | Action::ToggleBlackout) {
            return Ok(());
        }

        match action {
            Action::None => {}
            Action::Quit => self.should_quit = true,
            Action::FocusNewTodo => self.focus_todo_field(FieldId::NewTodo),
            Action::FocusDueDate => self.focus_todo_field(FieldId::DueDate),
            Action::SelectNext => self.list_state.select_next(),
            Action::SelectPrev => self.list_state.select_prev(),
            Action::SelectFirst => self.list_state.select_first(),
            Action::SelectLast => self.list_state.select_last(),
            Action::ToggleCompleted => {
                if let Some(index) = self.list_state.selected() {
                    self.toggle_completed(index)?;
                }
            }
            Action::EditTodo => {
                if let Some(index) = self.list_state.selected() {
                    self.begin_edit(index);
                }
            }
            Action::DeleteTodo => {
                if let Some(index) = self.list_state.selected() {
                    self.request_delete(index);
                }
            }
            Action::ToggleWidget(panel) => self.toggle_widget(panel),
            Action::SelectAsset(index) => self.select_asset(index),
            Action::PrevMonth => self.shift_calendar(-1),
            Action::NextMonth => self.shift_calendar(1),
            Action::RefreshWeather => self.refresh_weather(),
            Action::Logout => self.request_logout(),
            Action::ToggleBlackout => self.toggle_blackout(),
            Action::Confirm => self.confirm_pending()?,
            Action::Cancel => self.cancel(),
            Action::Submit => self.submit_field()?,
            Action::NextField => self.cycle_field(true),
            Action::PrevField => self.cycle_field(false),
            Action::Edit(code, mods) => self.edit_focused(code, mods),
        }
        Ok(())
    }

    /// Only the login field and quitting are reachable before sign in
    fn execute_signed_out(&mut self, action: Action) -> DashboardResult<()> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::FocusNewTodo => self.move_focus(Some(FieldId::Login)),
            Action::Submit if self.native_focus == Some(FieldId::Login) => self.sign_in_from_field(),
            Action::Cancel => self.move_focus(None),
            Action::Edit(code, mods) => self.edit_focused(code, mods),
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn request_logout(&mut self) {
        self.pending_action = Some(PendingAction::Logout);
        self.move_focus(None);
        self.mode_state.to_confirm();
    }

    fn focus_todo_field(&mut self, field: FieldId) {
        if !self.visibility.is_visible(Panel::Todos) {
            self.visibility.toggle(Panel::Todos);
        }
        self.move_focus(Some(field));
    }

    fn cancel(&mut self) {
        match self.mode_state.mode {
            InputMode::Confirm => {
                self.pending_action = None;
                self.mode_state.to_normal();
            }
            _ if self.editing.is_some() => self.cancel_edit(),
            _ => self.move_focus(None),
        }
    }

    fn confirm_pending(&mut self) -> DashboardResult<()> {
        self.mode_state.to_normal();
        match self.pending_action.take() {
            Some(PendingAction::DeleteTodo(id)) => self.delete_todo(&id),
            Some(PendingAction::Logout) => self.logout(),
            None => Ok(()),
        }
    }

    fn submit_field(&mut self) -> DashboardResult<()> {
        match self.native_focus {
            Some(FieldId::Login) => {
                self.sign_in_from_field();
                Ok(())
            }
            Some(FieldId::EditTodo) => self.save_edit(),
            Some(FieldId::DueDate) if self.editing.is_some() => self.save_edit(),
            Some(FieldId::NewTodo | FieldId::DueDate) => self.submit_new_todo(),
            None => Ok(()),
        }
    }

    fn cycle_field(&mut self, forward: bool) {
        let order = if self.editing.is_some() { EDIT_FIELDS } else { CREATE_FIELDS };
        let Some(current) = self.native_focus else { return };
        let Some(pos) = order.iter().position(|f| *f == current) else {
            return;
        };
        let len = order.len();
        let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
        self.move_focus(Some(order[next]));
    }

    /// Physical keys edit the natively focused field directly
    fn edit_focused(&mut self, code: KeyCode, mods: KeyModifiers) {
        self.sync_focus();
        let Some(field) = self.native_focus else { return };
        let buffer = self.fields.get_mut(field);

        let handled = match (code, mods) {
            (KeyCode::Enter, KeyModifiers::ALT) if field.is_multiline() => {
                buffer.insert_char('\n');
                true
            }
            _ => handle_text_key(buffer, code, mods),
        };
        if handled {
            self.flash_key(code);
            self.publish_focused();
        }
    }

    /// Lights up the on-screen key matching a physical keystroke
    fn flash_key(&mut self, code: KeyCode) {
        let key = match code {
            KeyCode::Char(c) => KeySymbol::Char(c.to_ascii_lowercase()),
            KeyCode::Backspace => KeySymbol::DeleteBackward,
            _ => return,
        };
        self.keyboard.flash(key);
    }

    /// Moves native focus, firing focus-out on the old field and focus-in on
    /// the new one through the element tree.
    pub(crate) fn move_focus(&mut self, next: Option<FieldId>) {
        if self.native_focus == next {
            self.publish_focused();
            return;
        }

        if let Some(current) = self.native_focus {
            let mut event = DomEvent::focus_out(ElementId::Field(current), next.map(ElementId::Field));
            self.dispatch(&mut event);
        }

        self.native_focus = next;
        match next {
            Some(FieldId::Login) => self.mode_state.to_login(),
            Some(_) => self.mode_state.to_insert(),
            None => self.mode_state.to_normal(),
        }

        if let Some(field) = next {
            let mut event = DomEvent::focus_in(ElementId::Field(field));
            self.dispatch(&mut event);
        }
    }

    /// Routes an event through every element listener
    pub(crate) fn dispatch(&mut self, event: &mut DomEvent) {
        let seq = route(&self.tree, event.target);
        let Self { tree, dismissal, keyboard, registry, fields, .. } = self;

        run(&seq, event, |d, ev| {
            dismissal.listen(tree, d, ev);
            keyboard.handle(registry, d, ev);
            if let (EventKind::FocusIn, Phase::Target) = (ev.kind, d.phase) {
                if let Some(field) = d.node.field() {
                    dismissal.on_focus_in(fields.get(field).snapshot(field));
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::super::test_support::*;
    use super::*;
    use crate::keyboard::DismissalState;

    fn key(app: &mut App, code: KeyCode) {
        key_with(app, code, KeyModifiers::NONE);
    }

    fn key_with(app: &mut App, code: KeyCode, mods: KeyModifiers) {
        app.handle_key_event(KeyEvent { code, modifiers: mods, kind: KeyEventKind::Press, state: KeyEventState::NONE });
        draw(app);
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            key(app, KeyCode::Char(c));
        }
    }

    // ========================================================================
    // Focus
    // ========================================================================

    #[test]
    fn test_focus_engages_keyboard() {
        let mut app = app();
        key(&mut app, KeyCode::Char('a'));
        assert_eq!(app.native_focus, Some(FieldId::NewTodo));
        assert_eq!(app.mode_state.mode, InputMode::Insert);
        assert_eq!(app.dismissal.state(), DismissalState::Engaged);
        assert!(app.tree.is_mounted(ElementId::Keyboard));
    }

    #[test]
    fn test_escape_blurs_and_dismisses() {
        let mut app = app();
        key(&mut app, KeyCode::Char('a'));
        key(&mut app, KeyCode::Esc);
        assert_eq!(app.native_focus, None);
        assert_eq!(app.mode_state.mode, InputMode::Normal);
        assert!(!app.registry.is_engaged());
        assert!(!app.tree.is_mounted(ElementId::Keyboard));
    }

    #[test]
    fn test_tab_moves_engagement_to_next_field() {
        let mut app = app();
        key(&mut app, KeyCode::Char('a'));
        key(&mut app, KeyCode::Tab);
        assert_eq!(app.native_focus, Some(FieldId::DueDate));
        assert_eq!(app.registry.engaged_field(), Some(FieldId::DueDate));
    }

    #[test]
    fn test_physical_typing_republishes_snapshot() {
        let mut app = app();
        key(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "milk");
        let target = app.registry.get().expect("engaged");
        assert_eq!(target.value, "milk");
        assert_eq!(target.selection(), (4, 4));
    }

    // ========================================================================
    // Todos
    // ========================================================================

    #[test]
    fn test_enter_adds_todo_and_keeps_focus() {
        let mut app = app();
        key(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "buy milk");
        key(&mut app, KeyCode::Enter);
        app.tick();

        assert_eq!(app.todos.len(), 1);
        assert_eq!(app.todos[0].text, "buy milk");
        assert!(app.fields.new_todo.is_empty());
        assert_eq!(app.native_focus, Some(FieldId::NewTodo));
        assert_eq!(app.registry.get().map(|t| t.value), Some(String::new()));
    }

    #[test]
    fn test_blank_todo_is_ignored() {
        let mut app = app();
        key(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "   ");
        key(&mut app, KeyCode::Enter);
        app.tick();
        assert!(app.todos.is_empty());
        assert!(app.message.as_ref().is_none_or(|(_, t, _)| *t != crate::ui::MessageType::Error));
    }

    #[test]
    fn test_bad_due_date_reports_validation() {
        let mut app = app();
        key(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "pay rent");
        key(&mut app, KeyCode::Tab);
        type_str(&mut app, "tomorrow");
        key(&mut app, KeyCode::Enter);
        app.tick();
        assert!(app.todos.is_empty());
        let (msg, _, _) = app.message.as_ref().expect("message");
        assert!(msg.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_dd_then_confirm_deletes() {
        let mut app = app();
        key(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "one");
        key(&mut app, KeyCode::Enter);
        key(&mut app, KeyCode::Esc);
        app.tick();
        app.list_state.select(0);

        key(&mut app, KeyCode::Char('d'));
        key(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode_state.mode, InputMode::Confirm);
        key(&mut app, KeyCode::Char('y'));
        app.tick();
        assert!(app.todos.is_empty());
        assert_eq!(app.mode_state.mode, InputMode::Normal);
    }

    #[test]
    fn test_edit_with_multiline_text() {
        let mut app = app();
        key(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "draft");
        key(&mut app, KeyCode::Enter);
        key(&mut app, KeyCode::Esc);
        app.tick();
        app.list_state.select(0);

        key(&mut app, KeyCode::Char('e'));
        assert_eq!(app.native_focus, Some(FieldId::EditTodo));
        assert_eq!(app.fields.edit.content(), "draft");
        key_with(&mut app, KeyCode::Enter, KeyModifiers::ALT);
        type_str(&mut app, "v2");
        key(&mut app, KeyCode::Enter);
        app.tick();

        assert_eq!(app.todos[0].text, "draft\nv2");
        assert!(app.editing.is_none());
        assert_eq!(app.native_focus, None);
    }

    #[test]
    fn test_logout_returns_to_login() {
        let mut app = app();
        key(&mut app, KeyCode::Char('L'));
        key(&mut app, KeyCode::Char('y'));
        assert!(app.user.is_none());
        assert_eq!(app.native_focus, Some(FieldId::Login));
        assert!(app.tree.is_mounted(ElementId::Field(FieldId::Login)));
    }

    #[test]
    fn test_login_from_field() {
        let mut app = app_with(crate::app::AppConfig { default_user: None, ..config() });
        type_str(&mut app, "ana");
        key(&mut app, KeyCode::Enter);
        assert_eq!(app.user.as_ref().map(|u| u.id.as_str()), Some("ana"));
        assert_eq!(app.mode_state.mode, InputMode::Normal);
    }

    #[test]
    fn test_login_rejects_blank_name() {
        let mut app = app_with(crate::app::AppConfig { default_user: None, ..config() });
        key(&mut app, KeyCode::Enter);
        assert!(app.user.is_none());
        assert!(app.login_error.is_some());
    }
}
