//! Application State
//!
//! Core application logic tying together the todo store, the remote widgets,
//! the on-screen keyboard and the UI.

mod config;
mod input;
mod pointer;
mod todos_handler;
mod widgets_handler;

use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use std::time::Instant;

use chrono::{DateTime, Local, NaiveDate};
use ratatui::{layout::Rect, Frame};

use crate::auth::{AuthProvider, User};
use crate::db::Todo;
use crate::error::{DashboardError, DashboardResult};
use crate::event::{ElementId, ElementTree, FieldId};
use crate::input::modes::ModeState;
use crate::input::FieldBuffers;
use crate::keyboard::{DismissalController, FocusRegistry, FocusWatcher, KeyboardSurface, KeystrokeInjector};
use crate::remote::{Quote, RemoteWorker, WeatherReport, ASSETS};
use crate::todos::{Snapshot, TodoStore};
use crate::ui::components::calendar::first_of_month;
use crate::ui::components::{ListViewState, MessageType, PriceView, WeatherView};
use crate::ui::renderer::{Renderer, UiState, Visibility};

use self::pointer::Swipe;

pub use config::{AppConfig, PendingAction};

#[derive(Debug, Default)]
pub struct WeatherState {
    pub report: Option<WeatherReport>,
    pub loading: bool,
    pub error: Option<String>,
    /// Set by configuration errors; no further requests are made
    pub fatal: bool,
}

#[derive(Debug, Default)]
pub struct PriceState {
    pub selected: Option<usize>,
    pub quotes: HashMap<String, Quote>,
    pub loading: bool,
    pub error: Option<String>,
}

impl PriceState {
    pub fn selected_quote(&self) -> Option<&Quote> {
        self.selected.and_then(|i| self.quotes.get(ASSETS[i].id))
    }
}

struct Timers {
    clock: Instant,
    weather: Option<Instant>,
    price: Option<Instant>,
}

pub struct App {
    pub config: AppConfig,
    pub auth: Box<dyn AuthProvider>,
    pub store: Box<dyn TodoStore>,
    pub user: Option<User>,
    pub todo_feed: Option<Receiver<Snapshot>>,
    pub todos: Vec<Todo>,
    pub todos_error: Option<String>,
    pub list_state: ListViewState,
    pub mode_state: ModeState,
    pub fields: FieldBuffers,
    /// Id of the todo whose text is in the edit field
    pub editing: Option<String>,
    pub native_focus: Option<FieldId>,
    pub login_error: Option<String>,
    pub registry: FocusRegistry,
    watcher: FocusWatcher,
    pub dismissal: DismissalController,
    pub keyboard: KeyboardSurface,
    pub tree: ElementTree,
    pub visibility: Visibility,
    /// Screen blanked until the toggle is hit again
    pub blackout: bool,
    swipe: Option<Swipe>,
    pub weather: WeatherState,
    pub prices: PriceState,
    pub calendar_month: NaiveDate,
    pub now: DateTime<Local>,
    pub remote: Option<RemoteWorker>,
    timers: Timers,
    pub message: Option<(String, MessageType, Instant)>,
    pub pending_action: Option<PendingAction>,
    pub should_quit: bool,
    pub terminal_size: Rect,
}

impl App {
    pub fn new(
        config: AppConfig,
        auth: Box<dyn AuthProvider>,
        store: Box<dyn TodoStore>,
        remote: Option<RemoteWorker>,
    ) -> Self {
        let registry = FocusRegistry::new();
        let now = Local::now();

        Self {
            keyboard: KeyboardSurface::new(KeystrokeInjector::new(config.insert_policy)),
            watcher: registry.watch(),
            dismissal: DismissalController::new(registry.clone(), ElementId::Keyboard),
            registry,
            config,
            auth,
            store,
            user: None,
            todo_feed: None,
            todos: Vec::new(),
            todos_error: None,
            list_state: ListViewState::new(),
            mode_state: ModeState::new(),
            fields: FieldBuffers::default(),
            editing: None,
            native_focus: None,
            login_error: None,
            tree: ElementTree::default(),
            visibility: Visibility::default(),
            blackout: false,
            swipe: None,
            weather: WeatherState::default(),
            prices: PriceState::default(),
            calendar_month: first_of_month(now.date_naive()),
            now,
            remote,
            timers: Timers { clock: Instant::now(), weather: None, price: None },
            message: None,
            pending_action: None,
            should_quit: false,
            terminal_size: Rect::default(),
        }
    }

    /// Resumes the stored session (or signs in the configured user) and
    /// kicks off the first weather fetch.
    pub fn start(&mut self) -> DashboardResult<()> {
        let user = match self.auth.current_user()? {
            Some(user) => Some(user),
            None => match self.config.default_user.clone() {
                Some(name) => Some(self.auth.sign_in(&name)?),
                None => None,
            },
        };

        match user {
            Some(user) => self.enter_session(user),
            None => self.move_focus(Some(FieldId::Login)),
        }
        self.request_weather();
        Ok(())
    }

    fn enter_session(&mut self, user: User) {
        tracing::info!(user = %user.id, "session started");
        self.todo_feed = Some(self.store.subscribe(&user.id));
        self.set_message(&format!("Signed in as {}", user.display_name()), MessageType::Info);
        self.user = Some(user);
        self.drain_todo_feed();
    }

    /// Sign-in failures stay in the login dialog
    pub(crate) fn sign_in_from_field(&mut self) {
        let name = self.fields.login.content().to_string();
        let user = match self.auth.sign_in(&name) {
            Ok(user) => user,
            Err(e) => {
                tracing::info!(error = %e, "sign in rejected");
                self.login_error = Some(e.to_string());
                return;
            }
        };
        self.login_error = None;
        self.fields.login.clear();
        self.move_focus(None);
        self.enter_session(user);
    }

    pub(crate) fn logout(&mut self) -> DashboardResult<()> {
        self.auth.logout()?;
        self.blackout = false;
        self.move_focus(None);
        self.user = None;
        self.todo_feed = None;
        self.todos.clear();
        self.todos_error = None;
        self.list_state.set_total(0);
        self.editing = None;
        self.fields = FieldBuffers::default();
        self.move_focus(Some(FieldId::Login));
        self.set_message("Signed out", MessageType::Info);
        Ok(())
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// One loop iteration's worth of background work
    pub fn tick(&mut self) {
        self.drain_todo_feed();
        self.drain_remote();
        self.advance_timers(Instant::now());
        self.check_message_expiry();
    }

    /// Lets each field adopt the latest snapshot the keyboard published
    pub fn sync_focus(&mut self) {
        let Some(Some(target)) = self.watcher.changed() else {
            return;
        };
        self.fields.get_mut(target.field).adopt(&target);
    }

    /// Republishes the focused field after a native edit so injected keys
    /// start from the current value.
    pub(crate) fn publish_focused(&mut self) {
        let Some(field) = self.native_focus else { return };
        if self.registry.engaged_field() != Some(field) {
            return;
        }
        self.registry.set(Some(self.fields.get(field).snapshot(field)));
    }

    pub fn render(&mut self, frame: &mut Frame) {
        self.terminal_size = frame.area();
        self.check_message_expiry();
        self.sync_focus();

        let editing = self.editing_index();
        let message = self.message.as_ref().map(|(m, t, _)| (m.as_str(), *t));
        let confirm_message = self.pending_action.as_ref().map(|a| a.confirm_message());

        let weather = WeatherView {
            report: self.weather.report.as_ref(),
            loading: self.weather.loading,
            error: self.weather.error.as_deref(),
            city: &self.config.city,
        };
        let prices = PriceView {
            selected: self.prices.selected,
            quote: self.prices.selected_quote(),
            loading: self.prices.loading,
            error: self.prices.error.as_deref(),
        };

        let mut state = UiState {
            mode: self.mode_state.mode,
            user: self.user.as_ref().map(|u| u.display_name()),
            message,
            confirm_message,
            todos: &self.todos,
            todos_error: self.todos_error.as_deref(),
            list_state: &mut self.list_state,
            fields: &self.fields,
            focused: self.native_focus,
            editing,
            login_error: self.login_error.as_deref(),
            visibility: &self.visibility,
            now: self.now,
            calendar_month: self.calendar_month,
            weather,
            prices,
            keyboard: self.registry.is_engaged().then_some(&self.keyboard),
            tree: &mut self.tree,
            blackout: self.blackout,
        };

        Renderer::render(frame, &mut state);
    }

    fn check_message_expiry(&mut self) {
        let timeout = self.config.message_timeout;
        let expired = self
            .message
            .as_ref()
            .is_some_and(|(_, _, time)| time.elapsed() > timeout);

        if expired {
            self.message = None;
        }
    }

    pub fn set_message(&mut self, msg: &str, msg_type: MessageType) {
        self.message = Some((msg.to_string(), msg_type, Instant::now()));
    }

    pub(crate) fn report_error(&mut self, err: &DashboardError) {
        tracing::warn!(error = %err, "action failed");
        self.set_message(&err.to_string(), MessageType::Error);
    }

    pub fn editing_index(&self) -> Option<usize> {
        let id = self.editing.as_deref()?;
        self.todos.iter().position(|t| t.id == id)
    }
}

// ============================================================================
// Test support
// ============================================================================


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_start_signs_in_default_user() {
        let app = app();
        assert_eq!(app.user.as_ref().map(|u| u.id.as_str()), Some("kim"));
        assert!(app.todo_feed.is_some());
        assert!(app.native_focus.is_none());
    }

    #[test]
    fn test_start_without_user_focuses_login() {
        let app = app_with(AppConfig { default_user: None, ..config() });
        assert!(app.user.is_none());
        assert_eq!(app.native_focus, Some(FieldId::Login));
        assert_eq!(app.registry.engaged_field(), Some(FieldId::Login));
        assert!(app.tree.is_mounted(ElementId::Keyboard));
    }

    #[test]
    fn test_message_expiry() {
        let mut app = app();
        app.config.message_timeout = std::time::Duration::ZERO;
        app.set_message("hello", MessageType::Info);
        std::thread::sleep(std::time::Duration::from_millis(2));
        app.tick();
        assert!(app.message.is_none());
    }
}
