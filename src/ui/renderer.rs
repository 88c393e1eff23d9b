//! Renderer
//!
//! Draws the dashboard and registers every interactive element in the
//! frame's element tree, so pointer events hit what was actually painted.

use chrono::{DateTime, Local, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Clear,
    Frame,
};

use crate::db::Todo;
use crate::event::{ElementId, ElementTree, FieldId, Panel};
use crate::input::{FieldBuffers, InputMode};
use crate::keyboard::KeyboardSurface;

use super::components::layout::{create_panel_block, render_empty_message};
use super::components::{
    calendar, crypto, datetime, weather, CalendarView, ConfirmDialog, DateTimeView, HelpBar,
    KeyboardView, ListViewState, LoginDialog, MessageType, PriceView, StatusAction, StatusLine,
    TodoListView, TodoPanelLayout, WeatherView,
};

/// Right column, top to bottom
const RIGHT_COLUMN: [Panel; 4] = [Panel::DateTime, Panel::Calendar, Panel::Weather, Panel::Prices];

const MINIMIZE_LABEL: &str = " _ ";
const MINIMIZE_WIDTH: u16 = 3;

/// Minimized widgets, in the order they were minimized
#[derive(Debug, Clone, Default)]
pub struct Visibility {
    minimized: Vec<Panel>,
}

impl Visibility {
    pub fn is_visible(&self, panel: Panel) -> bool {
        !self.minimized.contains(&panel)
    }

    pub fn minimized(&self) -> &[Panel] {
        &self.minimized
    }

    /// Returns whether the panel is visible afterwards
    pub fn toggle(&mut self, panel: Panel) -> bool {
        if panel == Panel::StatusBar {
            return true;
        }
        match self.minimized.iter().position(|p| *p == panel) {
            Some(pos) => {
                self.minimized.remove(pos);
                true
            }
            None => {
                self.minimized.push(panel);
                false
            }
        }
    }
}

pub struct UiState<'a> {
    pub mode: InputMode,
    pub user: Option<&'a str>,
    pub message: Option<(&'a str, MessageType)>,
    pub confirm_message: Option<&'a str>,
    pub todos: &'a [Todo],
    pub todos_error: Option<&'a str>,
    pub list_state: &'a mut ListViewState,
    pub fields: &'a FieldBuffers,
    pub focused: Option<FieldId>,
    pub editing: Option<usize>,
    pub login_error: Option<&'a str>,
    pub visibility: &'a Visibility,
    pub now: DateTime<Local>,
    pub calendar_month: NaiveDate,
    pub weather: WeatherView<'a>,
    pub prices: PriceView<'a>,
    /// Present while the on-screen keyboard is mounted
    pub keyboard: Option<&'a KeyboardSurface>,
    pub tree: &'a mut ElementTree,
    pub blackout: bool,
}

pub struct Renderer;

impl Renderer {
    pub fn render(frame: &mut Frame, state: &mut UiState) {
        let area = frame.area();
        state.tree.reset(area);

        let [main, help, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)]).areas(area);

        if state.blackout {
            render_blackout(frame, state.tree, status);
            return;
        }

        let keyboard_area = state.keyboard.map(|surface| KeyboardView::area(surface, main));
        let content = match keyboard_area {
            Some(k) => Rect::new(main.x, main.y, main.width, main.height.saturating_sub(k.height)),
            None => main,
        };

        if state.user.is_some() {
            render_dashboard(frame, state, content);
        } else {
            render_login(frame, state, content);
        }

        frame.render_widget(HelpBar::for_mode(state.mode), help);
        render_status(frame, state, status);

        if let (Some(surface), Some(k)) = (state.keyboard, keyboard_area) {
            render_keyboard(frame, state.tree, surface, k);
        }

        if let Some(msg) = state.confirm_message {
            frame.render_widget(ConfirmDialog::new(" Confirm ", msg), area);
        }
    }
}

fn panel_title(panel: Panel) -> &'static str {
    match panel {
        Panel::Todos => " Todos ",
        Panel::Calendar => " Calendar ",
        Panel::DateTime => " Date & Time ",
        Panel::Weather => " Weather ",
        Panel::Prices => " Crypto ",
        Panel::StatusBar => "",
    }
}

fn panel_height(panel: Panel) -> u16 {
    match panel {
        Panel::Calendar => calendar::HEIGHT,
        Panel::DateTime => datetime::HEIGHT,
        Panel::Weather => weather::HEIGHT,
        Panel::Prices => crypto::HEIGHT,
        Panel::Todos | Panel::StatusBar => 0,
    }
}

/// Draws the frame, registers the panel and its minimize button. Returns the inner area.
fn mount_panel(frame: &mut Frame, tree: &mut ElementTree, panel: Panel, area: Rect, active: bool) -> Rect {
    let block = create_panel_block(panel_title(panel), active);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    tree.insert(ElementId::Panel(panel), ElementId::Document, area);

    if area.width > MINIMIZE_WIDTH + 2 {
        let button = Rect::new(area.x + area.width - MINIMIZE_WIDTH - 1, area.y, MINIMIZE_WIDTH, 1);
        frame.buffer_mut().set_string(button.x, button.y, MINIMIZE_LABEL, Style::default().fg(Color::Gray));
        tree.insert(ElementId::Toggle(panel), ElementId::Panel(panel), button);
    }
    inner
}

fn render_dashboard(frame: &mut Frame, state: &mut UiState, area: Rect) {
    let visibility = state.visibility;
    let right: Vec<Panel> = RIGHT_COLUMN.iter().copied().filter(|p| visibility.is_visible(*p)).collect();

    match (visibility.is_visible(Panel::Todos), right.is_empty()) {
        (true, false) => {
            let [left_area, right_area] =
                Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);
            render_todos(frame, state, left_area);
            render_right_column(frame, state, right_area, &right);
        }
        (true, true) => render_todos(frame, state, area),
        (false, false) => render_right_column(frame, state, area, &right),
        (false, true) => {
            render_empty_message(area, frame.buffer_mut(), "All widgets minimized. Click a chip to restore one.");
        }
    }
}

fn render_todos(frame: &mut Frame, state: &mut UiState, area: Rect) {
    let active = matches!(state.focused, Some(FieldId::NewTodo | FieldId::DueDate | FieldId::EditTodo));
    let inner = mount_panel(frame, state.tree, Panel::Todos, area, active);

    state.list_state.ensure_visible(TodoPanelLayout::visible_rows(inner));
    let layout = TodoPanelLayout::compute(inner, state.todos.len(), state.list_state.offset());
    register_todo_elements(state.tree, &layout, state.editing);

    let view = TodoListView {
        todos: state.todos,
        list_state: &*state.list_state,
        new_todo: &state.fields.new_todo,
        due_date: &state.fields.due_date,
        edit: &state.fields.edit,
        editing: state.editing,
        focused: state.focused,
        today: state.now.date_naive(),
        error: state.todos_error,
    };
    frame.render_widget(view, inner);
}

fn register_todo_elements(tree: &mut ElementTree, layout: &TodoPanelLayout, editing: Option<usize>) {
    let panel = ElementId::Panel(Panel::Todos);
    tree.insert(ElementId::Field(FieldId::NewTodo), panel, layout.new_todo);
    tree.insert(ElementId::Field(FieldId::DueDate), panel, layout.due_date);
    if editing.is_none() && !layout.add.is_empty() {
        tree.insert(ElementId::AddTodo, panel, layout.add);
    }

    for areas in &layout.rows {
        let row = ElementId::TodoRow(areas.index);
        tree.insert(row, panel, areas.row);
        tree.insert(ElementId::TodoCheckbox(areas.index), row, areas.checkbox);
        if editing == Some(areas.index) {
            tree.insert(ElementId::Field(FieldId::EditTodo), row, areas.text);
        }
        tree.insert(ElementId::TodoEdit(areas.index), row, areas.edit);
        tree.insert(ElementId::TodoDelete(areas.index), row, areas.delete);
    }
}

fn render_right_column(frame: &mut Frame, state: &mut UiState, area: Rect, panels: &[Panel]) {
    let constraints: Vec<Constraint> = panels
        .iter()
        .map(|p| Constraint::Length(panel_height(*p)))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let areas = Layout::vertical(constraints).split(area);

    for (panel, rect) in panels.iter().zip(areas.iter()) {
        let inner = mount_panel(frame, state.tree, *panel, *rect, false);
        match panel {
            Panel::DateTime => frame.render_widget(DateTimeView::new(&state.now), inner),
            Panel::Calendar => {
                let (prev, next) = CalendarView::nav_areas(inner);
                state.tree.insert(ElementId::MonthPrev, ElementId::Panel(Panel::Calendar), prev);
                state.tree.insert(ElementId::MonthNext, ElementId::Panel(Panel::Calendar), next);
                let view = CalendarView { month: state.calendar_month, today: state.now.date_naive(), todos: state.todos };
                frame.render_widget(view, inner);
            }
            Panel::Weather => frame.render_widget(state.weather, inner),
            Panel::Prices => {
                for (index, chip) in PriceView::asset_areas(inner) {
                    state.tree.insert(ElementId::Asset(index), ElementId::Panel(Panel::Prices), chip);
                }
                frame.render_widget(state.prices, inner);
            }
            Panel::Todos | Panel::StatusBar => {}
        }
    }
}

fn render_login(frame: &mut Frame, state: &mut UiState, area: Rect) {
    let popup = LoginDialog::area(area);
    state.tree.insert(ElementId::Field(FieldId::Login), ElementId::Document, LoginDialog::field_area(popup));

    let mut dialog = LoginDialog::new(&state.fields.login, state.focused == Some(FieldId::Login));
    if let Some(err) = state.login_error {
        dialog = dialog.error(err);
    }
    frame.render_widget(dialog, popup);
}

fn render_status(frame: &mut Frame, state: &mut UiState, area: Rect) {
    state.tree.insert(ElementId::Panel(Panel::StatusBar), ElementId::Document, area);

    let visibility = state.visibility;
    let mut line = StatusLine::new(state.mode);
    if let Some(user) = state.user {
        for (action, button) in StatusLine::action_areas(area) {
            state.tree.insert(action_element(action), ElementId::Panel(Panel::StatusBar), button);
        }
        let minimized = visibility.minimized();
        for (panel, chip) in StatusLine::chip_areas(StatusLine::chip_region(area), minimized) {
            state.tree.insert(ElementId::Toggle(panel), ElementId::Panel(Panel::StatusBar), chip);
        }
        line = line.user(user).minimized(minimized);
    }
    if let Some((msg, msg_type)) = state.message {
        line = line.message(msg, msg_type);
    }
    frame.render_widget(line, area);
}

fn action_element(action: StatusAction) -> ElementId {
    match action {
        StatusAction::Blackout => ElementId::OffScreen,
        StatusAction::Logout => ElementId::Logout,
    }
}

/// Blanks the whole frame. Only the blackout toggle stays, where it sits in the status bar.
fn render_blackout(frame: &mut Frame, tree: &mut ElementTree, status: Rect) {
    let area = frame.area();
    frame.render_widget(Clear, area);
    frame.buffer_mut().set_style(area, Style::default().bg(Color::Black));

    let toggle = StatusLine::action_areas(status)
        .into_iter()
        .find(|(action, _)| *action == StatusAction::Blackout);
    if let Some((action, rect)) = toggle {
        let style = Style::default().fg(Color::DarkGray).bg(Color::Black);
        frame.buffer_mut().set_string(rect.x, rect.y, action.label(), style);
        tree.insert(ElementId::OffScreen, ElementId::Document, rect);
    }
}

fn render_keyboard(frame: &mut Frame, tree: &mut ElementTree, surface: &KeyboardSurface, area: Rect) {
    tree.insert(ElementId::Keyboard, ElementId::Document, area);
    for (index, key_area) in surface.key_areas(KeyboardView::inner(area)) {
        tree.insert(ElementId::Key(index), ElementId::Keyboard, key_area);
    }
    frame.render_widget(KeyboardView::new(surface, " Keyboard "), area);
}
