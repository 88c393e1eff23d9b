//! Todo panel: the create form followed by the scrolling todo list

use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::db::Todo;
use crate::event::FieldId;
use crate::input::TextBuffer;

use super::input_field::InputField;
use super::layout::{highlight_row, render_empty_message, render_separator_line, truncate_with_ellipsis};
use super::scroll::{render_v_scroll_indicator, ListViewState};

const FORM_HEIGHT: u16 = 5;
const ROW_HEIGHT: u16 = 2;
const BUTTON_WIDTH: u16 = 3;
const ADD_LABEL: &str = " + Add ";
const ADD_WIDTH: u16 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoRowAreas {
    pub index: usize,
    pub row: Rect,
    pub checkbox: Rect,
    pub text: Rect,
    pub edit: Rect,
    pub delete: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoPanelLayout {
    pub new_todo: Rect,
    /// Add button on the new-todo input row
    pub add: Rect,
    pub due_date: Rect,
    pub separator_y: u16,
    pub list: Rect,
    pub rows: Vec<TodoRowAreas>,
}

impl TodoPanelLayout {
    pub fn visible_rows(inner: Rect) -> usize {
        (inner.height.saturating_sub(FORM_HEIGHT) / ROW_HEIGHT) as usize
    }

    pub fn compute(inner: Rect, total: usize, offset: usize) -> Self {
        let field_h = InputField::height(true);
        let field_w = inner.width.saturating_sub(ADD_WIDTH + 1);
        let new_todo = Rect::new(inner.x, inner.y, field_w, field_h.min(inner.height));
        let add_row = InputField::input_row(new_todo, true);
        let add = clip(Rect::new(inner.x + field_w + 1, add_row.y, ADD_WIDTH, 1), inner);
        let due_date = clip(Rect::new(inner.x, inner.y + field_h, inner.width, field_h), inner);
        let separator_y = inner.y + 2 * field_h;
        let list = clip(
            Rect::new(inner.x, inner.y + FORM_HEIGHT, inner.width, inner.height.saturating_sub(FORM_HEIGHT)),
            inner,
        );

        let visible = Self::visible_rows(inner);
        let rows = (offset..total.min(offset + visible))
            .enumerate()
            .map(|(slot, index)| row_areas(index, list, slot as u16))
            .collect();

        Self { new_todo, add, due_date, separator_y, list, rows }
    }

    pub fn row(&self, index: usize) -> Option<&TodoRowAreas> {
        self.rows.iter().find(|r| r.index == index)
    }
}

fn clip(r: Rect, bounds: Rect) -> Rect {
    r.intersection(bounds)
}

fn row_areas(index: usize, list: Rect, slot: u16) -> TodoRowAreas {
    let row = Rect::new(list.x, list.y + slot * ROW_HEIGHT, list.width, ROW_HEIGHT);
    let right = row.x + row.width;
    let delete = Rect::new(right.saturating_sub(BUTTON_WIDTH), row.y, BUTTON_WIDTH, 1);
    let edit = Rect::new(delete.x.saturating_sub(BUTTON_WIDTH + 1), row.y, BUTTON_WIDTH, 1);
    let text_x = row.x + 4;
    let text = Rect::new(text_x, row.y, edit.x.saturating_sub(text_x + 1), 1);
    TodoRowAreas { index, row, checkbox: Rect::new(row.x, row.y, 3, 1), text, edit, delete }
}

pub struct TodoListView<'a> {
    pub todos: &'a [Todo],
    pub list_state: &'a ListViewState,
    pub new_todo: &'a TextBuffer,
    pub due_date: &'a TextBuffer,
    pub edit: &'a TextBuffer,
    pub editing: Option<usize>,
    pub focused: Option<FieldId>,
    pub today: NaiveDate,
    pub error: Option<&'a str>,
}

impl Widget for TodoListView<'_> {
    fn render(self, inner: Rect, buf: &mut Buffer) {
        let layout = TodoPanelLayout::compute(inner, self.todos.len(), self.list_state.offset());

        InputField::new("New todo", self.new_todo)
            .placeholder("Add a new todo")
            .focused(self.focused == Some(FieldId::NewTodo))
            .render(layout.new_todo, buf);

        if self.editing.is_none() && !layout.add.is_empty() {
            let style = Style::default().fg(Color::Black).bg(Color::Green);
            buf.set_stringn(layout.add.x, layout.add.y, ADD_LABEL, layout.add.width as usize, style);
        }

        let due_label = if self.editing.is_some() { "Due date (editing)" } else { "Due date" };
        InputField::new(due_label, self.due_date)
            .placeholder("YYYY-MM-DD, empty = in 7 days")
            .focused(self.focused == Some(FieldId::DueDate))
            .render(layout.due_date, buf);

        if layout.separator_y < inner.y + inner.height {
            match self.error {
                Some(err) => {
                    let text = truncate_with_ellipsis(err, inner.width as usize);
                    buf.set_string(inner.x, layout.separator_y, text, Style::default().fg(Color::Red));
                }
                None => render_separator_line(buf, inner.x, layout.separator_y, inner.width),
            }
        }

        if self.todos.is_empty() {
            render_empty_message(layout.list, buf, "No todos yet. Press a to add one.");
            return;
        }

        for areas in &layout.rows {
            let Some(todo) = self.todos.get(areas.index) else { continue };
            let selected = self.list_state.selected() == Some(areas.index);
            let editing = self.editing == Some(areas.index);
            render_row(buf, areas, todo, selected, editing, &self);
        }

        let visible = TodoPanelLayout::visible_rows(inner);
        render_v_scroll_indicator(buf, &layout.list, self.list_state.offset(), visible, self.todos.len());
    }
}

fn render_row(buf: &mut Buffer, areas: &TodoRowAreas, todo: &Todo, selected: bool, editing: bool, view: &TodoListView<'_>) {
    if selected {
        highlight_row(buf, areas.row.x, areas.row.y, areas.row.width);
    }

    let check = if todo.completed { "[x]" } else { "[ ]" };
    let check_color = if todo.completed { Color::Green } else { Color::Gray };
    buf.set_string(areas.checkbox.x, areas.checkbox.y, check, Style::default().fg(check_color));

    if editing {
        InputField::bare(view.edit)
            .focused(view.focused == Some(FieldId::EditTodo))
            .render(areas.text, buf);
    } else {
        let text_style = if todo.completed {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default().fg(Color::White)
        };
        let shown = todo.text.replace('\n', " ⏎ ");
        buf.set_string(areas.text.x, areas.text.y, truncate_with_ellipsis(&shown, areas.text.width as usize), text_style);
    }

    let button = Style::default().fg(Color::Cyan);
    let (edit_label, delete_label) = if editing { (" ✓ ", " ↺ ") } else { (" ✎ ", " ✗ ") };
    buf.set_string(areas.edit.x, areas.edit.y, edit_label, button);
    buf.set_string(areas.delete.x, areas.delete.y, delete_label, button.fg(Color::Red));

    let due_style = if todo.completed {
        Style::default().fg(Color::DarkGray)
    } else if todo.is_overdue(view.today) {
        Style::default().fg(Color::Red)
    } else if todo.is_due_on(view.today) {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let due = format!("Due: {}", format_due_label(todo));
    buf.set_stringn(areas.text.x, areas.row.y + 1, due, areas.row.width.saturating_sub(4) as usize, due_style);
}

fn format_due_label(todo: &Todo) -> String {
    todo.due_date
        .with_timezone(&chrono::Local)
        .format("%b %-d, %Y")
        .to_string()
}
