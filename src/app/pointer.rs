//! Pointer input
//!
//! A pointer-down is routed through the element tree first (the document
//! capture listener may dismiss the keyboard, a key may swallow the event).
//! Unless a listener prevented the default, focus then follows the pointer
//! and the element under it is activated.
//!
//! A left drag that starts over the calendar is tracked as a swipe and
//! turns the month on release.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::error::DashboardResult;
use crate::event::{DomEvent, ElementId, FieldId, Modality, Panel};
use crate::input::modes::InputMode;
use crate::ui::components::input_field::{index_at_column, InputField};

use super::App;

/// Columns a drag has to exceed before it counts as a swipe
const SWIPE_COLUMNS: u16 = 6;

/// Horizontal drag that started over the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Swipe {
    start: u16,
    end: Option<u16>,
}

impl Swipe {
    /// +1 for a left swipe (next month), -1 for a right swipe, 0 otherwise
    fn months(&self) -> i32 {
        let Some(end) = self.end else { return 0 };
        if self.start > end + SWIPE_COLUMNS {
            1
        } else if end > self.start + SWIPE_COLUMNS {
            -1
        } else {
            0
        }
    }
}

impl App {
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if self.mode_state.mode == InputMode::Confirm {
            return;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.begin_swipe(mouse.column, mouse.row);
                self.pointer_down(mouse.column, mouse.row, Modality::Mouse);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(swipe) = self.swipe.as_mut() {
                    swipe.end = Some(mouse.column);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.end_swipe(),
            MouseEventKind::ScrollDown => self.list_state.select_next(),
            MouseEventKind::ScrollUp => self.list_state.select_prev(),
            _ => {}
        }
    }

    fn begin_swipe(&mut self, column: u16, row: u16) {
        let hit = self.tree.hit_test(column, row);
        let on_calendar = !self.blackout && self.tree.contains(ElementId::Panel(Panel::Calendar), hit);
        self.swipe = on_calendar.then_some(Swipe { start: column, end: None });
    }

    fn end_swipe(&mut self) {
        let Some(swipe) = self.swipe.take() else { return };
        let months = swipe.months();
        if months != 0 {
            tracing::debug!(months, "calendar swiped");
            self.shift_calendar(months);
        }
    }

    pub(crate) fn pointer_down(&mut self, column: u16, row: u16, modality: Modality) {
        let hit = self.tree.hit_test(column, row);
        tracing::trace!(?hit, ?modality, column, row, "pointer down");

        if self.blackout && hit != ElementId::OffScreen {
            return;
        }

        let mut event = DomEvent::pointer_down(hit, modality, column, row);
        self.dispatch(&mut event);
        if event.default_prevented() {
            return;
        }

        self.move_focus(hit.field());
        if let Err(e) = self.activate(hit, column) {
            self.report_error(&e);
        }
    }

    fn activate(&mut self, hit: ElementId, column: u16) -> DashboardResult<()> {
        let editing = self.editing_index();
        match hit {
            ElementId::TodoCheckbox(index) => self.toggle_completed(index)?,
            ElementId::TodoRow(index) => self.list_state.select(index),
            ElementId::TodoEdit(index) if editing == Some(index) => self.save_edit()?,
            ElementId::TodoEdit(index) => self.begin_edit(index),
            ElementId::TodoDelete(index) if editing == Some(index) => self.cancel_edit(),
            ElementId::TodoDelete(index) => self.request_delete(index),
            ElementId::AddTodo => self.submit_new_todo()?,
            ElementId::Logout => self.request_logout(),
            ElementId::OffScreen => self.toggle_blackout(),
            ElementId::MonthPrev => self.shift_calendar(-1),
            ElementId::MonthNext => self.shift_calendar(1),
            ElementId::Asset(index) => self.select_asset(index),
            ElementId::Toggle(panel) => self.toggle_widget(panel),
            ElementId::Field(field) => self.place_caret(field, column),
            ElementId::Document | ElementId::Panel(_) | ElementId::Keyboard | ElementId::Key(_) => {}
        }
        Ok(())
    }

    /// Collapses the selection at the clicked character
    fn place_caret(&mut self, field: FieldId, column: u16) {
        let Some(area) = self.tree.area(ElementId::Field(field)) else {
            return;
        };
        self.sync_focus();

        let row = InputField::input_row(area, field != FieldId::EditTodo);
        let buffer = self.fields.get_mut(field);
        let index = index_at_column(buffer, row.width as usize, column.saturating_sub(row.x) as usize);
        buffer.set_cursor(index);
        self.publish_focused();
    }
}
