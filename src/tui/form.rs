//! Edit form for the modal dialog.
//!
//! Two free-text inputs (PJ and Spek) and a selector over the closed status
//! set. Fields cycle with Tab/Shift-Tab; Left/Right either moves the cursor
//! in the active text input or steps the status selector.

use crate::item::{Item, UNSET};
use crate::status::{selector_index, STATUS_OPTIONS};
use crate::tui::input::TextInput;

pub const PJ_FIELD: usize = 0;
pub const SPEK_FIELD: usize = 1;
pub const STATUS_FIELD: usize = 2;
const FIELD_COUNT: usize = 3;

/// In-progress edits for the currently selected item. Nothing here touches
/// the item until `commit`; cancel simply drops the form.
pub struct EditForm {
    pub pj: TextInput,
    pub spek: TextInput,
    pub status: usize,
    pub current_field: usize,
}

impl EditForm {
    /// Build a form from an item's current values.
    ///
    /// The `"-"` sentinel is presented as a genuinely empty input rather
    /// than a literal dash. A status outside the selectable set lands on
    /// the `N/A` option.
    pub fn from_item(item: &Item) -> Self {
        let seed = |value: &str| {
            if value == UNSET {
                TextInput::default()
            } else {
                TextInput::with_value(value)
            }
        };
        let mut form = EditForm {
            pj: seed(&item.pj),
            spek: seed(&item.spek),
            status: selector_index(&item.status),
            current_field: PJ_FIELD,
        };
        form.update_active_field();
        form
    }

    /// Move to the next field.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    /// Move to the previous field.
    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            FIELD_COUNT - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    fn update_active_field(&mut self) {
        self.pj.active = self.current_field == PJ_FIELD;
        self.spek.active = self.current_field == SPEK_FIELD;
    }

    /// Route a typed character to the active text input.
    pub fn handle_char(&mut self, c: char) {
        match self.current_field {
            PJ_FIELD => self.pj.insert_char(c),
            SPEK_FIELD => self.spek.insert_char(c),
            _ => {}
        }
    }

    /// Route backspace to the active text input.
    pub fn handle_backspace(&mut self) {
        match self.current_field {
            PJ_FIELD => self.pj.delete_back(),
            SPEK_FIELD => self.spek.delete_back(),
            _ => {}
        }
    }

    /// Route delete to the active text input.
    pub fn handle_delete(&mut self) {
        match self.current_field {
            PJ_FIELD => self.pj.delete_forward(),
            SPEK_FIELD => self.spek.delete_forward(),
            _ => {}
        }
    }

    /// Left/right: cursor movement in a text field, option stepping on the
    /// status selector.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            PJ_FIELD => {
                if right {
                    self.pj.move_right()
                } else {
                    self.pj.move_left()
                }
            }
            SPEK_FIELD => {
                if right {
                    self.spek.move_right()
                } else {
                    self.spek.move_left()
                }
            }
            STATUS_FIELD => {
                if right {
                    self.status = (self.status + 1) % STATUS_OPTIONS.len();
                } else {
                    self.status = if self.status == 0 {
                        STATUS_OPTIONS.len() - 1
                    } else {
                        self.status - 1
                    };
                }
            }
            _ => {}
        }
    }

    /// The status string the selector currently points at.
    pub fn selected_status(&self) -> &'static str {
        STATUS_OPTIONS[self.status]
    }

    /// Final field values under the save rules: inputs trimmed, empty
    /// defaults to the sentinel, status taken from the selector as-is.
    pub fn commit(&self) -> (String, String, String) {
        (
            crate::item::trim_or_unset(&self.pj.value),
            crate::item::trim_or_unset(&self.spek.value),
            self.selected_status().to_string(),
        )
    }
}
