//! Item data structure for the facility board.
//!
//! An item is anything on the board that can be opened in the modal: a room,
//! or a piece of equipment inside a room. Items carry three editable fields
//! (assignee, specification, status), each defaulting to the `"-"` sentinel.

use serde::{Deserialize, Serialize};

/// Placeholder shown for a field that has never been set.
///
/// This is a real stored value, distinct from "field absent in a record":
/// a saved `"-"` overwrites layout defaults like any other string, while an
/// absent record field leaves the default alone.
pub const UNSET: &str = "-";

/// A board item with its current in-memory field values.
///
/// Items without an identifier are never persisted and reset to their layout
/// defaults on every run. Items without a label are decorative and cannot be
/// opened in the modal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Option<String>,
    pub label: Option<String>,
    #[serde(default = "default_field")]
    pub pj: String,
    #[serde(default = "default_field")]
    pub spek: String,
    #[serde(default = "default_field")]
    pub status: String,
}

fn default_field() -> String {
    UNSET.to_string()
}

impl Item {
    /// Whether the item can be opened in the modal.
    pub fn is_interactive(&self) -> bool {
        self.label.as_deref().map_or(false, |l| !l.is_empty())
    }

    /// Identifier, if the item has a non-empty one.
    pub fn persist_id(&self) -> Option<&str> {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => Some(id),
            _ => None,
        }
    }
}

/// Normalise a raw field value for display: empty becomes the sentinel.
pub fn display_or_unset(value: &str) -> &str {
    if value.is_empty() {
        UNSET
    } else {
        value
    }
}

/// Apply the save-path rule to raw input: trim, and default empty to `"-"`.
pub fn trim_or_unset(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        UNSET.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_or_unset() {
        assert_eq!(trim_or_unset("  AC Split 2PK  "), "AC Split 2PK");
        assert_eq!(trim_or_unset(""), "-");
        assert_eq!(trim_or_unset("   "), "-");
    }

    #[test]
    fn test_interactivity_requires_label() {
        let item = Item {
            id: Some("x".into()),
            label: None,
            pj: UNSET.into(),
            spek: UNSET.into(),
            status: UNSET.into(),
        };
        assert!(!item.is_interactive());
    }
}
