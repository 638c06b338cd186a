//! Color constants for the terminal user interface.

use ratatui::style::Color;

// Status badge colors, one per category.

/// "Baik" and anything else classified good.
pub const BADGE_GOOD: Color = Color::Rgb(0, 110, 40);
/// Statuses needing attention (Perbaikan, Rusak, Restricted).
pub const BADGE_ATTENTION: Color = Color::Rgb(150, 30, 30);
/// Unknown or unset statuses.
pub const BADGE_UNKNOWN: Color = Color::Rgb(90, 90, 90);

/// Border highlight for the item under the keyboard cursor.
pub const HIGHLIGHT: Color = Color::Rgb(255, 215, 0);
