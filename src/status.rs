//! Status classification for board items.
//!
//! Statuses are free-form strings; a small closed set of them is selectable
//! in the edit form, and a pure classifier maps any status string to one of
//! three visual categories. The match is literal and case-sensitive, so an
//! unanticipated spelling falls into `Unknown` rather than guessing.

/// Visual category derived from a status string.
///
/// Never stored; recomputed from the status value each time it is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Good,
    NeedsAttention,
    Unknown,
}

/// The closed set of statuses selectable in the edit form.
///
/// `N/A` is the guaranteed fallback member: a recorded status that is no
/// longer in this list maps to it when the selector is populated.
pub const STATUS_OPTIONS: [&str; 5] = ["Baik", "Perbaikan", "Rusak", "Restricted", "N/A"];

/// Selector fallback for statuses outside `STATUS_OPTIONS`.
pub const FALLBACK_STATUS: &str = "N/A";

/// Classify a status string into its visual category.
pub fn classify(status: &str) -> StatusCategory {
    match status {
        "Baik" => StatusCategory::Good,
        "Perbaikan" | "Rusak" | "Restricted" => StatusCategory::NeedsAttention,
        _ => StatusCategory::Unknown,
    }
}

/// Format a category for plain-text output.
pub fn format_category(c: StatusCategory) -> &'static str {
    match c {
        StatusCategory::Good => "good",
        StatusCategory::NeedsAttention => "needs-attention",
        StatusCategory::Unknown => "unknown",
    }
}

/// Index into `STATUS_OPTIONS` for a recorded status, falling back to `N/A`.
pub fn selector_index(status: &str) -> usize {
    STATUS_OPTIONS
        .iter()
        .position(|&opt| opt == status)
        // N/A is the last member of the option set.
        .unwrap_or(STATUS_OPTIONS.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_statuses() {
        assert_eq!(classify("Baik"), StatusCategory::Good);
        assert_eq!(classify("Perbaikan"), StatusCategory::NeedsAttention);
        assert_eq!(classify("Rusak"), StatusCategory::NeedsAttention);
        assert_eq!(classify("Restricted"), StatusCategory::NeedsAttention);
    }

    #[test]
    fn test_classify_everything_else_is_unknown() {
        assert_eq!(classify(""), StatusCategory::Unknown);
        assert_eq!(classify("-"), StatusCategory::Unknown);
        assert_eq!(classify("N/A"), StatusCategory::Unknown);
        // Case-sensitive on purpose.
        assert_eq!(classify("baik"), StatusCategory::Unknown);
        assert_eq!(classify("BAIK"), StatusCategory::Unknown);
    }

    #[test]
    fn test_selector_index_falls_back_to_na() {
        assert_eq!(selector_index("Baik"), 0);
        assert_eq!(selector_index("Restricted"), 3);
        assert_eq!(STATUS_OPTIONS[selector_index("Dipinjam")], "N/A");
        assert_eq!(STATUS_OPTIONS[selector_index("-")], "N/A");
    }
}
