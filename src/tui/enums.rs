//! State enumerations for the terminal user interface.

/// Modal dialog state. The modal starts closed, opens into view mode, and
/// only ever enters edit mode from view mode.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ModalState {
    Closed,
    View,
    Edit,
}
