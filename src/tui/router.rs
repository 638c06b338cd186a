//! Click target resolution for the floor plan.
//!
//! Room blocks visually contain their equipment rows, so a press often lands
//! inside two hitboxes at once. Resolution is an explicit ordered procedure:
//! an inner (equipment) hit always beats a container (room) hit, and a
//! container hit beats nothing.

use ratatui::layout::{Position, Rect};

use crate::registry::ItemKey;

/// Whether a hitbox belongs to a room block or an equipment row inside one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Container,
    Inner,
}

/// One clickable region on the rendered board, recorded during drawing.
#[derive(Debug, Clone, Copy)]
pub struct Hitbox {
    pub rect: Rect,
    pub kind: HitKind,
    pub key: ItemKey,
}

/// Resolve a press position against the recorded hitboxes.
///
/// Returns the key of the inner hit containing the position if there is one,
/// otherwise the containing room, otherwise `None`. Callers still have to
/// check the resolved item has a label before acting on it.
pub fn resolve_press(hitboxes: &[Hitbox], column: u16, row: u16) -> Option<ItemKey> {
    let pos = Position::new(column, row);
    let mut container_hit = None;
    for hb in hitboxes {
        if !hb.rect.contains(pos) {
            continue;
        }
        match hb.kind {
            HitKind::Inner => return Some(hb.key),
            HitKind::Container => container_hit = Some(hb.key),
        }
    }
    container_hit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxes() -> Vec<Hitbox> {
        vec![
            // Room block covering 0,0..20,10 with one equipment row inside.
            Hitbox {
                rect: Rect::new(0, 0, 20, 10),
                kind: HitKind::Container,
                key: ItemKey::room(0),
            },
            Hitbox {
                rect: Rect::new(2, 3, 16, 1),
                kind: HitKind::Inner,
                key: ItemKey::gear(0, 0),
            },
        ]
    }

    #[test]
    fn test_inner_beats_container() {
        assert_eq!(resolve_press(&boxes(), 5, 3), Some(ItemKey::gear(0, 0)));
    }

    #[test]
    fn test_container_when_outside_inner() {
        assert_eq!(resolve_press(&boxes(), 5, 7), Some(ItemKey::room(0)));
    }

    #[test]
    fn test_no_hit_outside_everything() {
        assert_eq!(resolve_press(&boxes(), 30, 30), None);
    }

    #[test]
    fn test_inner_wins_regardless_of_recording_order() {
        let mut reversed = boxes();
        reversed.reverse();
        assert_eq!(resolve_press(&reversed, 5, 3), Some(ItemKey::gear(0, 0)));
    }
}
