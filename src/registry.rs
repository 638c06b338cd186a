//! The set of items on the board and where they come from.
//!
//! The board is described declaratively: a layout JSON file lists rooms and
//! the equipment nested inside them, with each entry carrying a label, an
//! optional identifier, and optional initial field values. A built-in default
//! floor plan is used when no layout file exists. At startup the registry
//! overlays any stored record onto the layout defaults, field by field.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::item::Item;
use crate::store::RecordStore;

/// One room on the board: the room's own item plus the equipment inside it.
///
/// The room is the "container" clickable; its gear are the "inner" clickables
/// that take priority when a click lands on both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    #[serde(flatten)]
    pub item: Item,
    #[serde(default)]
    pub gear: Vec<Item>,
}

/// Serialized layout description: the declarative source of the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub rooms: Vec<Room>,
}

/// Address of an item within the registry: a room, or a piece of gear in one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemKey {
    pub room: usize,
    pub gear: Option<usize>,
}

impl ItemKey {
    pub fn room(room: usize) -> Self {
        ItemKey { room, gear: None }
    }

    pub fn gear(room: usize, gear: usize) -> Self {
        ItemKey {
            room,
            gear: Some(gear),
        }
    }
}

/// In-memory board state for the current session.
#[derive(Debug, Clone)]
pub struct Registry {
    pub rooms: Vec<Room>,
}

impl Registry {
    /// Build a registry from a layout file, falling back to the built-in
    /// floor plan if the file is missing or unreadable.
    pub fn load(layout_path: &Path) -> Self {
        if !layout_path.exists() {
            return Registry {
                rooms: default_layout().rooms,
            };
        }
        match std::fs::read_to_string(layout_path) {
            Ok(data) => match serde_json::from_str::<Layout>(&data) {
                Ok(layout) => Registry {
                    rooms: layout.rooms,
                },
                Err(e) => {
                    eprintln!(
                        "Error parsing layout {}, using built-in floor plan: {e}",
                        layout_path.display()
                    );
                    Registry {
                        rooms: default_layout().rooms,
                    }
                }
            },
            Err(e) => {
                eprintln!(
                    "Error reading layout {}, using built-in floor plan: {e}",
                    layout_path.display()
                );
                Registry {
                    rooms: default_layout().rooms,
                }
            }
        }
    }

    /// Initialization sweep: overlay stored records onto layout defaults.
    ///
    /// Every item with an identifier is looked up in the store; each field
    /// present and non-empty in its record overwrites the in-memory value.
    /// Absent fields keep the layout default, and items without identifiers
    /// are skipped entirely.
    pub fn overlay_store(&mut self, store: &RecordStore) {
        for room in &mut self.rooms {
            overlay_item(&mut room.item, store);
            for item in &mut room.gear {
                overlay_item(item, store);
            }
        }
    }

    pub fn get(&self, key: ItemKey) -> Option<&Item> {
        let room = self.rooms.get(key.room)?;
        match key.gear {
            None => Some(&room.item),
            Some(g) => room.gear.get(g),
        }
    }

    pub fn get_mut(&mut self, key: ItemKey) -> Option<&mut Item> {
        let room = self.rooms.get_mut(key.room)?;
        match key.gear {
            None => Some(&mut room.item),
            Some(g) => room.gear.get_mut(g),
        }
    }

    /// Keys of all interactive items, rooms first within each block, in
    /// board order. Used for keyboard navigation across the floor plan.
    pub fn interactive_keys(&self) -> Vec<ItemKey> {
        let mut keys = Vec::new();
        for (r, room) in self.rooms.iter().enumerate() {
            if room.item.is_interactive() {
                keys.push(ItemKey::room(r));
            }
            for (g, item) in room.gear.iter().enumerate() {
                if item.is_interactive() {
                    keys.push(ItemKey::gear(r, g));
                }
            }
        }
        keys
    }

    /// Find an identified item by its identifier.
    pub fn find_by_id(&self, id: &str) -> Option<ItemKey> {
        for (r, room) in self.rooms.iter().enumerate() {
            if room.item.persist_id() == Some(id) {
                return Some(ItemKey::room(r));
            }
            for (g, item) in room.gear.iter().enumerate() {
                if item.persist_id() == Some(id) {
                    return Some(ItemKey::gear(r, g));
                }
            }
        }
        None
    }
}

fn overlay_item(item: &mut Item, store: &RecordStore) {
    let Some(id) = item.persist_id().map(str::to_string) else {
        return;
    };
    let Some(record) = store.load(&id) else {
        return;
    };
    if let Some(pj) = record.pj.filter(|v| !v.is_empty()) {
        item.pj = pj;
    }
    if let Some(spek) = record.spek.filter(|v| !v.is_empty()) {
        item.spek = spek;
    }
    if let Some(status) = record.status.filter(|v| !v.is_empty()) {
        item.status = status;
    }
}

/// Built-in default floor plan, used when no layout file is present.
pub fn default_layout() -> Layout {
    fn item(id: &str, label: &str, status: &str) -> Item {
        Item {
            id: Some(id.to_string()),
            label: Some(label.to_string()),
            pj: "-".to_string(),
            spek: "-".to_string(),
            status: status.to_string(),
        }
    }

    Layout {
        rooms: vec![
            Room {
                item: item("r-server", "Ruang Server", "Restricted"),
                gear: vec![
                    item("srv-rack", "Rack Utama", "Baik"),
                    item("srv-ups", "UPS 3kVA", "Baik"),
                    item("srv-ac", "AC Split", "Perbaikan"),
                ],
            },
            Room {
                item: item("r-lab", "Lab Komputer", "Baik"),
                gear: vec![
                    item("lab-pc-01", "PC Baris 1", "Baik"),
                    item("lab-pc-02", "PC Baris 2", "Rusak"),
                    item("lab-proj", "Proyektor", "Baik"),
                ],
            },
            Room {
                item: item("r-rapat", "Ruang Rapat", "Baik"),
                gear: vec![item("rapat-tv", "TV Panel", "Baik")],
            },
            Room {
                item: item("r-gudang", "Gudang", "N/A"),
                gear: Vec::new(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ItemRecord;

    fn temp_store(tag: &str) -> RecordStore {
        let dir = std::env::temp_dir().join(format!(
            "mkks_registry_test_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        RecordStore::new(&dir)
    }

    #[test]
    fn test_overlay_replaces_present_fields_only() {
        let store = temp_store("overlay");
        store
            .save(
                "srv-ac",
                &ItemRecord {
                    pj: Some("Bu Rina".into()),
                    spek: None,
                    status: Some("Baik".into()),
                },
            )
            .unwrap();

        let mut registry = Registry {
            rooms: default_layout().rooms,
        };
        registry.overlay_store(&store);

        let key = registry.find_by_id("srv-ac").unwrap();
        let item = registry.get(key).unwrap();
        assert_eq!(item.pj, "Bu Rina");
        // Absent in the record: layout default survives.
        assert_eq!(item.spek, "-");
        assert_eq!(item.status, "Baik");
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_overlay_ignores_empty_record_fields() {
        let store = temp_store("empty_fields");
        store
            .save(
                "lab-proj",
                &ItemRecord {
                    pj: Some(String::new()),
                    spek: Some("4000 lumen".into()),
                    status: None,
                },
            )
            .unwrap();

        let mut registry = Registry {
            rooms: default_layout().rooms,
        };
        registry.overlay_store(&store);

        let item = registry
            .get(registry.find_by_id("lab-proj").unwrap())
            .unwrap();
        assert_eq!(item.pj, "-");
        assert_eq!(item.spek, "4000 lumen");
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_items_without_id_are_never_overlaid() {
        let store = temp_store("no_id");
        let mut registry = Registry {
            rooms: vec![Room {
                item: Item {
                    id: None,
                    label: Some("Lorong".into()),
                    pj: "-".into(),
                    spek: "-".into(),
                    status: "-".into(),
                },
                gear: Vec::new(),
            }],
        };
        registry.overlay_store(&store);
        assert_eq!(registry.rooms[0].item.pj, "-");
    }

    #[test]
    fn test_interactive_keys_order_and_filtering() {
        let mut rooms = default_layout().rooms;
        // A decorative, label-less entry must not appear in the walk.
        rooms[0].gear.push(Item {
            id: None,
            label: None,
            pj: "-".into(),
            spek: "-".into(),
            status: "-".into(),
        });
        let registry = Registry { rooms };

        let keys = registry.interactive_keys();
        assert_eq!(keys[0], ItemKey::room(0));
        assert_eq!(keys[1], ItemKey::gear(0, 0));
        assert!(!keys.contains(&ItemKey::gear(0, 3)));
    }

    #[test]
    fn test_layout_parses_from_json() {
        let json = r#"{
            "rooms": [
                {
                    "id": "r-1",
                    "label": "Ruang Guru",
                    "status": "Baik",
                    "gear": [ { "id": "printer-1", "label": "Printer" } ]
                }
            ]
        }"#;
        let layout: Layout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.rooms.len(), 1);
        assert_eq!(layout.rooms[0].item.label.as_deref(), Some("Ruang Guru"));
        // Fields omitted from the layout get the sentinel default.
        assert_eq!(layout.rooms[0].gear[0].pj, "-");
    }
}
