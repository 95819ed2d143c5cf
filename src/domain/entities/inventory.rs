//! Inventory items - a reward sink outside the battle loop

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_id: String,
    pub name: String,
    pub quantity: u32,
}

impl InventoryItem {
    pub fn new(item_id: impl Into<String>, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            quantity,
        }
    }
}

/// Items every new player starts with
pub fn starter_items() -> Vec<InventoryItem> {
    vec![
        InventoryItem::new("health_potion", "Health Potion", 3),
        InventoryItem::new("energy_drink", "Energy Drink", 2),
        InventoryItem::new("guitar_pick", "Guitar Pick", 1),
    ]
}
