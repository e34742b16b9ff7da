//! Item storage held by the player actor.

use serde::{Deserialize, Serialize};

/// Maximum number of distinct item names an inventory can hold.
pub const INVENTORY_CAPACITY: usize = 40;

/// Number of slots in the hotbar.
pub const HOTBAR_SLOTS: usize = 10;

/// Fixed-capacity ordered map from item name to count.
///
/// Slots keep the order in which items were first picked up. A slot is freed
/// as soon as its count drops to zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<(String, u32)>,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` of `item`.
    ///
    /// Returns `false` and leaves the inventory untouched when `item` is not
    /// yet held and every slot is already occupied. Adding to an item that is
    /// already held always succeeds.
    pub fn add(&mut self, item: &str, amount: u32) -> bool {
        if let Some((_, count)) = self.slots.iter_mut().find(|(name, _)| name == item) {
            *count = count.saturating_add(amount);
            return true;
        }
        if self.slots.len() >= INVENTORY_CAPACITY {
            return false;
        }
        if amount > 0 {
            self.slots.push((item.to_owned(), amount));
        }
        true
    }

    /// Removes up to `amount` of `item`, returning how many were removed.
    pub fn remove(&mut self, item: &str, amount: u32) -> u32 {
        let Some(position) = self.slots.iter().position(|(name, _)| name == item) else {
            return 0;
        };
        let count = &mut self.slots[position].1;
        let taken = amount.min(*count);
        *count -= taken;
        if *count == 0 {
            let _ = self.slots.remove(position);
        }
        taken
    }

    /// Number of `item` currently held.
    #[must_use]
    pub fn count(&self, item: &str) -> u32 {
        self.slots
            .iter()
            .find(|(name, _)| name == item)
            .map_or(0, |(_, count)| *count)
    }

    /// Reports whether at least one `item` is held.
    #[must_use]
    pub fn contains(&self, item: &str) -> bool {
        self.count(item) > 0
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Reports whether no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over `(item, count)` pairs in pickup order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.slots.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

/// Fixed-length list of optional item references shown to the player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotbar {
    slots: [Option<String>; HOTBAR_SLOTS],
    selected: usize,
}

impl Hotbar {
    /// Creates an empty hotbar with slot zero selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the currently selected slot.
    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// Selects the provided slot. Out-of-range indices are ignored.
    pub fn select(&mut self, slot: usize) -> bool {
        if slot < HOTBAR_SLOTS {
            self.selected = slot;
            true
        } else {
            false
        }
    }

    /// Item referenced by the provided slot.
    #[must_use]
    pub fn slot(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).and_then(|entry| entry.as_deref())
    }

    /// Item referenced by the selected slot.
    #[must_use]
    pub fn selected_item(&self) -> Option<&str> {
        self.slot(self.selected)
    }

    /// Stores a reference to `item` in the provided slot.
    pub fn set(&mut self, slot: usize, item: &str) -> bool {
        match self.slots.get_mut(slot) {
            Some(entry) => {
                *entry = Some(item.to_owned());
                true
            }
            None => false,
        }
    }

    /// Index of the first empty slot.
    #[must_use]
    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Reports whether any slot references `item`.
    #[must_use]
    pub fn contains(&self, item: &str) -> bool {
        self.slots.iter().any(|entry| entry.as_deref() == Some(item))
    }

    /// First-pickup rule: references `item` from the first empty slot unless it
    /// is already on the hotbar. Returns the slot used, if any.
    pub fn auto_assign(&mut self, item: &str) -> Option<usize> {
        if self.contains(item) {
            return None;
        }
        let slot = self.first_empty()?;
        self.slots[slot] = Some(item.to_owned());
        Some(slot)
    }

    /// Item-shift gesture: moves a held item into the first empty slot.
    ///
    /// Does nothing when the item is not held, is already on the hotbar, or
    /// no slot is free.
    pub fn shift_from(&mut self, inventory: &Inventory, item: &str) -> Option<usize> {
        if !inventory.contains(item) {
            return None;
        }
        self.auto_assign(item)
    }
}
