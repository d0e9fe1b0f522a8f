//! Inventory system.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Inventory error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Not enough items
    #[error("Not enough {item}: need {needed}, have {have}")]
    NotEnough {
        /// Item name
        item: String,
        /// Amount needed
        needed: u32,
        /// Amount available
        have: u32,
    },
}

/// Result type for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Item holdings keyed by item name.
///
/// A missing item counts as zero. Removing the last unit keeps the entry at
/// zero rather than dropping it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Items and their quantities
    items: HashMap<String, u32>,
}

impl Inventory {
    /// Creates a new empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the count of a specific item.
    #[must_use]
    pub fn count(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// Checks if the inventory contains at least the given amount.
    #[must_use]
    pub fn has(&self, item: &str, amount: u32) -> bool {
        self.count(item) >= amount
    }

    /// Checks whether the item has an entry, even an empty one.
    #[must_use]
    pub fn contains(&self, item: &str) -> bool {
        self.items.contains_key(item)
    }

    /// Adds items to the inventory.
    pub fn add(&mut self, item: &str, amount: u32) {
        if amount == 0 {
            return;
        }
        let slot = self.items.entry(item.to_string()).or_insert(0);
        *slot = slot.saturating_add(amount);
    }

    /// Removes items from the inventory.
    pub fn remove(&mut self, item: &str, amount: u32) -> InventoryResult<()> {
        let current = self.count(item);
        if current < amount {
            return Err(InventoryError::NotEnough {
                item: item.to_string(),
                needed: amount,
                have: current,
            });
        }
        if let Some(slot) = self.items.get_mut(item) {
            *slot = current - amount;
        }
        Ok(())
    }

    /// Returns an iterator over all entries, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.items.iter().map(|(name, &count)| (name.as_str(), count))
    }

    /// All entries sorted by item name.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&str, u32)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by_key(|&(name, _)| name);
        entries
    }

}

impl<S: Into<String>> FromIterator<(S, u32)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut inventory = Self::new();
        for (item, amount) in iter {
            inventory.add(&item.into(), amount);
        }
        inventory
    }
}
