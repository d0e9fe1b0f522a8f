//! The farmer: position, facing, energy, money, and held items.

use farm_common::{Dimensions, Direction, GridPos};
use serde::Serialize;
use thiserror::Error;
use tracing::trace;

use crate::economy::{EconomyResult, Wallet};
use crate::inventory::{Inventory, InventoryResult};

/// Errors that can occur in the player system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlayerError {
    /// The step would leave the grid
    #[error("cannot move {direction:?} from {from}: edge of the farm")]
    Blocked {
        /// Position before the attempted move
        from: GridPos,
        /// Attempted direction
        direction: Direction,
    },

    /// Not enough energy for the action
    #[error("too tired: need {needed} energy, have {have}")]
    Exhausted {
        /// Energy required
        needed: u32,
        /// Energy available
        have: u32,
    },
}

/// Result type for player operations.
pub type PlayerResult<T> = Result<T, PlayerError>;

/// The player character.
///
/// Only built through [`Player::new`], so energy never starts above the
/// maximum. Positions are kept on the grid by [`Player::move_in`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    position: GridPos,
    direction: Direction,
    energy: u32,
    max_energy: u32,
    wallet: Wallet,
    inventory: Inventory,
    selected_item: Option<String>,
}

impl Player {
    /// Create a player at the top-left corner with full energy.
    #[must_use]
    pub fn new(max_energy: u32, money: u64) -> Self {
        Self {
            position: GridPos::default(),
            direction: Direction::default(),
            energy: max_energy,
            max_energy,
            wallet: Wallet::new(money),
            inventory: Inventory::new(),
            selected_item: None,
        }
    }

    /// Give the player a starting inventory.
    #[must_use]
    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> GridPos {
        self.position
    }

    /// Direction of the last successful move.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Remaining energy.
    #[must_use]
    pub const fn energy(&self) -> u32 {
        self.energy
    }

    /// Energy after a night's rest.
    #[must_use]
    pub const fn max_energy(&self) -> u32 {
        self.max_energy
    }

    /// Money held.
    #[must_use]
    pub const fn money(&self) -> u64 {
        self.wallet.balance()
    }

    /// Items held.
    #[must_use]
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Currently selected item, which need not be held.
    #[must_use]
    pub fn selected_item(&self) -> Option<&str> {
        self.selected_item.as_deref()
    }

    /// Check that `cost` energy is available, without spending it.
    pub fn check_energy(&self, cost: u32) -> PlayerResult<()> {
        if self.energy < cost {
            return Err(PlayerError::Exhausted {
                needed: cost,
                have: self.energy,
            });
        }
        Ok(())
    }

    /// Spend `cost` energy, or fail and spend nothing.
    pub fn spend_energy(&mut self, cost: u32) -> PlayerResult<()> {
        self.check_energy(cost)?;
        self.energy -= cost;
        Ok(())
    }

    /// Reset energy to its maximum.
    pub fn restore_energy(&mut self) {
        self.energy = self.max_energy;
    }

    /// Step one cell in `direction` within `dims`, paying `cost` energy.
    ///
    /// Blocked moves cost nothing and do not turn the player.
    pub fn move_in(&mut self, direction: Direction, dims: Dimensions, cost: u32) -> PlayerResult<()> {
        let target = self
            .position
            .step(direction, dims)
            .ok_or(PlayerError::Blocked {
                from: self.position,
                direction,
            })?;
        self.spend_energy(cost)?;

        self.position = target;
        self.direction = direction;
        trace!(pos = %target, ?direction, energy = self.energy, "player moved");
        Ok(())
    }

    /// Select an item by name. Any name is accepted.
    pub fn select_item(&mut self, item: &str) {
        self.selected_item = Some(item.to_string());
    }

    /// Clear the selection.
    pub fn deselect_item(&mut self) {
        self.selected_item = None;
    }

    /// Add `(item, amount)` to the inventory.
    pub fn add_item<S: AsRef<str>>(&mut self, (item, amount): (S, u32)) {
        self.inventory.add(item.as_ref(), amount);
    }

    /// Remove `(item, amount)` from the inventory.
    pub fn remove_item<S: AsRef<str>>(&mut self, (item, amount): (S, u32)) -> InventoryResult<()> {
        self.inventory.remove(item.as_ref(), amount)
    }

    /// Pay `unit_price` for one `item`.
    pub fn buy(&mut self, item: &str, unit_price: u64) -> EconomyResult<()> {
        self.wallet.spend(unit_price)?;
        self.inventory.add(item, 1);
        Ok(())
    }

    /// Hand over one `item` for `unit_price`.
    pub fn sell(&mut self, item: &str, unit_price: u64) -> EconomyResult<()> {
        self.inventory.remove(item, 1)?;
        self.wallet.earn(unit_price);
        Ok(())
    }
}
