//! Economy: the player's wallet and the shop's fixed price tables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::inventory::InventoryError;
use crate::player::Player;

/// Economy error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EconomyError {
    /// Insufficient funds
    #[error("Insufficient funds: need {needed}, have {have}")]
    InsufficientFunds {
        /// Amount needed
        needed: u64,
        /// Amount available
        have: u64,
    },
    /// Item has no buy price
    #[error("{0} is not for sale")]
    NotForSale(String),
    /// Item has no sell price
    #[error("{0} cannot be sold")]
    NoSellPrice(String),
    /// Nothing to sell
    #[error(transparent)]
    OutOfStock(#[from] InventoryError),
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;

/// The player's money. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    balance: u64,
}

impl Wallet {
    /// Creates a wallet holding `initial` money.
    #[must_use]
    pub const fn new(initial: u64) -> Self {
        Self { balance: initial }
    }

    /// Returns the balance.
    #[must_use]
    pub const fn balance(&self) -> u64 {
        self.balance
    }

    /// Checks whether `amount` can be paid.
    #[must_use]
    pub const fn can_afford(&self, amount: u64) -> bool {
        self.balance >= amount
    }

    /// Adds money to the wallet.
    pub fn earn(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Removes money from the wallet.
    pub fn spend(&mut self, amount: u64) -> EconomyResult<()> {
        if !self.can_afford(amount) {
            return Err(EconomyError::InsufficientFunds {
                needed: amount,
                have: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }
}

/// Fixed per-item buy and sell prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceTable {
    /// Prices the shop charges, only for purchasable items
    pub buy: HashMap<String, u64>,
    /// Prices the shop pays
    pub sell: HashMap<String, u64>,
}

impl Default for PriceTable {
    fn default() -> Self {
        let buy = [("Potato Seed", 2), ("Kale Seed", 5), ("Berry Seed", 6)];
        let sell = [
            ("Potato Seed", 1),
            ("Kale Seed", 2),
            ("Berry Seed", 3),
            ("Potato", 3),
            ("Kale", 8),
            ("Berry", 6),
        ];
        Self {
            buy: buy.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            sell: sell.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }
}

impl PriceTable {
    /// Price to buy one unit, if the item is purchasable.
    #[must_use]
    pub fn buy_price(&self, item: &str) -> Option<u64> {
        self.buy.get(item).copied()
    }

    /// Price paid for one unit.
    #[must_use]
    pub fn sell_price(&self, item: &str) -> Option<u64> {
        self.sell.get(item).copied()
    }

    /// Every item that appears in either table, sorted by name.
    #[must_use]
    pub fn items(&self) -> Vec<&str> {
        let mut items: Vec<&str> = self
            .sell
            .keys()
            .chain(self.buy.keys())
            .map(String::as_str)
            .collect();
        items.sort_unstable();
        items.dedup();
        items
    }

    /// Purchasable items the shop will not buy back, sorted by name.
    #[must_use]
    pub fn unsellable(&self) -> Vec<&str> {
        let mut items: Vec<&str> = self
            .buy
            .keys()
            .filter(|item| !self.sell.contains_key(*item))
            .map(String::as_str)
            .collect();
        items.sort_unstable();
        items
    }
}

/// A shop that trades with the player at fixed prices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shop {
    prices: PriceTable,
}

impl Shop {
    /// Create a shop with the given price tables.
    #[must_use]
    pub fn new(prices: PriceTable) -> Self {
        Self { prices }
    }

    /// The shop's price tables.
    #[must_use]
    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// Sell one unit of `item` to the player.
    pub fn buy(&self, player: &mut Player, item: &str) -> EconomyResult<u64> {
        let price = self
            .prices
            .buy_price(item)
            .ok_or_else(|| EconomyError::NotForSale(item.to_string()))?;
        player.buy(item, price)?;
        Ok(price)
    }

    /// Buy one unit of `item` from the player.
    pub fn sell(&self, player: &mut Player, item: &str) -> EconomyResult<u64> {
        let price = self
            .prices
            .sell_price(item)
            .ok_or_else(|| EconomyError::NoSellPrice(item.to_string()))?;
        player.sell(item, price)?;
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_transactions() {
        let mut wallet = Wallet::new(10);

        assert!(wallet.spend(4).is_ok());
        assert_eq!(wallet.balance(), 6);

        wallet.earn(3);
        assert_eq!(wallet.balance(), 9);
    }

    #[test]
    fn test_wallet_overspend() {
        let mut wallet = Wallet::new(3);
        assert_eq!(
            wallet.spend(5),
            Err(EconomyError::InsufficientFunds { needed: 5, have: 3 })
        );
        assert_eq!(wallet.balance(), 3);
    }

    #[test]
    fn test_default_prices() {
        let prices = PriceTable::default();
        assert_eq!(prices.buy_price("Potato Seed"), Some(2));
        assert_eq!(prices.buy_price("Potato"), None);
        assert_eq!(prices.sell_price("Kale"), Some(8));
        assert_eq!(prices.items().len(), 6);
        // every purchasable item can also be sold back
        for item in prices.buy.keys() {
            assert!(prices.sell_price(item).is_some(), "{item} has no sell price");
        }
    }

    #[test]
    fn test_unsellable_items() {
        let mut prices = PriceTable::default();
        assert!(prices.unsellable().is_empty());

        prices.buy.insert("Turnip Seed".to_string(), 4);
        prices.sell.remove("Kale Seed");
        assert_eq!(prices.unsellable(), vec!["Kale Seed", "Turnip Seed"]);
    }

    #[test]
    fn test_shop_buy_and_sell() {
        let shop = Shop::default();
        let mut player = Player::new(100, 5);

        assert_eq!(shop.buy(&mut player, "Kale Seed"), Ok(5));
        assert_eq!(player.money(), 0);
        assert_eq!(player.inventory().count("Kale Seed"), 1);

        assert_eq!(shop.sell(&mut player, "Kale Seed"), Ok(2));
        assert_eq!(player.money(), 2);
        assert_eq!(player.inventory().count("Kale Seed"), 0);
    }

    #[test]
    fn test_shop_rejects_unlisted_items() {
        let shop = Shop::default();
        let mut player = Player::new(100, 50);
        player.add_item(("Rock", 1));

        assert_eq!(
            shop.buy(&mut player, "Potato"),
            Err(EconomyError::NotForSale("Potato".to_string()))
        );
        assert_eq!(
            shop.sell(&mut player, "Rock"),
            Err(EconomyError::NoSellPrice("Rock".to_string()))
        );
        assert_eq!(player.money(), 50);
        assert_eq!(player.inventory().count("Rock"), 1);
    }

    #[test]
    fn test_shop_sell_without_stock() {
        let shop = Shop::default();
        let mut player = Player::new(100, 0);

        assert!(matches!(
            shop.sell(&mut player, "Berry"),
            Err(EconomyError::OutOfStock(_))
        ));
        assert_eq!(player.money(), 0);
    }
}
