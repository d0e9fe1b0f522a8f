//! # Farm Sim
//!
//! The simulation core of the farm game.
//!
//! This crate holds every rule of the game and nothing about how it is shown:
//! - Grid of ground tiles and soil tilling
//! - Crop variants and their growth stages
//! - Inventory and the fixed-price shop
//! - Player movement and energy
//! - `FarmModel`, which ties them together and advances the days
//! - Configuration tables loaded from TOML

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod economy;
pub mod grid;
pub mod inventory;
pub mod model;
pub mod plants;
pub mod player;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::economy::*;
    pub use crate::grid::*;
    pub use crate::inventory::*;
    pub use crate::model::*;
    pub use crate::plants::*;
    pub use crate::player::*;
}

pub use prelude::*;
