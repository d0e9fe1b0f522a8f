//! Farm configuration.
//!
//! Holds the static tables the simulation consumes: energy costs, prices,
//! map tile codes, and starting resources. Configuration can be loaded from
//! and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

use crate::economy::PriceTable;
use crate::grid::TileCodes;
use crate::inventory::Inventory;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "farm.toml";

/// Energy spent by each player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyCosts {
    /// One step on the grid
    pub movement: u32,
    /// Tilling soil
    pub till: u32,
    /// Untilling soil
    pub untill: u32,
    /// Placing a plant
    pub plant: u32,
    /// Harvesting a plant
    pub harvest: u32,
    /// Pulling up a plant
    pub remove: u32,
}

impl Default for EnergyCosts {
    fn default() -> Self {
        Self {
            movement: 1,
            till: 1,
            untill: 1,
            plant: 1,
            harvest: 1,
            remove: 1,
        }
    }
}

/// What happens when tilled soil under a plant is untilled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UntillPolicy {
    /// The plant is destroyed along with the tilled soil.
    #[default]
    DestroyPlant,
    /// Untilling is refused while a plant stands there.
    Reject,
}

/// Simulation configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    /// Energy restored each morning
    pub max_energy: u32,
    /// Money at the start of the game
    pub starting_money: u64,
    /// Untilling under a plant
    pub untill_policy: UntillPolicy,
    /// Items at the start of the game
    pub starting_inventory: HashMap<String, u32>,
    /// Per-action energy costs
    pub energy_costs: EnergyCosts,
    /// Shop prices
    pub prices: PriceTable,
    /// Map description codes
    pub tiles: TileCodes,
}

impl Default for FarmConfig {
    fn default() -> Self {
        let starting_inventory = [("Potato Seed", 5), ("Kale Seed", 5), ("Berry Seed", 5)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        Self {
            max_energy: 100,
            starting_money: 0,
            untill_policy: UntillPolicy::default(),
            starting_inventory,
            energy_costs: EnergyCosts::default(),
            prices: PriceTable::default(),
            tiles: TileCodes::default(),
        }
    }
}

impl FarmConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match Self::from_toml_str(&contents) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Parse configuration from TOML text, then validate it.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(contents)?;
        config.validate();
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Fix up values the simulation cannot work with.
    pub fn validate(&mut self) {
        if self.max_energy == 0 {
            warn!("max_energy must be at least 1, using 1");
            self.max_energy = 1;
        }
        let codes = [self.tiles.grass, self.tiles.soil, self.tiles.tilled];
        if codes[0] == codes[1] || codes[1] == codes[2] || codes[0] == codes[2] {
            warn!("Tile codes must be distinct, using defaults");
            self.tiles = TileCodes::default();
        }

        let max_energy = self.max_energy;
        let costs = &mut self.energy_costs;
        for (action, cost) in [
            ("movement", &mut costs.movement),
            ("till", &mut costs.till),
            ("untill", &mut costs.untill),
            ("plant", &mut costs.plant),
            ("harvest", &mut costs.harvest),
            ("remove", &mut costs.remove),
        ] {
            if *cost > max_energy {
                warn!("{action} cost {cost} exceeds max_energy, using {max_energy}");
                *cost = max_energy;
            }
        }

        for item in self.prices.unsellable() {
            warn!("{item} can be bought but has no sell price");
        }
    }

    /// The starting inventory as an [`Inventory`].
    #[must_use]
    pub fn starting_inventory(&self) -> Inventory {
        self.starting_inventory
            .iter()
            .map(|(item, &count)| (item.as_str(), count))
            .collect()
    }
}
