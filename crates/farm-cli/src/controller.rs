//! Text command controller.
//!
//! Turns one line of input into calls on the farm model, the same way the
//! game's key bindings do: movement, soil work, planting the selected seed,
//! harvesting into the inventory, and shop trades.

use std::fmt::Write as _;
use std::str::FromStr;

use farm_common::Direction;
use farm_sim::{CropVariant, FarmModel, Plant, Shop, TileCodes};
use thiserror::Error;
use tracing::debug;

/// A parsed player command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Step one cell
    Move(Direction),
    /// Till the tile underfoot
    Till,
    /// Untill the tile underfoot
    Untill,
    /// Plant the selected seed underfoot
    Plant,
    /// Pull up the plant underfoot
    Remove,
    /// Harvest the plant underfoot
    Harvest,
    /// Sleep until tomorrow
    NextDay,
    /// Select an item
    Select(String),
    /// Clear the selection
    Deselect,
    /// Buy one unit from the shop
    Buy(String),
    /// Sell one unit to the shop
    Sell(String),
    /// Show the farm
    Status,
    /// Leave the game
    Quit,
}

/// Input that is not a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    /// Blank line
    #[error("empty command")]
    Empty,
    /// Unrecognized verb
    #[error("unknown command: {0}")]
    Unknown(String),
    /// Item command without an item
    #[error("{0} needs an item name")]
    MissingItem(&'static str),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let item = rest.trim();

        let with_item = |name: &'static str, make: fn(String) -> Self| {
            if item.is_empty() {
                Err(ParseCommandError::MissingItem(name))
            } else {
                Ok(make(item.to_string()))
            }
        };

        match verb {
            "" => Err(ParseCommandError::Empty),
            "t" => Ok(Self::Till),
            "u" => Ok(Self::Untill),
            "p" => Ok(Self::Plant),
            "r" => Ok(Self::Remove),
            "h" => Ok(Self::Harvest),
            "n" => Ok(Self::NextDay),
            "q" | "quit" => Ok(Self::Quit),
            "status" => Ok(Self::Status),
            "select" if item.is_empty() => Ok(Self::Deselect),
            "select" => with_item("select", Self::Select),
            "buy" => with_item("buy", Self::Buy),
            "sell" => with_item("sell", Self::Sell),
            _ => {
                let mut chars = verb.chars();
                match (chars.next().and_then(Direction::from_key), chars.next()) {
                    (Some(dir), None) => Ok(Self::Move(dir)),
                    _ => Err(ParseCommandError::Unknown(verb.to_string())),
                }
            },
        }
    }
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Keep reading commands
    Continue,
    /// Print this text, then keep reading
    Show(String),
    /// Stop
    Quit,
}

/// Drives a farm from text commands.
#[derive(Debug)]
pub struct Controller {
    model: FarmModel,
    shop: Shop,
    tiles: TileCodes,
}

impl Controller {
    /// Create a controller around a model.
    #[must_use]
    pub fn new(model: FarmModel, shop: Shop, tiles: TileCodes) -> Self {
        Self { model, shop, tiles }
    }

    /// The model being driven.
    #[must_use]
    pub fn model(&self) -> &FarmModel {
        &self.model
    }

    /// Parse and run one input line. Unknown input is ignored.
    pub fn handle_line(&mut self, line: &str) -> Response {
        match line.parse::<Command>() {
            Ok(command) => self.apply(command),
            Err(ParseCommandError::Empty) => Response::Continue,
            Err(e) => {
                debug!("ignoring input: {e}");
                Response::Continue
            },
        }
    }

    /// Run one command.
    pub fn apply(&mut self, command: Command) -> Response {
        let here = self.model.player().position();
        let outcome = match command {
            Command::Move(dir) => self.model.move_player(dir).map_err(|e| e.to_string()),
            Command::Till => self.model.till_soil(here).map_err(|e| e.to_string()),
            Command::Untill => self.model.untill_soil(here).map_err(|e| e.to_string()),
            Command::Plant => self.plant_selected(),
            Command::Remove => self
                .model
                .remove_plant(here)
                .map(drop)
                .map_err(|e| e.to_string()),
            Command::Harvest => match self.model.harvest_plant(here) {
                Some(harvest) => {
                    self.model.player_mut().add_item(harvest.into_item());
                    Ok(())
                },
                None => Err("nothing to harvest".to_string()),
            },
            Command::NextDay => {
                self.model.new_day();
                Ok(())
            },
            Command::Select(item) => {
                self.model.player_mut().select_item(&item);
                Ok(())
            },
            Command::Deselect => {
                self.model.player_mut().deselect_item();
                Ok(())
            },
            Command::Buy(item) => self
                .shop
                .buy(self.model.player_mut(), &item)
                .map(drop)
                .map_err(|e| e.to_string()),
            Command::Sell(item) => self
                .shop
                .sell(self.model.player_mut(), &item)
                .map(drop)
                .map_err(|e| e.to_string()),
            Command::Status => return Response::Show(self.status()),
            Command::Quit => return Response::Quit,
        };

        if let Err(reason) = outcome {
            debug!("action had no effect: {reason}");
        }
        Response::Continue
    }

    /// Plant the selected seed underfoot, then take it from the inventory.
    fn plant_selected(&mut self) -> Result<(), String> {
        let player = self.model.player();
        let seed = player
            .selected_item()
            .ok_or_else(|| "no item selected".to_string())?
            .to_string();
        if !player.inventory().has(&seed, 1) {
            return Err(format!("no {seed} left"));
        }
        let variant = CropVariant::from_seed(&seed).ok_or_else(|| format!("{seed} is not a seed"))?;

        let here = player.position();
        self.model
            .add_plant(here, Plant::new(variant))
            .map_err(|e| e.to_string())?;
        self.model
            .player_mut()
            .remove_item((seed.as_str(), 1))
            .map_err(|e| e.to_string())
    }

    /// Day, money, energy, a text map, and the item list.
    ///
    /// The map uses the tile codes, the crop's initial for plants (upper case
    /// once ripe), and `@` for the player. The item list covers everything the
    /// shop prices plus anything else held, with a count of 0 when not held.
    #[must_use]
    pub fn status(&self) -> String {
        let model = &self.model;
        let player = model.player();
        let mut rows = model.map().to_codes(&self.tiles);

        for (pos, plant) in model.plants() {
            let initial = plant.name().chars().next().unwrap_or('?');
            let mark = if plant.is_harvestable() {
                initial.to_ascii_uppercase()
            } else {
                initial.to_ascii_lowercase()
            };
            replace_char(&mut rows[pos.row], pos.col, mark);
        }
        let here = player.position();
        replace_char(&mut rows[here.row], here.col, '@');

        let mut out = String::new();
        let _ = writeln!(
            out,
            "Day {}  Money ${}  Energy {}/{}  Facing {:?}",
            model.days_elapsed(),
            player.money(),
            player.energy(),
            player.max_energy(),
            player.direction()
        );
        for row in &rows {
            let _ = writeln!(out, "{row}");
        }
        let prices = self.shop.prices();
        let mut items = prices.items();
        items.extend(player.inventory().sorted().into_iter().map(|(item, _)| item));
        items.sort_unstable();
        items.dedup();

        for item in items {
            let count = player.inventory().count(item);
            let marker = if player.selected_item() == Some(item) { '*' } else { ' ' };
            let buy = prices
                .buy_price(item)
                .map_or_else(|| "N/A".to_string(), |p| format!("${p}"));
            let sell = prices
                .sell_price(item)
                .map_or_else(|| "N/A".to_string(), |p| format!("${p}"));
            let _ = writeln!(out, "{marker} {item}: {count} (buy {buy}, sell {sell})");
        }
        out
    }
}

fn replace_char(row: &mut String, col: usize, ch: char) {
    let mut chars: Vec<char> = row.chars().collect();
    if let Some(slot) = chars.get_mut(col) {
        *slot = ch;
    }
    *row = chars.into_iter().collect();
}
