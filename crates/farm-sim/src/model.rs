//! Central farm state.
//!
//! `FarmModel` is the single source of truth for a game: it owns the grid,
//! the plants, and the player, and exposes every day-to-day action. Each
//! action either applies completely or leaves everything untouched.

use ahash::AHashMap;
use farm_common::{Dimensions, Direction, FarmResult, GridPos, MapError};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{EnergyCosts, FarmConfig, UntillPolicy};
use crate::grid::{Grid, TileError, TileKind};
use crate::plants::{Harvest, Plant};
use crate::player::{Player, PlayerError};

/// Why a farm action did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Tile precondition failed
    #[error(transparent)]
    Tile(#[from] TileError),
    /// Player precondition failed
    #[error(transparent)]
    Player(#[from] PlayerError),
    /// Plants need tilled soil
    #[error("{pos} is {}, not tilled soil", .kind.display_name())]
    NotTilled {
        /// Target position
        pos: GridPos,
        /// Tile found there
        kind: TileKind,
    },
    /// Something is already growing there
    #[error("a plant is already growing at {0}")]
    Occupied(GridPos),
    /// Nothing is growing there
    #[error("no plant at {0}")]
    NoPlant(GridPos),
}

/// Result type for farm actions.
pub type ActionResult<T> = Result<T, ActionError>;

/// The whole farm: ground, plants, player, and calendar.
#[derive(Debug, Clone)]
pub struct FarmModel {
    grid: Grid,
    plants: AHashMap<GridPos, Plant>,
    player: Player,
    days_elapsed: u32,
    costs: EnergyCosts,
    untill_policy: UntillPolicy,
}

impl FarmModel {
    /// Create a farm on `grid`, set up from `config`.
    #[must_use]
    pub fn new(grid: Grid, config: &FarmConfig) -> Self {
        let player = Player::new(config.max_energy, config.starting_money)
            .with_inventory(config.starting_inventory());

        Self {
            grid,
            plants: AHashMap::new(),
            player,
            days_elapsed: 1,
            costs: config.energy_costs,
            untill_policy: config.untill_policy,
        }
    }

    /// Create a farm from map description text.
    pub fn from_map_str(text: &str, config: &FarmConfig) -> Result<Self, MapError> {
        let grid = Grid::parse(text, &config.tiles)?;
        Ok(Self::new(grid, config))
    }

    /// Create a farm from a map description file.
    pub fn from_map_file<P: AsRef<Path>>(path: P, config: &FarmConfig) -> FarmResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let model = Self::from_map_str(&text, config)?;

        let dims = model.dimensions();
        info!("Loaded {}x{} map from {}", dims.rows, dims.cols, path.display());
        Ok(model)
    }

    /// The ground tiles.
    #[must_use]
    pub fn map(&self) -> &Grid {
        &self.grid
    }

    /// Every plant, keyed by position.
    #[must_use]
    pub fn plants(&self) -> &AHashMap<GridPos, Plant> {
        &self.plants
    }

    /// The plant at a position, if any.
    #[must_use]
    pub fn plant_at(&self, pos: GridPos) -> Option<&Plant> {
        self.plants.get(&pos)
    }

    /// Grid size.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.grid.dimensions()
    }

    /// Current day, starting at 1.
    #[must_use]
    pub const fn days_elapsed(&self) -> u32 {
        self.days_elapsed
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable access to the player, for inventory and shop actions.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Energy cost table in use.
    #[must_use]
    pub const fn energy_costs(&self) -> EnergyCosts {
        self.costs
    }

    /// Move the player one cell.
    pub fn move_player(&mut self, direction: Direction) -> ActionResult<()> {
        let dims = self.dimensions();
        self.player.move_in(direction, dims, self.costs.movement)?;
        Ok(())
    }

    /// Till untilled soil.
    pub fn till_soil(&mut self, pos: GridPos) -> ActionResult<()> {
        self.grid.can_till(pos)?;
        self.player.spend_energy(self.costs.till)?;
        self.grid.till(pos)?;

        debug!(%pos, "soil tilled");
        self.debug_check();
        Ok(())
    }

    /// Untill tilled soil. A plant growing there is destroyed, or the action
    /// is refused, depending on the configured [`UntillPolicy`].
    pub fn untill_soil(&mut self, pos: GridPos) -> ActionResult<()> {
        self.grid.can_untill(pos)?;
        if self.untill_policy == UntillPolicy::Reject && self.plants.contains_key(&pos) {
            return Err(ActionError::Occupied(pos));
        }
        self.player.spend_energy(self.costs.untill)?;
        self.grid.untill(pos)?;

        if let Some(plant) = self.plants.remove(&pos) {
            debug!(%pos, variant = ?plant.variant(), "plant destroyed by untilling");
        }
        debug!(%pos, "soil untilled");
        self.debug_check();
        Ok(())
    }

    /// Put a plant in tilled soil.
    ///
    /// Seeds are not taken from the inventory here; the caller removes one
    /// after this succeeds.
    pub fn add_plant(&mut self, pos: GridPos, plant: Plant) -> ActionResult<()> {
        let kind = self.grid.tile_at(pos)?;
        if kind != TileKind::TilledSoil {
            return Err(ActionError::NotTilled { pos, kind });
        }
        if self.plants.contains_key(&pos) {
            return Err(ActionError::Occupied(pos));
        }
        self.player.spend_energy(self.costs.plant)?;

        debug!(%pos, variant = ?plant.variant(), "planted");
        self.plants.insert(pos, plant);
        self.debug_check();
        Ok(())
    }

    /// Pull up the plant at a position, with no yield.
    pub fn remove_plant(&mut self, pos: GridPos) -> ActionResult<Plant> {
        if !self.plants.contains_key(&pos) {
            return Err(ActionError::NoPlant(pos));
        }
        self.player.spend_energy(self.costs.remove)?;

        let plant = self.plants.remove(&pos).ok_or(ActionError::NoPlant(pos))?;
        debug!(%pos, variant = ?plant.variant(), "plant removed");
        self.debug_check();
        Ok(plant)
    }

    /// Harvest the plant at a position.
    ///
    /// Returns `None` if there is no plant, it is not ready, or the player is
    /// too tired. Single-harvest plants are removed on success.
    pub fn harvest_plant(&mut self, pos: GridPos) -> Option<Harvest> {
        if !self.plants.get(&pos)?.is_harvestable() {
            return None;
        }
        self.player.spend_energy(self.costs.harvest).ok()?;

        let harvest = self.plants.get_mut(&pos)?.harvest()?;
        if !harvest.will_regrow {
            self.plants.remove(&pos);
        }

        debug!(%pos, item = %harvest.item, amount = harvest.amount, "harvested");
        self.debug_check();
        Some(harvest)
    }

    /// Advance to the next day: every plant grows one stage and the player's
    /// energy is restored to full.
    pub fn new_day(&mut self) {
        self.days_elapsed += 1;
        for plant in self.plants.values_mut() {
            plant.grow();
        }
        self.player.restore_energy();

        info!(day = self.days_elapsed, plants = self.plants.len(), "new day");
        self.debug_check();
    }

    /// Check that every plant stands on tilled soil.
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        self.plants
            .keys()
            .all(|&pos| self.grid.tile_at(pos) == Ok(TileKind::TilledSoil))
            && self.grid.dimensions().contains(self.player.position())
            && self.player.energy() <= self.player.max_energy()
    }

    fn debug_check(&self) {
        debug_assert!(self.invariants_hold(), "farm invariants violated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plants::CropVariant;
    use proptest::prelude::*;

    const MAP: &str = "GUUUU\nUUUUU\nUUGUU\nUUUUU\nUUUUS\n";

    fn config() -> FarmConfig {
        FarmConfig {
            starting_inventory: Default::default(),
            ..FarmConfig::default()
        }
    }

    fn farm() -> FarmModel {
        FarmModel::from_map_str(MAP, &config()).expect("valid map")
    }

    fn farm_with_policy(policy: UntillPolicy) -> FarmModel {
        let config = FarmConfig {
            untill_policy: policy,
            ..config()
        };
        FarmModel::from_map_str(MAP, &config).expect("valid map")
    }

    fn tile(model: &FarmModel, pos: GridPos) -> TileKind {
        model.map().tile_at(pos).expect("in bounds")
    }

    #[test]
    fn test_fresh_model() {
        let model = farm();
        assert_eq!(model.dimensions(), Dimensions::new(5, 5));
        assert_eq!(model.days_elapsed(), 1);
        assert_eq!(model.player().position(), GridPos::new(0, 0));
        assert_eq!(model.player().energy(), 100);
        assert_eq!(model.player().money(), 0);
        assert!(model.plants().is_empty());
    }

    #[test]
    fn test_potato_scenario() {
        let mut model = farm();
        let grass = GridPos::new(0, 0);
        let soil = GridPos::new(0, 1);

        assert!(model.till_soil(grass).is_err());
        assert_eq!(tile(&model, grass), TileKind::Grass);

        assert!(model.till_soil(soil).is_ok());
        assert_eq!(tile(&model, soil), TileKind::TilledSoil);

        assert!(model.add_plant(soil, Plant::potato()).is_ok());
        assert_eq!(model.harvest_plant(soil), None);

        for _ in 0..5 {
            model.new_day();
        }
        let harvest = model.harvest_plant(soil).expect("ripe potato");
        assert_eq!(harvest.into_item(), ("Potato".to_string(), 1));
        assert!(!model.plants().contains_key(&soil));
        assert_eq!(model.days_elapsed(), 6);
    }

    #[test]
    fn test_failed_till_costs_nothing() {
        let mut model = farm();
        assert!(matches!(
            model.till_soil(GridPos::new(0, 0)),
            Err(ActionError::Tile(TileError::NotTillable(TileKind::Grass)))
        ));
        assert!(matches!(
            model.till_soil(GridPos::new(9, 9)),
            Err(ActionError::Tile(TileError::OutOfBounds { .. }))
        ));
        assert_eq!(model.player().energy(), 100);
    }

    #[test]
    fn test_till_spends_energy() {
        let mut model = farm();
        model.till_soil(GridPos::new(1, 1)).expect("soil");
        assert_eq!(model.player().energy(), 100 - model.energy_costs().till);
    }

    #[test]
    fn test_till_then_untill_restores_soil() {
        let mut model = farm();
        let pos = GridPos::new(3, 3);

        model.till_soil(pos).expect("till");
        assert!(model.till_soil(pos).is_err());
        model.untill_soil(pos).expect("untill");
        assert_eq!(tile(&model, pos), TileKind::Soil);
        assert!(model.untill_soil(pos).is_err());
    }

    #[test]
    fn test_add_plant_needs_tilled_soil() {
        let mut model = farm();
        let pos = GridPos::new(1, 0);

        assert_eq!(
            model.add_plant(pos, Plant::kale()),
            Err(ActionError::NotTilled {
                pos,
                kind: TileKind::Soil
            })
        );
        assert!(model.plants().is_empty());
    }

    #[test]
    fn test_add_plant_rejects_occupied() {
        let mut model = farm();
        let pos = GridPos::new(4, 4);

        model.add_plant(pos, Plant::kale()).expect("pre-tilled");
        assert_eq!(model.add_plant(pos, Plant::berry()), Err(ActionError::Occupied(pos)));
        assert_eq!(model.plant_at(pos).map(Plant::variant), Some(CropVariant::Kale));
    }

    #[test]
    fn test_add_plant_leaves_inventory_alone() {
        let mut model = farm();
        model.player_mut().add_item(("Kale Seed", 1));
        model.add_plant(GridPos::new(4, 4), Plant::kale()).expect("planted");
        assert_eq!(model.player().inventory().count("Kale Seed"), 1);
    }

    #[test]
    fn test_untill_destroys_plant() {
        let mut model = farm_with_policy(UntillPolicy::DestroyPlant);
        let pos = GridPos::new(4, 4);

        model.add_plant(pos, Plant::potato()).expect("planted");
        model.untill_soil(pos).expect("untill");
        assert!(model.plant_at(pos).is_none());
        assert!(model.invariants_hold());
    }

    #[test]
    fn test_untill_rejected_under_plant() {
        let mut model = farm_with_policy(UntillPolicy::Reject);
        let pos = GridPos::new(4, 4);

        model.add_plant(pos, Plant::potato()).expect("planted");
        let energy = model.player().energy();
        assert_eq!(model.untill_soil(pos), Err(ActionError::Occupied(pos)));
        assert!(model.plant_at(pos).is_some());
        assert_eq!(tile(&model, pos), TileKind::TilledSoil);
        assert_eq!(model.player().energy(), energy);
    }

    #[test]
    fn test_remove_plant() {
        let mut model = farm();
        let pos = GridPos::new(4, 4);

        assert_eq!(model.remove_plant(pos), Err(ActionError::NoPlant(pos)));
        model.add_plant(pos, Plant::berry()).expect("planted");
        let removed = model.remove_plant(pos).expect("removed");
        assert_eq!(removed.variant(), CropVariant::Berry);
        assert!(model.plants().is_empty());
        assert_eq!(tile(&model, pos), TileKind::TilledSoil);
    }

    #[test]
    fn test_harvest_immature_all_variants() {
        for variant in CropVariant::ALL {
            let mut model = farm();
            let pos = GridPos::new(4, 4);
            model.add_plant(pos, Plant::new(variant)).expect("planted");

            for _ in 0..variant.definition().max_stage {
                assert_eq!(model.harvest_plant(pos), None);
                model.new_day();
            }
            assert!(model.harvest_plant(pos).is_some(), "{variant:?} ripe");
        }
    }

    #[test]
    fn test_berry_regrows_in_place() {
        let mut model = farm();
        let pos = GridPos::new(4, 4);
        model.add_plant(pos, Plant::berry()).expect("planted");
        for _ in 0..6 {
            model.new_day();
        }

        let harvest = model.harvest_plant(pos).expect("ripe berry");
        assert_eq!(harvest.item, "Berry");
        let plant = model.plant_at(pos).expect("still growing");
        assert_eq!(Some(plant.stage()), CropVariant::Berry.definition().regrowth_stage);
    }

    #[test]
    fn test_harvest_needs_energy() {
        let mut model = farm();
        let pos = GridPos::new(4, 4);
        model.add_plant(pos, Plant::kale()).expect("planted");
        for _ in 0..4 {
            model.new_day();
        }
        let energy = model.player().energy();
        model.player_mut().spend_energy(energy).expect("drain");

        assert_eq!(model.harvest_plant(pos), None);
        assert!(model.plant_at(pos).expect("untouched").is_harvestable());
    }

    #[test]
    fn test_new_day_resets_energy() {
        let mut model = farm();
        model.player_mut().spend_energy(97).expect("drain");
        assert_eq!(model.player().energy(), 3);

        model.new_day();
        assert_eq!(model.player().energy(), 100);
        assert_eq!(model.days_elapsed(), 2);
    }

    #[test]
    fn test_new_day_grows_every_plant_once() {
        let mut model = farm();
        model.till_soil(GridPos::new(1, 1)).expect("till");
        model.add_plant(GridPos::new(1, 1), Plant::kale()).expect("kale");
        model.add_plant(GridPos::new(4, 4), Plant::potato()).expect("potato");

        model.new_day();
        assert!(model.plants().values().all(|p| p.stage() == 1));

        for _ in 0..10 {
            model.new_day();
        }
        assert!(model.plants().values().all(|p| p.stage() == p.max_stage()));
    }

    #[test]
    fn test_move_player_off_grid() {
        let mut model = farm();
        assert!(matches!(
            model.move_player(Direction::Left),
            Err(ActionError::Player(PlayerError::Blocked { .. }))
        ));
        assert_eq!(model.player().position(), GridPos::new(0, 0));
        assert_eq!(model.player().energy(), 100);

        model.move_player(Direction::Down).expect("inside");
        assert_eq!(model.player().position(), GridPos::new(1, 0));
        assert_eq!(model.player().direction(), Direction::Down);
    }

    #[test]
    fn test_from_map_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("map.txt");
        fs::write(&path, MAP).expect("write map");

        let model = FarmModel::from_map_file(&path, &config()).expect("load");
        assert_eq!(model.dimensions(), Dimensions::new(5, 5));

        fs::write(&path, "GG\nG\n").expect("write map");
        assert!(matches!(
            FarmModel::from_map_file(&path, &config()),
            Err(farm_common::FarmError::Map(MapError::RaggedRow { .. }))
        ));
        assert!(matches!(
            FarmModel::from_map_file(dir.path().join("missing.txt"), &config()),
            Err(farm_common::FarmError::Io(_))
        ));
    }

    #[test]
    fn test_shipped_map_loads() {
        let model = FarmModel::from_map_str(include_str!("../../../maps/map1.txt"), &config())
            .expect("shipped map");
        assert_eq!(model.dimensions(), Dimensions::new(10, 10));
        assert_eq!(tile(&model, GridPos::new(0, 0)), TileKind::Grass);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Move(usize),
        Till(usize, usize),
        Untill(usize, usize),
        Plant(usize, usize, usize),
        Remove(usize, usize),
        Harvest(usize, usize),
        NewDay,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..4).prop_map(Op::Move),
            (0usize..6, 0usize..6).prop_map(|(r, c)| Op::Till(r, c)),
            (0usize..6, 0usize..6).prop_map(|(r, c)| Op::Untill(r, c)),
            (0usize..6, 0usize..6, 0usize..3).prop_map(|(r, c, v)| Op::Plant(r, c, v)),
            (0usize..6, 0usize..6).prop_map(|(r, c)| Op::Remove(r, c)),
            (0usize..6, 0usize..6).prop_map(|(r, c)| Op::Harvest(r, c)),
            Just(Op::NewDay),
        ]
    }

    proptest! {
        #[test]
        fn prop_invariants_survive_any_sequence(ops in prop::collection::vec(op(), 0..200)) {
            let mut model = farm();
            for op in ops {
                let day = model.days_elapsed();
                match op {
                    Op::Move(d) => { let _ = model.move_player(Direction::ALL[d]); },
                    Op::Till(r, c) => { let _ = model.till_soil(GridPos::new(r, c)); },
                    Op::Untill(r, c) => { let _ = model.untill_soil(GridPos::new(r, c)); },
                    Op::Plant(r, c, v) => {
                        let _ = model.add_plant(GridPos::new(r, c), Plant::new(CropVariant::ALL[v]));
                    },
                    Op::Remove(r, c) => { let _ = model.remove_plant(GridPos::new(r, c)); },
                    Op::Harvest(r, c) => { let _ = model.harvest_plant(GridPos::new(r, c)); },
                    Op::NewDay => {
                        model.new_day();
                        prop_assert_eq!(model.days_elapsed(), day + 1);
                        prop_assert_eq!(model.player().energy(), model.player().max_energy());
                    },
                }
                prop_assert!(model.invariants_hold());
            }
        }

        #[test]
        fn prop_failed_actions_change_nothing(r in 0usize..6, c in 0usize..6) {
            let mut model = farm();
            let pos = GridPos::new(r, c);
            let before_energy = model.player().energy();
            let before_map = model.map().clone();

            if model.add_plant(pos, Plant::potato()).is_err() {
                prop_assert_eq!(model.map(), &before_map);
                prop_assert!(model.plants().is_empty());
                prop_assert_eq!(model.player().energy(), before_energy);
            }
            if model.harvest_plant(pos).is_none() {
                prop_assert_eq!(model.map(), &before_map);
            }
        }
    }
}
