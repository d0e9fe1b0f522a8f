//! Crop growth.
//!
//! This module provides the plant lifecycle:
//! - Crop variants and their definition tables
//! - Daily growth that saturates at the final stage
//! - Harvesting, with regrowth for multi-harvest crops

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crop species. Fixed for the lifetime of a plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropVariant {
    /// Potato, single harvest.
    Potato,
    /// Kale, single harvest.
    Kale,
    /// Berry bush, regrows after harvest.
    Berry,
}

impl CropVariant {
    /// All crop variants.
    pub const ALL: [Self; 3] = [Self::Potato, Self::Kale, Self::Berry];

    /// Get the growth and yield table for this variant.
    #[must_use]
    pub fn definition(self) -> &'static CropDefinition {
        static DEFINITIONS: OnceLock<[CropDefinition; 3]> = OnceLock::new();

        let table = DEFINITIONS.get_or_init(|| Self::ALL.map(Self::build_definition));
        &table[self as usize]
    }

    fn build_definition(self) -> CropDefinition {
        match self {
            Self::Potato => CropDefinition::builder(self, "Potato")
                .max_stage(5)
                .harvest("Potato", 1)
                .seed("Potato Seed")
                .build(),
            Self::Kale => CropDefinition::builder(self, "Kale")
                .max_stage(4)
                .harvest("Kale", 1)
                .seed("Kale Seed")
                .build(),
            Self::Berry => CropDefinition::builder(self, "Berry")
                .max_stage(6)
                .harvest("Berry", 1)
                .seed("Berry Seed")
                .regrows_to(4)
                .build(),
        }
    }

    /// Find the variant grown from a seed item.
    #[must_use]
    pub fn from_seed(item: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.definition().seed_item == item)
    }
}

/// Growth and yield table for a crop variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropDefinition {
    /// Variant this table describes.
    pub variant: CropVariant,
    /// Display name.
    pub name: String,
    /// Index of the final, harvestable stage.
    pub max_stage: u8,
    /// Item produced by a harvest.
    pub harvest_item: String,
    /// Amount produced per harvest.
    pub harvest_amount: u32,
    /// Seed item that grows into this crop.
    pub seed_item: String,
    /// Stage the plant returns to after a harvest, if it regrows.
    pub regrowth_stage: Option<u8>,
}

impl CropDefinition {
    /// Create a new crop definition builder.
    #[must_use]
    pub fn builder(variant: CropVariant, name: &str) -> CropDefinitionBuilder {
        CropDefinitionBuilder::new(variant, name)
    }

    /// Whether the plant survives a harvest.
    #[must_use]
    pub fn is_multi_harvest(&self) -> bool {
        self.regrowth_stage.is_some()
    }

    /// Sprite name shown for a stage, e.g. `potato/stage_1` for stage 0.
    #[must_use]
    pub fn sprite_name(&self, stage: u8) -> String {
        format!("{}/stage_{}", self.name.to_lowercase(), stage.min(self.max_stage) + 1)
    }
}

/// Builder for crop definitions.
#[derive(Debug)]
pub struct CropDefinitionBuilder {
    def: CropDefinition,
}

impl CropDefinitionBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(variant: CropVariant, name: &str) -> Self {
        Self {
            def: CropDefinition {
                variant,
                name: name.to_string(),
                max_stage: 3,
                harvest_item: name.to_string(),
                harvest_amount: 1,
                seed_item: format!("{name} Seed"),
                regrowth_stage: None,
            },
        }
    }

    /// Set the final stage index.
    #[must_use]
    pub fn max_stage(mut self, max_stage: u8) -> Self {
        self.def.max_stage = max_stage;
        self
    }

    /// Set harvest output.
    #[must_use]
    pub fn harvest(mut self, item: &str, amount: u32) -> Self {
        self.def.harvest_item = item.to_string();
        self.def.harvest_amount = amount;
        self
    }

    /// Set seed item.
    #[must_use]
    pub fn seed(mut self, item: &str) -> Self {
        self.def.seed_item = item.to_string();
        self
    }

    /// Make the crop regrow to `stage` after harvest.
    #[must_use]
    pub fn regrows_to(mut self, stage: u8) -> Self {
        self.def.regrowth_stage = Some(stage);
        self
    }

    /// Build the crop definition.
    ///
    /// A regrowth stage at or past the final stage is pulled back one below it.
    #[must_use]
    pub fn build(mut self) -> CropDefinition {
        if let Some(stage) = self.def.regrowth_stage.as_mut() {
            *stage = (*stage).min(self.def.max_stage.saturating_sub(1));
        }
        self.def
    }
}

/// Items produced by a successful harvest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Harvest {
    /// Item harvested.
    pub item: String,
    /// Amount harvested.
    pub amount: u32,
    /// Whether the plant stays in the ground.
    pub will_regrow: bool,
}

impl Harvest {
    /// The `(item, amount)` pair, the shape inventories accept.
    #[must_use]
    pub fn into_item(self) -> (String, u32) {
        (self.item, self.amount)
    }
}

/// Plant data that does not fit its crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlantError {
    /// Stage past the crop's final stage
    #[error("{variant:?} has no stage {stage} (final stage is {max_stage})")]
    StageOutOfRange {
        /// Crop variant
        variant: CropVariant,
        /// Requested stage
        stage: u8,
        /// Final stage of the variant
        max_stage: u8,
    },
}

/// A planted crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PlantRecord")]
pub struct Plant {
    variant: CropVariant,
    stage: u8,
}

/// Unchecked plant fields as read from data.
#[derive(Deserialize)]
struct PlantRecord {
    variant: CropVariant,
    #[serde(default)]
    stage: u8,
}

impl TryFrom<PlantRecord> for Plant {
    type Error = PlantError;

    fn try_from(record: PlantRecord) -> Result<Self, Self::Error> {
        Self::at_stage(record.variant, record.stage)
    }
}

impl Plant {
    /// Create a freshly planted seed.
    #[must_use]
    pub fn new(variant: CropVariant) -> Self {
        Self { variant, stage: 0 }
    }

    /// Create a plant already grown to `stage`.
    pub fn at_stage(variant: CropVariant, stage: u8) -> Result<Self, PlantError> {
        let max_stage = variant.definition().max_stage;
        if stage > max_stage {
            return Err(PlantError::StageOutOfRange {
                variant,
                stage,
                max_stage,
            });
        }
        Ok(Self { variant, stage })
    }

    /// Shorthand for a new potato plant.
    #[must_use]
    pub fn potato() -> Self {
        Self::new(CropVariant::Potato)
    }

    /// Shorthand for a new kale plant.
    #[must_use]
    pub fn kale() -> Self {
        Self::new(CropVariant::Kale)
    }

    /// Shorthand for a new berry bush.
    #[must_use]
    pub fn berry() -> Self {
        Self::new(CropVariant::Berry)
    }

    /// Crop variant.
    #[must_use]
    pub const fn variant(&self) -> CropVariant {
        self.variant
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> u8 {
        self.stage
    }

    /// Final stage for this plant's variant.
    #[must_use]
    pub fn max_stage(&self) -> u8 {
        self.variant.definition().max_stage
    }

    /// Display name of the crop.
    #[must_use]
    pub fn name(&self) -> String {
        self.variant.definition().name.clone()
    }

    /// Sprite name for the current stage.
    #[must_use]
    pub fn sprite_name(&self) -> String {
        self.variant.definition().sprite_name(self.stage)
    }

    /// Check if this plant can be harvested.
    #[must_use]
    pub fn is_harvestable(&self) -> bool {
        self.stage == self.max_stage()
    }

    /// Advance one growth stage, stopping at the final stage.
    pub fn grow(&mut self) {
        self.stage = self.stage.saturating_add(1).min(self.max_stage());
    }

    /// Try to harvest.
    ///
    /// Returns `None` and leaves the plant alone unless it is at its final
    /// stage. Multi-harvest plants drop back to their regrowth stage; for
    /// single-harvest plants the caller removes the plant.
    pub fn harvest(&mut self) -> Option<Harvest> {
        let def = self.variant.definition();
        if self.stage != def.max_stage {
            return None;
        }

        if let Some(stage) = def.regrowth_stage {
            self.stage = stage;
        }

        Some(Harvest {
            item: def.harvest_item.clone(),
            amount: def.harvest_amount,
            will_regrow: def.regrowth_stage.is_some(),
        })
    }
}
