//! Farm grid: ground tiles and soil tilling.
//!
//! The grid is fixed in size when built from a map description. Only the
//! Soil <-> TilledSoil transition ever changes a cell afterwards.

use farm_common::{Dimensions, GridPos, MapError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

/// Terrain classification of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Grass, never tillable.
    Grass,
    /// Untilled soil.
    Soil,
    /// Tilled soil, ready for planting.
    TilledSoil,
}

impl TileKind {
    /// Get the display name of this tile kind.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Grass => "Grass",
            Self::Soil => "Soil",
            Self::TilledSoil => "Tilled Soil",
        }
    }
}

/// Single-character codes used in map descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileCodes {
    /// Code for grass
    pub grass: char,
    /// Code for untilled soil
    pub soil: char,
    /// Code for tilled soil
    pub tilled: char,
}

impl Default for TileCodes {
    fn default() -> Self {
        Self {
            grass: 'G',
            soil: 'U',
            tilled: 'S',
        }
    }
}

impl TileCodes {
    /// Look up the tile kind for a code.
    #[must_use]
    pub fn kind(&self, code: char) -> Option<TileKind> {
        if code == self.grass {
            Some(TileKind::Grass)
        } else if code == self.soil {
            Some(TileKind::Soil)
        } else if code == self.tilled {
            Some(TileKind::TilledSoil)
        } else {
            None
        }
    }

    /// The code written for a tile kind.
    #[must_use]
    pub fn code(&self, kind: TileKind) -> char {
        match kind {
            TileKind::Grass => self.grass,
            TileKind::Soil => self.soil,
            TileKind::TilledSoil => self.tilled,
        }
    }
}

/// Why a tile operation did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TileError {
    /// Position outside the grid
    #[error("position {pos} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        /// Requested position
        pos: GridPos,
        /// Grid rows
        rows: usize,
        /// Grid columns
        cols: usize,
    },
    /// Only untilled soil can be tilled
    #[error("cannot till {}", .0.display_name())]
    NotTillable(TileKind),
    /// Only tilled soil can be untilled
    #[error("cannot untill {}", .0.display_name())]
    NotTilled(TileKind),
}

/// Result type for tile operations.
pub type TileResult<T> = Result<T, TileError>;

/// The farm's ground tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Rows of tiles, all the same length
    ground: Vec<Vec<TileKind>>,
    /// Cached grid size
    dims: Dimensions,
}

impl Grid {
    /// Build a grid from rows of tiles.
    pub fn from_rows(ground: Vec<Vec<TileKind>>) -> Result<Self, MapError> {
        let expected = ground.first().map(Vec::len).ok_or(MapError::Empty)?;
        if expected == 0 {
            return Err(MapError::Empty);
        }
        if let Some((row, actual)) = ground
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(MapError::RaggedRow {
                row,
                expected,
                actual,
            });
        }

        let dims = Dimensions::new(ground.len(), expected);
        Ok(Self { ground, dims })
    }

    /// Parse a map description: one line per row, one code per tile.
    ///
    /// Trailing blank lines are ignored.
    pub fn parse(text: &str, codes: &TileCodes) -> Result<Self, MapError> {
        let lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        let used = lines.iter().rposition(|l| !l.is_empty()).map_or(0, |i| i + 1);

        let mut ground = Vec::with_capacity(used);
        for (row, line) in lines[..used].iter().enumerate() {
            let tiles = line
                .chars()
                .enumerate()
                .map(|(col, code)| {
                    codes
                        .kind(code)
                        .ok_or(MapError::UnknownTile { code, row, col })
                })
                .collect::<Result<Vec<_>, _>>()?;
            ground.push(tiles);
        }

        Self::from_rows(ground)
    }

    /// Grid size.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Render the grid back to map codes, one string per row.
    #[must_use]
    pub fn to_codes(&self, codes: &TileCodes) -> Vec<String> {
        self.ground
            .iter()
            .map(|row| row.iter().map(|&kind| codes.code(kind)).collect())
            .collect()
    }

    fn check(&self, pos: GridPos) -> TileResult<()> {
        if self.dims.contains(pos) {
            Ok(())
        } else {
            Err(TileError::OutOfBounds {
                pos,
                rows: self.dims.rows,
                cols: self.dims.cols,
            })
        }
    }

    /// Tile kind at a position.
    pub fn tile_at(&self, pos: GridPos) -> TileResult<TileKind> {
        self.check(pos)?;
        Ok(self.ground[pos.row][pos.col])
    }

    /// Check that `pos` could be tilled right now, without changing it.
    pub fn can_till(&self, pos: GridPos) -> TileResult<()> {
        match self.tile_at(pos)? {
            TileKind::Soil => Ok(()),
            other => Err(TileError::NotTillable(other)),
        }
    }

    /// Check that `pos` could be untilled right now, without changing it.
    pub fn can_untill(&self, pos: GridPos) -> TileResult<()> {
        match self.tile_at(pos)? {
            TileKind::TilledSoil => Ok(()),
            other => Err(TileError::NotTilled(other)),
        }
    }

    /// Till untilled soil.
    pub fn till(&mut self, pos: GridPos) -> TileResult<()> {
        self.can_till(pos)?;
        self.ground[pos.row][pos.col] = TileKind::TilledSoil;
        trace!(%pos, "tilled");
        Ok(())
    }

    /// Untill tilled soil.
    pub fn untill(&mut self, pos: GridPos) -> TileResult<()> {
        self.can_untill(pos)?;
        self.ground[pos.row][pos.col] = TileKind::Soil;
        trace!(%pos, "untilled");
        Ok(())
    }

    /// Iterate over every position and its tile, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, TileKind)> + '_ {
        self.ground.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, &kind)| (GridPos::new(r, c), kind))
        })
    }
}
