//! Lattice dimensions and fixed endpoints, validated before any generation runs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Pos;

pub const DEFAULT_WIDTH: usize = 10;
pub const DEFAULT_HEIGHT: usize = 15;
/// Largest accepted side length. Keeps coordinates inside `i32` and the tile count small.
pub const MAX_DIMENSION: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Finish,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("lattice dimensions must be positive, got {width}x{height}")]
    EmptyLattice { width: usize, height: usize },
    #[error("lattice of {width}x{height} exceeds the {max}x{max} limit")]
    Oversized { width: usize, height: usize, max: usize },
    #[error("{endpoint:?} cell {pos} is not strictly inside a {width}x{height} lattice")]
    NotInterior { endpoint: Endpoint, pos: Pos, width: usize, height: usize },
    #[error("start and finish share the cell {pos}")]
    CoincidentEndpoints { pos: Pos },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ConfigTable")]
pub struct GenerationConfig {
    pub width: usize,
    pub height: usize,
    pub start: Pos,
    pub finish: Pos,
}

/// Partial form accepted from config files. A missing start follows the parsed dimensions.
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigTable {
    width: Option<usize>,
    height: Option<usize>,
    start: Option<Pos>,
    finish: Option<Pos>,
}

impl From<ConfigTable> for GenerationConfig {
    fn from(table: ConfigTable) -> Self {
        let base = Self::with_dimensions(
            table.width.unwrap_or(DEFAULT_WIDTH),
            table.height.unwrap_or(DEFAULT_HEIGHT),
        );
        Self {
            start: table.start.unwrap_or(base.start),
            finish: table.finish.unwrap_or(base.finish),
            ..base
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::with_dimensions(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl GenerationConfig {
    /// Start in the bottom-right interior corner, finish at `(1, 1)`.
    pub fn with_dimensions(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            start: Pos { y: saturating_coord(height) - 2, x: saturating_coord(width) - 2 },
            finish: Pos { y: 1, x: 1 },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyLattice { width: self.width, height: self.height });
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(ConfigError::Oversized {
                width: self.width,
                height: self.height,
                max: MAX_DIMENSION,
            });
        }
        for (endpoint, pos) in [(Endpoint::Start, self.start), (Endpoint::Finish, self.finish)] {
            if !self.is_interior(pos) {
                return Err(ConfigError::NotInterior {
                    endpoint,
                    pos,
                    width: self.width,
                    height: self.height,
                });
            }
        }
        if self.start == self.finish {
            return Err(ConfigError::CoincidentEndpoints { pos: self.start });
        }
        Ok(())
    }

    pub fn is_interior(&self, pos: Pos) -> bool {
        pos.x > 0
            && pos.y > 0
            && (pos.x as usize) + 1 < self.width
            && (pos.y as usize) + 1 < self.height
    }
}

fn saturating_coord(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}
