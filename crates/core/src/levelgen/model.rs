//! Public data models for generated levels and the checks a level must pass.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Pos, TileKind};

use super::config::GenerationConfig;
use super::lattice::Lattice;
use super::validator::flood_fill_reaches;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    pub seed: u64,
    pub lattice: Lattice,
    pub coins: BTreeSet<Pos>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The carved maze reached the finish on its own.
    Carved { path_len: usize },
    /// Validation failed and the corridor repairer ran.
    Repaired { search_failed: bool, repair_steps: usize },
}

impl GenerationOutcome {
    pub fn was_repaired(self) -> bool {
        matches!(self, Self::Repaired { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedLevel {
    pub level: u32,
    pub state: LevelState,
    pub outcome: GenerationOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelStateError {
    #[error("level ids start at 1")]
    ZeroLevel,
    #[error("lattice is {found_width}x{found_height}, expected {width}x{height}")]
    DimensionMismatch { width: usize, height: usize, found_width: usize, found_height: usize },
    #[error("lattice holds {0} finish tiles, expected exactly one")]
    FinishCount(usize),
    #[error("finish tile is not at {0}")]
    FinishMisplaced(Pos),
    #[error("start cell {0} is not open")]
    StartBlocked(Pos),
    #[error("finish is unreachable from the start")]
    FinishUnreachable,
    #[error("coin at {0} is not on an open tile")]
    CoinOffOpenTile(Pos),
    #[error("coin at {0} sits on the start or finish")]
    CoinOnEndpoint(Pos),
}

impl LevelState {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = self.lattice.canonical_bytes();
        bytes.extend(self.seed.to_le_bytes());
        bytes.extend((self.coins.len() as u32).to_le_bytes());
        for coin in &self.coins {
            bytes.extend(coin.y.to_le_bytes());
            bytes.extend(coin.x.to_le_bytes());
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    /// Checks every property a playable level guarantees, in order of cost.
    pub fn check_invariants(&self, config: &GenerationConfig) -> Result<(), LevelStateError> {
        let lattice = &self.lattice;
        if !lattice.is_well_formed()
            || lattice.width() != config.width
            || lattice.height() != config.height
        {
            return Err(LevelStateError::DimensionMismatch {
                width: config.width,
                height: config.height,
                found_width: lattice.width(),
                found_height: lattice.height(),
            });
        }

        let finish_count = lattice.count(TileKind::Finish);
        if finish_count != 1 {
            return Err(LevelStateError::FinishCount(finish_count));
        }
        if lattice.tile_at(config.finish) != TileKind::Finish {
            return Err(LevelStateError::FinishMisplaced(config.finish));
        }
        if lattice.tile_at(config.start) != TileKind::Open {
            return Err(LevelStateError::StartBlocked(config.start));
        }

        for &coin in &self.coins {
            if coin == config.start || coin == config.finish {
                return Err(LevelStateError::CoinOnEndpoint(coin));
            }
            if lattice.tile_at(coin) != TileKind::Open {
                return Err(LevelStateError::CoinOffOpenTile(coin));
            }
        }

        if !flood_fill_reaches(lattice, config.start, config.finish) {
            return Err(LevelStateError::FinishUnreachable);
        }
        Ok(())
    }
}
