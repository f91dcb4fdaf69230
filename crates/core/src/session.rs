//! Gameplay context: the current level copy, the player cell, coin totals and unlocks.
//! This module exists so gameplay never mutates cached level state directly.
//! It does not own rendering, input polling or the save-file location.

use std::cmp;

use log::info;
use thiserror::Error;

use crate::cache::LevelStateCache;
use crate::levelgen::{ConfigError, GenerationConfig, LevelGenerator, LevelState, LevelStateError};
use crate::progress_file::{PROGRESS_FORMAT_VERSION, ProgressFile};
use crate::types::{Direction, Pos, TileKind};

pub const TOTAL_LEVELS: u32 = 12;
pub const FIRST_LEVEL: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("level {level} does not exist, levels run from 1 to {total}")]
    UnknownLevel { level: u32, total: u32 },
    #[error("level {level} is locked, the highest unlocked level is {unlocked}")]
    LevelLocked { level: u32, unlocked: u32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("saved level {level} was rejected: {source}")]
    Restore {
        level: u32,
        #[source]
        source: LevelStateError,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    LevelStarted { level: u32 },
    CoinCollected { level: u32, pos: Pos },
    LevelCompleted { level: u32 },
    LevelUnlocked { level: u32 },
    RunCompleted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JumpOutcome {
    pub from: Pos,
    pub to: Pos,
    pub coins_collected: u32,
    pub completed_level: Option<u32>,
}

impl JumpOutcome {
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug)]
pub struct PlaySession {
    cache: LevelStateCache,
    total_levels: u32,
    current_level: u32,
    level: LevelState,
    player: Pos,
    total_coins: u64,
    max_level_reached: u32,
    run_completed: bool,
    log: Vec<SessionEvent>,
}

impl PlaySession {
    pub fn new(generator: LevelGenerator, total_levels: u32) -> Self {
        Self::resume(LevelStateCache::new(generator), total_levels, 0, FIRST_LEVEL)
    }

    /// Rehydrates every saved level before the first one is requested, then resumes at the
    /// highest unlocked level. Saved ids outside `1..=total_levels` are rejected.
    pub fn from_progress(
        config: GenerationConfig,
        total_levels: u32,
        progress: ProgressFile,
    ) -> Result<Self, SessionError> {
        let mut cache = LevelStateCache::new(LevelGenerator::new(config, progress.run_seed)?);
        let total = cmp::max(total_levels, FIRST_LEVEL);
        for (level, state) in progress.levels {
            if !(FIRST_LEVEL..=total).contains(&level) {
                return Err(SessionError::UnknownLevel { level, total });
            }
            cache.restore(level, state).map_err(|source| SessionError::Restore { level, source })?;
        }
        Ok(Self::resume(cache, total_levels, progress.total_coins, progress.max_level_reached))
    }

    fn resume(
        mut cache: LevelStateCache,
        total_levels: u32,
        total_coins: u64,
        max_level_reached: u32,
    ) -> Self {
        let total_levels = cmp::max(total_levels, FIRST_LEVEL);
        let max_level_reached = max_level_reached.clamp(FIRST_LEVEL, total_levels);
        let level = cache.get(max_level_reached);
        let player = cache.generator().config().start;
        let mut session = Self {
            cache,
            total_levels,
            current_level: max_level_reached,
            level,
            player,
            total_coins,
            max_level_reached,
            run_completed: false,
            log: Vec::new(),
        };
        session.log.push(SessionEvent::LevelStarted { level: max_level_reached });
        session
    }

    pub fn select_level(&mut self, level: u32) -> Result<(), SessionError> {
        if !(FIRST_LEVEL..=self.total_levels).contains(&level) {
            return Err(SessionError::UnknownLevel { level, total: self.total_levels });
        }
        if level > self.max_level_reached {
            return Err(SessionError::LevelLocked { level, unlocked: self.max_level_reached });
        }
        self.enter_level(level);
        Ok(())
    }

    /// Slides until the next cell is a wall or off the lattice, collecting every coin passed.
    /// Only the landing cell can complete the level.
    pub fn jump(&mut self, direction: Direction) -> JumpOutcome {
        let from = self.player;
        if self.run_completed {
            return JumpOutcome { from, to: from, coins_collected: 0, completed_level: None };
        }

        let mut pos = from;
        let mut coins_collected = 0;
        loop {
            let next = direction.step(pos);
            if !self.level.lattice.is_passable(next) {
                break;
            }
            pos = next;
            if self.level.coins.remove(&pos) {
                coins_collected += 1;
                self.total_coins += 1;
                self.log.push(SessionEvent::CoinCollected { level: self.current_level, pos });
            }
        }
        self.player = pos;

        let completed_level = (self.level.lattice.tile_at(pos) == TileKind::Finish)
            .then(|| self.complete_level());
        JumpOutcome { from, to: pos, coins_collected, completed_level }
    }

    fn complete_level(&mut self) -> u32 {
        let completed = self.current_level;
        self.log.push(SessionEvent::LevelCompleted { level: completed });
        info!("completed level {completed} with {} coins in total", self.total_coins);

        if completed >= self.total_levels {
            self.run_completed = true;
            self.log.push(SessionEvent::RunCompleted);
            info!("all {} levels completed", self.total_levels);
            return completed;
        }

        let next = completed + 1;
        if next > self.max_level_reached {
            self.max_level_reached = next;
            self.log.push(SessionEvent::LevelUnlocked { level: next });
        }
        self.enter_level(next);
        completed
    }

    fn enter_level(&mut self, level: u32) {
        self.level = self.cache.get(level);
        self.current_level = level;
        self.player = self.cache.generator().config().start;
        self.run_completed = false;
        self.log.push(SessionEvent::LevelStarted { level });
    }

    pub fn progress(&self) -> ProgressFile {
        ProgressFile {
            format_version: PROGRESS_FORMAT_VERSION,
            run_seed: self.cache.generator().run_seed(),
            max_level_reached: self.max_level_reached,
            total_coins: self.total_coins,
            levels: self.cache.iter().map(|(level, state)| (level, state.clone())).collect(),
        }
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn level(&self) -> &LevelState {
        &self.level
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn total_coins(&self) -> u64 {
        self.total_coins
    }

    pub fn max_level_reached(&self) -> u32 {
        self.max_level_reached
    }

    pub fn total_levels(&self) -> u32 {
        self.total_levels
    }

    pub fn is_run_completed(&self) -> bool {
        self.run_completed
    }

    pub fn cache(&self) -> &LevelStateCache {
        &self.cache
    }

    pub fn log(&self) -> &[SessionEvent] {
        &self.log
    }
}
