//! Per-level memoization of generated lattices and coin sets.
//! Reads always hand out deep copies so gameplay can consume coins without touching the
//! stored level, and revisiting a level reproduces its first-generated layout.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use log::trace;

use crate::levelgen::{LevelGenerator, LevelState, LevelStateError};

#[derive(Clone, Debug)]
pub struct LevelStateCache {
    generator: LevelGenerator,
    states: BTreeMap<u32, LevelState>,
}

impl LevelStateCache {
    pub fn new(generator: LevelGenerator) -> Self {
        Self { generator, states: BTreeMap::new() }
    }

    pub fn generator(&self) -> &LevelGenerator {
        &self.generator
    }

    /// Generates on first request, then serves a copy of the stored state. Level ids start at 1.
    pub fn get(&mut self, level: u32) -> LevelState {
        match self.states.entry(level) {
            Entry::Occupied(entry) => {
                trace!("level {level}: served from cache");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let generated = self.generator.generate(level);
                entry.insert(generated.state).clone()
            }
        }
    }

    pub fn invalidate(&mut self, level: u32) -> Option<LevelState> {
        self.states.remove(&level)
    }

    pub fn contains(&self, level: u32) -> bool {
        self.states.contains_key(&level)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &LevelState)> {
        self.states.iter().map(|(&level, state)| (level, state))
    }

    /// Rehydrates a persisted level; rejected states leave the cache untouched.
    pub fn restore(&mut self, level: u32, state: LevelState) -> Result<(), LevelStateError> {
        if level == 0 {
            return Err(LevelStateError::ZeroLevel);
        }
        state.check_invariants(self.generator.config())?;
        self.states.insert(level, state);
        Ok(())
    }
}
