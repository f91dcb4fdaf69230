//! Level generation orchestration: allocate, carve, validate, repair, scatter coins.

use log::{debug, trace};
use rand_chacha::rand_core::Rng;

use super::carver::carve_spanning_tree;
use super::coins::place_coins;
use super::config::{ConfigError, GenerationConfig};
use super::lattice::Lattice;
use super::model::{GeneratedLevel, GenerationOutcome, LevelState};
use super::repair::repair_connectivity;
use super::seed::{carve_rng, coin_rng, derive_level_seed};
use super::validator::{Reachability, validate_reachability};

#[derive(Clone, Debug)]
pub struct LevelGenerator {
    config: GenerationConfig,
    run_seed: u64,
}

impl LevelGenerator {
    pub fn new(config: GenerationConfig, run_seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, run_seed })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn run_seed(&self) -> u64 {
        self.run_seed
    }

    pub fn level_seed(&self, level: u32) -> u64 {
        derive_level_seed(self.run_seed, level)
    }

    pub fn generate(&self, level: u32) -> GeneratedLevel {
        let seed = self.level_seed(level);
        self.generate_with_rngs(level, seed, &mut carve_rng(seed), &mut coin_rng(seed))
    }

    /// Runs the pipeline with caller-supplied random sources; `seed` is only recorded.
    pub fn generate_with_rngs<C, K>(
        &self,
        level: u32,
        seed: u64,
        carve_rng: &mut C,
        coin_rng: &mut K,
    ) -> GeneratedLevel
    where
        C: Rng + ?Sized,
        K: Rng + ?Sized,
    {
        let GenerationConfig { start, finish, .. } = self.config;

        let mut lattice = Lattice::allocate(&self.config);
        carve_spanning_tree(&mut lattice, start, carve_rng);

        let outcome = match validate_reachability(&mut lattice, start, finish) {
            Reachability::Confirmed { path_len } => {
                trace!("level {level}: carved maze reaches the finish in {path_len} steps");
                GenerationOutcome::Carved { path_len }
            }
            failure => {
                let search_failed = failure == Reachability::SearchFailed;
                let repair_steps = repair_connectivity(&mut lattice, start, finish);
                debug!(
                    "level {level}: validation failed ({failure:?}), forced a corridor in {repair_steps} steps"
                );
                GenerationOutcome::Repaired { search_failed, repair_steps }
            }
        };

        let coins = place_coins(&lattice, start, finish, level, coin_rng);
        GeneratedLevel { level, state: LevelState { seed, lattice, coins }, outcome }
    }
}
