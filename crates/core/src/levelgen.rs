//! Procedural level generation split into one submodule per pipeline stage.

pub mod carver;
pub mod coins;
pub mod config;
pub mod lattice;
pub mod model;
pub mod repair;
pub mod validator;

mod generator;
mod seed;

pub use coins::coin_density;
pub use config::{ConfigError, Endpoint, GenerationConfig, MAX_DIMENSION};
pub use generator::LevelGenerator;
pub use lattice::Lattice;
pub use model::{GeneratedLevel, GenerationOutcome, LevelState, LevelStateError};
pub use seed::derive_level_seed;

pub fn generate_level(
    config: GenerationConfig,
    run_seed: u64,
    level: u32,
) -> Result<GeneratedLevel, ConfigError> {
    Ok(LevelGenerator::new(config, run_seed)?.generate(level))
}
