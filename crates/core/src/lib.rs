pub mod cache;
pub mod levelgen;
pub mod progress_file;
pub mod session;
pub mod types;

pub use cache::LevelStateCache;
pub use levelgen::{
    ConfigError, GeneratedLevel, GenerationConfig, GenerationOutcome, Lattice, LevelGenerator,
    LevelState, LevelStateError,
};
pub use progress_file::ProgressFile;
pub use session::{JumpOutcome, PlaySession, SessionError, SessionEvent, TOTAL_LEVELS};
pub use types::*;
