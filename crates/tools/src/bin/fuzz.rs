use anyhow::{Result, bail};
use clap::Parser;
use labyrinth_core::{
    Direction, GenerationConfig, LevelGenerator, PlaySession, TOTAL_LEVELS, TileKind,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of independent runs, each with its own run seed
    #[arg(short, long, default_value_t = 100)]
    runs: u32,
    #[arg(short, long, default_value_t = 500)]
    jumps: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn fuzz_run(run_seed: u64, rng: &mut ChaCha8Rng, max_jumps: u32) -> Result<u32> {
    let config = GenerationConfig::default();
    let mut session = PlaySession::new(LevelGenerator::new(config, run_seed)?, TOTAL_LEVELS);

    for level in 1..=TOTAL_LEVELS {
        let generated = session.cache().generator().generate(level);
        if let Err(err) = generated.state.check_invariants(&config) {
            bail!("run seed {run_seed} level {level}: {err}");
        }
    }

    let mut completed = 0;
    for _ in 0..max_jumps {
        let outcome = session.jump(choose(rng, &Direction::ALL));
        if session.level().lattice.tile_at(session.player()) == TileKind::Wall {
            bail!("run seed {run_seed}: player inside a wall at {}", session.player());
        }
        if outcome.completed_level.is_some() {
            completed += 1;
        }
        if session.is_run_completed() {
            break;
        }
    }
    Ok(completed)
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!(
        "Fuzzing {} runs from seed {} with up to {} jumps each...",
        args.runs, args.seed, args.jumps
    );
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut completed_levels = 0_u64;

    for _ in 0..args.runs {
        let run_seed = rng.next_u64();
        completed_levels += u64::from(fuzz_run(run_seed, &mut rng, args.jumps)?);
    }

    println!("All runs held their invariants, {completed_levels} levels completed.");
    Ok(())
}
