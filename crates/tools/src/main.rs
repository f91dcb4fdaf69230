mod ascii;
mod config;
mod seed;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use env_logger::{Builder, Env};
use labyrinth_core::{
    Direction, GenerationOutcome, LevelGenerator, PlaySession, ProgressFile, SessionEvent,
};
use log::{info, warn};
use serde::Serialize;

use crate::ascii::{render_level, render_lattice};
use crate::config::ToolConfig;
use crate::seed::{SeedChoice, generate_runtime_seed, resolve_seed};

#[derive(Parser)]
#[command(author, version, about = "Generate, inspect and play maze levels", long_about = None)]
struct Cli {
    /// TOML file with `run_seed`, `total_levels` and a `[lattice]` table
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Run seed; overrides the config file
    #[arg(short, long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print one generated level
    Generate {
        #[arg(short, long, default_value_t = 1)]
        level: u32,
        /// Emit the level as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Count how often generation falls back to the corridor repairer
    Survey {
        #[arg(long, default_value_t = 1000)]
        seeds: u64,
    },
    /// Apply a string of jumps (U, R, D, L) and save progress
    Play {
        #[arg(short, long, default_value = "")]
        moves: String,
        /// Switch to an unlocked level before jumping
        #[arg(short, long)]
        level: Option<u32>,
        #[arg(short, long)]
        profile: Option<String>,
        #[arg(long)]
        save_dir: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct GenerateReport<'a> {
    level: u32,
    seed: u64,
    fingerprint: String,
    repaired: bool,
    coin_count: usize,
    rows: Vec<&'a str>,
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ToolConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Generate { level, json } => {
            let generator = build_generator(&config, cli.seed)?;
            generate(&generator, config.total_levels, level, json)
        }
        Command::Survey { seeds } => {
            let generator = build_generator(&config, cli.seed)?;
            survey(&generator, config.total_levels, seeds)
        }
        Command::Play { moves, level, profile, save_dir } => {
            let dir = match save_dir {
                Some(dir) => dir,
                None => default_save_dir()?,
            };
            let path = ProgressFile::path_in(&dir, profile.as_deref());
            play(&config, cli.seed, &path, level, &moves)
        }
    }
}

fn build_generator(config: &ToolConfig, cli_seed: Option<u64>) -> Result<LevelGenerator> {
    let choice = resolve_seed(cli_seed, config.run_seed, generate_runtime_seed());
    if let SeedChoice::Generated(seed) = choice {
        info!("no run seed given, using generated seed {seed}");
    }
    LevelGenerator::new(config.lattice, choice.value()).context("Invalid lattice configuration")
}

fn generate(generator: &LevelGenerator, total_levels: u32, level: u32, json: bool) -> Result<()> {
    if !(1..=total_levels).contains(&level) {
        bail!("level {level} is outside 1..={total_levels}");
    }
    let generated = generator.generate(level);
    let state = &generated.state;

    if json {
        let text = render_lattice(&state.lattice, &state.coins, None);
        let report = GenerateReport {
            level,
            seed: state.seed,
            fingerprint: format!("{:016x}", state.fingerprint()),
            repaired: generated.outcome.was_repaired(),
            coin_count: state.coins.len(),
            rows: text.lines().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", render_level(state, Some(generator.config().start)));
    println!("run seed:    {}", generator.run_seed());
    println!("level:       {level} (seed {})", state.seed);
    println!("fingerprint: {:016x}", state.fingerprint());
    println!("coins:       {}", state.coins.len());
    match generated.outcome {
        GenerationOutcome::Carved { path_len } => println!("outcome:     carved, path {path_len}"),
        GenerationOutcome::Repaired { search_failed, repair_steps } => println!(
            "outcome:     repaired in {repair_steps} steps (search failed: {search_failed})"
        ),
    }
    Ok(())
}

fn survey(generator: &LevelGenerator, total_levels: u32, seeds: u64) -> Result<()> {
    let base = generator.run_seed();
    let config = *generator.config();
    let mut generated = 0_u64;
    let mut repaired = 0_u64;

    for offset in 0..seeds {
        let run = LevelGenerator::new(config, base.wrapping_add(offset))?;
        for level in 1..=total_levels {
            generated += 1;
            if run.generate(level).outcome.was_repaired() {
                repaired += 1;
            }
        }
    }

    let share = if generated == 0 { 0.0 } else { repaired as f64 / generated as f64 };
    println!("levels generated: {generated}");
    println!("levels repaired:  {repaired} ({:.3}%)", share * 100.0);
    Ok(())
}

fn play(
    config: &ToolConfig,
    cli_seed: Option<u64>,
    path: &Path,
    level: Option<u32>,
    moves: &str,
) -> Result<()> {
    let directions = parse_moves(moves)?;

    let mut session = match ProgressFile::load_if_exists(path)
        .with_context(|| format!("Failed to load progress from {}", path.display()))?
    {
        Some(progress) => {
            if cli_seed.is_some_and(|seed| seed != progress.run_seed) {
                warn!(
                    "ignoring --seed, {} was saved with run seed {}",
                    path.display(),
                    progress.run_seed
                );
            }
            PlaySession::from_progress(config.lattice, config.total_levels, progress)?
        }
        None => PlaySession::new(build_generator(config, cli_seed)?, config.total_levels),
    };

    if let Some(level) = level {
        session.select_level(level)?;
    }
    let log_start = session.log().len();
    for direction in directions {
        let outcome = session.jump(direction);
        if !outcome.moved() {
            info!("{direction:?} blocked at {}", outcome.from);
        }
    }

    for event in &session.log()[log_start..] {
        match event {
            SessionEvent::CoinCollected { pos, .. } => println!("coin at {pos}"),
            SessionEvent::LevelCompleted { level } => println!("level {level} completed"),
            SessionEvent::LevelUnlocked { level } => println!("level {level} unlocked"),
            SessionEvent::RunCompleted => println!("run completed"),
            SessionEvent::LevelStarted { .. } => {}
        }
    }

    print!("{}", render_level(session.level(), Some(session.player())));
    println!(
        "level {}/{}, unlocked {}, coins {}",
        session.current_level(),
        session.total_levels(),
        session.max_level_reached(),
        session.total_coins()
    );

    session
        .progress()
        .write_atomic(path)
        .with_context(|| format!("Failed to save progress to {}", path.display()))?;
    info!("progress saved to {}", path.display());
    Ok(())
}

fn parse_moves(moves: &str) -> Result<Vec<Direction>> {
    moves
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| {
            Direction::from_char(c).with_context(|| format!("unknown move '{c}', use U R D L"))
        })
        .collect()
}

fn default_save_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "Labyrinth")
        .context("Could not determine a data directory, pass --save-dir")?;
    Ok(dirs.data_dir().to_path_buf())
}
