use labyrinth_core::levelgen::repair::repair_connectivity;
use labyrinth_core::levelgen::validator::{astar_path, flood_fill_reaches};
use labyrinth_core::levelgen::{coin_density, generate_level};
use labyrinth_core::{GenerationConfig, Lattice, LevelGenerator, LevelStateCache, Pos, TileKind};
use proptest::prelude::*;

fn cache(run_seed: u64) -> LevelStateCache {
    LevelStateCache::new(
        LevelGenerator::new(GenerationConfig::default(), run_seed).expect("default config is valid"),
    )
}

#[test]
fn example_level_connects_start_to_finish() {
    let config = GenerationConfig {
        width: 10,
        height: 15,
        start: Pos { y: 13, x: 8 },
        finish: Pos { y: 1, x: 1 },
    };
    let generated = generate_level(config, 99, 1).expect("config is valid");
    let lattice = &generated.state.lattice;

    assert_eq!(lattice.tile_at(Pos { y: 13, x: 8 }), TileKind::Open);
    assert_eq!(lattice.tile_at(Pos { y: 1, x: 1 }), TileKind::Finish);
    assert!(flood_fill_reaches(lattice, config.start, config.finish));

    let path = astar_path(lattice, config.start, config.finish).expect("path exists");
    for pair in path.windows(2) {
        assert_eq!(pair[0].x.abs_diff(pair[1].x) + pair[0].y.abs_diff(pair[1].y), 1);
        assert_ne!(lattice.tile_at(pair[1]), TileKind::Wall);
    }
}

#[test]
fn repair_alone_connects_an_all_wall_lattice_within_bound() {
    let mut lattice = Lattice::filled(10, 15, TileKind::Wall);
    let start = Pos { y: 13, x: 8 };
    let finish = Pos { y: 1, x: 1 };

    let steps = repair_connectivity(&mut lattice, start, finish);

    assert!(steps <= 8 + 13);
    assert_eq!(lattice.tile_at(finish), TileKind::Finish);
    assert!(flood_fill_reaches(&lattice, start, finish));
}

#[test]
fn coin_density_curve_matches_level_range() {
    assert!((coin_density(1) - 0.65).abs() < 1e-9);
    assert!((coin_density(12) - 0.4).abs() < 1e-9);
    for level in 1..12 {
        assert!(coin_density(level + 1) <= coin_density(level));
        assert!(coin_density(level) >= 0.4);
    }
}

#[test]
fn mutating_a_returned_copy_never_changes_the_next_one() {
    let mut cache = cache(5);
    let mut first = cache.get(4);
    let second = cache.get(4);
    assert_eq!(first, second);

    let finish = cache.generator().config().finish;
    first.lattice.set_tile(finish, TileKind::Wall);
    first.coins.clear();

    assert_eq!(cache.get(4), second);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]
    #[test]
    fn cached_levels_hold_every_invariant(seed in any::<u64>(), level in 1_u32..=12) {
        let mut cache = cache(seed);
        let config = *cache.generator().config();
        let state = cache.get(level);

        prop_assert_eq!(state.lattice.count(TileKind::Finish), 1);
        prop_assert_eq!(state.lattice.tile_at(config.start), TileKind::Open);
        prop_assert!(flood_fill_reaches(&state.lattice, config.start, config.finish));
        for coin in &state.coins {
            prop_assert_eq!(state.lattice.tile_at(*coin), TileKind::Open);
            prop_assert!(*coin != config.start && *coin != config.finish);
        }
        prop_assert_eq!(cache.get(level), state);
    }

    #[test]
    fn odd_sized_lattices_stay_solvable(
        seed in any::<u64>(),
        width in 5_usize..=24,
        height in 5_usize..=24,
        level in 1_u32..=12,
    ) {
        let config = GenerationConfig::with_dimensions(width, height);
        let generated = generate_level(config, seed, level).expect("config is valid");
        prop_assert_eq!(generated.state.check_invariants(&config), Ok(()));
    }
}
