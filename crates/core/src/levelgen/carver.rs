//! Randomized-Prim carving over the even-stepped sub-lattice anchored at the start cell.
//! Carved cells stay two apart so every passage is separated by at least one wall, and each
//! carve joins exactly one new cell to the tree, so the result is a perfect maze.

use rand_chacha::rand_core::Rng;

use crate::types::{Direction, Pos, TileKind};

use super::lattice::Lattice;
use super::seed::random_index;

/// Returns the number of sub-lattice cells joined to the tree, the start excluded.
pub fn carve_spanning_tree<R: Rng + ?Sized>(lattice: &mut Lattice, start: Pos, rng: &mut R) -> usize {
    lattice.set_tile(start, TileKind::Open);

    let mut frontier = Vec::new();
    push_frontier(lattice, start, &mut frontier);

    let mut joined = 0;
    while !frontier.is_empty() {
        let cell = frontier.swap_remove(random_index(rng, frontier.len()));
        // The same wall can be queued by several carved neighbours; only the first one joins it.
        if lattice.tile_at(cell) != TileKind::Wall {
            continue;
        }

        let carved: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&direction| {
                let neighbor = two_steps(cell, direction);
                lattice.is_interior(neighbor) && lattice.tile_at(neighbor) == TileKind::Open
            })
            .collect();
        if carved.is_empty() {
            continue;
        }

        let direction = carved[random_index(rng, carved.len())];
        lattice.set_tile(cell, TileKind::Open);
        lattice.set_tile(direction.step(cell), TileKind::Open);
        joined += 1;

        push_frontier(lattice, cell, &mut frontier);
    }
    joined
}

fn push_frontier(lattice: &Lattice, cell: Pos, frontier: &mut Vec<Pos>) {
    for direction in Direction::ALL {
        let next = two_steps(cell, direction);
        if lattice.is_interior(next) && lattice.tile_at(next) == TileKind::Wall {
            frontier.push(next);
        }
    }
}

fn two_steps(cell: Pos, direction: Direction) -> Pos {
    direction.step(direction.step(cell))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use super::*;
    use crate::levelgen::config::GenerationConfig;

    fn carved_lattice(seed: u64) -> (GenerationConfig, Lattice, usize) {
        let config = GenerationConfig::default();
        let mut lattice = Lattice::allocate(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let joined = carve_spanning_tree(&mut lattice, config.start, &mut rng);
        (config, lattice, joined)
    }

    fn open_cells(lattice: &Lattice) -> BTreeSet<Pos> {
        lattice.positions().filter(|&pos| lattice.tile_at(pos) == TileKind::Open).collect()
    }

    #[test]
    fn carving_visits_every_sub_lattice_cell() {
        let (config, lattice, joined) = carved_lattice(3);
        let mut expected = 0;
        for y in (1..config.height as i32 - 1).filter(|y| (y - config.start.y) % 2 == 0) {
            for x in (1..config.width as i32 - 1).filter(|x| (x - config.start.x) % 2 == 0) {
                expected += 1;
                assert_eq!(lattice.tile_at(Pos { y, x }), TileKind::Open, "cell ({x}, {y})");
            }
        }
        assert_eq!(joined + 1, expected);
    }

    #[test]
    fn carved_region_is_a_tree() {
        for seed in [1_u64, 2, 99, 4_096] {
            let (_, lattice, _) = carved_lattice(seed);
            let open = open_cells(&lattice);
            let edges = open
                .iter()
                .flat_map(|&pos| [Direction::Right, Direction::Down].map(|d| d.step(pos)))
                .filter(|next| open.contains(next))
                .count();
            assert_eq!(edges + 1, open.len(), "seed={seed} carved graph must be acyclic");
        }
    }

    #[test]
    fn border_ring_is_never_carved() {
        let (_, lattice, _) = carved_lattice(17);
        for pos in lattice.positions().filter(|&pos| !lattice.is_interior(pos)) {
            assert_eq!(lattice.tile_at(pos), TileKind::Wall, "border cell {pos} was carved");
        }
    }

    #[test]
    fn finish_tile_is_left_untouched() {
        let (config, lattice, _) = carved_lattice(5);
        assert_eq!(lattice.tile_at(config.finish), TileKind::Finish);
        assert_eq!(lattice.count(TileKind::Finish), 1);
    }

    #[test]
    fn same_seed_carves_same_maze() {
        assert_eq!(carved_lattice(77).1, carved_lattice(77).1);
        assert_ne!(carved_lattice(77).1, carved_lattice(78).1);
    }
}
