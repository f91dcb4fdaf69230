//! Deterministic corridor forcing used when validation cannot confirm a route.

use crate::types::{Pos, TileKind};

use super::lattice::Lattice;

const CLEAR_RADIUS: i32 = 2;

/// Walks a cursor from `start` to `finish`, x first, clearing the 5x5 block around every
/// cursor cell. Returns the number of steps taken, which equals the Manhattan distance.
pub fn repair_connectivity(lattice: &mut Lattice, start: Pos, finish: Pos) -> usize {
    let mut cursor = start;
    let mut steps = 0;
    while cursor != finish {
        clear_block(lattice, cursor);
        if cursor.x != finish.x {
            cursor.x += (finish.x - cursor.x).signum();
        } else {
            cursor.y += (finish.y - cursor.y).signum();
        }
        steps += 1;
    }
    lattice.set_tile(finish, TileKind::Finish);
    steps
}

fn clear_block(lattice: &mut Lattice, center: Pos) {
    for dy in -CLEAR_RADIUS..=CLEAR_RADIUS {
        for dx in -CLEAR_RADIUS..=CLEAR_RADIUS {
            let pos = center.offset(dy, dx);
            if lattice.in_bounds(pos) && lattice.tile_at(pos) == TileKind::Wall {
                lattice.set_tile(pos, TileKind::Open);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levelgen::validator::flood_fill_reaches;

    #[test]
    fn repair_on_solid_walls_terminates_and_connects_default_endpoints() {
        let mut lattice = Lattice::filled(10, 15, TileKind::Wall);
        let start = Pos { y: 13, x: 8 };
        let finish = Pos { y: 1, x: 1 };
        lattice.set_tile(finish, TileKind::Finish);

        let steps = repair_connectivity(&mut lattice, start, finish);

        assert!(steps <= 8 + 13, "took {steps} steps");
        assert_eq!(steps, 7 + 12);
        assert_eq!(lattice.tile_at(start), TileKind::Open);
        assert_eq!(lattice.tile_at(finish), TileKind::Finish);
        assert_eq!(lattice.count(TileKind::Finish), 1);
        assert!(flood_fill_reaches(&lattice, start, finish));
    }

    #[test]
    fn repair_restamps_a_finish_that_was_overwritten() {
        let mut lattice = Lattice::filled(10, 15, TileKind::Wall);
        let finish = Pos { y: 1, x: 1 };
        repair_connectivity(&mut lattice, Pos { y: 13, x: 8 }, finish);
        assert_eq!(lattice.tile_at(finish), TileKind::Finish);
    }

    #[test]
    fn repair_handles_finish_below_and_right_of_start() {
        let mut lattice = Lattice::filled(12, 12, TileKind::Wall);
        let start = Pos { y: 2, x: 2 };
        let finish = Pos { y: 9, x: 10 };
        let steps = repair_connectivity(&mut lattice, start, finish);
        assert_eq!(steps, 15);
        assert!(flood_fill_reaches(&lattice, start, finish));
    }

    #[test]
    fn repair_clips_blocks_at_the_lattice_edge() {
        let mut lattice = Lattice::filled(4, 4, TileKind::Wall);
        let start = Pos { y: 2, x: 2 };
        let finish = Pos { y: 1, x: 1 };
        repair_connectivity(&mut lattice, start, finish);
        assert_eq!(lattice.count(TileKind::Wall), 0);
        assert_eq!(lattice.count(TileKind::Finish), 1);
    }
}
