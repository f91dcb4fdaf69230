//! Start-to-finish reachability: A* search with path normalization, then an independent
//! flood-fill that decides whether the lattice is solvable.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Direction, Pos, TileKind};

use super::lattice::Lattice;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reachability {
    /// Search found a path and the flood-fill agreed.
    Confirmed { path_len: usize },
    SearchFailed,
    /// Search returned a path the flood-fill could not follow.
    FloodFillDisagreed { path_len: usize },
}

impl Reachability {
    pub fn is_confirmed(self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

// Ordered by f, then discovery order, so `pop_first` yields the oldest cheapest entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    order: u64,
    pos: Pos,
}

pub fn validate_reachability(lattice: &mut Lattice, start: Pos, finish: Pos) -> Reachability {
    let Some(path) = astar_path(lattice, start, finish) else {
        return Reachability::SearchFailed;
    };

    for &pos in &path {
        lattice.set_tile(pos, TileKind::Open);
    }
    lattice.set_tile(start, TileKind::Open);
    lattice.set_tile(finish, TileKind::Finish);

    let path_len = path.len() - 1;
    if flood_fill_reaches(lattice, start, finish) {
        Reachability::Confirmed { path_len }
    } else {
        Reachability::FloodFillDisagreed { path_len }
    }
}

/// Shortest 4-connected path over non-wall tiles, both endpoints included.
pub fn astar_path(lattice: &Lattice, start: Pos, goal: Pos) -> Option<Vec<Pos>> {
    if !lattice.is_passable(start) || !lattice.is_passable(goal) {
        return None;
    }

    let mut open_set = BTreeSet::new();
    let mut discovered: BTreeMap<Pos, u64> = BTreeMap::new();
    let mut g_score: BTreeMap<Pos, u32> = BTreeMap::new();
    let mut came_from: BTreeMap<Pos, Pos> = BTreeMap::new();
    let mut closed = BTreeSet::new();

    open_set.insert(OpenNode { f: manhattan(start, goal), order: 0, pos: start });
    discovered.insert(start, 0);
    g_score.insert(start, 0);

    while let Some(current) = open_set.pop_first() {
        if current.pos == goal {
            return Some(reconstruct_path(&came_from, start, goal));
        }
        closed.insert(current.pos);
        let current_g = g_score[&current.pos];

        for next in Direction::ALL.map(|direction| direction.step(current.pos)) {
            if closed.contains(&next) || !lattice.is_passable(next) {
                continue;
            }
            let tentative_g = current_g + 1;
            let h = manhattan(next, goal);
            match g_score.get(&next).copied() {
                Some(known_g) if tentative_g >= known_g => continue,
                Some(known_g) => {
                    let order = discovered[&next];
                    open_set.remove(&OpenNode { f: known_g + h, order, pos: next });
                    open_set.insert(OpenNode { f: tentative_g + h, order, pos: next });
                }
                None => {
                    let order = discovered.len() as u64;
                    discovered.insert(next, order);
                    open_set.insert(OpenNode { f: tentative_g + h, order, pos: next });
                }
            }
            g_score.insert(next, tentative_g);
            came_from.insert(next, current.pos);
        }
    }
    None
}

fn reconstruct_path(came_from: &BTreeMap<Pos, Pos>, start: Pos, goal: Pos) -> Vec<Pos> {
    let mut path = vec![goal];
    let mut pos = goal;
    while pos != start {
        let Some(&previous) = came_from.get(&pos) else {
            break;
        };
        pos = previous;
        path.push(pos);
    }
    path.reverse();
    path
}

/// Stack-based traversal over non-wall tiles.
pub fn flood_fill(lattice: &Lattice, start: Pos) -> BTreeSet<Pos> {
    let mut visited = BTreeSet::new();
    let mut stack = vec![start];
    while let Some(pos) = stack.pop() {
        if !lattice.is_passable(pos) || !visited.insert(pos) {
            continue;
        }
        for direction in Direction::ALL {
            let next = direction.step(pos);
            if !visited.contains(&next) {
                stack.push(next);
            }
        }
    }
    visited
}

pub fn flood_fill_reaches(lattice: &Lattice, start: Pos, goal: Pos) -> bool {
    flood_fill(lattice, start).contains(&goal)
}

pub(super) fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice_from_rows(rows: &[&str]) -> Lattice {
        let mut lattice = Lattice::filled(rows[0].len(), rows.len(), TileKind::Wall);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                let tile = match c {
                    '#' => TileKind::Wall,
                    'F' => TileKind::Finish,
                    _ => TileKind::Open,
                };
                lattice.set_tile(Pos { y: y as i32, x: x as i32 }, tile);
            }
        }
        lattice
    }

    #[test]
    fn astar_finds_shortest_route_around_walls() {
        let lattice = lattice_from_rows(&[
            "#######", //
            "#F....#", //
            "####..#", //
            "#.....#", //
            "#######",
        ]);
        let start = Pos { y: 3, x: 1 };
        let finish = Pos { y: 1, x: 1 };

        let path = astar_path(&lattice, start, finish).expect("route exists");
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&finish));
        // Around the wall through column 4: 3 right, 2 up, 3 left.
        assert_eq!(path.len() - 1, 8);
        for pair in path.windows(2) {
            assert_eq!(manhattan(pair[0], pair[1]), 1);
            assert!(lattice.is_passable(pair[1]));
        }
    }

    #[test]
    fn astar_reports_no_path_when_finish_is_sealed() {
        let lattice = lattice_from_rows(&[
            "#####", //
            "#F#.#", //
            "###.#", //
            "#...#", //
            "#####",
        ]);
        assert_eq!(astar_path(&lattice, Pos { y: 3, x: 1 }, Pos { y: 1, x: 1 }), None);
    }

    #[test]
    fn astar_breaks_equal_cost_ties_by_discovery_order() {
        // Right is explored before Down, so the route along the top row wins.
        let lattice = Lattice::filled(2, 2, TileKind::Open);
        let start = Pos { y: 0, x: 0 };
        let goal = Pos { y: 1, x: 1 };

        let path = astar_path(&lattice, start, goal).expect("open ground is connected");
        assert_eq!(path, vec![start, Pos { y: 0, x: 1 }, goal]);

        let path = astar_path(&lattice, goal, start).expect("open ground is connected");
        assert_eq!(path, vec![goal, Pos { y: 0, x: 1 }, start]);
    }

    #[test]
    fn astar_relaxes_costs_to_keep_paths_shortest_on_open_ground() {
        let lattice = Lattice::filled(12, 12, TileKind::Open);
        let start = Pos { y: 10, x: 10 };
        let goal = Pos { y: 1, x: 2 };
        let path = astar_path(&lattice, start, goal).expect("open ground is connected");
        assert_eq!(path.len() - 1, manhattan(start, goal) as usize);
    }

    #[test]
    fn validation_normalizes_path_tiles_and_endpoints() {
        let mut lattice = lattice_from_rows(&[
            "#####", //
            "#F..#", //
            "###.#", //
            "#...#", //
            "#####",
        ]);
        let start = Pos { y: 3, x: 1 };
        let finish = Pos { y: 1, x: 1 };

        let outcome = validate_reachability(&mut lattice, start, finish);
        assert_eq!(outcome, Reachability::Confirmed { path_len: 6 });
        assert_eq!(lattice.tile_at(start), TileKind::Open);
        assert_eq!(lattice.tile_at(finish), TileKind::Finish);
    }

    #[test]
    fn validation_flags_search_failure() {
        let mut lattice = lattice_from_rows(&[
            "#####", //
            "#F###", //
            "#####", //
            "#...#", //
            "#####",
        ]);
        let outcome = validate_reachability(&mut lattice, Pos { y: 3, x: 3 }, Pos { y: 1, x: 1 });
        assert_eq!(outcome, Reachability::SearchFailed);
        assert!(!outcome.is_confirmed());
    }

    #[test]
    fn flood_fill_stays_inside_passable_component() {
        let lattice = lattice_from_rows(&[
            "#####", //
            "#..##", //
            "#####", //
            "#..F#", //
            "#####",
        ]);
        let region = flood_fill(&lattice, Pos { y: 3, x: 1 });
        assert_eq!(region.len(), 3);
        assert!(region.contains(&Pos { y: 3, x: 3 }));
        assert!(!flood_fill_reaches(&lattice, Pos { y: 3, x: 1 }, Pos { y: 1, x: 1 }));
    }

    #[test]
    fn flood_fill_from_wall_is_empty() {
        let lattice = Lattice::filled(3, 3, TileKind::Wall);
        assert!(flood_fill(&lattice, Pos { y: 1, x: 1 }).is_empty());
    }
}
