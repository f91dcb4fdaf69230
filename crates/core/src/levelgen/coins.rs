//! Per-cell coin scattering with a density that thins out on later levels.

use std::collections::BTreeSet;

use rand_chacha::rand_core::Rng;

use crate::types::{Pos, TileKind};

use super::lattice::Lattice;
use super::seed::random_unit;

const BASE_DENSITY: f64 = 0.7;
const DENSITY_DROP_PER_LEVEL: f64 = 0.05;
const MIN_DENSITY: f64 = 0.4;

pub fn coin_density(level: u32) -> f64 {
    (BASE_DENSITY - f64::from(level) * DENSITY_DROP_PER_LEVEL).max(MIN_DENSITY)
}

pub fn place_coins<R: Rng + ?Sized>(
    lattice: &Lattice,
    start: Pos,
    finish: Pos,
    level: u32,
    rng: &mut R,
) -> BTreeSet<Pos> {
    let density = coin_density(level);
    lattice
        .positions()
        .filter(|&pos| lattice.is_interior(pos) && lattice.tile_at(pos) == TileKind::Open)
        .filter(|&pos| pos != start && pos != finish)
        .filter(|_| random_unit(rng) < density)
        .collect()
}
