use std::collections::BTreeSet;

use labyrinth_core::{Lattice, LevelState, Pos, TileKind};

pub const WALL_GLYPH: char = '#';
pub const FINISH_GLYPH: char = 'F';
pub const FLOOR_GLYPH: char = '.';
pub const COIN_GLYPH: char = 'o';
pub const PLAYER_GLYPH: char = '@';

/// One line per row, top row first. The player glyph wins over everything else.
pub fn render_lattice(lattice: &Lattice, coins: &BTreeSet<Pos>, player: Option<Pos>) -> String {
    let mut out = String::with_capacity((lattice.width() + 1) * lattice.height());
    for y in 0..lattice.height() as i32 {
        for x in 0..lattice.width() as i32 {
            let pos = Pos { y, x };
            let glyph = if player == Some(pos) {
                PLAYER_GLYPH
            } else if coins.contains(&pos) {
                COIN_GLYPH
            } else {
                match lattice.tile_at(pos) {
                    TileKind::Wall => WALL_GLYPH,
                    TileKind::Finish => FINISH_GLYPH,
                    TileKind::Open => FLOOR_GLYPH,
                }
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

pub fn render_level(state: &LevelState, player: Option<Pos>) -> String {
    render_lattice(&state.lattice, &state.coins, player)
}
