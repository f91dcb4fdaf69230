//! Row-major tile grid shared by every pipeline stage, plus its initial allocation.

use serde::{Deserialize, Serialize};

use crate::types::{Pos, TileKind};

use super::config::GenerationConfig;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lattice {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

impl Lattice {
    /// Dimensions are expected to have passed `GenerationConfig::validate`.
    pub fn filled(width: usize, height: usize, tile: TileKind) -> Self {
        Self { width, height, tiles: vec![tile; width * height] }
    }

    /// Fully walled lattice with the start opened and the finish stamped.
    pub fn allocate(config: &GenerationConfig) -> Self {
        let mut lattice = Self::filled(config.width, config.height, TileKind::Wall);
        lattice.set_tile(config.start, TileKind::Open);
        lattice.set_tile(config.finish, TileKind::Finish);
        lattice
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    /// Deserialized lattices may carry a tile vector that disagrees with their dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.width.checked_mul(self.height) == Some(self.tiles.len())
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Inside the bounds and off the outer ring.
    pub fn is_interior(&self, pos: Pos) -> bool {
        pos.x > 0
            && pos.y > 0
            && (pos.x as usize) + 1 < self.width
            && (pos.y as usize) + 1 < self.height
    }

    /// Out-of-bounds reads behave as walls.
    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Wall;
        }
        self.tiles.get(self.index(pos)).copied().unwrap_or(TileKind::Wall)
    }

    pub fn set_tile(&mut self, pos: Pos, tile: TileKind) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        if let Some(slot) = self.tiles.get_mut(idx) {
            *slot = tile;
        }
    }

    pub fn is_passable(&self, pos: Pos) -> bool {
        self.tile_at(pos).is_passable()
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Pos { y: y as i32, x: x as i32 })
        })
    }

    pub fn count(&self, tile: TileKind) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.tiles.len());
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for tile in &self.tiles {
            bytes.push(match tile {
                TileKind::Wall => 0,
                TileKind::Open => 1,
                TileKind::Finish => 2,
            });
        }
        bytes
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}
