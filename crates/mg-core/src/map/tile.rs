//! Tile types

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A grid cell's terrain
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Tile {
    Floor = 0,
    #[default]
    Wall = 1,
}

impl Tile {
    pub const fn is_floor(&self) -> bool {
        matches!(self, Tile::Floor)
    }

    pub const fn is_wall(&self) -> bool {
        matches!(self, Tile::Wall)
    }

    /// The other tile type
    pub const fn inverse(&self) -> Tile {
        match self {
            Tile::Floor => Tile::Wall,
            Tile::Wall => Tile::Floor,
        }
    }

    /// ASCII glyph used by text dumps
    pub const fn to_ascii(&self) -> char {
        match self {
            Tile::Floor => '.',
            Tile::Wall => '#',
        }
    }

    /// Parse an ASCII glyph back into a tile
    pub const fn from_ascii(c: char) -> Option<Tile> {
        match c {
            '.' => Some(Tile::Floor),
            '#' => Some(Tile::Wall),
            _ => None,
        }
    }
}
