//! Map primitives
//!
//! Tiles, coordinates, the tile grid, corridor carving, flood-fill regions,
//! the room connectivity graph and the BSP partition tree.

mod corridor;
mod grid;
mod leaf;
mod rect;
mod region;
mod room;
mod tile;

pub use corridor::{
    Axis, Corridor, HallStyle, LOrder, carve_dotted_line, carve_l_hall, carve_meander, carve_straight,
    create_hall,
};
pub use grid::Grid;
pub use leaf::{Leaf, MIN_LEAF_SIZE};
pub use rect::{Coord, Rect};
pub use region::{Region, RegionAnalyzer};
pub use room::{EdgePair, Room, RoomGraph};
pub use tile::Tile;
