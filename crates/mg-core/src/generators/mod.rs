//! Level generation strategies
//!
//! Each strategy is a flat parameter record implementing [`Strategy`]. The
//! [`Generator`] enum holds exactly one of them and dispatches to it.
//! Strategies receive a grid the size of the playable area and always
//! leave its outermost ring as wall.

mod bsp;
mod cellular;
mod placement;
mod random_walk;
mod room_addition;
mod tunneling;

use mg_rng::NoiseSource;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::ConfigError;
use crate::map::{Corridor, Grid, Rect};

pub use bsp::BspTree;
pub use cellular::CellularAutomata;
pub use placement::{placement_floor_tile, spawn_point, WorldPoint};
pub use random_walk::{Direction, RandomWalk};
pub use room_addition::{RoomAddition, RoomShape};
pub use tunneling::Tunneling;

/// Per-call state shared with a strategy
pub struct BuildContext<'a> {
    pub noise: &'a mut NoiseSource,
    /// Upper bound for dotted-line corridor width
    pub hall_max_width: i32,
}

/// A room accepted by a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedRoom {
    /// Bounding box of the room's floor cells
    pub bounds: Rect,
    /// Number of floor cells the room contributed
    pub area: usize,
}

/// What a strategy built, besides the tiles themselves
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub rooms: Vec<PlacedRoom>,
    pub corridors: Vec<Corridor>,
}

impl Layout {
    /// Shift every room and corridor by `(dx, dy)`
    pub fn offset(mut self, dx: i32, dy: i32) -> Self {
        for room in &mut self.rooms {
            room.bounds.x += dx;
            room.bounds.y += dy;
        }
        for corridor in &mut self.corridors {
            corridor.from = corridor.from.offset(dx, dy);
            corridor.to = corridor.to.offset(dx, dy);
        }
        self
    }
}

/// A level generation algorithm
pub trait Strategy {
    /// Reject parameter combinations the algorithm cannot honour
    fn validate(&self) -> Result<(), ConfigError>;

    /// Fill `grid` in place. The whole grid is overwritten.
    fn build(&self, grid: &mut Grid, ctx: &mut BuildContext<'_>) -> Layout;
}

/// Strategy selector without parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GeneratorKind {
    CellularAutomata,
    BspTree,
    Tunneling,
    RandomWalk,
    RoomAddition,
}

/// The active strategy and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Generator {
    CellularAutomata(CellularAutomata),
    BspTree(BspTree),
    Tunneling(Tunneling),
    RandomWalk(RandomWalk),
    RoomAddition(RoomAddition),
}

impl Default for Generator {
    fn default() -> Self {
        Generator::CellularAutomata(CellularAutomata::default())
    }
}

impl From<GeneratorKind> for Generator {
    /// Default parameters for `kind`
    fn from(kind: GeneratorKind) -> Self {
        match kind {
            GeneratorKind::CellularAutomata => Generator::CellularAutomata(CellularAutomata::default()),
            GeneratorKind::BspTree => Generator::BspTree(BspTree::default()),
            GeneratorKind::Tunneling => Generator::Tunneling(Tunneling::default()),
            GeneratorKind::RandomWalk => Generator::RandomWalk(RandomWalk::default()),
            GeneratorKind::RoomAddition => Generator::RoomAddition(RoomAddition::default()),
        }
    }
}

impl Generator {
    pub fn kind(&self) -> GeneratorKind {
        match self {
            Generator::CellularAutomata(_) => GeneratorKind::CellularAutomata,
            Generator::BspTree(_) => GeneratorKind::BspTree,
            Generator::Tunneling(_) => GeneratorKind::Tunneling,
            Generator::RandomWalk(_) => GeneratorKind::RandomWalk,
            Generator::RoomAddition(_) => GeneratorKind::RoomAddition,
        }
    }

    fn strategy(&self) -> &dyn Strategy {
        match self {
            Generator::CellularAutomata(s) => s,
            Generator::BspTree(s) => s,
            Generator::Tunneling(s) => s,
            Generator::RandomWalk(s) => s,
            Generator::RoomAddition(s) => s,
        }
    }
}

impl Strategy for Generator {
    fn validate(&self) -> Result<(), ConfigError> {
        self.strategy().validate()
    }

    fn build(&self, grid: &mut Grid, ctx: &mut BuildContext<'_>) -> Layout {
        self.strategy().build(grid, ctx)
    }
}
