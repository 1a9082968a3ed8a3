//! mg-core: procedural floor/wall map generation
//!
//! A map is a [`Grid`] of [`Tile`]s. A [`MapGenerator`] walls the whole
//! buffer, runs one of the strategies in [`generators`] over the area inside
//! the configured border, and keeps the noise stream between runs.
//!
//! ```no_run
//! use mg_core::{generate, Generator, GeneratorKind, MapConfig};
//!
//! let config = MapConfig::new(80, 50, 42);
//! let grid = generate(&config, &Generator::from(GeneratorKind::BspTree))?;
//! println!("{}", grid);
//! # Ok::<(), mg_core::ConfigError>(())
//! ```

pub mod config;
pub mod error;
pub mod generators;
pub mod map;
mod map_generator;

pub use config::{MapConfig, MIN_INNER_SIZE};
pub use error::ConfigError;
pub use generators::{
    BspTree, BuildContext, CellularAutomata, Generator, GeneratorKind, Layout, PlacedRoom, RandomWalk, RoomAddition,
    Strategy, Tunneling, WorldPoint,
};
pub use map::{Coord, Grid, HallStyle, Rect, Tile};
pub use map_generator::{MapGenerator, generate, regenerate};
pub use mg_rng::{NoiseSource, Seed};
