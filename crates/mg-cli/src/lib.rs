//! mg-cli: helpers behind the `mapgen` binary
//!
//! ASCII rendering and strategy parameter loading.

mod error;
pub mod params;
pub mod render;

pub use error::CliError;
pub use params::{load_generator, parse_generator};
pub use render::render_ascii;
