//! mapgen: print a generated map
//!
//! `RUST_LOG=debug mapgen --kind room-addition --seed 7` shows every
//! placement decision on stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;
use mg_core::{GeneratorKind, MapConfig, MapGenerator, Seed};
use mg_cli::{CliError, load_generator, render_ascii};

/// Procedural floor/wall map generator
#[derive(Parser, Debug)]
#[command(name = "mapgen")]
#[command(author, version, about = "Generate a cave or dungeon map and print it as text", long_about = None)]
struct Args {
    /// Strategy (cellular-automata, bsp-tree, tunneling, random-walk, room-addition)
    #[arg(short = 'k', long = "kind", default_value_t = GeneratorKind::CellularAutomata)]
    kind: GeneratorKind,

    /// Map width in cells
    #[arg(short = 'W', long = "width", default_value_t = 100)]
    width: i32,

    /// Map height in cells
    #[arg(short = 'H', long = "height", default_value_t = 100)]
    height: i32,

    /// Fixed seed
    #[arg(short = 's', long = "seed", conflicts_with = "phrase")]
    seed: Option<u32>,

    /// Seed phrase, hashed into a seed
    #[arg(short = 'p', long = "phrase")]
    phrase: Option<String>,

    /// Wall thickness around the map
    #[arg(short = 'b', long = "border", default_value_t = 0)]
    border: i32,

    /// Widest dotted-line corridor
    #[arg(long = "hall-width", default_value_t = 6)]
    hall_width: i32,

    /// JSON file with strategy parameters
    #[arg(long = "params")]
    params: Option<PathBuf>,

    /// Regenerate this many times and print only the last map
    #[arg(short = 'r', long = "regenerate", default_value_t = 0)]
    regenerate: usize,

    /// Mark a spawn tile and print its world position
    #[arg(long = "spawn")]
    spawn: bool,

    /// World units per cell for --spawn
    #[arg(long = "unit-size", default_value_t = 1.0)]
    unit_size: f32,
}

impl Args {
    fn seed(&self) -> Seed {
        match (&self.seed, &self.phrase) {
            (Some(seed), _) => Seed::Fixed(*seed),
            (None, Some(phrase)) => Seed::Phrase(phrase.clone()),
            (None, None) => Seed::Random,
        }
    }

    fn config(&self) -> MapConfig {
        MapConfig {
            width: self.width,
            height: self.height,
            horizontal_border: self.border,
            vertical_border: self.border,
            hall_max_width: self.hall_width,
            seed: self.seed(),
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let generator = load_generator(args.kind, args.params.as_deref())?;
    let mut map = MapGenerator::new(args.config(), generator)?;
    info!("seed {}", map.seed());

    map.generate();
    for _ in 0..args.regenerate {
        let buffer = map.grid().clone();
        map.regenerate(buffer)?;
    }

    let spawn = if args.spawn { map.placement_floor_tile() } else { None };
    print!("{}", render_ascii(map.grid(), spawn));

    if args.spawn {
        match spawn {
            Some(tile) => {
                let world = mg_core::generators::spawn_point(map.grid(), tile, args.unit_size);
                println!("spawn: tile ({}, {}), world ({:.2}, {:.2})", tile.x, tile.y, world.x, world.y);
            }
            None => println!("spawn: no floor tile"),
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("mapgen: {}", err);
            ExitCode::FAILURE
        }
    }
}
