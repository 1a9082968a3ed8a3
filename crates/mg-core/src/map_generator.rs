//! Generation driver
//!
//! Owns the map config, the active strategy and the noise stream. Each run
//! walls the whole buffer, hands the area inside the border to the
//! strategy, and copies the result back at the border offset.

use log::info;
use mg_rng::NoiseSource;

use crate::config::MapConfig;
use crate::error::ConfigError;
use crate::generators::{self, BuildContext, Generator, Layout, Strategy, WorldPoint};
use crate::map::{Coord, Grid, Tile};

/// Run `generator` over the whole of `grid`, border included
fn build_into(grid: &mut Grid, config: &MapConfig, generator: &Generator, noise: &mut NoiseSource) -> Layout {
    grid.fill(Tile::Wall);
    let (hb, vb) = (config.horizontal_border, config.vertical_border);
    let mut inner = Grid::new(grid.width() - 2 * hb, grid.height() - 2 * vb, Tile::Wall);

    let mut ctx = BuildContext {
        noise,
        hall_max_width: config.hall_max_width,
    };
    let layout = generator.build(&mut inner, &mut ctx).offset(hb, vb);
    grid.blit(&inner, hb, vb);

    info!(
        "{}: {}x{} map, seed {}, {} floor tiles, {} rooms, {} corridors",
        generator.kind(),
        grid.width(),
        grid.height(),
        ctx.noise.seed(),
        grid.count(Tile::Floor),
        layout.rooms.len(),
        layout.corridors.len()
    );
    layout
}

/// Config of `config` resized to the dimensions of `grid`
fn resized(config: &MapConfig, grid: &Grid) -> MapConfig {
    MapConfig {
        width: grid.width(),
        height: grid.height(),
        ..config.clone()
    }
}

/// Build a fresh map with its own noise stream
pub fn generate(config: &MapConfig, generator: &Generator) -> Result<Grid, ConfigError> {
    config.validate()?;
    generator.validate()?;
    let mut noise = NoiseSource::from_seed(&config.seed);
    let mut grid = Grid::new(config.width, config.height, Tile::Wall);
    build_into(&mut grid, config, generator, &mut noise);
    Ok(grid)
}

/// Rebuild `grid` in place, keeping its dimensions
pub fn regenerate(mut grid: Grid, config: &MapConfig, generator: &Generator) -> Result<Grid, ConfigError> {
    let config = resized(config, &grid);
    config.validate()?;
    generator.validate()?;
    let mut noise = NoiseSource::from_seed(&config.seed);
    build_into(&mut grid, &config, generator, &mut noise);
    Ok(grid)
}

/// Stateful generator. The noise stream carries over between runs, so
/// regenerating yields a new map while the whole sequence stays
/// reproducible from the seed.
#[derive(Debug, Clone)]
pub struct MapGenerator {
    config: MapConfig,
    generator: Generator,
    noise: NoiseSource,
    grid: Grid,
    layout: Layout,
}

impl MapGenerator {
    pub fn new(config: MapConfig, generator: Generator) -> Result<Self, ConfigError> {
        config.validate()?;
        generator.validate()?;
        let noise = NoiseSource::from_seed(&config.seed);
        let grid = Grid::new(config.width, config.height, Tile::Wall);
        Ok(Self {
            config,
            generator,
            noise,
            grid,
            layout: Layout::default(),
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// The resolved seed, also for `Seed::Random`
    pub fn seed(&self) -> u32 {
        self.noise.seed()
    }

    /// Last generated map; all wall before the first run
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Rooms and corridors of the last run, in map coordinates
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Replace the active strategy
    pub fn set_generator(&mut self, generator: Generator) -> Result<(), ConfigError> {
        generator.validate()?;
        self.generator = generator;
        Ok(())
    }

    /// Build a new map into a freshly allocated buffer
    pub fn generate(&mut self) -> &Grid {
        let mut grid = Grid::new(self.config.width, self.config.height, Tile::Wall);
        self.layout = build_into(&mut grid, &self.config, &self.generator, &mut self.noise);
        self.grid = grid;
        &self.grid
    }

    /// Build a new map into `grid`, adopting its dimensions
    pub fn regenerate(&mut self, mut grid: Grid) -> Result<&Grid, ConfigError> {
        let config = resized(&self.config, &grid);
        config.validate()?;
        self.layout = build_into(&mut grid, &config, &self.generator, &mut self.noise);
        self.config = config;
        self.grid = grid;
        Ok(&self.grid)
    }

    /// A floor tile away from walls on the current map
    pub fn placement_floor_tile(&mut self) -> Option<Coord> {
        generators::placement_floor_tile(&self.grid, &mut self.noise)
    }

    /// [`MapGenerator::placement_floor_tile`] in world units
    pub fn spawn_point(&mut self, unit_size: f32) -> Option<WorldPoint> {
        let tile = self.placement_floor_tile()?;
        Some(generators::spawn_point(&self.grid, tile, unit_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{BspTree, CellularAutomata, GeneratorKind};

    #[test]
    fn test_new_rejects_bad_config() {
        let config = MapConfig::new(4, 4, 1);
        assert!(MapGenerator::new(config, Generator::default()).is_err());

        let bad = Generator::BspTree(BspTree {
            room_min_size: 9,
            room_max_size: 5,
            ..Default::default()
        });
        assert!(MapGenerator::new(MapConfig::new(40, 40, 1), bad).is_err());
    }

    #[test]
    fn test_set_generator_keeps_old_on_error() {
        let mut map = MapGenerator::new(MapConfig::new(40, 40, 1), Generator::default()).unwrap();
        let bad = Generator::CellularAutomata(CellularAutomata {
            random_fill_percent: 1.5,
            ..Default::default()
        });
        assert!(map.set_generator(bad).is_err());
        assert_eq!(map.generator().kind(), GeneratorKind::CellularAutomata);
        assert!(map.set_generator(Generator::from(GeneratorKind::Tunneling)).is_ok());
        assert_eq!(map.generator().kind(), GeneratorKind::Tunneling);
    }

    #[test]
    fn test_border_is_wall() {
        let config = MapConfig::new(50, 40, 3).with_border(4);
        let grid = generate(&config, &Generator::from(GeneratorKind::RandomWalk)).unwrap();
        assert_eq!((grid.width(), grid.height()), (50, 40));
        for c in grid.bounds().coords() {
            // strategies keep their own outer ring too
            if !grid.is_interior(c, 5) {
                assert_eq!(grid.tile(c), Tile::Wall, "{:?}", c);
            }
        }
        assert!(grid.count(Tile::Floor) > 0);
    }

    #[test]
    fn test_layout_in_map_coordinates() {
        let config = MapConfig::new(60, 50, 11).with_border(5);
        let mut map = MapGenerator::new(config, Generator::from(GeneratorKind::Tunneling)).unwrap();
        let grid = map.generate().clone();
        assert!(!map.layout().rooms.is_empty());
        for room in &map.layout().rooms {
            for c in room.bounds.coords() {
                assert_eq!(grid.tile(c), Tile::Floor);
            }
        }
    }

    #[test]
    fn test_regenerate_changes_map() {
        let mut map = MapGenerator::new(MapConfig::new(48, 48, 21), Generator::default()).unwrap();
        let first = map.generate().clone();
        let second = map.regenerate(first.clone()).unwrap().clone();
        assert_ne!(first, second);

        // the same sequence from the same seed
        let mut again = MapGenerator::new(MapConfig::new(48, 48, 21), Generator::default()).unwrap();
        assert_eq!(again.generate(), &first);
        assert_eq!(again.regenerate(first.clone()).unwrap(), &second);
    }

    #[test]
    fn test_regenerate_adopts_buffer_size() {
        let mut map = MapGenerator::new(MapConfig::new(48, 48, 2), Generator::default()).unwrap();
        let grid = map.regenerate(Grid::new(30, 20, Tile::Floor)).unwrap();
        assert_eq!((grid.width(), grid.height()), (30, 20));
        assert_eq!(map.config().width, 30);

        assert!(map.regenerate(Grid::new(5, 5, Tile::Floor)).is_err());
        assert_eq!(map.config().width, 30);
    }

    #[test]
    fn test_free_regenerate_matches_generate() {
        let config = MapConfig::new(40, 30, 8);
        let generator = Generator::from(GeneratorKind::BspTree);
        let fresh = generate(&config, &generator).unwrap();
        let reused = regenerate(Grid::new(40, 30, Tile::Floor), &config, &generator).unwrap();
        assert_eq!(fresh, reused);
    }

    #[test]
    fn test_spawn_point_on_floor() {
        let mut map = MapGenerator::new(MapConfig::new(40, 40, 5), Generator::from(GeneratorKind::BspTree)).unwrap();
        assert_eq!(map.placement_floor_tile(), None);
        map.generate();
        let tile = map.placement_floor_tile().unwrap();
        assert_eq!(map.grid().tile(tile), Tile::Floor);
        let p = map.spawn_point(1.0).unwrap();
        assert!(p.x.abs() < 20.0 && p.y.abs() < 20.0);
    }
}
