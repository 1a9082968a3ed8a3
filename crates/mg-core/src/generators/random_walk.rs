//! Drunkard's walk caves
//!
//! One walker wanders the map carving floor until a target share of the
//! map is open or the step budget runs out. It is pulled toward the centre
//! when near an edge and prefers to keep its previous heading.

use log::info;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::{BuildContext, Layout, Strategy};
use crate::error::{ConfigError, check_positive, check_probability};
use crate::map::{Coord, Grid, Tile};

/// Distance the walker keeps from every edge
const WALK_MARGIN: i32 = 2;

/// Compass heading of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomWalk {
    /// Step ceiling; the effective ceiling is at least `10 * w * h`
    pub walk_iterations: u64,
    /// Share of the map to open before stopping
    pub percent_goal: f64,
    /// Extra weight toward the centre when in an outer quarter
    pub weight_center: f64,
    /// Extra weight for repeating the previous heading
    pub weight_toward_previous: f64,
    /// Carve a plus shape instead of a single cell
    pub cross_walk: bool,
}

impl Default for RandomWalk {
    fn default() -> Self {
        Self {
            walk_iterations: 25_000,
            percent_goal: 0.4,
            weight_center: 0.15,
            weight_toward_previous: 0.7,
            cross_walk: true,
        }
    }
}

impl RandomWalk {
    /// Normalised step weights in `[north, south, east, west]` order
    pub fn weights(&self, pos: Coord, previous: Option<Direction>, width: i32, height: i32) -> [f64; 4] {
        let mut weights = [1.0; 4];
        let (w, h) = (width as f64, height as f64);
        let (x, y) = (pos.x as f64, pos.y as f64);

        if x < w * 0.25 {
            weights[2] += self.weight_center;
        } else if x > w * 0.75 {
            weights[3] += self.weight_center;
        }
        if y < h * 0.25 {
            weights[1] += self.weight_center;
        } else if y > h * 0.75 {
            weights[0] += self.weight_center;
        }

        if let Some(previous) = previous {
            let idx = match previous {
                Direction::North => 0,
                Direction::South => 1,
                Direction::East => 2,
                Direction::West => 3,
            };
            weights[idx] += self.weight_toward_previous;
        }

        let total: f64 = weights.iter().sum();
        weights.map(|weight| weight / total)
    }

    /// Pick a heading with one uniform draw against the cumulative weights
    fn choose(weights: &[f64; 4], aim: f64) -> Direction {
        let mut cumulative = 0.0;
        for (weight, direction) in weights.iter().zip([
            Direction::North,
            Direction::South,
            Direction::East,
        ]) {
            cumulative += weight;
            if aim < cumulative {
                return direction;
            }
        }
        Direction::West
    }

    /// Carve at `pos`, returning how many walls were opened
    fn carve(&self, grid: &mut Grid, pos: Coord) -> u64 {
        let mut opened = 0;
        let mut open = |c: Coord| {
            if grid.tile(c) == Tile::Wall {
                grid.set(c, Tile::Floor);
                opened += 1;
            }
        };
        open(pos);
        if self.cross_walk {
            for n in pos.cross_neighbors() {
                open(n);
            }
        }
        opened
    }
}

impl Strategy for RandomWalk {
    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("percent_goal", self.percent_goal)?;
        check_probability("weight_center", self.weight_center)?;
        check_probability("weight_toward_previous", self.weight_toward_previous)?;
        check_positive("walk_iterations", self.walk_iterations as i64)?;
        Ok(())
    }

    fn build(&self, grid: &mut Grid, ctx: &mut BuildContext<'_>) -> Layout {
        grid.fill(Tile::Wall);
        let (w, h) = (grid.width(), grid.height());
        let max_steps = self.walk_iterations.max(10 * w as u64 * h as u64);
        let goal = (w as f64 * h as f64 * self.percent_goal) as u64;

        let mut pos = Coord::new(
            ctx.noise.next_range(WALK_MARGIN, w - WALK_MARGIN - 1),
            ctx.noise.next_range(WALK_MARGIN, h - WALK_MARGIN - 1),
        );
        let mut filled = 0;
        let mut previous = None;
        let mut steps = 0;

        while steps < max_steps && filled < goal {
            let weights = self.weights(pos, previous, w, h);
            let direction = Self::choose(&weights, ctx.noise.next_double());
            let (dx, dy) = direction.delta();
            let next = pos.offset(dx, dy);
            if grid.is_interior(next, WALK_MARGIN) {
                pos = next;
                filled += self.carve(grid, pos);
            }
            previous = Some(direction);
            steps += 1;
        }

        info!(
            "random walk: {} of {} tiles open after {} steps",
            filled,
            w * h,
            steps
        );
        Layout::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::RegionAnalyzer;
    use mg_rng::NoiseSource;

    fn build(params: &RandomWalk, seed: u32, w: i32, h: i32) -> Grid {
        let mut grid = Grid::new(w, h, Tile::Floor);
        let mut noise = NoiseSource::new(seed);
        let mut ctx = BuildContext {
            noise: &mut noise,
            hall_max_width: 6,
        };
        params.build(&mut grid, &mut ctx);
        grid
    }

    #[test]
    fn test_weights_normalised() {
        let params = RandomWalk::default();
        let weights = params.weights(Coord::new(50, 50), None, 100, 100);
        assert_eq!(weights, [0.25; 4]);

        // top-left corner heading east: pulled south and east
        let weights = params.weights(Coord::new(5, 5), Some(Direction::East), 100, 100);
        let total: f64 = weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(weights[2] > weights[1]);
        assert!(weights[1] > weights[0]);
        assert_eq!(weights[0], weights[3]);
    }

    #[test]
    fn test_choose_buckets() {
        let weights = [0.25; 4];
        assert_eq!(RandomWalk::choose(&weights, 0.0), Direction::North);
        assert_eq!(RandomWalk::choose(&weights, 0.3), Direction::South);
        assert_eq!(RandomWalk::choose(&weights, 0.6), Direction::East);
        assert_eq!(RandomWalk::choose(&weights, 0.9), Direction::West);
        assert_eq!(RandomWalk::choose(&weights, 1.0), Direction::West);
    }

    #[test]
    fn test_reaches_goal_and_stays_inside() {
        let params = RandomWalk::default();
        for seed in 0..5 {
            let grid = build(&params, seed, 60, 40);
            let floor = grid.count(Tile::Floor);
            assert!(floor >= (60.0 * 40.0 * 0.4) as usize, "seed {}", seed);
            for c in grid.coords_of(Tile::Floor) {
                assert!(grid.is_interior(c, 1));
            }
            // a single walker leaves one connected cave
            assert_eq!(RegionAnalyzer::new(&grid).typed_regions(Tile::Floor).len(), 1);
        }
    }

    #[test]
    fn test_single_cell_walk() {
        let params = RandomWalk {
            cross_walk: false,
            percent_goal: 0.2,
            ..Default::default()
        };
        let grid = build(&params, 4, 30, 30);
        assert_eq!(grid.count(Tile::Floor), 180);
        for c in grid.coords_of(Tile::Floor) {
            assert!(grid.is_interior(c, WALK_MARGIN));
        }
    }
}
