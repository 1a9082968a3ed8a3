//! Text output

use mg_core::{Coord, Grid};

/// Marker drawn over the spawn tile
pub const SPAWN_GLYPH: char = '@';

/// One line per row, `#` for wall and `.` for floor, with an optional
/// spawn marker
pub fn render_ascii(grid: &Grid, spawn: Option<Coord>) -> String {
    let mut out = String::with_capacity(((grid.width() + 1) * grid.height()) as usize);
    for (y, row) in grid.to_ascii_rows().into_iter().enumerate() {
        match spawn {
            Some(c) if c.y == y as i32 => {
                out.extend(row.chars().enumerate().map(|(x, ch)| {
                    if x as i32 == c.x { SPAWN_GLYPH } else { ch }
                }));
            }
            _ => out.push_str(&row),
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "#####
#...#
#...#
#####
";

    #[test]
    fn test_render_matches_input() {
        let grid = Grid::from_ascii(ROOM).unwrap();
        assert_eq!(render_ascii(&grid, None), ROOM);
    }

    #[test]
    fn test_spawn_marker() {
        let grid = Grid::from_ascii(ROOM).unwrap();
        let text = render_ascii(&grid, Some(Coord::new(2, 1)));
        assert_eq!(text.lines().nth(1), Some("#.@.#"));
        assert_eq!(text.matches(SPAWN_GLYPH).count(), 1);
    }
}
