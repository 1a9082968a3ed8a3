use mg_cli::{parse_generator, render_ascii};
use mg_core::{GeneratorKind, MapConfig, MapGenerator, Tile};

#[test]
fn test_rendered_map_shape() {
    let generator = parse_generator(GeneratorKind::BspTree, r#"{"leaf_max_size": 20}"#).unwrap();
    let mut map = MapGenerator::new(MapConfig::new(48, 32, 12), generator).unwrap();
    let text = render_ascii(map.generate(), None);

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 32);
    assert!(lines.iter().all(|l| l.len() == 48));
    assert!(lines[0].chars().all(|c| c == '#'));
    let floors = text.chars().filter(|&c| c == '.').count();
    assert_eq!(floors, map.grid().count(Tile::Floor));
}

#[test]
fn test_spawn_marker_on_floor() {
    let generator = parse_generator(GeneratorKind::CellularAutomata, r#"{"random_fill_percent": 0.45}"#).unwrap();
    let mut map = MapGenerator::new(MapConfig::new(50, 50, 42), generator).unwrap();
    map.generate();
    let spawn = map.placement_floor_tile().unwrap();
    let text = render_ascii(map.grid(), Some(spawn));

    let row = text.lines().nth(spawn.y as usize).unwrap();
    assert_eq!(row.chars().nth(spawn.x as usize), Some('@'));
    let floors = text.chars().filter(|&c| c == '.').count();
    assert_eq!(floors + 1, map.grid().count(Tile::Floor));
}
