//! BSP tree dungeon
//!
//! Partition the map into leaves, put one room inside each terminal leaf,
//! then walk the tree bottom-up joining sibling subtrees with a hall.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{BuildContext, Layout, PlacedRoom, Strategy};
use crate::error::{ConfigError, check_bounds, check_positive, check_range};
use crate::map::{Corridor, Grid, HallStyle, Leaf, MIN_LEAF_SIZE, Rect, Tile, create_hall};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BspTree {
    pub room_max_size: i32,
    pub room_min_size: i32,
    /// Leaves wider or taller than this are always split
    pub leaf_max_size: i32,
    pub hall_style: HallStyle,
}

impl Default for BspTree {
    fn default() -> Self {
        Self {
            room_max_size: 15,
            room_min_size: 6,
            leaf_max_size: 24,
            hall_style: HallStyle::LHall,
        }
    }
}

impl BspTree {
    /// Split `area` into a partition tree
    pub fn partition(&self, area: Rect, ctx: &mut BuildContext<'_>) -> Leaf {
        let mut root = Leaf::new(area);
        let splits = root.split_all(self.leaf_max_size, ctx.noise);
        debug!("bsp: {} splits of {}x{}", splits, area.w, area.h);
        root
    }

    /// Random room strictly inside `leaf`; the leaf's last row and column
    /// are never used so neighbouring rooms stay apart
    fn room_in(&self, leaf: Rect, ctx: &mut BuildContext<'_>) -> Rect {
        let max_w = self.room_max_size.min(leaf.w - 1);
        let max_h = self.room_max_size.min(leaf.h - 1);
        let w = ctx.noise.next_range(self.room_min_size.min(max_w), max_w);
        let h = ctx.noise.next_range(self.room_min_size.min(max_h), max_h);
        let x = ctx.noise.next_range(leaf.x, leaf.x + leaf.w - 1 - w);
        let y = ctx.noise.next_range(leaf.y, leaf.y + leaf.h - 1 - h);
        Rect::new(x, y, w, h)
    }

    fn create_rooms(&self, leaf: &mut Leaf, grid: &mut Grid, ctx: &mut BuildContext<'_>, layout: &mut Layout) {
        if leaf.is_terminal() {
            let room = self.room_in(leaf.rect(), ctx);
            grid.fill_rect(room, Tile::Floor);
            leaf.set_room(room);
            layout.rooms.push(PlacedRoom {
                bounds: room,
                area: room.area() as usize,
            });
            return;
        }

        let Some([left, right]) = leaf.children_mut() else {
            return;
        };
        self.create_rooms(left, grid, ctx, layout);
        self.create_rooms(right, grid, ctx, layout);

        let a = left.representative_room(ctx.noise);
        let b = right.representative_room(ctx.noise);
        if let (Some(a), Some(b)) = (a, b) {
            let (from, to) = (a.center(), b.center());
            let style = create_hall(grid, from, to, self.hall_style, ctx.hall_max_width, ctx.noise);
            layout.corridors.push(Corridor { from, to, style });
        }
    }
}

impl Strategy for BspTree {
    fn validate(&self) -> Result<(), ConfigError> {
        check_positive("room_min_size", self.room_min_size as i64)?;
        check_range("room_size", self.room_min_size, self.room_max_size)?;
        check_bounds(
            "leaf_max_size",
            self.leaf_max_size as i64,
            MIN_LEAF_SIZE as i64,
            i32::MAX as i64,
        )?;
        Ok(())
    }

    fn build(&self, grid: &mut Grid, ctx: &mut BuildContext<'_>) -> Layout {
        grid.fill(Tile::Wall);
        let mut root = self.partition(grid.bounds().inset(1), ctx);
        let mut layout = Layout::default();
        self.create_rooms(&mut root, grid, ctx, &mut layout);
        info!(
            "bsp: {} rooms, {} halls",
            layout.rooms.len(),
            layout.corridors.len()
        );
        layout
    }
}
