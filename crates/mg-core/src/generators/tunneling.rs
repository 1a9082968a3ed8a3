//! Tunneling dungeon
//!
//! Rejection sampling: draw a random room, keep it if it overlaps no
//! accepted room, and tunnel from it to the previously accepted one.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{BuildContext, Layout, PlacedRoom, Strategy};
use crate::error::{ConfigError, check_positive, check_range};
use crate::map::{Corridor, Grid, HallStyle, Rect, Tile, create_hall};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunneling {
    pub room_max_size: i32,
    pub room_min_size: i32,
    /// Stop once this many rooms are accepted
    pub max_rooms: usize,
    /// Candidate rooms drawn before giving up
    pub placement_attempts: usize,
    pub hall_style: HallStyle,
}

impl Default for Tunneling {
    fn default() -> Self {
        Self {
            room_max_size: 15,
            room_min_size: 6,
            max_rooms: 30,
            placement_attempts: 30,
            hall_style: HallStyle::LHall,
        }
    }
}

impl Tunneling {
    /// Draw a candidate room one cell clear of the grid edge. `None` when
    /// the drawn size does not fit.
    fn candidate(&self, grid: &Grid, ctx: &mut BuildContext<'_>) -> Option<Rect> {
        let w = ctx.noise.next_range(self.room_min_size, self.room_max_size);
        let h = ctx.noise.next_range(self.room_min_size, self.room_max_size);
        let max_x = grid.width() - w - 1;
        let max_y = grid.height() - h - 1;
        let x = ctx.noise.next_range(1, max_x);
        let y = ctx.noise.next_range(1, max_y);
        if max_x < 1 || max_y < 1 {
            return None;
        }
        Some(Rect::new(x, y, w, h))
    }
}

impl Strategy for Tunneling {
    fn validate(&self) -> Result<(), ConfigError> {
        check_positive("room_min_size", self.room_min_size as i64)?;
        check_range("room_size", self.room_min_size, self.room_max_size)?;
        check_positive("max_rooms", self.max_rooms as i64)?;
        Ok(())
    }

    fn build(&self, grid: &mut Grid, ctx: &mut BuildContext<'_>) -> Layout {
        grid.fill(Tile::Wall);
        let mut layout = Layout::default();
        let mut accepted: Vec<Rect> = Vec::with_capacity(self.max_rooms);

        for attempt in 0..self.placement_attempts {
            if accepted.len() >= self.max_rooms {
                break;
            }
            let Some(room) = self.candidate(grid, ctx) else {
                debug!("tunneling: attempt {} does not fit", attempt);
                continue;
            };
            if accepted.iter().any(|other| other.intersects(&room)) {
                debug!("tunneling: attempt {} overlaps", attempt);
                continue;
            }

            grid.fill_rect(room, Tile::Floor);
            if let Some(previous) = accepted.last() {
                let (from, to) = (room.center(), previous.center());
                let style = create_hall(grid, from, to, self.hall_style, ctx.hall_max_width, ctx.noise);
                layout.corridors.push(Corridor { from, to, style });
            }
            accepted.push(room);
            layout.rooms.push(PlacedRoom {
                bounds: room,
                area: room.area() as usize,
            });
        }

        info!(
            "tunneling: {} rooms from {} attempts",
            layout.rooms.len(),
            self.placement_attempts
        );
        layout
    }
}
