//! Fog-of-war refresh: exploration marking plus the rendered layer rebuild.
//! This module exists to keep what-the-player-sees rules in one place.
//! It does not own movement or pickup behavior.

use super::Game;
use crate::level::Level;
use crate::types::Pos;

/// How far corridor sight reaches along each axis.
const CORRIDOR_SIGHT: i32 = 5;

impl Game {
    /// Recompute exploration and the rendered layer for the active level.
    /// Run after every turn and after any full-screen overlay returns.
    pub fn update_visibility(&mut self) {
        let debug = self.debug_mode;
        let player = self.player;
        let index = self.current_level - 1;
        refresh_level(&mut self.levels[index], player, debug);
    }
}

pub(super) fn refresh_level(level: &mut Level, player: Pos, debug: bool) {
    // Standing in a room reveals the whole room; standing in a passage
    // reveals the passage along each axis that continues.
    if let Some(room_index) = level.room_containing(player) {
        let room = level.rooms[room_index];
        for y in room.pos.y..=room.bottom() {
            for x in room.pos.x..=room.right() {
                level.grid.mark_explored(Pos { y, x });
            }
        }
    } else if level.grid.tile_at(player).is_passage() {
        level.grid.mark_explored(player);
        let horizontal = level.grid.tile_at(player.offset(0, -1)).is_passage()
            || level.grid.tile_at(player.offset(0, 1)).is_passage();
        let vertical = level.grid.tile_at(player.offset(-1, 0)).is_passage()
            || level.grid.tile_at(player.offset(1, 0)).is_passage();
        if horizontal {
            explore_ray(level, player, 0, -1);
            explore_ray(level, player, 0, 1);
        }
        if vertical {
            explore_ray(level, player, -1, 0);
            explore_ray(level, player, 1, 0);
        }
    }

    for y in 0..level.grid.height as i32 {
        for x in 0..level.grid.width as i32 {
            let pos = Pos { y, x };
            let cell = level.grid.cell(pos);
            let symbol = if !(cell.explored || debug) {
                ' '
            } else if cell.secret_stair && (debug || cell.secret_revealed) {
                '%'
            } else if cell.secret_revealed {
                // A pocket-room exit next to a secret wall leaves its marker
                // on the floor cell the player stood on.
                '?'
            } else if cell.secret_wall && debug {
                '?'
            } else {
                cell.tile.symbol()
            };
            level.grid.set_rendered(pos, symbol);
        }
    }
}

fn explore_ray(level: &mut Level, from: Pos, dy: i32, dx: i32) {
    for step in 0..=CORRIDOR_SIGHT {
        let pos = from.offset(dy * step, dx * step);
        if !level.grid.in_bounds(pos) {
            break;
        }
        if !level.grid.tile_at(pos).is_passage() {
            break;
        }
        level.grid.mark_explored(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Level, Room};
    use crate::types::TileKind;

    fn corridor_level() -> Level {
        // A long east-west corridor at y=5 with a stretch of floor past x=12.
        let mut level = Level::new(30, 20);
        for x in 2..=12 {
            level.grid.set_tile(Pos { y: 5, x }, TileKind::Corridor);
        }
        for x in 13..=16 {
            level.grid.set_tile(Pos { y: 5, x }, TileKind::Floor);
        }
        level
    }

    #[test]
    fn standing_in_a_room_reveals_its_full_footprint() {
        let mut level = Level::new(30, 20);
        let room = Room::new(Pos { y: 2, x: 2 }, Pos { y: 6, x: 8 });
        level.rooms.push(room);
        refresh_level(&mut level, Pos { y: 4, x: 5 }, false);
        for y in 2..=7 {
            for x in 2..=9 {
                assert!(level.grid.is_explored(Pos { y, x }), "({y},{x}) unexplored");
            }
        }
        assert!(!level.grid.is_explored(Pos { y: 8, x: 2 }));
    }

    #[test]
    fn corridor_sight_extends_five_cells_and_stops_at_non_passage() {
        let mut level = corridor_level();
        refresh_level(&mut level, Pos { y: 5, x: 8 }, false);
        for x in 3..=12 {
            assert!(level.grid.is_explored(Pos { y: 5, x }), "x={x} unexplored");
        }
        // x=2 is six cells west of the player.
        assert!(!level.grid.is_explored(Pos { y: 5, x: 2 }));
        // The ray stops at the first floor cell.
        assert!(!level.grid.is_explored(Pos { y: 5, x: 13 }));
    }

    #[test]
    fn lone_passage_cell_reveals_only_itself() {
        let mut level = Level::new(30, 20);
        level.grid.set_tile(Pos { y: 5, x: 5 }, TileKind::Corridor);
        refresh_level(&mut level, Pos { y: 5, x: 5 }, false);
        assert!(level.grid.is_explored(Pos { y: 5, x: 5 }));
        assert!(!level.grid.is_explored(Pos { y: 5, x: 6 }));
        assert!(!level.grid.is_explored(Pos { y: 4, x: 5 }));
    }

    #[test]
    fn explored_cells_never_roll_back() {
        let mut level = corridor_level();
        refresh_level(&mut level, Pos { y: 5, x: 8 }, false);
        assert!(level.grid.is_explored(Pos { y: 5, x: 12 }));
        // Move somewhere unrelated; earlier exploration must survive.
        refresh_level(&mut level, Pos { y: 15, x: 20 }, false);
        assert!(level.grid.is_explored(Pos { y: 5, x: 12 }));
        assert_eq!(level.grid.rendered_at(Pos { y: 5, x: 12 }), '#');
    }

    #[test]
    fn unexplored_cells_render_blank_unless_debugging() {
        let mut level = corridor_level();
        refresh_level(&mut level, Pos { y: 15, x: 20 }, false);
        assert_eq!(level.grid.rendered_at(Pos { y: 5, x: 8 }), ' ');
        refresh_level(&mut level, Pos { y: 15, x: 20 }, true);
        assert_eq!(level.grid.rendered_at(Pos { y: 5, x: 8 }), '#');
    }

    #[test]
    fn secret_features_render_markers_only_when_revealed_or_debugging() {
        let mut level = Level::new(30, 20);
        let wall = Pos { y: 3, x: 4 };
        let stair = Pos { y: 6, x: 6 };
        level.grid.set_tile(wall, TileKind::WallV);
        level.grid.set_tile(stair, TileKind::Floor);
        if let Some(cell) = level.grid.cell_mut(wall) {
            cell.secret_wall = true;
            cell.explored = true;
        }
        if let Some(cell) = level.grid.cell_mut(stair) {
            cell.secret_stair = true;
            cell.explored = true;
        }

        refresh_level(&mut level, Pos { y: 10, x: 10 }, false);
        assert_eq!(level.grid.rendered_at(wall), '|');
        assert_eq!(level.grid.rendered_at(stair), '.');

        refresh_level(&mut level, Pos { y: 10, x: 10 }, true);
        assert_eq!(level.grid.rendered_at(wall), '?');
        assert_eq!(level.grid.rendered_at(stair), '%');

        if let Some(cell) = level.grid.cell_mut(stair) {
            cell.secret_revealed = true;
        }
        refresh_level(&mut level, Pos { y: 10, x: 10 }, false);
        assert_eq!(level.grid.rendered_at(stair), '%');
    }
}
