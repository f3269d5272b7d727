//! Level transitions: ascending regenerates or seeds the destination,
//! descending returns to a level exactly as it was left.
//! It does not own stair placement rules; those live in the generator.

use super::Game;
use crate::level::{Level, Room};
use crate::levelgen;
use crate::types::{LogEvent, Pos, TREASURE_LEVEL, TileKind};

impl Game {
    /// Enter-on-`>` while below the treasure level. The departure room seeds
    /// the next level's layout the first time it is visited.
    pub(super) fn ascend(&mut self) {
        let departure_index = self.current_level - 1;
        let departure_room = self.levels[departure_index]
            .room_containing(self.player)
            .map(|index| self.levels[departure_index].rooms[index]);
        let departure = self.player;

        self.current_level += 1;
        let dest_index = self.current_level - 1;

        if self.current_level == TREASURE_LEVEL {
            let summary =
                levelgen::generate_level(&mut self.levels[dest_index], TREASURE_LEVEL, &mut self.rng);
            self.player = summary.spawn;
            self.set_message("You've reached the Treasure Room! Be careful of traps!");
        } else if !self.levels[dest_index].stairs_placed {
            match departure_room {
                Some(room) => {
                    let (shallower, deeper) = self.levels.split_at_mut(dest_index);
                    install_seed_room(&mut deeper[0], &shallower[dest_index - 1], room, departure);
                    levelgen::generate_remaining_rooms(&mut self.levels[dest_index], &mut self.rng);
                    self.levels[dest_index].stairs_placed = true;
                    self.player = departure;
                }
                None => {
                    // Stairs outside any room should not happen, but a fresh
                    // layout keeps the run going if it does.
                    let summary = levelgen::generate_level(
                        &mut self.levels[dest_index],
                        self.current_level,
                        &mut self.rng,
                    );
                    self.levels[dest_index].stairs_placed = true;
                    self.player = summary.spawn;
                }
            }
            self.set_message(format!("Ascending to level {}", self.current_level));
        } else {
            // Revisit: the layout survives untouched.
            if let Some(pos) = self.levels[dest_index].stairs_prev {
                self.player = pos;
            }
            self.set_message(format!("Ascending to level {}", self.current_level));
        }

        self.push_log(LogEvent::Ascended { level: self.current_level });
    }

    /// Enter-on-`<` above level 1. No regeneration; the destination level's
    /// state is retained exactly as left.
    pub(super) fn descend(&mut self) {
        self.current_level -= 1;
        let dest = &self.levels[self.current_level - 1];
        self.player = match dest.stairs_next {
            Some(pos) => pos,
            None => dest.rooms.first().map(Room::center).unwrap_or(self.player),
        };
        self.set_message(format!("Descending to level {}", self.current_level));
        self.push_log(LogEvent::Descended { level: self.current_level });
    }
}

/// Copy the departure room's footprint into a wiped destination as its room
/// 0, rewriting the departure cell to `<`. Tile, trap, and coin state travel
/// with the footprint; secret features stay behind with their descriptors.
fn install_seed_room(dest: &mut Level, src: &Level, room: Room, departure: Pos) {
    dest.wipe();
    for y in room.pos.y..=room.bottom() {
        for x in room.pos.x..=room.right() {
            let pos = Pos { y, x };
            let src_cell = src.grid.cell(pos);
            if let Some(cell) = dest.grid.cell_mut(pos) {
                cell.tile = src_cell.tile;
                cell.trap = src_cell.trap;
                cell.coin = src_cell.coin;
            }
        }
    }
    if let Some(cell) = dest.grid.cell_mut(departure) {
        cell.tile = TileKind::StairsPrev;
        cell.trap = false;
        cell.coin = None;
    }
    dest.stairs_prev = Some(departure);
    dest.rooms.push(Room { connected: false, ..room });
}
