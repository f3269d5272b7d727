//! Pocket-room visits: swap the live grid for a detached talisman chamber
//! and restore it verbatim on the way out.
//! The enter/exit pair is the only code that touches the snapshot.

use super::{Game, chebyshev};
use crate::level::PocketVisit;
use crate::levelgen::rand_below;
use crate::types::{LogEvent, Pos, SecretEntry, TALISMAN_KINDS, TileKind};

/// Drawn edge length of the chamber.
const POCKET_SIZE: i32 = 7;
/// Movement is confined to this Chebyshev radius around the chamber center.
const POCKET_RADIUS: i32 = 3;

impl Game {
    /// Snapshot the real level and swap in the chamber. The player lands on
    /// the exit marker at its center.
    pub(super) fn enter_pocket(&mut self, via: SecretEntry) {
        let entry = self.player;

        // Roll the chamber's contents before the level borrow: talisman type,
        // and a talisman cell that avoids the exit marker.
        let talisman = TALISMAN_KINDS[rand_below(&mut self.rng, TALISMAN_KINDS.len() as i32) as usize];
        let (talisman_dy, talisman_dx) = loop {
            let dy = 1 + rand_below(&mut self.rng, POCKET_SIZE - 2);
            let dx = 1 + rand_below(&mut self.rng, POCKET_SIZE - 2);
            if (dy, dx) != (POCKET_SIZE / 2, POCKET_SIZE / 2) {
                break (dy, dx);
            }
        };

        let index = self.current_level - 1;
        let level = &mut self.levels[index];
        let saved = level.grid.snapshot();
        let center = level.grid.center();
        let origin = Pos { y: center.y - POCKET_SIZE / 2, x: center.x - POCKET_SIZE / 2 };

        level.grid.wipe();
        for dy in 0..POCKET_SIZE {
            for dx in 0..POCKET_SIZE {
                let pos = origin.offset(dy, dx);
                let tile = if dy == 0 || dy == POCKET_SIZE - 1 {
                    TileKind::WallH
                } else if dx == 0 || dx == POCKET_SIZE - 1 {
                    TileKind::WallV
                } else {
                    TileKind::Floor
                };
                level.grid.set_tile(pos, tile);
                level.grid.mark_explored(pos);
            }
        }
        level.grid.set_tile(center, TileKind::PocketExit);
        level.grid.set_tile(origin.offset(talisman_dy, talisman_dx), TileKind::TalismanPickup);
        level.talisman = talisman;
        level.pocket = Some(PocketVisit { saved, entry, via });

        self.player = center;
        match via {
            SecretEntry::Stair => self.set_message(
                "You descend the mysterious stairs into a secret Talisman room!",
            ),
            SecretEntry::Wall => self.set_message("You enter a secret Talisman room!"),
        }
        self.push_log(LogEvent::PocketEntered { via });
    }

    /// Movement inside the chamber: confined to the chamber radius and never
    /// onto walls.
    pub(super) fn pocket_step(&mut self, delta: Pos) {
        let target = Pos { y: self.player.y + delta.y, x: self.player.x + delta.x };
        let level = self.level();
        if !level.grid.in_bounds(target) {
            return;
        }
        if chebyshev(target, level.grid.center()) > POCKET_RADIUS {
            return;
        }
        if level.grid.tile_at(target).is_wall() {
            return;
        }
        self.player = target;
    }

    /// Confirm near the exit marker restores the real level and stamps the
    /// entry cell as permanently revealed.
    pub(super) fn try_exit_pocket(&mut self) {
        let index = self.current_level - 1;
        let center = self.levels[index].grid.center();
        if chebyshev(self.player, center) > 1 {
            return;
        }
        let Some(visit) = self.levels[index].pocket.take() else {
            return;
        };

        self.levels[index].grid.restore(&visit.saved);
        self.player = visit.entry;
        if let Some(cell) = self.levels[index].grid.cell_mut(visit.entry) {
            cell.explored = true;
            cell.secret_revealed = true;
        }
        self.set_message("You return from the secret room.");
        self.push_log(LogEvent::PocketExited { entry: visit.entry });
    }
}
