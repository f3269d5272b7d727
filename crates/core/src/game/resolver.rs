//! The per-turn state machine: one input symbol in, one outcome out.
//! This module exists to keep dispatch order and movement rules auditable.
//! It does not own pickup effects, pocket internals, or transitions.

use super::{Game, PendingArrow};
use crate::levelgen::rand_below;
use crate::types::{
    DIAGONAL_COMBO_MS, Dir, InputEvent, InputKey, LogEvent, MenuKind, Pos, RunOutcome,
    SecretEntry, TREASURE_LEVEL, TileKind, TurnOutcome,
};

/// Turns between hunger drops.
const HUNGER_INTERVAL: u32 = 100;
/// At or below this hunger, every drop also costs health.
const STARVATION_THRESHOLD: i32 = 20;

impl Game {
    /// Resolve one turn. Every call advances the turn counter, ages the
    /// status message, and runs the hunger clock before dispatching the key.
    pub fn handle_input(&mut self, event: InputEvent) -> TurnOutcome {
        self.turn += 1;
        self.tick_message();
        self.tick_hunger();
        if self.stats.health <= 0 {
            return TurnOutcome::Finished(RunOutcome::Death);
        }

        match event.key {
            InputKey::Quit => return TurnOutcome::Finished(RunOutcome::Quit),
            InputKey::DebugToggle => {
                self.debug_mode = !self.debug_mode;
                self.set_message(if self.debug_mode {
                    "Debug mode activated."
                } else {
                    "Debug mode deactivated."
                });
                self.update_visibility();
                return TurnOutcome::Continue;
            }
            InputKey::Regenerate => {
                self.regenerate_level();
                return TurnOutcome::Continue;
            }
            InputKey::FoodMenu => return TurnOutcome::MenuRequested(MenuKind::Food),
            InputKey::WeaponMenu => return TurnOutcome::MenuRequested(MenuKind::Weapon),
            InputKey::TalismanMenu => return TurnOutcome::MenuRequested(MenuKind::Talisman),
            InputKey::FastTravel => {
                self.fast_travel_armed = true;
                self.set_message("Fast travel mode: Press direction key (W/A/S/D)");
                return TurnOutcome::Continue;
            }
            _ => {}
        }

        if self.fast_travel_armed {
            self.fast_travel_armed = false;
            if let InputKey::Move(dir) = event.key
                && self.level().pocket.is_none()
            {
                return self.fast_travel(dir);
            }
            // Anything else disarms and is consumed.
            return TurnOutcome::Continue;
        }

        if self.level().in_pocket() {
            match event.key {
                InputKey::Move(dir) => self.pocket_step(dir.delta()),
                InputKey::Arrow(_) => {
                    if let Some(step) = self.buffer_arrow(event) {
                        self.pocket_step(step);
                    }
                }
                InputKey::Confirm => {
                    self.claim_talisman_near();
                    self.try_exit_pocket();
                }
                _ => {}
            }
            self.update_visibility();
            return TurnOutcome::Continue;
        }

        let outcome = match event.key {
            InputKey::Move(dir) => self.step_player(dir.delta()),
            InputKey::Arrow(_) => match self.buffer_arrow(event) {
                Some(step) => self.step_player(step),
                None => TurnOutcome::Continue,
            },
            InputKey::Confirm => self.confirm(),
            _ => TurnOutcome::Continue,
        };
        self.update_visibility();
        outcome
    }

    /// One movement step with wall rejection, secret-wall discovery, trap
    /// triggering, and coin collection.
    fn step_player(&mut self, delta: Pos) -> TurnOutcome {
        let target = Pos { y: self.player.y + delta.y, x: self.player.x + delta.x };
        if !self.level().grid.in_bounds(target) {
            return TurnOutcome::Continue;
        }
        let cell = self.level().grid.cell(target);
        if cell.secret_wall && !cell.secret_revealed {
            self.set_message(
                "You sense something strange about this wall. Press Enter to investigate.",
            );
            return TurnOutcome::Continue;
        }
        if cell.tile.blocks_movement() {
            return TurnOutcome::Continue;
        }

        if cell.trap && !cell.trap_discovered {
            self.trigger_trap(target);
        }
        if let Some(value) = self.level().grid.cell(target).coin {
            self.collect_coin(target, value);
        }
        self.player = target;

        if self.stats.health <= 0 {
            return TurnOutcome::Finished(RunOutcome::Death);
        }
        TurnOutcome::Continue
    }

    /// Confirm on the current cell: talisman claim, then the cell's own
    /// pickup or stair, then secret entries.
    fn confirm(&mut self) -> TurnOutcome {
        self.claim_talisman_near();

        match self.level().grid.tile_at(self.player) {
            TileKind::Food => self.pickup_food(),
            TileKind::WeaponCache => self.pickup_weapon(),
            TileKind::StairsNext => {
                if self.current_level == TREASURE_LEVEL {
                    return TurnOutcome::Finished(RunOutcome::Victory);
                }
                self.ascend();
                return TurnOutcome::Continue;
            }
            TileKind::StairsPrev => {
                if self.current_level > 1 {
                    self.descend();
                }
                return TurnOutcome::Continue;
            }
            _ => {}
        }

        if self.level().grid.cell(self.player).secret_stair {
            self.enter_pocket(SecretEntry::Stair);
            return TurnOutcome::Continue;
        }
        if self.adjacent_secret_wall(self.player).is_some() {
            self.enter_pocket(SecretEntry::Wall);
        }
        TurnOutcome::Continue
    }

    /// Repeat steps in one direction until a wall, void, stair, or secret
    /// wall blocks the way. A trap fire stops the run on the spot.
    fn fast_travel(&mut self, dir: Dir) -> TurnOutcome {
        let delta = dir.delta();
        loop {
            let target = Pos { y: self.player.y + delta.y, x: self.player.x + delta.x };
            if !self.level().grid.in_bounds(target) {
                break;
            }
            let cell = self.level().grid.cell(target);
            if cell.tile.blocks_movement() || cell.tile.is_stairs() || cell.secret_wall {
                break;
            }
            self.player = target;
            self.update_visibility();
            if cell.trap && !cell.trap_discovered {
                self.trigger_trap(target);
                if self.stats.health <= 0 {
                    return TurnOutcome::Finished(RunOutcome::Death);
                }
                break;
            }
        }
        TurnOutcome::Continue
    }

    /// Arrow keys only ever move diagonally: the first press is buffered,
    /// and a second press on the other axis within the window resolves to
    /// one diagonal step. A stale or same-axis press replaces the buffer.
    fn buffer_arrow(&mut self, event: InputEvent) -> Option<Pos> {
        let InputKey::Arrow(dir) = event.key else {
            return None;
        };
        if let Some(pending) = self.pending_arrow.take()
            && event.at_ms.saturating_sub(pending.at_ms) < DIAGONAL_COMBO_MS
            && pending.dir.is_vertical() != dir.is_vertical()
        {
            let vertical = if pending.dir.is_vertical() { pending.dir } else { dir };
            let horizontal = if pending.dir.is_vertical() { dir } else { pending.dir };
            return Some(Pos {
                y: vertical.delta().y,
                x: horizontal.delta().x,
            });
        }
        self.pending_arrow = Some(PendingArrow { dir, at_ms: event.at_ms });
        None
    }

    fn trigger_trap(&mut self, pos: Pos) {
        let damage = 2 + rand_below(&mut self.rng, 3);
        self.stats.health -= damage;
        if let Some(cell) = self.level_mut().grid.cell_mut(pos) {
            cell.trap_discovered = true;
        }
        self.set_message(format!("You triggered a trap! Lost {damage} health!"));
        self.push_log(LogEvent::TrapTriggered { pos, damage });
    }

    fn collect_coin(&mut self, pos: Pos, value: u32) {
        self.stats.gold += value;
        if let Some(cell) = self.level_mut().grid.cell_mut(pos) {
            cell.coin = None;
            cell.tile = TileKind::Floor;
        }
        self.set_message(if value == 1 {
            "You found a gold coin! (+1 gold)"
        } else {
            "You found a rare black coin! (+5 gold)"
        });
        self.push_log(LogEvent::CoinCollected { pos, value });
    }

    fn tick_hunger(&mut self) {
        self.hunger_timer += 1;
        if self.hunger_timer < HUNGER_INTERVAL {
            return;
        }
        self.hunger_timer = 0;
        if self.stats.hunger > 0 {
            self.stats.hunger -= 1;
        }
        if self.stats.hunger <= STARVATION_THRESHOLD && self.stats.health > 0 {
            self.stats.health -= 1;
            self.set_message("You are starving!");
            self.push_log(LogEvent::Starving);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{fresh_game, key, prepared_arena};
    use super::*;

    #[test]
    fn walking_into_walls_and_void_is_a_silent_no_op() {
        let mut game = prepared_arena(1);
        let start = game.player;
        // The arena wraps the player in floor; wall it off to the east.
        let east = start.offset(0, 1);
        game.level_mut().grid.set_tile(east, TileKind::WallV);

        game.handle_input(key(InputKey::Move(Dir::East)));
        assert_eq!(game.player, start);
        assert_eq!(game.message(), None);
    }

    #[test]
    fn unrecognized_host_symbols_never_reach_the_core() {
        // The vocabulary is closed by construction; this documents that a
        // plain confirm on empty floor changes nothing observable.
        let mut game = prepared_arena(2);
        let hash = game.snapshot_hash();
        game.handle_input(key(InputKey::Confirm));
        // Turn counter moves, the grid does not.
        assert_ne!(game.snapshot_hash(), hash);
        assert_eq!(game.stats.gold, 0);
    }

    #[test]
    fn traps_fire_once_per_cell() {
        let mut game = prepared_arena(3);
        let start = game.player;
        let east = start.offset(0, 1);
        if let Some(cell) = game.level_mut().grid.cell_mut(east) {
            cell.trap = true;
        }

        game.handle_input(key(InputKey::Move(Dir::East)));
        let health_after_first = game.stats.health;
        assert!(health_after_first < 12);
        assert!((2..=4).contains(&(12 - health_after_first)));
        assert!(game.level().grid.cell(east).trap_discovered);

        // Step off and back on: no second charge.
        game.handle_input(key(InputKey::Move(Dir::West)));
        game.handle_input(key(InputKey::Move(Dir::East)));
        assert_eq!(game.stats.health, health_after_first);
    }

    #[test]
    fn coins_collect_exactly_once() {
        let mut game = prepared_arena(4);
        let start = game.player;
        let east = start.offset(0, 1);
        if let Some(cell) = game.level_mut().grid.cell_mut(east) {
            cell.tile = TileKind::RareCoin;
            cell.coin = Some(5);
        }

        game.handle_input(key(InputKey::Move(Dir::East)));
        assert_eq!(game.stats.gold, 5);
        assert_eq!(game.level().grid.tile_at(east), TileKind::Floor);
        assert_eq!(game.level().grid.cell(east).coin, None);

        game.handle_input(key(InputKey::Move(Dir::West)));
        game.handle_input(key(InputKey::Move(Dir::East)));
        assert_eq!(game.stats.gold, 5);
    }

    #[test]
    fn secret_wall_blocks_with_a_discovery_prompt() {
        let mut game = prepared_arena(5);
        let start = game.player;
        let east = start.offset(0, 1);
        if let Some(cell) = game.level_mut().grid.cell_mut(east) {
            cell.tile = TileKind::WallV;
            cell.secret_wall = true;
        }

        game.handle_input(key(InputKey::Move(Dir::East)));
        assert_eq!(game.player, start);
        assert!(game.message().is_some_and(|text| text.contains("strange")));
    }

    #[test]
    fn fast_travel_runs_to_the_wall_and_stops_before_stairs() {
        let mut game = prepared_arena(6);
        let start = game.player;
        // Floor corridor east of the player ends in a stair.
        game.level_mut().grid.set_tile(start.offset(0, 4), TileKind::StairsNext);

        game.handle_input(key(InputKey::FastTravel));
        game.handle_input(key(InputKey::Move(Dir::East)));
        assert_eq!(game.player, start.offset(0, 3), "fast travel must halt before the stair");
    }

    #[test]
    fn fast_travel_stops_on_the_trap_that_fires() {
        let mut game = prepared_arena(7);
        let start = game.player;
        if let Some(cell) = game.level_mut().grid.cell_mut(start.offset(0, 2)) {
            cell.trap = true;
        }

        game.handle_input(key(InputKey::FastTravel));
        game.handle_input(key(InputKey::Move(Dir::East)));
        assert_eq!(game.player, start.offset(0, 2));
        assert!(game.stats.health < 12);
    }

    #[test]
    fn fast_travel_disarms_on_any_other_key() {
        let mut game = prepared_arena(8);
        let start = game.player;
        game.handle_input(key(InputKey::FastTravel));
        game.handle_input(key(InputKey::Confirm));
        // The next movement key is a normal single step.
        game.handle_input(key(InputKey::Move(Dir::East)));
        assert_eq!(game.player, start.offset(0, 1));
    }

    #[test]
    fn arrows_pair_into_a_diagonal_inside_the_window() {
        let mut game = prepared_arena(9);
        let start = game.player;
        game.handle_input(InputEvent::new(InputKey::Arrow(Dir::North), 1_000));
        assert_eq!(game.player, start, "a lone arrow never moves");
        game.handle_input(InputEvent::new(InputKey::Arrow(Dir::East), 1_150));
        assert_eq!(game.player, start.offset(-1, 1));
    }

    #[test]
    fn stale_arrows_do_not_combine() {
        let mut game = prepared_arena(10);
        let start = game.player;
        game.handle_input(InputEvent::new(InputKey::Arrow(Dir::North), 1_000));
        game.handle_input(InputEvent::new(InputKey::Arrow(Dir::East), 1_300));
        assert_eq!(game.player, start, "window expired; the second arrow re-buffers");
        // The re-buffered east arrow can still pair with a fresh vertical.
        game.handle_input(InputEvent::new(InputKey::Arrow(Dir::South), 1_400));
        assert_eq!(game.player, start.offset(1, 1));
    }

    #[test]
    fn same_axis_arrows_replace_the_buffer() {
        let mut game = prepared_arena(11);
        let start = game.player;
        game.handle_input(InputEvent::new(InputKey::Arrow(Dir::North), 1_000));
        game.handle_input(InputEvent::new(InputKey::Arrow(Dir::North), 1_050));
        assert_eq!(game.player, start);
        game.handle_input(InputEvent::new(InputKey::Arrow(Dir::West), 1_100));
        assert_eq!(game.player, start.offset(-1, -1));
    }

    #[test]
    fn quit_ends_the_session_immediately() {
        let mut game = fresh_game(12);
        assert_eq!(
            game.handle_input(key(InputKey::Quit)),
            TurnOutcome::Finished(RunOutcome::Quit)
        );
    }

    #[test]
    fn menu_keys_surface_menu_requests() {
        let mut game = fresh_game(13);
        assert_eq!(
            game.handle_input(key(InputKey::FoodMenu)),
            TurnOutcome::MenuRequested(MenuKind::Food)
        );
        assert_eq!(
            game.handle_input(key(InputKey::WeaponMenu)),
            TurnOutcome::MenuRequested(MenuKind::Weapon)
        );
        assert_eq!(
            game.handle_input(key(InputKey::TalismanMenu)),
            TurnOutcome::MenuRequested(MenuKind::Talisman)
        );
    }

    #[test]
    fn debug_toggle_reveals_everything() {
        let mut game = fresh_game(14);
        game.handle_input(key(InputKey::DebugToggle));
        assert!(game.debug_mode);
        let level = game.level();
        for y in 0..level.grid.height as i32 {
            for x in 0..level.grid.width as i32 {
                let pos = Pos { y, x };
                let tile = level.grid.tile_at(pos);
                if tile != TileKind::Void && !level.grid.cell(pos).secret_stair {
                    assert_ne!(level.grid.rendered_at(pos), ' ', "{pos:?} hidden in debug mode");
                }
            }
        }
    }

    #[test]
    fn hunger_drops_every_hundred_turns_and_starves_at_the_threshold() {
        let mut game = prepared_arena(15);
        game.stats.hunger = 22;
        for _ in 0..100 {
            game.handle_input(key(InputKey::Confirm));
        }
        assert_eq!(game.stats.hunger, 21);
        assert_eq!(game.stats.health, 12, "above the threshold nothing starves");

        for _ in 0..100 {
            game.handle_input(key(InputKey::Confirm));
        }
        assert_eq!(game.stats.hunger, 20);
        assert_eq!(game.stats.health, 11, "reaching the threshold costs health");
        assert!(game.log().contains(&LogEvent::Starving));
    }

    #[test]
    fn trap_death_finishes_the_run() {
        let mut game = prepared_arena(16);
        game.stats.health = 2;
        let east = game.player.offset(0, 1);
        if let Some(cell) = game.level_mut().grid.cell_mut(east) {
            cell.trap = true;
        }
        let outcome = game.handle_input(key(InputKey::Move(Dir::East)));
        assert_eq!(outcome, TurnOutcome::Finished(RunOutcome::Death));
    }
}
