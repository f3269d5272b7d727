//! Shared fixtures for the `game` submodule test suites.
//! This module exists to avoid repeating session and arena setup in tests.
//! It does not own production gameplay logic.

use super::{Game, SessionProfile};
use crate::types::{InputEvent, InputKey, Pos, TileKind};

pub(super) const TEST_WIDTH: usize = 80;
pub(super) const TEST_HEIGHT: usize = 24;

pub(super) fn fresh_game(seed: u64) -> Game {
    Game::new(seed, TEST_WIDTH, TEST_HEIGHT, SessionProfile::default())
        .expect("test dimensions fit a dungeon")
}

/// A zero-stamp input; timing only matters for arrow pairing.
pub(super) fn key(key: InputKey) -> InputEvent {
    InputEvent::new(key, 0)
}

/// A session whose current level is replaced by one open floor arena: no
/// rooms, everything explored, player at the grid center. Movement and
/// pickup tests get predictable surroundings this way.
pub(super) fn prepared_arena(seed: u64) -> Game {
    let mut game = fresh_game(seed);
    let center = {
        let level = game.level_mut();
        level.wipe();
        let height = level.grid.height as i32;
        let width = level.grid.width as i32;
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                if let Some(cell) = level.grid.cell_mut(Pos { y, x }) {
                    cell.tile = TileKind::Floor;
                    cell.explored = true;
                }
            }
        }
        level.grid.center()
    };
    game.player = center;
    game.update_visibility();
    game
}

/// Put the player on the current level's `>` stair, regenerating in the rare
/// case best-effort placement left the level without one.
pub(super) fn walk_to_advance_stairs(game: &mut Game) -> Pos {
    for _ in 0..10 {
        if let Some(stairs) = game.level().stairs_next {
            game.player = stairs;
            game.update_visibility();
            return stairs;
        }
        game.regenerate_level();
    }
    panic!("no generated level offered advance stairs");
}
