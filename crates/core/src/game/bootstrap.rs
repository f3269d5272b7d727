//! Session construction: dimension validation, level allocation, and the
//! first level's generation.
//! It does not own per-turn resolution or level transitions.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use super::{Game, PlayerStats, SessionProfile, starting_talismans, starting_weapons};
use crate::level::Level;
use crate::levelgen;
use crate::types::{LogEvent, MAX_LEVELS, MIN_ROOM_SIZE, Pos, SetupError, WeaponKind};

/// The 3×3 placement lattice needs each cell to hold a minimum room plus its
/// one-cell inset.
const MIN_GRID_DIM: usize = (3 * (MIN_ROOM_SIZE + 2)) as usize;

impl Game {
    /// Allocate the whole session: five levels at the host-supplied grid
    /// dimensions (immutable from here on), the player's starting loadout,
    /// and a generated first level.
    pub fn new(
        seed: u64,
        width: usize,
        height: usize,
        profile: SessionProfile,
    ) -> Result<Self, SetupError> {
        if width < MIN_GRID_DIM || height < MIN_GRID_DIM {
            return Err(SetupError::GridTooSmall { width, height });
        }

        let rng = ChaCha8Rng::seed_from_u64(seed);
        let levels: Vec<Level> = (0..MAX_LEVELS).map(|_| Level::new(width, height)).collect();

        let mut game = Self {
            seed,
            rng,
            levels,
            current_level: 1,
            player: Pos { y: 0, x: 0 },
            stats: PlayerStats {
                health: 12,
                strength: 16,
                gold: 0,
                armor: 0,
                exp: profile.exp,
                games_played: profile.games_played,
                food_count: 0,
                hunger: 100,
            },
            weapons: starting_weapons(),
            current_weapon: WeaponKind::Mace,
            talismans: starting_talismans(),
            debug_mode: false,
            message: None,
            turn: 0,
            hunger_timer: 0,
            fast_travel_armed: false,
            pending_arrow: None,
            log: Vec::new(),
        };

        let summary = levelgen::generate_level(&mut game.levels[0], 1, &mut game.rng);
        game.player = summary.spawn;
        game.push_log(LogEvent::LevelGenerated {
            level: 1,
            rooms: game.levels[0].rooms.len(),
            restarts: summary.restarts,
        });
        if game.levels[0].stairs_next.is_none() {
            game.push_log(LogEvent::StairsUnplaced { level: 1 });
        }
        game.update_visibility();
        Ok(game)
    }

    /// Rebuild the current level from scratch; bound to the `r` key.
    pub fn regenerate_level(&mut self) {
        let index = self.current_level - 1;
        let summary =
            levelgen::generate_level(&mut self.levels[index], self.current_level, &mut self.rng);
        self.player = summary.spawn;
        self.push_log(LogEvent::LevelGenerated {
            level: self.current_level,
            rooms: self.levels[index].rooms.len(),
            restarts: summary.restarts,
        });
        if self.levels[index].stairs_next.is_none() {
            self.push_log(LogEvent::StairsUnplaced { level: self.current_level });
        }
        self.update_visibility();
    }
}
