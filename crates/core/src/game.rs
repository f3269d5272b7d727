//! Session aggregate and per-turn orchestration. The submodules extend
//! [`Game`] with one concern each; this file owns the shared state and the
//! accessors everything else leans on.

use rand_chacha::ChaCha8Rng;

use crate::content;
use crate::level::Level;
use crate::types::{
    Dir, LogEvent, MESSAGE_DURATION, Pos, TALISMAN_KINDS, TalismanKind, WEAPON_KINDS, WeaponKind,
};

mod bootstrap;
mod items;
mod pocket;
mod resolver;
mod transition;
mod visibility;

#[cfg(test)]
mod test_support;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerStats {
    pub health: i32,
    pub strength: i32,
    pub gold: u32,
    pub armor: i32,
    pub exp: i32,
    pub games_played: u32,
    pub food_count: u32,
    pub hunger: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponState {
    pub kind: WeaponKind,
    pub owned: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TalismanState {
    pub kind: TalismanKind,
    pub owned: bool,
}

/// What the persistence collaborator hands over at session start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionProfile {
    pub exp: i32,
    pub games_played: u32,
}

#[derive(Clone, Debug)]
struct Message {
    text: String,
    turns_left: u32,
}

#[derive(Clone, Copy, Debug)]
struct PendingArrow {
    dir: Dir,
    at_ms: u64,
}

#[derive(Debug)]
pub struct Game {
    seed: u64,
    rng: ChaCha8Rng,
    pub levels: Vec<Level>,
    /// 1-based, like the level numbers shown to the player.
    pub current_level: usize,
    pub player: Pos,
    pub stats: PlayerStats,
    pub weapons: [WeaponState; WEAPON_KINDS.len()],
    pub current_weapon: WeaponKind,
    pub talismans: [TalismanState; TALISMAN_KINDS.len()],
    pub debug_mode: bool,
    message: Option<Message>,
    turn: u64,
    hunger_timer: u32,
    fast_travel_armed: bool,
    pending_arrow: Option<PendingArrow>,
    log: Vec<LogEvent>,
}

impl Game {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn level(&self) -> &Level {
        &self.levels[self.current_level - 1]
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.levels[self.current_level - 1]
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|message| message.text.as_str())
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn weapon_owned(&self, kind: WeaponKind) -> bool {
        self.weapons.iter().any(|weapon| weapon.kind == kind && weapon.owned)
    }

    pub fn talisman_owned(&self, kind: TalismanKind) -> bool {
        self.talismans.iter().any(|talisman| talisman.kind == kind && talisman.owned)
    }

    pub(crate) fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some(Message { text: text.into(), turns_left: MESSAGE_DURATION });
    }

    pub(crate) fn push_log(&mut self, event: LogEvent) {
        self.log.push(event);
    }

    fn tick_message(&mut self) {
        if let Some(message) = &mut self.message {
            if message.turns_left == 0 {
                self.message = None;
            } else {
                message.turns_left -= 1;
            }
        }
    }

    /// Canonical digest of the observable session state; two sessions fed
    /// the same seed and inputs must agree on it.
    pub fn snapshot_hash(&self) -> u64 {
        use std::hash::Hasher;

        use xxhash_rust::xxh3::Xxh3;

        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.turn);
        hasher.write_usize(self.current_level);
        hasher.write_i32(self.player.y);
        hasher.write_i32(self.player.x);
        hasher.write_i32(self.stats.health);
        hasher.write_i32(self.stats.strength);
        hasher.write_u32(self.stats.gold);
        hasher.write_i32(self.stats.exp);
        hasher.write_u32(self.stats.food_count);
        hasher.write_i32(self.stats.hunger);
        for weapon in &self.weapons {
            hasher.write_u8(u8::from(weapon.owned));
        }
        for talisman in &self.talismans {
            hasher.write_u8(u8::from(talisman.owned));
        }
        for cell in &self.level().grid.cells {
            hasher.write_u8(cell.tile.symbol() as u8);
            let flags = u8::from(cell.explored)
                | u8::from(cell.trap) << 1
                | u8::from(cell.trap_discovered) << 2
                | u8::from(cell.secret_wall) << 3
                | u8::from(cell.secret_stair) << 4
                | u8::from(cell.secret_revealed) << 5;
            hasher.write_u8(flags);
            hasher.write_u32(cell.coin.unwrap_or(0));
        }
        hasher.finish()
    }
}

pub(crate) fn chebyshev(a: Pos, b: Pos) -> i32 {
    (a.y - b.y).abs().max((a.x - b.x).abs())
}

pub(crate) fn starting_weapons() -> [WeaponState; WEAPON_KINDS.len()] {
    WEAPON_KINDS.map(|kind| WeaponState { kind, owned: content::weapon_info(kind).starts_owned })
}

pub(crate) fn starting_talismans() -> [TalismanState; TALISMAN_KINDS.len()] {
    TALISMAN_KINDS.map(|kind| TalismanState { kind, owned: false })
}
