pub mod content;
pub mod game;
pub mod grid;
pub mod journal;
pub mod journal_file;
pub mod level;
pub mod levelgen;
pub mod replay;
pub mod types;

pub use game::{Game, PlayerStats, SessionProfile, TalismanState, WeaponState};
pub use grid::{Cell, Grid, GridSnapshot};
pub use journal::{InputJournal, InputPayload, InputRecord};
pub use level::{Level, PocketVisit, Room, SecretRoom};
pub use replay::{ReplayError, ReplayResult, replay_to_end};
pub use types::*;
