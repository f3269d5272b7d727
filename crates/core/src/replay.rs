//! Headless journal replay: rebuild a session from its seed and inputs and
//! report where it ended up.

use crate::game::{Game, SessionProfile};
use crate::journal::{InputJournal, InputPayload};
use crate::types::{RunOutcome, SetupError, TurnOutcome};

#[derive(Debug, PartialEq, Eq)]
pub enum ReplayError {
    Setup(SetupError),
}

#[derive(Debug, PartialEq, Eq)]
pub struct ReplayResult {
    /// `None` when the journal ran out of inputs mid-session.
    pub outcome: Option<RunOutcome>,
    pub final_turn: u64,
    pub snapshot_hash: u64,
}

pub fn replay_to_end(journal: &InputJournal) -> Result<ReplayResult, ReplayError> {
    let mut game = Game::new(journal.seed, journal.width, journal.height, SessionProfile::default())
        .map_err(ReplayError::Setup)?;

    let mut outcome = None;
    for record in &journal.inputs {
        match &record.payload {
            InputPayload::Key(event) => {
                if let TurnOutcome::Finished(finished) = game.handle_input(*event) {
                    outcome = Some(finished);
                    break;
                }
            }
            InputPayload::Eat => game.eat_food(),
            InputPayload::EquipWeapon(kind) => {
                game.equip_weapon(*kind);
            }
        }
    }

    Ok(ReplayResult { outcome, final_turn: game.turn(), snapshot_hash: game.snapshot_hash() })
}
