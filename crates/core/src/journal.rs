//! In-memory session journal: the seed, the grid dimensions, and every
//! accepted input, in order. Feeding the same journal back through
//! [`crate::replay`] reproduces the session bit for bit.

use serde::{Deserialize, Serialize};

use crate::types::{InputEvent, WeaponKind};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputPayload {
    Key(InputEvent),
    Eat,
    EquipWeapon(WeaponKind),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub seq: u64,
    pub payload: InputPayload,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputJournal {
    pub format_version: u16,
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    pub inputs: Vec<InputRecord>,
}

impl InputJournal {
    pub fn new(seed: u64, width: usize, height: usize) -> Self {
        Self { format_version: 1, seed, width, height, inputs: Vec::new() }
    }

    pub fn append(&mut self, payload: InputPayload) {
        let seq = self.inputs.len() as u64;
        self.inputs.push(InputRecord { seq, payload });
    }
}
