//! Key decoding: crossterm events down to the core's input vocabulary,
//! stamped with elapsed session milliseconds for diagonal pairing.

use std::io;
use std::time::Instant;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use delve_core::{Dir, InputEvent, InputKey};

/// Block until a key the core understands arrives. Returns `None` on a
/// terminal resize so the caller can repaint.
pub fn next_input(session_start: Instant) -> io::Result<Option<InputEvent>> {
    loop {
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if let Some(decoded) = decode(key.code) {
                    let at_ms = session_start.elapsed().as_millis() as u64;
                    return Ok(Some(InputEvent::new(decoded, at_ms)));
                }
                // Unrecognized symbols are no-ops for the core.
            }
            Event::Resize(..) => return Ok(None),
            _ => {}
        }
    }
}

pub fn decode(code: KeyCode) -> Option<InputKey> {
    match code {
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Some(InputKey::Move(Dir::North)),
            's' => Some(InputKey::Move(Dir::South)),
            'a' => Some(InputKey::Move(Dir::West)),
            'd' => Some(InputKey::Move(Dir::East)),
            'f' => Some(InputKey::FastTravel),
            'i' => Some(InputKey::WeaponMenu),
            't' => Some(InputKey::TalismanMenu),
            'e' => Some(InputKey::FoodMenu),
            'm' => Some(InputKey::DebugToggle),
            'r' => Some(InputKey::Regenerate),
            'q' => Some(InputKey::Quit),
            _ => None,
        },
        KeyCode::Up => Some(InputKey::Arrow(Dir::North)),
        KeyCode::Down => Some(InputKey::Arrow(Dir::South)),
        KeyCode::Left => Some(InputKey::Arrow(Dir::West)),
        KeyCode::Right => Some(InputKey::Arrow(Dir::East)),
        KeyCode::Enter => Some(InputKey::Confirm),
        _ => None,
    }
}
