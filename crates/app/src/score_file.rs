//! Flat-file persistence: the per-user score ledger and the settings file.
//!
//! `user_score.txt` holds one `Key: value` block per user and is rewritten
//! wholesale on every update. `game_settings.txt` supplies the username and
//! the player glyph color.

use std::fs;
use std::io;
use std::path::Path;

use delve_core::SessionProfile;

pub const SCORE_FILE: &str = "user_score.txt";
pub const SETTINGS_FILE: &str = "game_settings.txt";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSettings {
    pub username: String,
    pub character_color: u8,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self { username: "Guest".to_string(), character_color: 1 }
    }
}

impl GameSettings {
    pub fn load(path: &Path) -> Self {
        let mut settings = Self::default();
        let Ok(content) = fs::read_to_string(path) else {
            return settings;
        };
        for line in content.lines() {
            if let Some(name) = line.strip_prefix("Username:") {
                let name = name.trim();
                if !name.is_empty() {
                    settings.username = name.to_string();
                }
            } else if let Some(color) = line.strip_prefix("CharacterColor:")
                && let Ok(color) = color.trim().parse()
            {
                settings.character_color = color;
            }
        }
        settings
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub level: usize,
    pub health: i32,
    pub strength: i32,
    pub gold: u32,
    pub armor: i32,
    pub exp: i32,
    pub games_played: u32,
}

/// The session's final attribute values, as the core reports them.
#[derive(Clone, Copy, Debug)]
pub struct ScoreSnapshot {
    pub level: usize,
    pub health: i32,
    pub strength: i32,
    pub gold: u32,
    pub armor: i32,
    pub exp: i32,
    pub games_played: u32,
}

fn guest(username: &str) -> bool {
    username.is_empty() || username == "Guest"
}

/// Experience and games-played for the named user, for session start.
pub fn load_profile(path: &Path, username: &str) -> SessionProfile {
    if guest(username) {
        return SessionProfile::default();
    }
    read_records(path)
        .into_iter()
        .find(|record| record.username == username)
        .map(|record| SessionProfile { exp: record.exp, games_played: record.games_played })
        .unwrap_or_default()
}

/// Rewrite the ledger with this session folded in: gold joins experience and
/// the play count goes up by one. Guests are never persisted.
pub fn save_user_record(path: &Path, username: &str, snapshot: ScoreSnapshot) -> io::Result<()> {
    if guest(username) {
        return Ok(());
    }

    let mut records = read_records(path);
    let updated = UserRecord {
        username: username.to_string(),
        level: snapshot.level,
        health: snapshot.health,
        strength: snapshot.strength,
        gold: snapshot.gold,
        armor: snapshot.armor,
        exp: snapshot.exp + snapshot.gold as i32,
        games_played: snapshot.games_played + 1,
    };
    match records.iter_mut().find(|record| record.username == username) {
        Some(record) => *record = updated,
        None => records.push(updated),
    }

    let mut content = String::new();
    for record in &records {
        content.push_str(&format!(
            "Username: {}\nLevel: {}\nHit: {}\nStrength: {}\nGold: {}\nArmor: {}\nExp: {}\nGames Played: {}\n\n",
            record.username,
            record.level,
            record.health,
            record.strength,
            record.gold,
            record.armor,
            record.exp,
            record.games_played,
        ));
    }
    fs::write(path, content)
}

pub fn read_records(path: &Path) -> Vec<UserRecord> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };

    let mut records = Vec::new();
    let mut current: Option<UserRecord> = None;
    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key {
            "Username" => {
                if let Some(done) = current.take() {
                    records.push(done);
                }
                current = Some(UserRecord {
                    username: value.to_string(),
                    level: 1,
                    health: 0,
                    strength: 0,
                    gold: 0,
                    armor: 0,
                    exp: 0,
                    games_played: 0,
                });
            }
            _ => {
                let Some(record) = current.as_mut() else {
                    continue;
                };
                match key {
                    "Level" => record.level = value.parse().unwrap_or(1),
                    "Hit" => record.health = value.parse().unwrap_or(0),
                    "Strength" => record.strength = value.parse().unwrap_or(0),
                    "Gold" => record.gold = value.parse().unwrap_or(0),
                    "Armor" => record.armor = value.parse().unwrap_or(0),
                    "Exp" => record.exp = value.parse().unwrap_or(0),
                    "Games Played" => record.games_played = value.parse().unwrap_or(0),
                    _ => {}
                }
            }
        }
    }
    if let Some(done) = current.take() {
        records.push(done);
    }
    records
}
