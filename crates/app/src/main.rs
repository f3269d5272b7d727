//! Entry point and session loop: terminal bracket, one blocking key per
//! turn, menus, and score persistence on the way out.

mod input;
mod journal_path;
mod menus;
mod render;
mod score_file;

use std::io::{Write, stdout};
use std::path::Path;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use delve_core::journal_file::JournalWriter;
use delve_core::{Game, RunOutcome, TurnOutcome};

use crate::render::STATUS_RESERVED;
use crate::score_file::{GameSettings, SCORE_FILE, SETTINGS_FILE, ScoreSnapshot};

fn main() -> Result<()> {
    let settings = GameSettings::load(Path::new(SETTINGS_FILE));
    let profile = score_file::load_profile(Path::new(SCORE_FILE), &settings.username);

    let (cols, rows) = terminal::size().context("query terminal size")?;
    let width = cols as usize;
    let height = (rows as usize).saturating_sub(STATUS_RESERVED);

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("read system clock for the session seed")?
        .as_nanos() as u64;
    let mut game = Game::new(seed, width, height, profile)
        .context("the terminal is too small for a dungeon; enlarge it and retry")?;

    let mut journal = journal_path::default_journal_path()
        .and_then(|path| JournalWriter::create(&path, seed, width, height).ok());

    terminal::enable_raw_mode().context("enter raw mode")?;
    execute!(stdout(), EnterAlternateScreen, cursor::Hide).context("enter alternate screen")?;
    let outcome = run_session(&mut game, &settings, &mut journal);
    execute!(stdout(), cursor::Show, LeaveAlternateScreen).ok();
    terminal::disable_raw_mode().ok();

    let outcome = outcome?;
    score_file::save_user_record(
        Path::new(SCORE_FILE),
        &settings.username,
        ScoreSnapshot {
            level: game.current_level,
            health: game.stats.health,
            strength: game.stats.strength,
            gold: game.stats.gold,
            armor: game.stats.armor,
            exp: game.stats.exp,
            games_played: game.stats.games_played,
        },
    )
    .context("update the score ledger")?;

    match outcome {
        RunOutcome::Victory => {
            println!("VICTORY!");
            println!("Total Gold Collected: {}", game.stats.gold);
            println!("Final Level Reached: {}", game.current_level);
            println!("Experience so far: {}", game.stats.exp + game.stats.gold as i32);
        }
        RunOutcome::Death => println!("Game Over! You died on level {}.", game.current_level),
        RunOutcome::Quit => println!("Until next time."),
    }
    Ok(())
}

fn run_session(
    game: &mut Game,
    settings: &GameSettings,
    journal: &mut Option<JournalWriter>,
) -> Result<RunOutcome> {
    let session_start = Instant::now();
    let mut out = stdout();

    loop {
        render::draw(&mut out, game, &settings.username, settings.character_color)
            .context("paint frame")?;

        let Some(event) = input::next_input(session_start).context("read input")? else {
            continue; // resize; repaint on the next pass
        };
        if let Some(writer) = journal {
            writer.append(&delve_core::InputPayload::Key(event)).ok();
        }

        match game.handle_input(event) {
            TurnOutcome::Continue => {}
            TurnOutcome::MenuRequested(kind) => {
                let action = menus::run_menu(&mut out, game, kind).context("run menu")?;
                if let (Some(writer), Some(payload)) = (journal.as_mut(), action) {
                    writer.append(&payload).ok();
                }
                // Menus repaint over the dungeon; rebuild the rendered layer.
                game.update_visibility();
            }
            TurnOutcome::Finished(outcome) => {
                out.flush().ok();
                return Ok(outcome);
            }
        }
    }
}
