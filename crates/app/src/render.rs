//! Frame painter: the rendered layer, discovered traps, the player glyph,
//! and the status area, queued as one batch and flushed once.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use delve_core::{Game, Pos, content};

/// Rows below the dungeon grid used for the separator, message, and stats.
pub const STATUS_RESERVED: usize = 4;

pub fn symbol_color(symbol: char) -> Color {
    match symbol {
        '>' | '<' | '%' => Color::Cyan,
        '+' | '?' => Color::Red,
        '|' | '_' | '$' => Color::Yellow,
        '.' => Color::Green,
        '*' => Color::Magenta,
        '&' | 'T' => Color::White,
        'W' => Color::Blue,
        _ => Color::Grey,
    }
}

pub fn player_color(setting: u8) -> Color {
    match setting {
        2 => Color::White,
        3 => Color::Red,
        4 => Color::Green,
        5 => Color::Cyan,
        6 => Color::Magenta,
        _ => Color::Yellow,
    }
}

pub fn draw(
    out: &mut impl Write,
    game: &Game,
    username: &str,
    character_color: u8,
) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;

    let level = game.level();
    let grid = &level.grid;
    for y in 0..grid.height {
        queue!(out, MoveTo(0, y as u16))?;
        for x in 0..grid.width {
            let pos = Pos { y: y as i32, x: x as i32 };
            let cell = grid.cell(pos);
            let show_trap = (game.debug_mode && cell.trap)
                || (cell.trap_discovered && (cell.explored || game.debug_mode));
            if show_trap {
                queue!(out, SetForegroundColor(Color::Red), Print('^'))?;
                continue;
            }
            let symbol = grid.rendered_at(pos);
            queue!(out, SetForegroundColor(symbol_color(symbol)), Print(symbol))?;
        }
    }

    queue!(
        out,
        MoveTo(game.player.x as u16, game.player.y as u16),
        SetForegroundColor(player_color(character_color)),
        Print('@')
    )?;

    let status_top = grid.height as u16;
    queue!(out, MoveTo(0, status_top), SetForegroundColor(Color::Cyan))?;
    for _ in 0..grid.width {
        queue!(out, Print('─'))?;
    }

    queue!(out, MoveTo(0, status_top + 1), SetForegroundColor(Color::White))?;
    if let Some(message) = game.message() {
        queue!(out, Print(message))?;
    }
    queue!(
        out,
        MoveTo(grid.width.saturating_sub(username.len() + 6) as u16, status_top + 1),
        SetForegroundColor(Color::Green),
        Print(format!("User: {username}"))
    )?;

    let stats = &game.stats;
    let weapon = content::weapon_info(game.current_weapon);
    queue!(
        out,
        MoveTo(0, status_top + 2),
        SetForegroundColor(Color::White),
        Print(format!(
            "Level: {}  Health: {}  Str: {}  Gold: {}  Armor: {}  Exp: {}  Hunger: {}  Wpn: {}",
            game.current_level,
            stats.health,
            stats.strength,
            stats.gold,
            stats.armor,
            stats.exp,
            stats.hunger,
            weapon.name,
        ))
    )?;

    queue!(out, ResetColor)?;
    out.flush()
}
