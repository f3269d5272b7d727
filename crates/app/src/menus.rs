//! Modal overlays: the food, weapon, and talisman browsers. Each blocks for
//! its own key and returns any action the core should journal.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEventKind},
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use delve_core::{
    FOOD_CAP, Game, InputPayload, MenuKind, TALISMAN_KINDS, WEAPON_KINDS, content,
};

const BOX_WIDTH: usize = 40;

pub fn run_menu(
    out: &mut impl Write,
    game: &mut Game,
    kind: MenuKind,
) -> io::Result<Option<InputPayload>> {
    match kind {
        MenuKind::Food => food_menu(out, game),
        MenuKind::Weapon => weapon_menu(out, game),
        MenuKind::Talisman => talisman_menu(out, game),
    }
}

fn food_menu(out: &mut impl Write, game: &mut Game) -> io::Result<Option<InputPayload>> {
    let lines = vec![
        "Food Menu".to_string(),
        String::new(),
        format!("Hunger: {:3}/100", game.stats.hunger),
        format!("Food Items: {}/{}", game.stats.food_count, FOOD_CAP),
        String::new(),
        "Press E to eat food".to_string(),
        "Press any other key to close".to_string(),
    ];
    draw_box(out, game, &lines)?;

    if let KeyCode::Char(c) = wait_for_key()?
        && c.eq_ignore_ascii_case(&'e')
    {
        game.eat_food();
        return Ok(Some(InputPayload::Eat));
    }
    Ok(None)
}

fn weapon_menu(out: &mut impl Write, game: &mut Game) -> io::Result<Option<InputPayload>> {
    let current = content::weapon_info(game.current_weapon);
    let mut lines = vec![
        "Weapon Inventory".to_string(),
        format!("Current Weapon: {} {}", current.name, current.symbol),
        String::new(),
    ];
    for (index, kind) in WEAPON_KINDS.iter().enumerate() {
        let info = content::weapon_info(*kind);
        let tag = if game.weapon_owned(*kind) { "[OWNED]" } else { "[NOT FOUND]" };
        lines.push(format!("{}. {} {} {}", index + 1, info.symbol, info.name, tag));
    }
    lines.push(String::new());
    lines.push("Press 1-5 to equip weapon".to_string());
    lines.push("Press any other key to close".to_string());
    draw_box(out, game, &lines)?;

    if let KeyCode::Char(c) = wait_for_key()?
        && let Some(index) = c.to_digit(10)
        && (1..=WEAPON_KINDS.len() as u32).contains(&index)
    {
        let kind = WEAPON_KINDS[(index - 1) as usize];
        if game.equip_weapon(kind) {
            return Ok(Some(InputPayload::EquipWeapon(kind)));
        }
    }
    Ok(None)
}

fn talisman_menu(out: &mut impl Write, game: &mut Game) -> io::Result<Option<InputPayload>> {
    let mut lines = vec!["Talisman Collection".to_string(), String::new()];
    for kind in TALISMAN_KINDS {
        let info = content::talisman_info(kind);
        let tag = if game.talisman_owned(kind) { "[ACTIVE]" } else { "[NOT FOUND]" };
        lines.push(format!("\u{25c6} {} {}", info.name, tag));
    }
    lines.push(String::new());
    lines.push("Press any key to close".to_string());
    draw_box(out, game, &lines)?;

    wait_for_key()?;
    Ok(None)
}

fn draw_box(out: &mut impl Write, game: &Game, lines: &[String]) -> io::Result<()> {
    let grid = &game.level().grid;
    let box_height = lines.len() + 2;
    let left = (grid.width.saturating_sub(BOX_WIDTH) / 2) as u16;
    let top = (grid.height.saturating_sub(box_height) / 2) as u16;

    queue!(out, SetForegroundColor(Color::Cyan))?;
    queue!(out, MoveTo(left, top), Print(format!("╔{}╗", "═".repeat(BOX_WIDTH - 2))))?;
    for (row, line) in lines.iter().enumerate() {
        let mut body = line.clone();
        body.truncate(BOX_WIDTH - 4);
        queue!(
            out,
            MoveTo(left, top + 1 + row as u16),
            Print(format!("║ {body:<width$} ║", width = BOX_WIDTH - 4))
        )?;
    }
    queue!(
        out,
        MoveTo(left, top + (box_height - 1) as u16),
        Print(format!("╚{}╝", "═".repeat(BOX_WIDTH - 2))),
        ResetColor
    )?;
    out.flush()
}

fn wait_for_key() -> io::Result<KeyCode> {
    loop {
        if let Event::Key(key) = event::read()?
            && key.kind != KeyEventKind::Release
        {
            return Ok(key.code);
        }
    }
}
