//! Procedural level construction: room placement on a 3×3 cell lattice,
//! L-shaped corridors with door conversion, feature scattering, secret
//! embedding, stair placement, and the terminal treasure chamber.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

use crate::grid::Grid;
use crate::level::{Level, Room, SecretRoom};
use crate::types::{
    MAX_ROOM_SIZE, MAX_ROOMS, MIN_ROOM_SIZE, Pos, STATUS_ROWS, TREASURE_LEVEL, TileKind,
};

/// Placement attempts per pass before the pass is judged.
const PLACEMENT_ATTEMPTS: u32 = 50;
/// Full wipe-and-restart passes allowed when a pass ends under six rooms.
/// After the ceiling the sparser layout is accepted, so generation always
/// terminates.
const RESTART_CEILING: u32 = 32;
const MIN_ACCEPTED_ROOMS: usize = 6;
const STAIR_ATTEMPTS: u32 = 100;
const SECRET_FEATURE_ATTEMPTS: u32 = 10;
const WEAPON_PLACEMENT_ATTEMPTS: u32 = 32;

/// What a from-scratch generation hands back to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenSummary {
    pub spawn: Pos,
    pub restarts: u32,
}

pub(crate) fn rand_below(rng: &mut ChaCha8Rng, bound: i32) -> i32 {
    debug_assert!(bound > 0);
    (rng.next_u32() % bound as u32) as i32
}

pub(crate) fn rand_range(rng: &mut ChaCha8Rng, low: i32, high: i32) -> i32 {
    low + rand_below(rng, high - low + 1)
}

pub(crate) fn chance(rng: &mut ChaCha8Rng, percent: i32) -> bool {
    rand_below(rng, 100) < percent
}

/// Populate `level` from scratch for the given 1-based level index. Level 5
/// gets the treasure layout; everything else gets the regular algorithm.
pub fn generate_level(level: &mut Level, level_index: usize, rng: &mut ChaCha8Rng) -> GenSummary {
    if level_index == TREASURE_LEVEL {
        return generate_treasure_level(level, rng);
    }

    let height = level.grid.height as i32;
    let cell_width = level.grid.width as i32 / 3;
    let cell_height = height / 3;
    let target_rooms = rand_range(rng, MIN_ACCEPTED_ROOMS as i32, MAX_ROOMS as i32) as usize;

    let mut restarts = 0_u32;
    loop {
        level.wipe();
        let mut attempts = 0_u32;
        while level.rooms.len() < target_rooms && attempts < PLACEMENT_ATTEMPTS {
            attempts += 1;
            let slot = level.rooms.len();
            let Some(room) = roll_room_in_cell(
                rng,
                (slot % 3) as i32,
                (slot / 3) as i32,
                cell_width,
                cell_height,
                height,
            ) else {
                continue;
            };
            if level.rooms.iter().any(|existing| existing.overlaps_with_margin(&room)) {
                continue;
            }
            let stock_weapon = level.rooms.is_empty();
            draw_room(&mut level.grid, &room, rng, stock_weapon);
            level.rooms.push(room);
        }
        if level.rooms.len() >= MIN_ACCEPTED_ROOMS || restarts >= RESTART_CEILING {
            break;
        }
        restarts += 1;
    }
    if level.rooms.is_empty() {
        place_fallback_room(level, rng);
    }

    for i in 1..level.rooms.len() {
        let from = level.rooms[i - 1].center();
        let to = level.rooms[i].center();
        carve_corridor(&mut level.grid, from, to);
        convert_walls_to_doors(&mut level.grid);
        level.rooms[i - 1].connected = true;
        level.rooms[i].connected = true;
    }

    for i in 0..level.rooms.len() {
        let room = level.rooms[i];
        add_secret_stairs(level, &room, rng);
    }
    for i in 0..level.rooms.len() {
        let room = level.rooms[i];
        add_secret_wall(level, &room, rng);
    }

    // Best effort; the level is accepted even when every probe fails.
    place_advance_stairs(level, rng);

    let spawn = level.rooms[0].center();
    let spawn_room = level.rooms[0];
    mark_room_explored(&mut level.grid, &spawn_room);
    GenSummary { spawn, restarts }
}

/// Extend a level that already holds its copied entry room: place up to
/// eight further rooms anywhere on the grid, chain them with corridors, and
/// give the newest room this level's own advance stairs.
pub fn generate_remaining_rooms(level: &mut Level, rng: &mut ChaCha8Rng) {
    let width = level.grid.width as i32;
    let height = level.grid.height as i32;

    let mut attempts = 0_u32;
    while level.rooms.len() < MAX_ROOMS && attempts < PLACEMENT_ATTEMPTS {
        attempts += 1;
        let size = Pos {
            y: rand_range(rng, MIN_ROOM_SIZE, MAX_ROOM_SIZE),
            x: rand_range(rng, MIN_ROOM_SIZE, MAX_ROOM_SIZE),
        };
        if width - size.x - 2 < 1 || height - size.y - 2 < 1 {
            continue;
        }
        let pos = Pos {
            y: 1 + rand_below(rng, height - size.y - 2),
            x: 1 + rand_below(rng, width - size.x - 2),
        };
        let room = Room::new(pos, size);
        if room.pos.y + room.size.y > height - STATUS_ROWS {
            continue;
        }
        if level.rooms.iter().any(|existing| existing.overlaps_with_margin(&room)) {
            continue;
        }
        draw_room(&mut level.grid, &room, rng, false);
        let prev = level.rooms.len() - 1;
        let from = level.rooms[prev].center();
        carve_corridor(&mut level.grid, from, room.center());
        convert_walls_to_doors(&mut level.grid);
        level.rooms[prev].connected = true;
        let mut room = room;
        room.connected = true;
        level.rooms.push(room);
    }

    let last = level.rooms.len() - 1;
    place_stairs_in_room(level, last, rng);
}

fn generate_treasure_level(level: &mut Level, rng: &mut ChaCha8Rng) -> GenSummary {
    level.wipe();
    let width = level.grid.width as i32;
    let height = level.grid.height as i32;
    let room =
        Room::new(Pos { y: height / 4, x: width / 4 }, Pos { y: height / 2, x: width / 2 });

    for y in room.pos.y..=room.bottom() {
        for x in room.pos.x..=room.right() {
            let tile = if y == room.pos.y || y == room.bottom() {
                TileKind::WallH
            } else if x == room.pos.x || x == room.right() {
                TileKind::WallV
            } else {
                TileKind::Floor
            };
            level.grid.set_tile(Pos { y, x }, tile);
        }
    }

    for y in room.pos.y + 1..room.bottom() {
        for x in room.pos.x + 1..room.right() {
            let pos = Pos { y, x };
            if chance(rng, 60) {
                if let Some(cell) = level.grid.cell_mut(pos) {
                    cell.tile = TileKind::GoldCoin;
                    cell.coin = Some(1);
                }
            } else if chance(rng, 20)
                && let Some(cell) = level.grid.cell_mut(pos)
            {
                cell.tile = TileKind::RareCoin;
                cell.coin = Some(5);
            }
        }
    }

    let entry = Pos { y: room.pos.y + 1, x: room.center().x };
    let victory = Pos { y: room.bottom() - 1, x: room.center().x };

    let target_traps = rand_range(rng, 8, 12);
    let mut placed = 0;
    let mut tries = 0;
    while placed < target_traps && tries < target_traps * 10 {
        tries += 1;
        let pos = interior_probe(rng, &room);
        if pos == entry || pos == victory {
            continue;
        }
        if let Some(cell) = level.grid.cell_mut(pos)
            && matches!(cell.tile, TileKind::Floor | TileKind::GoldCoin | TileKind::RareCoin)
            && !cell.trap
        {
            cell.trap = true;
            placed += 1;
        }
    }

    for (pos, tile) in [(entry, TileKind::StairsPrev), (victory, TileKind::StairsNext)] {
        if let Some(cell) = level.grid.cell_mut(pos) {
            cell.tile = tile;
            cell.coin = None;
            cell.trap = false;
        }
    }
    level.stairs_prev = Some(entry);
    level.stairs_next = Some(victory);
    level.stair_room = Some(0);
    level.rooms.push(room);
    level.stairs_placed = true;

    GenSummary { spawn: entry, restarts: 0 }
}

fn roll_room_in_cell(
    rng: &mut ChaCha8Rng,
    cell_x: i32,
    cell_y: i32,
    cell_width: i32,
    cell_height: i32,
    grid_height: i32,
) -> Option<Room> {
    let max_width = MAX_ROOM_SIZE.min(cell_width - 2);
    let max_height = MAX_ROOM_SIZE.min(cell_height - 2);
    if max_width < MIN_ROOM_SIZE || max_height < MIN_ROOM_SIZE {
        return None;
    }
    let size = Pos {
        y: rand_range(rng, MIN_ROOM_SIZE, max_height),
        x: rand_range(rng, MIN_ROOM_SIZE, max_width),
    };
    let pos = Pos {
        y: cell_y * cell_height + 1 + rand_below(rng, cell_height - size.y - 1),
        x: cell_x * cell_width + 1 + rand_below(rng, cell_width - size.x - 1),
    };
    let room = Room::new(pos, size);
    if room.pos.y + room.size.y > grid_height - STATUS_ROWS {
        return None;
    }
    Some(room)
}

fn place_fallback_room(level: &mut Level, rng: &mut ChaCha8Rng) {
    let width = level.grid.width as i32;
    let height = level.grid.height as i32;
    let size = Pos { y: MIN_ROOM_SIZE, x: MIN_ROOM_SIZE };
    let pos = Pos {
        y: ((height - STATUS_ROWS - size.y) / 2).max(1),
        x: ((width - size.x) / 2).max(1),
    };
    let room = Room::new(pos, size);
    draw_room(&mut level.grid, &room, rng, true);
    level.rooms.push(room);
}

/// Walls, floor, and the per-room feature scatter. The four corner cells of
/// the footprint stay void.
fn draw_room(grid: &mut Grid, room: &Room, rng: &mut ChaCha8Rng, stock_weapon: bool) {
    for x in room.pos.x + 1..room.right() {
        grid.set_tile(Pos { y: room.pos.y, x }, TileKind::WallH);
        grid.set_tile(Pos { y: room.bottom(), x }, TileKind::WallH);
    }
    for y in room.pos.y + 1..room.bottom() {
        grid.set_tile(Pos { y, x: room.pos.x }, TileKind::WallV);
        grid.set_tile(Pos { y, x: room.right() }, TileKind::WallV);
    }

    for y in room.pos.y + 1..room.bottom() {
        for x in room.pos.x + 1..room.right() {
            let pos = Pos { y, x };
            grid.set_tile(pos, TileKind::Floor);
            if chance(rng, 3) {
                if let Some(cell) = grid.cell_mut(pos) {
                    cell.tile = TileKind::GoldCoin;
                    cell.coin = Some(1);
                }
            } else if chance(rng, 1)
                && let Some(cell) = grid.cell_mut(pos)
            {
                cell.tile = TileKind::RareCoin;
                cell.coin = Some(5);
            }
        }
    }

    for _ in 0..rand_below(rng, 2) {
        let pos = interior_probe(rng, room);
        if let Some(cell) = grid.cell_mut(pos)
            && cell.tile == TileKind::Floor
        {
            cell.trap = true;
        }
    }

    if rand_below(rng, 5) == 0 {
        let pos = interior_probe(rng, room);
        if let Some(cell) = grid.cell_mut(pos)
            && cell.tile == TileKind::Floor
            && !cell.trap
        {
            cell.tile = TileKind::Food;
        }
    }

    if stock_weapon {
        place_weapon_cache(grid, room, rng);
    }
}

/// The first room of a fresh level carries exactly one weapon cache; probing
/// retries past coin cells and falls back to a sweep so the cache never
/// silently disappears.
fn place_weapon_cache(grid: &mut Grid, room: &Room, rng: &mut ChaCha8Rng) {
    for _ in 0..WEAPON_PLACEMENT_ATTEMPTS {
        let pos = interior_probe(rng, room);
        if grid.tile_at(pos) == TileKind::Floor {
            grid.set_tile(pos, TileKind::WeaponCache);
            return;
        }
    }
    for y in room.pos.y + 1..room.bottom() {
        for x in room.pos.x + 1..room.right() {
            let pos = Pos { y, x };
            if grid.tile_at(pos) == TileKind::Floor {
                grid.set_tile(pos, TileKind::WeaponCache);
                return;
            }
        }
    }
}

fn interior_probe(rng: &mut ChaCha8Rng, room: &Room) -> Pos {
    Pos {
        y: room.pos.y + 1 + rand_below(rng, room.size.y - 2),
        x: room.pos.x + 1 + rand_below(rng, room.size.x - 2),
    }
}

/// Interior probe staying two cells clear of the wall ring.
fn inner_probe(rng: &mut ChaCha8Rng, room: &Room) -> Pos {
    Pos {
        y: room.pos.y + 2 + rand_below(rng, room.size.y - 4),
        x: room.pos.x + 2 + rand_below(rng, room.size.x - 4),
    }
}

/// Horizontal run from `from`, then vertical run to `to`. Only void and
/// corridor cells convert; room interiors and walls are left for the door
/// pass.
fn carve_corridor(grid: &mut Grid, from: Pos, to: Pos) {
    let mut cur = from;
    while cur.x != to.x {
        carve_cell(grid, cur);
        cur.x += (to.x - cur.x).signum();
    }
    while cur.y != to.y {
        carve_cell(grid, cur);
        cur.y += (to.y - cur.y).signum();
    }
}

fn carve_cell(grid: &mut Grid, pos: Pos) {
    if matches!(grid.tile_at(pos), TileKind::Void | TileKind::Corridor) {
        grid.set_tile(pos, TileKind::Corridor);
    }
}

/// Every non-edge wall cell 4-adjacent to a corridor becomes a door.
fn convert_walls_to_doors(grid: &mut Grid) {
    let width = grid.width as i32;
    let height = grid.height as i32;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let pos = Pos { y, x };
            if !grid.tile_at(pos).is_wall() {
                continue;
            }
            let touches_corridor = [
                pos.offset(-1, 0),
                pos.offset(1, 0),
                pos.offset(0, -1),
                pos.offset(0, 1),
            ]
            .iter()
            .any(|neighbor| grid.tile_at(*neighbor) == TileKind::Corridor);
            if touches_corridor {
                grid.set_tile(pos, TileKind::Door);
            }
        }
    }
}

fn add_secret_stairs(level: &mut Level, room: &Room, rng: &mut ChaCha8Rng) {
    if rand_below(rng, 10) != 0 {
        return;
    }
    for _ in 0..SECRET_FEATURE_ATTEMPTS {
        let pos = inner_probe(rng, room);
        if level.grid.tile_at(pos) == TileKind::Floor && secret_site_is_clear(&level.grid, pos) {
            if let Some(cell) = level.grid.cell_mut(pos) {
                cell.secret_stair = true;
            }
            return;
        }
    }
}

/// A secret feature may not sit next to doors, stairs, traps, or another
/// secret feature.
fn secret_site_is_clear(grid: &Grid, pos: Pos) -> bool {
    for dy in -1..=1 {
        for dx in -1..=1 {
            let cell = grid.cell(pos.offset(dy, dx));
            if matches!(cell.tile, TileKind::Door | TileKind::StairsNext | TileKind::StairsPrev) {
                return false;
            }
            if cell.trap || cell.secret_wall || cell.secret_stair {
                return false;
            }
        }
    }
    true
}

/// Dead-end rooms (exactly one door) may hide one secret wall, which also
/// registers the level's pocket-room descriptor.
fn add_secret_wall(level: &mut Level, room: &Room, rng: &mut ChaCha8Rng) {
    let mut door_count = 0;
    for y in room.pos.y..=room.bottom() {
        for x in room.pos.x..=room.right() {
            if level.grid.tile_at(Pos { y, x }) == TileKind::Door {
                door_count += 1;
            }
        }
    }
    if door_count != 1 {
        return;
    }

    let mut candidates = Vec::new();
    for y in room.pos.y..=room.bottom() {
        for x in room.pos.x..=room.right() {
            let pos = Pos { y, x };
            if wall_can_hide_passage(&level.grid, pos) {
                candidates.push(pos);
            }
        }
    }
    if candidates.is_empty() {
        return;
    }

    let pick = candidates[rand_below(rng, candidates.len() as i32) as usize];
    if let Some(cell) = level.grid.cell_mut(pick) {
        cell.secret_wall = true;
    }
    if level.secret_rooms.len() < MAX_ROOMS {
        let center = level.grid.center();
        level.secret_rooms.push(SecretRoom { center, size: Pos { y: 5, x: 5 } });
    }
}

fn wall_can_hide_passage(grid: &Grid, pos: Pos) -> bool {
    if !grid.tile_at(pos).is_wall() {
        return false;
    }
    for dy in -1..=1 {
        for dx in -1..=1 {
            if grid.tile_at(pos.offset(dy, dx)) == TileKind::Door {
                return false;
            }
        }
    }
    true
}

/// Place `>` with a strict pass on the second room (clear of doors within a
/// 2-cell radius, off traps) and a relaxed pass over the remaining rooms.
fn place_advance_stairs(level: &mut Level, rng: &mut ChaCha8Rng) -> bool {
    if level.rooms.len() < 2 {
        return false;
    }

    let strict = level.rooms[1];
    for _ in 0..STAIR_ATTEMPTS {
        let pos = inner_probe(rng, &strict);
        if door_within_radius(&level.grid, pos, 2) {
            continue;
        }
        if stair_site_is_open(&level.grid, pos) {
            install_advance_stairs(level, pos, 1);
            return true;
        }
    }

    for index in 0..level.rooms.len() {
        if index == 1 {
            continue;
        }
        let room = level.rooms[index];
        for _ in 0..STAIR_ATTEMPTS {
            let pos = inner_probe(rng, &room);
            if stair_site_is_open(&level.grid, pos) {
                install_advance_stairs(level, pos, index);
                return true;
            }
        }
    }
    false
}

/// A stair needs open floor: no trap underneath, and no secret feature it
/// would bury.
fn stair_site_is_open(grid: &Grid, pos: Pos) -> bool {
    let cell = grid.cell(pos);
    cell.tile == TileKind::Floor && !cell.trap && !cell.secret_stair && !cell.secret_wall
}

/// Relaxed `>` placement inside one room, with a deterministic sweep when
/// probing keeps landing on features.
fn place_stairs_in_room(level: &mut Level, index: usize, rng: &mut ChaCha8Rng) -> bool {
    let room = level.rooms[index];
    for _ in 0..STAIR_ATTEMPTS {
        let pos = interior_probe(rng, &room);
        if stair_site_is_open(&level.grid, pos) {
            install_advance_stairs(level, pos, index);
            return true;
        }
    }
    for y in room.pos.y + 1..room.bottom() {
        for x in room.pos.x + 1..room.right() {
            let pos = Pos { y, x };
            if stair_site_is_open(&level.grid, pos) {
                install_advance_stairs(level, pos, index);
                return true;
            }
        }
    }
    false
}

fn install_advance_stairs(level: &mut Level, pos: Pos, room_index: usize) {
    if let Some(cell) = level.grid.cell_mut(pos) {
        cell.tile = TileKind::StairsNext;
        cell.coin = None;
    }
    level.stairs_next = Some(pos);
    level.stair_room = Some(room_index);
}

fn door_within_radius(grid: &Grid, pos: Pos, radius: i32) -> bool {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if grid.tile_at(pos.offset(dy, dx)) == TileKind::Door {
                return true;
            }
        }
    }
    false
}

fn mark_room_explored(grid: &mut Grid, room: &Room) {
    for y in room.pos.y..=room.bottom() {
        for x in room.pos.x..=room.right() {
            grid.mark_explored(Pos { y, x });
        }
    }
}
