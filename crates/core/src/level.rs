//! Level aggregate: rooms, stair bookkeeping, and the pocket-room state swap.

use crate::grid::{Grid, GridSnapshot};
use crate::types::{Pos, SecretEntry, TalismanKind};

/// Axis-aligned room rectangle. `size` is the full footprint including the
/// wall ring; the four corner cells stay void when the room is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    pub pos: Pos,
    pub size: Pos,
    pub connected: bool,
}

impl Room {
    pub fn new(pos: Pos, size: Pos) -> Self {
        Self { pos, size, connected: false }
    }

    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x - 1
    }

    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y - 1
    }

    pub fn center(&self) -> Pos {
        Pos { y: self.pos.y + self.size.y / 2, x: self.pos.x + self.size.x / 2 }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= self.pos.x && pos.x <= self.right() && pos.y >= self.pos.y && pos.y <= self.bottom()
    }

    fn expanded(&self, margin: i32) -> Room {
        Room {
            pos: Pos { y: self.pos.y - margin, x: self.pos.x - margin },
            size: Pos { y: self.size.y + 2 * margin, x: self.size.x + 2 * margin },
            connected: self.connected,
        }
    }

    fn intersects(&self, other: &Room) -> bool {
        self.pos.x <= other.right()
            && self.right() >= other.pos.x
            && self.pos.y <= other.bottom()
            && self.bottom() >= other.pos.y
    }

    /// Overlap test with the 1-cell separation margin room placement requires.
    pub fn overlaps_with_margin(&self, other: &Room) -> bool {
        self.expanded(1).intersects(&other.expanded(1))
    }
}

/// Descriptor appended when a secret wall is embedded. Nominally 5×5 and
/// centered on the grid; the chamber itself is drawn 7×7 on entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SecretRoom {
    pub center: Pos,
    pub size: Pos,
}

/// Live pocket-room visit. While this is present the grid's layers show the
/// pocket chamber and `saved` holds the real level, restored verbatim on exit.
#[derive(Clone, Debug)]
pub struct PocketVisit {
    pub saved: GridSnapshot,
    pub entry: Pos,
    pub via: SecretEntry,
}

#[derive(Clone, Debug)]
pub struct Level {
    pub grid: Grid,
    pub rooms: Vec<Room>,
    pub secret_rooms: Vec<SecretRoom>,
    /// `>` coordinate, when placement succeeded.
    pub stairs_next: Option<Pos>,
    /// `<` coordinate; present on every level reached by ascending.
    pub stairs_prev: Option<Pos>,
    /// Index into `rooms` of the room hosting `>`.
    pub stair_room: Option<usize>,
    /// One-shot: set after this level's layout exists, so revisits skip
    /// regeneration.
    pub stairs_placed: bool,
    pub pocket: Option<PocketVisit>,
    /// Talisman type any `T` spawned on this level resolves to.
    pub talisman: TalismanKind,
}

impl Level {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid: Grid::new(width, height),
            rooms: Vec::new(),
            secret_rooms: Vec::new(),
            stairs_next: None,
            stairs_prev: None,
            stair_room: None,
            stairs_placed: false,
            pocket: None,
            talisman: TalismanKind::Health,
        }
    }

    /// Clear everything generation produces, keeping the grid dimensions.
    pub fn wipe(&mut self) {
        self.grid.wipe();
        self.rooms.clear();
        self.secret_rooms.clear();
        self.stairs_next = None;
        self.stairs_prev = None;
        self.stair_room = None;
        self.pocket = None;
    }

    pub fn room_containing(&self, pos: Pos) -> Option<usize> {
        self.rooms.iter().position(|room| room.contains(pos))
    }

    pub fn in_pocket(&self) -> bool {
        self.pocket.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(y: i32, x: i32, h: i32, w: i32) -> Room {
        Room::new(Pos { y, x }, Pos { y: h, x: w })
    }

    #[test]
    fn center_matches_half_offsets() {
        let r = room(2, 3, 7, 9);
        assert_eq!(r.center(), Pos { y: 5, x: 7 });
    }

    #[test]
    fn rooms_separated_by_one_cell_still_overlap_with_margin() {
        let a = room(2, 2, 6, 6);
        // One empty column between the footprints is inside the margin.
        let b = room(2, 9, 6, 6);
        assert!(a.overlaps_with_margin(&b));
        // Two empty columns clear it.
        let c = room(2, 10, 6, 6);
        assert!(!a.overlaps_with_margin(&c));
    }

    #[test]
    fn contains_covers_the_wall_ring() {
        let r = room(4, 4, 6, 8);
        assert!(r.contains(Pos { y: 4, x: 4 }));
        assert!(r.contains(Pos { y: 9, x: 11 }));
        assert!(!r.contains(Pos { y: 10, x: 4 }));
    }

    #[test]
    fn wipe_clears_layout_but_not_dimensions() {
        let mut level = Level::new(30, 24);
        level.rooms.push(room(2, 2, 6, 6));
        level.stairs_next = Some(Pos { y: 3, x: 3 });
        level.grid.set_tile(Pos { y: 3, x: 3 }, crate::types::TileKind::Floor);

        level.wipe();
        assert!(level.rooms.is_empty());
        assert_eq!(level.stairs_next, None);
        assert_eq!(level.grid.width, 30);
        assert_eq!(level.grid.tile_at(Pos { y: 3, x: 3 }), crate::types::TileKind::Void);
    }
}
