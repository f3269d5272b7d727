use serde::{Deserialize, Serialize};

pub const MAX_LEVELS: usize = 5;
pub const TREASURE_LEVEL: usize = 5;
pub const MAX_ROOMS: usize = 9;
pub const MIN_ROOM_SIZE: i32 = 6;
pub const MAX_ROOM_SIZE: i32 = 10;
pub const MESSAGE_DURATION: u32 = 5;
/// Rows at the bottom of the grid reserved for the host's status area;
/// room placement never intrudes into them.
pub const STATUS_ROWS: i32 = 6;
pub const FOOD_CAP: u32 = 5;
pub const DIAGONAL_COMBO_MS: u64 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn offset(self, dy: i32, dx: i32) -> Pos {
        Pos { y: self.y + dy, x: self.x + dx }
    }
}

/// The tile alphabet. Overlay flags on [`crate::grid::Cell`] are independent
/// of the tile; walkability comes from combining both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileKind {
    #[default]
    Void,
    WallH,
    WallV,
    Floor,
    Corridor,
    Door,
    /// `>`: advances the run, doubling as the treasure-level victory stair.
    StairsNext,
    /// `<`: returns to the previously visited level.
    StairsPrev,
    GoldCoin,
    RareCoin,
    Food,
    WeaponCache,
    TalismanPickup,
    /// `?` at the center of a pocket room; confirming near it exits.
    PocketExit,
}

impl TileKind {
    pub fn symbol(self) -> char {
        match self {
            TileKind::Void => ' ',
            TileKind::WallH => '_',
            TileKind::WallV => '|',
            TileKind::Floor => '.',
            TileKind::Corridor => '#',
            TileKind::Door => '+',
            TileKind::StairsNext => '>',
            TileKind::StairsPrev => '<',
            TileKind::GoldCoin => '$',
            TileKind::RareCoin => '&',
            TileKind::Food => '*',
            TileKind::WeaponCache => 'W',
            TileKind::TalismanPickup => 'T',
            TileKind::PocketExit => '?',
        }
    }

    pub fn is_wall(self) -> bool {
        matches!(self, TileKind::WallH | TileKind::WallV)
    }

    pub fn blocks_movement(self) -> bool {
        matches!(self, TileKind::Void | TileKind::WallH | TileKind::WallV)
    }

    /// Corridor-visibility rays walk over these.
    pub fn is_passage(self) -> bool {
        matches!(self, TileKind::Corridor | TileKind::Door)
    }

    pub fn is_stairs(self) -> bool {
        matches!(self, TileKind::StairsNext | TileKind::StairsPrev)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir {
    North,
    South,
    West,
    East,
}

impl Dir {
    pub fn delta(self) -> Pos {
        match self {
            Dir::North => Pos { y: -1, x: 0 },
            Dir::South => Pos { y: 1, x: 0 },
            Dir::West => Pos { y: 0, x: -1 },
            Dir::East => Pos { y: 0, x: 1 },
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Dir::North | Dir::South)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Mace,
    Dagger,
    Wand,
    Arrow,
    Sword,
}

pub const WEAPON_KINDS: [WeaponKind; 5] =
    [WeaponKind::Mace, WeaponKind::Dagger, WeaponKind::Wand, WeaponKind::Arrow, WeaponKind::Sword];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TalismanKind {
    Health,
    Damage,
    Speed,
}

pub const TALISMAN_KINDS: [TalismanKind; 3] =
    [TalismanKind::Health, TalismanKind::Damage, TalismanKind::Speed];

/// How the player reached the currently active pocket room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecretEntry {
    Stair,
    Wall,
}

/// One symbol of the fixed input vocabulary. Anything the host cannot map
/// here is dropped before it reaches the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKey {
    Move(Dir),
    Arrow(Dir),
    Confirm,
    FastTravel,
    FoodMenu,
    WeaponMenu,
    TalismanMenu,
    DebugToggle,
    Regenerate,
    Quit,
}

/// A turn's input: the decoded key plus the host's monotonic millisecond
/// stamp. The stamp only matters for pairing arrow keys into diagonals; the
/// core never reads a clock itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub key: InputKey,
    pub at_ms: u64,
}

impl InputEvent {
    pub fn new(key: InputKey, at_ms: u64) -> Self {
        Self { key, at_ms }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuKind {
    Food,
    Weapon,
    Talisman,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Victory,
    Death,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue,
    MenuRequested(MenuKind),
    Finished(RunOutcome),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupError {
    /// The host's terminal cannot fit the 3×3 placement cells a level needs.
    GridTooSmall { width: usize, height: usize },
}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::GridTooSmall { width, height } => {
                write!(f, "grid {width}x{height} is too small to host a dungeon level")
            }
        }
    }
}

impl std::error::Error for SetupError {}

/// Structured record of what happened during a session, appended as turns
/// resolve. The human-facing message channel is rendered separately.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    LevelGenerated { level: usize, rooms: usize, restarts: u32 },
    StairsUnplaced { level: usize },
    TrapTriggered { pos: Pos, damage: i32 },
    CoinCollected { pos: Pos, value: u32 },
    FoodPickedUp,
    FoodEaten,
    WeaponFound { weapon: WeaponKind },
    TalismanClaimed { talisman: TalismanKind },
    PocketEntered { via: SecretEntry },
    PocketExited { entry: Pos },
    Ascended { level: usize },
    Descended { level: usize },
    Starving,
}
