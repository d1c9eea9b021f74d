//! Shared types and rule constants.
//!
//! Everything in this crate is plain data: piece identities, rotation states,
//! board cells, player intents and timer kinds. The rules engine
//! (`blockfall-core`) and any host layer agree on these definitions.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top/spawn row)
//! - **Spawn anchor**: column 4, row 0
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `LOCK_DELAY_MS` | 500 | Grace period once a piece is grounded |
//! | `LOCK_MOVE_LIMIT` | 15 | Moves allowed while grounded before a forced lock |
//! | `LINE_CLEAR_DELAY_MS` | 200 | Window between marking and removing full rows |
//! | `SOFT_DROP_INTERVAL_MS` | 50 | Soft-drop repeat interval |
//! | `CLEAR_MESSAGE_MS` | 1500 | Lifetime of the clear message payload |
//! | `MIN_FALL_INTERVAL_MS` | 16 | Floor applied to the gravity formula |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Intent, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Intent::from_str("hardDrop"), Some(Intent::HardDrop));
//! assert_eq!((BOARD_WIDTH, BOARD_HEIGHT), (10, 20));
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Column of the spawn anchor (piece pivot)
pub const SPAWN_COL: i8 = 4;

/// Row of the spawn anchor (piece pivot)
pub const SPAWN_ROW: i8 = 0;

/// Number of upcoming pieces kept visible in the next queue
pub const NEXT_QUEUE_SIZE: usize = 5;

/// Lock delay once the active piece is grounded (500ms)
pub const LOCK_DELAY_MS: u32 = 500;

/// Successful moves/rotations allowed while grounded before the lock is forced
pub const LOCK_MOVE_LIMIT: u32 = 15;

/// Delay between marking full rows and removing them (200ms)
pub const LINE_CLEAR_DELAY_MS: u32 = 200;

/// Soft-drop repeat interval (50ms)
pub const SOFT_DROP_INTERVAL_MS: u32 = 50;

/// How long a clear message stays visible (1500ms)
pub const CLEAR_MESSAGE_MS: u32 = 1500;

/// Lower bound for the gravity interval at high levels (~one 60Hz frame)
pub const MIN_FALL_INTERVAL_MS: u32 = 16;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Base points per line count for a normal clear (index = lines cleared)
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Base points per line count for a T-spin clear (index = lines cleared)
///
/// Four-line T-spins have no entry and award no base points.
pub const TSPIN_SCORES: [u32; 4] = [0, 800, 1200, 1600];

/// Combo (REN) bonus table, indexed by the combo counter and capped at the last entry
pub const REN_BONUS: [u32; 9] = [0, 50, 100, 200, 400, 800, 1200, 1600, 2000];

/// Back-to-back bonus numerator (3/2 = 1.5x multiplier)
pub const B2B_NUMERATOR: u32 = 3;

/// Back-to-back bonus denominator
pub const B2B_DENOMINATOR: u32 = 2;

/// Points per row travelled by a hard drop
pub const HARD_DROP_POINTS: u32 = 2;

/// Points per row travelled by a soft-drop tick
pub const SOFT_DROP_POINTS: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults() {
        assert_eq!(LOCK_DELAY_MS, 500);
        assert_eq!(LOCK_MOVE_LIMIT, 15);
        assert_eq!(LINE_CLEAR_DELAY_MS, 200);
        assert_eq!(SOFT_DROP_INTERVAL_MS, 50);
        assert_eq!(CLEAR_MESSAGE_MS, 1500);
    }

    #[test]
    fn rotation_index_roundtrip() {
        for r in Rotation::ALL {
            assert_eq!(Rotation::from_index(r.index()), r);
        }
        assert_eq!(Rotation::from_index(5), Rotation::East);
    }

    #[test]
    fn intent_names_roundtrip() {
        for intent in Intent::ALL {
            assert_eq!(Intent::from_str(intent.as_str()), Some(intent));
        }
    }

    #[test]
    fn cell_predicates() {
        assert!(Cell::Empty.is_empty());
        assert!(Cell::Filled(PieceKind::S).is_filled());
        assert!(!Cell::Clearing.is_filled());
        assert!(!Cell::Clearing.is_empty());
    }
}

/// The seven piece identities
///
/// Each identity has one fixed color in the host:
/// - **I**: Cyan
/// - **O**: Yellow
/// - **T**: Purple
/// - **L**: Orange
/// - **J**: Blue
/// - **S**: Green
/// - **Z**: Red
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl PieceKind {
    /// All identities in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("Z"), Some(PieceKind::Z));
    /// assert_eq!(PieceKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "l" => Some(PieceKind::L),
            "j" => Some(PieceKind::J),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::L => "l",
            PieceKind::J => "j",
            PieceKind::S => "s",
            PieceKind::Z => "z",
        }
    }
}

/// Rotation states, 0 through 3
///
/// - **North**: spawn orientation (state 0)
/// - **East**: one clockwise turn (state 1)
/// - **South**: two turns (state 2)
/// - **West**: one counter-clockwise turn (state 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    /// Rotate clockwise (90°)
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Numeric rotation state (0..=3)
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Rotation state from a number, wrapping modulo 4
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceKind),
    /// Row is complete and waiting for the clear commit.
    Clearing,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Only `Filled` cells block movement; `Clearing` is a visual marker.
    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// Already-classified player intents
///
/// The host maps gestures/keys to these; the engine never sees raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Intent {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Begin repeating soft drop (replaces gravity while held)
    SoftDropStart,
    /// End soft drop and restore gravity
    SoftDropStop,
    /// Drop to the ghost position and lock immediately
    HardDrop,
    /// Swap with (or stash into) the hold slot, once per turn
    Hold,
    Pause,
    Resume,
    /// Rebuild the session from scratch (accepted in every state)
    Restart,
}

impl Intent {
    pub const ALL: [Intent; 11] = [
        Intent::MoveLeft,
        Intent::MoveRight,
        Intent::RotateCw,
        Intent::RotateCcw,
        Intent::SoftDropStart,
        Intent::SoftDropStop,
        Intent::HardDrop,
        Intent::Hold,
        Intent::Pause,
        Intent::Resume,
        Intent::Restart,
    ];

    /// Parse an intent from its camelCase name (case-insensitive)
    ///
    /// ```
    /// use blockfall_types::Intent;
    ///
    /// assert_eq!(Intent::from_str("rotateCw"), Some(Intent::RotateCw));
    /// assert_eq!(Intent::from_str("SOFTDROPSTART"), Some(Intent::SoftDropStart));
    /// assert_eq!(Intent::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Intent::MoveLeft),
            "moveright" => Some(Intent::MoveRight),
            "rotatecw" => Some(Intent::RotateCw),
            "rotateccw" => Some(Intent::RotateCcw),
            "softdropstart" => Some(Intent::SoftDropStart),
            "softdropstop" => Some(Intent::SoftDropStop),
            "harddrop" => Some(Intent::HardDrop),
            "hold" => Some(Intent::Hold),
            "pause" => Some(Intent::Pause),
            "resume" => Some(Intent::Resume),
            "restart" => Some(Intent::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::MoveLeft => "moveLeft",
            Intent::MoveRight => "moveRight",
            Intent::RotateCw => "rotateCw",
            Intent::RotateCcw => "rotateCcw",
            Intent::SoftDropStart => "softDropStart",
            Intent::SoftDropStop => "softDropStop",
            Intent::HardDrop => "hardDrop",
            Intent::Hold => "hold",
            Intent::Pause => "pause",
            Intent::Resume => "resume",
            Intent::Restart => "restart",
        }
    }
}

/// Timers the engine asks its host to run
///
/// At most one timer of each kind is armed at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerKind {
    /// Repeating, period = current fall interval
    Gravity,
    /// One-shot lock-delay expiry
    LockDown,
    /// One-shot removal of rows marked for clearing
    ClearCommit,
    /// Repeating while soft drop is held
    SoftDrop,
    /// One-shot expiry of the clear message
    MessageExpiry,
}
