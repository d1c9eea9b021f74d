//! Read-only frame state handed to hosts

use serde::Serialize;

use crate::board::Grid;
use crate::pieces::Position;
use crate::session::ActivePiece;
use crate::types::{Cell, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH, NEXT_QUEUE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub col: i8,
    pub row: i8,
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.piece.kind,
            rotation: value.piece.rotation,
            col: value.position.col,
            row: value.position.row,
        }
    }
}

/// Transient clear label and when it goes away
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ClearMessage {
    pub text: String,
    /// Full display time for a fresh message.
    pub lifetime_ms: u64,
    /// Time left before this message expires.
    pub expires_in_ms: u64,
}

/// Everything a host needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub board: Grid,
    pub active: Option<ActiveSnapshot>,
    pub ghost: Option<Position>,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub next_queue: [PieceKind; NEXT_QUEUE_SIZE],
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub combo: i32,
    pub back_to_back: bool,
    pub message: Option<ClearMessage>,
    /// Full rows are marked and waiting for the commit.
    pub clear_pending: bool,
    pub soft_dropping: bool,
    pub paused: bool,
    pub game_over: bool,
    pub fall_interval_ms: u64,
    pub seed: Option<u64>,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board = [[Cell::Empty; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.active = None;
        self.ghost = None;
        self.hold = None;
        self.can_hold = true;
        self.next_queue = [PieceKind::I; NEXT_QUEUE_SIZE];
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.combo = -1;
        self.back_to_back = false;
        self.message = None;
        self.clear_pending = false;
        self.soft_dropping = false;
        self.paused = false;
        self.game_over = false;
        self.fall_interval_ms = 0;
        self.seed = None;
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }

    /// Cells with a block, counting rows marked for clearing
    pub fn occupied_cells(&self) -> usize {
        self.board
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[Cell::Empty; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost: None,
            hold: None,
            can_hold: true,
            next_queue: [PieceKind::I; NEXT_QUEUE_SIZE],
            score: 0,
            level: 1,
            lines: 0,
            combo: -1,
            back_to_back: false,
            message: None,
            clear_pending: false,
            soft_dropping: false,
            paused: false,
            game_over: false,
            fall_interval_ms: 0,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_to_defaults() {
        let mut s = GameSnapshot::default();
        s.board[19][0] = Cell::Filled(PieceKind::T);
        s.score = 900;
        s.combo = 2;
        s.game_over = true;
        assert_eq!(s.occupied_cells(), 1);
        assert!(!s.playable());

        s.clear();
        assert_eq!(s, GameSnapshot::default());
        assert_eq!(s.occupied_cells(), 0);
        assert!(s.playable());
    }
}
