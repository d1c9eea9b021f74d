//! Change notifications delivered to the session listener

use serde::Serialize;

use crate::pieces::{Piece, Position};
use crate::types::PieceKind;

/// Something observable happened inside the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum GameEvent {
    Spawned { kind: PieceKind },
    Moved { position: Position },
    Rotated { piece: Piece, position: Position },
    /// `held` is now in the hold slot.
    Held { held: PieceKind },
    Locked { piece: Piece, position: Position },
    /// Full rows were marked and a clear commit is pending.
    LinesMarked { rows: Vec<usize> },
    LinesCleared {
        lines: usize,
        tspin: bool,
        score_delta: u32,
        back_to_back: bool,
        combo: i32,
    },
    LevelUp { level: u32 },
    GameOver,
    Paused,
    Resumed,
    Restarted,
    MessageExpired,
}

/// Listener registered at session construction
pub type Listener = Box<dyn FnMut(&GameEvent)>;
