//! Collision queries and kick-resolved rotation
//!
//! Side walls and the floor are solid. Cells above the board (`row < 0`) are
//! always open, so a piece may overlap the ceiling while it falls. Only
//! `Filled` cells block; rows marked `Clearing` do not.

use tracing::trace;

use crate::board::Board;
use crate::kicks::{kick_offsets, KickFamily};
use crate::pieces::{Piece, Position};
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

/// True if any mino is outside the walls/floor or on a filled cell
pub fn collides(board: &Board, piece: &Piece, pos: Position) -> bool {
    piece.cells_at(pos).iter().any(|&(col, row)| {
        if col < 0 || col >= BOARD_WIDTH as i8 || row >= BOARD_HEIGHT as i8 {
            return true;
        }
        row >= 0 && board.is_filled(col, row)
    })
}

/// Whether the piece can move down one row from `pos`
pub fn can_fall(board: &Board, piece: &Piece, pos: Position) -> bool {
    !collides(board, piece, pos.offset(0, 1))
}

/// Rows the piece can fall before it is blocked
pub fn drop_distance(board: &Board, piece: &Piece, pos: Position) -> i8 {
    let mut distance = 0;
    while can_fall(board, piece, pos.offset(0, distance)) {
        distance += 1;
    }
    distance
}

/// Hard-drop landing position (the ghost)
pub fn ghost_position(board: &Board, piece: &Piece, pos: Position) -> Position {
    pos.offset(0, drop_distance(board, piece, pos))
}

/// Rotate with wall kicks
///
/// Candidates come from the kick table for the exact `(from, to)` pair and
/// are tried in order; the column delta is added and the row delta
/// subtracted. Returns the first non-colliding result, or `None` when the
/// piece is an `O`, the transition is not in the table, or every candidate
/// collides.
pub fn rotate(
    board: &Board,
    piece: &Piece,
    pos: Position,
    clockwise: bool,
) -> Option<(Piece, Position)> {
    let family = KickFamily::of(piece.kind)?;
    let rotated = piece.rotated(clockwise);
    let offsets = kick_offsets(family, piece.rotation, rotated.rotation)?;

    offsets.iter().enumerate().find_map(|(i, &(dc, dr))| {
        let candidate = Position::new(pos.col + dc, pos.row - dr);
        if collides(board, &rotated, candidate) {
            return None;
        }
        trace!(
            kind = ?piece.kind,
            kick = i,
            col = candidate.col,
            row = candidate.row,
            "rotation resolved"
        );
        Some((rotated, candidate))
    })
}
