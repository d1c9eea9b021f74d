//! Greedy placement chooser
//!
//! Every reachable (rotation, column) for the active piece, and for the
//! piece a hold would bring in, is dropped onto a copy of the board and the
//! result scored with the classic four-feature heuristic:
//!
//! ```text
//! score = 0.760666 * lines_cleared
//!       - 0.510066 * aggregate_height
//!       - 0.35663  * holes
//!       - 0.184483 * bumpiness
//! ```

use tracing::trace;

use crate::core::collision::{collides, ghost_position};
use crate::core::pieces::shape_table;
use crate::core::{ActivePiece, Board, GameSession, Piece, Position, Scheduler};
use crate::place::{column_extent, plan_rotation};
use crate::types::{Rotation, BOARD_HEIGHT, BOARD_WIDTH};

/// A target for [`apply_place`](crate::place::apply_place)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub col: i8,
    pub rotation: Rotation,
    pub use_hold: bool,
    pub score: f32,
}

/// Height of each column (0 for an empty column)
pub fn column_heights(board: &Board) -> [u8; BOARD_WIDTH as usize] {
    let mut heights = [0u8; BOARD_WIDTH as usize];
    for (col, height) in heights.iter_mut().enumerate() {
        let top = (0..BOARD_HEIGHT).find(|&row| board.is_filled(col as i8, row as i8));
        *height = top.map_or(0, |row| BOARD_HEIGHT - row);
    }
    heights
}

/// Empty cells with a filled cell somewhere above them in the same column
pub fn count_holes(board: &Board) -> u32 {
    let mut holes = 0;
    for col in 0..BOARD_WIDTH as i8 {
        let mut covered = false;
        for row in 0..BOARD_HEIGHT as i8 {
            if board.is_filled(col, row) {
                covered = true;
            } else if covered {
                holes += 1;
            }
        }
    }
    holes
}

/// Heuristic value of a board after a placement that cleared `lines`
pub fn evaluate_board(board: &Board, lines: usize) -> f32 {
    let heights = column_heights(board);
    let aggregate_height: f32 = heights.iter().map(|&h| h as f32).sum();
    let bumpiness: f32 = heights
        .windows(2)
        .map(|w| (w[0] as f32 - w[1] as f32).abs())
        .sum();
    let holes = count_holes(board) as f32;

    0.760666 * lines as f32
        + (-0.510066) * aggregate_height
        + (-0.35663) * holes
        + (-0.184483) * bumpiness
}

/// Slide horizontally to `col`, or `None` if something is in the way
fn slide(board: &Board, piece: &Piece, from: Position, col: i8) -> Option<Position> {
    let step = (col - from.col).signum();
    let mut pos = from;
    while pos.col != col {
        let next = pos.offset(step, 0);
        if collides(board, piece, next) {
            return None;
        }
        pos = next;
    }
    Some(pos)
}

/// Best landing for one piece on `board`
pub fn best_for_piece(board: &Board, active: ActivePiece) -> Option<Placement> {
    let single_state = shape_table(active.piece.kind).len() == 1;
    let mut best: Option<Placement> = None;

    for rotation in Rotation::ALL {
        if single_state && rotation != active.piece.rotation {
            continue;
        }
        let Some(plan) = plan_rotation(board, active, rotation) else {
            continue;
        };

        let (min_dc, max_dc) = column_extent(&plan.piece);
        for col in -min_dc..(BOARD_WIDTH as i8 - max_dc) {
            let Some(pos) = slide(board, &plan.piece, plan.position, col) else {
                continue;
            };
            let landing = ghost_position(board, &plan.piece, pos);

            let mut after = board.clone();
            let written = after.place(&plan.piece, landing);
            let rows = after.scan_full_rows();
            after.commit_clear(&rows);

            // Anything left above the ceiling tops out.
            let score = if written < 4 {
                f32::MIN
            } else {
                evaluate_board(&after, rows.len())
            };

            if best.map_or(true, |b| score > b.score) {
                best = Some(Placement {
                    col,
                    rotation,
                    use_hold: false,
                    score,
                });
            }
        }
    }
    best
}

/// Best placement for the session's current turn, considering a hold
pub fn best_placement<S: Scheduler>(session: &GameSession<S>) -> Option<Placement> {
    if !session.playable() {
        return None;
    }
    let active = session.active()?;
    let mut best = best_for_piece(session.board(), active);

    if session.can_hold() {
        let incoming = session
            .hold_piece()
            .unwrap_or_else(|| session.next_queue()[0]);
        let swapped = ActivePiece {
            piece: Piece::new(incoming),
            position: Position::spawn(),
        };
        if let Some(held) = best_for_piece(session.board(), swapped) {
            if best.map_or(true, |b| held.score > b.score) {
                best = Some(Placement {
                    use_hold: true,
                    ..held
                });
            }
        }
    }

    if let Some(p) = best {
        trace!(
            col = p.col,
            rotation = p.rotation.as_str(),
            hold = p.use_hold,
            score = p.score,
            "placement chosen"
        );
    }
    best
}
