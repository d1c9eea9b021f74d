use std::fmt;

use crate::core::pieces::get_shape;
use crate::core::{collision, ActivePiece, Board, GameSession, Piece, Position, Scheduler};
use crate::types::{Intent, Rotation, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    HoldUnavailable,
    RotationBlocked,
    ColumnOutOfBounds,
    ColumnBlocked,
    NotPlayable,
    NoActive,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::HoldUnavailable => "hold_unavailable",
            PlaceError::RotationBlocked
            | PlaceError::ColumnOutOfBounds
            | PlaceError::ColumnBlocked
            | PlaceError::NotPlayable
            | PlaceError::NoActive => "invalid_place",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::HoldUnavailable => "hold requested when unavailable",
            PlaceError::RotationBlocked => "could not rotate to target rotation",
            PlaceError::ColumnOutOfBounds => "target column would place piece out of bounds",
            PlaceError::ColumnBlocked => "could not move to target column due to collision",
            PlaceError::NotPlayable => "game is not playable",
            PlaceError::NoActive => "no active piece",
        }
    }
}

impl fmt::Display for PlaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for PlaceError {}

/// Rotations needed to reach a target state, and where the piece ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RotationPlan {
    pub clockwise: bool,
    pub steps: u8,
    pub piece: Piece,
    pub position: Position,
}

/// Simulate rotating toward `target`, shorter direction first
///
/// Half turns are two quarter turns either way; the other direction is
/// tried when the first one is blocked.
pub(crate) fn plan_rotation(
    board: &Board,
    active: ActivePiece,
    target: Rotation,
) -> Option<RotationPlan> {
    let cur = active.piece.rotation.index();
    let cw = ((target.index() + 4 - cur) % 4) as u8;
    let ccw = (4 - cw) % 4;

    let mut plans = [(true, cw), (false, ccw)];
    if plans[1].1 < plans[0].1 {
        plans.swap(0, 1);
    }

    plans.iter().find_map(|&(clockwise, steps)| {
        let mut piece = active.piece;
        let mut position = active.position;
        for _ in 0..steps {
            let (next, pos) = collision::rotate(board, &piece, position, clockwise)?;
            piece = next;
            position = pos;
        }
        (piece.rotation == target).then_some(RotationPlan {
            clockwise,
            steps,
            piece,
            position,
        })
    })
}

/// Leftmost and rightmost column offsets of a shape
pub(crate) fn column_extent(piece: &Piece) -> (i8, i8) {
    let shape = get_shape(piece.kind, piece.rotation);
    let min = shape.iter().map(|&(dc, _)| dc).min().unwrap_or(0);
    let max = shape.iter().map(|&(dc, _)| dc).max().unwrap_or(0);
    (min, max)
}

/// Hold (optionally), rotate, shift to `target_col` and hard-drop
///
/// Everything goes through [`GameSession::apply_intent`], so the session's
/// rules apply exactly as for a player. A failure part-way leaves whatever
/// intents already succeeded applied.
pub fn apply_place<S: Scheduler>(
    session: &mut GameSession<S>,
    target_col: i8,
    target_rotation: Rotation,
    use_hold: bool,
) -> Result<(), PlaceError> {
    if !session.playable() {
        return Err(PlaceError::NotPlayable);
    }

    // Hold first if requested.
    if use_hold && !session.apply_intent(Intent::Hold) {
        return Err(PlaceError::HoldUnavailable);
    }
    // A swapped-in piece may top out.
    if !session.playable() {
        return Err(PlaceError::NotPlayable);
    }

    let Some(active) = session.active() else {
        return Err(PlaceError::NoActive);
    };

    let plan =
        plan_rotation(session.board(), active, target_rotation).ok_or(PlaceError::RotationBlocked)?;
    let rotate = if plan.clockwise {
        Intent::RotateCw
    } else {
        Intent::RotateCcw
    };
    for _ in 0..plan.steps {
        if !session.apply_intent(rotate) {
            return Err(PlaceError::RotationBlocked);
        }
    }

    let Some(active) = session.active() else {
        return Err(PlaceError::NoActive);
    };
    if active.piece.rotation != target_rotation {
        return Err(PlaceError::RotationBlocked);
    }

    // i16 holds any i8 column plus a shape offset.
    let (min_dc, max_dc) = column_extent(&active.piece);
    let target = i16::from(target_col);
    if target + i16::from(min_dc) < 0 || target + i16::from(max_dc) >= i16::from(BOARD_WIDTH) {
        return Err(PlaceError::ColumnOutOfBounds);
    }

    let dcol = target - i16::from(active.position.col);
    let shift = if dcol > 0 {
        Intent::MoveRight
    } else {
        Intent::MoveLeft
    };
    for _ in 0..dcol.abs() {
        if !session.apply_intent(shift) {
            return Err(PlaceError::ColumnBlocked);
        }
    }

    if !session.apply_intent(Intent::HardDrop) {
        return Err(if session.active().is_none() {
            PlaceError::NoActive
        } else {
            PlaceError::NotPlayable
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ManualScheduler, RulesConfig};
    use crate::types::{Cell, PieceKind};

    fn session_starting_with(kind: PieceKind) -> GameSession<ManualScheduler> {
        for seed in 0..10_000 {
            let mut s =
                GameSession::new(RulesConfig::default().with_seed(seed), ManualScheduler::new());
            s.start();
            if s.active().map(|a| a.kind()) == Some(kind) {
                return s;
            }
        }
        panic!("no seed starts with {:?}", kind);
    }

    #[test]
    fn place_rejected_when_paused() {
        let mut gs = session_starting_with(PieceKind::T);
        assert!(gs.apply_intent(Intent::Pause));

        let a = gs.active().expect("expected active piece");
        let err = apply_place(&mut gs, a.position.col, a.piece.rotation, false).unwrap_err();
        assert_eq!(err, PlaceError::NotPlayable);
    }

    #[test]
    fn place_rejected_when_column_out_of_bounds() {
        let mut gs = session_starting_with(PieceKind::T);
        let err = apply_place(&mut gs, -50, Rotation::North, false).unwrap_err();
        assert_eq!(err, PlaceError::ColumnOutOfBounds);
        assert_eq!(err.code(), "invalid_place");
    }

    #[test]
    fn place_rejects_extreme_columns() {
        let mut gs = session_starting_with(PieceKind::T);
        assert_eq!(
            apply_place(&mut gs, i8::MAX, Rotation::East, false),
            Err(PlaceError::ColumnOutOfBounds)
        );
        assert_eq!(
            apply_place(&mut gs, i8::MIN, Rotation::North, false),
            Err(PlaceError::ColumnOutOfBounds)
        );
        assert!(gs.board().cells().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn place_rejected_when_column_blocked() {
        let mut gs = session_starting_with(PieceKind::T);
        // T at spawn covers (3..=5, 0); one step left needs (2, 0).
        let mut board = Board::new();
        board.set(2, 0, Cell::Filled(PieceKind::I));
        gs.load_board(board);

        let err = apply_place(&mut gs, 3, Rotation::North, false).unwrap_err();
        assert_eq!(err, PlaceError::ColumnBlocked);
    }

    #[test]
    fn place_rotates_shifts_and_drops() {
        let mut gs = session_starting_with(PieceKind::T);
        apply_place(&mut gs, 1, Rotation::East, false).unwrap();

        // East T at pivot (1, 18): stem on the left.
        for (col, row) in [(1, 17), (1, 18), (1, 19), (0, 18)] {
            assert!(gs.board().is_filled(col, row), "({}, {})", col, row);
        }
    }

    #[test]
    fn place_uses_shorter_direction() {
        let board = Board::new();
        let active = ActivePiece {
            piece: Piece::new(PieceKind::T),
            position: Position::new(4, 5),
        };
        let plan = plan_rotation(&board, active, Rotation::West).unwrap();
        assert!(!plan.clockwise);
        assert_eq!(plan.steps, 1);

        let half = plan_rotation(&board, active, Rotation::South).unwrap();
        assert_eq!(half.steps, 2);
    }

    #[test]
    fn o_piece_cannot_change_rotation() {
        let board = Board::new();
        let active = ActivePiece {
            piece: Piece::new(PieceKind::O),
            position: Position::new(4, 5),
        };
        assert!(plan_rotation(&board, active, Rotation::North).is_some());
        assert!(plan_rotation(&board, active, Rotation::East).is_none());
    }

    #[test]
    fn hold_twice_is_rejected() {
        let mut gs = session_starting_with(PieceKind::T);
        assert!(gs.apply_intent(Intent::Hold));
        let err = apply_place(&mut gs, 4, Rotation::North, true).unwrap_err();
        assert_eq!(err, PlaceError::HoldUnavailable);
        assert_eq!(err.code(), "hold_unavailable");
    }
}
