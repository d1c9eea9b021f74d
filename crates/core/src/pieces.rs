//! Piece catalog - shape tables for the seven identities
//!
//! Offsets are `(col, row)` relative to the piece pivot; rows grow downward,
//! so a negative row offset sits above the pivot. `I`, `S` and `Z` repeat
//! their first two states; `O` has a single state and never rotates.

use serde::Serialize;

use crate::types::{PieceKind, Rotation, SPAWN_COL, SPAWN_ROW};

/// Offset of a single mino relative to the piece pivot
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from the pivot
pub type PieceShape = [MinoOffset; 4];

const I_SHAPES: [PieceShape; 4] = [
    [(0, -1), (0, 0), (0, 1), (0, 2)],
    [(-1, 0), (0, 0), (1, 0), (2, 0)],
    [(0, -1), (0, 0), (0, 1), (0, 2)],
    [(-1, 0), (0, 0), (1, 0), (2, 0)],
];

const O_SHAPES: [PieceShape; 1] = [[(0, 0), (1, 0), (0, 1), (1, 1)]];

const T_SHAPES: [PieceShape; 4] = [
    [(-1, 0), (0, 0), (1, 0), (0, 1)],
    [(0, -1), (0, 0), (0, 1), (-1, 0)],
    [(-1, 0), (0, 0), (1, 0), (0, -1)],
    [(0, -1), (0, 0), (0, 1), (1, 0)],
];

const L_SHAPES: [PieceShape; 4] = [
    [(0, -1), (0, 0), (0, 1), (1, 1)],
    [(-1, 0), (0, 0), (1, 0), (-1, 1)],
    [(0, -1), (0, 0), (0, 1), (-1, -1)],
    [(-1, 0), (0, 0), (1, 0), (1, -1)],
];

const J_SHAPES: [PieceShape; 4] = [
    [(0, -1), (0, 0), (0, 1), (-1, 1)],
    [(-1, 0), (0, 0), (1, 0), (1, 1)],
    [(0, -1), (0, 0), (0, 1), (1, -1)],
    [(-1, -1), (-1, 0), (0, 0), (1, 0)],
];

const S_SHAPES: [PieceShape; 4] = [
    [(-1, 1), (0, 1), (0, 0), (1, 0)],
    [(0, -1), (0, 0), (1, 0), (1, 1)],
    [(-1, 1), (0, 1), (0, 0), (1, 0)],
    [(0, -1), (0, 0), (1, 0), (1, 1)],
];

const Z_SHAPES: [PieceShape; 4] = [
    [(-1, 0), (0, 0), (0, 1), (1, 1)],
    [(1, -1), (1, 0), (0, 0), (0, 1)],
    [(-1, 0), (0, 0), (0, 1), (1, 1)],
    [(1, -1), (1, 0), (0, 0), (0, 1)],
];

/// All rotation states defined for a piece kind
pub fn shape_table(kind: PieceKind) -> &'static [PieceShape] {
    match kind {
        PieceKind::I => &I_SHAPES,
        PieceKind::O => &O_SHAPES,
        PieceKind::T => &T_SHAPES,
        PieceKind::L => &L_SHAPES,
        PieceKind::J => &J_SHAPES,
        PieceKind::S => &S_SHAPES,
        PieceKind::Z => &Z_SHAPES,
    }
}

/// Get the shape (mino offsets) for a piece kind and rotation
///
/// Kinds with a single state return it for every rotation.
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    let table = shape_table(kind);
    table.get(rotation.index()).copied().unwrap_or(table[0])
}

/// Initial shape for a freshly spawned piece
pub fn get_spawn_shape(kind: PieceKind) -> PieceShape {
    get_shape(kind, Rotation::North)
}

/// Pivot location on the board
///
/// No bounds are enforced here; legality is a collision question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub col: i8,
    pub row: i8,
}

impl Position {
    pub const fn new(col: i8, row: i8) -> Self {
        Self { col, row }
    }

    /// Fixed spawn anchor for every new piece
    pub const fn spawn() -> Self {
        Self::new(SPAWN_COL, SPAWN_ROW)
    }

    pub fn offset(self, dcol: i8, drow: i8) -> Self {
        Self::new(self.col + dcol, self.row + drow)
    }
}

/// A live piece: identity plus rotation state
///
/// Rotating yields a new value; shape data is never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
}

impl Piece {
    /// Create a piece in its spawn orientation
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
        }
    }

    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute board cells covered when the pivot sits at `pos`
    pub fn cells_at(&self, pos: Position) -> [(i8, i8); 4] {
        self.shape().map(|(dc, dr)| (pos.col + dc, pos.row + dr))
    }

    /// Same piece advanced one rotation state
    ///
    /// Single-state kinds come back unchanged.
    pub fn rotated(&self, clockwise: bool) -> Self {
        if shape_table(self.kind).len() == 1 {
            return *self;
        }
        let rotation = if clockwise {
            self.rotation.rotate_cw()
        } else {
            self.rotation.rotate_ccw()
        };
        Self { rotation, ..*self }
    }

    /// Same identity back in the spawn orientation
    pub fn reset_rotation(&self) -> Self {
        Self::new(self.kind)
    }
}
