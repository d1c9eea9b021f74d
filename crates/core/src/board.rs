//! Board module - manages the playing field
//!
//! The board is a 10x20 grid of [`Cell`]s stored as a flat row-major array.
//! Coordinates are `(col, row)`: col 0..9 left to right, row 0..19 top to
//! bottom. Row 0 is the spawn row.
//!
//! Clearing is two-phase: [`Board::mark_clearing`] flags complete rows for
//! display, and [`Board::commit_clear`] removes them later and drops
//! everything above.

use arrayvec::ArrayVec;

use crate::pieces::{Piece, Position};
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Ordered set of row indices (top to bottom)
pub type RowSet = ArrayVec<usize, { BOARD_HEIGHT as usize }>;

/// Grid form used by snapshots
pub type Grid = [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

/// The playing field - 10 columns x 20 rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (row * WIDTH + col)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; BOARD_SIZE],
        }
    }

    /// Build a board from text rows, bottom-aligned
    ///
    /// `.` is empty, `#` is a filled cell (as `I`), a piece letter fills with
    /// that identity and `=` marks a clearing cell. Missing rows at the top
    /// are empty; short rows are padded with empty cells.
    ///
    /// ```
    /// use blockfall_core::Board;
    /// use blockfall_core::types::{Cell, PieceKind};
    ///
    /// let board = Board::from_ascii(&["#########.", "TTT......."]);
    /// assert_eq!(board.get(0, 19), Some(Cell::Filled(PieceKind::T)));
    /// assert_eq!(board.get(9, 18), Some(Cell::Empty));
    /// ```
    pub fn from_ascii(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let height = BOARD_HEIGHT as usize;
        let skip = rows.len().saturating_sub(height);
        let first_row = height - (rows.len() - skip);

        for (i, line) in rows.iter().skip(skip).enumerate() {
            for (col, ch) in line.chars().take(BOARD_WIDTH as usize).enumerate() {
                let cell = match ch {
                    '#' => Cell::Filled(PieceKind::I),
                    '=' => Cell::Clearing,
                    c => PieceKind::from_str(&c.to_string())
                        .map(Cell::Filled)
                        .unwrap_or(Cell::Empty),
                };
                board.set(col as i8, (first_row + i) as i8, cell);
            }
        }
        board
    }

    /// Calculate flat index from (col, row) coordinates
    #[inline(always)]
    fn index(col: i8, row: i8) -> Option<usize> {
        if col < 0 || col >= BOARD_WIDTH as i8 || row < 0 || row >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((row as usize) * (BOARD_WIDTH as usize) + (col as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at (col, row); `None` if out of bounds
    pub fn get(&self, col: i8, row: i8) -> Option<Cell> {
        Self::index(col, row).map(|idx| self.cells[idx])
    }

    /// Set cell at (col, row); returns false if out of bounds
    pub fn set(&mut self, col: i8, row: i8, cell: Cell) -> bool {
        match Self::index(col, row) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// In bounds and holding a placed block
    pub fn is_filled(&self, col: i8, row: i8) -> bool {
        matches!(self.get(col, row), Some(Cell::Filled(_)))
    }

    /// One row of cells
    pub fn row(&self, row: usize) -> &[Cell] {
        let width = BOARD_WIDTH as usize;
        let start = row.min(BOARD_HEIGHT as usize - 1) * width;
        &self.cells[start..start + width]
    }

    /// A row qualifies when it has no `Empty` cells
    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= BOARD_HEIGHT as usize {
            return false;
        }
        self.row(row).iter().all(|cell| !cell.is_empty())
    }

    /// Write `Filled(kind)` under every in-bounds cell of the piece
    ///
    /// Out-of-bounds cells are skipped. Returns how many cells were written.
    pub fn place(&mut self, piece: &Piece, pos: Position) -> usize {
        piece
            .cells_at(pos)
            .iter()
            .filter(|&&(col, row)| self.set(col, row, Cell::Filled(piece.kind)))
            .count()
    }

    /// Indices of every full row, top to bottom
    pub fn scan_full_rows(&self) -> RowSet {
        (0..BOARD_HEIGHT as usize)
            .filter(|&row| self.is_row_full(row))
            .collect()
    }

    /// Flag every cell of the given rows as `Clearing`
    pub fn mark_clearing(&mut self, rows: &[usize]) {
        for &row in rows.iter().filter(|&&r| r < BOARD_HEIGHT as usize) {
            let start = row * BOARD_WIDTH as usize;
            for cell in &mut self.cells[start..start + BOARD_WIDTH as usize] {
                *cell = Cell::Clearing;
            }
        }
    }

    /// Remove the given rows and insert as many empty rows at the top
    ///
    /// Remaining rows keep their relative order. Uses a two-pointer compaction
    /// from the bottom up with no allocation. Returns the number of rows removed.
    pub fn commit_clear(&mut self, rows: &[usize]) -> usize {
        let width = BOARD_WIDTH as usize;
        let mut write_row = BOARD_HEIGHT as usize;
        let mut removed = 0;

        for read_row in (0..BOARD_HEIGHT as usize).rev() {
            if rows.contains(&read_row) {
                removed += 1;
                continue;
            }
            write_row -= 1;
            if write_row != read_row {
                let src = read_row * width;
                self.cells.copy_within(src..src + width, write_row * width);
            }
        }

        for cell in &mut self.cells[..write_row * width] {
            *cell = Cell::Empty;
        }

        removed
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy the board into a 2D grid
    pub fn write_grid(&self, out: &mut Grid) {
        for (row, chunk) in self.cells.chunks_exact(BOARD_WIDTH as usize).enumerate() {
            out[row].copy_from_slice(chunk);
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [Cell::Empty; BOARD_SIZE];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_place_skips_cells_above_board() {
        let mut board = Board::new();
        // Vertical I at the spawn anchor reaches row -1.
        let written = board.place(&Piece::new(PieceKind::I), Position::new(4, 0));
        assert_eq!(written, 3);
        assert_eq!(board.get(4, 0), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(board.get(4, 2), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(board.get(4, 3), Some(Cell::Empty));
    }

    #[test]
    fn test_clearing_rows_still_count_as_full() {
        let mut board = Board::from_ascii(&["##########"]);
        board.mark_clearing(&[19]);
        assert_eq!(board.get(3, 19), Some(Cell::Clearing));
        assert_eq!(board.scan_full_rows().as_slice(), &[19]);
    }

    #[test]
    fn test_commit_clear_keeps_order() {
        let mut board = Board::from_ascii(&[
            "T.........", // 16
            "##########", // 17
            ".S........", // 18
            "##########", // 19
        ]);
        let rows = board.scan_full_rows();
        assert_eq!(rows.as_slice(), &[17, 19]);

        board.mark_clearing(&rows);
        assert_eq!(board.commit_clear(&rows), 2);

        assert_eq!(board.get(0, 18), Some(Cell::Filled(PieceKind::T)));
        assert_eq!(board.get(1, 19), Some(Cell::Filled(PieceKind::S)));
        assert!(board.row(17).iter().all(Cell::is_empty));
        assert!(board.row(0).iter().all(Cell::is_empty));
    }

    #[test]
    fn test_from_ascii_bottom_aligned() {
        let board = Board::from_ascii(&["Z........."]);
        assert_eq!(board.get(0, 19), Some(Cell::Filled(PieceKind::Z)));
        assert_eq!(board.cells().iter().filter(|c| c.is_filled()).count(), 1);
    }
}
