//! Scoring module - line clears, T-spins, back-to-back, combo and level
//!
//! Rules:
//! - Normal clears score 100/300/500/800, T-spin clears 800/1200/1600.
//! - A "difficult" clear is a 4-line normal clear or a T-spin clearing ≥1 line.
//!   When the previous difficult-clear flag is set, the base is multiplied by 3/2.
//! - The combo (REN) counter is −1 with no chain; the bonus is
//!   `REN_BONUS[min(counter, 8)] × level` and is added after the multiplier.
//! - `level = total_lines / 10 + 1`, recomputed after the delta is applied.

use std::time::Duration;

use crate::board::Board;
use crate::pieces::{Piece, Position};
use crate::types::{
    PieceKind, B2B_DENOMINATOR, B2B_NUMERATOR, BOARD_HEIGHT, BOARD_WIDTH, HARD_DROP_POINTS,
    LINES_PER_LEVEL, LINE_SCORES, REN_BONUS, SOFT_DROP_POINTS, TSPIN_SCORES,
};

/// Three-corner T-spin check, evaluated before the piece is written
///
/// Requires a `T` whose last successful action was a rotation. A corner
/// diagonal to the pivot counts as occupied when it is past a side wall,
/// below the floor, or filled; corners above the board never count.
pub fn detect_tspin(board: &Board, piece: &Piece, pos: Position, last_was_rotation: bool) -> bool {
    if piece.kind != PieceKind::T || !last_was_rotation {
        return false;
    }

    let corners = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
    let occupied = corners
        .iter()
        .filter(|&&(dc, dr)| {
            let col = pos.col + dc;
            let row = pos.row + dr;
            if col < 0 || col >= BOARD_WIDTH as i8 || row >= BOARD_HEIGHT as i8 {
                return true;
            }
            row >= 0 && board.is_filled(col, row)
        })
        .count();

    occupied >= 3
}

/// Base points before level, multiplier and combo
pub fn base_score(lines: usize, tspin: bool) -> u32 {
    let table: &[u32] = if tspin { &TSPIN_SCORES } else { &LINE_SCORES };
    table.get(lines).copied().unwrap_or(0)
}

/// Tetris, or any T-spin that clears at least one line
pub fn is_difficult(lines: usize, tspin: bool) -> bool {
    (lines == 4 && !tspin) || (tspin && lines > 0)
}

/// Apply the B2B multiplier (3/2), flooring
pub fn apply_b2b_multiplier(points: u32) -> u32 {
    points.saturating_mul(B2B_NUMERATOR) / B2B_DENOMINATOR
}

/// Combo bonus for the current counter (−1 or 0 means no bonus)
pub fn ren_bonus(combo: i32, level: u32) -> u32 {
    if combo <= 0 {
        return 0;
    }
    let idx = (combo as usize).min(REN_BONUS.len() - 1);
    REN_BONUS[idx].saturating_mul(level)
}

/// Drop points: 2 per row for a hard drop, 1 per row for soft drop
pub fn calculate_drop_score(rows: u32, is_hard_drop: bool) -> u32 {
    let per_row = if is_hard_drop {
        HARD_DROP_POINTS
    } else {
        SOFT_DROP_POINTS
    };
    rows.saturating_mul(per_row)
}

/// Level for a running line total
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity interval for a level
///
/// `(0.8 − (level−1)·0.007)^(level−1)` seconds, clamped below at `floor`.
/// Once the base reaches zero (level 116+) the floor applies.
pub fn fall_interval(level: u32, floor: Duration) -> Duration {
    let steps = level.saturating_sub(1) as f64;
    let base = 0.8 - steps * 0.007;
    if base <= 0.0 {
        return floor;
    }
    let secs = base.powf(steps);
    if !secs.is_finite() || secs < floor.as_secs_f64() {
        return floor;
    }
    Duration::from_secs_f64(secs)
}

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Base × level, with the B2B multiplier if applied.
    pub line_clear_score: u32,
    pub combo_bonus: u32,
    pub total: u32,
    pub difficult: bool,
    pub b2b_applied: bool,
}

/// Score for one clear
///
/// `combo` is the counter after this placement was counted.
pub fn calculate_score(
    lines: usize,
    level: u32,
    tspin: bool,
    combo: i32,
    previous_b2b: bool,
) -> ScoreResult {
    let difficult = is_difficult(lines, tspin);
    let b2b_applied = difficult && previous_b2b;

    let leveled = base_score(lines, tspin).saturating_mul(level);
    let line_clear_score = if b2b_applied {
        apply_b2b_multiplier(leveled)
    } else {
        leveled
    };

    let combo_bonus = if lines > 0 { ren_bonus(combo, level) } else { 0 };

    ScoreResult {
        line_clear_score,
        combo_bonus,
        total: line_clear_score.saturating_add(combo_bonus),
        difficult,
        b2b_applied,
    }
}

/// Text shown after a clear
///
/// The clear label comes first, then the extra tags sorted and
/// newline-joined (`Back-to-Back`, `<n> REN`).
pub fn clear_message(lines: usize, tspin: bool, b2b_applied: bool, combo: i32) -> Option<String> {
    if lines == 0 {
        return None;
    }
    let label = match (tspin, lines) {
        (true, 1) => "T-Spin Single",
        (true, 2) => "T-Spin Double",
        (true, 3) => "T-Spin Triple",
        (true, _) => "T-Spin",
        (false, 1) => "Single",
        (false, 2) => "Double",
        (false, 3) => "Triple",
        (false, _) => "Tetris",
    };

    let mut tags: Vec<String> = Vec::new();
    if b2b_applied {
        tags.push("Back-to-Back".to_string());
    }
    if combo > 0 {
        tags.push(format!("{} REN", combo));
    }
    tags.sort();

    let mut parts = vec![label.to_string()];
    parts.extend(tags);
    Some(parts.join("\n"))
}

/// Outcome of applying one committed clear
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearOutcome {
    pub result: ScoreResult,
    pub leveled_up: bool,
    pub message: Option<String>,
}

/// Running score, level, combo and back-to-back state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreState {
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    /// −1 when no combo is active
    pub combo: i32,
    pub back_to_back: bool,
}

impl ScoreState {
    pub fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            lines: 0,
            combo: -1,
            back_to_back: false,
        }
    }

    /// Count a placement toward the combo chain
    pub fn register_placement(&mut self, lines: usize) {
        if lines == 0 {
            self.combo = -1;
        } else {
            self.combo = self.combo.saturating_add(1);
        }
    }

    pub fn add_drop_points(&mut self, rows: u32, is_hard_drop: bool) {
        self.score = self
            .score
            .saturating_add(calculate_drop_score(rows, is_hard_drop));
    }

    /// Score a committed clear, update B2B, then recompute the level
    pub fn apply_clear(&mut self, lines: usize, tspin: bool) -> ClearOutcome {
        let result = calculate_score(lines, self.level, tspin, self.combo, self.back_to_back);
        self.score = self.score.saturating_add(result.total);

        if result.difficult {
            self.back_to_back = true;
        } else if lines > 0 {
            self.back_to_back = false;
        }

        self.lines = self.lines.saturating_add(lines as u32);
        let level = calculate_level(self.lines);
        let leveled_up = level > self.level;
        self.level = level;

        ClearOutcome {
            result,
            leveled_up,
            message: clear_message(lines, tspin, result.b2b_applied, self.combo),
        }
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rotation;

    fn scored(lines: usize, tspin: bool) -> u32 {
        calculate_score(lines, 1, tspin, 0, false).total
    }

    #[test]
    fn test_normal_clear_scores() {
        assert_eq!(scored(1, false), 100);
        assert_eq!(scored(2, false), 300);
        assert_eq!(scored(3, false), 500);
        assert_eq!(scored(4, false), 800);
    }

    #[test]
    fn test_tspin_clear_scores() {
        assert_eq!(scored(1, true), 800);
        assert_eq!(scored(2, true), 1200);
        assert_eq!(scored(3, true), 1600);
        assert_eq!(base_score(4, true), 0);
    }

    #[test]
    fn test_level_multiplies_base() {
        assert_eq!(calculate_score(2, 3, false, 0, false).total, 900);
    }

    #[test]
    fn test_back_to_back_tetris() {
        let mut state = ScoreState::new();
        state.register_placement(4);
        assert_eq!(state.apply_clear(4, false).result.total, 800);
        state.register_placement(0);
        state.register_placement(4);
        let second = state.apply_clear(4, false);
        assert_eq!(second.result.total, 1200);
        assert!(second.result.b2b_applied);
    }

    #[test]
    fn test_easy_clear_breaks_b2b_but_empty_placement_does_not() {
        let mut state = ScoreState::new();
        state.register_placement(4);
        state.apply_clear(4, false);
        assert!(state.back_to_back);

        state.register_placement(0);
        assert!(state.back_to_back);

        state.register_placement(1);
        state.apply_clear(1, false);
        assert!(!state.back_to_back);
    }

    #[test]
    fn test_combo_chain() {
        let mut state = ScoreState::new();
        let mut deltas = Vec::new();
        for _ in 0..3 {
            state.register_placement(1);
            deltas.push(state.apply_clear(1, false).result.total);
        }
        assert_eq!(deltas, vec![100, 150, 200]);
        assert_eq!(state.combo, 2);

        state.register_placement(0);
        assert_eq!(state.combo, -1);
    }

    #[test]
    fn test_ren_bonus_caps_at_last_entry() {
        assert_eq!(ren_bonus(-1, 1), 0);
        assert_eq!(ren_bonus(8, 1), 2000);
        assert_eq!(ren_bonus(30, 2), 4000);
    }

    #[test]
    fn test_level_progression() {
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(9), 1);
        assert_eq!(calculate_level(10), 2);
        assert_eq!(calculate_level(19), 2);
        assert_eq!(calculate_level(20), 3);
    }

    #[test]
    fn test_level_up_reported_after_delta() {
        let mut state = ScoreState::new();
        state.lines = 8;
        state.register_placement(2);
        let outcome = state.apply_clear(2, false);
        // Scored at level 1, then promoted.
        assert_eq!(outcome.result.total, 300);
        assert!(outcome.leveled_up);
        assert_eq!(state.level, 2);
    }

    #[test]
    fn test_fall_interval_formula() {
        let floor = Duration::from_millis(16);
        assert_eq!(fall_interval(1, floor), Duration::from_secs(1));
        assert_eq!(fall_interval(2, floor), Duration::from_secs_f64(0.793));
        assert_eq!(
            fall_interval(5, floor),
            Duration::from_secs_f64((0.8f64 - 4.0 * 0.007).powf(4.0))
        );
        assert_eq!(fall_interval(30, floor), floor);
        assert_eq!(fall_interval(500, floor), floor);
    }

    #[test]
    fn test_clear_messages() {
        assert_eq!(clear_message(0, false, false, -1), None);
        assert_eq!(clear_message(4, false, false, 0).as_deref(), Some("Tetris"));
        assert_eq!(
            clear_message(2, true, true, 3).as_deref(),
            Some("T-Spin Double\n3 REN\nBack-to-Back")
        );
    }

    #[test]
    fn test_tspin_needs_three_corners() {
        let board = Board::from_ascii(&[
            "#.........", // 18
            "..........", // 19 (floor below counts)
        ]);
        let t = Piece::new(PieceKind::T).rotated(true).rotated(true);
        assert_eq!(t.rotation, Rotation::South);
        // Pivot (1,19): corners (0,18) filled, (2,18) empty, (0,20)/(2,20) floor.
        assert!(detect_tspin(&board, &t, Position::new(1, 19), true));
        assert!(!detect_tspin(&board, &t, Position::new(1, 19), false));
        // Pivot (4,19): only the two floor corners.
        assert!(!detect_tspin(&board, &t, Position::new(4, 19), true));
    }

    #[test]
    fn test_tspin_corners_above_board_do_not_count() {
        let board = Board::new();
        let t = Piece::new(PieceKind::T);
        // Pivot (0,0): left corners are past the wall, top-right is above the board.
        assert!(!detect_tspin(&board, &t, Position::new(0, 0), true));
    }

    #[test]
    fn test_only_t_pieces_spin() {
        let board = Board::new();
        let j = Piece::new(PieceKind::J);
        assert!(!detect_tspin(&board, &j, Position::new(0, 19), true));
    }
}
