//! Lock-down controller
//!
//! Tracks whether the active piece is resting on something and how many
//! moves it has spent there. The controller only decides; the session owns
//! the lock timer and arms/cancels it according to the returned steps.

/// What the session should do with the lock timer after a grounded action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStep {
    /// Piece is not grounded; nothing to do.
    Idle,
    /// Restart the grace period.
    Restart,
    /// Move cap exceeded: lock now, regardless of the timer.
    ForceLock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Grounded {
    lowest_row: i8,
    moves: u32,
}

/// Grounded/airborne state machine for one piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockDown {
    grounded: Option<Grounded>,
    move_limit: u32,
}

impl LockDown {
    pub fn new(move_limit: u32) -> Self {
        Self {
            grounded: None,
            move_limit,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded.is_some()
    }

    /// Moves made since grounding (or since the last new lowest row)
    pub fn moves(&self) -> u32 {
        self.grounded.map_or(0, |g| g.moves)
    }

    pub fn lowest_row(&self) -> Option<i8> {
        self.grounded.map(|g| g.lowest_row)
    }

    /// A downward move was blocked at `row`
    ///
    /// Returns true when this grounds the piece, meaning the lock timer
    /// should be armed. Already-grounded pieces keep their running timer.
    pub fn ground(&mut self, row: i8) -> bool {
        if self.grounded.is_some() {
            return false;
        }
        self.grounded = Some(Grounded {
            lowest_row: row,
            moves: 0,
        });
        true
    }

    /// A move or rotation succeeded with the pivot now at `row`
    pub fn on_action(&mut self, row: i8) -> LockStep {
        let move_limit = self.move_limit;
        let Some(grounded) = self.grounded.as_mut() else {
            return LockStep::Idle;
        };

        grounded.moves += 1;
        if grounded.moves > move_limit {
            return LockStep::ForceLock;
        }
        if row > grounded.lowest_row {
            grounded.lowest_row = row;
            grounded.moves = 0;
        }
        LockStep::Restart
    }

    /// A downward move succeeded; returns true if the timer must be cancelled
    pub fn release(&mut self) -> bool {
        self.grounded.take().is_some()
    }

    /// Forget everything (lock, spawn, hold, restart)
    pub fn clear(&mut self) {
        self.grounded = None;
    }
}
