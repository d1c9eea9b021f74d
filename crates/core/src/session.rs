//! Game session - the rules state machine
//!
//! Owns the board, bag, active/held pieces, lock-down state and score, and
//! sequences them per player intent and per timer firing. Time never passes
//! inside the session: every delay is requested from the [`Scheduler`] and
//! comes back through [`GameSession::on_tick`].
//!
//! Placement is two-phase when rows complete. The piece is written and the
//! full rows are marked `Clearing`; the rows are removed, scored and the next
//! piece spawned only when `ClearCommit` fires. There is no active piece in
//! between, so gameplay intents are no-ops during that window.

use std::time::Duration;

use tracing::{debug, info, trace};

use crate::board::{Board, RowSet};
use crate::collision::{self, can_fall, collides, drop_distance, ghost_position};
use crate::config::RulesConfig;
use crate::event::{GameEvent, Listener};
use crate::lock_down::{LockDown, LockStep};
use crate::pieces::{Piece, Position};
use crate::rng::BagQueue;
use crate::scheduler::{ManualScheduler, Scheduler};
use crate::scoring::{detect_tspin, fall_interval, ScoreState};
use crate::snapshot::{ActiveSnapshot, ClearMessage, GameSnapshot};
use crate::types::{Intent, PieceKind, TimerKind, NEXT_QUEUE_SIZE};

/// The falling piece and where its pivot is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub piece: Piece,
    pub position: Position,
}

impl ActivePiece {
    pub fn kind(&self) -> PieceKind {
        self.piece.kind
    }
}

#[derive(Debug, Clone)]
struct PendingClear {
    rows: RowSet,
    tspin: bool,
}

const ALL_TIMERS: [TimerKind; 5] = [
    TimerKind::Gravity,
    TimerKind::LockDown,
    TimerKind::ClearCommit,
    TimerKind::SoftDrop,
    TimerKind::MessageExpiry,
];

pub struct GameSession<S: Scheduler> {
    config: RulesConfig,
    scheduler: S,
    listener: Option<Listener>,
    board: Board,
    bag: BagQueue,
    active: Option<ActivePiece>,
    hold: Option<PieceKind>,
    can_hold: bool,
    lock: LockDown,
    score: ScoreState,
    last_was_rotation: bool,
    pending_clear: Option<PendingClear>,
    message: Option<String>,
    soft_dropping: bool,
    paused: bool,
    game_over: bool,
    started: bool,
}

impl<S: Scheduler> GameSession<S> {
    pub fn new(config: RulesConfig, scheduler: S) -> Self {
        let bag = BagQueue::new(config.seed);
        let lock = LockDown::new(config.lock_move_limit);
        Self {
            config,
            scheduler,
            listener: None,
            board: Board::new(),
            bag,
            active: None,
            hold: None,
            can_hold: true,
            lock,
            score: ScoreState::new(),
            last_was_rotation: false,
            pending_clear: None,
            message: None,
            soft_dropping: false,
            paused: false,
            game_over: false,
            started: false,
        }
    }

    /// Create a session that reports every change to `listener`
    pub fn with_listener(
        config: RulesConfig,
        scheduler: S,
        listener: impl FnMut(&GameEvent) + 'static,
    ) -> Self {
        let mut session = Self::new(config, scheduler);
        session.listener = Some(Box::new(listener));
        session
    }

    /// Spawn the first piece and start gravity
    pub fn start(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        if self.spawn_next() {
            self.arm_gravity();
        }
        true
    }

    fn emit(&mut self, event: GameEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }

    // Accessors

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    /// Where the active piece would land if hard-dropped now
    pub fn ghost_position(&self) -> Option<Position> {
        let active = self.active?;
        Some(ghost_position(&self.board, &active.piece, active.position))
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn next_queue(&self) -> [PieceKind; NEXT_QUEUE_SIZE] {
        self.bag.next_queue()
    }

    pub fn score(&self) -> u32 {
        self.score.score
    }

    pub fn level(&self) -> u32 {
        self.score.level
    }

    pub fn lines(&self) -> u32 {
        self.score.lines
    }

    /// Combo counter, −1 when no combo is running
    pub fn combo(&self) -> i32 {
        self.score.combo
    }

    pub fn back_to_back(&self) -> bool {
        self.score.back_to_back
    }

    pub fn clear_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Started, not paused and not over
    pub fn playable(&self) -> bool {
        self.started && !self.paused && !self.game_over
    }

    pub fn soft_dropping(&self) -> bool {
        self.soft_dropping
    }

    pub fn clear_pending(&self) -> bool {
        self.pending_clear.is_some()
    }

    pub fn is_grounded(&self) -> bool {
        self.lock.is_grounded()
    }

    /// Moves spent while grounded on the current piece
    pub fn lock_moves(&self) -> u32 {
        self.lock.moves()
    }

    pub fn last_action_was_rotation(&self) -> bool {
        self.last_was_rotation
    }

    /// Gravity period at the current level
    pub fn fall_interval(&self) -> Duration {
        fall_interval(self.score.level, self.config.min_fall_interval)
    }

    /// Replace the board contents for test setups
    ///
    /// The active piece is left where it is. Only built for this crate's
    /// tests or with the `test-support` feature.
    #[cfg(any(test, feature = "test-support"))]
    pub fn load_board(&mut self, board: Board) {
        self.board = board;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);
        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost = self.ghost_position();
        out.hold = self.hold;
        out.can_hold = self.can_hold;
        out.next_queue = self.bag.next_queue();
        out.score = self.score.score;
        out.level = self.score.level;
        out.lines = self.score.lines;
        out.combo = self.score.combo;
        out.back_to_back = self.score.back_to_back;
        let lifetime = self.config.message_lifetime;
        out.message = self.message.as_ref().map(|text| ClearMessage {
            text: text.clone(),
            lifetime_ms: lifetime.as_millis() as u64,
            expires_in_ms: self
                .scheduler
                .remaining(TimerKind::MessageExpiry)
                .unwrap_or(lifetime)
                .as_millis() as u64,
        });
        out.clear_pending = self.pending_clear.is_some();
        out.soft_dropping = self.soft_dropping;
        out.paused = self.paused;
        out.game_over = self.game_over;
        out.fall_interval_ms = self.fall_interval().as_millis() as u64;
        out.seed = self.bag.seed();
    }

    // Entry points

    /// Apply a player intent; returns false when it was rejected
    pub fn apply_intent(&mut self, intent: Intent) -> bool {
        trace!(intent = intent.as_str(), "intent");
        match intent {
            Intent::Restart => {
                self.restart();
                true
            }
            Intent::Pause => self.pause(),
            Intent::Resume => self.resume(),
            _ if !self.playable() => false,
            Intent::MoveLeft => self.shift(-1),
            Intent::MoveRight => self.shift(1),
            Intent::RotateCw => self.rotate(true),
            Intent::RotateCcw => self.rotate(false),
            Intent::SoftDropStart => self.soft_drop_start(),
            Intent::SoftDropStop => self.soft_drop_stop(),
            Intent::HardDrop => self.hard_drop(),
            Intent::Hold => self.hold(),
        }
    }

    /// Handle a fired timer; returns false when it changed nothing
    pub fn on_tick(&mut self, kind: TimerKind) -> bool {
        match kind {
            // These two run even while paused.
            TimerKind::ClearCommit => self.commit_clear(),
            TimerKind::MessageExpiry => self.expire_message(),
            _ if !self.playable() => false,
            TimerKind::Gravity => self.step_down(false),
            TimerKind::SoftDrop => self.step_down(true),
            TimerKind::LockDown => self.lock_timer_fired(),
        }
    }

    // Movement

    fn shift(&mut self, dcol: i8) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let target = active.position.offset(dcol, 0);
        if collides(&self.board, &active.piece, target) {
            return false;
        }

        self.active = Some(ActivePiece {
            position: target,
            ..active
        });
        self.last_was_rotation = false;
        self.emit(GameEvent::Moved { position: target });
        self.after_grounded_action(&active.piece, target);
        true
    }

    fn rotate(&mut self, clockwise: bool) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let Some((piece, position)) =
            collision::rotate(&self.board, &active.piece, active.position, clockwise)
        else {
            return false;
        };

        self.active = Some(ActivePiece { piece, position });
        self.last_was_rotation = true;
        self.emit(GameEvent::Rotated { piece, position });
        self.after_grounded_action(&piece, position);
        true
    }

    /// Lock-delay bookkeeping after a successful move or rotation
    ///
    /// A piece that moved off its support is airborne again and its
    /// grounded state is dropped.
    fn after_grounded_action(&mut self, piece: &Piece, position: Position) {
        if can_fall(&self.board, piece, position) {
            if self.lock.release() {
                trace!(col = position.col, row = position.row, "left the ground");
                self.scheduler.cancel(TimerKind::LockDown);
            }
            return;
        }
        match self.lock.on_action(position.row) {
            LockStep::Idle => {}
            LockStep::Restart => {
                self.scheduler
                    .schedule_once(self.config.lock_delay, TimerKind::LockDown);
            }
            LockStep::ForceLock => {
                debug!(moves = self.lock.moves(), "move cap exceeded, forcing lock");
                self.finalize();
            }
        }
    }

    /// One row down for gravity or a soft-drop tick
    fn step_down(&mut self, soft: bool) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let target = active.position.offset(0, 1);

        if collides(&self.board, &active.piece, target) {
            if self.lock.ground(active.position.row) {
                trace!(row = active.position.row, "grounded");
                self.scheduler
                    .schedule_once(self.config.lock_delay, TimerKind::LockDown);
            }
            return false;
        }

        self.active = Some(ActivePiece {
            position: target,
            ..active
        });
        self.last_was_rotation = false;
        if self.lock.release() {
            self.scheduler.cancel(TimerKind::LockDown);
        }
        if soft {
            self.score.add_drop_points(1, false);
        }
        self.emit(GameEvent::Moved { position: target });
        true
    }

    fn lock_timer_fired(&mut self) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        if !self.lock.is_grounded() {
            return false;
        }
        // Something moved it off its support without a fall in between.
        if can_fall(&self.board, &active.piece, active.position) {
            self.lock.release();
            return false;
        }
        self.finalize();
        true
    }

    fn hard_drop(&mut self) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let distance = drop_distance(&self.board, &active.piece, active.position);
        if distance > 0 {
            self.active = Some(ActivePiece {
                position: active.position.offset(0, distance),
                ..active
            });
            self.score.add_drop_points(distance as u32, true);
        }
        // A hard drop never counts as a spin, even from the resting row.
        self.last_was_rotation = false;
        self.finalize();
        true
    }

    // Placement and clearing

    /// Write the active piece into the board and start the clear, or spawn
    fn finalize(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        self.lock.clear();
        self.scheduler.cancel(TimerKind::LockDown);

        // Corners are judged against the board without the piece itself.
        let tspin = detect_tspin(
            &self.board,
            &active.piece,
            active.position,
            self.last_was_rotation,
        );
        self.board.place(&active.piece, active.position);
        debug!(
            kind = active.piece.kind.as_str(),
            col = active.position.col,
            row = active.position.row,
            tspin,
            "piece locked"
        );
        self.emit(GameEvent::Locked {
            piece: active.piece,
            position: active.position,
        });

        let rows = self.board.scan_full_rows();
        self.score.register_placement(rows.len());
        if rows.is_empty() {
            self.spawn_next();
            return;
        }

        self.board.mark_clearing(&rows);
        self.emit(GameEvent::LinesMarked {
            rows: rows.to_vec(),
        });
        self.pending_clear = Some(PendingClear { rows, tspin });
        self.scheduler
            .schedule_once(self.config.clear_delay, TimerKind::ClearCommit);
    }

    fn commit_clear(&mut self) -> bool {
        let Some(pending) = self.pending_clear.take() else {
            return false;
        };
        let lines = self.board.commit_clear(&pending.rows);
        let outcome = self.score.apply_clear(lines, pending.tspin);
        debug!(
            lines,
            tspin = pending.tspin,
            delta = outcome.result.total,
            combo = self.score.combo,
            "lines cleared"
        );
        self.emit(GameEvent::LinesCleared {
            lines,
            tspin: pending.tspin,
            score_delta: outcome.result.total,
            back_to_back: outcome.result.b2b_applied,
            combo: self.score.combo,
        });

        if let Some(text) = outcome.message {
            self.message = Some(text);
            self.scheduler
                .schedule_once(self.config.message_lifetime, TimerKind::MessageExpiry);
        }

        if outcome.leveled_up {
            let level = self.score.level;
            info!(level, "level up");
            self.emit(GameEvent::LevelUp { level });
            if !self.soft_dropping && !self.paused {
                self.arm_gravity();
            }
        }

        self.spawn_next();
        true
    }

    fn expire_message(&mut self) -> bool {
        if self.message.take().is_none() {
            return false;
        }
        self.emit(GameEvent::MessageExpired);
        true
    }

    // Spawning

    /// Draw from the bag and start a new turn
    fn spawn_next(&mut self) -> bool {
        let kind = self.bag.dequeue_next();
        self.can_hold = true;
        self.spawn(kind)
    }

    /// Put `kind` at the spawn anchor; game over if it collides there
    fn spawn(&mut self, kind: PieceKind) -> bool {
        let piece = Piece::new(kind);
        let position = Position::spawn();
        self.active = Some(ActivePiece { piece, position });
        self.lock.clear();
        self.last_was_rotation = false;

        if collides(&self.board, &piece, position) {
            self.enter_game_over();
            return false;
        }
        debug!(kind = kind.as_str(), "spawned");
        self.emit(GameEvent::Spawned { kind });
        true
    }

    fn enter_game_over(&mut self) {
        self.game_over = true;
        self.soft_dropping = false;
        for kind in [TimerKind::Gravity, TimerKind::LockDown, TimerKind::SoftDrop] {
            self.scheduler.cancel(kind);
        }
        info!(score = self.score.score, lines = self.score.lines, "game over");
        self.emit(GameEvent::GameOver);
    }

    fn hold(&mut self) -> bool {
        if !self.can_hold {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let current = active.piece.kind;
        self.can_hold = false;
        self.scheduler.cancel(TimerKind::LockDown);

        let incoming = match self.hold.replace(current) {
            Some(held) => held,
            None => self.bag.dequeue_next(),
        };
        debug!(held = current.as_str(), incoming = incoming.as_str(), "hold");
        self.emit(GameEvent::Held { held: current });
        self.spawn(incoming);
        true
    }

    // Timing state

    fn arm_gravity(&mut self) {
        let interval = self.fall_interval();
        self.scheduler
            .schedule_repeating(interval, TimerKind::Gravity);
    }

    fn soft_drop_start(&mut self) -> bool {
        if self.soft_dropping {
            return false;
        }
        self.soft_dropping = true;
        self.scheduler.cancel(TimerKind::Gravity);
        self.scheduler
            .schedule_repeating(self.config.soft_drop_interval, TimerKind::SoftDrop);
        true
    }

    fn soft_drop_stop(&mut self) -> bool {
        if !self.soft_dropping {
            return false;
        }
        self.soft_dropping = false;
        self.scheduler.cancel(TimerKind::SoftDrop);
        self.arm_gravity();
        true
    }

    /// Pausing also ends a held soft drop.
    fn pause(&mut self) -> bool {
        if !self.started || self.paused || self.game_over {
            return false;
        }
        self.paused = true;
        self.soft_dropping = false;
        for kind in [TimerKind::Gravity, TimerKind::LockDown, TimerKind::SoftDrop] {
            self.scheduler.cancel(kind);
        }
        info!("paused");
        self.emit(GameEvent::Paused);
        true
    }

    fn resume(&mut self) -> bool {
        if !self.paused || self.game_over {
            return false;
        }
        self.paused = false;
        self.arm_gravity();
        if self.lock.is_grounded() {
            self.scheduler
                .schedule_once(self.config.lock_delay, TimerKind::LockDown);
        }
        info!("resumed");
        self.emit(GameEvent::Resumed);
        true
    }

    /// Discard everything, including in-flight timers, and start over
    fn restart(&mut self) {
        for kind in ALL_TIMERS {
            self.scheduler.cancel(kind);
        }
        self.board.clear();
        self.bag.reset();
        self.active = None;
        self.hold = None;
        self.can_hold = true;
        self.lock.clear();
        self.score = ScoreState::new();
        self.last_was_rotation = false;
        self.pending_clear = None;
        self.message = None;
        self.soft_dropping = false;
        self.paused = false;
        self.game_over = false;
        self.started = true;
        info!(seed = ?self.bag.seed(), "restarted");
        self.emit(GameEvent::Restarted);

        if self.spawn_next() {
            self.arm_gravity();
        }
    }
}

impl GameSession<ManualScheduler> {
    /// Run virtual time forward by `dt`, delivering every due timer in order
    ///
    /// Returns how many timers fired.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let until = self.scheduler.now() + dt;
        let mut fired = 0;
        while let Some(kind) = self.scheduler.pop_due(until) {
            self.on_tick(kind);
            fired += 1;
        }
        self.scheduler.set_now(until);
        fired
    }
}
