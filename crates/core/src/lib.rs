//! Core game rules - pure, deterministic, and testable
//!
//! This crate holds every rule of the game and nothing else. It has no
//! rendering, no raw input and no clock: the host feeds it classified
//! intents and timer firings, and reads snapshots back.
//!
//! # Module Structure
//!
//! - [`pieces`]: shape tables for the seven identities, live pieces and positions
//! - [`kicks`]: wall-kick candidates per rotation transition
//! - [`board`]: 10x20 grid with placement and two-phase line clearing
//! - [`rng`]: 7-bag randomizer with a five-piece lookahead
//! - [`collision`]: collision queries, ghost projection and kick-resolved rotation
//! - [`lock_down`]: grounded-piece grace period and move cap
//! - [`scoring`]: T-spins, back-to-back, combo bonus, levels and fall speed
//! - [`scheduler`]: the timer interface the session calls into
//! - [`session`]: the state machine tying it all together
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: every aligned run of seven draws is a permutation
//! - **Rotation**: `I` and `J/L/S/T/Z` kick tables; `O` never rotates
//! - **Lock Delay**: 500ms once grounded, forced after 15 grounded moves
//! - **Line Clear**: full rows are marked, then removed 200ms later
//! - **T-Spin**: a rotated-in `T` with three of four pivot corners occupied
//! - **Scoring**: level-scaled base, ×1.5 back-to-back, additive combo bonus
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_core::{GameSession, ManualScheduler, RulesConfig};
//! use blockfall_types::Intent;
//!
//! let mut game = GameSession::new(RulesConfig::default().with_seed(7), ManualScheduler::new());
//! game.start();
//!
//! game.apply_intent(Intent::MoveRight);
//! game.apply_intent(Intent::RotateCw);
//! game.apply_intent(Intent::HardDrop);
//! game.advance(Duration::from_millis(250));
//!
//! // Hard drop awards points
//! assert!(game.score() > 0);
//! ```

pub mod board;
pub mod collision;
pub mod config;
pub mod event;
pub mod kicks;
pub mod lock_down;
pub mod pieces;
pub mod rng;
pub mod scheduler;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use collision::{collides, ghost_position, rotate};
pub use config::RulesConfig;
pub use event::GameEvent;
pub use pieces::{get_shape, Piece, Position};
pub use rng::BagQueue;
pub use scheduler::{ManualScheduler, Scheduler};
pub use scoring::{calculate_drop_score, calculate_score, ScoreResult};
pub use session::{ActivePiece, GameSession};
pub use snapshot::{ActiveSnapshot, ClearMessage, GameSnapshot};
