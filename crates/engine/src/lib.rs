//! Host-side helpers that drive a session only through its intents.
//!
//! - [`place`]: move the active piece to a target column/rotation and hard-drop it
//! - [`autoplay`]: a greedy placement chooser for headless play

pub mod autoplay;
pub mod place;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use autoplay::{best_placement, evaluate_board, Placement};
pub use place::{apply_place, PlaceError};
