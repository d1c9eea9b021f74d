//! Blockfall (workspace facade crate).
//!
//! Re-exports the workspace crates as `blockfall::{types,core,engine}` so
//! hosts and integration tests depend on one package while the
//! implementation lives in dedicated crates under `crates/`.

pub use blockfall_core as core;
pub use blockfall_engine as engine;
pub use blockfall_types as types;
