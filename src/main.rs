//! Headless runner (default binary).
//!
//! Plays one game with the greedy placement chooser on a virtual clock and
//! prints the final snapshot as JSON on stdout. Logs go to stderr.
//!
//! Environment: `BLOCKFALL_PIECES` (default 200), `BLOCKFALL_LOG` (level,
//! default `info`) and the rule overrides read by `RulesConfig::from_env`.

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::{debug, info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

use blockfall::core::{GameEvent, GameSession, ManualScheduler, RulesConfig};
use blockfall::engine::{apply_place, best_placement};

fn init_logging() {
    let level = env::var("BLOCKFALL_LOG")
        .ok()
        .and_then(|s| Level::from_str(s.trim()).ok())
        .unwrap_or(Level::INFO);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(LevelFilter::from_level(level))
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let config = RulesConfig::from_env();
    let pieces: usize = env::var("BLOCKFALL_PIECES")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(200);
    info!(seed = ?config.seed, pieces, "starting headless game");

    let mut session = GameSession::with_listener(config, ManualScheduler::new(), |event| {
        if let GameEvent::LinesCleared {
            lines,
            tspin,
            score_delta,
            ..
        } = event
        {
            debug!(lines, tspin, score_delta, "clear");
        }
    });
    session.start();

    let mut placed = 0;
    while placed < pieces && !session.game_over() {
        let Some(target) = best_placement(&session) else {
            break;
        };

        if let Err(err) = apply_place(&mut session, target.col, target.rotation, target.use_hold) {
            if session.game_over() {
                break;
            }
            return Err(err).with_context(|| format!("placing piece {}", placed + 1));
        }
        placed += 1;

        // Let the pending clear commit so the next piece spawns.
        if session.clear_pending() {
            let delay = session.config().clear_delay;
            session.advance(delay);
        }
    }

    info!(
        placed,
        score = session.score(),
        lines = session.lines(),
        level = session.level(),
        game_over = session.game_over(),
        "finished"
    );

    let json = serde_json::to_string_pretty(&session.snapshot()).context("serializing snapshot")?;
    println!("{}", json);
    Ok(())
}
