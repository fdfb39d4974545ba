//! Game rules and session state.
//!
//! This module drives the core data structures through a game:
//!
//! - [`GameSession`] - Board, falling piece and score, with every move routed through it
//! - [`GameStats`] - Score, locked pieces, cleared rows and games played
//! - [`GameConfig`] - Board size, per-row bonus and gravity interval
//! - [`PieceGenerator`] - Seedable source of spawned pieces
//! - [`PieceSeed`] - Seed for deterministic piece generation
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`]; the first piece spawns immediately
//! 2. Input moves and rotates the falling piece, rejected moves change nothing
//! 3. Gravity and down input call [`GameSession::move_down`]
//! 4. A piece that cannot move down locks, full rows clear and score
//! 5. The next piece spawns; if it does not fit, the game is over
//! 6. [`GameSession::restart`] starts a new game on an empty board
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Command, CommandOutcome, GameConfig, GameSession};
//!
//! let mut session = GameSession::new(GameConfig::default());
//!
//! session.apply(Command::Rotate);
//! session.apply(Command::MoveRight);
//!
//! loop {
//!     match session.apply(Command::MoveDown) {
//!         CommandOutcome::GameOver { final_score, .. } => {
//!             println!("game over with {final_score} points");
//!             break;
//!         }
//!         _ => {}
//!     }
//! }
//! ```

pub use self::{config::*, game_session::*, game_stats::*, piece_generator::*};

mod config;
mod game_session;
mod game_stats;
mod piece_generator;
