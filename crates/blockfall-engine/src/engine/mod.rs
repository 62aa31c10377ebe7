//! Game engine logic and state management.
//!
//! This module drives the core data structures through a game:
//!
//! - [`GameField`] - Board, falling piece, next piece and the piece generator
//! - [`GameSession`] - Timed state machine: gravity, line-clear pause, game over
//! - [`GameStats`] - Score, level, cleared lines and locked pieces
//! - [`PieceGenerator`] - Uniform random piece kinds from a [`PieceSeed`]
//! - [`Input`] - Player commands consumed by [`GameSession::tick`]
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`], optionally with a fixed seed
//! 2. Call [`GameSession::tick`] once per frame with the elapsed time and the
//!    inputs received since the previous frame
//! 3. Gravity moves the piece down; when it cannot move it locks
//! 4. Full rows flash for a short pause, then collapse and score
//! 5. Repeat until a locked block reaches the top row
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{GameSession, Input};
//!
//! let mut session = GameSession::new();
//! let outcome = session.tick(Duration::from_millis(16), &[Input::MoveLeft, Input::Rotate]);
//! assert!(outcome.is_continue());
//!
//! let outcome = session.tick(Duration::from_millis(16), &[Input::Quit]);
//! assert!(outcome.is_quit());
//! ```

pub use self::{game_field::*, game_session::*, game_stats::*, input::*, piece_generator::*};

mod game_field;
mod game_session;
mod game_stats;
mod input;
mod piece_generator;
