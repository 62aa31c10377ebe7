use std::{mem, time::Duration};

use crate::{
    MoveError,
    core::{
        board::{Board, FullRows},
        piece::Piece,
        shape::PieceKind,
    },
};

use super::{
    game_field::GameField,
    game_stats::GameStats,
    input::Input,
    piece_generator::PieceSeed,
};

/// How long completed rows stay on the board before they collapse.
pub const LINE_CLEAR_DURATION: Duration = Duration::from_millis(120);

const BASE_FALL_MILLIS: u64 = 500;
const FALL_MILLIS_PER_LEVEL: u64 = 40;
const MIN_FALL_MILLIS: u64 = 120;

/// Returns the gravity interval at `level`: `max(0.12, 0.5 - (level - 1) * 0.04)` seconds.
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::fall_interval;
///
/// assert_eq!(fall_interval(1), Duration::from_millis(500));
/// assert_eq!(fall_interval(10), Duration::from_millis(140));
/// assert_eq!(fall_interval(99), Duration::from_millis(120));
/// ```
#[must_use]
pub fn fall_interval(level: usize) -> Duration {
    let steps = u64::try_from(level.saturating_sub(1)).unwrap_or(u64::MAX);
    let millis = BASE_FALL_MILLIS
        .saturating_sub(steps.saturating_mul(FALL_MILLIS_PER_LEVEL))
        .max(MIN_FALL_MILLIS);
    Duration::from_millis(millis)
}

/// Phase of a session.
///
/// The merge step between a piece being blocked and the next phase happens inside a
/// single call and is never observable as a state of its own.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    /// A piece is falling and accepts input.
    Falling,
    /// A lock completed `rows`; they collapse once `remaining` runs out.
    ///
    /// Input is ignored and gravity is suspended meanwhile.
    ClearingLines { rows: FullRows, remaining: Duration },
    /// A locked block reached the top row. Terminal.
    GameOver,
}

/// What the caller's loop should do after a [`GameSession::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    Continue,
    Quit,
}

/// A single game from the first spawn to game over.
///
/// The session owns all mutable game state and is advanced by [`Self::tick`], which
/// applies elapsed time (gravity and the line-clear pause) and then the player's
/// inputs. Nothing happens between ticks.
#[derive(Debug, Clone)]
pub struct GameSession {
    field: GameField,
    stats: GameStats,
    state: SessionState,
    fall_elapsed: Duration,
    play_time: Duration,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Starts a session on an empty board with a random piece sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::from_field(GameField::new())
    }

    /// Starts a session on an empty board with a reproducible piece sequence.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::from_field(GameField::with_seed(seed))
    }

    /// Starts a session from an arbitrary field, e.g. a prepared board in tests.
    #[must_use]
    pub fn from_field(field: GameField) -> Self {
        Self {
            field,
            stats: GameStats::new(),
            state: SessionState::Falling,
            fall_elapsed: Duration::ZERO,
            play_time: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.field.board()
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        self.field.falling_piece()
    }

    #[must_use]
    pub fn next_piece(&self) -> PieceKind {
        self.field.next_piece()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Time spent playing, excluding time after game over.
    #[must_use]
    pub fn play_time(&self) -> Duration {
        self.play_time
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.field.seed()
    }

    /// Rows that are flashing before they collapse, if a line clear is in progress.
    #[must_use]
    pub fn clearing_rows(&self) -> Option<&[usize]> {
        match &self.state {
            SessionState::ClearingLines { rows, .. } => Some(rows.as_slice()),
            _ => None,
        }
    }

    /// Where the falling piece would land if dropped straight down.
    #[must_use]
    pub fn simulate_drop_position(&self) -> Piece {
        self.field.simulate_drop_position()
    }

    /// Advances the session by one frame.
    ///
    /// A [`Input::Quit`] anywhere in `inputs` ends the frame at once, with no state
    /// change. Otherwise `elapsed` is applied first (at most one gravity step), then
    /// each input in order. Rejected moves are silently dropped.
    pub fn tick(&mut self, elapsed: Duration, inputs: &[Input]) -> TickOutcome {
        if inputs.iter().any(Input::is_quit) {
            return TickOutcome::Quit;
        }
        self.advance_time(elapsed);
        for input in inputs {
            _ = self.apply_input(*input);
        }
        TickOutcome::Continue
    }

    /// Applies a single movement input.
    ///
    /// [`Input::Quit`] has no effect on the session; it is handled by [`Self::tick`].
    pub fn apply_input(&mut self, input: Input) -> Result<(), MoveError> {
        match input {
            Input::MoveLeft => self.try_move_left(),
            Input::MoveRight => self.try_move_right(),
            Input::SoftDrop => self.try_soft_drop(),
            Input::Rotate => self.try_rotate(),
            Input::Quit => Ok(()),
        }
    }

    /// Applies elapsed time: counts down the line-clear pause, or runs gravity.
    pub fn advance_time(&mut self, elapsed: Duration) {
        match &mut self.state {
            SessionState::GameOver => {}
            SessionState::ClearingLines { remaining, .. } => {
                self.play_time += elapsed;
                *remaining = remaining.saturating_sub(elapsed);
                if remaining.is_zero() {
                    self.finish_line_clear();
                }
            }
            SessionState::Falling => {
                self.play_time += elapsed;
                self.fall_elapsed += elapsed;
                if self.fall_elapsed > fall_interval(self.stats.level()) {
                    self.fall_elapsed = Duration::ZERO;
                    self.gravity_step();
                }
            }
        }
    }

    pub fn try_move_left(&mut self) -> Result<(), MoveError> {
        self.try_move(-1, 0)
    }

    pub fn try_move_right(&mut self) -> Result<(), MoveError> {
        self.try_move(1, 0)
    }

    /// Moves the piece down one row. A blocked soft drop does not lock the piece.
    pub fn try_soft_drop(&mut self) -> Result<(), MoveError> {
        self.try_move(0, 1)
    }

    pub fn try_rotate(&mut self) -> Result<(), MoveError> {
        self.ensure_falling()?;
        self.field.try_rotate().map_err(MoveError::PieceCollision)
    }

    fn try_move(&mut self, dx: i32, dy: i32) -> Result<(), MoveError> {
        self.ensure_falling()?;
        self.field
            .try_move(dx, dy)
            .map_err(MoveError::PieceCollision)
    }

    fn ensure_falling(&self) -> Result<(), MoveError> {
        if self.state.is_falling() {
            Ok(())
        } else {
            Err(MoveError::NotFalling)
        }
    }

    fn gravity_step(&mut self) {
        if self.field.try_move(0, 1).is_ok() {
            return;
        }
        if self.field.falling_piece().y() <= Piece::SPAWN_Y {
            self.field.lock_falling_piece();
            self.stats.complete_piece_lock();
            self.state = SessionState::GameOver;
            return;
        }
        self.lock_falling_piece();
    }

    fn lock_falling_piece(&mut self) {
        let rows = self.field.lock_falling_piece();
        self.stats.complete_piece_lock();
        if rows.is_empty() {
            self.resolve_lock();
        } else {
            self.state = SessionState::ClearingLines {
                rows,
                remaining: LINE_CLEAR_DURATION,
            };
        }
    }

    fn finish_line_clear(&mut self) {
        let SessionState::ClearingLines { rows, .. } =
            mem::replace(&mut self.state, SessionState::Falling)
        else {
            return;
        };
        let cleared = self.field.clear_rows(&rows);
        self.stats.complete_line_clear(cleared);
        self.resolve_lock();
    }

    fn resolve_lock(&mut self) {
        if self.field.board().is_topped_out() {
            self.state = SessionState::GameOver;
            return;
        }
        self.field.spawn_next();
        self.fall_elapsed = Duration::ZERO;
        self.state = SessionState::Falling;
    }
}
