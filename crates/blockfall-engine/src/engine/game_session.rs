use rand::Rng;
use rand_pcg::Pcg32;

use crate::{
    PieceCollisionError,
    core::{ActivePiece, Board, collision},
};

use super::{GameConfig, GameStats, PieceGenerator, PieceSeed};

/// Observable state of a [`GameSession`].
///
/// Spawning a new piece happens synchronously inside the calls that need it, so a
/// session is always either playing or waiting for a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    /// A piece is falling and play commands are accepted.
    Active,
    /// The last spawned piece did not fit. Only [`GameSession::restart`] is accepted.
    GameOver,
}

/// Player or timer command routed through [`GameSession::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Command {
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate,
    Restart,
}

/// Result of locking a piece into the board.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LockReport {
    /// Indices of the cleared rows, as they were numbered before clearing.
    pub cleared_rows: Vec<usize>,
    pub score_gained: u64,
}

/// Result of [`GameSession::move_down`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// The piece moved one row down.
    Moved,
    /// The piece locked and a new piece spawned.
    Locked(LockReport),
    /// The piece locked and the next piece did not fit.
    GameOver {
        report: LockReport,
        final_score: u64,
    },
}

/// Result of [`GameSession::apply`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum CommandOutcome {
    /// The piece moved or rotated.
    Moved,
    /// The move or rotation was rejected and nothing changed.
    Blocked,
    Locked(LockReport),
    GameOver {
        report: LockReport,
        final_score: u64,
    },
    Restarted,
}

impl From<DropOutcome> for CommandOutcome {
    fn from(outcome: DropOutcome) -> Self {
        match outcome {
            DropOutcome::Moved => Self::Moved,
            DropOutcome::Locked(report) => Self::Locked(report),
            DropOutcome::GameOver {
                report,
                final_score,
            } => Self::GameOver {
                report,
                final_score,
            },
        }
    }
}

impl From<Result<(), PieceCollisionError>> for CommandOutcome {
    fn from(result: Result<(), PieceCollisionError>) -> Self {
        match result {
            Ok(()) => Self::Moved,
            Err(PieceCollisionError) => Self::Blocked,
        }
    }
}

/// A single game: the board, the falling piece, the score and the piece source.
///
/// All mutation goes through the session's methods. Moves and rotations compute a
/// candidate piece, check it with [`collision::is_valid`] and commit it only if it
/// fits, so a rejected command has no observable effect.
///
/// # Panics
///
/// Play commands panic while the session is [`SessionState::GameOver`], and
/// [`GameSession::restart`] panics while it is [`SessionState::Active`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{DropOutcome, GameConfig, GameSession, PieceSeed};
///
/// let seed: PieceSeed = "00000000000000000000000000000001".parse().unwrap();
/// let mut session = GameSession::with_seed(GameConfig::default(), seed);
///
/// session.move_left().ok();
/// session.rotate().ok();
/// while session.move_down().is_moved() {}
///
/// assert_eq!(session.stats().completed_pieces(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession<R = Pcg32> {
    config: GameConfig,
    board: Board,
    active_piece: Option<ActivePiece>,
    generator: PieceGenerator<R>,
    stats: GameStats,
}

fn check_config(config: &GameConfig) {
    if let Err(e) = config.validate() {
        panic!("invalid game config: {e}");
    }
}

impl GameSession {
    /// Starts a session whose pieces come from OS entropy.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_generator(config, PieceGenerator::new())
    }

    /// Starts a session with a reproducible piece sequence.
    #[must_use]
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Self {
        Self::with_generator(config, PieceGenerator::with_seed(seed))
    }
}

impl<R: Rng> GameSession<R> {
    /// Starts a session drawing pieces from `generator`.
    ///
    /// # Panics
    ///
    /// Panics if `config` does not pass [`GameConfig::validate`].
    #[must_use]
    pub fn with_generator(config: GameConfig, generator: PieceGenerator<R>) -> Self {
        check_config(&config);
        let board = Board::new(config.board_width, config.board_height);
        Self::with_board(config, board, generator)
    }

    /// Starts a session on a pre-populated board.
    ///
    /// The first piece is spawned immediately, so the session starts in
    /// [`SessionState::GameOver`] if it does not fit.
    ///
    /// # Panics
    ///
    /// Panics if `config` is invalid or the board size differs from it.
    #[must_use]
    pub fn with_board(config: GameConfig, board: Board, generator: PieceGenerator<R>) -> Self {
        check_config(&config);
        assert!(
            board.width() == config.board_width && board.height() == config.board_height,
            "board is {}x{} but config expects {}x{}",
            board.width(),
            board.height(),
            config.board_width,
            config.board_height
        );
        let mut session = Self {
            config,
            board,
            active_piece: None,
            generator,
            stats: GameStats::new(),
        };
        session.spawn_piece();
        session
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the falling piece, or `None` once the game is over.
    #[must_use]
    pub const fn active_piece(&self) -> Option<&ActivePiece> {
        self.active_piece.as_ref()
    }

    #[must_use]
    pub const fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        if self.active_piece.is_some() {
            SessionState::Active
        } else {
            SessionState::GameOver
        }
    }

    fn expect_active(&self) -> ActivePiece {
        match self.active_piece {
            Some(piece) => piece,
            None => panic!("play command issued while the game is over"),
        }
    }

    /// Spawns the next piece, or ends the game if it does not fit.
    fn spawn_piece(&mut self) -> bool {
        let piece = self.generator.next_piece(self.board.width());
        if collision::is_colliding(&self.board, &piece) {
            log::info!(
                "game over: {} did not fit at {:?}, final score {}",
                piece.kind(),
                piece.position(),
                self.stats.score()
            );
            self.active_piece = None;
            return false;
        }
        log::debug!("spawned {} at {:?}", piece.kind(), piece.position());
        self.active_piece = Some(piece);
        true
    }

    /// Replaces the falling piece if `piece` fits on the board.
    pub fn set_active_piece(&mut self, piece: ActivePiece) -> Result<(), PieceCollisionError> {
        self.expect_active();
        if collision::is_colliding(&self.board, &piece) {
            return Err(PieceCollisionError);
        }
        self.active_piece = Some(piece);
        Ok(())
    }

    pub fn move_left(&mut self) -> Result<(), PieceCollisionError> {
        let piece = self.expect_active().left();
        self.set_active_piece(piece)
    }

    pub fn move_right(&mut self) -> Result<(), PieceCollisionError> {
        let piece = self.expect_active().right();
        self.set_active_piece(piece)
    }

    /// Rotates the falling piece a quarter turn in place.
    pub fn rotate(&mut self) -> Result<(), PieceCollisionError> {
        let piece = self.expect_active().rotated();
        self.set_active_piece(piece)
    }

    /// Moves the falling piece one row down, locking it if it cannot move.
    ///
    /// Locking writes the piece into the board, clears every full row, adds the
    /// per-row bonus for each and spawns the next piece. Gravity ticks and explicit
    /// down input both use this method.
    pub fn move_down(&mut self) -> DropOutcome {
        let current = self.expect_active();
        if self.set_active_piece(current.down()).is_ok() {
            return DropOutcome::Moved;
        }

        let report = self.lock_piece(&current);
        if self.spawn_piece() {
            DropOutcome::Locked(report)
        } else {
            DropOutcome::GameOver {
                report,
                final_score: self.stats.score(),
            }
        }
    }

    fn lock_piece(&mut self, piece: &ActivePiece) -> LockReport {
        self.board.fill_piece(piece);
        log::debug!("locked {} at {:?}", piece.kind(), piece.position());

        let cleared_rows = self.board.clear_full_rows();
        let score_gained = self
            .stats
            .complete_piece_drop(cleared_rows.len(), self.config.score_per_row);
        if !cleared_rows.is_empty() {
            log::info!(
                "cleared rows {cleared_rows:?} (+{score_gained}, score {})",
                self.stats.score()
            );
        }
        LockReport {
            cleared_rows,
            score_gained,
        }
    }

    /// Empties the board, resets the score and spawns a fresh piece.
    pub fn restart(&mut self) {
        assert!(
            self.state().is_game_over(),
            "restart issued while a game is in progress"
        );
        self.board.reset();
        self.stats.start_new_game();
        log::info!("restarting, game #{}", self.stats.games_played());
        self.spawn_piece();
    }

    /// Applies a command. This is the single entry point for input and gravity.
    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::MoveLeft => self.move_left().into(),
            Command::MoveRight => self.move_right().into(),
            Command::Rotate => self.rotate().into(),
            Command::MoveDown => self.move_down().into(),
            Command::Restart => {
                self.restart();
                CommandOutcome::Restarted
            }
        }
    }
}
