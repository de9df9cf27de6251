use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    ActionError, PieceCollisionError,
    core::{
        board::{ActivePiece, Board},
        catalog::PieceKind,
    },
};

use super::{
    command::Command,
    config::{ConfigError, EngineConfig},
    piece_generator::{PieceGenerator, PieceSeed},
    snapshot::Snapshot,
};

/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: usize = 3;

/// Phase of the game state machine.
///
/// `Playing` and `Paused` toggle into each other; `GameOver` is terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum GamePhase {
    #[display("playing")]
    Playing,
    #[display("paused")]
    Paused,
    #[display("game over")]
    GameOver,
}

/// Ticks between gravity drops at `level`.
///
/// Starts at 15 and shrinks by one per level, never below 1.
///
/// # Examples
///
/// ```
/// use blockfall_engine::gravity_interval;
///
/// assert_eq!(gravity_interval(0), 15);
/// assert_eq!(gravity_interval(10), 5);
/// assert_eq!(gravity_interval(40), 1);
/// ```
#[must_use]
pub fn gravity_interval(level: usize) -> u64 {
    let level = u8::try_from(level).unwrap_or(u8::MAX);
    u64::from(15_u8.saturating_sub(level).max(1))
}

/// A single game: the board, the piece sequence, score and the phase.
///
/// The session never looks at wall-clock time. Callers feed it the logical
/// tick count (see [`FrameClock`](super::FrameClock)) through
/// [`Self::update`], and player commands through the `try_*` methods or
/// [`Self::apply`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{EngineConfig, GamePhase, GameSession, PieceSeed};
///
/// let config = EngineConfig::default();
/// let mut session = GameSession::with_seed(&config, PieceSeed::from_bytes([7; 16])).unwrap();
/// assert_eq!(session.phase(), GamePhase::Playing);
///
/// session.hard_drop().unwrap();
/// assert!(session.update(15)); // locks the piece and spawns the next one
/// assert_eq!(session.phase(), GamePhase::Playing);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    generator: PieceGenerator,
    next_kind: PieceKind,
    phase: GamePhase,
    completed_lines: usize,
    drop_ticks: u64,
}

impl GameSession {
    /// Starts a game with a randomly seeded piece sequence.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        Self::with_generator(config, PieceGenerator::new())
    }

    /// Starts a game whose piece sequence is fully determined by `seed`.
    pub fn with_seed(config: &EngineConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        Self::with_generator(config, PieceGenerator::with_seed(seed))
    }

    /// Starts a game drawing pieces from `generator`.
    ///
    /// The configuration is validated before the board is allocated. The
    /// first active piece and the first preview piece are both drawn here.
    pub fn with_generator(
        config: &EngineConfig,
        mut generator: PieceGenerator,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut board = Board::new(config.width, config.height)?;

        let first_kind = generator.next_kind();
        let next_kind = generator.next_kind();
        let phase = match board.spawn(first_kind) {
            Ok(()) => GamePhase::Playing,
            Err(PieceCollisionError) => GamePhase::GameOver,
        };
        info!(
            width = config.width,
            height = config.height,
            start_level = config.start_level,
            first = %first_kind.as_char(),
            "game started"
        );

        Ok(Self {
            board,
            generator,
            next_kind,
            phase,
            completed_lines: config.initial_completed_lines(),
            drop_ticks: 0,
        })
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.board.active_piece()
    }

    #[must_use]
    pub fn next_kind(&self) -> PieceKind {
        self.next_kind
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn completed_lines(&self) -> usize {
        self.completed_lines
    }

    /// Current level: one level per [`LINES_PER_LEVEL`] completed lines.
    #[must_use]
    pub fn level(&self) -> usize {
        self.completed_lines / LINES_PER_LEVEL
    }

    /// Tick at which the last gravity drop happened.
    #[must_use]
    pub fn drop_ticks(&self) -> u64 {
        self.drop_ticks
    }

    /// Returns `true` if a gravity drop is due at `game_ticks`.
    #[must_use]
    pub fn is_drop_due(&self, game_ticks: u64) -> bool {
        game_ticks >= self.drop_ticks.saturating_add(gravity_interval(self.level()))
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            &self.board,
            self.next_kind,
            self.completed_lines,
            self.level(),
            self.phase,
        )
    }

    /// Switches between `Playing` and `Paused`.
    ///
    /// Returns `false` (and changes nothing) once the game is over.
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::GameOver => return false,
        };
        debug!(phase = %self.phase, "pause toggled");
        true
    }

    pub fn try_move_left(&mut self) -> Result<(), ActionError> {
        self.try_shift(-1, 0)
    }

    pub fn try_move_right(&mut self) -> Result<(), ActionError> {
        self.try_shift(1, 0)
    }

    pub fn try_soft_drop(&mut self) -> Result<(), ActionError> {
        self.try_shift(0, 1)
    }

    /// Drops the piece as far as it goes and returns the rows fallen.
    ///
    /// The piece locks on the next gravity step, like any resting piece.
    pub fn hard_drop(&mut self) -> Result<usize, ActionError> {
        self.ensure_playing()?;
        Ok(self.board.hard_drop())
    }

    pub fn try_rotate(&mut self) -> Result<(), ActionError> {
        self.ensure_playing()?;
        if self.board.try_rotate() {
            Ok(())
        } else {
            Err(PieceCollisionError.into())
        }
    }

    /// Applies one gameplay command and returns whether anything changed.
    ///
    /// Rejected moves and commands that are not allowed in the current phase
    /// are ignored. `Quit` and `SelectTrack` are never handled here.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.try_move_left().is_ok(),
            Command::MoveRight => self.try_move_right().is_ok(),
            Command::SoftDrop => self.try_soft_drop().is_ok(),
            Command::HardDrop => self.hard_drop().is_ok_and(|fallen| fallen > 0),
            Command::Rotate => self.try_rotate().is_ok(),
            Command::TogglePause => self.toggle_pause(),
            Command::Quit | Command::SelectTrack(_) => false,
        }
    }

    /// Runs the gravity step for `game_ticks`.
    ///
    /// When a drop is due the piece moves down one row; if it cannot, it
    /// locks, completed rows are cleared and the next piece spawns. A spawn
    /// that collides ends the game. Returns `true` if a drop happened.
    pub fn update(&mut self, game_ticks: u64) -> bool {
        if !self.phase.is_playing() || !self.is_drop_due(game_ticks) {
            return false;
        }
        self.drop_ticks = game_ticks;
        if !self.board.try_move(0, 1) {
            self.lock_and_spawn();
        }
        true
    }

    fn lock_and_spawn(&mut self) {
        if let Some(piece) = self.board.active_piece() {
            debug!(kind = %piece.kind().as_char(), "piece locked");
        }
        let cleared = self.board.clear_completed_rows();
        if cleared > 0 {
            self.completed_lines += cleared;
            info!(
                cleared,
                completed_lines = self.completed_lines,
                level = self.level(),
                "rows cleared"
            );
        }

        let kind = self.next_kind;
        if self.board.spawn(kind).is_err() {
            self.phase = GamePhase::GameOver;
            info!(
                kind = %kind.as_char(),
                completed_lines = self.completed_lines,
                "spawn blocked, game over"
            );
            return;
        }
        self.next_kind = self.generator.next_kind();
        debug!(kind = %kind.as_char(), next = %self.next_kind.as_char(), "piece spawned");
    }

    fn try_shift(&mut self, dx: i32, dy: i32) -> Result<(), ActionError> {
        self.ensure_playing()?;
        if self.board.try_move(dx, dy) {
            Ok(())
        } else {
            Err(PieceCollisionError.into())
        }
    }

    fn ensure_playing(&self) -> Result<(), ActionError> {
        if self.phase.is_playing() {
            Ok(())
        } else {
            Err(ActionError::NotPlaying)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Cell;

    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([3; 16]);

    fn session() -> GameSession {
        GameSession::with_seed(&EngineConfig::default(), SEED).unwrap()
    }

    /// Session with an empty board and an O-piece at the spawn position.
    fn session_with_square() -> GameSession {
        let mut session = session();
        session.board = Board::new(10, 20).unwrap();
        session.board.spawn(PieceKind::O).unwrap();
        session
    }

    fn min_active_y(session: &GameSession) -> i32 {
        session
            .active_piece()
            .unwrap()
            .cells()
            .iter()
            .map(|p| p.y())
            .min()
            .unwrap()
    }

    #[test]
    fn test_new_session() {
        let session = session();
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.completed_lines(), 0);
        assert_eq!(session.level(), 0);
        assert_eq!(session.drop_ticks(), 0);
        assert_eq!(session.board().occupied_count(), 4);
        assert!(session.active_piece().is_some());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad_size = EngineConfig {
            width: 2,
            ..EngineConfig::default()
        };
        assert!(matches!(
            GameSession::new(&bad_size),
            Err(ConfigError::InvalidDimensions { .. })
        ));

        let bad_level = EngineConfig {
            start_level: 16,
            ..EngineConfig::default()
        };
        assert!(matches!(
            GameSession::new(&bad_level),
            Err(ConfigError::InvalidLevel(16))
        ));
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = session();
        let b = session();
        assert_eq!(a.board(), b.board());
        assert_eq!(a.next_kind(), b.next_kind());
    }

    #[test]
    fn test_start_level_seeds_lines_and_gravity() {
        let config = EngineConfig {
            start_level: 5,
            ..EngineConfig::default()
        };
        let mut session = GameSession::with_seed(&config, SEED).unwrap();
        assert_eq!(session.completed_lines(), 15);
        assert_eq!(session.level(), 5);

        assert!(!session.update(9));
        assert!(session.update(10));
        assert_eq!(session.drop_ticks(), 10);
    }

    #[test]
    fn test_gravity_waits_for_interval() {
        let mut session = session_with_square();

        assert!(!session.update(14));
        assert_eq!(min_active_y(&session), 0);

        assert!(session.update(15));
        assert_eq!(min_active_y(&session), 1);
        assert_eq!(session.drop_ticks(), 15);

        assert!(!session.update(29));
        assert!(session.update(30));
        assert_eq!(min_active_y(&session), 2);
    }

    #[test]
    fn test_commands_move_piece() {
        let mut session = session_with_square();

        assert!(session.try_move_left().is_ok());
        assert!(session.try_move_right().is_ok());
        assert!(session.try_move_right().is_ok());
        assert!(session.try_soft_drop().is_ok());
        assert!(session.try_rotate().is_ok());

        let cells = session.active_piece().unwrap().cells();
        assert!(cells.iter().all(|p| (5..=6).contains(&p.x())));
        assert_eq!(min_active_y(&session), 1);
    }

    #[test]
    fn test_rejected_move_is_collision() {
        let mut session = session_with_square();
        for _ in 0..4 {
            session.try_move_left().unwrap();
        }
        let before = session.board().clone();

        assert_eq!(
            session.try_move_left(),
            Err(ActionError::Collision(PieceCollisionError))
        );
        assert_eq!(session.board(), &before);
    }

    #[test]
    fn test_lock_spawns_next_piece() {
        let mut session = session_with_square();
        let next = session.next_kind();

        assert_eq!(session.hard_drop(), Ok(18));
        assert!(session.update(15));

        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.active_piece().unwrap().kind(), next);
        assert_eq!(min_active_y(&session), 0);
        assert_eq!(session.board().occupied_count(), 8);
        assert_eq!(session.completed_lines(), 0);
    }

    #[test]
    fn test_lock_clears_rows() {
        let mut session = session_with_square();
        for y in 18..20 {
            for x in (0..10).filter(|x| !(4..=5).contains(x)) {
                assert!(session.board.set_cell(x, y, Cell::Occupied(PieceKind::T)));
            }
        }
        session.hard_drop().unwrap();
        assert!(session.update(15));

        assert_eq!(session.completed_lines(), 2);
        assert_eq!(session.level(), 0);
        assert_eq!(session.board().occupied_count(), 4);
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_blocked_spawn_ends_game() {
        let mut session = session_with_square();
        session.hard_drop().unwrap();
        for y in 0..2 {
            for x in 3..7 {
                assert!(session.board.set_cell(x, y, Cell::Occupied(PieceKind::Z)));
            }
        }
        session.next_kind = PieceKind::I;
        let grid = session.board().cells().to_vec();

        assert!(session.update(15));
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.board().cells(), &grid[..]);
        assert!(session.active_piece().is_none());
        assert_eq!(session.next_kind(), PieceKind::I);

        // Terminal: nothing mutates any more.
        let board = session.board().clone();
        assert_eq!(session.try_move_left(), Err(ActionError::NotPlaying));
        assert_eq!(session.try_rotate(), Err(ActionError::NotPlaying));
        assert_eq!(session.hard_drop(), Err(ActionError::NotPlaying));
        assert!(!session.toggle_pause());
        assert!(!session.update(1000));
        for command in [Command::SoftDrop, Command::HardDrop, Command::TogglePause] {
            assert!(!session.apply(command));
        }
        assert_eq!(session.board(), &board);
        assert_eq!(session.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_pause_freezes_game() {
        let mut session = session_with_square();
        assert!(session.toggle_pause());
        assert_eq!(session.phase(), GamePhase::Paused);
        let board = session.board().clone();

        assert_eq!(session.try_move_left(), Err(ActionError::NotPlaying));
        assert!(!session.apply(Command::Rotate));
        assert!(!session.update(100));
        assert_eq!(session.board(), &board);
        assert_eq!(session.drop_ticks(), 0);

        assert!(session.apply(Command::TogglePause));
        assert_eq!(session.phase(), GamePhase::Playing);
        assert!(session.update(100));
    }

    #[test]
    fn test_apply_reports_changes() {
        let mut session = session_with_square();
        assert!(session.apply(Command::MoveLeft));
        assert!(session.apply(Command::HardDrop));
        assert!(!session.apply(Command::HardDrop), "already resting");
        assert!(!session.apply(Command::SoftDrop));
        assert!(!session.apply(Command::Quit));
    }

    #[test]
    fn test_level_follows_completed_lines() {
        let mut session = session();
        let mut previous = gravity_interval(0);
        for lines in 0..60 {
            session.completed_lines = lines;
            assert_eq!(session.level(), lines / 3);

            let interval = gravity_interval(session.level());
            assert!(interval <= previous);
            assert!(interval >= 1);
            let level = u64::try_from(lines / 3).unwrap();
            assert_eq!(interval, 15_u64.saturating_sub(level).max(1));
            previous = interval;
        }
        assert_eq!(previous, 1);
    }

    #[test]
    fn test_game_runs_until_top_out() {
        let mut session = session();
        let mut ticks = 0;
        let mut spawned = 0;
        while session.phase().is_playing() {
            session.hard_drop().unwrap();
            ticks += gravity_interval(session.level());
            assert!(session.update(ticks));
            spawned += 1;
            assert!(spawned < 1000, "game never ended");
        }
        assert_eq!(session.phase(), GamePhase::GameOver);
    }
}
