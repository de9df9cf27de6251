//! Game rules and the loop driving them.
//!
//! - [`GameSession`] - board, piece sequence, completed lines and phase
//! - [`Engine`] - a session plus the [`FrameClock`] that paces gravity
//! - [`EngineConfig`] - validated board size, starting level and frame rate
//! - [`PieceGenerator`] / [`PieceSeed`] - uniform, reproducible piece kinds
//! - [`Command`] / [`CommandSource`] - decoded player input
//! - [`Snapshot`] - what a front-end draws
//!
//! # Game Flow
//!
//! 1. Build an [`Engine`] from an [`EngineConfig`]; the first piece spawns
//! 2. Each iteration, hand [`Engine::step`] the pending commands and the time
//! 3. Every `gravity_interval(level)` frames the piece falls one row
//! 4. A piece that cannot fall locks, full rows clear, the next piece spawns
//! 5. A blocked spawn ends the game; only `Quit` is honored afterwards
//!
//! # Example
//!
//! ```
//! use std::{
//!     collections::VecDeque,
//!     time::{Duration, Instant},
//! };
//!
//! use blockfall_engine::{Command, Engine, EngineConfig, GamePhase};
//!
//! let mut engine = Engine::new(&EngineConfig::default()).unwrap();
//! let mut commands = VecDeque::from([Command::MoveLeft, Command::Rotate]);
//!
//! let start = Instant::now();
//! for frame in 1..=60 {
//!     let step = engine.step(&mut commands, start + Duration::from_millis(16 * frame));
//!     if step.changed {
//!         let snapshot = engine.snapshot();
//!         assert_eq!(snapshot.height(), 20);
//!     }
//! }
//! assert_eq!(engine.session().phase(), GamePhase::Playing);
//! ```

pub use self::{
    clock::*, command::*, config::*, driver::*, piece_generator::*, session::*, snapshot::*,
};

pub(crate) mod clock;
pub(crate) mod command;
pub(crate) mod config;
pub(crate) mod driver;
pub(crate) mod piece_generator;
pub(crate) mod session;
pub(crate) mod snapshot;
