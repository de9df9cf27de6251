use std::time::Instant;

use tracing::{debug, info};

use super::{
    clock::FrameClock,
    command::{Command, CommandSource, Track},
    config::{ConfigError, EngineConfig},
    piece_generator::PieceSeed,
    session::GameSession,
    snapshot::Snapshot,
};

/// Outcome of one [`Engine::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Step {
    /// Something visible changed; the host should redraw.
    pub changed: bool,
    /// A `Quit` command was pulled. The host should stop calling `step`.
    pub quit: bool,
    /// Last track requested during this step, for the host to act on.
    pub selected_track: Option<Track>,
}

/// A game session paired with its frame clock.
///
/// The host calls [`Self::step`] in a loop. Each call drains the pending
/// commands, runs at most one gravity step and samples the clock once.
#[derive(Debug, Clone)]
pub struct Engine {
    session: GameSession,
    clock: FrameClock,
}

impl Engine {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        let session = GameSession::new(config)?;
        Ok(Self::with_session(session, config.frame_rate, Instant::now()))
    }

    pub fn with_seed(config: &EngineConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        let session = GameSession::with_seed(config, seed)?;
        Ok(Self::with_session(session, config.frame_rate, Instant::now()))
    }

    /// Wraps an existing session, counting frames from `start`.
    #[must_use]
    pub fn with_session(session: GameSession, frame_rate: u32, start: Instant) -> Self {
        Self {
            session,
            clock: FrameClock::new(frame_rate, start),
        }
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    /// Runs one loop iteration at wall-clock time `now`.
    ///
    /// Commands are applied in the order the source yields them. A `Quit`
    /// ends the iteration at once: later commands stay in the source and
    /// neither gravity nor the clock advance.
    ///
    /// # Example
    ///
    /// ```
    /// use std::{collections::VecDeque, time::Instant};
    ///
    /// use blockfall_engine::{Command, Engine, EngineConfig, PieceSeed};
    ///
    /// let config = EngineConfig::default();
    /// let mut engine = Engine::with_seed(&config, PieceSeed::from_bytes([0; 16])).unwrap();
    ///
    /// let mut commands = VecDeque::from([Command::HardDrop, Command::Quit]);
    /// let step = engine.step(&mut commands, Instant::now());
    /// assert!(step.changed);
    /// assert!(step.quit);
    /// ```
    pub fn step<S>(&mut self, commands: &mut S, now: Instant) -> Step
    where
        S: CommandSource + ?Sized,
    {
        let mut step = Step::default();
        while let Some(command) = commands.next_command() {
            match command {
                Command::Quit => {
                    info!("quit requested");
                    step.quit = true;
                    return step;
                }
                Command::SelectTrack(track) => {
                    debug!(%track, "track selected");
                    step.selected_track = Some(track);
                }
                command => step.changed |= self.session.apply(command),
            }
        }

        step.changed |= self.session.update(self.clock.ticks());
        self.clock.sample(now);
        step
    }
}
