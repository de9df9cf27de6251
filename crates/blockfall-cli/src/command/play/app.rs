use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use blockfall_engine::{Command, Engine, GamePhase, Snapshot, Track};
use crossterm::event::{self, Event, KeyCode};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};
use tracing::info;

use crate::ui::widgets::SessionDisplay;

const POLL_TIMEOUT: Duration = Duration::from_millis(1);

#[derive(Debug)]
pub struct PlayApp {
    engine: Engine,
    commands: VecDeque<Command>,
    track: Option<Track>,
}

impl PlayApp {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            commands: VecDeque::new(),
            track: None,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    /// Runs until a quit key is pressed.
    ///
    /// Every iteration queues the pending key presses, steps the engine and
    /// redraws only when something changed.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        loop {
            let mut needs_redraw = false;
            if event::poll(POLL_TIMEOUT)? {
                loop {
                    needs_redraw |= self.handle_event(&event::read()?);
                    if !event::poll(Duration::ZERO)? {
                        break;
                    }
                }
            }

            let step = self.engine.step(&mut self.commands, Instant::now());
            if step.quit {
                return Ok(());
            }
            if let Some(track) = step.selected_track {
                info!(%track, "track requested, audio playback is not available");
                self.track = Some(track);
                needs_redraw = true;
            }
            if step.changed || needs_redraw {
                terminal.draw(|frame| self.draw(frame))?;
            }
        }
    }

    /// Queues the command bound to a key press. Returns `true` on resize.
    fn handle_event(&mut self, event: &Event) -> bool {
        if let Some(key) = event.as_key_press_event() {
            if let Some(command) = key_command(key.code) {
                self.commands.push_back(command);
            }
            return false;
        }
        event.is_resize()
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let snapshot = self.engine.snapshot();
        let session_display = SessionDisplay::new(&snapshot);
        let help_text = match snapshot.phase() {
            GamePhase::Playing => {
                "Controls: ← → (Move) | ↓ (Soft Drop) | Space (Hard Drop) | ↑ (Rotate) | P (Pause) | F1-F3 (Music) | Q (Quit)"
            }
            GamePhase::Paused => "Controls: P (Resume) | Q (Quit)",
            GamePhase::GameOver => "Controls: Q (Quit)",
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();
        let track_text = Text::from(
            self.track
                .map(|track| format!("Music: {track}"))
                .unwrap_or_default(),
        )
        .style(Style::default().fg(Color::DarkGray))
        .centered();

        let [main_area, help_area, track_area] = Layout::vertical([
            Constraint::Length(session_display.height()),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
        frame.render_widget(track_text, track_area);
    }
}

fn key_command(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => Command::Quit,
        KeyCode::Char('p' | 'P') => Command::TogglePause,
        KeyCode::F(1) => Command::SelectTrack(Track::Korobeiniki),
        KeyCode::F(2) => Command::SelectTrack(Track::Bwv814Menuet),
        KeyCode::F(3) => Command::SelectTrack(Track::RussianSong),
        KeyCode::Up => Command::Rotate,
        KeyCode::Down => Command::SoftDrop,
        KeyCode::Left => Command::MoveLeft,
        KeyCode::Right => Command::MoveRight,
        KeyCode::Char(' ') => Command::HardDrop,
        _ => return None,
    };
    Some(command)
}
