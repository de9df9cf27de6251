use blockfall_engine::{GamePhase, Snapshot};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, PieceDisplay, SessionStatsDisplay, color, style};

/// Board in the middle, next piece and stats on the right, and a popup
/// over the board while paused or after the game ends.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    snapshot: &'a Snapshot,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            snapshot,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    fn border_color(&self) -> Color {
        match self.snapshot.phase() {
            GamePhase::Playing => color::WHITE,
            GamePhase::Paused => color::YELLOW,
            GamePhase::GameOver => color::RED,
        }
    }

    fn panel(&self, title: &'static str) -> Block<'static> {
        Block::bordered()
            .title(Line::from(title).centered())
            .padding(Padding::symmetric(self.horizontal_padding, self.vertical_padding))
            .border_style(self.border_color())
            .style(style::DEFAULT)
    }

    fn board(&self) -> BoardDisplay<'a> {
        BoardDisplay::new(self.snapshot).block(
            Block::bordered()
                .border_style(self.border_color())
                .style(style::DEFAULT),
        )
    }

    pub fn height(&self) -> u16 {
        self.board().height()
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game_board = self.board();
        let next_panel = PieceDisplay::new()
            .piece(self.snapshot.next_kind())
            .block(self.panel("NEXT"));
        let session_stats = SessionStatsDisplay::new(self.snapshot).block(self.panel("STATS"));

        let [center_column, right_column] = Layout::horizontal([
            Constraint::Length(game_board.width()),
            Constraint::Length(u16::max(next_panel.width(), session_stats.width())),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area, stats_area] = Layout::vertical([
            Constraint::Length(next_panel.height()),
            Constraint::Length(session_stats.height()),
        ])
        .spacing(1)
        .areas(right_column);

        let game_board_width = game_board.width();
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);
        session_stats.render(stats_area, buf);

        let popup = match self.snapshot.phase() {
            GamePhase::Playing => None,
            GamePhase::Paused => {
                Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW)))
            }
            GamePhase::GameOver => {
                Some(("GAME OVER", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, time::Instant};

    use blockfall_engine::{Command, Engine, EngineConfig, PieceSeed};

    use super::*;

    fn render(snapshot: &Snapshot) -> String {
        let display = SessionDisplay::new(snapshot);
        let area = Rect::new(0, 0, 60, display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn engine() -> Engine {
        Engine::with_seed(&EngineConfig::default(), PieceSeed::from_bytes([1; 16])).unwrap()
    }

    #[test]
    fn test_height_fits_board() {
        let snapshot = engine().snapshot();
        assert_eq!(SessionDisplay::new(&snapshot).height(), 22);
    }

    #[test]
    fn test_renders_panels() {
        let text = render(&engine().snapshot());
        assert!(text.contains("NEXT"));
        assert!(text.contains("LEVEL:"));
        assert!(text.contains("LINES:"));
        assert!(!text.contains("PAUSED"));
    }

    #[test]
    fn test_paused_popup() {
        let mut engine = engine();
        let mut commands = VecDeque::from([Command::TogglePause]);
        engine.step(&mut commands, Instant::now());

        let text = render(&engine.snapshot());
        assert!(text.contains("PAUSED"));
    }
}
