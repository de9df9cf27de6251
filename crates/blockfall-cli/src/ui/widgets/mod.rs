use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, cell_display::*, piece_display::*, session_display::*,
    session_stats_display::*,
};

mod board_display;
mod cell_display;
mod piece_display;
mod session_display;
mod session_stats_display;

mod color {
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const BLUE: Color = Color::Rgb(0, 0, 255);
    pub const ORANGE: Color = Color::Rgb(255, 127, 0);
    pub const MAGENTA: Color = Color::Rgb(255, 0, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use blockfall_engine::PieceKind;
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = bg_only(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);

    pub const fn piece(kind: PieceKind) -> Style {
        bg_only(match kind {
            PieceKind::J => color::BLUE,
            PieceKind::S => color::GREEN,
            PieceKind::I => color::CYAN,
            PieceKind::T => color::MAGENTA,
            PieceKind::L => color::ORANGE,
            PieceKind::Z => color::RED,
            PieceKind::O => color::YELLOW,
        })
    }
}

/// Columns and rows taken up by the borders and padding of `block`.
fn block_margin(block: Option<&BlockWidget>) -> (u16, u16) {
    let Some(block) = block else {
        return (0, 0);
    };
    let outer = Rect::new(0, 0, 64, 64);
    let inner = block.inner(outer);
    (outer.width - inner.width, outer.height - inner.height)
}

#[cfg(test)]
mod tests {
    use ratatui::widgets::Padding;

    use super::*;

    #[test]
    fn test_block_margin() {
        assert_eq!(block_margin(None), (0, 0));
        assert_eq!(block_margin(Some(&BlockWidget::bordered())), (2, 2));
        let padded = BlockWidget::bordered().padding(Padding::symmetric(1, 0));
        assert_eq!(block_margin(Some(&padded)), (4, 2));
    }
}
