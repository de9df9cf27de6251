use blockfall_engine::{Cell, PieceKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::CellDisplay;

/// Preview of a piece in its spawn orientation.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: PieceKind) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * CellDisplay::WIDTH + super::block_margin(self.block.as_ref()).0
    }

    pub fn height(&self) -> u16 {
        2 * CellDisplay::HEIGHT + super::block_margin(self.block.as_ref()).1
    }
}

/// Bounding box of the spawn footprint as `(min_x, width, height)`.
fn footprint_bounds(kind: PieceKind) -> (i8, u16, u16) {
    let footprint = kind.spawn_footprint();
    let xs = footprint.iter().map(|&(x, _)| x);
    let ys = footprint.iter().map(|&(_, y)| y);
    let (min_x, max_x) = (xs.clone().min().unwrap_or(0), xs.max().unwrap_or(0));
    let max_y = ys.max().unwrap_or(0);
    let width = u16::try_from(max_x - min_x + 1).unwrap_or(0);
    let height = u16::try_from(max_y + 1).unwrap_or(0);
    (min_x, width, height)
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(piece) = self.piece else {
            return;
        };
        let (min_x, width, height) = footprint_bounds(piece);
        let piece_area = area.centered(
            Constraint::Length(width * CellDisplay::WIDTH),
            Constraint::Length(height * CellDisplay::HEIGHT),
        );

        let col_constraints = (0..width).map(|_| Constraint::Length(CellDisplay::WIDTH));
        let row_constraints = (0..height).map(|_| Constraint::Length(CellDisplay::HEIGHT));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let footprint = piece.spawn_footprint();
        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                let occupied = footprint.iter().any(|&(dx, dy)| {
                    usize::try_from(dx - min_x).is_ok_and(|dx| dx == x)
                        && usize::try_from(dy).is_ok_and(|dy| dy == y)
                });
                let cell = if occupied {
                    Cell::Occupied(piece)
                } else {
                    Cell::Empty
                };
                CellDisplay::from_cell(cell, false).render(grid_cell, buf);
            }
        }
    }
}
