use std::iter;

use blockfall_engine::Snapshot;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::CellDisplay;

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    snapshot: &'a Snapshot,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            snapshot,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        self.snapshot.width() * CellDisplay::WIDTH
            + super::block_margin(self.block.as_ref()).0
    }

    pub fn height(&self) -> u16 {
        self.snapshot.height() * CellDisplay::HEIGHT
            + super::block_margin(self.block.as_ref()).1
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..self.snapshot.width()).map(|_| Constraint::Length(CellDisplay::WIDTH));
        let row_constraints =
            (0..self.snapshot.height()).map(|_| Constraint::Length(CellDisplay::HEIGHT));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.snapshot.rows()) {
            for (grid_cell, cell) in iter::zip(grid_row, row) {
                CellDisplay::from_cell(*cell, true).render(grid_cell, buf);
            }
        }
    }
}
