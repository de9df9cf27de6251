use std::iter;

use blockfall_engine::Snapshot;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

pub struct SessionStatsDisplay<'a> {
    snapshot: &'a Snapshot,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SessionStatsDisplay<'a> {
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
        14 + super::block_margin(self.block.as_ref()).0
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_margin(self.block.as_ref()).1
    }
}

type Value = &'static dyn Fn(&Snapshot) -> String;

const ROWS: &[(&str, Value)] = &[
    ("LEVEL:", &|snapshot| snapshot.level().to_string()),
    ("LINES:", &|snapshot| snapshot.completed_lines().to_string()),
];

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;
        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (&(label, value), area) in iter::zip(ROWS, rows_areas.iter().copied()) {
            let [label_area, value_area] =
                area.layout(&Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]));
            Line::styled(label, style)
                .left_aligned()
                .render(label_area, buf);
            Line::styled(value(self.snapshot), style)
                .right_aligned()
                .render(value_area, buf);
        }
    }
}
