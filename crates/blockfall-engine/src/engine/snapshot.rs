use serde::{Serialize, Serializer, ser::SerializeStruct as _};

use crate::core::{
    board::{Board, Cell},
    catalog::PieceKind,
};

use super::session::GamePhase;

/// Read-only copy of everything a front-end needs to draw one frame.
///
/// Cells include the active piece. Serializes with the grid as one string
/// per row, using [`Cell::as_char`]:
///
/// ```json
/// { "width": 4, "height": 2, "rows": ["..T.", ".TTT"], "next": "O", ... }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    next_kind: PieceKind,
    completed_lines: usize,
    level: usize,
    phase: GamePhase,
}

impl Snapshot {
    pub(crate) fn new(
        board: &Board,
        next_kind: PieceKind,
        completed_lines: usize,
        level: usize,
        phase: GamePhase,
    ) -> Self {
        Self {
            width: board.width(),
            height: board.height(),
            cells: board.cells().to_vec(),
            next_kind,
            completed_lines,
            level,
            phase,
        }
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Returns the cell at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        let width = usize::from(self.width);
        if x >= width || y >= usize::from(self.height) {
            return None;
        }
        Some(self.cells[y * width + x])
    }

    /// Iterates rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(usize::from(self.width))
    }

    #[must_use]
    pub fn next_kind(&self) -> PieceKind {
        self.next_kind
    }

    #[must_use]
    pub fn completed_lines(&self) -> usize {
        self.completed_lines
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }
}

impl Serialize for Snapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let rows: Vec<String> = self
            .rows()
            .map(|row| row.iter().map(|c| c.as_char()).collect())
            .collect();
        let mut state = serializer.serialize_struct("Snapshot", 7)?;
        state.serialize_field("width", &self.width)?;
        state.serialize_field("height", &self.height)?;
        state.serialize_field("rows", &rows)?;
        state.serialize_field("next", &self.next_kind.as_char())?;
        state.serialize_field("completed_lines", &self.completed_lines)?;
        state.serialize_field("level", &self.level)?;
        state.serialize_field("phase", &self.phase)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn snapshot() -> Snapshot {
        let mut board = Board::new(4, 2).unwrap();
        board.spawn(PieceKind::T).unwrap();
        Snapshot::new(&board, PieceKind::O, 7, 2, GamePhase::Paused)
    }

    #[test]
    fn test_accessors() {
        let snapshot = snapshot();
        assert_eq!((snapshot.width(), snapshot.height()), (4, 2));
        assert_eq!(snapshot.next_kind(), PieceKind::O);
        assert_eq!(snapshot.completed_lines(), 7);
        assert_eq!(snapshot.level(), 2);
        assert_eq!(snapshot.phase(), GamePhase::Paused);
        assert_eq!(snapshot.rows().count(), 2);
    }

    #[test]
    fn test_cell_lookup() {
        let snapshot = snapshot();
        assert_eq!(snapshot.cell(2, 0), Some(Cell::Occupied(PieceKind::T)));
        assert_eq!(snapshot.cell(0, 0), Some(Cell::Empty));
        assert_eq!(snapshot.cell(4, 0), None);
        assert_eq!(snapshot.cell(0, 2), None);
        assert_eq!(snapshot.cell(0, usize::MAX), None);
        assert_eq!(snapshot.cell(usize::MAX, usize::MAX), None);
    }

    #[test]
    fn test_serialized_layout() {
        let value = serde_json::to_value(snapshot()).unwrap();
        assert_eq!(
            value,
            json!({
                "width": 4,
                "height": 2,
                "rows": ["..T.", ".TTT"],
                "next": "O",
                "completed_lines": 7,
                "level": 2,
                "phase": "Paused",
            })
        );
    }
}
