use serde::{Deserialize, Serialize};

use crate::{
    PieceCollisionError,
    engine::config::{ConfigError, validate_dimensions},
};

use super::catalog::{Orientation, PieceKind};

/// A single cell of the board.
///
/// The kind stored in an occupied cell only selects a display color; every
/// occupied cell blocks movement the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell filled by a piece of the given kind (active or locked).
    Occupied(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_occupied(self) -> bool {
        !self.is_empty()
    }

    #[must_use]
    pub fn kind(self) -> Option<PieceKind> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(kind) => Some(kind),
        }
    }

    /// `'.'` for empty cells, the kind's character otherwise.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Occupied(kind) => kind.as_char(),
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        if c == '.' {
            return Some(Cell::Empty);
        }
        match PieceKind::from_char(c) {
            Some(kind) => Some(Cell::Occupied(kind)),
            None => None,
        }
    }
}

/// Absolute grid coordinate.
///
/// - (0, 0) is the top-left cell
/// - X increases rightward (columns)
/// - Y increases downward (rows)
///
/// Coordinates are signed so that candidate positions left of or above the
/// grid can be represented and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    /// Returns the position moved by `(dx, dy)`, or `None` on overflow.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

/// The piece currently under player control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    kind: PieceKind,
    orientation: Orientation,
    cells: [Position; 4],
}

impl ActivePiece {
    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Absolute cells, in catalog cell order.
    #[must_use]
    pub fn cells(&self) -> &[Position; 4] {
        &self.cells
    }

    fn covers(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    fn translated(&self, dx: i32, dy: i32) -> Option<[Position; 4]> {
        let mut cells = self.cells;
        for cell in &mut cells {
            *cell = cell.offset(dx, dy)?;
        }
        Some(cells)
    }
}

/// The playing field: a fixed `width × height` grid plus the active piece.
///
/// The active piece's cells are written into the grid while it is active, so
/// reading the grid always shows the full picture. All operations keep that
/// invariant: a rejected move or rotation leaves the grid untouched.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, PieceKind};
///
/// let mut board = Board::new(10, 20).unwrap();
/// board.spawn(PieceKind::T).unwrap();
///
/// assert!(!board.test_move(-1, 0));
/// board.move_by(-1, 0);
///
/// let fallen = board.hard_drop();
/// assert_eq!(fallen, 18);
/// assert!(board.test_move(0, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    active: Option<ActivePiece>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// Dimensions are validated before anything is allocated.
    pub fn new(width: u16, height: u16) -> Result<Self, ConfigError> {
        validate_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::Empty; usize::from(width) * usize::from(height)],
            active: None,
        })
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    /// Returns the cell at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(Position::new(x, y)).map(|i| self.cells[i])
    }

    /// Returns row `y` (0 is the top row).
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`. Use [`Self::cell`] for checked access.
    #[must_use]
    pub fn row(&self, y: usize) -> &[Cell] {
        assert!(
            y < usize::from(self.height),
            "row {y} out of range for height {}",
            self.height
        );
        let width = usize::from(self.width);
        &self.cells[y * width..][..width]
    }

    /// Iterates rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(usize::from(self.width))
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }

    /// Overwrites one cell, for setting up positions.
    ///
    /// Returns `false` without changing anything when `(x, y)` is outside the
    /// grid or belongs to the active piece.
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        let pos = Position::new(x, y);
        if self.active.is_some_and(|piece| piece.covers(pos)) {
            return false;
        }
        let Some(i) = self.index(pos) else {
            return false;
        };
        self.cells[i] = cell;
        true
    }

    /// Places a new active piece of `kind` at the spawn position.
    ///
    /// The footprint is centered on column `width / 2` of the top row. If any
    /// target cell is occupied the board is left untouched and
    /// [`PieceCollisionError`] is returned; the caller treats this as the end
    /// of the game. The previous active piece, if any, stays on the grid as
    /// locked cells.
    pub fn spawn(&mut self, kind: PieceKind) -> Result<(), PieceCollisionError> {
        let center = i32::from(self.width / 2);
        let cells = kind
            .spawn_footprint()
            .map(|(dx, dy)| Position::new(center + i32::from(dx), i32::from(dy)));
        if cells.iter().any(|&pos| !self.is_vacant(pos)) {
            return Err(PieceCollisionError);
        }
        self.fill(&cells, Cell::Occupied(kind));
        self.active = Some(ActivePiece {
            kind,
            orientation: Orientation::SPAWN,
            cells,
        });
        Ok(())
    }

    /// Returns `true` if translating the active piece by `(dx, dy)` would
    /// collide.
    ///
    /// A translated cell collides when it leaves the grid horizontally, falls
    /// below the bottom row, or lands on a cell occupied by anything other
    /// than the active piece itself. The grid is never modified. Without an
    /// active piece every move collides.
    #[must_use]
    pub fn test_move(&self, dx: i32, dy: i32) -> bool {
        let Some(piece) = &self.active else {
            return true;
        };
        piece
            .translated(dx, dy)
            .is_none_or(|moved| moved.iter().any(|&pos| !self.is_vacant_for(piece, pos)))
    }

    /// Translates the active piece by `(dx, dy)` without checking.
    ///
    /// Callers check [`Self::test_move`] first. Does nothing without an active
    /// piece.
    ///
    /// # Panics
    ///
    /// Panics if a translated cell lies outside the grid.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        let Some(mut piece) = self.active else {
            return;
        };
        debug_assert!(!self.test_move(dx, dy), "unchecked move collides");
        let Some(moved) = piece.translated(dx, dy) else {
            panic!("translation by ({dx}, {dy}) overflows");
        };
        self.fill(&piece.cells, Cell::Empty);
        self.fill(&moved, Cell::Occupied(piece.kind));
        piece.cells = moved;
        self.active = Some(piece);
    }

    /// Translates the active piece if the move does not collide.
    ///
    /// Returns `true` when the piece moved.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        if self.test_move(dx, dy) {
            return false;
        }
        self.move_by(dx, dy);
        true
    }

    /// Moves the active piece straight down until it rests on the floor or
    /// another piece.
    ///
    /// Returns the number of rows fallen. The piece is not locked.
    pub fn hard_drop(&mut self) -> usize {
        let mut fallen = 0;
        while self.try_move(0, 1) {
            fallen += 1;
        }
        fallen
    }

    /// Rotates the active piece to its next orientation using the catalog
    /// deltas.
    ///
    /// Every candidate cell must lie inside the grid (top row included) and be
    /// free of other pieces. On failure nothing changes and `false` is
    /// returned.
    pub fn try_rotate(&mut self) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        let deltas = piece.kind.rotation_delta(piece.orientation);
        let mut rotated = piece.cells;
        for (cell, &(dx, dy)) in rotated.iter_mut().zip(deltas) {
            match cell.offset(i32::from(dx), i32::from(dy)) {
                Some(pos) if self.is_vacant_for(&piece, pos) => *cell = pos,
                _ => return false,
            }
        }
        self.fill(&piece.cells, Cell::Empty);
        self.fill(&rotated, Cell::Occupied(piece.kind));
        self.active = Some(ActivePiece {
            kind: piece.kind,
            orientation: piece.orientation.rotated(),
            cells: rotated,
        });
        true
    }

    /// Turns the active piece into permanent occupancy.
    ///
    /// Its cells stay on the grid; the board has no active piece afterwards.
    pub fn lock_piece(&mut self) -> Option<ActivePiece> {
        self.active.take()
    }

    /// Locks the active piece, removes every completed row, and returns how
    /// many rows were removed.
    ///
    /// Rows are scanned from the bottom up. Each completed row is dropped,
    /// everything between it and the already-compacted top area moves down by
    /// one, and an empty row is inserted at the top. The same row index is
    /// examined again afterwards because it now holds the row from above.
    pub fn clear_completed_rows(&mut self) -> usize {
        self.lock_piece();

        let width = usize::from(self.width);
        let mut cleared = 0;
        let mut row_end = usize::from(self.height);
        while row_end > cleared {
            let y = row_end - 1;
            if self.row(y).iter().all(|c| c.is_occupied()) {
                self.cells
                    .copy_within(cleared * width..y * width, (cleared + 1) * width);
                self.cells[cleared * width..][..width].fill(Cell::Empty);
                cleared += 1;
            } else {
                row_end -= 1;
            }
        }
        cleared
    }

    fn contains(&self, pos: Position) -> bool {
        (0..i32::from(self.width)).contains(&pos.x) && (0..i32::from(self.height)).contains(&pos.y)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        Some(y * usize::from(self.width) + x)
    }

    fn is_vacant(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|i| self.cells[i].is_empty())
    }

    // The piece's own cells count as vacant.
    fn is_vacant_for(&self, piece: &ActivePiece, pos: Position) -> bool {
        self.index(pos)
            .is_some_and(|i| self.cells[i].is_empty() || piece.covers(pos))
    }

    fn fill(&mut self, cells: &[Position], cell: Cell) {
        for &pos in cells {
            let Some(i) = self.index(pos) else {
                panic!(
                    "cell ({}, {}) is outside the {}x{} board",
                    pos.x, pos.y, self.width, self.height
                );
            };
            self.cells[i] = cell;
        }
    }
}
