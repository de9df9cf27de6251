use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Relative `(x, y)` offset of one cell.
///
/// X grows rightward and Y grows downward, matching board coordinates.
pub type CellOffset = (i8, i8);

/// Four cell offsets, one per cell of a tetromino.
///
/// The same cell index is used in spawn footprints and rotation deltas, so
/// `delta[i]` always moves the cell that started at `footprint[i]`.
pub type PieceOffsets = [CellOffset; 4];

/// Orientation of the active piece.
///
/// - `0`: spawn orientation
/// - `1`..=`3`: reached by successive rotations
///
/// Orientation advances modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Orientation(u8);

impl Orientation {
    /// Orientation a piece has right after spawning.
    pub const SPAWN: Self = Self(0);

    /// Returns the orientation for `value`, or `None` when `value > 3`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value < 4 { Some(Self(value)) } else { None }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn rotated(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// One of the seven tetromino shapes.
///
/// Discriminants index the constant catalog tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// J-piece (hook on the left).
    J = 0,
    /// S-piece.
    S = 1,
    /// I-piece (straight).
    I = 2,
    /// T-piece.
    T = 3,
    /// L-piece (hook on the right).
    L = 4,
    /// Z-piece.
    Z = 5,
    /// O-piece (square).
    O = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All kinds in catalog order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::J,
        PieceKind::S,
        PieceKind::I,
        PieceKind::T,
        PieceKind::L,
        PieceKind::Z,
        PieceKind::O,
    ];

    /// Cell offsets relative to the spawn center `(width / 2, 0)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.spawn_footprint(), &[(-2, 0), (-1, 0), (0, 0), (1, 0)]);
    /// ```
    #[must_use]
    pub const fn spawn_footprint(self) -> &'static PieceOffsets {
        &SPAWN_FOOTPRINTS[self as usize]
    }

    /// Per-cell movement that rotates this kind from `orientation` to
    /// `orientation.rotated()`.
    ///
    /// Deltas are added to the current absolute cells; no pivot is involved.
    #[must_use]
    pub const fn rotation_delta(self, orientation: Orientation) -> &'static PieceOffsets {
        &ROTATION_DELTAS[self as usize][orientation.as_usize()]
    }

    /// Number of rotations after which the piece is back on its original cells.
    #[must_use]
    pub const fn rotation_period(self) -> usize {
        match self {
            PieceKind::O => 1,
            PieceKind::S | PieceKind::I | PieceKind::Z => 2,
            PieceKind::J | PieceKind::T | PieceKind::L => 4,
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::J.as_char(), 'J');
    /// assert_eq!(PieceKind::O.as_char(), 'O');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::J => 'J',
            PieceKind::S => 'S',
            PieceKind::I => 'I',
            PieceKind::T => 'T',
            PieceKind::L => 'L',
            PieceKind::Z => 'Z',
            PieceKind::O => 'O',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('T'), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'J' => Some(PieceKind::J),
            'S' => Some(PieceKind::S),
            'I' => Some(PieceKind::I),
            'T' => Some(PieceKind::T),
            'L' => Some(PieceKind::L),
            'Z' => Some(PieceKind::Z),
            'O' => Some(PieceKind::O),
            _ => None,
        }
    }
}

const SPAWN_FOOTPRINTS: [PieceOffsets; PieceKind::LEN] = [
    // J-piece
    [(-1, 0), (-1, 1), (0, 1), (1, 1)],
    // S-piece
    [(-1, 1), (0, 1), (0, 0), (1, 0)],
    // I-piece
    [(-2, 0), (-1, 0), (0, 0), (1, 0)],
    // T-piece
    [(-1, 1), (0, 1), (0, 0), (1, 1)],
    // L-piece
    [(-1, 1), (0, 1), (1, 1), (1, 0)],
    // Z-piece
    [(-1, 0), (0, 0), (0, 1), (1, 1)],
    // O-piece
    [(-1, 0), (-1, 1), (0, 0), (0, 1)],
];

const ROTATION_DELTAS: [[PieceOffsets; 4]; PieceKind::LEN] = {
    const S_Z_EVEN: PieceOffsets = [(1, 0), (0, 1), (-1, 0), (-2, 1)];
    const S_Z_ODD: PieceOffsets = [(-1, 0), (0, -1), (1, 0), (2, -1)];
    const I_EVEN: PieceOffsets = [(2, -2), (1, -1), (0, 0), (-1, 1)];
    const I_ODD: PieceOffsets = [(-2, 2), (-1, 1), (0, 0), (1, -1)];
    const NONE: PieceOffsets = [(0, 0); 4];
    [
        // J-piece
        [
            [(0, 2), (1, 1), (0, 0), (-1, -1)],
            [(2, 0), (1, -1), (0, 0), (-1, 1)],
            [(0, -2), (-1, -1), (0, 0), (1, 1)],
            [(-2, 0), (-1, 1), (0, 0), (1, -1)],
        ],
        // S-piece
        [S_Z_EVEN, S_Z_ODD, S_Z_EVEN, S_Z_ODD],
        // I-piece
        [I_EVEN, I_ODD, I_EVEN, I_ODD],
        // T-piece
        [
            [(1, 1), (0, 0), (-1, 1), (-1, -1)],
            [(1, -1), (0, 0), (1, 1), (-1, 1)],
            [(-1, -1), (0, 0), (1, -1), (1, 1)],
            [(-1, 1), (0, 0), (-1, -1), (1, -1)],
        ],
        // L-piece
        [
            [(1, 1), (0, 0), (-1, -1), (-2, 0)],
            [(1, -1), (0, 0), (-1, 1), (0, 2)],
            [(-1, -1), (0, 0), (1, 1), (2, 0)],
            [(-1, 1), (0, 0), (1, -1), (0, -2)],
        ],
        // Z-piece
        [S_Z_EVEN, S_Z_ODD, S_Z_EVEN, S_Z_ODD],
        // O-piece
        [NONE; 4],
    ]
};

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn orientations() -> impl Iterator<Item = Orientation> {
        (0..4).filter_map(Orientation::new)
    }

    #[test]
    fn test_footprints_have_four_distinct_cells() {
        for kind in PieceKind::ALL {
            let cells: HashSet<_> = kind.spawn_footprint().iter().copied().collect();
            assert_eq!(cells.len(), 4, "{kind:?} footprint has duplicate cells");
        }
    }

    #[test]
    fn test_footprints_fit_spawn_window() {
        // Board validation relies on every footprint staying within x in -2..=1, y in 0..=1.
        for kind in PieceKind::ALL {
            for &(dx, dy) in kind.spawn_footprint() {
                assert!((-2..=1).contains(&dx), "{kind:?} x offset {dx}");
                assert!((0..=1).contains(&dy), "{kind:?} y offset {dy}");
            }
        }
    }

    #[test]
    fn test_full_turn_deltas_cancel_out() {
        for kind in PieceKind::ALL {
            for cell in 0..4 {
                let (sx, sy) = orientations()
                    .map(|o| kind.rotation_delta(o)[cell])
                    .fold((0, 0), |(ax, ay), (dx, dy)| (ax + dx, ay + dy));
                assert_eq!((sx, sy), (0, 0), "{kind:?} cell {cell} drifts");
            }
        }
    }

    #[test]
    fn test_symmetric_kinds_repeat_every_two_orientations() {
        for kind in [PieceKind::S, PieceKind::I, PieceKind::Z] {
            assert_eq!(kind.rotation_period(), 2);
            let table: Vec<_> = orientations().map(|o| kind.rotation_delta(o)).collect();
            assert_eq!(table[0], table[2]);
            assert_eq!(table[1], table[3]);
            assert_ne!(table[0], table[1]);
        }
    }

    #[test]
    fn test_square_never_moves() {
        for orientation in orientations() {
            assert_eq!(PieceKind::O.rotation_delta(orientation), &[(0, 0); 4]);
        }
    }

    #[test]
    fn test_orientation_wraps() {
        let mut orientation = Orientation::SPAWN;
        for expected in [1, 2, 3, 0] {
            orientation = orientation.rotated();
            assert_eq!(orientation.value(), expected);
        }
        assert_eq!(Orientation::new(4), None);
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('x'), None);
        assert_eq!(PieceKind::from_char('j'), None);
    }

    #[test]
    fn test_sampling_reaches_every_kind() {
        let mut rng = Pcg32::seed_from_u64(7);
        let seen: HashSet<PieceKind> = (0..500).map(|_| rng.random()).collect();
        assert_eq!(seen.len(), PieceKind::LEN);
    }
}
