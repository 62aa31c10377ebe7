use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Side length of the largest bounding box among all shapes (the I-piece).
const MAX_SIZE: usize = 4;

/// An immutable binary matrix describing which cells of a bounding box a shape occupies.
///
/// Matrices are tight: every row and every column holds at least one occupied cell.
/// Cells outside `width × height` are always empty, so two matrices compare equal
/// exactly when they are equal cell by cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMatrix {
    width: usize,
    height: usize,
    cells: [[bool; MAX_SIZE]; MAX_SIZE],
}

impl ShapeMatrix {
    /// Builds a matrix from rows of `#` (occupied) and `.` (empty).
    const fn parse(rows: &[&str]) -> Self {
        let height = rows.len();
        assert!(height > 0 && height <= MAX_SIZE);
        let width = rows[0].len();
        assert!(width > 0 && width <= MAX_SIZE);

        let mut cells = [[false; MAX_SIZE]; MAX_SIZE];
        let mut y = 0;
        while y < height {
            let row = rows[y].as_bytes();
            assert!(row.len() == width);
            let mut x = 0;
            while x < width {
                cells[y][x] = row[x] == b'#';
                x += 1;
            }
            y += 1;
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Rotates the matrix 90° clockwise (reverse the row order, then transpose).
    const fn rotated_clockwise(&self) -> Self {
        let mut cells = [[false; MAX_SIZE]; MAX_SIZE];
        let mut y = 0;
        while y < self.width {
            let mut x = 0;
            while x < self.height {
                cells[y][x] = self.cells[self.height - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }

    /// `PartialEq` is not usable in const context.
    const fn same_cells(&self, other: &Self) -> bool {
        if self.width != other.width || self.height != other.height {
            return false;
        }
        let mut y = 0;
        while y < self.height {
            let mut x = 0;
            while x < self.width {
                if self.cells[y][x] != other.cells[y][x] {
                    return false;
                }
                x += 1;
            }
            y += 1;
        }
        true
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns whether the cell at column `x`, row `y` is occupied.
    ///
    /// Coordinates outside the matrix are reported as empty.
    #[must_use]
    pub const fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y][x]
    }

    /// Returns an iterator of occupied `(x, y)` offsets, row by row from the top.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).filter_map(move |x| self.cells[y][x].then_some((x, y)))
        })
    }
}

/// The distinct rotation states of a shape, in clockwise order starting from the spawn state.
#[derive(Debug, Clone, Copy)]
struct RotationSet {
    states: [ShapeMatrix; 4],
    len: usize,
}

impl RotationSet {
    /// Rotates `base` up to three times, keeping each result not already collected.
    const fn of(base: ShapeMatrix) -> Self {
        let mut states = [base; 4];
        let mut len = 1;
        let mut current = base;
        let mut turn = 0;
        while turn < 3 {
            current = current.rotated_clockwise();
            let mut seen = false;
            let mut i = 0;
            while i < len {
                if states[i].same_cells(&current) {
                    seen = true;
                }
                i += 1;
            }
            if !seen {
                states[len] = current;
                len += 1;
            }
            turn += 1;
        }
        Self { states, len }
    }

    fn as_slice(&self) -> &[ShapeMatrix] {
        &self.states[..self.len]
    }
}

static ROTATION_SETS: [RotationSet; PieceKind::LEN] = [
    // I-piece
    RotationSet::of(ShapeMatrix::parse(&["####"])),
    // J-piece
    RotationSet::of(ShapeMatrix::parse(&["#..", "###"])),
    // L-piece
    RotationSet::of(ShapeMatrix::parse(&["..#", "###"])),
    // O-piece
    RotationSet::of(ShapeMatrix::parse(&["##", "##"])),
    // S-piece
    RotationSet::of(ShapeMatrix::parse(&[".##", "##."])),
    // T-piece
    RotationSet::of(ShapeMatrix::parse(&[".#.", "###"])),
    // Z-piece
    RotationSet::of(ShapeMatrix::parse(&["##.", ".##"])),
];

/// Identity of one of the seven tetrominoes.
///
/// The kind is also the color identity of a piece: every block a piece leaves on the
/// board is tagged with its kind, and front ends map kinds to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Returns the distinct rotation states of this shape.
    ///
    /// Index 0 is the spawn orientation; each following entry is the previous one
    /// rotated 90° clockwise. The O-piece has one state, the I, S and Z pieces have two,
    /// and the J, L and T pieces have four.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::O.rotations().len(), 1);
    /// assert_eq!(PieceKind::S.rotations().len(), 2);
    /// assert_eq!(PieceKind::T.rotations().len(), 4);
    /// ```
    #[must_use]
    pub fn rotations(self) -> &'static [ShapeMatrix] {
        ROTATION_SETS[self as usize].as_slice()
    }

    /// Returns the number of distinct rotation states.
    #[must_use]
    pub fn rotation_count(self) -> usize {
        ROTATION_SETS[self as usize].len
    }

    /// Returns the matrix shown when the piece spawns (and in the next-piece preview).
    #[must_use]
    pub fn spawn_shape(self) -> &'static ShapeMatrix {
        &ROTATION_SETS[self as usize].states[0]
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Returns the ordered, de-duplicated rotation states of `kind`.
///
/// Equivalent to [`PieceKind::rotations`].
#[must_use]
pub fn rotations_of(kind: PieceKind) -> &'static [ShapeMatrix] {
    kind.rotations()
}
