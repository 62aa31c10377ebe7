use super::{
    board::Board,
    shape::{PieceKind, ShapeMatrix},
};

/// Horizontal offsets tried, in order, when a rotation lands in an invalid position.
///
/// This is a simplified wall kick: no per-transition kick tables, no vertical offsets.
const WALL_KICK_OFFSETS: [i32; 4] = [-1, 1, -2, 2];

/// A falling tetromino: a shape, its rotation state and the board position of its
/// bounding box.
///
/// `Piece` is `Copy`. Game logic moves a copy, checks it against the board and only
/// then replaces the original, so a rejected move never needs an explicit undo.
///
/// # Coordinate System
///
/// - `(x, y)` is the top-left corner of the bounding box of the active rotation
/// - X increases rightward (columns), Y increases downward (rows)
/// - Y may be negative while the piece is above the visible area
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind};
///
/// let board = Board::new();
/// let mut piece = Piece::new(PieceKind::T);
/// piece.shift(1, 0);
/// assert!(board.is_valid(&piece));
///
/// let rotated = piece.kick_rotated(&board).unwrap();
/// assert_eq!(rotated.rotation(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    x: i32,
    y: i32,
    kind: PieceKind,
    rotation: usize,
}

impl Piece {
    /// Column of the bounding box when a piece spawns.
    pub const SPAWN_X: i32 = 3;
    /// Row of the bounding box when a piece spawns.
    pub const SPAWN_Y: i32 = 0;

    /// Creates a piece of the given kind at the spawn position in its spawn orientation.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self::at(kind, Self::SPAWN_X, Self::SPAWN_Y)
    }

    /// Creates a piece in its spawn orientation with its bounding box at `(x, y)`.
    #[must_use]
    pub fn at(kind: PieceKind, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            kind,
            rotation: 0,
        }
    }

    /// Returns the same piece in the given rotation state.
    ///
    /// # Panics
    ///
    /// Panics if `rotation` is not an index into the kind's rotation states.
    #[must_use]
    pub fn with_rotation(self, rotation: usize) -> Self {
        assert!(
            rotation < self.kind.rotation_count(),
            "{:?} has no rotation state {rotation}",
            self.kind
        );
        Self { rotation, ..self }
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Index into [`PieceKind::rotations`] of the active state.
    #[must_use]
    pub fn rotation(&self) -> usize {
        self.rotation
    }

    /// The matrix of the active rotation state.
    #[must_use]
    pub fn shape(&self) -> &'static ShapeMatrix {
        &self.kind.rotations()[self.rotation]
    }

    /// Returns the board coordinates of the four occupied cells.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape()
            .occupied_cells()
            .map(move |(dx, dy)| (self.x + dx as i32, self.y + dy as i32))
    }

    /// Advances to the next rotation state, wrapping around.
    ///
    /// Returns `false` and leaves the piece unchanged when the shape has a single
    /// rotation state (the O-piece). The caller is responsible for re-validating.
    pub fn rotate(&mut self) -> bool {
        let count = self.kind.rotation_count();
        if count == 1 {
            return false;
        }
        self.rotation = (self.rotation + 1) % count;
        true
    }

    /// Translates the piece. The caller is responsible for re-validating.
    pub fn shift(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    #[must_use]
    pub fn shifted(mut self, dx: i32, dy: i32) -> Self {
        self.shift(dx, dy);
        self
    }

    #[must_use]
    pub fn rotated(mut self) -> Self {
        self.rotate();
        self
    }

    /// Rotates the piece, nudging it horizontally if the rotated position is invalid.
    ///
    /// Offsets of −1, +1, −2 and +2 columns are tried in that order and the first
    /// valid position wins. Returns `None` if the rotated piece fits nowhere, in which
    /// case the caller keeps the original piece.
    #[must_use]
    pub fn kick_rotated(&self, board: &Board) -> Option<Self> {
        let piece = self.rotated();
        if board.is_valid(&piece) {
            return Some(piece);
        }
        wall_kick(board, piece)
    }

    /// Returns where the piece would come to rest if it fell straight down.
    ///
    /// The piece itself is not modified.
    #[must_use]
    pub fn simulate_drop_position(&self, board: &Board) -> Self {
        let mut dropped = *self;
        loop {
            let next = dropped.shifted(0, 1);
            if !board.is_valid(&next) {
                return dropped;
            }
            dropped = next;
        }
    }
}

fn wall_kick(board: &Board, piece: Piece) -> Option<Piece> {
    WALL_KICK_OFFSETS
        .into_iter()
        .map(|dx| piece.shifted(dx, 0))
        .find(|kicked| board.is_valid(kicked))
}
