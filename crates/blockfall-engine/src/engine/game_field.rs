use crate::{
    PieceCollisionError,
    core::{
        board::{Board, FullRows},
        piece::Piece,
        shape::PieceKind,
    },
};

use super::piece_generator::{PieceGenerator, PieceSeed};

/// The playing field: the board, the falling piece and the next piece.
///
/// `GameField` knows nothing about time. It validates moves and performs the merge
/// and collapse steps of a lock; [`GameSession`](crate::GameSession) decides when
/// they happen.
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    falling_piece: Piece,
    next_piece: PieceKind,
    generator: PieceGenerator,
}

impl Default for GameField {
    fn default() -> Self {
        Self::new()
    }
}

impl GameField {
    /// Creates an empty field with a random piece sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::from_generator(Board::new(), PieceGenerator::new())
    }

    /// Creates an empty field whose piece sequence is determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::from_generator(Board::new(), PieceGenerator::with_seed(seed))
    }

    /// Creates a field from an existing board and explicit pieces.
    ///
    /// Pieces after `next_piece` are drawn from a generator seeded with `seed`.
    #[must_use]
    pub fn with_pieces(
        board: Board,
        falling_piece: Piece,
        next_piece: PieceKind,
        seed: PieceSeed,
    ) -> Self {
        Self {
            board,
            falling_piece,
            next_piece,
            generator: PieceGenerator::with_seed(seed),
        }
    }

    fn from_generator(board: Board, mut generator: PieceGenerator) -> Self {
        let falling_piece = Piece::new(generator.next_kind());
        let next_piece = generator.next_kind();
        Self {
            board,
            falling_piece,
            next_piece,
            generator,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        &self.falling_piece
    }

    #[must_use]
    pub fn next_piece(&self) -> PieceKind {
        self.next_piece
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.generator.seed()
    }

    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if !self.board.is_valid(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    pub fn set_falling_piece_unchecked(&mut self, piece: Piece) {
        self.falling_piece = piece;
    }

    /// Translates the falling piece, keeping the old position if the new one is invalid.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> Result<(), PieceCollisionError> {
        self.set_falling_piece(self.falling_piece.shifted(dx, dy))
    }

    /// Rotates the falling piece with wall kicks, keeping the old state if nothing fits.
    pub fn try_rotate(&mut self) -> Result<(), PieceCollisionError> {
        let piece = self
            .falling_piece
            .kick_rotated(&self.board)
            .ok_or(PieceCollisionError)?;
        self.set_falling_piece_unchecked(piece);
        Ok(())
    }

    #[must_use]
    pub fn simulate_drop_position(&self) -> Piece {
        self.falling_piece.simulate_drop_position(&self.board)
    }

    /// Merges the falling piece into the board and returns the rows it completed.
    ///
    /// The falling piece is left in place until [`Self::spawn_next`] is called.
    pub fn lock_falling_piece(&mut self) -> FullRows {
        self.board.fill_piece(&self.falling_piece);
        self.board.full_rows()
    }

    /// Removes `rows` and collapses the rows above them. Returns the number removed.
    pub fn clear_rows(&mut self, rows: &[usize]) -> usize {
        self.board.clear_rows(rows)
    }

    /// Promotes the next piece to the falling piece and draws a new next piece.
    pub fn spawn_next(&mut self) {
        self.falling_piece = Piece::new(self.next_piece);
        self.next_piece = self.generator.next_kind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([7; 16]);

    fn field(board: Board, piece: Piece) -> GameField {
        GameField::with_pieces(board, piece, PieceKind::T, SEED)
    }

    #[test]
    fn test_new_field_spawns_at_origin() {
        let field = GameField::with_seed(SEED);
        let piece = field.falling_piece();
        assert_eq!((piece.x(), piece.y(), piece.rotation()), (3, 0, 0));
        assert_eq!(field.board().occupied_count(), 0);
        assert_eq!(field.seed(), SEED);
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let mut a = GameField::with_seed(SEED);
        let mut b = GameField::with_seed(SEED);
        for _ in 0..20 {
            assert_eq!(a.falling_piece(), b.falling_piece());
            assert_eq!(a.next_piece(), b.next_piece());
            a.spawn_next();
            b.spawn_next();
        }
    }

    #[test]
    fn test_try_move_rolls_back_at_wall() {
        let mut field = field(Board::new(), Piece::at(PieceKind::O, 0, 5));
        assert!(field.try_move(-1, 0).is_err());
        assert_eq!(field.falling_piece().x(), 0);
        assert!(field.try_move(1, 0).is_ok());
        assert_eq!(field.falling_piece().x(), 1);
    }

    #[test]
    fn test_try_move_rolls_back_on_floor() {
        let mut field = field(Board::new(), Piece::at(PieceKind::O, 3, 18));
        assert!(field.try_move(0, 1).is_err());
        assert_eq!(field.falling_piece().y(), 18);
    }

    #[test]
    fn test_try_rotate_keeps_piece_when_blocked() {
        let board = Board::from_ascii(
            "
            ####.#####
            ####.#####
            ####.#####
            ####.#####
            ",
        );
        let piece = Piece::at(PieceKind::I, 4, 16).with_rotation(1);
        let mut field = field(board, piece);
        assert!(field.try_rotate().is_err());
        assert_eq!(field.falling_piece(), &piece);
    }

    #[test]
    fn test_try_rotate_applies_kick() {
        let piece = Piece::at(PieceKind::I, 8, 5).with_rotation(1);
        let mut field = field(Board::new(), piece);
        field.try_rotate().unwrap();
        assert_eq!(field.falling_piece().rotation(), 0);
        assert_eq!(field.falling_piece().x(), 6);
    }

    #[test]
    fn test_lock_reports_full_rows_without_clearing() {
        let board = Board::from_ascii(
            "
            ####..####
            ####..####
            ",
        );
        let mut field = field(board, Piece::at(PieceKind::O, 4, 18));
        let rows = field.lock_falling_piece();
        assert_eq!(rows.as_slice(), &[18, 19]);
        assert_eq!(field.board().occupied_count(), 20);

        assert_eq!(field.clear_rows(&rows), 2);
        assert_eq!(field.board().occupied_count(), 0);
    }

    #[test]
    fn test_spawn_next_promotes_preview() {
        let mut field = field(Board::new(), Piece::at(PieceKind::O, 3, 18));
        field.spawn_next();
        assert_eq!(field.falling_piece(), &Piece::new(PieceKind::T));
    }
}
