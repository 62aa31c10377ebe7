use arrayvec::ArrayVec;

use super::{piece::Piece, shape::PieceKind};

/// Number of columns in the playable grid.
pub const COLUMNS: usize = 10;
/// Number of rows in the playable grid.
pub const ROWS: usize = 20;

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const COLUMNS_I32: i32 = COLUMNS as i32;
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const ROWS_I32: i32 = ROWS as i32;

/// Row indices of full rows, top to bottom.
pub type FullRows = ArrayVec<usize, ROWS>;

/// A single row of locked cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoardRow {
    cells: [Option<PieceKind>; COLUMNS],
}

impl BoardRow {
    const EMPTY: Self = Self {
        cells: [None; COLUMNS],
    };

    fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

/// The grid of locked blocks.
///
/// Each cell is either empty or holds the kind of the piece that was locked there,
/// which is also its color identity. The board is always `COLUMNS × ROWS`; falling
/// pieces are not part of it until they lock.
///
/// Cells of a locked piece that end up above the top row have nowhere to go. They are
/// dropped from the grid but remembered, so [`Board::is_topped_out`] still reports the
/// board as lost.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, PieceKind};
///
/// let mut board = Board::from_ascii(
///     "
///     IIII.IIIII
///     ",
/// );
/// board.fill_cell(4, 19, PieceKind::T);
///
/// assert_eq!(board.full_rows().as_slice(), &[19]);
/// let rows = board.full_rows();
/// assert_eq!(board.clear_rows(&rows), 1);
/// assert_eq!(board.occupied_count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; ROWS],
    spilled: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: [BoardRow::EMPTY; ROWS],
            spilled: false,
        }
    }

    /// Returns the block at `(x, y)`, or `None` if the cell is empty or off the grid.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<PieceKind> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.cells.get(x).copied().flatten()
    }

    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some()
    }

    /// Checks whether the piece fits on the board.
    ///
    /// Every cell must lie within the columns and above the floor, and must not overlap
    /// a locked block. Cells above the top row (negative y) are allowed and are not
    /// checked against the board.
    #[must_use]
    pub fn is_valid(&self, piece: &Piece) -> bool {
        piece.cells().all(|(x, y)| {
            (0..COLUMNS_I32).contains(&x) && y < ROWS_I32 && (y < 0 || !self.is_occupied(x, y))
        })
    }

    /// Locks the piece's cells onto the board, tagged with its kind.
    ///
    /// Cells outside the grid are not stored; any such cell marks the board as
    /// topped out.
    pub fn fill_piece(&mut self, piece: &Piece) {
        let kind = piece.kind();
        for (x, y) in piece.cells() {
            match (usize::try_from(x), usize::try_from(y)) {
                (Ok(x), Ok(y)) if x < COLUMNS && y < ROWS => self.rows[y].cells[x] = Some(kind),
                _ => self.spilled = true,
            }
        }
    }

    /// Sets a single cell.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    pub fn fill_cell(&mut self, x: usize, y: usize, kind: PieceKind) {
        assert!(x < COLUMNS && y < ROWS, "cell ({x}, {y}) is off the board");
        self.rows[y].cells[x] = Some(kind);
    }

    /// Returns the indices of all completely filled rows, top to bottom.
    #[must_use]
    pub fn full_rows(&self) -> FullRows {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(y, row)| row.is_full().then_some(y))
            .collect()
    }

    /// Removes the given rows and moves everything above them down.
    ///
    /// Each remaining row moves down by the number of removed rows below it, so the
    /// vertical order of the remaining blocks is kept and no gaps are left. Empty rows
    /// are inserted at the top. The rows do not have to be full; indices off the board
    /// and duplicates are ignored. Rows that become full as a result are not cleared.
    ///
    /// Returns the number of rows removed.
    pub fn clear_rows(&mut self, rows: &[usize]) -> usize {
        let mut count = 0;
        for y in (0..ROWS).rev() {
            if rows.contains(&y) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(BoardRow::EMPTY);
        count
    }

    /// Returns whether a locked block sits in the top row or above it.
    #[must_use]
    pub fn is_topped_out(&self) -> bool {
        self.spilled || self.rows[0].cells.iter().any(Option::is_some)
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<PieceKind>; COLUMNS]> {
        self.rows.iter().map(|row| &row.cells)
    }

    /// Returns an iterator of `((x, y), kind)` for every locked block.
    pub fn occupied_cells(&self) -> impl Iterator<Item = ((usize, usize), PieceKind)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.cells
                .iter()
                .enumerate()
                .filter_map(move |(x, cell)| cell.map(|kind| ((x, y), kind)))
        })
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.occupied_cells().count()
    }

    /// Creates a board from ASCII art, for tests and examples.
    ///
    /// Each line is one row of `COLUMNS` characters: `.` is empty, a piece letter
    /// (`I`, `J`, `L`, `O`, `S`, `T`, `Z`) is a block of that kind and `#` is shorthand
    /// for an `I` block. Blank lines and surrounding whitespace are ignored. Rows are
    /// aligned to the bottom of the board.
    ///
    /// # Panics
    ///
    /// Panics if a row has the wrong width, contains an unknown character, or there
    /// are more than `ROWS` rows.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        assert!(
            lines.len() <= ROWS,
            "at most {ROWS} rows allowed, got {}",
            lines.len()
        );

        let mut board = Self::new();
        let top = ROWS - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            assert_eq!(
                chars.len(),
                COLUMNS,
                "Each row must have exactly {COLUMNS} cells, got {} at row {i}",
                chars.len(),
            );
            for (x, ch) in chars.into_iter().enumerate() {
                let kind = match ch {
                    '.' => continue,
                    '#' => PieceKind::I,
                    _ => PieceKind::from_char(ch)
                        .unwrap_or_else(|| panic!("unknown cell character {ch:?}")),
                };
                board.fill_cell(x, top + i, kind);
            }
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, y: usize, kind: PieceKind) {
        for x in 0..COLUMNS {
            board.fill_cell(x, y, kind);
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.occupied_count(), 0);
        assert!(board.full_rows().is_empty());
        assert!(!board.is_topped_out());
        assert_eq!(board.rows().count(), ROWS);
    }

    #[test]
    fn test_get_off_grid_is_empty() {
        let mut board = Board::new();
        board.fill_cell(0, 0, PieceKind::T);
        assert_eq!(board.get(0, 0), Some(PieceKind::T));
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(10, 0), None);
        assert_eq!(board.get(0, 20), None);
    }

    #[test]
    fn test_piece_in_bounds_on_empty_board_is_valid() {
        let board = Board::new();
        for kind in PieceKind::ALL {
            for rotation in 0..kind.rotation_count() {
                let piece = Piece::at(kind, 3, 8).with_rotation(rotation);
                assert!(board.is_valid(&piece), "{kind:?} rotation {rotation}");
            }
        }
    }

    #[test]
    fn test_piece_out_of_bounds_is_invalid() {
        let board = Board::new();
        // Left wall.
        assert!(!board.is_valid(&Piece::at(PieceKind::O, -1, 5)));
        // Right wall: O occupies x and x + 1.
        assert!(board.is_valid(&Piece::at(PieceKind::O, 8, 5)));
        assert!(!board.is_valid(&Piece::at(PieceKind::O, 9, 5)));
        // Floor: O occupies y and y + 1.
        assert!(board.is_valid(&Piece::at(PieceKind::O, 3, 18)));
        assert!(!board.is_valid(&Piece::at(PieceKind::O, 3, 19)));
    }

    #[test]
    fn test_piece_above_top_is_valid() {
        let mut board = Board::new();
        fill_row(&mut board, 0, PieceKind::Z);
        let piece = Piece::at(PieceKind::I, 0, -1);
        assert!(board.is_valid(&piece));
        // Horizontal bounds still apply above the board.
        assert!(!board.is_valid(&Piece::at(PieceKind::I, 7, -1)));
    }

    #[test]
    fn test_piece_overlapping_block_is_invalid() {
        let mut board = Board::new();
        board.fill_cell(4, 10, PieceKind::S);
        assert!(!board.is_valid(&Piece::at(PieceKind::O, 3, 9)));
        assert!(board.is_valid(&Piece::at(PieceKind::O, 5, 9)));
    }

    #[test]
    fn test_is_valid_does_not_mutate() {
        let board = Board::from_ascii("JJJ.......");
        let piece = Piece::at(PieceKind::T, 0, 17);
        let board_before = board.clone();
        let first = board.is_valid(&piece);
        let second = board.is_valid(&piece);
        assert_eq!(first, second);
        assert_eq!(board, board_before);
        assert_eq!(piece, Piece::at(PieceKind::T, 0, 17));
    }

    #[test]
    fn test_fill_piece_tags_cells_with_kind() {
        let mut board = Board::new();
        board.fill_piece(&Piece::at(PieceKind::O, 3, 18));
        let cells: Vec<_> = board.occupied_cells().collect();
        assert_eq!(
            cells,
            [
                ((3, 18), PieceKind::O),
                ((4, 18), PieceKind::O),
                ((3, 19), PieceKind::O),
                ((4, 19), PieceKind::O),
            ]
        );
    }

    #[test]
    fn test_fill_piece_above_top_tops_out() {
        let mut board = Board::new();
        board.fill_piece(&Piece::at(PieceKind::O, 3, -1));
        assert!(board.is_topped_out());
        // Only the in-grid half is stored.
        assert_eq!(board.occupied_count(), 2);
    }

    #[test]
    fn test_topped_out_iff_block_in_top_row() {
        let mut board = Board::new();
        board.fill_cell(5, 1, PieceKind::L);
        assert!(!board.is_topped_out());
        board.fill_cell(5, 0, PieceKind::L);
        assert!(board.is_topped_out());
    }

    #[test]
    fn test_full_rows_two_separate_rows() {
        let mut board = Board::new();
        fill_row(&mut board, 2, PieceKind::I);
        fill_row(&mut board, 5, PieceKind::J);
        board.fill_cell(0, 3, PieceKind::T);
        assert_eq!(board.full_rows().as_slice(), &[2, 5]);
    }

    #[test]
    fn test_clear_rows_shifts_by_rows_below() {
        let mut board = Board::new();
        fill_row(&mut board, 2, PieceKind::I);
        fill_row(&mut board, 5, PieceKind::J);
        board.fill_cell(0, 0, PieceKind::T); // above both cleared rows
        board.fill_cell(1, 3, PieceKind::S); // between them
        board.fill_cell(2, 7, PieceKind::Z); // below both

        let rows = board.full_rows();
        assert_eq!(board.clear_rows(&rows), 2);

        assert_eq!(board.get(0, 2), Some(PieceKind::T));
        assert_eq!(board.get(1, 4), Some(PieceKind::S));
        assert_eq!(board.get(2, 7), Some(PieceKind::Z));
        assert_eq!(board.occupied_count(), 3);
        assert!(board.full_rows().is_empty());
    }

    #[test]
    fn test_clear_rows_consecutive_at_bottom() {
        let mut board = Board::from_ascii(
            "
            ..T.......
            IIIIIIIIII
            OOOOOOOOOO
            ",
        );
        let rows = board.full_rows();
        assert_eq!(board.clear_rows(&rows), 2);
        assert_eq!(board.get(2, 19), Some(PieceKind::T));
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn test_clear_rows_ignores_duplicates_and_out_of_range() {
        let mut board = Board::new();
        fill_row(&mut board, 19, PieceKind::I);
        assert_eq!(board.clear_rows(&[19, 19, 42]), 1);
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_clear_rows_is_single_pass() {
        // A full row that was not requested is shifted down, not cleared.
        let mut board = Board::new();
        fill_row(&mut board, 10, PieceKind::L);
        fill_row(&mut board, 19, PieceKind::I);
        assert_eq!(board.clear_rows(&[19]), 1);
        assert_eq!(board.full_rows().as_slice(), &[11]);
    }

    #[test]
    fn test_clear_rows_all_filled() {
        let mut board = Board::new();
        for y in 0..ROWS {
            fill_row(&mut board, y, PieceKind::O);
        }
        let rows = board.full_rows();
        assert_eq!(board.clear_rows(&rows), ROWS);
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_from_ascii_aligns_to_bottom() {
        let board = Board::from_ascii(
            "
            Z.........
            #........S
            ",
        );
        assert_eq!(board.get(0, 18), Some(PieceKind::Z));
        assert_eq!(board.get(0, 19), Some(PieceKind::I));
        assert_eq!(board.get(9, 19), Some(PieceKind::S));
        assert_eq!(board.occupied_count(), 3);
    }

    #[test]
    #[should_panic(expected = "exactly 10 cells")]
    fn test_from_ascii_rejects_wrong_width() {
        let _ = Board::from_ascii("....");
    }

    #[test]
    #[should_panic(expected = "off the board")]
    fn test_fill_cell_off_board() {
        Board::new().fill_cell(COLUMNS, 0, PieceKind::I);
    }
}
