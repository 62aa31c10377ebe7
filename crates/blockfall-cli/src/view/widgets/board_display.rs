use std::iter;

use blockfall_engine::{Board, COLUMNS, Piece, ROWS};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use super::{BlockDisplay, BoardCell};

type Grid = [[BoardCell; COLUMNS]; ROWS];

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    ghost: Option<Piece>,
    falling_piece: Option<Piece>,
    flash_rows: &'a [usize],
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            ghost: None,
            falling_piece: None,
            flash_rows: &[],
            block: None,
        }
    }

    pub fn ghost(self, piece: Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn falling_piece(self, piece: Piece) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    /// Rows drawn highlighted while they are being cleared.
    pub fn flash_rows(self, rows: &'a [usize]) -> Self {
        Self {
            flash_rows: rows,
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
        10 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        20 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }

    fn grid(&self) -> Grid {
        let mut grid = [[BoardCell::Empty; COLUMNS]; ROWS];
        for ((x, y), kind) in self.board.occupied_cells() {
            grid[y][x] = BoardCell::Piece(kind);
        }
        if let Some(ghost) = self.ghost {
            for (x, y) in visible_cells(&ghost) {
                if grid[y][x] == BoardCell::Empty {
                    grid[y][x] = BoardCell::Ghost;
                }
            }
        }
        if let Some(piece) = self.falling_piece {
            for (x, y) in visible_cells(&piece) {
                grid[y][x] = BoardCell::Piece(piece.kind());
            }
        }
        for &y in self.flash_rows {
            if let Some(row) = grid.get_mut(y) {
                row.fill(BoardCell::Flash);
            }
        }
        grid
    }
}

/// Cells of `piece` that lie on the grid; cells above the top row are not drawn.
fn visible_cells(piece: &Piece) -> impl Iterator<Item = (usize, usize)> + '_ {
    piece.cells().filter_map(|(x, y)| {
        let x = usize::try_from(x).ok().filter(|x| *x < COLUMNS)?;
        let y = usize::try_from(y).ok().filter(|y| *y < ROWS)?;
        Some((x, y))
    })
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let grid = self.grid();

        let col_constraints = (0..COLUMNS).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..ROWS).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<ROWS>(&vertical)
            .into_iter()
            .map(|row| row.layout::<COLUMNS>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, grid) {
            for (grid_cell, cell) in iter::zip(grid_row, row) {
                BlockDisplay::from_cell(cell, true).render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::PieceKind;

    use super::*;
    use crate::view::widgets::color;

    fn render(display: &BoardDisplay<'_>) -> Buffer {
        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        buf
    }

    #[test]
    fn test_size_with_border() {
        let board = Board::new();
        let display = BoardDisplay::new(&board).block(BlockWidget::bordered());
        assert_eq!((display.width(), display.height()), (22, 22));
    }

    #[test]
    fn test_locked_cells_use_piece_color() {
        let board = Board::from_ascii("...OO.....");
        let buf = render(&BoardDisplay::new(&board));
        assert_eq!(buf[(6, 19)].bg, color::YELLOW);
        assert_eq!(buf[(9, 19)].bg, color::YELLOW);
        assert_eq!(buf[(10, 19)].bg, color::BLACK);
        assert_eq!(buf[(0, 0)].symbol(), ".");
    }

    #[test]
    fn test_falling_piece_and_ghost() {
        let board = Board::new();
        let piece = Piece::new(PieceKind::T);
        let display = BoardDisplay::new(&board)
            .ghost(piece.simulate_drop_position(&board))
            .falling_piece(piece);
        let buf = render(&display);
        // T spawns with its stem at column 4, row 0.
        assert_eq!(buf[(8, 0)].bg, color::PURPLE);
        assert_eq!(buf[(6, 1)].bg, color::PURPLE);
        assert_eq!(buf[(8, 18)].symbol(), "[");
        assert_eq!(buf[(9, 19)].symbol(), "]");
    }

    #[test]
    fn test_piece_above_top_row_is_clipped() {
        let board = Board::new();
        let piece = Piece::at(PieceKind::I, 0, -2).with_rotation(1);
        let buf = render(&BoardDisplay::new(&board).falling_piece(piece));
        assert_eq!(buf[(0, 0)].bg, color::CYAN);
        assert_eq!(buf[(0, 1)].bg, color::CYAN);
        assert_eq!(buf[(0, 2)].bg, color::BLACK);
    }

    #[test]
    fn test_flash_rows_are_highlighted() {
        let board = Board::from_ascii("IIIIIIIIII");
        let rows = [19];
        let buf = render(&BoardDisplay::new(&board).flash_rows(&rows));
        for x in 0..20_u16 {
            assert_eq!(buf[(x, 19)].bg, color::WHITE);
        }
        assert_eq!(buf[(0, 18)].bg, color::BLACK);
    }
}
