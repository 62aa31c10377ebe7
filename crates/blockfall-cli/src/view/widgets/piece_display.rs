use blockfall_engine::PieceKind;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::{BlockDisplay, BoardCell};

/// Preview of a single piece in its spawn orientation.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: PieceKind) -> Self {
        Self {
            piece: Some(piece),
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
        4 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let empty_block = BlockDisplay::from_cell(BoardCell::Empty, false);
        empty_block.render(area, buf);

        let Some(piece) = self.piece else {
            return;
        };
        let shape = piece.spawn_shape();
        let shape_width = u16::try_from(shape.width()).unwrap_or_default();
        let shape_height = u16::try_from(shape.height()).unwrap_or_default();
        let piece_area = area.centered(
            Constraint::Length(shape_width * BlockDisplay::width()),
            Constraint::Length(shape_height * BlockDisplay::height()),
        );

        let col_constraints = (0..shape_width).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..shape_height).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let occupied_block = BlockDisplay::from_cell(BoardCell::Piece(piece), false);
        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                if shape.is_occupied(x, y) {
                    Widget::render(&occupied_block, grid_cell, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::widgets::color;

    fn render(piece: PieceKind) -> Buffer {
        let display = PieceDisplay::new().piece(piece);
        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        buf
    }

    #[test]
    fn test_i_piece_fills_one_row() {
        let buf = render(PieceKind::I);
        let cyan: Vec<_> = (0..2_u16)
            .flat_map(|y| (0..8_u16).map(move |x| (x, y)))
            .filter(|pos| buf[*pos].bg == color::CYAN)
            .collect();
        assert_eq!(cyan.len(), 8);
        assert!(cyan.iter().all(|(_, y)| *y == cyan[0].1));
    }

    #[test]
    fn test_o_piece_is_centered() {
        let buf = render(PieceKind::O);
        assert_eq!(buf[(1, 0)].bg, color::BLACK);
        assert_eq!(buf[(2, 0)].bg, color::YELLOW);
        assert_eq!(buf[(5, 1)].bg, color::YELLOW);
        assert_eq!(buf[(6, 1)].bg, color::BLACK);
    }

    #[test]
    fn test_empty_preview() {
        let display = PieceDisplay::new();
        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        assert!(buf.content().iter().all(|cell| cell.bg == color::BLACK));
    }
}
