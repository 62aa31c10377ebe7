use blockfall_engine::{GameSession, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Color,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use super::{BoardDisplay, PieceDisplay, SessionStatsDisplay, color, style};

/// The whole play screen: stats on the left, the board, and the next piece.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    show_ghost: bool,
    paused: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            show_ghost: true,
            paused: false,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    pub fn paused(self, paused: bool) -> Self {
        Self { paused, ..self }
    }

    pub fn height(&self) -> u16 {
        self.board_display(Color::Reset).height()
    }

    fn border_color(&self) -> Color {
        match self.session.state() {
            SessionState::GameOver => color::RED,
            _ if self.paused => color::YELLOW,
            SessionState::ClearingLines { .. } => color::CYAN,
            SessionState::Falling => color::WHITE,
        }
    }

    fn board_display(&self, border_color: Color) -> BoardDisplay<'a> {
        let session = self.session;
        let mut widget = BoardDisplay::new(session.board())
            .block(
                Block::bordered()
                    .border_style(border_color)
                    .style(style::DEFAULT),
            )
            .flash_rows(session.clearing_rows().unwrap_or_default());
        if session.state().is_falling() {
            widget = widget.falling_piece(*session.falling_piece());
            if self.show_ghost {
                widget = widget.ghost(session.simulate_drop_position());
            }
        }
        widget
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_color = self.border_color();

        let game_board = self.board_display(border_color);
        let next_panel = PieceDisplay::new()
            .piece(self.session.next_piece())
            .block(
                Block::bordered()
                    .title(Line::from("NEXT").centered())
                    .padding(block_padding)
                    .border_style(border_color)
                    .style(style::DEFAULT),
            );
        let session_stats = SessionStatsDisplay::new(self.session).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_color)
                .style(style::DEFAULT),
        );

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(session_stats.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        let popup = match self.session.state() {
            SessionState::GameOver => Some(("GAME OVER", style::GAME_OVER_POPUP)),
            _ if self.paused => Some(("PAUSED", style::PAUSED_POPUP)),
            _ => None,
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use blockfall_engine::{Board, GameField, Piece, PieceKind, PieceSeed};

    use super::*;

    fn render(display: &SessionDisplay<'_>) -> Buffer {
        let area = Rect::new(0, 0, 80, display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        buf
    }

    fn text(buf: &Buffer) -> String {
        buf.content().iter().map(ratatui::buffer::Cell::symbol).collect()
    }

    #[test]
    fn test_layout_shows_panels() {
        let session = GameSession::with_seed(PieceSeed::from_bytes([5; 16]));
        let display = SessionDisplay::new(&session);
        assert_eq!(display.height(), 22);

        let text = text(&render(&display));
        assert!(text.contains("NEXT"));
        assert!(text.contains("STATS"));
        assert!(text.contains("SCORE:"));
        assert!(!text.contains("PAUSED"));
        assert!(text.contains("[]"), "ghost is drawn");
    }

    #[test]
    fn test_ghost_can_be_hidden() {
        let session = GameSession::with_seed(PieceSeed::from_bytes([5; 16]));
        let text = text(&render(&SessionDisplay::new(&session).show_ghost(false)));
        assert!(!text.contains("[]"));
    }

    #[test]
    fn test_paused_popup() {
        let session = GameSession::with_seed(PieceSeed::from_bytes([5; 16]));
        let text = text(&render(&SessionDisplay::new(&session).paused(true)));
        assert!(text.contains("PAUSED"));
    }

    #[test]
    fn test_clearing_rows_flash() {
        let board = Board::from_ascii("####..####");
        let field = GameField::with_pieces(
            board,
            Piece::at(PieceKind::O, 4, 18),
            PieceKind::T,
            PieceSeed::from_bytes([5; 16]),
        );
        let mut session = GameSession::from_field(field);
        session.tick(Duration::from_millis(501), &[]);
        assert!(session.clearing_rows().is_some());

        let buf = render(&SessionDisplay::new(&session));
        let white_cells = buf
            .content()
            .iter()
            .filter(|cell| cell.bg == color::WHITE && cell.fg == color::WHITE)
            .count();
        assert_eq!(white_cells, 20);
    }
}
