use std::time::Duration;

use blockfall_engine::GameSession;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::style;

const LINE_COUNT: usize = 8;
const CONTENT_WIDTH: u16 = 16;

/// Score and time as headline figures, followed by level, lines and pieces.
pub struct SessionStatsDisplay<'a> {
    session: &'a GameSession,
    block: Option<BlockWidget<'a>>,
}

/// One line of the panel.
enum StatLine {
    Blank,
    Heading(&'static str),
    Figure(String),
    Labeled(&'static str, String),
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        CONTENT_WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        LINE_COUNT as u16 + super::block_vertical_margin(self.block.as_ref())
    }

    fn lines(&self) -> [StatLine; LINE_COUNT] {
        let stats = self.session.stats();
        [
            StatLine::Heading("SCORE:"),
            StatLine::Figure(stats.score().to_string()),
            StatLine::Heading("TIME:"),
            StatLine::Figure(format_play_time(self.session.play_time())),
            StatLine::Blank,
            StatLine::Labeled("LEVEL:", stats.level().to_string()),
            StatLine::Labeled("LINES:", stats.cleared_lines().to_string()),
            StatLine::Labeled("PIECES:", stats.completed_pieces().to_string()),
        ]
    }
}

/// Formats as `m:ss.cc`, with hundredths of a second.
fn format_play_time(time: Duration) -> String {
    let secs = time.as_secs();
    format!(
        "{}:{:02}.{:02}",
        secs / 60,
        secs % 60,
        time.subsec_millis() / 10
    )
}

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let line_areas: [Rect; LINE_COUNT] =
            Layout::vertical([Constraint::Length(1); LINE_COUNT]).areas(area);
        for (line, area) in self.lines().into_iter().zip(line_areas) {
            match line {
                StatLine::Blank => {}
                StatLine::Heading(text) => Line::styled(text, style::DEFAULT).render(area, buf),
                StatLine::Figure(value) => Line::styled(value, style::DEFAULT)
                    .right_aligned()
                    .render(area, buf),
                StatLine::Labeled(label, value) => {
                    Line::styled(label, style::DEFAULT).render(area, buf);
                    Line::styled(value, style::DEFAULT)
                        .right_aligned()
                        .render(area, buf);
                }
            }
        }
    }
}
