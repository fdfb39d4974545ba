use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    text::{Line, Text},
    widgets::{Block as BlockWidget, Clear, Paragraph, Widget},
};

use super::style;

/// Banner shown over the board once the game is over.
#[derive(Debug)]
pub struct GameOverDisplay {
    final_score: u64,
}

impl GameOverDisplay {
    pub const WIDTH: u16 = 24;
    pub const HEIGHT: u16 = 5;

    pub fn new(final_score: u64) -> Self {
        Self { final_score }
    }

    /// Centers the banner inside `area`.
    pub fn area(area: Rect) -> Rect {
        let [area] = Layout::horizontal([Constraint::Length(Self::WIDTH)])
            .flex(Flex::Center)
            .areas(area);
        let [area] = Layout::vertical([Constraint::Length(Self::HEIGHT)])
            .flex(Flex::Center)
            .areas(area);
        area
    }
}

impl Widget for GameOverDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let text = Text::from(vec![
            Line::styled("GAME OVER", style::GAME_OVER),
            Line::styled(format!("Score: {}", self.final_score), style::DEFAULT),
            Line::styled("r: restart  q: quit", style::EMPTY_DOT),
        ]);
        Paragraph::new(text)
            .centered()
            .style(style::DEFAULT)
            .block(BlockWidget::bordered().border_style(style::GAME_OVER))
            .render(area, buf);
    }
}
