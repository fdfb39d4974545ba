use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use super::style;

/// What a board cell shows on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    /// Settled cell from an earlier lock.
    Locked,
    /// Cell covered by the falling piece.
    Falling,
}

/// A single board cell, two terminal columns wide.
#[derive(Debug)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const WIDTH: u16 = 2;
    pub const HEIGHT: u16 = 1;

    pub const fn new(kind: CellKind) -> Self {
        match kind {
            CellKind::Empty => Self {
                style: style::EMPTY_DOT,
                symbol: ".",
            },
            CellKind::Locked => Self {
                style: style::LOCKED,
                symbol: "",
            },
            CellKind::Falling => Self {
                style: style::FALLING,
                symbol: "",
            },
        }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Paragraph fills the whole area, not just the cells under the symbol.
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
