use std::{iter, ops::Range};

use blockfall_engine::{ActivePiece, Board};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use super::{CellDisplay, CellKind};

/// Board grid with the falling piece drawn over the settled cells.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling_piece: Option<&'a ActivePiece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling_piece: None,
            block: None,
        }
    }

    pub fn falling_piece(self, piece: Option<&'a ActivePiece>) -> Self {
        Self {
            falling_piece: piece,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    /// Width needed to show every column, saturating at `u16::MAX`.
    pub fn width(&self) -> u16 {
        cells_u16(self.board.width())
            .saturating_mul(CellDisplay::WIDTH)
            .saturating_add(super::block_horizontal_margin(self.block.as_ref()))
    }

    /// Height needed to show every row, saturating at `u16::MAX`.
    pub fn height(&self) -> u16 {
        cells_u16(self.board.height())
            .saturating_mul(CellDisplay::HEIGHT)
            .saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }
}

fn cells_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Picks the board rows shown when only `capacity` rows fit on screen.
///
/// The window sits on the floor and scrolls up just enough to show the top of
/// the falling piece.
fn visible_rows(board_height: usize, capacity: usize, piece_top: Option<usize>) -> Range<usize> {
    let len = board_height.min(capacity);
    let floor_start = board_height - len;
    let start = piece_top.map_or(floor_start, |top| top.min(floor_start));
    start..start + len
}

/// Resolves what each cell in `rows` shows, row by row from the top of the range.
///
/// The board and the piece are only read.
pub fn cell_kinds(
    board: &Board,
    falling_piece: Option<&ActivePiece>,
    rows: Range<usize>,
) -> Vec<Vec<CellKind>> {
    let mut grid: Vec<Vec<CellKind>> = board
        .rows()
        .skip(rows.start)
        .take(rows.len())
        .map(|row| {
            (0..board.width())
                .map(|x| {
                    if row.is_cell_occupied(x) {
                        CellKind::Locked
                    } else {
                        CellKind::Empty
                    }
                })
                .collect()
        })
        .collect();
    for (x, y) in falling_piece.into_iter().flat_map(ActivePiece::occupied_positions) {
        if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
            && let Some(y) = y.checked_sub(rows.start)
            && let Some(cell) = grid.get_mut(y).and_then(|row| row.get_mut(x))
        {
            *cell = CellKind::Falling;
        }
    }
    grid
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let piece_top = self
            .falling_piece
            .and_then(|piece| usize::try_from(piece.position().y).ok());
        let capacity = usize::from(area.height / CellDisplay::HEIGHT);
        let rows = visible_rows(self.board.height(), capacity, piece_top);

        let col_constraints =
            (0..self.board.width()).map(|_| Constraint::Length(CellDisplay::WIDTH));
        let row_constraints = rows.clone().map(|_| Constraint::Length(CellDisplay::HEIGHT));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid = cell_kinds(self.board, self.falling_piece, rows);
        for (row_area, row) in iter::zip(vertical.split(area).iter(), grid) {
            for (cell_area, kind) in iter::zip(horizontal.split(*row_area).iter(), row) {
                CellDisplay::new(kind).render(*cell_area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{MAX_BOARD_HEIGHT, PieceKind, PiecePosition};

    use super::*;
    use crate::view::widgets::style;

    #[test]
    fn test_cell_kinds_overlay_piece() {
        use CellKind::{Empty as E, Falling as F, Locked as L};

        let board = Board::from_rows(&["....", "....", "....", "#..#"]).unwrap();
        let piece = ActivePiece::new(PieceKind::O, PiecePosition::new(1, 2));
        let grid = cell_kinds(&board, Some(&piece), 0..4);
        assert_eq!(
            grid,
            vec![
                vec![E, E, E, E],
                vec![E, E, E, E],
                vec![E, F, F, E],
                vec![L, F, F, L],
            ]
        );
    }

    #[test]
    fn test_cell_kinds_without_piece() {
        let board = Board::from_rows(&["....", "....", ".#..", "####"]).unwrap();
        let grid = cell_kinds(&board, None, 0..board.height());
        assert_eq!(grid[2][1], CellKind::Locked);
        assert!(!grid.iter().flatten().any(|&k| k == CellKind::Falling));
    }

    #[test]
    fn test_size_includes_border() {
        let board = Board::new(15, 30);
        let display = BoardDisplay::new(&board).block(BlockWidget::bordered());
        assert_eq!(display.width(), 32);
        assert_eq!(display.height(), 32);
    }

    #[test]
    fn test_visible_rows_follow_floor_and_piece() {
        assert_eq!(visible_rows(30, 40, Some(0)), 0..30);
        assert_eq!(visible_rows(100, 20, None), 80..100);
        assert_eq!(visible_rows(100, 20, Some(90)), 80..100);
        assert_eq!(visible_rows(100, 20, Some(5)), 5..25);
    }

    #[test]
    fn test_tallest_board_renders_in_small_area() {
        let board = Board::new(15, MAX_BOARD_HEIGHT);
        let piece = ActivePiece::new(PieceKind::O, PiecePosition::new(0, 0));
        let display = BoardDisplay::new(&board)
            .falling_piece(Some(&piece))
            .block(BlockWidget::bordered());
        assert_eq!(display.height(), u16::MAX);
        assert_eq!(display.width(), 32);

        let area = Rect::new(0, 0, 32, 12);
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        // The window starts at the piece's top row, just inside the border.
        assert_eq!(Some(buf[(1, 1)].bg), style::FALLING.bg);
        assert_eq!(Some(buf[(1, 2)].bg), style::FALLING.bg);
        assert_ne!(Some(buf[(1, 3)].bg), style::FALLING.bg);
    }
}
