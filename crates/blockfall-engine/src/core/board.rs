use std::{collections::VecDeque, fmt};

use crate::core::{collision, piece::ActivePiece};

/// Narrowest supported board.
pub const MIN_BOARD_WIDTH: usize = 4;
/// Widest supported board; one bit per column in a `u64` row mask.
pub const MAX_BOARD_WIDTH: usize = 64;
/// Shortest supported board.
pub const MIN_BOARD_HEIGHT: usize = 4;
/// Tallest supported board.
pub const MAX_BOARD_HEIGHT: usize = 65_535;

/// Single board row stored as a column bitmask.
///
/// Bit `x` is set when column `x` is occupied. Bits at or beyond the board width are
/// never set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoardRow {
    bits: u64,
}

impl BoardRow {
    pub const EMPTY: Self = Self { bits: 0 };

    const fn full_mask(width: usize) -> u64 {
        if width >= 64 {
            u64::MAX
        } else {
            (1 << width) - 1
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_cell_occupied(self, x: usize) -> bool {
        self.bits & (1 << x) != 0
    }

    #[inline]
    const fn occupy_cell(&mut self, x: usize) {
        self.bits |= 1 << x;
    }

    #[inline]
    #[must_use]
    pub const fn is_full(self, width: usize) -> bool {
        self.bits == Self::full_mask(width)
    }

    #[inline]
    #[must_use]
    pub const fn occupied_count(self) -> usize {
        self.bits.count_ones() as usize
    }
}

/// Error returned by [`Board::from_rows`] for malformed text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardParseError {
    #[display(
        "board must be {}..={} columns wide and {}..={} rows tall, got {width}x{height}",
        MIN_BOARD_WIDTH,
        MAX_BOARD_WIDTH,
        MIN_BOARD_HEIGHT,
        MAX_BOARD_HEIGHT
    )]
    Dimensions { width: usize, height: usize },
    #[display("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("unexpected character {ch:?} at column {col} of row {row}")]
    InvalidCell { row: usize, col: usize, ch: char },
}

/// Fixed-size grid of settled cells.
///
/// Row 0 is the top of the board and column 0 the left edge. Coordinates passed to the
/// accessors must be inside the grid; range checks for moving pieces belong to
/// [`collision::is_valid`].
///
/// # Example
///
/// ```
/// use blockfall_engine::Board;
///
/// let mut board = Board::from_rows(&[
///     "....",
///     "....",
///     "#.##",
///     "####",
/// ])
/// .unwrap();
///
/// assert!(board.is_row_full(3));
/// assert_eq!(board.clear_full_rows(), vec![3]);
/// assert!(board.is_occupied(0, 3));
/// assert!(!board.is_occupied(1, 3));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    rows: VecDeque<BoardRow>,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({}x{})\n{self}", self.width, self.height())
    }
}

/// Renders rows as `#` (occupied) and `.` (empty), one line per row.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width {
                let ch = if row.is_cell_occupied(x) { '#' } else { '.' };
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if `width` is outside `4..=64` or `height` outside `4..=65535`.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            Self::dimensions_supported(width, height),
            "unsupported board size {width}x{height}"
        );
        Self {
            width,
            rows: VecDeque::from(vec![BoardRow::EMPTY; height]),
        }
    }

    /// Returns whether a board of the given size can be created.
    #[must_use]
    pub const fn dimensions_supported(width: usize, height: usize) -> bool {
        width >= MIN_BOARD_WIDTH
            && width <= MAX_BOARD_WIDTH
            && height >= MIN_BOARD_HEIGHT
            && height <= MAX_BOARD_HEIGHT
    }

    /// Builds a board from text rows, `#` for occupied and `.` for empty cells.
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardParseError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        if !Self::dimensions_supported(width, height) {
            return Err(BoardParseError::Dimensions { width, height });
        }
        let mut board = Self::new(width, height);
        for (y, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(BoardParseError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in line.chars().enumerate() {
                match ch {
                    '#' => board.set_occupied(x, y),
                    '.' => {}
                    _ => return Err(BoardParseError::InvalidCell { row: y, col: x, ch }),
                }
            }
        }
        Ok(board)
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Read-only view of the rows, top first.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = BoardRow> + '_ {
        self.rows.iter().copied()
    }

    fn check_cell(&self, x: usize, y: usize) {
        assert!(
            x < self.width && y < self.rows.len(),
            "cell ({x}, {y}) outside {}x{} board",
            self.width,
            self.rows.len()
        );
    }

    fn check_row(&self, y: usize) {
        assert!(
            y < self.rows.len(),
            "row {y} outside board of height {}",
            self.rows.len()
        );
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.check_cell(x, y);
        self.rows[y].is_cell_occupied(x)
    }

    /// Marks a cell occupied. Cells are never individually unset.
    pub fn set_occupied(&mut self, x: usize, y: usize) {
        self.check_cell(x, y);
        self.rows[y].occupy_cell(x);
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.check_row(y);
        self.rows[y].is_full(self.width)
    }

    /// Removes row `y`, shifting every row above it down by one and inserting an
    /// empty row at the top. Rows below `y` are unaffected.
    pub fn clear_row(&mut self, y: usize) {
        self.check_row(y);
        self.rows.remove(y);
        self.rows.push_front(BoardRow::EMPTY);
    }

    /// Clears every row that is full and returns the cleared indices in ascending order.
    ///
    /// The full rows are identified in one top-to-bottom scan before anything is
    /// removed. Because clearing a row only shifts rows above it, the later (lower)
    /// indices stay valid while the earlier ones are cleared.
    pub fn clear_full_rows(&mut self) -> Vec<usize> {
        let full: Vec<usize> = (0..self.rows.len())
            .filter(|&y| self.rows[y].is_full(self.width))
            .collect();
        for &y in &full {
            self.clear_row(y);
        }
        full
    }

    /// Writes a piece's filled cells into the grid.
    ///
    /// # Panics
    ///
    /// Panics if the piece is not at a valid position on this board.
    pub fn fill_piece(&mut self, piece: &ActivePiece) {
        assert!(
            collision::is_valid(self, piece),
            "cannot fill piece at invalid position {:?}",
            piece.position()
        );
        for (x, y) in piece.occupied_positions() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                unreachable!("validated piece cell ({x}, {y}) is negative");
            };
            self.set_occupied(x, y);
        }
    }

    /// Empties every cell.
    pub fn reset(&mut self) {
        self.rows.iter_mut().for_each(|row| *row = BoardRow::EMPTY);
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows.iter().map(|row| row.occupied_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::{PieceKind, PiecePosition};

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(15, 30);
        assert_eq!(board.width(), 15);
        assert_eq!(board.height(), 30);
        assert_eq!(board.occupied_count(), 0);
        for y in 0..30 {
            for x in 0..15 {
                assert!(!board.is_occupied(x, y));
            }
        }
    }

    #[test]
    fn test_widest_board() {
        let mut board = Board::new(64, 4);
        for x in 0..64 {
            assert!(!board.is_row_full(3));
            board.set_occupied(x, 3);
        }
        assert!(board.is_row_full(3));
    }

    #[test]
    #[should_panic(expected = "unsupported board size")]
    fn test_too_narrow_board_panics() {
        let _ = Board::new(3, 10);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_range_lookup_panics() {
        let board = Board::new(4, 4);
        let _ = board.is_occupied(4, 0);
    }

    #[test]
    fn test_row_full_only_when_every_cell_set() {
        let mut board = Board::new(4, 4);
        for x in 0..3 {
            board.set_occupied(x, 2);
        }
        assert!(!board.is_row_full(2));
        board.set_occupied(3, 2);
        assert!(board.is_row_full(2));
        assert!(!board.is_row_full(1));
    }

    #[test]
    fn test_clear_row_shifts_rows_above() {
        let mut board = Board::from_rows(&[
            "#...", //
            ".#..", //
            "####", //
            "..#.", //
        ])
        .unwrap();
        board.clear_row(2);
        let expected = Board::from_rows(&[
            "....", //
            "#...", //
            ".#..", //
            "..#.", //
        ])
        .unwrap();
        assert_eq!(board, expected);
    }

    #[test]
    fn test_clear_row_zero_leaves_empty_top() {
        let mut board = Board::from_rows(&["####", "#...", "....", "...."]).unwrap();
        board.clear_row(0);
        assert_eq!(board.to_string(), "....\n#...\n....\n....");
    }

    #[test]
    fn test_clear_adjacent_full_rows() {
        let mut board = Board::from_rows(&[
            "....", //
            ".#..", //
            "####", //
            "####", //
            "#.#.", //
        ])
        .unwrap();
        assert_eq!(board.clear_full_rows(), vec![2, 3]);
        let expected = Board::from_rows(&[
            "....", //
            "....", //
            "....", //
            ".#..", //
            "#.#.", //
        ])
        .unwrap();
        assert_eq!(board, expected);
    }

    #[test]
    fn test_clear_separated_full_rows() {
        let mut board = Board::from_rows(&[
            "#...", //
            "####", //
            ".#..", //
            "####", //
        ])
        .unwrap();
        assert_eq!(board.clear_full_rows(), vec![1, 3]);
        assert_eq!(board.to_string(), "....\n....\n#...\n.#..");
    }

    #[test]
    fn test_clear_full_rows_none() {
        let mut board = Board::from_rows(&["....", "#...", "##..", "###."]).unwrap();
        let before = board.clone();
        assert!(board.clear_full_rows().is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn test_fill_piece() {
        let mut board = Board::new(4, 4);
        board.fill_piece(&ActivePiece::new(PieceKind::I, PiecePosition::new(0, 3)));
        assert!(board.is_row_full(3));
        assert_eq!(board.occupied_count(), 4);
    }

    #[test]
    #[should_panic(expected = "invalid position")]
    fn test_fill_piece_out_of_bounds_panics() {
        let mut board = Board::new(4, 4);
        board.fill_piece(&ActivePiece::new(PieceKind::I, PiecePosition::new(1, 0)));
    }

    #[test]
    fn test_reset() {
        let mut board = Board::from_rows(&["#..#", "....", ".##.", "####"]).unwrap();
        board.reset();
        assert_eq!(board, Board::new(4, 4));
    }

    #[test]
    fn test_from_rows_errors() {
        assert_eq!(
            Board::from_rows(&["...", "...", "...", "..."]),
            Err(BoardParseError::Dimensions {
                width: 3,
                height: 4
            })
        );
        assert_eq!(
            Board::from_rows(&["....", "...", "....", "...."]),
            Err(BoardParseError::RaggedRow {
                row: 1,
                expected: 4,
                found: 3
            })
        );
        assert_eq!(
            Board::from_rows(&["....", "....", "..x.", "...."]),
            Err(BoardParseError::InvalidCell {
                row: 2,
                col: 2,
                ch: 'x'
            })
        );
        assert_eq!(
            Board::from_rows(&[]),
            Err(BoardParseError::Dimensions {
                width: 0,
                height: 0
            })
        );
    }
}
