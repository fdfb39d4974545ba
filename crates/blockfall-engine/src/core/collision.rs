//! Placement rule shared by every move, rotation and spawn.

use crate::core::{board::Board, piece::ActivePiece};

/// Returns whether `piece` fits on `board`.
///
/// A placement is valid when every filled cell of the piece lies inside the grid and
/// lands on an empty board cell. Empty cells of the layout never collide.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, Board, PieceKind, PiecePosition, collision};
///
/// let board = Board::new(4, 4);
/// let line = ActivePiece::new(PieceKind::I, PiecePosition::new(0, 3));
/// assert!(collision::is_valid(&board, &line));
/// assert!(!collision::is_valid(&board, &line.right()));
/// assert!(!collision::is_valid(&board, &line.down()));
/// ```
#[must_use]
pub fn is_valid(board: &Board, piece: &ActivePiece) -> bool {
    piece.occupied_positions().all(|(x, y)| {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return false;
        };
        x < board.width() && y < board.height() && !board.is_occupied(x, y)
    })
}

/// Negation of [`is_valid`].
#[must_use]
pub fn is_colliding(board: &Board, piece: &ActivePiece) -> bool {
    !is_valid(board, piece)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::{PieceKind, PiecePosition};

    #[test]
    fn test_walls_and_floor() {
        let board = Board::new(6, 5);
        let o = ActivePiece::new(PieceKind::O, PiecePosition::new(0, 0));
        assert!(is_valid(&board, &o));
        assert!(is_colliding(&board, &o.left()));
        assert!(is_colliding(&board, &o.translated(0, -1)));
        assert!(is_valid(&board, &o.translated(4, 3)));
        assert!(is_colliding(&board, &o.translated(5, 3)));
        assert!(is_colliding(&board, &o.translated(4, 4)));
    }

    #[test]
    fn test_occupied_cell_collides() {
        let board = Board::from_rows(&[
            "......", //
            "......", //
            "......", //
            "..#...", //
        ])
        .unwrap();
        let line = ActivePiece::new(PieceKind::I, PiecePosition::new(0, 3));
        assert!(is_colliding(&board, &line));
        assert!(is_valid(&board, &line.translated(0, -1)));
    }

    #[test]
    fn test_empty_layout_cells_do_not_collide() {
        // T's top row is ".#.", so its top corners may overlap settled cells.
        let board = Board::from_rows(&[
            "#.#.", //
            "....", //
            "....", //
            "....", //
        ])
        .unwrap();
        let t = ActivePiece::new(PieceKind::T, PiecePosition::new(0, 0));
        assert!(is_valid(&board, &t));
    }
}
