use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Largest number of rows or columns any piece layout can span.
pub const MAX_SHAPE_SIZE: usize = 4;

/// Rectangular cell layout of a piece.
///
/// The layout is stored in a fixed 4×4 array; only the top-left `width × height`
/// region is meaningful and every cell outside it is kept empty, so two shapes
/// compare equal exactly when their layouts do.
///
/// # Example
///
/// ```
/// use blockfall_engine::PieceKind;
///
/// let t = PieceKind::T.shape();
/// assert_eq!((t.width(), t.height()), (3, 2));
///
/// let rotated = t.rotated();
/// assert_eq!((rotated.width(), rotated.height()), (2, 3));
/// assert_eq!(rotated.rotated().rotated().rotated(), t);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
    width: usize,
    height: usize,
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self
            .rows()
            .map(|row| row.iter().map(|&c| if c { '#' } else { '.' }).collect())
            .collect();
        f.debug_struct("Shape")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rows", &rows)
            .finish()
    }
}

impl Shape {
    /// Builds a shape from rows of `0`/`1` values, top row first.
    #[must_use]
    pub const fn from_rows<const W: usize, const H: usize>(rows: [[u8; W]; H]) -> Self {
        assert!(W > 0 && W <= MAX_SHAPE_SIZE);
        assert!(H > 0 && H <= MAX_SHAPE_SIZE);
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < H {
            let mut x = 0;
            while x < W {
                cells[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }
        Self {
            cells,
            width: W,
            height: H,
        }
    }

    /// Number of columns in the layout.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows in the layout.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns whether the cell at local column `x`, row `y` is filled.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the layout.
    #[must_use]
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} layout",
            self.width,
            self.height
        );
        self.cells[y][x]
    }

    /// Iterates over the layout rows, top to bottom, each exactly `width` cells long.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[bool]> + '_ {
        self.cells[..self.height]
            .iter()
            .map(move |row| &row[..self.width])
    }

    /// Iterates over `(x, y)` local offsets of the filled cells.
    pub fn filled_offsets(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, &filled)| filled.then_some((x, y)))
        })
    }

    /// Returns the layout turned a quarter turn.
    ///
    /// The new layout has `height` columns and `width` rows, and the cell at row `r`,
    /// column `c` is taken from row `height - 1 - c`, column `r` of this layout.
    #[must_use]
    pub const fn rotated(&self) -> Self {
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut r = 0;
        while r < self.width {
            let mut c = 0;
            while c < self.height {
                cells[r][c] = self.cells[self.height - 1 - c][r];
                c += 1;
            }
            r += 1;
        }
        Self {
            cells,
            width: self.height,
            height: self.width,
        }
    }
}

/// The seven piece variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// Square, 2×2.
    O = 0,
    /// T-piece.
    T = 1,
    /// Line, a single row of four.
    I = 2,
    /// J-piece.
    J = 3,
    /// L-piece.
    L = 4,
    /// S-piece.
    S = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl PieceKind {
    /// Number of piece variants (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::O,
        PieceKind::T,
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Returns a copy of this variant's layout in its spawn orientation.
    #[must_use]
    pub const fn shape(self) -> Shape {
        PIECE_SHAPES[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::O.as_char(), 'O');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('T'), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

const PIECE_SHAPES: [Shape; PieceKind::LEN] = [
    // O
    Shape::from_rows([[1, 1], [1, 1]]),
    // T
    Shape::from_rows([[0, 1, 0], [1, 1, 1]]),
    // I
    Shape::from_rows([[1, 1, 1, 1]]),
    // J
    Shape::from_rows([[1, 0, 0], [1, 1, 1]]),
    // L
    Shape::from_rows([[0, 0, 1], [1, 1, 1]]),
    // S
    Shape::from_rows([[1, 1, 0], [0, 1, 1]]),
    // Z
    Shape::from_rows([[0, 1, 1], [1, 1, 0]]),
];

/// Grid position of a piece's top-left layout cell.
///
/// Coordinates are signed: candidate positions produced while testing a move may lie
/// left of or above the board. Committed positions are always inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub struct PiecePosition {
    pub x: i32,
    pub y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn signed(v: usize) -> i32 {
    v as i32
}

/// The falling piece: a variant, its current layout and its grid position.
///
/// Pieces are values. Movement and rotation return new candidates which the caller
/// validates against the board before committing.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, PieceKind, PiecePosition};
///
/// let piece = ActivePiece::spawn(PieceKind::I, 0);
/// assert_eq!(piece.position(), PiecePosition::new(0, 0));
///
/// let moved = piece.right().down();
/// assert_eq!(moved.position(), PiecePosition::new(1, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    kind: PieceKind,
    shape: Shape,
    position: PiecePosition,
}

impl ActivePiece {
    #[must_use]
    pub const fn new(kind: PieceKind, position: PiecePosition) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            position,
        }
    }

    /// Places a fresh copy of `kind`'s layout at `column`, row 0.
    #[must_use]
    pub const fn spawn(kind: PieceKind, column: usize) -> Self {
        Self::new(kind, PiecePosition::new(signed(column), 0))
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub const fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.shape.width()
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.shape.height()
    }

    /// Absolute `(column, row)` of every filled cell.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled_offsets()
            .map(|(dx, dy)| (self.position.x + signed(dx), self.position.y + signed(dy)))
    }

    #[must_use]
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            kind: self.kind,
            shape: self.shape,
            position: self.position.offset(dx, dy),
        }
    }

    #[must_use]
    pub const fn left(&self) -> Self {
        self.translated(-1, 0)
    }

    #[must_use]
    pub const fn right(&self) -> Self {
        self.translated(1, 0)
    }

    #[must_use]
    pub const fn down(&self) -> Self {
        self.translated(0, 1)
    }

    /// Same position, layout turned a quarter turn (see [`Shape::rotated`]).
    #[must_use]
    pub const fn rotated(&self) -> Self {
        Self {
            kind: self.kind,
            shape: self.shape.rotated(),
            position: self.position,
        }
    }
}
