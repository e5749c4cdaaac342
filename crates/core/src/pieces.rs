//! Pieces module - Tetromino shape table and rotation with wall kicks
//!
//! Every kind has four rotation states, each a square mask (2x2 for O, 4x4 for I,
//! 3x3 for the rest). Rotation tries the base position first and then a single,
//! rotation-independent kick list ([`WALL_KICKS`]).

use arrayvec::ArrayVec;

use crate::types::{PieceKind, Rotation, WALL_KICKS};

/// Offset of a single mino relative to the mask's top-left corner
pub type MinoOffset = (i8, i8);

/// The four mino offsets of one rotation state
pub type Minos = ArrayVec<MinoOffset, 4>;

/// One rotation state of a piece: a square mask of `size` x `size` cells.
///
/// Each row is a 4-bit pattern read left to right, so `0b0100` fills column 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    size: u8,
    rows: [u8; 4],
}

impl Shape {
    const fn new(size: u8, rows: [u8; 4]) -> Self {
        Self { size, rows }
    }

    /// Edge length of the square mask
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Whether the mask cell at (x, y) is filled
    pub fn is_filled(&self, x: u8, y: u8) -> bool {
        if x >= self.size || y >= self.size {
            return false;
        }
        self.rows[y as usize] & (0b1000 >> x) != 0
    }

    /// Filled cells in row-major order
    pub fn minos(&self) -> Minos {
        let mut out = Minos::new();
        for y in 0..self.size {
            for x in 0..self.size {
                if self.is_filled(x, y) {
                    let _ = out.try_push((x as i8, y as i8));
                }
            }
        }
        out
    }
}

/// Shape table indexed by `[kind][rotation]`
static SHAPES: [[Shape; 4]; 7] = [
    // I
    [
        Shape::new(4, [0b0000, 0b1111, 0b0000, 0b0000]),
        Shape::new(4, [0b0010, 0b0010, 0b0010, 0b0010]),
        Shape::new(4, [0b0000, 0b0000, 0b1111, 0b0000]),
        Shape::new(4, [0b0100, 0b0100, 0b0100, 0b0100]),
    ],
    // O
    [
        Shape::new(2, [0b1100, 0b1100, 0, 0]),
        Shape::new(2, [0b1100, 0b1100, 0, 0]),
        Shape::new(2, [0b1100, 0b1100, 0, 0]),
        Shape::new(2, [0b1100, 0b1100, 0, 0]),
    ],
    // T
    [
        Shape::new(3, [0b0100, 0b1110, 0b0000, 0]),
        Shape::new(3, [0b0100, 0b0110, 0b0100, 0]),
        Shape::new(3, [0b0000, 0b1110, 0b0100, 0]),
        Shape::new(3, [0b0100, 0b1100, 0b0100, 0]),
    ],
    // S
    [
        Shape::new(3, [0b0110, 0b1100, 0b0000, 0]),
        Shape::new(3, [0b0100, 0b0110, 0b0010, 0]),
        Shape::new(3, [0b0000, 0b0110, 0b1100, 0]),
        Shape::new(3, [0b1000, 0b1100, 0b0100, 0]),
    ],
    // Z
    [
        Shape::new(3, [0b1100, 0b0110, 0b0000, 0]),
        Shape::new(3, [0b0010, 0b0110, 0b0100, 0]),
        Shape::new(3, [0b0000, 0b1100, 0b0110, 0]),
        Shape::new(3, [0b0100, 0b1100, 0b1000, 0]),
    ],
    // J
    [
        Shape::new(3, [0b1000, 0b1110, 0b0000, 0]),
        Shape::new(3, [0b0110, 0b0100, 0b0100, 0]),
        Shape::new(3, [0b0000, 0b1110, 0b0010, 0]),
        Shape::new(3, [0b0100, 0b0100, 0b1100, 0]),
    ],
    // L
    [
        Shape::new(3, [0b0010, 0b1110, 0b0000, 0]),
        Shape::new(3, [0b0100, 0b0100, 0b0110, 0]),
        Shape::new(3, [0b0000, 0b1110, 0b1000, 0]),
        Shape::new(3, [0b1100, 0b0100, 0b0100, 0]),
    ],
];

/// Get the shape for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> &'static Shape {
    &SHAPES[kind.index()][rotation.index()]
}

/// Column that centers a freshly spawned piece on a board of `board_width` columns
pub fn spawn_x(kind: PieceKind, board_width: u8) -> i8 {
    let size = get_shape(kind, Rotation::North).size() as i8;
    (board_width as i8 - size).div_euclid(2)
}

/// Active falling piece
///
/// `(x, y)` is the top-left of the mask's bounding box in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a piece at rotation 0, centered at the top of the board
    pub fn spawn(kind: PieceKind, board_width: u8) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: spawn_x(kind, board_width),
            y: 0,
        }
    }

    /// Shape for the current rotation
    pub fn shape(&self) -> &'static Shape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute board cells covered by this piece
    pub fn cells(&self) -> Minos {
        self.shape()
            .minos()
            .into_iter()
            .map(|(dx, dy)| (self.x + dx, self.y + dy))
            .collect()
    }

    /// Copy shifted by (dx, dy)
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Try to rotate a piece with wall kicks
///
/// `fits(rotation, dx, dy)` reports whether the piece would be valid at the new
/// rotation shifted by (dx, dy). The base position is probed first, then every
/// entry of [`WALL_KICKS`] in order; the first fit wins.
///
/// Returns the new rotation and the applied offset, or None if all candidates fail.
pub fn try_rotate(
    rotation: Rotation,
    clockwise: bool,
    fits: impl Fn(Rotation, i8, i8) -> bool,
) -> Option<(Rotation, (i8, i8))> {
    let new_rotation = rotation.rotated(clockwise);

    std::iter::once((0, 0))
        .chain(WALL_KICKS.iter().copied())
        .find(|&(dx, dy)| fits(new_rotation, dx, dy))
        .map(|offset| (new_rotation, offset))
}
