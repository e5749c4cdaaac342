//! Board module - manages the game grid
//!
//! The board is a `width x height` grid where each cell can be empty or filled with a piece kind.
//! Uses a flat row-major vector sized once at construction; dimensions never change afterwards.
//! Coordinates: (x, y) where x grows to the right and y grows downward from row 0 at the top.
//!
//! Rows above the board (`y < 0`) are open space: a piece may overlap them, they are only
//! bound-checked horizontally, and cells landing there on lock are dropped.

use serde::Serialize;

use crate::pieces::Tetromino;
use crate::types::{Cell, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

/// The game board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if self.is_out_of_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8
    }

    /// Whether a single piece cell may sit at (x, y)
    ///
    /// Columns must be on the board and rows must be above the floor. Rows above the
    /// top edge are never occupied, so only on-board rows are checked against locked cells.
    pub fn accepts(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= self.width as i8 || y >= self.height as i8 {
            return false;
        }
        y < 0 || !self.is_occupied(x, y)
    }

    /// Check whether `piece`, shifted by the offset and optionally turned to
    /// `rotation`, fits on the board.
    pub fn is_valid_position(
        &self,
        piece: &Tetromino,
        offset_x: i8,
        offset_y: i8,
        rotation: Option<Rotation>,
    ) -> bool {
        let candidate = Tetromino {
            rotation: rotation.unwrap_or(piece.rotation),
            ..piece.shifted(offset_x, offset_y)
        };
        candidate.cells().iter().all(|&(x, y)| self.accepts(x, y))
    }

    /// Write the piece's cells into the grid
    ///
    /// Cells above the top edge are discarded. Returns the number of cells written.
    pub fn lock_piece(&mut self, piece: &Tetromino) -> usize {
        let mut written = 0;
        for (x, y) in piece.cells() {
            if y >= 0 && self.set(x, y, Some(piece.kind)) {
                written += 1;
            }
        }
        written
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| cell.is_some()))
            .unwrap_or(false)
    }

    /// Cells of row `y`, left to right
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let start = y * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Iterate rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Clear a row and shift all rows above down
    /// Returns the number of lines cleared (1 or 0)
    pub fn clear_row(&mut self, y: usize) -> usize {
        if y >= self.height as usize {
            return 0;
        }

        let width = self.width as usize;

        // copy_within handles the overlapping ranges
        for row in (1..=y).rev() {
            let src_start = (row - 1) * width;
            self.cells
                .copy_within(src_start..src_start + width, row * width);
        }

        for cell in &mut self.cells[..width] {
            *cell = None;
        }

        1
    }

    /// Clear every full row and return how many were removed
    ///
    /// Rows are scanned bottom to top. After a removal the same index is examined
    /// again, since the row that was above now occupies it.
    pub fn clear_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.height as usize;

        while y > 0 {
            if self.is_row_full(y - 1) {
                cleared += self.clear_row(y - 1);
            } else {
                y -= 1;
            }
        }

        cleared
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of locked cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Fill row `y` with `kind`, leaving the listed columns empty
    pub fn fill_row_except(&mut self, y: i8, kind: PieceKind, holes: &[i8]) {
        for x in 0..self.width as i8 {
            let cell = if holes.contains(&x) { None } else { Some(kind) };
            self.set(x, y, cell);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}
