//! Game board representation, placement and line clearing

use crate::shape::{ColorTag, Shape, ShapeMatrix};

/// The board is square
pub const BOARD_SIZE: usize = 8;

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(ColorTag),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// Rows and columns that were full after a placement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineClear {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
}

impl LineClear {
    /// Full rows plus full columns. A cell where a full row crosses a full
    /// column counts toward both.
    pub fn count(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.rows.contains(&row) || self.cols.contains(&col)
    }
}

/// The game board.
///
/// Boards are plain values: `place` and `clear` hand back a new board and
/// leave the receiver untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Get the cell at a position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        let (row, col) = Self::index(row, col)?;
        Some(self.cells[row][col])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        let Some((row, col)) = Self::index(row, col) else {
            return false;
        };
        self.cells[row][col] = cell;
        true
    }

    /// Board position of a matrix cell, None when it would overflow
    fn offset(row: i32, col: i32, dr: usize, dc: usize) -> Option<(i32, i32)> {
        let r = row.checked_add(i32::try_from(dr).ok()?)?;
        let c = col.checked_add(i32::try_from(dc).ok()?)?;
        Some((r, c))
    }

    fn index(row: i32, col: i32) -> Option<(usize, usize)> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < BOARD_SIZE && col < BOARD_SIZE).then_some((row, col))
    }

    /// Check whether a shape fits with its top-left corner at (row, col):
    /// every occupied cell must be on the board and empty
    pub fn can_place(&self, matrix: &ShapeMatrix, row: i32, col: i32) -> bool {
        matrix.cells().iter().all(|&(dr, dc)| {
            matches!(
                Self::offset(row, col, dr, dc).and_then(|(r, c)| self.get(r, c)),
                Some(Cell::Empty)
            )
        })
    }

    /// Paint a shape onto a copy of the board.
    ///
    /// Returns the new board and the number of cells placed. The caller must
    /// have checked `can_place` first.
    pub fn place(&self, shape: &Shape, row: i32, col: i32) -> (Board, usize) {
        debug_assert!(self.can_place(&shape.matrix, row, col));
        let mut next = *self;
        for &(dr, dc) in shape.matrix.cells() {
            if let Some((r, c)) = Self::offset(row, col, dr, dc) {
                next.set(r, c, Cell::Filled(shape.color));
            }
        }
        (next, shape.matrix.cell_count())
    }

    /// Check if any origin on the board accepts the shape
    pub fn fits_anywhere(&self, matrix: &ShapeMatrix) -> bool {
        (0..BOARD_SIZE as i32)
            .any(|row| (0..BOARD_SIZE as i32).any(|col| self.can_place(matrix, row, col)))
    }

    /// Find every completely filled row and column
    pub fn full_lines(&self) -> LineClear {
        LineClear {
            rows: (0..BOARD_SIZE).filter(|&r| self.is_row_full(r)).collect(),
            cols: (0..BOARD_SIZE).filter(|&c| self.is_col_full(c)).collect(),
        }
    }

    /// Empty every listed row and column in one pass
    pub fn clear(&self, lines: &LineClear) -> Board {
        let mut next = *self;
        for (r, row) in next.cells.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                if lines.contains(r, c) {
                    *cell = Cell::Empty;
                }
            }
        }
        next
    }

    fn is_row_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    fn is_col_full(&self, col: usize) -> bool {
        self.cells.iter().all(|row| row[col].is_filled())
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    pub fn filled_count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|cell| cell.is_filled()).count())
            .sum()
    }

    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_SIZE]> {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;

    fn shape(kind: ShapeKind) -> Shape {
        Shape::from_kind(1, kind, ColorTag::Blue)
    }

    fn fill_row(board: &mut Board, row: i32) {
        for col in 0..BOARD_SIZE as i32 {
            board.set(row, col, Cell::Filled(ColorTag::Red));
        }
    }

    fn fill_col(board: &mut Board, col: i32) {
        for row in 0..BOARD_SIZE as i32 {
            board.set(row, col, Cell::Filled(ColorTag::Red));
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
        assert_eq!(board.filled_count(), 0);
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::new();
        assert!(board.set(5, 5, Cell::Filled(ColorTag::Red)));
        assert_eq!(board.get(5, 5), Some(Cell::Filled(ColorTag::Red)));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = Board::new();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(BOARD_SIZE as i32, 0), None);
        assert_eq!(board.get(0, BOARD_SIZE as i32), None);
        assert!(!board.set(8, 8, Cell::Filled(ColorTag::Red)));
    }

    #[test]
    fn test_can_place_bounds() {
        let board = Board::new();
        let line = shape(ShapeKind::Line4H).matrix;
        assert!(board.can_place(&line, 0, 0));
        assert!(board.can_place(&line, 7, 4));
        assert!(!board.can_place(&line, 7, 5));
        assert!(!board.can_place(&line, -1, 0));
        assert!(!board.can_place(&line, 0, -1));
        assert!(!board.can_place(&line, 8, 0));
    }

    #[test]
    fn test_can_place_extreme_origins() {
        let board = Board::new();
        let s = shape(ShapeKind::S).matrix;
        for (row, col) in [
            (0, i32::MAX),
            (i32::MAX, 0),
            (i32::MAX, i32::MAX),
            (0, i32::MIN),
            (i32::MIN, 0),
            (i32::MIN, i32::MAX),
        ] {
            assert!(!board.can_place(&s, row, col), "({}, {})", row, col);
        }
    }

    #[test]
    fn test_can_place_ignores_empty_template_cells() {
        let mut board = Board::new();
        // S shape leaves (0,0) open, so a block there must not collide
        board.set(0, 0, Cell::Filled(ColorTag::Red));
        let s = shape(ShapeKind::S).matrix;
        assert!(board.can_place(&s, 0, 0));
        board.set(0, 1, Cell::Filled(ColorTag::Red));
        assert!(!board.can_place(&s, 0, 0));
    }

    #[test]
    fn test_can_place_matches_brute_force() {
        let mut board = Board::new();
        for (r, c) in [(0, 3), (2, 2), (4, 7), (5, 0), (6, 6), (7, 1)] {
            board.set(r, c, Cell::Filled(ColorTag::Teal));
        }
        for kind in ShapeKind::ALL {
            let matrix = kind.matrix();
            for row in -4..12 {
                for col in -4..12 {
                    let expected = matrix.cells().iter().all(|&(dr, dc)| {
                        let r = row + dr as i32;
                        let c = col + dc as i32;
                        (0..8).contains(&r) && (0..8).contains(&c) && board.get(r, c) == Some(Cell::Empty)
                    });
                    assert_eq!(board.can_place(&matrix, row, col), expected, "{:?} at {},{}", kind, row, col);
                }
            }
        }
    }

    #[test]
    fn test_place_only_touches_shape_cells() {
        let mut board = Board::new();
        board.set(7, 7, Cell::Filled(ColorTag::Pink));
        let t = shape(ShapeKind::T);
        let (placed, count) = board.place(&t, 2, 3);

        assert_eq!(count, 4);
        assert_eq!(placed.filled_count(), 5);
        for (r, c) in [(2, 3), (2, 4), (2, 5), (3, 4)] {
            assert_eq!(placed.get(r, c), Some(Cell::Filled(ColorTag::Blue)));
        }
        assert_eq!(placed.get(3, 3), Some(Cell::Empty));
        assert_eq!(placed.get(7, 7), Some(Cell::Filled(ColorTag::Pink)));
        // The source board is a value and stays as it was
        assert_eq!(board.filled_count(), 1);
    }

    #[test]
    fn test_full_lines_detects_rows_and_cols() {
        let mut board = Board::new();
        fill_row(&mut board, 2);
        fill_col(&mut board, 5);
        let lines = board.full_lines();
        assert_eq!(lines.rows, vec![2]);
        assert_eq!(lines.cols, vec![5]);
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_almost_full_line_is_not_cleared() {
        let mut board = Board::new();
        fill_row(&mut board, 0);
        board.set(0, 7, Cell::Empty);
        assert!(board.full_lines().is_empty());
    }

    #[test]
    fn test_clear_row_and_column_once() {
        let mut board = Board::new();
        fill_row(&mut board, 4);
        fill_col(&mut board, 1);
        board.set(0, 0, Cell::Filled(ColorTag::Green));
        board.set(6, 6, Cell::Filled(ColorTag::Green));

        let lines = board.full_lines();
        let cleared = board.clear(&lines);

        assert_eq!(cleared.filled_count(), 2);
        assert_eq!(cleared.get(0, 0), Some(Cell::Filled(ColorTag::Green)));
        assert_eq!(cleared.get(6, 6), Some(Cell::Filled(ColorTag::Green)));
        assert_eq!(cleared.get(4, 1), Some(Cell::Empty));
        // Nothing shifts after a clear
        assert!(cleared.full_lines().is_empty());
    }

    #[test]
    fn test_fits_anywhere() {
        let mut board = Board::new();
        for r in 0..8 {
            for c in 0..8 {
                if (r, c) != (3, 3) {
                    board.set(r, c, Cell::Filled(ColorTag::Red));
                }
            }
        }
        assert!(board.fits_anywhere(&ShapeKind::Dot.matrix()));
        assert!(!board.fits_anywhere(&ShapeKind::Line2H.matrix()));
    }
}
