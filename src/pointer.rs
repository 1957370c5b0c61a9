//! Maps a continuous drag position onto a board origin
//!
//! The dragged shape is drawn centered on a point lifted above the pointer so
//! it is not hidden under the cursor. The shape's top-left corner is snapped
//! to the nearest cell. Preview and drop both go through `resolve`, so the
//! ghost shown is always where the shape lands.

use crate::board::Board;
use crate::shape::ShapeMatrix;

/// A position in board space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A (row, col) on the board; may be off the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub row: i32,
    pub col: i32,
}

/// Board geometry needed to turn a pointer into a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMapper {
    /// Top-left corner of cell (0, 0)
    pub origin: Point,
    pub cell_width: f32,
    pub cell_height: f32,
    /// How far above the pointer the shape floats
    pub lift: f32,
}

impl Default for PointerMapper {
    fn default() -> Self {
        Self {
            origin: Point::default(),
            cell_width: 1.0,
            cell_height: 1.0,
            lift: 0.0,
        }
    }
}

impl PointerMapper {
    pub fn new(origin: Point, cell_width: f32, cell_height: f32, lift: f32) -> Self {
        Self {
            origin,
            cell_width,
            cell_height,
            lift,
        }
    }

    /// Where the shape's top-left corner would snap for this pointer
    pub fn candidate_origin(&self, pointer: Point, matrix: &ShapeMatrix) -> GridPos {
        let anchor_x = pointer.x;
        let anchor_y = pointer.y - self.lift;

        let left = anchor_x - matrix.cols() as f32 * self.cell_width / 2.0;
        let top = anchor_y - matrix.rows() as f32 * self.cell_height / 2.0;

        GridPos {
            row: round_half_up((top - self.origin.y) / self.cell_height),
            col: round_half_up((left - self.origin.x) / self.cell_width),
        }
    }

    /// The candidate origin, if the shape can actually go there
    pub fn resolve(&self, board: &Board, matrix: &ShapeMatrix, pointer: Point) -> Option<GridPos> {
        let pos = self.candidate_origin(pointer, matrix);
        board.can_place(matrix, pos.row, pos.col).then_some(pos)
    }
}

/// Nearest integer, halves toward positive infinity
fn round_half_up(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::shape::{ColorTag, ShapeKind};

    fn unit_mapper(lift: f32) -> PointerMapper {
        PointerMapper::new(Point::new(0.0, 0.0), 10.0, 10.0, lift)
    }

    #[test]
    fn test_pointer_at_shape_center_snaps_to_cell() {
        let mapper = unit_mapper(0.0);
        let square = ShapeKind::Square2.matrix();
        // Center of a 2x2 whose top-left is cell (3, 4)
        let pos = mapper.candidate_origin(Point::new(50.0, 40.0), &square);
        assert_eq!(pos, GridPos { row: 3, col: 4 });
    }

    #[test]
    fn test_lift_moves_origin_up() {
        let mapper = unit_mapper(20.0);
        let dot = ShapeKind::Dot.matrix();
        let pos = mapper.candidate_origin(Point::new(35.0, 75.0), &dot);
        assert_eq!(pos, GridPos { row: 5, col: 3 });
    }

    #[test]
    fn test_rounds_to_nearest() {
        let mapper = unit_mapper(0.0);
        let dot = ShapeKind::Dot.matrix();
        assert_eq!(mapper.candidate_origin(Point::new(9.0, 9.0), &dot), GridPos { row: 0, col: 0 });
        assert_eq!(mapper.candidate_origin(Point::new(11.0, 11.0), &dot), GridPos { row: 1, col: 1 });
        // Exactly halfway rounds up
        assert_eq!(mapper.candidate_origin(Point::new(10.0, 10.0), &dot), GridPos { row: 1, col: 1 });
        assert_eq!(mapper.candidate_origin(Point::new(0.0, 0.0), &dot), GridPos { row: 0, col: 0 });
    }

    #[test]
    fn test_board_origin_and_non_square_cells() {
        let mapper = PointerMapper::new(Point::new(4.0, 2.0), 2.0, 1.0, 1.0);
        let line = ShapeKind::Line3H.matrix();
        // anchor (13, 6) -> top-left (10, 5.5) -> grid (3.5, 3) -> (4, 3)
        let pos = mapper.candidate_origin(Point::new(13.0, 7.0), &line);
        assert_eq!(pos, GridPos { row: 4, col: 3 });
    }

    #[test]
    fn test_resolve_rejects_invalid_origin() {
        let mapper = unit_mapper(0.0);
        let mut board = Board::new();
        let dot = ShapeKind::Dot.matrix();

        assert_eq!(mapper.resolve(&board, &dot, Point::new(-20.0, 5.0)), None);
        assert_eq!(mapper.resolve(&board, &dot, Point::new(5.0, 95.0)), None);

        board.set(2, 2, Cell::Filled(ColorTag::Red));
        assert_eq!(mapper.resolve(&board, &dot, Point::new(25.0, 25.0)), None);
        assert_eq!(
            mapper.resolve(&board, &dot, Point::new(35.0, 25.0)),
            Some(GridPos { row: 2, col: 3 })
        );
    }

    #[test]
    fn test_far_away_pointer_is_rejected() {
        let mapper = unit_mapper(0.0);
        let board = Board::new();
        let s = ShapeKind::S.matrix();
        for p in [
            Point::new(f32::MAX, 3.0),
            Point::new(3.0, f32::MAX),
            Point::new(f32::MIN, f32::MIN),
            Point::new(f32::INFINITY, 3.0),
            Point::new(f32::NAN, f32::NAN),
        ] {
            let pos = mapper.resolve(&board, &s, p);
            assert!(pos.is_none_or(|pos| board.can_place(&s, pos.row, pos.col)), "{:?}", p);
        }
        assert_eq!(mapper.resolve(&board, &s, Point::new(f32::MAX, 3.0)), None);
    }

    #[test]
    fn test_same_input_same_origin() {
        let mapper = PointerMapper::new(Point::new(3.0, 7.0), 2.0, 1.0, 1.0);
        let board = Board::new();
        for kind in ShapeKind::ALL {
            let matrix = kind.matrix();
            for x in 0..40 {
                for y in 0..20 {
                    let p = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                    let first = mapper.resolve(&board, &matrix, p);
                    let second = mapper.resolve(&board, &matrix, p);
                    assert_eq!(first, second);
                    if let Some(pos) = first {
                        assert_eq!(pos, mapper.candidate_origin(p, &matrix));
                    }
                }
            }
        }
    }
}
