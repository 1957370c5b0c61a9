//! Shape catalog and color palette
//!
//! Every template is stored as (row, col) offsets from its top-left corner,
//! row increasing downward, col increasing rightward.

use ratatui::style::Color;

/// The placeable templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Dot,
    Line2H,
    Line2V,
    Line3H,
    Line3V,
    Line4H,
    Line4V,
    Square2,
    Square3,
    Z,
    S,
    T,
    L,
    J,
    SmallL,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 15] = [
        ShapeKind::Dot,
        ShapeKind::Line2H,
        ShapeKind::Line2V,
        ShapeKind::Line3H,
        ShapeKind::Line3V,
        ShapeKind::Line4H,
        ShapeKind::Line4V,
        ShapeKind::Square2,
        ShapeKind::Square3,
        ShapeKind::Z,
        ShapeKind::S,
        ShapeKind::T,
        ShapeKind::L,
        ShapeKind::J,
        ShapeKind::SmallL,
    ];

    /// Occupied cells of the template
    pub fn cells(&self) -> &'static [(u8, u8)] {
        match self {
            ShapeKind::Dot => &[(0, 0)],
            ShapeKind::Line2H => &[(0, 0), (0, 1)],
            ShapeKind::Line2V => &[(0, 0), (1, 0)],
            ShapeKind::Line3H => &[(0, 0), (0, 1), (0, 2)],
            ShapeKind::Line3V => &[(0, 0), (1, 0), (2, 0)],
            ShapeKind::Line4H => &[(0, 0), (0, 1), (0, 2), (0, 3)],
            ShapeKind::Line4V => &[(0, 0), (1, 0), (2, 0), (3, 0)],
            ShapeKind::Square2 => &[(0, 0), (0, 1), (1, 0), (1, 1)],
            ShapeKind::Square3 => &[
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 0),
                (1, 1),
                (1, 2),
                (2, 0),
                (2, 1),
                (2, 2),
            ],
            // ZZ.
            // .ZZ
            ShapeKind::Z => &[(0, 0), (0, 1), (1, 1), (1, 2)],
            // .SS
            // SS.
            ShapeKind::S => &[(0, 1), (0, 2), (1, 0), (1, 1)],
            // TTT
            // .T.
            ShapeKind::T => &[(0, 0), (0, 1), (0, 2), (1, 1)],
            // L.
            // L.
            // LL
            ShapeKind::L => &[(0, 0), (1, 0), (2, 0), (2, 1)],
            // .J
            // .J
            // JJ
            ShapeKind::J => &[(0, 1), (1, 1), (2, 0), (2, 1)],
            // X.
            // XX
            ShapeKind::SmallL => &[(0, 0), (1, 0), (1, 1)],
        }
    }

    pub fn matrix(&self) -> ShapeMatrix {
        // Templates are authored tight and non-empty
        ShapeMatrix::from_cells(self.cells().iter().map(|&(r, c)| (r as usize, c as usize)))
            .unwrap_or_else(ShapeMatrix::dot)
    }
}

/// Color tags a shape can be painted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorTag {
    Red,
    Orange,
    Amber,
    Yellow,
    Lime,
    Green,
    Teal,
    Cyan,
    Blue,
    Indigo,
    Purple,
    Pink,
}

impl ColorTag {
    pub const ALL: [ColorTag; 12] = [
        ColorTag::Red,
        ColorTag::Orange,
        ColorTag::Amber,
        ColorTag::Yellow,
        ColorTag::Lime,
        ColorTag::Green,
        ColorTag::Teal,
        ColorTag::Cyan,
        ColorTag::Blue,
        ColorTag::Indigo,
        ColorTag::Purple,
        ColorTag::Pink,
    ];

    /// Terminal color for this tag
    pub fn color(&self) -> Color {
        match self {
            ColorTag::Red => Color::Rgb(239, 68, 68),
            ColorTag::Orange => Color::Rgb(249, 115, 22),
            ColorTag::Amber => Color::Rgb(245, 158, 11),
            ColorTag::Yellow => Color::Rgb(234, 179, 8),
            ColorTag::Lime => Color::Rgb(132, 204, 22),
            ColorTag::Green => Color::Rgb(34, 197, 94),
            ColorTag::Teal => Color::Rgb(20, 184, 166),
            ColorTag::Cyan => Color::Rgb(6, 182, 212),
            ColorTag::Blue => Color::Rgb(59, 130, 246),
            ColorTag::Indigo => Color::Rgb(99, 102, 241),
            ColorTag::Purple => Color::Rgb(168, 85, 247),
            ColorTag::Pink => Color::Rgb(236, 72, 153),
        }
    }
}

/// Occupied cells of a shape inside its tight bounding box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<(usize, usize)>,
}

impl ShapeMatrix {
    /// Build a matrix from arbitrary cell positions.
    ///
    /// Positions are shifted so the bounding box starts at (0, 0), which keeps
    /// the matrix tight. Duplicates are dropped. Returns None when empty.
    pub fn from_cells(cells: impl IntoIterator<Item = (usize, usize)>) -> Option<Self> {
        let mut cells: Vec<(usize, usize)> = cells.into_iter().collect();
        let min_row = cells.iter().map(|&(r, _)| r).min()?;
        let min_col = cells.iter().map(|&(_, c)| c).min()?;
        for cell in &mut cells {
            cell.0 -= min_row;
            cell.1 -= min_col;
        }
        cells.sort_unstable();
        cells.dedup();

        let rows = cells.iter().map(|&(r, _)| r).max()? + 1;
        let cols = cells.iter().map(|&(_, c)| c).max()? + 1;
        Some(Self { rows, cols, cells })
    }

    /// Parse rows of `#` (occupied) and `.` (empty)
    #[cfg(test)]
    pub fn parse(pattern: &[&str]) -> Option<Self> {
        Self::from_cells(pattern.iter().enumerate().flat_map(|(r, line)| {
            line.chars()
                .enumerate()
                .filter(|&(_, ch)| ch == '#')
                .map(move |(c, _)| (r, c))
        }))
    }

    fn dot() -> Self {
        Self {
            rows: 1,
            cols: 1,
            cells: vec![(0, 0)],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Occupied (row, col) offsets
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cells.contains(&(row, col))
    }
}

/// Unique id handed out by the generator
pub type ShapeId = u64;

/// A placeable piece: a matrix painted one color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub id: ShapeId,
    pub matrix: ShapeMatrix,
    pub color: ColorTag,
    /// Template this shape was drawn from, None for hand-built shapes
    pub kind: Option<ShapeKind>,
}

impl Shape {
    pub fn from_kind(id: ShapeId, kind: ShapeKind, color: ColorTag) -> Self {
        Self {
            kind: Some(kind),
            ..Self::custom(id, kind.matrix(), color)
        }
    }

    /// A shape outside the catalog, such as a full-width line
    pub fn custom(id: ShapeId, matrix: ShapeMatrix, color: ColorTag) -> Self {
        Self {
            id,
            matrix,
            color,
            kind: None,
        }
    }
}
