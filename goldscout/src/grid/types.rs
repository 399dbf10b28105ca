//! Core grid types: extents, inclusive rectangles and the dense count map.

use std::fmt;

use thiserror::Error;

/// Errors raised while building a grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A grid must have at least one row and one column.
    #[error("grid must be non-empty (got {height}x{width})")]
    Empty { height: u32, width: u32 },

    /// A literal row has a different length than the first row.
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Cell buffer length does not match `height * width`.
    #[error("cell buffer holds {actual} values, expected {expected}")]
    CellCountMismatch { expected: usize, actual: usize },

    /// A cell coordinate lies outside the grid.
    #[error("cell ({x}, {y}) is outside a {height}x{width} grid")]
    CellOutOfRange {
        x: u32,
        y: u32,
        height: u32,
        width: u32,
    },
}

// =============================================================================
// Extent
// =============================================================================

/// Height and width of a grid or tile, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    /// Number of rows (the `x` axis).
    pub height: u32,
    /// Number of columns (the `y` axis).
    pub width: u32,
}

impl Extent {
    pub const fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// Number of cells covered.
    #[inline]
    pub fn area(&self) -> u64 {
        self.height as u64 * self.width as u64
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}

// =============================================================================
// Rect
// =============================================================================

/// An inclusive, axis-aligned rectangle `[x1, y1]..=[x2, y2]`.
///
/// `x` indexes rows and `y` indexes columns, matching [`Grid::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Rect {
    /// Creates a rectangle from inclusive corners.
    ///
    /// # Panics
    ///
    /// Panics if `x1 > x2` or `y1 > y2`.
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        assert!(
            x1 <= x2 && y1 <= y2,
            "inverted rectangle [{}, {}]..[{}, {}]",
            x1,
            y1,
            x2,
            y2
        );
        Self { x1, y1, x2, y2 }
    }

    /// A single-cell rectangle.
    pub fn cell(x: u32, y: u32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x,
            y2: y,
        }
    }

    /// A rectangle with its top-left corner at `(x, y)` and the given extent.
    pub fn from_origin(x: u32, y: u32, extent: Extent) -> Self {
        Self::new(x, y, x + extent.height - 1, y + extent.width - 1)
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.x2 - self.x1 + 1
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.y2 - self.y1 + 1
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        Extent::new(self.height(), self.width())
    }

    /// Number of cells inside the rectangle.
    #[inline]
    pub fn area(&self) -> u64 {
        self.extent().area()
    }

    /// True for a 1x1 rectangle.
    #[inline]
    pub fn is_cell(&self) -> bool {
        self.x1 == self.x2 && self.y1 == self.y2
    }

    /// True if `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        self.x1 <= other.x1 && self.y1 <= other.y1 && other.x2 <= self.x2 && other.y2 <= self.y2
    }

    /// True if the cell `(x, y)` lies inside the rectangle.
    pub fn contains_cell(&self, x: u32, y: u32) -> bool {
        (self.x1..=self.x2).contains(&x) && (self.y1..=self.y2).contains(&y)
    }

    /// Splits the rectangle into tiles of `tile` extent, in row-major order.
    ///
    /// The tile extent is expected to divide the rectangle evenly; plans are
    /// validated up front so the engine never produces a ragged remainder.
    pub fn tiles(&self, tile: Extent) -> impl Iterator<Item = Rect> + '_ {
        debug_assert!(
            self.height() % tile.height == 0 && self.width() % tile.width == 0,
            "tile {} does not divide {}",
            tile,
            self.extent()
        );
        let rows = (self.x1..=self.x2).step_by(tile.height as usize);
        rows.flat_map(move |x| {
            (self.y1..=self.y2)
                .step_by(tile.width as usize)
                .map(move |y| Rect::from_origin(x, y, tile))
        })
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]..[{},{}]", self.x1, self.y1, self.x2, self.y2)
    }
}

// =============================================================================
// Grid
// =============================================================================

/// Dense row-major map of treasure counts.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    extent: Extent,
    cells: Vec<u32>,
}

impl Grid {
    /// Creates a grid with every cell empty.
    pub fn empty(height: u32, width: u32) -> Result<Self, GridError> {
        let extent = Self::checked_extent(height, width)?;
        Ok(Self {
            extent,
            cells: vec![0; extent.area() as usize],
        })
    }

    /// Creates a grid from a row-major cell buffer.
    pub fn from_cells(height: u32, width: u32, cells: Vec<u32>) -> Result<Self, GridError> {
        let extent = Self::checked_extent(height, width)?;
        let expected = extent.area() as usize;
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { extent, cells })
    }

    /// Creates a grid from literal rows; row `x` holds the cells `(x, 0..width)`.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, GridError> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(GridError::RaggedRow {
                    row,
                    expected: width,
                    actual: cells.len(),
                });
            }
        }
        let height = rows.len() as u32;
        Self::from_cells(height, width as u32, rows.into_iter().flatten().collect())
    }

    /// Creates an empty grid and places the listed `(x, y, count)` treasures.
    pub fn with_treasures(
        height: u32,
        width: u32,
        treasures: &[(u32, u32, u32)],
    ) -> Result<Self, GridError> {
        let mut grid = Self::empty(height, width)?;
        for &(x, y, count) in treasures {
            grid.add(x, y, count)?;
        }
        Ok(grid)
    }

    fn checked_extent(height: u32, width: u32) -> Result<Extent, GridError> {
        if height == 0 || width == 0 {
            return Err(GridError::Empty { height, width });
        }
        Ok(Extent::new(height, width))
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        x as usize * self.extent.width as usize + y as usize
    }

    /// Adds `count` treasures to cell `(x, y)`.
    pub fn add(&mut self, x: u32, y: u32, count: u32) -> Result<(), GridError> {
        if !self.bounds().contains_cell(x, y) {
            return Err(GridError::CellOutOfRange {
                x,
                y,
                height: self.extent.height,
                width: self.extent.width,
            });
        }
        let idx = self.index(x, y);
        self.cells[idx] += count;
        Ok(())
    }

    /// Treasure count at cell `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is outside the grid.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        assert!(
            self.bounds().contains_cell(x, y),
            "cell ({}, {}) outside {} grid",
            x,
            y,
            self.extent
        );
        self.cells[self.index(x, y)]
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.extent.height
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.extent.width
    }

    /// Rectangle covering the whole grid.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin(0, 0, self.extent)
    }

    /// Total number of treasures on the grid.
    pub fn total(&self) -> u64 {
        self.cells.iter().map(|&c| c as u64).sum()
    }

    /// Number of cells holding at least one treasure.
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c > 0).count()
    }

    /// Row `x` as a slice.
    pub(crate) fn row(&self, x: u32) -> &[u32] {
        let start = self.index(x, 0);
        &self.cells[start..start + self.extent.width as usize]
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("extent", &self.extent)
            .field("total", &self.total())
            .field("occupied_cells", &self.occupied_cells())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // Rect
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_rect_dimensions() {
        let rect = Rect::new(2, 3, 5, 4);
        assert_eq!(rect.height(), 4);
        assert_eq!(rect.width(), 2);
        assert_eq!(rect.area(), 8);
        assert!(!rect.is_cell());
        assert!(Rect::cell(7, 7).is_cell());
    }

    #[test]
    #[should_panic(expected = "inverted rectangle")]
    fn test_rect_rejects_inverted_corners() {
        let _ = Rect::new(3, 0, 2, 0);
    }

    #[test]
    fn test_rect_tiles_row_major() {
        let rect = Rect::new(0, 0, 3, 3);
        let tiles: Vec<_> = rect.tiles(Extent::new(2, 2)).collect();
        assert_eq!(
            tiles,
            vec![
                Rect::new(0, 0, 1, 1),
                Rect::new(0, 2, 1, 3),
                Rect::new(2, 0, 3, 1),
                Rect::new(2, 2, 3, 3),
            ]
        );
    }

    #[test]
    fn test_rect_tiles_cover_offset_rect_exactly() {
        let rect = Rect::new(10, 20, 19, 39);
        let tiles: Vec<_> = rect.tiles(Extent::new(5, 4)).collect();

        assert_eq!(tiles.len(), 10);
        assert!(tiles.iter().all(|t| rect.contains(t)));
        let covered: u64 = tiles.iter().map(Rect::area).sum();
        assert_eq!(covered, rect.area());
    }

    #[test]
    fn test_rect_display() {
        assert_eq!(Rect::new(1, 2, 3, 4).to_string(), "[1,2]..[3,4]");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Grid
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_grid_from_rows() {
        let grid = Grid::from_rows(vec![vec![0, 1, 2], vec![3, 0, 0]]).unwrap();
        assert_eq!(grid.extent(), Extent::new(2, 3));
        assert_eq!(grid.get(0, 2), 2);
        assert_eq!(grid.get(1, 0), 3);
        assert_eq!(grid.total(), 6);
        assert_eq!(grid.occupied_cells(), 3);
        assert_eq!(grid.row(1), &[3, 0, 0]);
    }

    #[test]
    fn test_grid_rejects_ragged_rows() {
        let err = Grid::from_rows(vec![vec![0, 1], vec![1]]).unwrap_err();
        assert_eq!(
            err,
            GridError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_grid_rejects_empty() {
        assert!(matches!(
            Grid::from_rows(Vec::new()),
            Err(GridError::Empty { .. })
        ));
        assert!(matches!(Grid::empty(0, 5), Err(GridError::Empty { .. })));
    }

    #[test]
    fn test_grid_rejects_wrong_buffer_length() {
        let err = Grid::from_cells(2, 2, vec![1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            GridError::CellCountMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_grid_with_treasures_accumulates() {
        let grid = Grid::with_treasures(4, 4, &[(3, 3, 2), (3, 3, 1), (0, 1, 5)]).unwrap();
        assert_eq!(grid.get(3, 3), 3);
        assert_eq!(grid.get(0, 1), 5);
        assert_eq!(grid.total(), 8);
    }

    #[test]
    fn test_grid_add_out_of_range() {
        let mut grid = Grid::empty(2, 2).unwrap();
        let err = grid.add(2, 0, 1).unwrap_err();
        assert!(err.to_string().contains("outside a 2x2 grid"));
    }
}
