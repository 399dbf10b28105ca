//! Summed-area table oracle.
//!
//! Builds a `(height + 1) x (width + 1)` table of prefix sums once, after
//! which any rectangle count is four lookups. Answers are identical to
//! scanning the cells; only the query cost changes.

use super::{Extent, Grid, Rect, TreasureOracle};

/// O(1) rectangle-sum oracle over a [`Grid`].
#[derive(Clone)]
pub struct SummedAreaTable {
    extent: Extent,
    /// `prefix[(x + 1) * stride + (y + 1)]` = sum of cells in `[0,0]..=[x,y]`.
    prefix: Vec<u64>,
}

impl SummedAreaTable {
    /// Builds the table from a grid.
    pub fn new(grid: &Grid) -> Self {
        let extent = grid.extent();
        let stride = extent.width as usize + 1;
        let mut prefix = vec![0u64; (extent.height as usize + 1) * stride];

        for x in 0..extent.height {
            let mut row_sum = 0u64;
            let above = x as usize * stride;
            let here = above + stride;
            for (y, &cell) in grid.row(x).iter().enumerate() {
                row_sum += cell as u64;
                prefix[here + y + 1] = prefix[above + y + 1] + row_sum;
            }
        }

        Self { extent, prefix }
    }

    #[inline]
    fn at(&self, x: u32, y: u32) -> u64 {
        self.prefix[x as usize * (self.extent.width as usize + 1) + y as usize]
    }
}

impl From<&Grid> for SummedAreaTable {
    fn from(grid: &Grid) -> Self {
        Self::new(grid)
    }
}

impl TreasureOracle for SummedAreaTable {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn count(&self, rect: Rect) -> u64 {
        assert!(
            rect.x1 <= rect.x2
                && rect.y1 <= rect.y2
                && rect.x2 < self.extent.height
                && rect.y2 < self.extent.width,
            "rectangle {} outside {} grid",
            rect,
            self.extent
        );
        let (x1, y1, x2, y2) = (rect.x1, rect.y1, rect.x2 + 1, rect.y2 + 1);
        self.at(x2, y2) + self.at(x1, y1) - self.at(x1, y2) - self.at(x2, y1)
    }
}

impl std::fmt::Debug for SummedAreaTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummedAreaTable")
            .field("extent", &self.extent)
            .field("total", &self.total())
            .finish()
    }
}
