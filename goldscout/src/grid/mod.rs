//! Treasure grid and rectangle-count oracle.
//!
//! The search engine only ever asks one question of the world: how many
//! treasures lie inside a rectangle. [`TreasureOracle`] is that contract;
//! [`SummedAreaTable`] is the default implementation over an in-memory
//! [`Grid`].

mod generator;
mod summed;
mod types;

pub use generator::{
    GeneratedGrid, GridGenerator, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_TREASURES,
};
pub use summed::SummedAreaTable;
pub use types::{Extent, Grid, GridError, Rect};

/// Answers rectangle-count queries over a fixed grid.
///
/// Implementations are total: every in-bounds query has an answer. A query
/// outside [`TreasureOracle::extent`] is a programming error and panics.
pub trait TreasureOracle {
    /// Extent of the underlying grid.
    fn extent(&self) -> Extent;

    /// Number of treasures inside `rect` (inclusive bounds).
    fn count(&self, rect: Rect) -> u64;

    /// Rectangle covering the whole grid.
    fn bounds(&self) -> Rect {
        Rect::from_origin(0, 0, self.extent())
    }

    /// Number of treasures on the whole grid.
    fn total(&self) -> u64 {
        self.count(self.bounds())
    }
}

impl<O: TreasureOracle + ?Sized> TreasureOracle for &O {
    fn extent(&self) -> Extent {
        (**self).extent()
    }

    fn count(&self, rect: Rect) -> u64 {
        (**self).count(rect)
    }
}
