//! Budgeted best-first search for treasure.
//!
//! The grid is split hierarchically by a [`PartitionPlan`](crate::plan::PartitionPlan).
//! Regions wait in a single [`RegionQueue`] keyed by expected density; each
//! probe refines the estimates of the probed region's siblings.
//!
//! # Example
//!
//! ```ignore
//! use goldscout::cost::BracketCost;
//! use goldscout::grid::{Grid, SummedAreaTable};
//! use goldscout::plan::PartitionPlan;
//! use goldscout::search::SearchContext;
//!
//! let grid = Grid::with_treasures(100, 100, &[(3, 7, 2)])?;
//! let oracle = SummedAreaTable::new(&grid);
//! let plan: PartitionPlan = "10x10,1x1".parse()?;
//! let report = SearchContext::new(&oracle, &BracketCost::default(), &plan, 50_000)?.run();
//! println!("{}", report);
//! ```

mod engine;
mod queue;
mod region;
mod report;

use thiserror::Error;

use crate::plan::PlanError;

pub use engine::{is_certain, run, Probe, SearchContext};
pub use queue::{QueueEntry, RegionQueue};
pub use region::{Region, RegionArena, RegionId};
pub use report::{SearchReport, Termination};

/// Densities closer than this are considered equal.
pub const DENSITY_EPSILON: f64 = 1e-6;

/// Errors raised when a search cannot start.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid partition plan: {0}")]
    InvalidPlan(#[from] PlanError),
}
