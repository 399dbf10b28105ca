//! Goldscout - budgeted best-first treasure search over large sparse grids
//!
//! The grid is carved hierarchically by a [`plan::PartitionPlan`]. Every
//! candidate region waits in one shared priority queue ordered by its
//! expected treasure density, and each probe refines the estimates of the
//! probed region's siblings. Probes cost budget according to a
//! [`cost::CostModel`]; the search stops when the budget or the queue runs
//! out.
//!
//! # Modules
//!
//! - [`grid`] - grids, rectangles, the count oracle and random generation
//! - [`cost`] - probe pricing
//! - [`plan`] - partition plans, validation and enumeration
//! - [`search`] - the engine, its region arena and queue
//! - [`tuning`] - parallel plan sweeps
//! - [`config`] - INI configuration
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod cost;
pub mod grid;
pub mod logging;
pub mod plan;
pub mod search;
pub mod tuning;

pub use cost::{BracketCost, CostModel};
pub use grid::{Grid, Rect, SummedAreaTable, TreasureOracle};
pub use plan::{PartitionPlan, PlanError};
pub use search::{run, SearchContext, SearchError, SearchReport, Termination};

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
