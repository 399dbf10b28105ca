//! Partition plans.
//!
//! A plan lists one tile shape per depth level. The root covers the whole
//! grid and is split by `plan[0]`; a region at depth `d` is split by
//! `plan[d]`. Validation runs once, before any search, and guarantees every
//! split tiles its parent exactly and that the deepest level is a single
//! cell.
//!
//! # Syntax
//!
//! ```text
//! 50x20,5x1,1x1      shapes as HEIGHTxWIDTH, comma separated
//! 50 20 5 1 1 1      flat integer pairs (see PartitionPlan::from_pairs)
//! ```

mod enumerate;

pub use enumerate::enumerate_plans;

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

use crate::grid::Extent;

/// Plan used by the historical experiments on a 3500x3500 grid.
pub const DEFAULT_PLAN: &str = "50x20,5x1,1x1";

/// Errors raised while parsing or validating a plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The plan has no levels.
    #[error("partition plan is empty")]
    Empty,

    /// A level has a zero height or width.
    #[error("level {depth}: tile {tile} has a zero extent")]
    ZeroExtent { depth: usize, tile: Extent },

    /// A level does not evenly divide the extent it splits.
    #[error("level {depth}: tile {tile} does not evenly divide {container}")]
    NotDividing {
        depth: usize,
        tile: Extent,
        container: Extent,
    },

    /// The deepest level is not a single cell.
    #[error("level {depth}: last tile must be 1x1, got {tile}")]
    MissingTerminal { depth: usize, tile: Extent },

    /// The plan text could not be parsed.
    #[error("cannot parse plan '{input}': {reason}")]
    Parse { input: String, reason: String },
}

/// Ordered tile shapes, one per depth level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionPlan {
    levels: Vec<Extent>,
}

impl PartitionPlan {
    /// Creates a plan from its levels without validating it.
    pub fn new(levels: Vec<Extent>) -> Self {
        Self { levels }
    }

    /// Creates a plan from `(height, width)` pairs.
    pub fn from_shapes(shapes: &[(u32, u32)]) -> Self {
        Self::new(shapes.iter().map(|&(h, w)| Extent::new(h, w)).collect())
    }

    /// Creates a plan from a flat list read pairwise as `height width`.
    pub fn from_pairs(values: &[u32]) -> Result<Self, PlanError> {
        if values.len() % 2 != 0 {
            return Err(PlanError::Parse {
                input: join(values),
                reason: format!("expected height/width pairs, got {} values", values.len()),
            });
        }
        Ok(Self::new(
            values
                .chunks_exact(2)
                .map(|pair| Extent::new(pair[0], pair[1]))
                .collect(),
        ))
    }

    /// Tile shape used to split a region at `depth`.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is past the last level. Validated plans end in a
    /// single cell, which never splits, so the engine never asks for it.
    #[inline]
    pub fn level(&self, depth: usize) -> Extent {
        self.levels[depth]
    }

    pub fn levels(&self) -> &[Extent] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Checks that the plan tiles a grid of `grid` extent without remainders
    /// and bottoms out at single cells.
    pub fn validate(&self, grid: Extent) -> Result<(), PlanError> {
        let last = self.levels.len().checked_sub(1).ok_or(PlanError::Empty)?;

        let mut container = grid;
        for (depth, &tile) in self.levels.iter().enumerate() {
            if tile.height == 0 || tile.width == 0 {
                return Err(PlanError::ZeroExtent { depth, tile });
            }
            if container.height % tile.height != 0 || container.width % tile.width != 0 {
                return Err(PlanError::NotDividing {
                    depth,
                    tile,
                    container,
                });
            }
            container = tile;
        }

        let terminal = self.levels[last];
        if terminal != Extent::new(1, 1) {
            return Err(PlanError::MissingTerminal {
                depth: last,
                tile: terminal,
            });
        }

        debug!(plan = %self, grid = %grid, "Partition plan validated");
        Ok(())
    }
}

impl Default for PartitionPlan {
    fn default() -> Self {
        Self::from_shapes(&[(50, 20), (5, 1), (1, 1)])
    }
}

impl fmt::Display for PartitionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, level) in self.levels.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", level)?;
        }
        Ok(())
    }
}

impl FromStr for PartitionPlan {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = |reason: String| PlanError::Parse {
            input: s.to_string(),
            reason,
        };

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PlanError::Empty);
        }

        // Flat "h w h w ..." form
        if !trimmed.contains(is_plan_separator) {
            let values = trimmed
                .split_whitespace()
                .map(|v| v.parse::<u32>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| parse_err(e.to_string()))?;
            return Self::from_pairs(&values).map_err(|e| match e {
                PlanError::Parse { reason, .. } => parse_err(reason),
                other => other,
            });
        }

        let mut levels = Vec::new();
        for token in trimmed.split(',') {
            let token = token.trim();
            let (h, w) = token
                .split_once(|c: char| matches!(c, 'x' | 'X' | '*'))
                .ok_or_else(|| parse_err(format!("'{}' is not HEIGHTxWIDTH", token)))?;
            let height = h
                .trim()
                .parse::<u32>()
                .map_err(|e| parse_err(format!("height '{}': {}", h.trim(), e)))?;
            let width = w
                .trim()
                .parse::<u32>()
                .map_err(|e| parse_err(format!("width '{}': {}", w.trim(), e)))?;
            levels.push(Extent::new(height, width));
        }
        Ok(Self::new(levels))
    }
}

impl Serialize for PartitionPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn is_plan_separator(c: char) -> bool {
    matches!(c, 'x' | 'X' | '*' | ',')
}

fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
