//! Probe cost models.
//!
//! A probe of a rectangle is one indivisible operation whose price depends
//! only on the number of cells it covers. The engine treats the model as an
//! opaque lookup; [`BracketCost`] reproduces the stepped price list used by
//! the experiments, and any `Fn(u64) -> u64` works for tests.

use serde::Serialize;

/// Price paid for a probe of `base` cells below the first bracket.
pub const DEFAULT_BASE_COST: u64 = 1000;

/// Price increase for every doubling of the area from the first bracket on.
pub const DEFAULT_STEP_COST: u64 = 500;

/// Area at which the first price step applies.
pub const DEFAULT_FIRST_BRACKET: u64 = 8;

/// Maps a probe's area (cell count) to its budget cost.
pub trait CostModel {
    /// Cost of probing a rectangle of `area` cells. `area` is always positive.
    fn cost(&self, area: u64) -> u64;
}

impl<F> CostModel for F
where
    F: Fn(u64) -> u64,
{
    fn cost(&self, area: u64) -> u64 {
        self(area)
    }
}

/// Stepped price list: a flat `base` below `first_bracket`, then `step` more
/// for every doubling of the area.
///
/// With the defaults: areas 1-7 cost 1000, 8-15 cost 1500, 16-31 cost 2000,
/// and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BracketCost {
    pub base: u64,
    pub step: u64,
    pub first_bracket: u64,
}

impl Default for BracketCost {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_COST,
            step: DEFAULT_STEP_COST,
            first_bracket: DEFAULT_FIRST_BRACKET,
        }
    }
}

impl BracketCost {
    pub fn new(base: u64, step: u64, first_bracket: u64) -> Self {
        Self {
            base,
            step,
            first_bracket,
        }
    }

    /// Number of price steps applied to `area`.
    fn brackets(&self, area: u64) -> u32 {
        if self.first_bracket == 0 || area < self.first_bracket {
            return 0;
        }
        // floor(log2(area / first_bracket)) + 1
        (area / self.first_bracket).ilog2() + 1
    }
}

impl CostModel for BracketCost {
    fn cost(&self, area: u64) -> u64 {
        self.base
            .saturating_add(self.step.saturating_mul(self.brackets(area) as u64))
    }
}
