//! Best-first area search.
//!
//! # Algorithm
//!
//! 1. Count the whole grid once (free) and make it the explored root.
//! 2. Split the root with `plan[0]`; every child starts at the root's
//!    uniform density.
//! 3. Until the budget runs out or the queue empties:
//!    - pop the region with the highest expected density
//!    - charge its cost, unless the estimate is at least one treasure per
//!      cell (a "certain" probe)
//!    - probe it; single cells add to the total, other non-empty regions
//!      split with `plan[depth]` at their own uniform density
//!    - spread the parent's unaccounted treasures evenly over the parent's
//!      still-unexplored area and re-key those siblings in place
//!
//! The budget is charged before the probe, so the last probe may take it
//! below zero.

use std::time::Instant;

use tracing::{debug, info, trace};

use super::queue::RegionQueue;
use super::region::{RegionArena, RegionId};
use super::report::{SearchReport, Termination};
use super::{SearchError, DENSITY_EPSILON};
use crate::cost::CostModel;
use crate::grid::{Rect, TreasureOracle};
use crate::plan::PartitionPlan;

/// True if a region at `density` is certain enough to probe for free.
#[inline]
pub fn is_certain(density: f64) -> bool {
    density >= 1.0 || (density - 1.0).abs() < DENSITY_EPSILON
}

/// What a single iteration did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    pub region: RegionId,
    pub rect: Rect,
    /// Density the region was popped with.
    pub density: f64,
    /// True count found inside the region.
    pub count: u64,
    /// Budget charged; zero for certain probes.
    pub cost: u64,
    pub certain: bool,
    /// Children created by splitting the region.
    pub spawned: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    treasures_found: u64,
    treasure_cells: u64,
    probes: u64,
    certain_probes: u64,
    budget_spent: u64,
    max_depth: u32,
}

/// State of one search: the oracle and cost model it reads, the plan it
/// splits by, the remaining budget, and the region tree and queue it owns.
pub struct SearchContext<'a, O: ?Sized, C: ?Sized> {
    oracle: &'a O,
    cost: &'a C,
    plan: &'a PartitionPlan,
    budget_initial: i64,
    budget: i64,
    arena: RegionArena,
    queue: RegionQueue,
    root: RegionId,
    counters: Counters,
    termination: Option<Termination>,
}

impl<'a, O, C> SearchContext<'a, O, C>
where
    O: TreasureOracle + ?Sized,
    C: CostModel + ?Sized,
{
    /// Validates the plan against the oracle's grid, counts the whole grid
    /// and queues the root's children.
    pub fn new(
        oracle: &'a O,
        cost: &'a C,
        plan: &'a PartitionPlan,
        budget: i64,
    ) -> Result<Self, SearchError> {
        plan.validate(oracle.extent())?;

        let bounds = oracle.bounds();
        let mut arena = RegionArena::new();
        let root = arena.insert_root(bounds, oracle.total());
        let root_tiles = bounds.area() / plan.level(0).area();
        let mut queue = RegionQueue::with_capacity(root_tiles as usize);

        let density = arena[root].expected_density();
        for rect in bounds.tiles(plan.level(0)) {
            let child = arena.spawn_child(root, rect, density);
            queue.push(child, density);
        }

        debug!(
            grid = %oracle.extent(),
            plan = %plan,
            budget,
            treasures = arena[root].actual_count().unwrap_or(0),
            root_children = queue.len(),
            "Search initialised"
        );

        Ok(Self {
            oracle,
            cost,
            plan,
            budget_initial: budget,
            budget,
            arena,
            queue,
            root,
            counters: Counters {
                max_depth: 1,
                ..Counters::default()
            },
            termination: None,
        })
    }

    /// Runs one pop-probe-expand-reestimate iteration.
    ///
    /// Returns `None` once the search has terminated.
    pub fn step(&mut self) -> Option<Probe> {
        if self.termination.is_some() {
            return None;
        }
        if self.budget <= 0 {
            let reason = if self.counters.probes == 0 {
                Termination::NoBudget
            } else {
                Termination::BudgetExhausted
            };
            self.finish(reason);
            return None;
        }
        let Some(entry) = self.queue.pop() else {
            self.finish(Termination::QueueExhausted);
            return None;
        };

        let id = entry.region;
        let rect = self.arena[id].rect();
        let certain = is_certain(entry.density);
        let cost = if certain {
            self.counters.certain_probes += 1;
            if !rect.is_cell() {
                debug!(region = %id, rect = %rect, density = entry.density, "Certain probe on multi-cell region");
            }
            0
        } else {
            let cost = self.cost.cost(rect.area());
            self.budget = self
                .budget
                .saturating_sub(i64::try_from(cost).unwrap_or(i64::MAX));
            self.counters.budget_spent = self.counters.budget_spent.saturating_add(cost);
            cost
        };

        let count = self.oracle.count(rect);
        self.arena.mark_explored(id, count);
        self.counters.probes += 1;

        let mut spawned = 0;
        if count > 0 {
            if rect.is_cell() {
                self.counters.treasures_found += count;
                self.counters.treasure_cells += 1;
            } else {
                spawned = self.expand(id, count);
            }
        }

        self.reestimate_siblings(id);

        trace!(
            region = %id,
            rect = %rect,
            density = entry.density,
            count,
            cost,
            budget = self.budget,
            "Probed region"
        );

        Some(Probe {
            region: id,
            rect,
            density: entry.density,
            count,
            cost,
            certain,
            spawned,
        })
    }

    /// Steps until the search terminates.
    pub fn run(&mut self) -> SearchReport {
        while self.step().is_some() {}
        self.report()
    }

    /// Steps until the search terminates or `deadline` passes, checking the
    /// clock between iterations.
    pub fn run_until(&mut self, deadline: Instant) -> SearchReport {
        while self.termination.is_none() {
            if Instant::now() >= deadline {
                self.finish(Termination::DeadlineReached);
                break;
            }
            self.step();
        }
        self.report()
    }

    /// Splits a non-empty region with its level's tile shape.
    fn expand(&mut self, id: RegionId, count: u64) -> usize {
        let region = &self.arena[id];
        let rect = region.rect();
        let depth = region.depth();
        let tile = self.plan.level(depth as usize);
        let density = count as f64 / rect.area() as f64;

        let mut spawned = 0;
        for child_rect in rect.tiles(tile) {
            let child = self.arena.spawn_child(id, child_rect, density);
            self.queue.push(child, density);
            spawned += 1;
        }
        self.counters.max_depth = self.counters.max_depth.max(depth + 1);
        spawned
    }

    /// Re-keys the probed region's unexplored siblings with the parent's
    /// residual density.
    fn reestimate_siblings(&mut self, id: RegionId) {
        let Some(parent) = self.arena[id].parent() else {
            return;
        };
        let Some(density) = self.arena.residual_density(parent) else {
            return;
        };

        for i in 0..self.arena[parent].children().len() {
            let sibling = self.arena[parent].children()[i];
            if self.arena[sibling].is_explored() {
                continue;
            }
            self.arena.set_density(sibling, density);
            self.queue.update(sibling, density);
        }
    }

    fn finish(&mut self, reason: Termination) {
        self.termination = Some(reason);
        info!(
            treasures = self.counters.treasures_found,
            probes = self.counters.probes,
            certain_probes = self.counters.certain_probes,
            budget_spent = self.counters.budget_spent,
            budget_remaining = self.budget,
            regions = self.arena.len(),
            termination = %reason,
            "Search finished"
        );
    }

    /// Snapshot of the counters so far.
    pub fn report(&self) -> SearchReport {
        let c = &self.counters;
        SearchReport {
            treasures_found: c.treasures_found,
            treasure_cells: c.treasure_cells,
            probes: c.probes,
            certain_probes: c.certain_probes,
            budget_initial: self.budget_initial,
            budget_spent: c.budget_spent,
            budget_remaining: self.budget,
            regions_created: self.arena.len(),
            regions_pending: self.queue.len(),
            max_depth: c.max_depth,
            cost_per_treasure: (c.treasures_found > 0)
                .then(|| c.budget_spent as f64 / c.treasures_found as f64),
            termination: self.termination,
        }
    }

    pub fn budget(&self) -> i64 {
        self.budget
    }

    pub fn treasures_found(&self) -> u64 {
        self.counters.treasures_found
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn root(&self) -> RegionId {
        self.root
    }

    pub fn arena(&self) -> &RegionArena {
        &self.arena
    }

    pub fn queue(&self) -> &RegionQueue {
        &self.queue
    }
}

impl<O: ?Sized, C: ?Sized> std::fmt::Debug for SearchContext<'_, O, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchContext")
            .field("plan", &self.plan.to_string())
            .field("budget", &self.budget)
            .field("regions", &self.arena.len())
            .field("queued", &self.queue.len())
            .field("termination", &self.termination)
            .finish()
    }
}

/// Runs a full search and returns the number of treasures found.
pub fn run<O, C>(
    oracle: &O,
    cost: &C,
    plan: &PartitionPlan,
    budget: i64,
) -> Result<u64, SearchError>
where
    O: TreasureOracle + ?Sized,
    C: CostModel + ?Sized,
{
    Ok(SearchContext::new(oracle, cost, plan, budget)?
        .run()
        .treasures_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Grid, SummedAreaTable};
    use crate::plan::PlanError;

    const UNIT: fn(u64) -> u64 = |_| 1;

    fn oracle(grid: &Grid) -> SummedAreaTable {
        SummedAreaTable::new(grid)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Certainty threshold
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_is_certain_threshold() {
        assert!(is_certain(1.0));
        assert!(is_certain(3.5));
        assert!(is_certain(1.0 - 1e-7));
        assert!(!is_certain(1.0 - 1e-5));
        assert!(!is_certain(0.0));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_new_queues_root_children() {
        let grid = Grid::with_treasures(4, 4, &[(3, 3, 2)]).unwrap();
        let sat = oracle(&grid);
        let plan = PartitionPlan::from_shapes(&[(2, 2), (1, 1)]);
        let ctx = SearchContext::new(&sat, &UNIT, &plan, 10).unwrap();

        let root = &ctx.arena()[ctx.root()];
        assert_eq!(root.actual_count(), Some(2));
        assert_eq!(root.children().len(), 4);
        assert_eq!(ctx.queue().len(), 4);
        for &child in root.children() {
            assert!((ctx.arena()[child].expected_density() - 2.0 / 16.0).abs() < 1e-12);
        }
        // The root count is free
        assert_eq!(ctx.budget(), 10);
    }

    #[test]
    fn test_new_rejects_invalid_plan() {
        let grid = Grid::empty(4, 4).unwrap();
        let sat = oracle(&grid);
        let plan = PartitionPlan::from_shapes(&[(3, 3), (1, 1)]);
        let err = SearchContext::new(&sat, &UNIT, &plan, 10).unwrap_err();
        assert!(matches!(
            err,
            SearchError::InvalidPlan(PlanError::NotDividing { depth: 0, .. })
        ));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Stepping
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_step_charges_cost_before_probe() {
        let grid = Grid::empty(4, 4).unwrap();
        let sat = oracle(&grid);
        let plan = PartitionPlan::from_shapes(&[(2, 2), (1, 1)]);
        let per_cell = |area: u64| area * 10;
        let mut ctx = SearchContext::new(&sat, &per_cell, &plan, 15).unwrap();

        let probe = ctx.step().unwrap();
        assert_eq!(probe.cost, 40);
        assert_eq!(probe.rect, Rect::new(0, 0, 1, 1));
        // Overdrawn by the only probe it could afford to start
        assert_eq!(ctx.budget(), -25);

        assert!(ctx.step().is_none());
        assert_eq!(ctx.termination(), Some(Termination::BudgetExhausted));
    }

    #[test]
    fn test_step_expands_non_empty_region() {
        let grid = Grid::with_treasures(4, 4, &[(0, 1, 1)]).unwrap();
        let sat = oracle(&grid);
        let plan = PartitionPlan::from_shapes(&[(2, 2), (1, 1)]);
        let mut ctx = SearchContext::new(&sat, &UNIT, &plan, 100).unwrap();

        let probe = ctx.step().unwrap();
        assert_eq!(probe.count, 1);
        assert_eq!(probe.spawned, 4);

        let region = &ctx.arena()[probe.region];
        assert_eq!(region.children().len(), 4);
        for &child in region.children() {
            assert_eq!(ctx.arena()[child].depth(), 2);
            assert!((ctx.queue().density(child).unwrap() - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_siblings_drop_to_zero_once_parent_is_accounted_for() {
        let grid = Grid::with_treasures(4, 4, &[(0, 0, 1)]).unwrap();
        let sat = oracle(&grid);
        let plan = PartitionPlan::from_shapes(&[(2, 2), (1, 1)]);
        let mut ctx = SearchContext::new(&sat, &UNIT, &plan, 100).unwrap();

        // The first quadrant holds the only treasure
        ctx.step().unwrap();
        let root = ctx.root();
        for &sibling in &ctx.arena()[root].children()[1..] {
            assert_eq!(ctx.queue().density(sibling), Some(0.0));
        }
    }

    #[test]
    fn test_last_unexplored_sibling_becomes_certain() {
        let grid = Grid::with_treasures(2, 2, &[(1, 1, 1)]).unwrap();
        let sat = oracle(&grid);
        let plan = PartitionPlan::from_shapes(&[(1, 1)]);
        let mut ctx = SearchContext::new(&sat, &UNIT, &plan, 100).unwrap();

        let probes: Vec<_> = std::iter::from_fn(|| ctx.step()).collect();
        assert_eq!(probes.len(), 4);
        assert!(probes[..3].iter().all(|p| !p.certain && p.cost == 1));
        assert!(probes[3].certain);
        assert_eq!(probes[3].cost, 0);
        assert_eq!(probes[3].rect, Rect::cell(1, 1));
        assert_eq!(ctx.budget(), 97);
        assert_eq!(ctx.treasures_found(), 1);
    }

    #[test]
    fn test_step_after_termination_stays_none() {
        let grid = Grid::empty(2, 2).unwrap();
        let sat = oracle(&grid);
        let plan = PartitionPlan::from_shapes(&[(1, 1)]);
        let mut ctx = SearchContext::new(&sat, &UNIT, &plan, 100).unwrap();

        let report = ctx.run();
        assert_eq!(report.termination, Some(Termination::QueueExhausted));
        assert!(ctx.step().is_none());
        assert_eq!(ctx.report(), report);
    }

    #[test]
    fn test_run_until_past_deadline_stops_immediately() {
        let grid = Grid::with_treasures(4, 4, &[(1, 1, 3)]).unwrap();
        let sat = oracle(&grid);
        let plan = PartitionPlan::from_shapes(&[(2, 2), (1, 1)]);
        let mut ctx = SearchContext::new(&sat, &UNIT, &plan, 100).unwrap();

        let report = ctx.run_until(Instant::now());
        assert_eq!(report.termination, Some(Termination::DeadlineReached));
        assert_eq!(report.probes, 0);
    }

    #[test]
    fn test_run_function_returns_total() {
        let grid = Grid::with_treasures(6, 6, &[(0, 0, 2), (5, 5, 1), (2, 3, 4)]).unwrap();
        let sat = oracle(&grid);
        let plan = PartitionPlan::from_shapes(&[(3, 3), (1, 1)]);
        assert_eq!(run(&sat, &UNIT, &plan, 1_000).unwrap(), 7);
    }

    #[test]
    fn test_report_cost_per_treasure() {
        let grid = Grid::with_treasures(2, 2, &[(0, 0, 2)]).unwrap();
        let sat = oracle(&grid);
        let plan = PartitionPlan::from_shapes(&[(1, 1)]);
        let mut ctx = SearchContext::new(&sat, &UNIT, &plan, 100).unwrap();

        let report = ctx.run();
        assert_eq!(report.treasures_found, 2);
        assert_eq!(report.treasure_cells, 1);
        assert_eq!(
            report.cost_per_treasure,
            Some(report.budget_spent as f64 / 2.0)
        );
        assert_eq!(report.regions_created, 5);
        assert_eq!(report.regions_pending, 0);
    }
}
