//! Partition plan tuning.
//!
//! Runs the search once per candidate plan against a shared oracle and ranks
//! the outcomes. Plans are evaluated in parallel on the rayon pool; each run
//! owns its own region tree and queue, so the only shared state is the
//! read-only oracle and cost model.

use std::cmp::Ordering;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::cost::CostModel;
use crate::grid::TreasureOracle;
use crate::plan::{enumerate_plans, PartitionPlan};
use crate::search::{SearchContext, SearchReport};

/// Default cap on plan length when enumerating candidates.
pub const DEFAULT_MAX_LEVELS: usize = 3;

/// Options for a tuning sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuneOptions {
    /// Budget given to every run.
    pub budget: i64,
    /// Longest plan to enumerate.
    pub max_levels: usize,
    /// Evaluate at most this many plans, in enumeration order.
    pub limit: Option<usize>,
}

impl TuneOptions {
    pub fn new(budget: i64) -> Self {
        Self {
            budget,
            max_levels: DEFAULT_MAX_LEVELS,
            limit: None,
        }
    }

    /// Set the longest plan to enumerate.
    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = max_levels;
        self
    }

    /// Cap the number of plans evaluated.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Outcome of one candidate plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanScore {
    pub plan: PartitionPlan,
    pub report: SearchReport,
}

impl PlanScore {
    /// Ranking order: more treasures first, then cheaper per treasure, then
    /// plan text.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .report
            .treasures_found
            .cmp(&self.report.treasures_found)
            .then_with(|| {
                cost_key(self.report.cost_per_treasure)
                    .total_cmp(&cost_key(other.report.cost_per_treasure))
            })
            .then_with(|| self.plan.to_string().cmp(&other.plan.to_string()))
    }
}

/// Runs without a cost-per-treasure figure sort after every run with one.
fn cost_key(cost: Option<f64>) -> f64 {
    cost.unwrap_or(f64::INFINITY)
}

/// Candidate plans for the oracle's grid, truncated to `options.limit`.
pub fn candidate_plans<O>(oracle: &O, options: &TuneOptions) -> Vec<PartitionPlan>
where
    O: TreasureOracle + ?Sized,
{
    let mut plans = enumerate_plans(oracle.extent(), options.max_levels);
    if let Some(limit) = options.limit {
        plans.truncate(limit);
    }
    plans
}

/// Evaluates every candidate plan and returns the scores, best first.
///
/// `on_result` is called from worker threads as each plan finishes.
pub fn tune<O, C, F>(oracle: &O, cost: &C, options: &TuneOptions, on_result: F) -> Vec<PlanScore>
where
    O: TreasureOracle + Sync + ?Sized,
    C: CostModel + Sync + ?Sized,
    F: Fn(&PlanScore) + Sync,
{
    let plans = candidate_plans(oracle, options);
    score_plans(oracle, cost, &plans, options.budget, on_result)
}

/// Evaluates the given plans and returns the scores, best first.
///
/// Plans that fail validation are logged and skipped.
pub fn score_plans<O, C, F>(
    oracle: &O,
    cost: &C,
    plans: &[PartitionPlan],
    budget: i64,
    on_result: F,
) -> Vec<PlanScore>
where
    O: TreasureOracle + Sync + ?Sized,
    C: CostModel + Sync + ?Sized,
    F: Fn(&PlanScore) + Sync,
{
    let started = Instant::now();

    let mut scores: Vec<PlanScore> = plans
        .par_iter()
        .filter_map(|plan| match SearchContext::new(oracle, cost, plan, budget) {
            Ok(mut ctx) => {
                let score = PlanScore {
                    plan: plan.clone(),
                    report: ctx.run(),
                };
                on_result(&score);
                Some(score)
            }
            Err(e) => {
                warn!(plan = %plan, error = %e, "Skipping plan");
                None
            }
        })
        .collect();

    scores.sort_by(PlanScore::rank_cmp);

    info!(
        plans = plans.len(),
        scored = scores.len(),
        best = ?scores.first().map(|s| s.plan.to_string()),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Tuning finished"
    );
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::BracketCost;
    use crate::grid::{Extent, Grid, SummedAreaTable};
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    fn sample_oracle() -> SummedAreaTable {
        let grid = Grid::with_treasures(
            12,
            12,
            &[(0, 0, 1), (0, 1, 2), (5, 7, 1), (11, 11, 3), (6, 6, 1)],
        )
        .unwrap();
        SummedAreaTable::new(&grid)
    }

    fn score(plan: &str, treasures: u64, cost: Option<f64>) -> PlanScore {
        let grid = Grid::empty(1, 1).unwrap();
        let oracle = SummedAreaTable::new(&grid);
        let one: PartitionPlan = "1x1".parse().unwrap();
        let mut report = SearchContext::new(&oracle, &|_: u64| 1u64, &one, 1).unwrap().run();
        report.treasures_found = treasures;
        report.cost_per_treasure = cost;
        PlanScore {
            plan: plan.parse().unwrap(),
            report,
        }
    }

    #[test]
    fn test_rank_prefers_more_treasures() {
        let a = score("2x2,1x1", 5, Some(900.0));
        let b = score("3x3,1x1", 6, Some(1200.0));
        assert_eq!(a.rank_cmp(&b), Ordering::Greater);
    }

    #[test]
    fn test_rank_breaks_ties_by_cost_then_plan() {
        let cheap = score("3x3,1x1", 5, Some(800.0));
        let dear = score("2x2,1x1", 5, Some(900.0));
        let none = score("1x1", 5, None);
        assert_eq!(cheap.rank_cmp(&dear), Ordering::Less);
        assert_eq!(dear.rank_cmp(&none), Ordering::Less);

        let twin = score("2x2,1x1", 5, Some(800.0));
        assert_eq!(twin.rank_cmp(&cheap), Ordering::Less);
    }

    #[test]
    fn test_limit_truncates_candidates() {
        let oracle = sample_oracle();
        let all = candidate_plans(&oracle, &TuneOptions::new(1_000));
        let some = candidate_plans(&oracle, &TuneOptions::new(1_000).with_limit(2));
        assert!(all.len() > 2);
        assert_eq!(some, all[..2].to_vec());
    }

    #[test]
    fn test_tune_scores_every_plan_best_first() {
        let oracle = sample_oracle();
        let options = TuneOptions::new(20_000).with_max_levels(3);
        let seen = AtomicUsize::new(0);

        let scores = tune(&oracle, &BracketCost::default(), &options, |_| {
            seen.fetch_add(1, AtomicOrdering::Relaxed);
        });

        assert_eq!(scores.len(), candidate_plans(&oracle, &options).len());
        assert_eq!(seen.load(AtomicOrdering::Relaxed), scores.len());
        for pair in scores.windows(2) {
            assert_ne!(pair[0].rank_cmp(&pair[1]), Ordering::Greater);
        }
        for s in &scores {
            assert!(s.plan.validate(Extent::new(12, 12)).is_ok());
            assert!(s.report.treasures_found <= 8);
        }
    }

    #[test]
    fn test_unlimited_budget_finds_everything() {
        let oracle = sample_oracle();
        let options = TuneOptions::new(i64::MAX).with_max_levels(2);
        let scores = tune(&oracle, &BracketCost::default(), &options, |_| {});
        assert!(scores.iter().all(|s| s.report.treasures_found == 8));
    }

    #[test]
    fn test_invalid_plans_are_skipped() {
        let oracle = sample_oracle();
        let plans: Vec<PartitionPlan> = vec!["5x5,1x1".parse().unwrap(), "4x4,1x1".parse().unwrap()];
        let scores = score_plans(&oracle, &BracketCost::default(), &plans, 10_000, |_| {});
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].plan.to_string(), "4x4,1x1");
    }
}
