//! Search outcome reporting.

use std::fmt;

use serde::Serialize;

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The budget was already at or below zero; nothing was probed.
    NoBudget,
    /// Probes used up the budget.
    BudgetExhausted,
    /// Every candidate region was probed.
    QueueExhausted,
    /// The caller's wall-clock deadline passed between iterations.
    DeadlineReached,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Termination::NoBudget => "no budget",
            Termination::BudgetExhausted => "budget exhausted",
            Termination::QueueExhausted => "queue exhausted",
            Termination::DeadlineReached => "deadline reached",
        };
        f.write_str(s)
    }
}

/// Counters and totals for one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    /// Total treasures recorded from single-cell probes.
    pub treasures_found: u64,

    /// Single cells that held at least one treasure.
    pub treasure_cells: u64,

    /// Regions probed, charged or not.
    pub probes: u64,

    /// Probes exempt from cost because the estimate was at least one
    /// treasure per cell.
    pub certain_probes: u64,

    /// Budget at the start of the run.
    pub budget_initial: i64,

    /// Total cost charged.
    pub budget_spent: u64,

    /// Budget left; negative when the final probe overdrew it.
    pub budget_remaining: i64,

    /// Regions created, including the root.
    pub regions_created: usize,

    /// Regions still waiting in the queue.
    pub regions_pending: usize,

    /// Deepest level any region reached.
    pub max_depth: u32,

    /// Budget spent per treasure found, if any were found.
    pub cost_per_treasure: Option<f64>,

    /// Why the run stopped; `None` while it is still in progress.
    pub termination: Option<Termination>,
}

impl SearchReport {
    /// True once the search has stopped.
    pub fn is_finished(&self) -> bool {
        self.termination.is_some()
    }
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "found {} treasures in {} probes ({} certain), spent {}",
            self.treasures_found, self.probes, self.certain_probes, self.budget_spent
        )?;
        if let Some(termination) = self.termination {
            write!(f, ", {}", termination)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SearchReport {
        SearchReport {
            treasures_found: 4,
            treasure_cells: 3,
            probes: 10,
            certain_probes: 2,
            budget_initial: 10_000,
            budget_spent: 8_000,
            budget_remaining: 2_000,
            regions_created: 21,
            regions_pending: 11,
            max_depth: 2,
            cost_per_treasure: Some(2_000.0),
            termination: Some(Termination::QueueExhausted),
        }
    }

    #[test]
    fn test_report_display() {
        assert_eq!(
            report().to_string(),
            "found 4 treasures in 10 probes (2 certain), spent 8000, queue exhausted"
        );
    }

    #[test]
    fn test_report_json_fields() {
        let json: serde_json::Value = serde_json::to_value(report()).unwrap();
        assert_eq!(json["treasures_found"], 4);
        assert_eq!(json["certain_probes"], 2);
        assert_eq!(json["termination"], "queue_exhausted");
    }

    #[test]
    fn test_unfinished_report() {
        let mut r = report();
        r.termination = None;
        assert!(!r.is_finished());
        assert!(!r.to_string().contains("exhausted"));
    }
}
