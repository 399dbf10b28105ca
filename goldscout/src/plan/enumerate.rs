//! Candidate plan enumeration for tuning.
//!
//! Each level picks a divisor pair `(i, j)` of the previous level's extent
//! with `i * i <= h` and `j * j <= w`. The square-root cap keeps every step
//! strictly shrinking (until the terminal `1x1`), so the recursion always
//! ends; `max_levels` bounds the plan length.

use super::PartitionPlan;
use crate::grid::Extent;

/// Lists every plan for a grid of `grid` extent with at most `max_levels`
/// levels, in depth-first order.
pub fn enumerate_plans(grid: Extent, max_levels: usize) -> Vec<PartitionPlan> {
    let mut plans = Vec::new();
    let mut levels = Vec::with_capacity(max_levels);
    walk(grid, max_levels, &mut levels, &mut plans);
    plans
}

fn walk(
    container: Extent,
    max_levels: usize,
    levels: &mut Vec<Extent>,
    plans: &mut Vec<PartitionPlan>,
) {
    if container == Extent::new(1, 1) && !levels.is_empty() {
        plans.push(PartitionPlan::new(levels.clone()));
        return;
    }
    if levels.len() == max_levels {
        return;
    }

    for i in small_divisors(container.height) {
        for j in small_divisors(container.width) {
            levels.push(Extent::new(i, j));
            walk(Extent::new(i, j), max_levels, levels, plans);
            levels.pop();
        }
    }
}

/// Divisors `d` of `n` with `d * d <= n`, ascending.
fn small_divisors(n: u32) -> impl Iterator<Item = u32> {
    (1u32..)
        .take_while(move |&d| (d as u64) * (d as u64) <= n as u64)
        .filter(move |&d| n % d == 0)
}
