//! Tune command - rank candidate partition plans.

use clap::Args;
use console::style;
use goldscout::tuning::{self, PlanScore, TuneOptions, DEFAULT_MAX_LEVELS};
use indicatif::{ProgressBar, ProgressStyle};

use super::common::{build_oracle, resolve_config, CliContext, GridArgs, SearchArgs};
use crate::error::CliError;

/// Arguments for the tune command.
#[derive(Debug, Args)]
pub struct TuneArgs {
    #[command(flatten)]
    pub grid: GridArgs,

    #[command(flatten)]
    pub search: SearchArgs,

    /// Longest plan to try
    #[arg(long, default_value_t = DEFAULT_MAX_LEVELS)]
    pub max_levels: usize,

    /// Evaluate at most this many plans
    #[arg(long)]
    pub limit: Option<usize>,

    /// Number of ranked plans to print
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Print all scores as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the tune command.
pub fn run(ctx: &CliContext, args: TuneArgs) -> Result<(), CliError> {
    if args.max_levels == 0 {
        return Err(CliError::Config(
            "--max-levels must be at least 1".to_string(),
        ));
    }
    let config = resolve_config(&ctx.config, &args.grid, &args.search)?;
    let (oracle, seed) = build_oracle(&config)?;
    let cost = config.cost_model();

    let mut options = TuneOptions::new(config.search.budget).with_max_levels(args.max_levels);
    if let Some(limit) = args.limit {
        options = options.with_limit(limit);
    }

    let candidates = tuning::candidate_plans(&oracle, &options);
    let pb = ProgressBar::new(candidates.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let scores = tuning::score_plans(&oracle, &cost, &candidates, options.budget, |score| {
        pb.set_message(score.plan.to_string());
        pb.inc(1);
    });
    pb.finish_and_clear();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&scores)?);
        return Ok(());
    }

    println!(
        "Ranked {} plans on a {}x{} grid (seed {}, budget {})",
        scores.len(),
        config.grid.height,
        config.grid.width,
        seed,
        options.budget
    );
    println!();
    print_table(&scores[..scores.len().min(args.top)]);
    Ok(())
}

fn print_table(scores: &[PlanScore]) {
    println!(
        "  {:>4}  {:<24} {:>10} {:>10} {:>14}",
        "rank", "plan", "found", "probes", "cost/treasure"
    );
    for (rank, score) in scores.iter().enumerate() {
        let cost = score
            .report
            .cost_per_treasure
            .map(|c| format!("{:.1}", c))
            .unwrap_or_else(|| "n/a".to_string());
        let plan = format!("{:<24}", score.plan.to_string());
        let plan = if rank == 0 {
            style(plan).green().bold().to_string()
        } else {
            plan
        };
        println!(
            "  {:>4}  {} {:>10} {:>10} {:>14}",
            rank + 1,
            plan,
            score.report.treasures_found,
            score.report.probes,
            cost
        );
    }
}
