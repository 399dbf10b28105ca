//! Run command - generate a grid and search it once.

use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use goldscout::config::ConfigFile;
use goldscout::grid::Extent;
use goldscout::search::{SearchContext, SearchReport};
use serde::Serialize;

use super::common::{build_oracle, resolve_config, CliContext, GridArgs, SearchArgs};
use crate::error::CliError;

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub grid: GridArgs,

    #[command(flatten)]
    pub search: SearchArgs,

    /// Stop after this many seconds even if budget remains
    #[arg(long, value_name = "SECS")]
    pub time_limit_secs: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Everything needed to reproduce and judge a run.
#[derive(Debug, Serialize)]
struct RunOutput<'a> {
    grid: String,
    seed: u64,
    plan: String,
    elapsed_ms: u64,
    #[serde(flatten)]
    report: &'a SearchReport,
}

/// Run the run command.
pub fn run(ctx: &CliContext, args: RunArgs) -> Result<(), CliError> {
    let config = resolve_config(&ctx.config, &args.grid, &args.search)?;
    let extent = Extent::new(config.grid.height, config.grid.width);

    // Fail on a bad plan before spending time on the grid
    config.search.plan.validate(extent)?;

    let (oracle, seed) = build_oracle(&config)?;
    let cost = config.cost_model();

    let started = Instant::now();
    let mut search = SearchContext::new(&oracle, &cost, &config.search.plan, config.search.budget)?;
    let report = match args.time_limit_secs {
        Some(secs) => search.run_until(started + Duration::from_secs(secs)),
        None => search.run(),
    };
    let elapsed = started.elapsed();

    if args.json {
        let output = RunOutput {
            grid: extent.to_string(),
            seed,
            plan: config.search.plan.to_string(),
            elapsed_ms: elapsed.as_millis() as u64,
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_summary(&config, seed, &report, elapsed);
    }
    Ok(())
}

fn print_summary(config: &ConfigFile, seed: u64, report: &SearchReport, elapsed: Duration) {
    println!("Goldscout v{}", goldscout::VERSION);
    println!("==================");
    println!();
    println!(
        "Grid:     {}x{} ({} treasures, seed {})",
        config.grid.height, config.grid.width, config.grid.treasures, seed
    );
    println!("Plan:     {}", config.search.plan);
    println!("Budget:   {}", report.budget_initial);
    println!();

    println!("Search Summary");
    println!("──────────────");
    println!(
        "  Treasures found:  {} ({} cells)",
        style(report.treasures_found).green().bold(),
        report.treasure_cells
    );
    println!(
        "  Probes:           {} ({} certain)",
        report.probes, report.certain_probes
    );
    println!(
        "  Budget spent:     {} ({} remaining)",
        report.budget_spent, report.budget_remaining
    );
    match report.cost_per_treasure {
        Some(cost) => println!("  Cost per treasure: {:.1}", cost),
        None => println!("  Cost per treasure: {}", style("n/a").dim()),
    }
    println!(
        "  Regions:          {} created, {} pending, depth {}",
        report.regions_created, report.regions_pending, report.max_depth
    );
    if let Some(termination) = report.termination {
        println!("  Stopped:          {}", style(termination).cyan());
    }
    println!("  Elapsed:          {:.2?}", elapsed);
}
