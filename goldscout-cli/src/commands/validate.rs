//! Validate command - check a partition plan against the grid extent.

use clap::Args;
use console::style;
use goldscout::grid::Extent;

use super::common::{resolve_config, CliContext, GridArgs, SearchArgs};
use crate::error::CliError;

/// Arguments for the validate command.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub grid: GridArgs,

    #[command(flatten)]
    pub search: SearchArgs,
}

/// Run the validate command.
pub fn run(ctx: &CliContext, args: ValidateArgs) -> Result<(), CliError> {
    let config = resolve_config(&ctx.config, &args.grid, &args.search)?;
    let extent = Extent::new(config.grid.height, config.grid.width);
    let plan = &config.search.plan;

    plan.validate(extent)?;

    println!(
        "{} plan {} is valid for a {} grid",
        style("ok:").green().bold(),
        plan,
        extent
    );
    let mut container = extent;
    for (depth, level) in plan.levels().iter().enumerate() {
        let tiles = container.area() / level.area();
        println!(
            "  level {}: {} -> {} tiles of {} per region",
            depth, container, tiles, level
        );
        container = *level;
    }
    Ok(())
}
