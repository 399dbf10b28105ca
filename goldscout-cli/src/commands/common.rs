//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use goldscout::config::{config_file_path, ConfigFile};
use goldscout::grid::{GeneratedGrid, SummedAreaTable};
use goldscout::plan::PartitionPlan;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::error::CliError;

/// Loaded configuration and where it came from.
pub struct CliContext {
    pub config: ConfigFile,
    pub config_path: PathBuf,
}

impl CliContext {
    /// Loads `path`, or the user's configuration file when `None`.
    pub fn load(path: Option<PathBuf>) -> Result<Self, CliError> {
        let config_path = path.unwrap_or_else(config_file_path);
        let config = ConfigFile::load_from(&config_path)?;
        Ok(Self {
            config,
            config_path,
        })
    }
}

/// Grid settings that override the `[grid]` section.
#[derive(Debug, Default, Args)]
pub struct GridArgs {
    /// Grid height in cells
    #[arg(long)]
    pub height: Option<u32>,

    /// Grid width in cells
    #[arg(long)]
    pub width: Option<u32>,

    /// Number of treasures to place
    #[arg(long)]
    pub treasures: Option<u64>,

    /// Generator seed (random if neither this nor the config sets one)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Search settings that override the `[search]` section.
#[derive(Debug, Default, Args)]
pub struct SearchArgs {
    /// Probe budget
    #[arg(long, allow_negative_numbers = true)]
    pub budget: Option<i64>,

    /// Partition plan, e.g. 50x20,5x1,1x1 or "50 20 5 1 1 1"
    #[arg(long)]
    pub plan: Option<String>,
}

/// Applies command-line overrides on top of the loaded configuration.
///
/// CLI takes precedence, then config.
pub fn resolve_config(
    config: &ConfigFile,
    grid: &GridArgs,
    search: &SearchArgs,
) -> Result<ConfigFile, CliError> {
    let mut resolved = config.clone();

    if let Some(height) = grid.height {
        resolved.grid.height = height;
    }
    if let Some(width) = grid.width {
        resolved.grid.width = width;
    }
    if let Some(treasures) = grid.treasures {
        resolved.grid.treasures = treasures;
    }
    if grid.seed.is_some() {
        resolved.grid.seed = grid.seed;
    }
    if resolved.grid.height == 0 || resolved.grid.width == 0 {
        return Err(CliError::Config(
            "grid height and width must be at least 1".to_string(),
        ));
    }

    if let Some(budget) = search.budget {
        resolved.search.budget = budget;
    }
    if let Some(plan) = &search.plan {
        resolved.search.plan = plan.parse::<PartitionPlan>()?;
    }

    Ok(resolved)
}

/// Generates the configured grid and builds its oracle, with a spinner on
/// stderr while it works.
pub fn build_oracle(config: &ConfigFile) -> Result<(SummedAreaTable, u64), CliError> {
    let started = Instant::now();
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!(
        "Generating {}x{} grid with {} treasures",
        config.grid.height, config.grid.width, config.grid.treasures
    ));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let GeneratedGrid { grid, seed } = config.generator().generate()?;
    spinner.set_message("Building summed-area table");
    let oracle = SummedAreaTable::new(&grid);
    spinner.finish_and_clear();

    info!(
        height = grid.height(),
        width = grid.width(),
        treasures = grid.total(),
        seed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Grid ready"
    );
    Ok((oracle, seed))
}
