//! Typed access to individual configuration keys.
//!
//! Keys are addressed as `section.key` (for example `search.plan`). Every
//! setter parses and validates its value, so a file loaded through
//! [`ConfigFile::from_ini`](super::ConfigFile::from_ini) and a value set
//! from the command line go through the same checks.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, ConfigFile};
use crate::plan::PartitionPlan;

/// A single configuration setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    GridHeight,
    GridWidth,
    GridTreasures,
    GridSeed,
    SearchBudget,
    SearchPlan,
    CostBase,
    CostStep,
    CostFirstBracket,
    LoggingLevel,
    LoggingFile,
}

const ALL_KEYS: [ConfigKey; 11] = [
    ConfigKey::GridHeight,
    ConfigKey::GridWidth,
    ConfigKey::GridTreasures,
    ConfigKey::GridSeed,
    ConfigKey::SearchBudget,
    ConfigKey::SearchPlan,
    ConfigKey::CostBase,
    ConfigKey::CostStep,
    ConfigKey::CostFirstBracket,
    ConfigKey::LoggingLevel,
    ConfigKey::LoggingFile,
];

impl ConfigKey {
    /// Every key, grouped by section in file order.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    /// INI section holding this key.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::GridHeight
            | ConfigKey::GridWidth
            | ConfigKey::GridTreasures
            | ConfigKey::GridSeed => "grid",
            ConfigKey::SearchBudget | ConfigKey::SearchPlan => "search",
            ConfigKey::CostBase | ConfigKey::CostStep | ConfigKey::CostFirstBracket => "cost",
            ConfigKey::LoggingLevel | ConfigKey::LoggingFile => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::GridHeight => "height",
            ConfigKey::GridWidth => "width",
            ConfigKey::GridTreasures => "treasures",
            ConfigKey::GridSeed => "seed",
            ConfigKey::SearchBudget => "budget",
            ConfigKey::SearchPlan => "plan",
            ConfigKey::CostBase => "base",
            ConfigKey::CostStep => "step",
            ConfigKey::CostFirstBracket => "first_bracket",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingFile => "file",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as text; unset optional values are empty.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::GridHeight => config.grid.height.to_string(),
            ConfigKey::GridWidth => config.grid.width.to_string(),
            ConfigKey::GridTreasures => config.grid.treasures.to_string(),
            ConfigKey::GridSeed => config.grid.seed.map(|s| s.to_string()).unwrap_or_default(),
            ConfigKey::SearchBudget => config.search.budget.to_string(),
            ConfigKey::SearchPlan => config.search.plan.to_string(),
            ConfigKey::CostBase => config.cost.base.to_string(),
            ConfigKey::CostStep => config.cost.step.to_string(),
            ConfigKey::CostFirstBracket => config.cost.first_bracket.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingFile => config
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Parses `value` and stores it in `config`.
    ///
    /// The configuration is left untouched when the value is rejected.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::GridHeight => config.grid.height = self.parse_extent(value)?,
            ConfigKey::GridWidth => config.grid.width = self.parse_extent(value)?,
            ConfigKey::GridTreasures => config.grid.treasures = self.parse(value)?,
            ConfigKey::GridSeed => {
                config.grid.seed = if value.is_empty() {
                    None
                } else {
                    Some(self.parse(value)?)
                }
            }
            ConfigKey::SearchBudget => config.search.budget = self.parse(value)?,
            ConfigKey::SearchPlan => {
                config.search.plan = value
                    .parse::<PartitionPlan>()
                    .map_err(|e| self.invalid(value, e))?
            }
            ConfigKey::CostBase => config.cost.base = self.parse(value)?,
            ConfigKey::CostStep => config.cost.step = self.parse(value)?,
            ConfigKey::CostFirstBracket => config.cost.first_bracket = self.parse(value)?,
            ConfigKey::LoggingLevel => {
                value
                    .parse::<tracing::Level>()
                    .map_err(|_| self.invalid(value, "expected trace, debug, info, warn or error"))?;
                config.logging.level = value.to_ascii_lowercase();
            }
            ConfigKey::LoggingFile => {
                config.logging.file = (!value.is_empty()).then(|| PathBuf::from(value))
            }
        }
        Ok(())
    }

    fn parse<T>(&self, value: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        value.parse().map_err(|e| self.invalid(value, e))
    }

    fn parse_extent(&self, value: &str) -> Result<u32, ConfigError> {
        match self.parse::<u32>(value)? {
            0 => Err(self.invalid(value, "must be at least 1")),
            n => Ok(n),
        }
    }

    fn invalid(&self, value: &str, reason: impl fmt::Display) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}
