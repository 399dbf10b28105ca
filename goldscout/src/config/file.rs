//! Configuration file loading and saving.

use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::debug;

use super::{ConfigError, ConfigKey};
use crate::cost::BracketCost;
use crate::grid::GridGenerator;
use crate::plan::PartitionPlan;

/// Probe budget used by the historical experiments.
pub const DEFAULT_BUDGET: i64 = 600_000_000;

/// Log level used when neither the file nor `RUST_LOG` says otherwise.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Returns the path of the user's configuration file.
///
/// Falls back to the current directory when the platform has no config
/// directory.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("goldscout")
        .join("config.ini")
}

/// `[grid]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSettings {
    pub height: u32,
    pub width: u32,
    pub treasures: u64,
    /// Fixed generator seed; `None` draws a fresh one per run.
    pub seed: Option<u64>,
}

impl Default for GridSettings {
    fn default() -> Self {
        let generator = GridGenerator::default();
        Self {
            height: generator.height,
            width: generator.width,
            treasures: generator.treasures,
            seed: None,
        }
    }
}

/// `[search]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub budget: i64,
    pub plan: PartitionPlan,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            plan: PartitionPlan::default(),
        }
    }
}

/// `[cost]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostSettings {
    pub base: u64,
    pub step: u64,
    pub first_bracket: u64,
}

impl Default for CostSettings {
    fn default() -> Self {
        let cost = BracketCost::default();
        Self {
            base: cost.base,
            step: cost.step,
            first_bracket: cost.first_bracket,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// Log file; `None` logs to stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

/// All configuration settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub grid: GridSettings,
    pub search: SearchSettings,
    pub cost: CostSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Loads the user's configuration file, or the defaults if it does not
    /// exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Loads configuration from `path`, or the defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(e) => ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;

        let config = Self::from_ini(&ini)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Saves to the user's configuration file.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Saves to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        self.to_ini().write_to_file(path).map_err(io_error)
    }

    /// Reads every known key present in `ini`; absent keys keep their
    /// defaults and unknown keys are ignored.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|section| section.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Writes every key, including unset optional ones as empty values.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini
    }

    /// Grid generator described by the `[grid]` section.
    pub fn generator(&self) -> GridGenerator {
        let generator = GridGenerator::new(self.grid.height, self.grid.width)
            .with_treasures(self.grid.treasures);
        match self.grid.seed {
            Some(seed) => generator.with_seed(seed),
            None => generator,
        }
    }

    /// Cost model described by the `[cost]` section.
    pub fn cost_model(&self) -> BracketCost {
        BracketCost::new(self.cost.base, self.cost.step, self.cost.first_bracket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_historical_experiment() {
        let config = ConfigFile::default();
        assert_eq!(config.grid.height, 3500);
        assert_eq!(config.grid.width, 3500);
        assert_eq!(config.grid.treasures, 490_000);
        assert_eq!(config.grid.seed, None);
        assert_eq!(config.search.budget, 600_000_000);
        assert_eq!(config.search.plan.to_string(), "50x20,5x1,1x1");
        assert_eq!(config.cost_model(), BracketCost::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.grid.height = 100;
        config.grid.seed = Some(42);
        config.search.plan = "10x10,1x1".parse().unwrap();
        config.logging.file = Some(PathBuf::from("/tmp/goldscout.log"));
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[search]\nbudget = 5000\n\n[extra]\nfoo = bar\n").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.search.budget, 5000);
        assert_eq!(config.grid, GridSettings::default());
        assert_eq!(config.search.plan, PartitionPlan::default());
    }

    #[test]
    fn test_invalid_value_names_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[grid]\nheight = tall\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        match err {
            ConfigError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "grid.height");
                assert_eq!(value, "tall");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_seed_means_random() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[grid]\nseed =\n").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.grid.seed, None);
        assert_eq!(config.generator().seed, None);
    }

    #[test]
    fn test_generator_carries_seed() {
        let mut config = ConfigFile::default();
        config.grid.height = 8;
        config.grid.width = 6;
        config.grid.treasures = 5;
        config.grid.seed = Some(7);

        let generator = config.generator();
        assert_eq!(generator, GridGenerator::new(8, 6).with_treasures(5).with_seed(7));
    }

    #[test]
    fn test_config_path_ends_with_app_dir() {
        let path = config_file_path();
        assert!(path.ends_with("goldscout/config.ini"));
    }
}
