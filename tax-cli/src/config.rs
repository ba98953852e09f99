//! Settings read from `mx-tax.toml`.
//!
//! Every key is optional. Command line flags take precedence over the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tax_core::Period;
use thiserror::Error;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "mx-tax.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tax year used for ISR. Defaults to the latest year with tables.
    pub tax_year: Option<i32>,
    /// Directory holding `isr_brackets.csv`, `subsidies.csv` and optionally
    /// `ieps_products.csv`.
    pub tables_dir: Option<PathBuf>,
    /// Reject unknown IEPS product keys instead of using the fallback rate.
    pub strict_ieps: bool,
    /// Period assumed by `isr` when `--period` is not given.
    pub default_period: Period,
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tax_year: None,
            tables_dir: None,
            strict_ieps: false,
            default_period: Period::Monthly,
            log_level: "info".to_string(),
        }
    }
}

/// Command line values that override the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub tax_year: Option<i32>,
    pub tables_dir: Option<PathBuf>,
    pub strict_ieps: bool,
}

impl Config {
    /// Loads the configuration.
    ///
    /// With an explicit `path` the file must exist. Without one,
    /// [`DEFAULT_CONFIG_FILE`] is read if present and defaults are used
    /// otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.display().to_string()));
                }
                Self::load_file(path)
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::load_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = content.parse()?;

        // Relative table directories are resolved against the config file.
        if let (Some(dir), Some(parent)) = (&config.tables_dir, path.parent()) {
            if dir.is_relative() {
                config.tables_dir = Some(parent.join(dir));
            }
        }

        Ok(config)
    }

    pub fn apply(
        mut self,
        overrides: Overrides,
    ) -> Self {
        if overrides.tax_year.is_some() {
            self.tax_year = overrides.tax_year;
        }
        if overrides.tables_dir.is_some() {
            self.tables_dir = overrides.tables_dir;
        }
        self.strict_ieps |= overrides.strict_ieps;
        self
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}
