use crate::utils::error::{MarketError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["compact", "json"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub users_file: String,
    pub flats_file: String,
    pub owners_file: String,
    pub session_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data/db".to_string(),
            users_file: "users.csv".to_string(),
            flats_file: "flats.csv".to_string(),
            owners_file: "owners.csv".to_string(),
            session_file: ".session.json".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn session_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.session_file)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl MarketConfig {
    /// Reads `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| MarketError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| MarketError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable. Unset
    /// variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MarketError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for MarketConfig {
    fn validate(&self) -> Result<()> {
        let storage = &self.storage;
        validation::validate_path("storage.data_dir", &storage.data_dir)?;
        validation::validate_file_name("storage.users_file", &storage.users_file)?;
        validation::validate_file_name("storage.flats_file", &storage.flats_file)?;
        validation::validate_file_name("storage.owners_file", &storage.owners_file)?;
        validation::validate_file_name("storage.session_file", &storage.session_file)?;

        let mut names = vec![
            &storage.users_file,
            &storage.flats_file,
            &storage.owners_file,
            &storage.session_file,
        ];
        names.sort();
        names.dedup();
        if names.len() != 4 {
            return Err(MarketError::ValidationError {
                field: "storage".to_string(),
                reason: "table and session files must have distinct names".to_string(),
            });
        }

        validation::validate_one_of("logging.level", &self.logging.level, &LOG_LEVELS)?;
        validation::validate_one_of("logging.format", &self.logging.format, &LOG_FORMATS)?;
        Ok(())
    }
}
