use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable holding the database URL
pub const DATABASE_URL_ENV: &str = "KEA_CONFIG_DATABASE_URL";

/// Effective CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub database_url: String,
    /// `tracing` filter directive from the config file, if any
    pub log_filter: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    database: Option<DatabaseSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Deserialize)]
struct DatabaseSection {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoggingSection {
    filter: Option<String>,
}

impl CliConfig {
    /// Load configuration with precedence: CLI args > env vars > config file
    pub fn load(config_path: Option<&PathBuf>, cli_database_url: Option<&str>) -> Result<Self> {
        let file_config = Self::load_from_file(config_path)?;

        let database_url = cli_database_url
            .map(String::from)
            .or_else(|| std::env::var(DATABASE_URL_ENV).ok())
            .or(file_config
                .as_ref()
                .and_then(|f| f.database.as_ref().and_then(|d| d.url.clone())))
            .ok_or_else(|| {
                anyhow!(
                    "Database URL required: use --database-url, {}, or config file",
                    DATABASE_URL_ENV
                )
            })?;

        let log_filter = file_config
            .as_ref()
            .and_then(|f| f.logging.as_ref().and_then(|l| l.filter.clone()));

        Ok(Self {
            database_url,
            log_filter,
        })
    }

    fn load_from_file(path: Option<&PathBuf>) -> Result<Option<ConfigFile>> {
        let config_path = match path {
            Some(p) => Self::expand_tilde(p.clone()),
            None => {
                let default = Self::default_config_path();
                if !default.exists() {
                    return Ok(None);
                }
                default
            }
        };

        if !config_path.exists() {
            if path.is_some() {
                return Err(anyhow!("Config file not found: {:?}", config_path));
            }
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {:?}", config_path))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("failed to parse {:?}", config_path))?;
        Ok(Some(config))
    }

    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kea-config")
            .join("config.toml")
    }

    fn expand_tilde(path: PathBuf) -> PathBuf {
        if let Some(path_str) = path.to_str() {
            if let Some(stripped) = path_str.strip_prefix("~/") {
                if let Some(home) = dirs::home_dir() {
                    return home.join(stripped);
                }
            }
        }
        path
    }
}
