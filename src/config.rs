use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ical2csv_core::sink::CsvOptions;
use serde::Deserialize;

static DEFAULT_LOG_FILE: &str = "ical2csv.log";

fn default_log_file() -> Option<String> {
    Some(DEFAULT_LOG_FILE.to_string())
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_delimiter() -> char {
    ','
}

/// Configuration at ~/.config/ical2csv/config.toml
///
/// Every key is optional; a missing file means defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ExportConfig {
    /// Field delimiter of the CSV output
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

impl ExportConfig {
    pub fn csv_options(&self) -> Result<CsvOptions> {
        if !self.delimiter.is_ascii() {
            anyhow::bail!(
                "Invalid delimiter {:?} in config: only single ASCII characters are supported",
                self.delimiter
            );
        }
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            anyhow::bail!(
                "Invalid delimiter {:?} in config: quotes and line breaks are reserved by CSV",
                self.delimiter
            );
        }
        Ok(CsvOptions {
            delimiter: self.delimiter as u8,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log file path ("~" is expanded); no file logging when unset
    #[serde(default = "default_log_file")]
    pub file: Option<String>,

    /// Level of the file log
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file
            .as_deref()
            .filter(|f| !f.is_empty())
            .map(|f| PathBuf::from(shellexpand::tilde(f).as_ref()))
    }
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("ical2csv");

        Ok(config_dir.join("config.toml"))
    }

    /// Load `explicit`, or the default config file if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found at {}", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let path = Self::config_path()?;
                if !path.exists() {
                    return Ok(Config::default());
                }
                path
            }
        };

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Config> {
        let config: Config = toml::from_str(contents)?;
        config.export.csv_options()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.export.delimiter, ',');
        assert_eq!(config.logging.file.as_deref(), Some("ical2csv.log"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
[export]
delimiter = ";"

[logging]
level = "info"
"#,
        )
        .unwrap();

        assert_eq!(config.export.csv_options().unwrap().delimiter, b';');
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file.as_deref(), Some("ical2csv.log"));
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        assert!(Config::parse("[export]\ndelimiter = \"§\"\n").is_err());
    }

    #[test]
    fn test_reserved_delimiters_are_rejected() {
        assert!(Config::parse("[export]\ndelimiter = '\"'\n").is_err());
        assert!(Config::parse("[export]\ndelimiter = \"\\n\"\n").is_err());
        assert!(Config::parse("[export]\ndelimiter = \"\\r\"\n").is_err());
        assert!(Config::parse("[export]\ndelimiter = \"\\t\"\n").is_ok());
    }

    #[test]
    fn test_multi_char_delimiter_is_rejected() {
        assert!(Config::parse("[export]\ndelimiter = \";;\"\n").is_err());
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_load_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nfile = \"\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.logging.file_path(), None);
    }

    #[test]
    fn test_log_path_tilde_is_expanded() {
        let logging = LoggingConfig {
            file: Some("~/ical2csv.log".to_string()),
            level: "debug".to_string(),
        };
        let path = logging.file_path().unwrap();
        assert!(!path.to_string_lossy().starts_with('~') || dirs::home_dir().is_none());
    }
}
