//! Application configuration.
//!
//! Settings come from an optional RON file; every field has a default so a
//! partial file is valid. Command-line flags are applied on top by
//! [`AppConfig::apply_cli`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use blog2pdf_engine::{BackendSettings, DEFAULT_BACKEND_URL};
use engine_logging::{parse_level, LogDestination, LogSettings};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("unknown log level {0:?}")]
    InvalidLogLevel(String),
    #[error("unknown theme {0:?}")]
    InvalidTheme(String),
    #[error("{field} must be between 1 and {max} seconds, got {value}")]
    InvalidTimeout {
        field: &'static str,
        value: u64,
        max: u64,
    },
}

/// Longest accepted value for any timeout setting: one day.
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub connect_timeout_secs: u64,
    pub check_timeout_secs: u64,
    pub convert_timeout_secs: u64,
    pub max_pdf_mib: u64,
    pub output_dir: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    /// Also log to the terminal when `log_file` is set.
    pub log_to_terminal: bool,
    pub theme: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let backend = BackendSettings::default();
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            connect_timeout_secs: backend.connect_timeout.as_secs(),
            check_timeout_secs: backend.check_timeout.as_secs(),
            convert_timeout_secs: backend.convert_timeout.as_secs(),
            max_pdf_mib: backend.max_pdf_bytes / (1024 * 1024),
            output_dir: PathBuf::from("output"),
            log_level: "warn".to_string(),
            log_file: None,
            log_to_terminal: false,
            theme: "modern".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        ron::from_str(content).map_err(|err| err.to_string())
    }

    /// Loads `path` when given, otherwise starts from defaults, then applies
    /// the command-line overrides.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match cli.config.as_deref() {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(backend) = &cli.backend {
            self.backend_url = backend.clone();
        }
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(secs) = cli.timeout_secs {
            self.check_timeout_secs = secs;
            self.convert_timeout_secs = secs;
        }
        if let Some(level) = &cli.log_level {
            self.log_level = level.clone();
        }
        if let Some(file) = &cli.log_file {
            self.log_file = Some(file.clone());
        }
        if cli.no_color {
            self.theme = "plain".to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if parse_level(&self.log_level).is_none() {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }
        if crate::platform::ui::Theme::by_name(&self.theme).is_none() {
            return Err(ConfigError::InvalidTheme(self.theme.clone()));
        }
        for (field, value) in [
            ("connect_timeout_secs", self.connect_timeout_secs),
            ("check_timeout_secs", self.check_timeout_secs),
            ("convert_timeout_secs", self.convert_timeout_secs),
        ] {
            if value == 0 || value > MAX_TIMEOUT_SECS {
                return Err(ConfigError::InvalidTimeout {
                    field,
                    value,
                    max: MAX_TIMEOUT_SECS,
                });
            }
        }
        Ok(())
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.backend_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            check_timeout: Duration::from_secs(self.check_timeout_secs),
            convert_timeout: Duration::from_secs(self.convert_timeout_secs),
            max_pdf_bytes: self.max_pdf_mib.saturating_mul(1024 * 1024),
        }
    }

    pub fn log_settings(&self) -> Result<LogSettings, ConfigError> {
        let level = parse_level(&self.log_level)
            .ok_or_else(|| ConfigError::InvalidLogLevel(self.log_level.clone()))?;
        let destination = match (&self.log_file, self.log_to_terminal) {
            (Some(path), true) => LogDestination::Both(path.clone()),
            (Some(path), false) => LogDestination::File(path.clone()),
            (None, _) => LogDestination::Terminal,
        };
        Ok(LogSettings { level, destination })
    }

    /// Upper bound for one submission: both requests plus connection setup.
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_secs(
            self.check_timeout_secs
                .saturating_add(self.convert_timeout_secs)
                .saturating_add(self.connect_timeout_secs.saturating_mul(2)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn partial_ron_file_keeps_defaults() {
        let config = AppConfig::parse(r#"(backend_url: "http://pdf.internal:9000")"#).unwrap();
        assert_eq!(config.backend_url, "http://pdf.internal:9000");
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.check_timeout_secs, 30);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blog2pdf.ron");
        fs::write(&path, "(backend_url: 42").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("blog2pdf.ron"));
    }

    #[test]
    fn cli_flags_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blog2pdf.ron");
        fs::write(&path, r#"(backend_url: "http://a:1", log_level: "info")"#).unwrap();
        let cli = Cli::parse_from([
            "blog2pdf",
            "--config",
            path.to_str().unwrap(),
            "--backend",
            "http://b:2",
            "--timeout-secs",
            "5",
            "--no-color",
        ]);
        let config = AppConfig::resolve(&cli).unwrap();
        assert_eq!(config.backend_url, "http://b:2");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.check_timeout_secs, 5);
        assert_eq!(config.convert_timeout_secs, 5);
        assert_eq!(config.theme, "plain");
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let cli = Cli::parse_from(["blog2pdf", "--log-level", "chatty"]);
        assert!(matches!(
            AppConfig::resolve(&cli),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn oversized_timeout_is_rejected() {
        let cli = Cli::parse_from(["blog2pdf", "--timeout-secs", "18446744073709551615"]);
        match AppConfig::resolve(&cli) {
            Err(ConfigError::InvalidTimeout { field, value, max }) => {
                assert_eq!(field, "check_timeout_secs");
                assert_eq!(value, u64::MAX);
                assert_eq!(max, MAX_TIMEOUT_SECS);
            }
            other => panic!("expected InvalidTimeout, got {other:?}"),
        }
    }

    #[test]
    fn zero_timeout_in_file_is_rejected() {
        let config = AppConfig::parse("(connect_timeout_secs: 0)").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTimeout {
                field: "connect_timeout_secs",
                ..
            })
        ));
    }

    #[test]
    fn settle_timeout_saturates_instead_of_overflowing() {
        let config = AppConfig {
            connect_timeout_secs: u64::MAX,
            check_timeout_secs: u64::MAX,
            convert_timeout_secs: u64::MAX,
            ..AppConfig::default()
        };
        assert_eq!(config.settle_timeout(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn log_destination_follows_file_settings() {
        let mut config = AppConfig::default();
        assert_eq!(
            config.log_settings().unwrap().destination,
            LogDestination::Terminal
        );
        config.log_file = Some(PathBuf::from("blog2pdf.log"));
        assert_eq!(
            config.log_settings().unwrap().destination,
            LogDestination::File(PathBuf::from("blog2pdf.log"))
        );
        config.log_to_terminal = true;
        assert!(matches!(
            config.log_settings().unwrap().destination,
            LogDestination::Both(_)
        ));
    }

    #[test]
    fn backend_settings_convert_units() {
        let config = AppConfig {
            max_pdf_mib: 2,
            check_timeout_secs: 3,
            ..AppConfig::default()
        };
        let settings = config.backend_settings();
        assert_eq!(settings.max_pdf_bytes, 2 * 1024 * 1024);
        assert_eq!(settings.check_timeout, Duration::from_secs(3));
    }
}
