use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use taskform_engine::FetchSettings;
use taskform_logging::{parse_level, LogDestination};

use super::cli::Cli;

const DEFAULT_CONFIG_FILENAME: &str = "taskform.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub retry_delay_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_bytes: u64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            server_url: fetch.base_url,
            retry_delay_ms: 1000,
            connect_timeout_ms: fetch.connect_timeout.as_millis() as u64,
            request_timeout_ms: fetch.request_timeout.as_millis() as u64,
            max_bytes: fetch.max_bytes,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Loads `explicit`, or `./taskform.ron` if it exists, or the defaults.
    ///
    /// An explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = ron::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Command-line flags win over the file.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(server) = &cli.server {
            self.server_url = server.clone();
        }
        if let Some(log_file) = &cli.log_file {
            self.log_file = Some(log_file.clone());
        }
        if cli.verbose {
            self.log_level = "debug".to_string();
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.retry_delay_ms == 0 {
            bail!("retry_delay_ms must be greater than zero");
        }
        if parse_level(&self.log_level).is_none() {
            bail!("unknown log_level {:?}", self.log_level);
        }
        Ok(())
    }

    pub fn level(&self) -> LevelFilter {
        parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        }
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            base_url: self.server_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_bytes: self.max_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(text: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taskform.ron");
        fs::write(&path, text).unwrap();
        (dir, path)
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let (_dir, path) = write_config(r#"(server_url: "http://odm.lan:8000", retry_delay_ms: 250)"#);
        let config = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(config.server_url, "http://odm.lan:8000");
        assert_eq!(config.retry_delay(), Duration::from_millis(250));
        assert_eq!(config.request_timeout_ms, 30_000);
        assert_eq!(config.log_destination(), LogDestination::Terminal);
    }

    #[test]
    fn log_file_goes_to_both_destinations() {
        let (_dir, path) = write_config(r#"(log_file: Some("form.log"), log_level: "warn")"#);
        let config = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(
            config.log_destination(),
            LogDestination::Both(PathBuf::from("form.log"))
        );
        assert_eq!(config.level(), LevelFilter::Warn);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.ron"))).is_err());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let (_dir, path) = write_config("(retry_delay_ms: 0)");
        assert!(AppConfig::load(Some(&path)).is_err());

        let (_dir, path) = write_config(r#"(log_level: "chatty")"#);
        assert!(AppConfig::load(Some(&path)).is_err());

        let (_dir, path) = write_config("(server_url: 42)");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn cli_overrides_file() {
        let mut config = AppConfig::default();
        let cli = Cli {
            server: Some("http://other:9000".to_string()),
            verbose: true,
            ..Cli::default()
        };
        config.apply_cli(&cli);

        assert_eq!(config.fetch_settings().base_url, "http://other:9000");
        assert_eq!(config.level(), LevelFilter::Debug);
    }
}
