//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analytics::grouping::ViewMode;
use crate::catalog::model::ProductionLine;
use crate::core::errors::{MonitorError, Result};

/// Upper bound for the simulated insight latency.
const MAX_INSIGHT_DELAY_MS: u64 = 60_000;

/// Full line monitor configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
}

/// Interactive dashboard behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Production line shown on startup.
    pub start_line: ProductionLine,
    /// Initial layout of the production line overview.
    pub start_view_mode: ViewMode,
    /// Simulated latency before a requested insight is shown.
    pub insight_delay_ms: u64,
    /// Input poll / redraw interval.
    pub tick_ms: u64,
    /// Engineer name shown in the header.
    pub engineer: String,
}

/// JSONL activity log settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub jsonl_path: PathBuf,
    /// Mirror log lines to stderr when the primary file cannot be written.
    /// Off by default because stderr shares the dashboard's terminal.
    pub fallback_to_stderr: bool,
}

/// Filesystem paths used by lmon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            start_line: ProductionLine::Palletizing,
            start_view_mode: ViewMode::Workflow,
            insight_delay_ms: 1_500,
            tick_ms: 250,
            engineer: "An Nguyễn".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            jsonl_path: data_dir().join("activity.jsonl"),
            fallback_to_stderr: false,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            config_file: home_dir().join(".config").join("lmon").join("config.toml"),
        }
    }
}

fn home_dir() -> PathBuf {
    env::var_os("HOME").map_or_else(
        || {
            eprintln!("[LMON-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths");
            PathBuf::from("/tmp")
        },
        PathBuf::from,
    )
}

fn data_dir() -> PathBuf {
    home_dir().join(".local").join("share").join("lmon")
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, env_var)
    }

    /// Same as [`Config::load`] with an injectable environment lookup.
    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| MonitorError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(MonitorError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(lookup)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for logging.
    ///
    /// FNV-1a over the canonical JSON form, stable across processes.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("LMON_DASHBOARD_START_LINE") {
            self.dashboard.start_line =
                raw.parse::<ProductionLine>()
                    .map_err(|error| MonitorError::ConfigParse {
                        context: "env",
                        details: format!("LMON_DASHBOARD_START_LINE={raw:?}: {error}"),
                    })?;
        }

        if let Some(raw) = lookup("LMON_DASHBOARD_START_VIEW_MODE") {
            self.dashboard.start_view_mode =
                raw.parse::<ViewMode>()
                    .map_err(|error| MonitorError::ConfigParse {
                        context: "env",
                        details: format!("LMON_DASHBOARD_START_VIEW_MODE={raw:?}: {error}"),
                    })?;
        }

        if let Some(raw) = lookup("LMON_DASHBOARD_INSIGHT_DELAY_MS") {
            self.dashboard.insight_delay_ms =
                parse_env_u64("LMON_DASHBOARD_INSIGHT_DELAY_MS", &raw)?;
        }

        if let Some(raw) = lookup("LMON_DASHBOARD_TICK_MS") {
            self.dashboard.tick_ms = parse_env_u64("LMON_DASHBOARD_TICK_MS", &raw)?;
        }

        if let Some(raw) = lookup("LMON_DASHBOARD_ENGINEER") {
            self.dashboard.engineer = raw;
        }

        if let Some(raw) = lookup("LMON_LOGGING_ENABLED") {
            self.logging.enabled = parse_env_bool("LMON_LOGGING_ENABLED", &raw)?;
        }

        if let Some(raw) = lookup("LMON_LOGGING_JSONL_PATH") {
            self.logging.jsonl_path = PathBuf::from(raw);
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.dashboard.insight_delay_ms > MAX_INSIGHT_DELAY_MS {
            return Err(MonitorError::InvalidConfig {
                details: format!(
                    "dashboard.insight_delay_ms must be <= {MAX_INSIGHT_DELAY_MS}, got {}",
                    self.dashboard.insight_delay_ms
                ),
            });
        }

        if !(10..=5_000).contains(&self.dashboard.tick_ms) {
            return Err(MonitorError::InvalidConfig {
                details: format!(
                    "dashboard.tick_ms must be in [10, 5000], got {}",
                    self.dashboard.tick_ms
                ),
            });
        }

        if self.dashboard.engineer.trim().is_empty() {
            return Err(MonitorError::InvalidConfig {
                details: "dashboard.engineer must not be empty".to_string(),
            });
        }

        if self.logging.enabled && self.logging.jsonl_path.as_os_str().is_empty() {
            return Err(MonitorError::InvalidConfig {
                details: "logging.jsonl_path must be set when logging.enabled=true".to_string(),
            });
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_u64(name: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|error| MonitorError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    raw.trim()
        .parse::<bool>()
        .map_err(|error| MonitorError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

#[cfg(test)]
mod tests {
    use super::{Config, MonitorError};
    use crate::analytics::grouping::ViewMode;
    use crate::catalog::model::ProductionLine;
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::PathBuf;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.dashboard.insight_delay_ms, 1_500);
        assert_eq!(cfg.dashboard.start_line, ProductionLine::Palletizing);
    }

    #[test]
    fn excessive_insight_delay_rejected() {
        let mut cfg = Config::default();
        cfg.dashboard.insight_delay_ms = 120_000;
        let err = cfg.validate().expect_err("expected invalid delay");
        assert!(err.to_string().contains("insight_delay_ms"));
    }

    #[test]
    fn tick_out_of_range_rejected() {
        let mut cfg = Config::default();
        cfg.dashboard.tick_ms = 0;
        let err = cfg.validate().expect_err("expected invalid tick");
        match err {
            MonitorError::InvalidConfig { details } => assert!(details.contains("tick_ms")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_engineer_rejected() {
        let mut cfg = Config::default();
        cfg.dashboard.engineer = "   ".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn stable_hash_changes_when_config_changes() {
        let cfg = Config::default();
        let hash_before = cfg.stable_hash().expect("hash should compute");
        let mut modified = Config::default();
        modified.dashboard.tick_ms += 1;
        let hash_after = modified.stable_hash().expect("hash should compute");
        assert_ne!(hash_before, hash_after);
        assert_eq!(hash_before.len(), 16);
    }

    #[test]
    fn env_overrides_apply() {
        let mut cfg = Config::default();
        let overrides = vars(&[
            ("LMON_DASHBOARD_START_LINE", "welding"),
            ("LMON_DASHBOARD_START_VIEW_MODE", "category"),
            ("LMON_DASHBOARD_INSIGHT_DELAY_MS", "250"),
            ("LMON_DASHBOARD_ENGINEER", "Bình Trần"),
            ("LMON_LOGGING_ENABLED", "false"),
            ("LMON_LOGGING_JSONL_PATH", "/tmp/lmon/custom.jsonl"),
        ]);
        cfg.apply_env_overrides_from(|name| overrides.get(name).cloned())
            .expect("env overrides should parse");
        assert_eq!(cfg.dashboard.start_line, ProductionLine::Welding);
        assert_eq!(cfg.dashboard.start_view_mode, ViewMode::Category);
        assert_eq!(cfg.dashboard.insight_delay_ms, 250);
        assert_eq!(cfg.dashboard.engineer, "Bình Trần");
        assert!(!cfg.logging.enabled);
        assert_eq!(
            cfg.logging.jsonl_path,
            PathBuf::from("/tmp/lmon/custom.jsonl")
        );
    }

    #[test]
    fn env_invalid_line_rejected() {
        let mut cfg = Config::default();
        let overrides = vars(&[("LMON_DASHBOARD_START_LINE", "painting")]);
        let err = cfg
            .apply_env_overrides_from(|name| overrides.get(name).cloned())
            .expect_err("unknown line should fail");
        assert_eq!(err.code(), "LMN-1003");
    }

    #[test]
    fn env_invalid_boolean_rejected() {
        let mut cfg = Config::default();
        let overrides = vars(&[("LMON_LOGGING_ENABLED", "yes-please")]);
        let err = cfg
            .apply_env_overrides_from(|name| overrides.get(name).cloned())
            .expect_err("invalid boolean should fail");
        assert!(err.to_string().contains("LMON_LOGGING_ENABLED"));
    }

    #[test]
    fn load_from_explicit_toml_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            "[dashboard]\nstart_line = \"welding\"\ninsight_delay_ms = 900\n\n[logging]\nenabled = false\n"
        )
        .expect("write config");

        let cfg = Config::load_with_env(Some(file.path()), |_| None).expect("config loads");
        assert_eq!(cfg.dashboard.start_line, ProductionLine::Welding);
        assert_eq!(cfg.dashboard.insight_delay_ms, 900);
        assert_eq!(cfg.dashboard.tick_ms, 250);
        assert!(!cfg.logging.enabled);
        assert_eq!(cfg.paths.config_file, file.path());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.toml");
        let err = Config::load_with_env(Some(&path), |_| None).expect_err("must fail");
        assert_eq!(err.code(), "LMN-1002");
    }

    #[test]
    fn malformed_toml_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[dashboard\nstart_line = ").expect("write config");
        let err = Config::load_with_env(Some(file.path()), |_| None).expect_err("must fail");
        assert_eq!(err.code(), "LMN-1003");
    }
}
