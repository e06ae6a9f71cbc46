//! LMN-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Top-level error type for the line monitor.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("[LMN-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[LMN-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[LMN-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[LMN-1101] unknown production line: {name}")]
    UnknownLine { name: String },

    #[error("[LMN-1102] unknown insight kind: {name}")]
    UnknownInsightKind { name: String },

    #[error("[LMN-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[LMN-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[LMN-3101] terminal failure: {source}")]
    Terminal {
        #[source]
        source: std::io::Error,
    },

    #[error("[LMN-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl MonitorError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "LMN-1001",
            Self::MissingConfig { .. } => "LMN-1002",
            Self::ConfigParse { .. } => "LMN-1003",
            Self::UnknownLine { .. } => "LMN-1101",
            Self::UnknownInsightKind { .. } => "LMN-1102",
            Self::Serialization { .. } => "LMN-2101",
            Self::Io { .. } => "LMN-3002",
            Self::Terminal { .. } => "LMN-3101",
            Self::Runtime { .. } => "LMN-3900",
        }
    }

    /// Whether retrying might resolve the failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Terminal { .. } | Self::Runtime { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for MonitorError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for MonitorError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
