//! JSONL activity log: append-only line-delimited JSON for dashboard sessions.
//!
//! Each line is a self-contained JSON object. Lines are assembled in memory and
//! written with a single `write_all` so a concurrent `tail -f` never sees a
//! partial record.
//!
//! Three-level fallback chain:
//! 1. Primary file path
//! 2. stderr with `[LMON-JSONL]` prefix (only when enabled, since stderr
//!    shares the dashboard's terminal)
//! 3. Silent discard (the dashboard must never crash for logging failures)

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions, rename};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::model::ProductionLine;
use crate::core::config::LoggingConfig;
use crate::core::errors::{MonitorError, Result};
use crate::insight::InsightKind;

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Activity event types emitted by the dashboard and CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SessionStart,
    SessionEnd,
    LineSwitch,
    MachineSelect,
    BatchToggle,
    CaseSelect,
    Search,
    InsightRequested,
    InsightReady,
    InsightSuperseded,
    ConfigLoaded,
    Error,
}

/// What happened, without a timestamp. The pure update function produces
/// these; the runtime stamps and writes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub event: EventType,
    pub severity: Severity,
    pub line: Option<ProductionLine>,
    pub target: Option<String>,
    pub insight_kind: Option<InsightKind>,
    pub ticket: Option<u64>,
    pub details: Option<String>,
}

impl ActivityRecord {
    #[must_use]
    pub const fn new(event: EventType, line: ProductionLine) -> Self {
        Self {
            event,
            severity: Severity::Info,
            line: Some(line),
            target: None,
            insight_kind: None,
            ticket: None,
            details: None,
        }
    }

    #[must_use]
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub const fn insight(mut self, kind: InsightKind, ticket: u64) -> Self {
        self.insight_kind = Some(kind);
        self.ticket = Some(ticket);
        self
    }

    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    #[must_use]
    pub const fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// A single JSONL log entry. All fields optional except `ts`, `event`, `severity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    /// Production line in view when the event happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<ProductionLine>,
    /// Machine, batch or case id the event refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight_kind: Option<InsightKind>,
    /// Insight request ticket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<u64>,
    /// LMN error code if something failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Freeform details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    #[must_use]
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            line: None,
            target: None,
            insight_kind: None,
            ticket: None,
            error_code: None,
            error_message: None,
            details: None,
        }
    }

    /// Stamp an activity record with the current time.
    #[must_use]
    pub fn from_record(record: ActivityRecord) -> Self {
        Self {
            line: record.line,
            target: record.target,
            insight_kind: record.insight_kind,
            ticket: record.ticket,
            details: record.details,
            ..Self::new(record.event, record.severity)
        }
    }

    /// Error entry carrying the stable code of `error`. Transient failures
    /// log as warnings, everything else as critical.
    #[must_use]
    pub fn from_error(error: &MonitorError) -> Self {
        let severity = if error.is_retryable() {
            Severity::Warning
        } else {
            Severity::Critical
        };
        Self {
            error_code: Some(error.code().to_string()),
            error_message: Some(error.to_string()),
            ..Self::new(EventType::Error, severity)
        }
    }
}

/// Degradation state of the JSONL writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    /// Writing to primary path.
    Normal,
    /// Primary failed, writing to stderr.
    Stderr,
    /// Everything failed (or logging is off), silently discarding.
    Discard,
}

/// Configuration for the JSONL writer.
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    /// Primary log file path.
    pub path: PathBuf,
    /// Mirror to stderr when the primary path fails.
    pub fallback_to_stderr: bool,
    /// Maximum file size before rotation (bytes). Default: 10 MiB.
    pub max_size_bytes: u64,
    /// Number of rotated files to keep. Default: 3.
    pub max_rotated_files: u32,
}

impl JsonlConfig {
    #[must_use]
    pub fn from_logging(logging: &LoggingConfig) -> Self {
        Self {
            path: logging.jsonl_path.clone(),
            fallback_to_stderr: logging.fallback_to_stderr,
            ..Self::default()
        }
    }
}

impl Default for JsonlConfig {
    fn default() -> Self {
        Self {
            path: LoggingConfig::default().jsonl_path,
            fallback_to_stderr: false,
            max_size_bytes: 10 * 1024 * 1024,
            max_rotated_files: 3,
        }
    }
}

/// Append-only JSONL log writer with rotation and a stderr fallback.
pub struct JsonlWriter {
    config: JsonlConfig,
    writer: Option<BufWriter<File>>,
    state: WriterState,
    bytes_written: u64,
}

impl JsonlWriter {
    /// Open the JSONL log file. Falls through the degradation chain on failure.
    #[must_use]
    pub fn open(config: JsonlConfig) -> Self {
        let mut w = Self {
            config,
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
        };
        w.try_open_primary();
        w
    }

    /// A writer that drops everything (logging disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            config: JsonlConfig::default(),
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
        }
    }

    /// Writer for the configured logging section.
    #[must_use]
    pub fn from_logging(logging: &LoggingConfig) -> Self {
        if logging.enabled {
            Self::open(JsonlConfig::from_logging(logging))
        } else {
            Self::disabled()
        }
    }

    /// Write a single log entry as one JSONL line.
    pub fn write_entry(&mut self, entry: &LogEntry) {
        let line = match serde_json::to_string(entry) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                if self.config.fallback_to_stderr {
                    let _ = writeln!(io::stderr(), "[LMON-JSONL] serialize error: {e}");
                }
                return;
            }
        };

        self.write_line(&line);
    }

    /// Stamp and write an activity record.
    pub fn record(&mut self, record: ActivityRecord) {
        self.write_entry(&LogEntry::from_record(record));
    }

    /// Flush buffers.
    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
    }

    /// Current degradation state.
    #[must_use]
    pub const fn state(&self) -> &str {
        match self.state {
            WriterState::Normal => "normal",
            WriterState::Stderr => "stderr",
            WriterState::Discard => "discard",
        }
    }

    // ──────────────────────── internals ────────────────────────

    fn write_line(&mut self, line: &str) {
        if self.bytes_written + line.len() as u64 > self.config.max_size_bytes
            && self.state == WriterState::Normal
        {
            self.rotate();
        }

        match self.state {
            WriterState::Normal => {
                if let Some(w) = self.writer.as_mut() {
                    if w.write_all(line.as_bytes()).and_then(|()| w.flush()).is_err() {
                        self.degrade();
                        self.write_line(line); // retry at next level
                        return;
                    }
                    self.bytes_written += line.len() as u64;
                } else {
                    self.degrade();
                    self.write_line(line);
                }
            }
            WriterState::Stderr => {
                let _ = write!(io::stderr(), "[LMON-JSONL] {line}");
            }
            WriterState::Discard => {}
        }
    }

    fn try_open_primary(&mut self) {
        match open_append(&self.config.path) {
            Ok((file, size)) => {
                self.writer = Some(BufWriter::with_capacity(16 * 1024, file));
                self.state = WriterState::Normal;
                self.bytes_written = size;
            }
            Err(_) => self.fall_back(),
        }
    }

    fn fall_back(&mut self) {
        self.writer = None;
        if self.config.fallback_to_stderr {
            self.state = WriterState::Stderr;
            let _ = writeln!(
                io::stderr(),
                "[LMON-JSONL] primary path failed, using stderr: {}",
                self.config.path.display()
            );
        } else {
            self.state = WriterState::Discard;
        }
    }

    fn degrade(&mut self) {
        match self.state {
            WriterState::Normal => self.fall_back(),
            WriterState::Stderr | WriterState::Discard => {
                self.writer = None;
                self.state = WriterState::Discard;
            }
        }
    }

    fn rotate(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
        self.writer = None;

        let base = self.config.path.clone();

        // Shift existing rotations: .2→.3, .1→.2, current→.1
        for i in (1..self.config.max_rotated_files).rev() {
            let _ = rename(rotated_name(&base, i), rotated_name(&base, i + 1));
        }
        let _ = rename(&base, rotated_name(&base, 1));

        match open_append(&base) {
            Ok((file, _)) => {
                self.writer = Some(BufWriter::with_capacity(16 * 1024, file));
                self.bytes_written = 0;
            }
            Err(_) => self.degrade(),
        }
    }
}

impl Drop for JsonlWriter {
    fn drop(&mut self) {
        self.flush();
    }
}

// ──────────────────────── helpers ────────────────────────

/// Open or create a file for appending. Returns `(File, current_size)`.
fn open_append(path: &Path) -> Result<(File, u64)> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| MonitorError::io(parent, source))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| MonitorError::io(path, source))?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    Ok((file, size))
}

/// Build a rotated filename: `foo.jsonl` → `foo.jsonl.3`.
fn rotated_name(base: &Path, index: u32) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

/// Format current UTC time as ISO 8601.
fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ──────────────────────── tests ────────────────────────
