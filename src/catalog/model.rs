//! Plain data types for production lines, machines, batches and case studies.
//!
//! Everything here is immutable once loaded. Panels hold `&'static LineBundle`
//! references and derive display values on demand.

#![allow(missing_docs)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::MonitorError;

/// Batch/child status string for finished work.
pub const STATUS_COMPLETED: &str = "Hoàn thành";
/// Batch/child status string for work in progress.
pub const STATUS_IN_PROGRESS: &str = "Đang xử lý";
/// Batch status string for scheduled work.
pub const STATUS_SCHEDULED: &str = "Lên lịch";
/// Child status string for queued work.
pub const STATUS_WAITING: &str = "Chờ";

// ──────────────────── production lines ────────────────────

/// Production lines known to the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductionLine {
    #[default]
    Palletizing,
    Welding,
}

impl ProductionLine {
    /// All lines in tab order.
    pub const ALL: [Self; 2] = [Self::Palletizing, Self::Welding];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Palletizing => "palletizing",
            Self::Welding => "welding",
        }
    }

    /// Tab title shown in the dashboard header.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Palletizing => "Dây chuyền Palletizing",
            Self::Welding => "Dây chuyền Hàn Robot",
        }
    }

    /// 1-based tab number for hotkey mapping.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Palletizing => 1,
            Self::Welding => 2,
        }
    }

    /// Resolve a 1-based number key to a line. Returns `None` for out-of-range.
    #[must_use]
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Palletizing),
            2 => Some(Self::Welding),
            _ => None,
        }
    }

    /// Next line in tab order, wrapping.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Palletizing => Self::Welding,
            Self::Welding => Self::Palletizing,
        }
    }
}

impl fmt::Display for ProductionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductionLine {
    type Err = MonitorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "palletizing" | "pallet" | "1" => Ok(Self::Palletizing),
            "welding" | "weld" | "2" => Ok(Self::Welding),
            _ => Err(MonitorError::UnknownLine {
                name: raw.to_string(),
            }),
        }
    }
}

// ──────────────────── status ────────────────────

/// Three-level health status shared by machines, batches and batch children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    #[default]
    Ok,
    Warning,
    Error,
}

impl StatusLevel {
    /// Badge label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "Online",
            Self::Warning => "Cảnh báo",
            Self::Error => "Lỗi",
        }
    }

    /// Map a batch or child progress string onto a status level.
    ///
    /// Completed work is `Ok`, work in progress is `Warning`, and anything
    /// else (scheduled, waiting, unknown) is `Error`.
    #[must_use]
    pub fn from_progress_label(status: &str) -> Self {
        match status {
            STATUS_COMPLETED => Self::Ok,
            STATUS_IN_PROGRESS => Self::Warning,
            _ => Self::Error,
        }
    }
}

// ──────────────────── machines ────────────────────

/// A metric reading: most are numeric, a few tables carry free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

/// One named metric. Order inside [`Machine::metrics`] is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub key: String,
    pub value: MetricValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub id: String,
    pub name: String,
    pub category: String,
    pub status: StatusLevel,
    pub metrics: Vec<Metric>,
}

impl Machine {
    /// Numeric metric values in table order.
    pub fn numeric_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.metrics.iter().filter_map(|metric| metric.value.as_number())
    }
}

// ──────────────────── batches ────────────────────

/// A sub-unit of a batch (pallet, rack).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchChild {
    pub id: String,
    pub details: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl BatchChild {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecord {
    pub id: String,
    pub model: String,
    pub shift: u8,
    pub quantity: u32,
    pub status: String,
    pub oee: f64,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub ai_summary: String,
    #[serde(default)]
    pub children: Vec<BatchChild>,
}

impl BatchRecord {
    #[must_use]
    pub fn status_level(&self) -> StatusLevel {
        StatusLevel::from_progress_label(&self.status)
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }

    /// `start - end` with empty strings for missing bounds.
    #[must_use]
    pub fn timeline(&self, separator: &str) -> String {
        format!(
            "{}{separator}{}",
            self.start_time.as_deref().unwrap_or(""),
            self.end_time.as_deref().unwrap_or("")
        )
    }
}

// ──────────────────── trend ────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OeeTrendPoint {
    pub name: String,
    pub oee: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
}

// ──────────────────── case studies ────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseAnalysis {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methodology: Option<String>,
    pub findings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Implementation {
    pub duration: String,
    pub resources: String,
    pub cost: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OeeImpact {
    pub before: f64,
    pub after: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSolution {
    pub title: String,
    pub immediate_action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preventive_action: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<Implementation>,
    pub outcome: String,
    pub oee_impact: OeeImpact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    pub id: String,
    pub title: String,
    pub tags: Vec<String>,
    /// `High`, `Medium` or `Low` in the shipped data; other values render as info.
    pub severity: String,
    pub impact: String,
    pub problem: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<Vec<String>>,
    pub analysis: CaseAnalysis,
    pub solution: CaseSolution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lessons: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
}

// ──────────────────── bundle ────────────────────

/// Everything the dashboard shows for one production line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineBundle {
    pub line: ProductionLine,
    pub title: String,
    pub machines: Vec<Machine>,
    pub records: Vec<BatchRecord>,
    pub trend: Vec<OeeTrendPoint>,
    pub cases: Vec<CaseStudy>,
}

impl LineBundle {
    #[must_use]
    pub fn machine(&self, id: &str) -> Option<&Machine> {
        self.machines.iter().find(|machine| machine.id == id)
    }

    #[must_use]
    pub fn record(&self, id: &str) -> Option<&BatchRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    #[must_use]
    pub fn case(&self, id: &str) -> Option<&CaseStudy> {
        self.cases.iter().find(|case| case.id == id)
    }
}
