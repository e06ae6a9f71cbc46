//! Fixed-template insight text for machines, batches and case studies.
//!
//! Output is a pure function of the bundle, the target id and the injected
//! RNG. Only decorative figures (machine efficiency, case ROI) are random.

#![allow(missing_docs)]

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::analytics::oee;
use crate::catalog::model::{LineBundle, Machine, StatusLevel};
use crate::core::errors::MonitorError;

pub const MACHINE_NOT_FOUND: &str = "Không tìm thấy dữ liệu máy.";
pub const BATCH_NOT_FOUND: &str = "Không tìm thấy dữ liệu batch.";
pub const CASE_NOT_FOUND: &str = "Case study not found.";

/// Characters of the problem statement quoted in a case insight.
const PROBLEM_EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Machine,
    Batch,
    Case,
}

impl InsightKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Machine => "machine",
            Self::Batch => "batch",
            Self::Case => "case",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = MonitorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "machine" => Ok(Self::Machine),
            "batch" => Ok(Self::Batch),
            "case" => Ok(Self::Case),
            _ => Err(MonitorError::UnknownInsightKind {
                name: raw.to_string(),
            }),
        }
    }
}

/// Build the insight text for `context_id`. Lookup misses return a
/// not-found sentence instead of failing.
pub fn generate<R: Rng + ?Sized>(
    kind: InsightKind,
    context_id: &str,
    bundle: &LineBundle,
    rng: &mut R,
) -> String {
    match kind {
        InsightKind::Machine => machine_insight(bundle, context_id, rng),
        InsightKind::Batch => batch_insight(bundle, context_id),
        InsightKind::Case => case_insight(bundle, context_id, rng),
    }
}

/// First numeric reading below 50, read as a power draw. Zero counts as absent.
#[must_use]
pub fn power_reading(machine: &Machine) -> Option<f64> {
    machine
        .numeric_values()
        .find(|value| *value < 50.0)
        .filter(|value| *value != 0.0)
}

/// First numeric reading strictly between 20 and 100, read as a temperature.
#[must_use]
pub fn temperature_reading(machine: &Machine) -> Option<f64> {
    machine
        .numeric_values()
        .find(|value| *value > 20.0 && *value < 100.0)
}

fn or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |value| value.to_string())
}

fn machine_insight<R: Rng + ?Sized>(bundle: &LineBundle, id: &str, rng: &mut R) -> String {
    let Some(machine) = bundle.machine(id) else {
        return MACHINE_NOT_FOUND.to_string();
    };
    let status = if machine.status == StatusLevel::Ok {
        "Hoạt động bình thường"
    } else {
        "Cần chú ý"
    };
    let recommendation = if machine.status == StatusLevel::Warning {
        "Lên lịch bảo trì trong 24h tới"
    } else {
        "Duy trì operating parameters hiện tại"
    };
    let efficiency: f64 = rng.random_range(90.0..100.0);

    let mut out = String::new();
    let _ = writeln!(out, "🔧 Machine: {}", machine.name);
    let _ = writeln!(out, "📊 Status: {status}");
    let _ = writeln!(out, "⚡ Power: {}kW", or_na(power_reading(machine)));
    let _ = writeln!(
        out,
        "🌡️ Temperature: {}°C",
        or_na(temperature_reading(machine))
    );
    let _ = writeln!(out, "🎯 Efficiency: {efficiency:.1}%");
    let _ = write!(out, "💡 Recommendation: {recommendation}");
    out
}

fn batch_insight(bundle: &LineBundle, id: &str) -> String {
    let Some(batch) = bundle.record(id) else {
        return BATCH_NOT_FOUND.to_string();
    };
    let next_action = if batch.is_completed() {
        "Quality audit and packaging"
    } else {
        "Monitor real-time progress"
    };

    let mut out = String::new();
    let _ = writeln!(out, "📋 Batch Analysis: {}", batch.id);
    let _ = writeln!(out, "🎯 Model: {}", batch.model);
    let _ = writeln!(out, "👨‍🔧 Operator: {}", batch.operator);
    let _ = writeln!(out, "📊 OEE: {}% ({})", batch.oee, oee::rating(batch.oee));
    let _ = writeln!(out, "⏱️ Timeline: {}", batch.timeline(" - "));
    let _ = writeln!(out, "📦 Quantity: {} units", batch.quantity);
    let _ = writeln!(out, "🔍 AI Summary: {}", batch.ai_summary);
    let _ = write!(out, "💡 Next Action: {next_action}");
    out
}

fn case_insight<R: Rng + ?Sized>(bundle: &LineBundle, id: &str, rng: &mut R) -> String {
    let Some(case) = bundle.case(id) else {
        return CASE_NOT_FOUND.to_string();
    };
    let excerpt: String = case.problem.chars().take(PROBLEM_EXCERPT_CHARS).collect();
    let lesson = case
        .lessons
        .as_ref()
        .and_then(|lessons| lessons.first())
        .map_or("No specific lessons documented", String::as_str);
    let improvement = case
        .solution
        .oee_impact
        .improvement
        .as_deref()
        .unwrap_or("N/A");
    let duration = case
        .solution
        .implementation
        .as_ref()
        .map_or("Not specified", |implementation| {
            implementation.duration.as_str()
        });
    let roi_hours: u32 = rng.random_range(12..60);

    let mut out = String::new();
    let _ = writeln!(out, "📚 Case Study Deep Dive: {}", case.title);
    let _ = writeln!(
        out,
        "🎯 Impact Level: {} severity, {} impact",
        case.severity, case.impact
    );
    let _ = writeln!(out, "🔍 Problem: {excerpt}...");
    let _ = writeln!(out, "💡 Key Learning: {lesson}");
    let _ = writeln!(out, "📈 OEE Improvement: {improvement}");
    let _ = writeln!(out, "🔧 Quick Action: {}", case.solution.immediate_action);
    let _ = writeln!(out, "📅 Implementation Time: {duration}");
    let _ = writeln!(out, "💰 ROI: Achieved in {roi_hours} hours");
    let _ = write!(
        out,
        "🎓 Recommendation: Apply similar methodology to prevent related issues"
    );
    out
}
