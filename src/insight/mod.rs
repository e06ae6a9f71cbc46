//! Canned "AI insight" reports and their delayed-delivery slots.

pub mod generator;
pub mod slot;

pub use generator::{InsightKind, generate};
pub use slot::{InsightSlot, TicketCounter};

/// Default simulated analysis latency, in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 1_500;

/// Shown while a request is pending.
pub const LOADING_LABEL: &str = "Đang phân tích...";

/// Heading above a finished report.
pub const REPORT_HEADING: &str = "💡 AI Analysis Report";

/// Trigger label for an insight target.
#[must_use]
pub fn trigger_label(kind: InsightKind, subject: &str) -> String {
    match kind {
        InsightKind::Machine => format!("Phân tích AI cho {subject}"),
        InsightKind::Batch => format!("Phân tích Batch {subject}"),
        InsightKind::Case => format!("AI Analysis for Case {subject}"),
    }
}
