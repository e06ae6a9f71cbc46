//! Derived batch metrics: progress, duration and weight.

#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::catalog::model::BatchChild;

/// Leading decimal number of a duration string such as `2.8h`.
static DURATION_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").ok());

/// Per-batch figures shown in the expanded batch cards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchMetrics {
    pub completed: usize,
    pub total: usize,
    pub progress_pct: u32,
    pub duration_hours: f64,
    pub weight_kg: f64,
}

impl BatchMetrics {
    #[must_use]
    pub fn derive(children: &[BatchChild]) -> Self {
        Self {
            completed: completed_count(children),
            total: children.len(),
            progress_pct: progress_pct(children),
            duration_hours: total_duration(children),
            weight_kg: total_weight(children),
        }
    }
}

#[must_use]
pub fn completed_count(children: &[BatchChild]) -> usize {
    children.iter().filter(|child| child.is_completed()).count()
}

/// `round(100 * completed / total)`, `0` for a batch without children.
#[must_use]
pub fn progress_pct(children: &[BatchChild]) -> u32 {
    if children.is_empty() {
        return 0;
    }
    let ratio = completed_count(children) as f64 / children.len() as f64;
    (ratio * 100.0).round() as u32
}

/// Hours in a duration label. Trailing `h` is dropped and the leading number
/// is parsed; anything unparseable counts as zero.
#[must_use]
pub fn parse_duration_hours(raw: &str) -> f64 {
    let stripped = raw.trim().trim_end_matches(['h', 'H']);
    let Some(pattern) = DURATION_PREFIX.as_ref() else {
        return stripped.trim().parse().unwrap_or(0.0);
    };
    pattern
        .find(stripped)
        .and_then(|prefix| prefix.as_str().trim().parse::<f64>().ok())
        .filter(|hours| hours.is_finite())
        .unwrap_or(0.0)
}

#[must_use]
pub fn total_duration(children: &[BatchChild]) -> f64 {
    children
        .iter()
        .map(|child| child.time.as_deref().map_or(0.0, parse_duration_hours))
        .sum()
}

#[must_use]
pub fn total_weight(children: &[BatchChild]) -> f64 {
    children.iter().map(|child| child.weight.unwrap_or(0.0)).sum()
}
