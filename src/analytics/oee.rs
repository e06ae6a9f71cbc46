//! OEE derivations for the summary panel and batch ratings.

#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss)]

use serde::Serialize;

use crate::catalog::model::{BatchRecord, OeeTrendPoint};

/// Fixed y-axis domain of the OEE trend chart (percent).
pub const CHART_DOMAIN: (f64, f64) = (80.0, 95.0);

/// Availability / performance / quality of the latest trend point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OeeSplit {
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
}

/// Everything the summary panel shows, derived from a line's data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OeeSummary {
    pub overall: f64,
    pub current: OeeSplit,
    pub points: usize,
}

impl OeeSummary {
    #[must_use]
    pub fn derive(records: &[BatchRecord], trend: &[OeeTrendPoint]) -> Self {
        Self {
            overall: overall_oee(records),
            current: current_split(trend),
            points: trend.len(),
        }
    }
}

/// Mean OEE over batches that have started (`oee > 0`). `0.0` when none have.
#[must_use]
pub fn overall_oee(records: &[BatchRecord]) -> f64 {
    let (sum, count) = records
        .iter()
        .filter(|record| record.oee > 0.0)
        .fold((0.0, 0_usize), |(sum, count), record| {
            (sum + record.oee, count + 1)
        });
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Split of the most recent trend point; missing sub-metrics read as zero.
#[must_use]
pub fn current_split(trend: &[OeeTrendPoint]) -> OeeSplit {
    trend.last().map_or_else(OeeSplit::default, |point| OeeSplit {
        availability: point.availability.unwrap_or(0.0),
        performance: point.performance.unwrap_or(0.0),
        quality: point.quality.unwrap_or(0.0),
    })
}

/// Qualitative band for a batch OEE.
#[must_use]
pub fn rating(oee: f64) -> &'static str {
    if oee > 85.0 {
        "Excellent"
    } else if oee > 80.0 {
        "Good"
    } else {
        "Needs Improvement"
    }
}
