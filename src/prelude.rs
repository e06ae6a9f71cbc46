//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use line_monitor::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, DashboardConfig, LoggingConfig};
pub use crate::core::errors::{MonitorError, Result};

// Catalog
pub use crate::catalog::bundle;
pub use crate::catalog::model::{
    BatchChild, BatchRecord, CaseStudy, LineBundle, Machine, MetricValue, ProductionLine,
    StatusLevel,
};

// Analytics
pub use crate::analytics::batch::{BatchMetrics, progress_pct, total_weight};
pub use crate::analytics::grouping::{ViewMode, group_by_category};
pub use crate::analytics::knowledge::filter_cases;
pub use crate::analytics::oee::{OeeSummary, overall_oee};

// Insight
pub use crate::insight::{InsightKind, InsightSlot, TicketCounter, generate};

// Logging
pub use crate::logger::jsonl::{ActivityRecord, EventType, JsonlWriter};
