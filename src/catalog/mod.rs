//! Compiled-in plant data, one table module per production line.
//!
//! Bundles are built once on first access and shared as `&'static` references.
//! Adding a line means adding a [`ProductionLine`] variant and a table module.

pub mod model;
mod palletizing;
mod welding;

use std::sync::LazyLock;

use self::model::{
    BatchChild, LineBundle, Machine, Metric, MetricValue, OeeTrendPoint, ProductionLine,
    StatusLevel,
};

static PALLETIZING: LazyLock<LineBundle> = LazyLock::new(palletizing::bundle);
static WELDING: LazyLock<LineBundle> = LazyLock::new(welding::bundle);

/// Static data bundle for a production line.
#[must_use]
pub fn bundle(line: ProductionLine) -> &'static LineBundle {
    match line {
        ProductionLine::Palletizing => &PALLETIZING,
        ProductionLine::Welding => &WELDING,
    }
}

// ──────────────────── table builders ────────────────────

fn machine(
    id: &str,
    name: &str,
    category: &str,
    status: StatusLevel,
    metrics: &[(&str, f64)],
) -> Machine {
    Machine {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        status,
        metrics: metrics
            .iter()
            .map(|(key, value)| Metric {
                key: (*key).to_string(),
                value: MetricValue::Number(*value),
            })
            .collect(),
    }
}

fn child(id: &str, details: &str, status: &str, weight: f64, time: &str) -> BatchChild {
    BatchChild {
        id: id.to_string(),
        details: details.to_string(),
        status: status.to_string(),
        weight: Some(weight),
        time: Some(time.to_string()),
    }
}

fn trend(name: &str, oee: f64, availability: f64, performance: f64, quality: f64) -> OeeTrendPoint {
    OeeTrendPoint {
        name: name.to_string(),
        oee,
        availability: Some(availability),
        performance: Some(performance),
        quality: Some(quality),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}
