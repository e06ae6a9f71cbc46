//! Metric key presentation: units, titles and value formatting.

use crate::catalog::model::MetricValue;

/// Known metric keys and their units.
const UNIT_TABLE: [(&str, &str); 4] = [
    ("temp", "°C"),
    ("tempIn", "°C"),
    ("tempOut", "°C"),
    ("power", "kW"),
];

/// Unit suffix for a metric key. Unknown keys fall back to a substring match
/// on `temp` and `power`; anything else is unitless.
#[must_use]
pub fn unit_for_key(key: &str) -> &'static str {
    UNIT_TABLE
        .iter()
        .find(|(known, _)| *known == key)
        .map_or_else(|| heuristic_unit(key), |(_, unit)| *unit)
}

fn heuristic_unit(key: &str) -> &'static str {
    if key.contains("temp") {
        "°C"
    } else if key.contains("power") {
        "kW"
    } else {
        ""
    }
}

/// Key with its first character upper-cased (`readRate` → `ReadRate`).
#[must_use]
pub fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Numbers with a fixed number of decimals, text verbatim.
#[must_use]
pub fn format_value(value: &MetricValue, decimals: usize) -> String {
    match value {
        MetricValue::Number(number) => format!("{number:.decimals$}"),
        MetricValue::Text(text) => text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, model::ProductionLine};

    #[test]
    fn table_units() {
        assert_eq!(unit_for_key("temp"), "°C");
        assert_eq!(unit_for_key("tempIn"), "°C");
        assert_eq!(unit_for_key("tempOut"), "°C");
        assert_eq!(unit_for_key("power"), "kW");
        assert_eq!(unit_for_key("speed"), "");
    }

    #[test]
    fn heuristic_fallback_for_unknown_keys() {
        assert_eq!(unit_for_key("motortemp"), "°C");
        assert_eq!(unit_for_key("peakpower"), "kW");
        assert_eq!(unit_for_key("Temp"), "");
    }

    #[test]
    fn table_agrees_with_heuristic_for_shipped_keys() {
        for line in ProductionLine::ALL {
            for machine in &catalog::bundle(line).machines {
                for metric in &machine.metrics {
                    assert_eq!(
                        unit_for_key(&metric.key),
                        heuristic_unit(&metric.key),
                        "{}:{}",
                        machine.id,
                        metric.key
                    );
                }
            }
        }
    }

    #[test]
    fn title_case_capitalizes_first_char() {
        assert_eq!(title_case("readRate"), "ReadRate");
        assert_eq!(title_case("temp"), "Temp");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn format_value_uses_requested_precision() {
        assert_eq!(format_value(&MetricValue::Number(25.4), 1), "25.4");
        assert_eq!(format_value(&MetricValue::Number(1450.0), 2), "1450.00");
        assert_eq!(
            format_value(&MetricValue::Text("auto".to_string()), 1),
            "auto"
        );
    }
}
