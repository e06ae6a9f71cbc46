//! Knowledge-base search and case severity classification.

#![allow(missing_docs)]

use crate::catalog::model::CaseStudy;

/// Presentation tone of a case severity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityTone {
    Danger,
    Warning,
    Info,
}

/// `High` is danger, `Medium` is warning, everything else is informational.
#[must_use]
pub fn severity_tone(severity: &str) -> SeverityTone {
    match severity {
        "High" => SeverityTone::Danger,
        "Medium" => SeverityTone::Warning,
        _ => SeverityTone::Info,
    }
}

/// Whether a case matches a search query.
///
/// Case-insensitive substring match against the title and every tag. An empty
/// query matches everything.
#[must_use]
pub fn matches(case: &CaseStudy, query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    case.title.to_lowercase().contains(&needle)
        || case
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

/// Cases matching `query`, in catalog order.
#[must_use]
pub fn filter_cases<'a>(cases: &'a [CaseStudy], query: &str) -> Vec<&'a CaseStudy> {
    cases.iter().filter(|case| matches(case, query)).collect()
}
