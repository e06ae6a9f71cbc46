//! Machine layout modes for the production line overview.

#![allow(missing_docs)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::model::Machine;

/// Number of machines shown in the workflow strip and the batch machine preview.
pub const WORKFLOW_PREVIEW_LEN: usize = 8;

/// Category label for machines without one.
const FALLBACK_CATEGORY: &str = "other";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// First machines of the line as a process chain.
    #[default]
    Workflow,
    /// Every machine, grouped by category.
    Category,
}

impl ViewMode {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Workflow => Self::Category,
            Self::Category => Self::Workflow,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Workflow => "Workflow View",
            Self::Category => "Category View",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Workflow => "workflow",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "workflow" => Ok(Self::Workflow),
            "category" => Ok(Self::Category),
            other => Err(format!("unknown view mode {other:?}")),
        }
    }
}

/// Machines sharing a category, in first-appearance order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub machines: Vec<&'a Machine>,
}

/// Stable grouping by category: groups appear in the order their first
/// machine appears, and machines keep table order inside a group.
#[must_use]
pub fn group_by_category(machines: &[Machine]) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
    for machine in machines {
        let category = if machine.category.is_empty() {
            FALLBACK_CATEGORY
        } else {
            machine.category.as_str()
        };
        match groups.iter_mut().find(|group| group.category == category) {
            Some(group) => group.machines.push(machine),
            None => groups.push(CategoryGroup {
                category,
                machines: vec![machine],
            }),
        }
    }
    groups
}

/// Leading machines shown as the process chain.
#[must_use]
pub fn workflow_preview(machines: &[Machine]) -> &[Machine] {
    &machines[..machines.len().min(WORKFLOW_PREVIEW_LEN)]
}

/// Machines in on-screen order for a view mode. Cursor traversal follows this.
#[must_use]
pub fn display_order(machines: &[Machine], mode: ViewMode) -> Vec<&Machine> {
    match mode {
        ViewMode::Workflow => workflow_preview(machines).iter().collect(),
        ViewMode::Category => group_by_category(machines)
            .into_iter()
            .flat_map(|group| group.machines)
            .collect(),
    }
}
