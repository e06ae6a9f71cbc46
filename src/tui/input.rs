//! Key routing for the dashboard runtime.

#![allow(missing_docs)]

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::model::{Focus, Overlay};
use crate::catalog::model::ProductionLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputContext {
    pub focus: Focus,
    pub active_overlay: Option<Overlay>,
    pub search_editing: bool,
}

impl Default for InputContext {
    fn default() -> Self {
        Self {
            focus: Focus::Overview,
            active_overlay: None,
            search_editing: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Quit,
    /// Close whatever is open in the focused panel, else quit.
    BackOrQuit,
    CloseOverlay,
    ToggleHelp,
    SelectLine(ProductionLine),
    CycleLine,
    FocusNext,
    FocusPrev,
    ScrollUp,
    ScrollDown,
    ScrollTop,
    CursorPrev,
    CursorNext,
    /// Toggle selection or expansion of the row under the cursor.
    Activate,
    ToggleViewMode,
    RequestInsight,
    BeginSearch,
    EndSearch,
    SearchInput(char),
    SearchBackspace,
    SearchClear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputResolution {
    pub action: Option<InputAction>,
    pub consumed: bool,
}

impl InputResolution {
    const fn action(action: InputAction) -> Self {
        Self {
            action: Some(action),
            consumed: true,
        }
    }

    const fn consumed_without_action() -> Self {
        Self {
            action: None,
            consumed: true,
        }
    }

    const fn passthrough() -> Self {
        Self {
            action: None,
            consumed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpBinding {
    pub keys: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextualHelp {
    pub title: &'static str,
    pub panel_hint: &'static str,
    pub bindings: Vec<HelpBinding>,
}

/// Resolve a key event using deterministic precedence rules:
/// overlay keys first, then search editing, then global keys, then keys of
/// the focused panel.
#[must_use]
pub fn resolve_key_event(key: &KeyEvent, context: InputContext) -> InputResolution {
    if key.kind == KeyEventKind::Release {
        return InputResolution::passthrough();
    }
    if is_ctrl_c(key) {
        return InputResolution::action(InputAction::Quit);
    }
    if context.active_overlay.is_some() {
        return resolve_overlay_key(key);
    }
    if context.search_editing {
        return resolve_search_key(key);
    }
    let global = resolve_global_key(key);
    if global.consumed {
        return global;
    }
    resolve_panel_key(key, context.focus)
}

/// Build contextual help entries for the current focus/overlay state.
#[must_use]
pub fn contextual_help(context: InputContext) -> ContextualHelp {
    if context.active_overlay.is_some() {
        return ContextualHelp {
            title: "Help Overlay",
            panel_hint: "Shows global and panel bindings.",
            bindings: vec![
                HelpBinding {
                    keys: "Esc",
                    description: "Close help overlay",
                },
                HelpBinding {
                    keys: "?",
                    description: "Toggle help overlay",
                },
            ],
        };
    }
    if context.search_editing {
        return ContextualHelp {
            title: "Search",
            panel_hint: "Type to filter case studies by title or tag.",
            bindings: SEARCH_HELP_BINDINGS.to_vec(),
        };
    }

    let panel = panel_bindings(context.focus);
    let mut bindings = Vec::with_capacity(GLOBAL_HELP_BINDINGS.len() + panel.len());
    bindings.extend_from_slice(&GLOBAL_HELP_BINDINGS);
    bindings.extend_from_slice(panel);
    ContextualHelp {
        title: context.focus.label(),
        panel_hint: panel_hint(context.focus),
        bindings,
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn resolve_overlay_key(key: &KeyEvent) -> InputResolution {
    match key.code {
        KeyCode::Esc => InputResolution::action(InputAction::CloseOverlay),
        KeyCode::Char('?') => InputResolution::action(InputAction::ToggleHelp),
        KeyCode::Char('q') => InputResolution::action(InputAction::Quit),
        _ => InputResolution::consumed_without_action(),
    }
}

fn resolve_search_key(key: &KeyEvent) -> InputResolution {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => InputResolution::action(InputAction::EndSearch),
        KeyCode::Backspace => InputResolution::action(InputAction::SearchBackspace),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            InputResolution::action(InputAction::SearchClear)
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            InputResolution::action(InputAction::SearchInput(c))
        }
        _ => InputResolution::consumed_without_action(),
    }
}

fn resolve_global_key(key: &KeyEvent) -> InputResolution {
    match key.code {
        KeyCode::Char('q') => InputResolution::action(InputAction::Quit),
        KeyCode::Esc => InputResolution::action(InputAction::BackOrQuit),
        KeyCode::Char(c @ ('1' | '2')) => match ProductionLine::from_number(c as u8 - b'0') {
            Some(line) => InputResolution::action(InputAction::SelectLine(line)),
            None => InputResolution::passthrough(),
        },
        KeyCode::Char('l') => InputResolution::action(InputAction::CycleLine),
        KeyCode::Tab => InputResolution::action(InputAction::FocusNext),
        KeyCode::BackTab => InputResolution::action(InputAction::FocusPrev),
        KeyCode::PageUp => InputResolution::action(InputAction::ScrollUp),
        KeyCode::PageDown => InputResolution::action(InputAction::ScrollDown),
        KeyCode::Home => InputResolution::action(InputAction::ScrollTop),
        KeyCode::Char('?') => InputResolution::action(InputAction::ToggleHelp),
        _ => InputResolution::passthrough(),
    }
}

fn resolve_panel_key(key: &KeyEvent, focus: Focus) -> InputResolution {
    let common = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(InputAction::CursorPrev),
        KeyCode::Down | KeyCode::Char('j') => Some(InputAction::CursorNext),
        KeyCode::Enter | KeyCode::Char(' ') => Some(InputAction::Activate),
        KeyCode::Char('g') => Some(InputAction::RequestInsight),
        _ => None,
    };
    if let Some(action) = common {
        return InputResolution::action(action);
    }

    match (focus, key.code) {
        (Focus::Overview, KeyCode::Left) => InputResolution::action(InputAction::CursorPrev),
        (Focus::Overview, KeyCode::Right) => InputResolution::action(InputAction::CursorNext),
        (Focus::Overview, KeyCode::Char('v')) => {
            InputResolution::action(InputAction::ToggleViewMode)
        }
        (Focus::Knowledge, KeyCode::Char('/')) => {
            InputResolution::action(InputAction::BeginSearch)
        }
        _ => InputResolution::passthrough(),
    }
}

fn panel_hint(focus: Focus) -> &'static str {
    match focus {
        Focus::Overview => "Machine tiles, selection details and machine insight.",
        Focus::Batches => "Batch production table with expandable rows.",
        Focus::Knowledge => "Maintenance case studies with search and detail view.",
    }
}

const fn panel_bindings(focus: Focus) -> &'static [HelpBinding] {
    match focus {
        Focus::Overview => &OVERVIEW_HELP_BINDINGS,
        Focus::Batches => &BATCH_HELP_BINDINGS,
        Focus::Knowledge => &KNOWLEDGE_HELP_BINDINGS,
    }
}

const GLOBAL_HELP_BINDINGS: [HelpBinding; 7] = [
    HelpBinding {
        keys: "1/2",
        description: "Select production line",
    },
    HelpBinding {
        keys: "l",
        description: "Cycle production line",
    },
    HelpBinding {
        keys: "Tab/S-Tab",
        description: "Cycle panel focus",
    },
    HelpBinding {
        keys: "PgUp/PgDn/Home",
        description: "Scroll dashboard",
    },
    HelpBinding {
        keys: "?",
        description: "Toggle help overlay",
    },
    HelpBinding {
        keys: "Esc",
        description: "Clear selection, else quit",
    },
    HelpBinding {
        keys: "q/C-c",
        description: "Quit",
    },
];

const OVERVIEW_HELP_BINDINGS: [HelpBinding; 4] = [
    HelpBinding {
        keys: "←/→ j/k",
        description: "Move machine cursor",
    },
    HelpBinding {
        keys: "Enter/Space",
        description: "Select or deselect machine",
    },
    HelpBinding {
        keys: "v",
        description: "Toggle workflow/category view",
    },
    HelpBinding {
        keys: "g",
        description: "Generate insight for selected machine",
    },
];

const BATCH_HELP_BINDINGS: [HelpBinding; 3] = [
    HelpBinding {
        keys: "↑/↓ j/k",
        description: "Move batch cursor",
    },
    HelpBinding {
        keys: "Enter/Space",
        description: "Expand or collapse batch",
    },
    HelpBinding {
        keys: "g",
        description: "Generate insight for expanded batch",
    },
];

const KNOWLEDGE_HELP_BINDINGS: [HelpBinding; 4] = [
    HelpBinding {
        keys: "/",
        description: "Search by title or tag",
    },
    HelpBinding {
        keys: "↑/↓ j/k",
        description: "Move case cursor",
    },
    HelpBinding {
        keys: "Enter/Space",
        description: "Open or close case study",
    },
    HelpBinding {
        keys: "g",
        description: "Generate insight for open case",
    },
];

const SEARCH_HELP_BINDINGS: [HelpBinding; 3] = [
    HelpBinding {
        keys: "Enter/Esc",
        description: "Finish editing",
    },
    HelpBinding {
        keys: "Backspace",
        description: "Delete last character",
    },
    HelpBinding {
        keys: "C-u",
        description: "Clear query",
    },
];
