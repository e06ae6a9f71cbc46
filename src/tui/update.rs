//! Pure update function for the Elm-style dashboard.
//!
//! `update()` takes the current model and a message, mutates the model, and
//! returns a command describing any side-effects the runtime should execute.
//! This module performs zero I/O: timers and log writes are described as
//! [`DashboardCmd`] values.

use super::input::{InputAction, InputContext, resolve_key_event};
use super::model::{DashboardCmd, DashboardModel, DashboardMsg, Focus, LineSession, Overlay};
use crate::catalog::bundle;
use crate::catalog::model::ProductionLine;
use crate::insight::{self, InsightKind};
use crate::logger::jsonl::{ActivityRecord, EventType, Severity};

/// Apply a message to the model and return the next command for the runtime.
pub fn update(model: &mut DashboardModel, msg: DashboardMsg) -> DashboardCmd {
    match msg {
        DashboardMsg::Tick => {
            model.frame = model.frame.wrapping_add(1);
            DashboardCmd::None
        }

        DashboardMsg::Key(key) => {
            let context = InputContext {
                focus: model.focus,
                active_overlay: model.overlay,
                search_editing: model.focus == Focus::Knowledge
                    && model.session.knowledge.search_editing,
            };
            resolve_key_event(&key, context)
                .action
                .map_or(DashboardCmd::None, |action| {
                    apply_input_action(model, action)
                })
        }

        DashboardMsg::Resize { cols, rows } => {
            model.terminal_size = (cols, rows);
            DashboardCmd::None
        }

        DashboardMsg::SwitchLine(line) => switch_line(model, line),

        DashboardMsg::InsightReady { ticket } => resolve_insight(model, ticket),
    }
}

fn apply_input_action(model: &mut DashboardModel, action: InputAction) -> DashboardCmd {
    match action {
        InputAction::Quit => quit(model),
        InputAction::BackOrQuit => back_or_quit(model),
        InputAction::CloseOverlay => {
            model.overlay = None;
            DashboardCmd::None
        }
        InputAction::ToggleHelp => {
            model.overlay = match model.overlay {
                Some(Overlay::Help) => None,
                None => Some(Overlay::Help),
            };
            DashboardCmd::None
        }
        InputAction::SelectLine(line) => switch_line(model, line),
        InputAction::CycleLine => switch_line(model, model.active_line.next()),
        InputAction::FocusNext => {
            model.focus = model.focus.next();
            DashboardCmd::None
        }
        InputAction::FocusPrev => {
            model.focus = model.focus.prev();
            DashboardCmd::None
        }
        InputAction::ScrollUp => {
            model.scroll = model.scroll.saturating_sub(page_size(model));
            DashboardCmd::None
        }
        InputAction::ScrollDown => {
            model.scroll = model.scroll.saturating_add(page_size(model));
            DashboardCmd::None
        }
        InputAction::ScrollTop => {
            model.scroll = 0;
            DashboardCmd::None
        }
        InputAction::CursorPrev => {
            move_cursor(model, -1);
            DashboardCmd::None
        }
        InputAction::CursorNext => {
            move_cursor(model, 1);
            DashboardCmd::None
        }
        InputAction::Activate => activate(model),
        InputAction::ToggleViewMode => {
            toggle_view_mode(model);
            DashboardCmd::None
        }
        InputAction::RequestInsight => request_insight(model),
        InputAction::BeginSearch => {
            model.session.knowledge.search_editing = true;
            DashboardCmd::None
        }
        InputAction::EndSearch => {
            let knowledge = &mut model.session.knowledge;
            knowledge.search_editing = false;
            let matches = knowledge.visible(&model.session.bundle.cases).len();
            DashboardCmd::Log(
                ActivityRecord::new(EventType::Search, model.active_line)
                    .target(knowledge.search_query.clone())
                    .details(format!("{matches} matching case(s)")),
            )
        }
        InputAction::SearchInput(c) => {
            model.session.knowledge.search_query.push(c);
            refilter(model);
            DashboardCmd::None
        }
        InputAction::SearchBackspace => {
            model.session.knowledge.search_query.pop();
            refilter(model);
            DashboardCmd::None
        }
        InputAction::SearchClear => {
            model.session.knowledge.search_query.clear();
            refilter(model);
            DashboardCmd::None
        }
    }
}

fn quit(model: &mut DashboardModel) -> DashboardCmd {
    model.quit = true;
    DashboardCmd::Quit
}

/// Esc with no overlay: clear the focused panel's selection, else quit.
fn back_or_quit(model: &mut DashboardModel) -> DashboardCmd {
    match model.focus {
        Focus::Overview if model.session.overview.selected_machine.is_some() => {
            model.session.overview.clear_selection();
            DashboardCmd::None
        }
        Focus::Knowledge if model.session.knowledge.selected_case.is_some() => {
            let knowledge = &mut model.session.knowledge;
            knowledge.selected_case = None;
            knowledge.insight = insight::InsightSlot::Idle;
            DashboardCmd::None
        }
        _ => quit(model),
    }
}

/// Replace the whole line session. Switching to the active line is a no-op.
fn switch_line(model: &mut DashboardModel, line: ProductionLine) -> DashboardCmd {
    if line == model.active_line {
        return DashboardCmd::None;
    }
    let previous = model.active_line;
    model.active_line = line;
    model.session = LineSession::new(bundle(line), model.start_view_mode);
    model.scroll = 0;
    DashboardCmd::Log(
        ActivityRecord::new(EventType::LineSwitch, line)
            .target(line.as_str())
            .details(format!("from {}", previous.as_str())),
    )
}

fn page_size(model: &DashboardModel) -> usize {
    usize::from(model.terminal_size.1.saturating_sub(6)).max(1)
}

fn step(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    cursor.saturating_add_signed(delta).min(len - 1)
}

fn move_cursor(model: &mut DashboardModel, delta: isize) {
    let bundle = model.session.bundle;
    match model.focus {
        Focus::Overview => {
            let overview = &mut model.session.overview;
            let len = overview.traversal(bundle).len();
            overview.cursor = step(overview.cursor, delta, len);
        }
        Focus::Batches => {
            let batches = &mut model.session.batches;
            batches.cursor = step(batches.cursor, delta, bundle.records.len());
        }
        Focus::Knowledge => {
            let knowledge = &mut model.session.knowledge;
            let len = knowledge.visible(&bundle.cases).len();
            knowledge.cursor = step(knowledge.cursor, delta, len);
        }
    }
}

/// Keep the cursor on the same machine across a view switch when it is
/// visible in both orders.
fn toggle_view_mode(model: &mut DashboardModel) {
    let bundle = model.session.bundle;
    let overview = &mut model.session.overview;
    let current = overview.cursor_machine(bundle).map(|m| m.id.as_str());
    overview.view_mode = overview.view_mode.toggle();
    let order = overview.traversal(bundle);
    overview.cursor = current
        .and_then(|id| order.iter().position(|m| m.id == id))
        .unwrap_or(0);
}

fn refilter(model: &mut DashboardModel) {
    let knowledge = &mut model.session.knowledge;
    let visible = knowledge.visible(&model.session.bundle.cases).len();
    knowledge.clamp_cursor(visible);
}

fn activate(model: &mut DashboardModel) -> DashboardCmd {
    let line = model.active_line;
    let bundle = model.session.bundle;
    match model.focus {
        Focus::Overview => {
            let Some(machine) = model.session.overview.cursor_machine(bundle) else {
                return DashboardCmd::None;
            };
            let selected = model
                .session
                .overview
                .toggle_selection(machine, &mut model.rng)
                .is_some();
            DashboardCmd::Log(
                ActivityRecord::new(EventType::MachineSelect, line)
                    .target(machine.id.as_str())
                    .details(if selected { "selected" } else { "deselected" }),
            )
        }
        Focus::Batches => {
            let Some(record) = bundle.records.get(model.session.batches.cursor) else {
                return DashboardCmd::None;
            };
            let expanded = model.session.batches.toggle(&record.id);
            DashboardCmd::Log(
                ActivityRecord::new(EventType::BatchToggle, line)
                    .target(record.id.as_str())
                    .details(if expanded { "expanded" } else { "collapsed" }),
            )
        }
        Focus::Knowledge => {
            let knowledge = &mut model.session.knowledge;
            let visible = knowledge.visible(&bundle.cases);
            let Some(case) = visible.get(knowledge.cursor).copied() else {
                return DashboardCmd::None;
            };
            let selected = knowledge.toggle_selection(&case.id).is_some();
            DashboardCmd::Log(
                ActivityRecord::new(EventType::CaseSelect, line)
                    .target(case.id.as_str())
                    .details(if selected { "opened" } else { "closed" }),
            )
        }
    }
}

/// What `g` would analyze in the focused panel, if anything.
fn insight_target(model: &DashboardModel) -> Option<(InsightKind, String)> {
    let session = &model.session;
    match model.focus {
        Focus::Overview => session
            .overview
            .selected_machine
            .clone()
            .map(|id| (InsightKind::Machine, id)),
        Focus::Batches => session
            .bundle
            .records
            .get(session.batches.cursor)
            .filter(|record| session.batches.is_expanded(&record.id))
            .map(|record| (InsightKind::Batch, record.id.clone())),
        Focus::Knowledge => session
            .knowledge
            .selected_case
            .clone()
            .map(|id| (InsightKind::Case, id)),
    }
}

/// Start a fresh request, superseding any pending one for the same slot.
fn request_insight(model: &mut DashboardModel) -> DashboardCmd {
    let Some((kind, id)) = insight_target(model) else {
        return DashboardCmd::None;
    };
    let line = model.active_line;
    let ticket = model.tickets.issue();
    let superseded = model.session.slot_mut(kind, &id).begin(ticket);

    let mut cmds = vec![
        DashboardCmd::ScheduleInsight {
            ticket,
            after: model.insight_delay,
        },
        DashboardCmd::Log(
            ActivityRecord::new(EventType::InsightRequested, line)
                .target(id.as_str())
                .insight(kind, ticket),
        ),
    ];
    if let Some(old) = superseded {
        cmds.push(DashboardCmd::Log(
            ActivityRecord::new(EventType::InsightSuperseded, line)
                .target(id.as_str())
                .insight(kind, old)
                .severity(Severity::Warning)
                .details(format!("replaced by ticket {ticket}")),
        ));
    }
    DashboardCmd::batch(cmds)
}

/// Deliver a completed request. Tickets no slot is waiting on are dropped.
fn resolve_insight(model: &mut DashboardModel, ticket: u64) -> DashboardCmd {
    let Some((kind, id)) = model.session.pending_target(ticket) else {
        return DashboardCmd::None;
    };
    let bundle = model.session.bundle;
    let text = insight::generate(kind, &id, bundle, &mut model.rng);
    if !model.session.slot_mut(kind, &id).resolve(ticket, text) {
        return DashboardCmd::None;
    }
    DashboardCmd::Log(
        ActivityRecord::new(EventType::InsightReady, model.active_line)
            .target(id)
            .insight(kind, ticket),
    )
}
