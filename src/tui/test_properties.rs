//! Property-based tests for dashboard reducer invariants.
//!
//! Uses `proptest` to verify that arbitrary sequences of dashboard messages
//! keep cursors in range, selections pointing at real catalog rows, tickets
//! monotonic, and line switches resetting every panel.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use proptest::prelude::*;

use super::model::{DashboardModel, DashboardMsg, LineSession};
use super::update::update;
use crate::analytics::batch::progress_pct;
use crate::analytics::knowledge::filter_cases;
use crate::catalog::bundle;
use crate::catalog::model::{BatchChild, ProductionLine, STATUS_COMPLETED, STATUS_IN_PROGRESS};
use crate::core::config::DashboardConfig;
use crate::insight::InsightSlot;

// ──────────────────── strategies ────────────────────

fn arb_line() -> impl Strategy<Value = ProductionLine> {
    prop_oneof![Just(ProductionLine::Palletizing), Just(ProductionLine::Welding)]
}

fn arb_key_code() -> impl Strategy<Value = KeyCode> {
    prop_oneof![
        Just(KeyCode::Char('1')),
        Just(KeyCode::Char('2')),
        Just(KeyCode::Char('l')),
        Just(KeyCode::Char('j')),
        Just(KeyCode::Char('k')),
        Just(KeyCode::Char('v')),
        Just(KeyCode::Char('g')),
        Just(KeyCode::Char('/')),
        Just(KeyCode::Char('w')),
        Just(KeyCode::Char('?')),
        Just(KeyCode::Char(' ')),
        Just(KeyCode::Tab),
        Just(KeyCode::BackTab),
        Just(KeyCode::Esc),
        Just(KeyCode::Enter),
        Just(KeyCode::Backspace),
        Just(KeyCode::Up),
        Just(KeyCode::Down),
        Just(KeyCode::Left),
        Just(KeyCode::Right),
        Just(KeyCode::PageDown),
        Just(KeyCode::Home),
    ]
}

fn arb_msg() -> impl Strategy<Value = DashboardMsg> {
    prop_oneof![
        6 => arb_key_code().prop_map(|code| DashboardMsg::Key(KeyEvent::new(code, KeyModifiers::NONE))),
        1 => Just(DashboardMsg::Tick),
        1 => arb_line().prop_map(DashboardMsg::SwitchLine),
        2 => (0u64..40).prop_map(|ticket| DashboardMsg::InsightReady { ticket }),
        1 => (20u16..200, 5u16..80).prop_map(|(cols, rows)| DashboardMsg::Resize { cols, rows }),
    ]
}

fn fresh_model(seed: u64) -> DashboardModel {
    DashboardModel::new(&DashboardConfig::default(), seed)
}

// ──────────────────── invariant checks ────────────────────

fn slot_ticket(slot: &InsightSlot) -> Option<u64> {
    match slot {
        InsightSlot::Idle => None,
        InsightSlot::Pending { ticket } | InsightSlot::Ready { ticket, .. } => Some(*ticket),
    }
}

/// Assert all model invariants that must hold after any message sequence.
fn assert_model_invariants(model: &DashboardModel) {
    let bundle = model.bundle();
    let session = &model.session;
    assert_eq!(bundle.line, model.active_line, "session bundle out of sync");

    let traversal = session.overview.traversal(bundle).len();
    assert!(
        session.overview.cursor < traversal.max(1),
        "overview cursor {} beyond {traversal}",
        session.overview.cursor
    );
    assert!(session.batches.cursor < bundle.records.len().max(1));
    let visible = session.knowledge.visible(&bundle.cases).len();
    assert!(
        session.knowledge.cursor < visible.max(1),
        "knowledge cursor {} beyond {visible}",
        session.knowledge.cursor
    );

    if let Some(id) = &session.overview.selected_machine {
        assert!(bundle.machine(id).is_some(), "selected machine {id} missing");
    }
    if let Some(id) = &session.knowledge.selected_case {
        assert!(bundle.case(id).is_some(), "selected case {id} missing");
    }
    for id in session.batches.expanded.keys() {
        assert!(bundle.record(id).is_some(), "expanded key {id} missing");
    }

    let last = model.tickets.last_issued();
    let slots = std::iter::once(&session.overview.insight)
        .chain(std::iter::once(&session.knowledge.insight))
        .chain(session.batches.insights.values());
    for slot in slots {
        if let Some(ticket) = slot_ticket(slot) {
            assert!(ticket <= last, "ticket {ticket} never issued (last {last})");
        }
    }

    // A machine slot is only ever busy for a selected machine.
    if session.overview.selected_machine.is_none() {
        assert_eq!(session.overview.insight, InsightSlot::Idle);
    }
    if session.knowledge.selected_case.is_none() {
        assert_eq!(session.knowledge.insight, InsightSlot::Idle);
    }
    for id in session.batches.insights.keys() {
        assert!(session.batches.is_expanded(id), "insight on collapsed {id}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn arbitrary_sequences_keep_invariants(
        seed in any::<u64>(),
        msgs in prop::collection::vec(arb_msg(), 0..120),
    ) {
        let mut model = fresh_model(seed);
        for msg in msgs {
            let _ = update(&mut model, msg);
            assert_model_invariants(&model);
        }
    }

    #[test]
    fn tickets_never_decrease(
        msgs in prop::collection::vec(arb_msg(), 0..80),
    ) {
        let mut model = fresh_model(3);
        let mut last = 0;
        for msg in msgs {
            let _ = update(&mut model, msg);
            prop_assert!(model.tickets.last_issued() >= last);
            last = model.tickets.last_issued();
        }
    }

    #[test]
    fn switching_line_restores_defaults(
        msgs in prop::collection::vec(arb_msg(), 0..80),
    ) {
        let mut model = fresh_model(9);
        for msg in msgs {
            let _ = update(&mut model, msg);
        }
        let target = model.active_line.next();
        let _ = update(&mut model, DashboardMsg::SwitchLine(target));
        prop_assert_eq!(
            &model.session,
            &LineSession::new(bundle(target), model.start_view_mode)
        );
        prop_assert_eq!(model.scroll, 0);
    }

    #[test]
    fn double_batch_toggle_is_identity(line in arb_line(), idx in 0usize..3) {
        let mut session = LineSession::new(bundle(line), model_view());
        let id = session.bundle.records[idx % session.bundle.records.len()].id.clone();
        let before = session.batches.expanded.clone();
        session.batches.toggle(&id);
        session.batches.toggle(&id);
        prop_assert_eq!(session.batches.expanded, before);
    }

    #[test]
    fn double_machine_select_clears(line in arb_line(), idx in 0usize..25, seed in any::<u64>()) {
        let mut model = fresh_model(seed);
        let data = bundle(line);
        let machine = &data.machines[idx % data.machines.len()];
        let mut session = LineSession::new(data, model_view());
        session.overview.toggle_selection(machine, &mut model.rng);
        session.overview.toggle_selection(machine, &mut model.rng);
        prop_assert!(session.overview.selected_machine.is_none());
    }

    #[test]
    fn tag_filter_ignores_case(line in arb_line(), upper in any::<bool>()) {
        let data = bundle(line);
        for case in &data.cases {
            for tag in &case.tags {
                let query = if upper { tag.to_uppercase() } else { tag.to_lowercase() };
                let hits = filter_cases(&data.cases, &query);
                prop_assert!(hits.iter().any(|hit| hit.id == case.id), "{query} missed {}", case.id);
            }
        }
    }

    #[test]
    fn progress_is_a_percentage(done in 0usize..20, pending in 0usize..20) {
        let child = |status: &str| BatchChild {
            id: "c".to_string(),
            details: String::new(),
            status: status.to_string(),
            weight: None,
            time: None,
        };
        let children: Vec<BatchChild> = std::iter::repeat_with(|| child(STATUS_COMPLETED))
            .take(done)
            .chain(std::iter::repeat_with(|| child(STATUS_IN_PROGRESS)).take(pending))
            .collect();
        let pct = progress_pct(&children);
        prop_assert!(pct <= 100);
        if done + pending == 0 {
            prop_assert_eq!(pct, 0);
        }
        if pending == 0 && done > 0 {
            prop_assert_eq!(pct, 100);
        }
    }
}

fn model_view() -> crate::analytics::grouping::ViewMode {
    DashboardConfig::default().start_view_mode
}
