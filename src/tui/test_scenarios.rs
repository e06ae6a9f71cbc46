//! Scenario drills: multi-step operator workflows driven through `update()`
//! with frame captures checked at each assertion point.

#![allow(clippy::too_many_lines)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::model::{DashboardCmd, DashboardModel, DashboardMsg, Focus};
use super::render::{CASE_PLACEHOLDER, render_to_string};
use super::update::update;
use crate::analytics::grouping::ViewMode;
use crate::catalog::model::ProductionLine;
use crate::core::config::DashboardConfig;
use crate::insight::{InsightSlot, LOADING_LABEL, REPORT_HEADING};
use crate::logger::jsonl::EventType;

/// Drives a model and keeps every command it produced.
struct Drill {
    model: DashboardModel,
    cmds: Vec<DashboardCmd>,
}

impl Drill {
    fn new() -> Self {
        Self::with_config(&DashboardConfig::default())
    }

    fn with_config(config: &DashboardConfig) -> Self {
        let mut model = DashboardModel::new(config, 42);
        model.terminal_size = (120, 600);
        Self {
            model,
            cmds: Vec::new(),
        }
    }

    fn send(&mut self, msg: DashboardMsg) -> &mut Self {
        let cmd = update(&mut self.model, msg);
        flatten(cmd, &mut self.cmds);
        self
    }

    fn key(&mut self, code: KeyCode) -> &mut Self {
        self.send(DashboardMsg::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn keys(&mut self, codes: &[KeyCode]) -> &mut Self {
        for code in codes {
            self.key(*code);
        }
        self
    }

    fn type_text(&mut self, text: &str) -> &mut Self {
        for c in text.chars() {
            self.key(KeyCode::Char(c));
        }
        self
    }

    /// Deliver every scheduled timer, as the runtime would after the delay.
    fn fire_timers(&mut self) -> &mut Self {
        let tickets: Vec<u64> = self
            .cmds
            .iter()
            .filter_map(|cmd| match cmd {
                DashboardCmd::ScheduleInsight { ticket, .. } => Some(*ticket),
                _ => None,
            })
            .collect();
        self.cmds
            .retain(|cmd| !matches!(cmd, DashboardCmd::ScheduleInsight { .. }));
        for ticket in tickets {
            self.send(DashboardMsg::InsightReady { ticket });
        }
        self
    }

    fn frame(&self) -> String {
        render_to_string(&self.model)
    }

    fn logged(&self, event: EventType) -> usize {
        self.cmds
            .iter()
            .filter(|cmd| matches!(cmd, DashboardCmd::Log(record) if record.event == event))
            .count()
    }
}

fn flatten(cmd: DashboardCmd, out: &mut Vec<DashboardCmd>) {
    match cmd {
        DashboardCmd::None => {}
        DashboardCmd::Batch(cmds) => {
            for cmd in cmds {
                flatten(cmd, out);
            }
        }
        other => out.push(other),
    }
}

#[test]
fn drill_machine_inspection_with_insight() {
    let mut drill = Drill::new();

    // Phase 1: select the third machine in the workflow chain.
    drill.keys(&[KeyCode::Right, KeyCode::Right, KeyCode::Enter]);
    let selected = drill
        .model
        .session
        .overview
        .selected_machine
        .clone()
        .expect("machine selected");
    let machine = drill.model.bundle().machine(&selected).expect("in catalog");
    let frame = drill.frame();
    assert!(frame.contains(&format!("◆ {}", machine.name)));
    assert!(frame.contains("Live Performance"));
    assert!(frame.contains("T-15"));
    assert!(frame.contains("Controller"));
    assert!(frame.contains(&format!("Phân tích AI cho {}", machine.name)));

    // Phase 2: request an insight; the slot shows a loading state.
    drill.key(KeyCode::Char('g'));
    assert!(drill.frame().contains(LOADING_LABEL));

    // Phase 3: timer fires; the report replaces the loading state.
    drill.fire_timers();
    let frame = drill.frame();
    assert!(frame.contains(REPORT_HEADING));
    assert!(frame.contains(&format!("🔧 Machine: {}", machine.name)));
    assert!(!frame.contains(LOADING_LABEL));
    assert_eq!(drill.logged(EventType::InsightRequested), 1);
    assert_eq!(drill.logged(EventType::InsightReady), 1);

    // Phase 4: deselect; details and report disappear.
    drill.key(KeyCode::Enter);
    let frame = drill.frame();
    assert!(!frame.contains(REPORT_HEADING));
    assert!(frame.contains("Enter: select a machine to view details"));
}

#[test]
fn drill_category_view_walks_every_machine() {
    let mut drill = Drill::new();
    drill.key(KeyCode::Char('v'));
    assert_eq!(drill.model.session.overview.view_mode, ViewMode::Category);
    let frame = drill.frame();
    assert!(frame.contains("Category View"));
    assert!(frame.contains("transport ("));

    let total = drill.model.bundle().machines.len();
    for _ in 0..total + 5 {
        drill.key(KeyCode::Down);
    }
    assert_eq!(drill.model.session.overview.cursor, total - 1);
    drill.key(KeyCode::Enter);
    assert!(drill.model.session.overview.selected_machine.is_some());
}

#[test]
fn drill_batch_review() {
    let mut drill = Drill::new();
    drill.key(KeyCode::Tab);
    assert_eq!(drill.model.focus, Focus::Batches);

    // BATCH-P002 starts collapsed; expand it.
    drill.keys(&[KeyCode::Down, KeyCode::Enter]);
    assert!(drill.model.session.batches.is_expanded("BATCH-P002"));
    let frame = drill.frame();
    assert!(frame.contains("1/2 completed"));
    assert!(frame.contains("Phân tích Batch BATCH-P002"));

    // Two batch insights in flight resolve independently.
    drill.key(KeyCode::Char('g'));
    drill.keys(&[KeyCode::Up, KeyCode::Char('g')]);
    drill.fire_timers();
    for id in ["BATCH-P001", "BATCH-P002"] {
        let text = drill
            .model
            .session
            .batches
            .insight(id)
            .and_then(InsightSlot::text)
            .expect("batch report ready");
        assert!(text.contains(id));
    }

    // Collapsing drops that batch's report only.
    drill.key(KeyCode::Enter);
    assert!(!drill.model.session.batches.is_expanded("BATCH-P001"));
    assert!(drill.model.session.batches.insight("BATCH-P001").is_none());
    assert!(drill.model.session.batches.insight("BATCH-P002").is_some());
    assert_eq!(drill.logged(EventType::BatchToggle), 2);
}

#[test]
fn drill_knowledge_search_and_case_detail() {
    let mut drill = Drill::new();
    drill.keys(&[KeyCode::Tab, KeyCode::Tab]);
    assert_eq!(drill.model.focus, Focus::Knowledge);
    assert!(drill.frame().contains(CASE_PLACEHOLDER));

    drill.key(KeyCode::Char('/'));
    drill.type_text("zzz-no-match");
    assert!(drill.frame().contains("No case studies match"));
    drill.send(DashboardMsg::Key(KeyEvent::new(
        KeyCode::Char('u'),
        KeyModifiers::CONTROL,
    )));
    assert!(drill.model.session.knowledge.search_query.is_empty());

    let first_tag = drill.model.bundle().cases[1].tags[0].to_uppercase();
    drill.type_text(&first_tag);
    drill.key(KeyCode::Enter);
    assert_eq!(drill.logged(EventType::Search), 1);
    let visible = drill
        .model
        .session
        .knowledge
        .visible(&drill.model.bundle().cases);
    assert!(visible.iter().any(|case| case.id == "case-p02"));

    let target = visible[0].id.clone();
    drill.key(KeyCode::Enter);
    assert_eq!(
        drill.model.session.knowledge.selected_case.as_deref(),
        Some(target.as_str())
    );
    let frame = drill.frame();
    assert!(!frame.contains(CASE_PLACEHOLDER));
    assert!(frame.contains("OEE Impact"));
    assert!(frame.contains("Before "));
    assert!(frame.contains(&format!("AI Analysis for Case {target}")));

    drill.key(KeyCode::Char('g'));
    drill.fire_timers();
    let report = drill
        .model
        .session
        .knowledge
        .insight
        .text()
        .expect("case report");
    assert!(report.contains("ROI: Achieved in"));
}

#[test]
fn drill_line_switch_discards_inflight_insight() {
    let mut drill = Drill::new();
    drill.keys(&[KeyCode::Enter, KeyCode::Char('g')]);
    assert!(drill.model.has_pending_insight());

    drill.key(KeyCode::Char('2'));
    assert_eq!(drill.model.active_line, ProductionLine::Welding);
    assert!(!drill.model.has_pending_insight());
    drill.fire_timers();
    assert_eq!(drill.logged(EventType::InsightReady), 0);
    assert_eq!(drill.model.session.overview.insight, InsightSlot::Idle);

    let frame = drill.frame();
    assert!(frame.contains("Dây chuyền Hàn Robot"));
    assert!(frame.contains(&drill.model.bundle().records[0].id));

    // Re-selecting the active line changes nothing and logs nothing.
    let switches = drill.logged(EventType::LineSwitch);
    drill.key(KeyCode::Char('2'));
    assert_eq!(drill.logged(EventType::LineSwitch), switches);
}

#[test]
fn drill_rapid_retrigger_shows_latest_report_only() {
    let mut drill = Drill::new();
    drill.key(KeyCode::Enter);
    drill.keys(&[KeyCode::Char('g'), KeyCode::Char('g'), KeyCode::Char('g')]);
    assert_eq!(drill.logged(EventType::InsightSuperseded), 2);
    drill.fire_timers();
    assert_eq!(drill.logged(EventType::InsightReady), 1);
    assert!(matches!(
        drill.model.session.overview.insight,
        InsightSlot::Ready { ticket: 3, .. }
    ));
}

#[test]
fn drill_start_on_welding_in_category_view() {
    let config = DashboardConfig {
        start_line: ProductionLine::Welding,
        start_view_mode: ViewMode::Category,
        ..DashboardConfig::default()
    };
    let mut drill = Drill::with_config(&config);
    assert!(drill.frame().contains("Category View"));
    drill.key(KeyCode::Char('1'));
    assert_eq!(drill.model.active_line, ProductionLine::Palletizing);
    assert_eq!(drill.model.session.overview.view_mode, ViewMode::Category);
}

#[test]
fn drill_escape_unwinds_then_quits() {
    let mut drill = Drill::new();
    drill.key(KeyCode::Char('?'));
    drill.key(KeyCode::Esc);
    assert!(drill.model.overlay.is_none());
    drill.key(KeyCode::Enter);
    drill.key(KeyCode::Esc);
    assert!(drill.model.session.overview.selected_machine.is_none());
    assert!(!drill.model.quit);
    drill.key(KeyCode::Esc);
    assert!(drill.model.quit);
    assert!(drill.cmds.contains(&DashboardCmd::Quit));
}
