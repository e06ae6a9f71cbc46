//! Elm-style state model for the line monitoring dashboard.
//!
//! All display state lives in [`DashboardModel`]. Input and timer events
//! arrive as [`DashboardMsg`] values; side-effects are represented as
//! [`DashboardCmd`] values returned from the update function.
//!
//! The model is deterministic and testable: no I/O happens here, and the only
//! randomness comes from the seeded filler RNG it owns.

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::KeyEvent;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::analytics::grouping::{ViewMode, display_order};
use crate::analytics::knowledge::filter_cases;
use crate::catalog::bundle;
use crate::catalog::model::{CaseStudy, LineBundle, Machine, ProductionLine};
use crate::core::config::DashboardConfig;
use crate::insight::{InsightKind, InsightSlot, TicketCounter};
use crate::logger::jsonl::ActivityRecord;

/// Number of fabricated samples in the selected machine's live chart.
pub const LIVE_SAMPLE_COUNT: usize = 4;

/// X labels of the live chart, oldest first.
pub const LIVE_SAMPLE_LABELS: [&str; LIVE_SAMPLE_COUNT] = ["T-15", "T-10", "T-5", "Now"];

// ──────────────────── focus ────────────────────

/// Panel that receives panel-level keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Focus {
    #[default]
    Overview,
    Batches,
    Knowledge,
}

impl Focus {
    pub const ALL: [Self; 3] = [Self::Overview, Self::Batches, Self::Knowledge];

    /// Next panel, wrapping Knowledge → Overview (`Tab`).
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Overview => Self::Batches,
            Self::Batches => Self::Knowledge,
            Self::Knowledge => Self::Overview,
        }
    }

    /// Previous panel, wrapping Overview → Knowledge (`Shift-Tab`).
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Overview => Self::Knowledge,
            Self::Batches => Self::Overview,
            Self::Knowledge => Self::Batches,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Batches => "Batches",
            Self::Knowledge => "Knowledge Base",
        }
    }
}

/// Floating surfaces drawn above the panels. Overlays have input precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Help,
}

// ──────────────────── panels ────────────────────

/// Machine tiles, selection details and the machine insight slot.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewPanel {
    pub view_mode: ViewMode,
    /// Index into the display order of the current view mode.
    pub cursor: usize,
    pub selected_machine: Option<String>,
    /// Fabricated live chart samples, regenerated on every selection.
    pub live_samples: Vec<f64>,
    /// Decorative per-metric trend deltas, parallel to the selected
    /// machine's metrics.
    pub metric_trends: Vec<Option<f64>>,
    pub insight: InsightSlot,
}

impl OverviewPanel {
    #[must_use]
    pub const fn new(view_mode: ViewMode) -> Self {
        Self {
            view_mode,
            cursor: 0,
            selected_machine: None,
            live_samples: Vec::new(),
            metric_trends: Vec::new(),
            insight: InsightSlot::Idle,
        }
    }

    /// Machines in the order the cursor walks them.
    #[must_use]
    pub fn traversal<'a>(&self, bundle: &'a LineBundle) -> Vec<&'a Machine> {
        display_order(&bundle.machines, self.view_mode)
    }

    /// Machine under the cursor, if the traversal is non-empty.
    #[must_use]
    pub fn cursor_machine<'a>(&self, bundle: &'a LineBundle) -> Option<&'a Machine> {
        self.traversal(bundle).get(self.cursor).copied()
    }

    #[must_use]
    pub fn selected<'a>(&self, bundle: &'a LineBundle) -> Option<&'a Machine> {
        self.selected_machine
            .as_deref()
            .and_then(|id| bundle.machine(id))
    }

    /// Toggle selection of `id`. Returns the new selection.
    ///
    /// Any selection change discards the visible machine insight.
    pub fn toggle_selection<R: Rng + ?Sized>(
        &mut self,
        machine: &Machine,
        rng: &mut R,
    ) -> Option<&str> {
        self.insight = InsightSlot::Idle;
        if self.selected_machine.as_deref() == Some(machine.id.as_str()) {
            self.clear_selection();
            return None;
        }
        self.selected_machine = Some(machine.id.clone());
        self.live_samples = (0..LIVE_SAMPLE_COUNT)
            .map(|_| rng.random_range(80.0..100.0))
            .collect();
        self.metric_trends = machine
            .metrics
            .iter()
            .map(|_| {
                if rng.random_bool(0.5) {
                    None
                } else {
                    Some(rng.random_range(0.0..5.0))
                }
            })
            .collect();
        self.selected_machine.as_deref()
    }

    pub fn clear_selection(&mut self) {
        self.selected_machine = None;
        self.live_samples.clear();
        self.metric_trends.clear();
        self.insight = InsightSlot::Idle;
    }
}

/// Batch table with independently expandable rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPanel {
    pub expanded: HashMap<String, bool>,
    pub cursor: usize,
    pub insights: HashMap<String, InsightSlot>,
}

impl BatchPanel {
    /// Only the first record starts expanded.
    #[must_use]
    pub fn new(bundle: &LineBundle) -> Self {
        let expanded = bundle
            .records
            .iter()
            .enumerate()
            .map(|(idx, record)| (record.id.clone(), idx == 0))
            .collect();
        Self {
            expanded,
            cursor: 0,
            insights: HashMap::new(),
        }
    }

    #[must_use]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.get(id).copied().unwrap_or(false)
    }

    /// Flip the expansion flag of `id`. Returns the new state.
    ///
    /// Collapsing a batch discards its insight slot.
    pub fn toggle(&mut self, id: &str) -> bool {
        let next = !self.is_expanded(id);
        self.expanded.insert(id.to_string(), next);
        if !next {
            self.insights.remove(id);
        }
        next
    }

    #[must_use]
    pub fn insight(&self, id: &str) -> Option<&InsightSlot> {
        self.insights.get(id)
    }
}

/// Searchable case-study list with a detail pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgePanel {
    pub selected_case: Option<String>,
    pub search_query: String,
    pub search_editing: bool,
    /// Index into the filtered list.
    pub cursor: usize,
    pub insight: InsightSlot,
}

impl KnowledgePanel {
    /// Cases matching the current query, in catalog order.
    #[must_use]
    pub fn visible<'a>(&self, cases: &'a [CaseStudy]) -> Vec<&'a CaseStudy> {
        filter_cases(cases, &self.search_query)
    }

    #[must_use]
    pub fn selected<'a>(&self, bundle: &'a LineBundle) -> Option<&'a CaseStudy> {
        self.selected_case.as_deref().and_then(|id| bundle.case(id))
    }

    /// Toggle selection of `id`. Returns the new selection.
    pub fn toggle_selection(&mut self, id: &str) -> Option<&str> {
        self.insight = InsightSlot::Idle;
        if self.selected_case.as_deref() == Some(id) {
            self.selected_case = None;
        } else {
            self.selected_case = Some(id.to_string());
        }
        self.selected_case.as_deref()
    }

    /// Keep the cursor inside the filtered list.
    pub fn clamp_cursor(&mut self, visible: usize) {
        self.cursor = self.cursor.min(visible.saturating_sub(1));
    }
}

/// Everything that belongs to one production line. Replaced wholesale on a
/// line switch.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSession {
    pub bundle: &'static LineBundle,
    pub overview: OverviewPanel,
    pub batches: BatchPanel,
    pub knowledge: KnowledgePanel,
}

impl LineSession {
    #[must_use]
    pub fn new(bundle: &'static LineBundle, view_mode: ViewMode) -> Self {
        Self {
            bundle,
            overview: OverviewPanel::new(view_mode),
            batches: BatchPanel::new(bundle),
            knowledge: KnowledgePanel::default(),
        }
    }

    /// Which slot is waiting on `ticket`, and for what target.
    #[must_use]
    pub fn pending_target(&self, ticket: u64) -> Option<(InsightKind, String)> {
        if self.overview.insight.pending_ticket() == Some(ticket) {
            return self
                .overview
                .selected_machine
                .clone()
                .map(|id| (InsightKind::Machine, id));
        }
        if let Some((id, _)) = self
            .batches
            .insights
            .iter()
            .find(|(_, slot)| slot.pending_ticket() == Some(ticket))
        {
            return Some((InsightKind::Batch, id.clone()));
        }
        if self.knowledge.insight.pending_ticket() == Some(ticket) {
            return self
                .knowledge
                .selected_case
                .clone()
                .map(|id| (InsightKind::Case, id));
        }
        None
    }

    /// Mutable slot for a target, creating batch slots on demand.
    pub fn slot_mut(&mut self, kind: InsightKind, id: &str) -> &mut InsightSlot {
        match kind {
            InsightKind::Machine => &mut self.overview.insight,
            InsightKind::Batch => self.batches.insights.entry(id.to_string()).or_default(),
            InsightKind::Case => &mut self.knowledge.insight,
        }
    }
}

// ──────────────────── model ────────────────────

/// Complete dashboard state.
#[derive(Debug, Clone)]
pub struct DashboardModel {
    pub active_line: ProductionLine,
    pub session: LineSession,
    pub focus: Focus,
    pub overlay: Option<Overlay>,
    /// First visible row of the body.
    pub scroll: usize,
    /// Model-wide ticket source; survives line switches so stale completions
    /// never collide with new requests.
    pub tickets: TicketCounter,
    /// Filler RNG for decorative values.
    pub rng: StdRng,
    pub engineer: String,
    pub insight_delay: Duration,
    pub tick: Duration,
    pub start_view_mode: ViewMode,
    pub terminal_size: (u16, u16),
    /// Ticks observed, drives the loading spinner.
    pub frame: u64,
    pub quit: bool,
}

impl DashboardModel {
    /// Build the initial model from dashboard configuration and a seed for
    /// the decorative RNG.
    #[must_use]
    pub fn new(config: &DashboardConfig, seed: u64) -> Self {
        let line = config.start_line;
        Self {
            active_line: line,
            session: LineSession::new(bundle(line), config.start_view_mode),
            focus: Focus::default(),
            overlay: None,
            scroll: 0,
            tickets: TicketCounter::default(),
            rng: StdRng::seed_from_u64(seed),
            engineer: config.engineer.clone(),
            insight_delay: Duration::from_millis(config.insight_delay_ms),
            tick: Duration::from_millis(config.tick_ms),
            start_view_mode: config.start_view_mode,
            terminal_size: (120, 40),
            frame: 0,
            quit: false,
        }
    }

    #[must_use]
    pub const fn bundle(&self) -> &'static LineBundle {
        self.session.bundle
    }

    /// Whether any slot in the current session is waiting on a timer.
    #[must_use]
    pub fn has_pending_insight(&self) -> bool {
        self.session.overview.insight.is_pending()
            || self.session.knowledge.insight.is_pending()
            || self
                .session
                .batches
                .insights
                .values()
                .any(InsightSlot::is_pending)
    }
}

// ──────────────────── messages ────────────────────

/// Events consumed by the update function.
#[derive(Debug, Clone)]
pub enum DashboardMsg {
    /// Periodic timer tick.
    Tick,
    /// Terminal key press event.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize { cols: u16, rows: u16 },
    /// Switch the active production line.
    SwitchLine(ProductionLine),
    /// A simulated analysis delay elapsed.
    InsightReady { ticket: u64 },
}

/// Side-effects requested by the update function, executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardCmd {
    /// No side-effect.
    None,
    /// Terminate the dashboard event loop.
    Quit,
    /// Execute multiple commands.
    Batch(Vec<Self>),
    /// Deliver `InsightReady { ticket }` after the given duration.
    ScheduleInsight { ticket: u64, after: Duration },
    /// Append an activity record to the JSONL log.
    Log(ActivityRecord),
}

impl DashboardCmd {
    /// Collapse a list of commands, dropping no-ops.
    #[must_use]
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|cmd| *cmd != Self::None).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::StatusLevel;
    use crate::logger::jsonl::EventType;

    fn model() -> DashboardModel {
        DashboardModel::new(&DashboardConfig::default(), 7)
    }

    #[test]
    fn focus_cycles_both_ways() {
        for focus in Focus::ALL {
            assert_eq!(focus.next().prev(), focus);
        }
        assert_eq!(Focus::Knowledge.next(), Focus::Overview);
        assert_eq!(Focus::Overview.prev(), Focus::Knowledge);
    }

    #[test]
    fn new_model_starts_on_configured_line() {
        let config = DashboardConfig {
            start_line: ProductionLine::Welding,
            ..DashboardConfig::default()
        };
        let model = DashboardModel::new(&config, 1);
        assert_eq!(model.active_line, ProductionLine::Welding);
        assert_eq!(model.bundle().line, ProductionLine::Welding);
        assert_eq!(model.insight_delay, Duration::from_millis(1_500));
    }

    #[test]
    fn only_first_batch_starts_expanded() {
        let model = model();
        let records = &model.bundle().records;
        assert!(model.session.batches.is_expanded(&records[0].id));
        for record in &records[1..] {
            assert!(!model.session.batches.is_expanded(&record.id));
        }
    }

    #[test]
    fn batch_toggle_twice_restores_state() {
        let mut panel = model().session.batches;
        let before = panel.is_expanded("BATCH-P002");
        panel.toggle("BATCH-P002");
        panel.toggle("BATCH-P002");
        assert_eq!(panel.is_expanded("BATCH-P002"), before);
    }

    #[test]
    fn collapsing_batch_drops_its_insight() {
        let mut panel = model().session.batches;
        panel
            .insights
            .insert("BATCH-P001".to_string(), InsightSlot::Pending { ticket: 3 });
        assert!(!panel.toggle("BATCH-P001"));
        assert!(panel.insight("BATCH-P001").is_none());
    }

    #[test]
    fn selecting_machine_twice_clears_selection() {
        let mut model = model();
        let machine = &model.bundle().machines[0];
        let mut panel = OverviewPanel::new(ViewMode::Workflow);
        assert_eq!(
            panel.toggle_selection(machine, &mut model.rng),
            Some(machine.id.as_str())
        );
        assert_eq!(panel.live_samples.len(), LIVE_SAMPLE_COUNT);
        assert!(
            panel
                .live_samples
                .iter()
                .all(|v| (80.0..100.0).contains(v))
        );
        assert_eq!(panel.metric_trends.len(), machine.metrics.len());
        assert_eq!(panel.toggle_selection(machine, &mut model.rng), None);
        assert!(panel.selected_machine.is_none());
        assert!(panel.live_samples.is_empty());
    }

    #[test]
    fn selection_change_resets_machine_insight() {
        let mut model = model();
        let machines = &model.bundle().machines;
        let mut panel = OverviewPanel::new(ViewMode::Workflow);
        panel.toggle_selection(&machines[0], &mut model.rng);
        panel.insight = InsightSlot::Ready {
            ticket: 1,
            text: "old".to_string(),
        };
        panel.toggle_selection(&machines[1], &mut model.rng);
        assert_eq!(panel.insight, InsightSlot::Idle);
    }

    #[test]
    fn case_selection_toggles() {
        let mut panel = KnowledgePanel::default();
        assert_eq!(panel.toggle_selection("case-p01"), Some("case-p01"));
        assert_eq!(panel.toggle_selection("case-p02"), Some("case-p02"));
        assert_eq!(panel.toggle_selection("case-p02"), None);
    }

    #[test]
    fn visible_cases_follow_query() {
        let model = model();
        let mut panel = KnowledgePanel::default();
        assert_eq!(panel.visible(&model.bundle().cases).len(), 2);
        panel.search_query = "zzz".to_string();
        assert!(panel.visible(&model.bundle().cases).is_empty());
        panel.cursor = 4;
        panel.clamp_cursor(0);
        assert_eq!(panel.cursor, 0);
    }

    #[test]
    fn pending_target_finds_each_slot_kind() {
        let mut session = model().session;
        session.overview.selected_machine = Some("conveyor1".to_string());
        session.overview.insight.begin(1);
        session.slot_mut(InsightKind::Batch, "BATCH-P002").begin(2);
        session.knowledge.selected_case = Some("case-p01".to_string());
        session.knowledge.insight.begin(3);

        assert_eq!(
            session.pending_target(1),
            Some((InsightKind::Machine, "conveyor1".to_string()))
        );
        assert_eq!(
            session.pending_target(2),
            Some((InsightKind::Batch, "BATCH-P002".to_string()))
        );
        assert_eq!(
            session.pending_target(3),
            Some((InsightKind::Case, "case-p01".to_string()))
        );
        assert_eq!(session.pending_target(4), None);
    }

    #[test]
    fn traversal_matches_view_mode() {
        let model = model();
        let mut panel = OverviewPanel::new(ViewMode::Category);
        let bundle = model.bundle();
        assert_eq!(panel.traversal(bundle).len(), bundle.machines.len());
        panel.view_mode = ViewMode::Workflow;
        assert_eq!(panel.traversal(bundle).len(), 8);
        assert!(panel.cursor_machine(bundle).is_some());
    }

    #[test]
    fn shipped_machines_are_never_in_error() {
        let model = model();
        assert!(
            model
                .bundle()
                .machines
                .iter()
                .all(|m| m.status != StatusLevel::Error)
        );
    }

    #[test]
    fn cmd_batch_flattens_trivial_cases() {
        assert_eq!(DashboardCmd::batch(vec![]), DashboardCmd::None);
        assert_eq!(
            DashboardCmd::batch(vec![DashboardCmd::None, DashboardCmd::Quit]),
            DashboardCmd::Quit
        );
        let log = DashboardCmd::Log(ActivityRecord::new(
            EventType::Search,
            ProductionLine::Palletizing,
        ));
        assert!(matches!(
            DashboardCmd::batch(vec![log.clone(), DashboardCmd::Quit]),
            DashboardCmd::Batch(ref cmds) if cmds.len() == 2
        ));
    }
}
