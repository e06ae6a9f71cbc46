//! Frame composition for the dashboard.
//!
//! Two entrypoints:
//! - `render_frame()` builds the visible viewport as styled lines; the runtime
//!   paints them.
//! - `render_to_string()` is the plain-text path used by tests.
//!
//! Both are pure functions of the model.

#![allow(missing_docs)]
#![allow(clippy::too_many_lines)]

use super::input::{InputContext, contextual_help};
use super::model::{DashboardModel, Focus, LIVE_SAMPLE_LABELS, Overlay};
use super::theme::{AccessibilityProfile, SemanticToken, Theme};
use super::widgets::{
    Line, Series, Span, Style, axis_bar, domain_sparkline, ellipsize, grid, legend, metric_card,
    pad, render_gauge, rule, series_chart, severity_badge, status_badge, wrap,
};
use crate::analytics::batch::BatchMetrics;
use crate::analytics::grouping::{ViewMode, group_by_category, workflow_preview};
use crate::analytics::oee::{CHART_DOMAIN, OeeSummary, rating};
use crate::analytics::units::{format_value, title_case, unit_for_key};
use crate::catalog::model::{BatchRecord, CaseStudy, LineBundle, Machine, StatusLevel};
use crate::insight::{InsightKind, InsightSlot, LOADING_LABEL, REPORT_HEADING, trigger_label};

pub const HEADER_ROWS: usize = 4;
pub const FOOTER_ROWS: usize = 1;
pub const APP_TITLE: &str = "Panasonic AI Control Center";
pub const APP_SUBTITLE: &str = "Industrial IoT Management Platform";
pub const CASE_PLACEHOLDER: &str = "Select a case study to view detailed analysis";

/// Axis of the before/after bars in a case study.
const IMPACT_DOMAIN: (f64, f64) = (75.0, 95.0);
const LIVE_DOMAIN: (f64, f64) = (80.0, 100.0);
const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const MIN_COLS: usize = 40;

/// One painted screen: header, scrolled body window and footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<Line>,
    /// Scroll offset actually applied (clamped to the content).
    pub scroll: usize,
    /// Total body rows before windowing.
    pub content_rows: usize,
}

/// Build the frame for the current model.
#[must_use]
pub fn render_frame(model: &DashboardModel, theme: &Theme) -> Frame {
    let width = usize::from(model.terminal_size.0).max(MIN_COLS);
    let rows = usize::from(model.terminal_size.1).max(HEADER_ROWS + FOOTER_ROWS + 1);
    let body_rows = rows - HEADER_ROWS - FOOTER_ROWS;

    let body = body_lines(model, theme, width);
    let (start, end) = window(model.scroll, body.len(), body_rows);
    let mut visible: Vec<Line> = body[start..end].to_vec();
    visible.resize(body_rows, Line::default());

    if model.overlay == Some(Overlay::Help) {
        draw_help_overlay(model, &mut visible, width);
    }

    let mut lines = header_lines(model, width);
    lines.extend(visible);
    lines.push(footer_line(model, width));
    Frame {
        lines: lines.into_iter().map(|line| line.fit(width)).collect(),
        scroll: start,
        content_rows: body.len(),
    }
}

/// Plain-text rendering with default accessibility, one row per line.
#[must_use]
pub fn render_to_string(model: &DashboardModel) -> String {
    let theme = Theme::for_terminal(model.terminal_size.0, AccessibilityProfile::default());
    let frame = render_frame(model, &theme);
    let mut out = String::new();
    for line in &frame.lines {
        out.push_str(line.text().trim_end());
        out.push('\n');
    }
    out
}

/// Visible `[start, end)` rows for a scroll offset, clamped so the last page
/// stays full.
#[must_use]
pub fn window(scroll: usize, total: usize, rows: usize) -> (usize, usize) {
    let start = scroll.min(total.saturating_sub(rows));
    (start, (start + rows).min(total))
}

fn spinner(frame: u64) -> char {
    let len = SPINNER.len() as u64;
    SPINNER[usize::try_from(frame % len).unwrap_or(0)]
}

// ──────────────────── chrome ────────────────────

fn header_lines(model: &DashboardModel, width: usize) -> Vec<Line> {
    let engineer = format!("Engineer: {}", model.engineer);
    let title_gap = width.saturating_sub(APP_TITLE.len() + engineer.chars().count() + 2);
    let title = Line::styled(format!(" {APP_TITLE}"), Style::token(SemanticToken::Accent).bold())
        .push(" ".repeat(title_gap), Style::default())
        .push(engineer, Style::token(SemanticToken::Muted));
    let subtitle = Line::styled(format!(" {APP_SUBTITLE}"), Style::token(SemanticToken::Muted));

    let mut tabs = Line::plain(" ");
    for line in crate::catalog::model::ProductionLine::ALL {
        let label = format!(" [{}] {} ", line.number(), line.title());
        let style = if line == model.active_line {
            Style::token(SemanticToken::Accent).bold().reverse()
        } else {
            Style::token(SemanticToken::Muted)
        };
        tabs = tabs.push(label, style).push(" ", Style::default());
    }

    vec![title, subtitle, tabs, rule("", width)]
}

fn footer_line(model: &DashboardModel, width: usize) -> Line {
    let mut line = Line::styled(
        format!(" {} ", model.focus.label()),
        Style::token(SemanticToken::Accent).reverse(),
    );
    let hints = if model.session.knowledge.search_editing && model.focus == Focus::Knowledge {
        " type to search · Enter/Esc done · C-u clear"
    } else {
        " Tab panel · 1/2 line · g insight · ? help · q quit"
    };
    line = line.push(hints, Style::token(SemanticToken::Muted));
    if model.has_pending_insight() {
        let status = format!("{} {LOADING_LABEL} ", spinner(model.frame));
        let gap = width.saturating_sub(line.width() + status.chars().count());
        line = line
            .push(" ".repeat(gap), Style::default())
            .push(status, Style::token(SemanticToken::Warning));
    }
    line
}

fn section(title: &str, focused: bool, width: usize) -> Line {
    if !focused {
        return rule(title, width);
    }
    let head = format!("━━ {title} ");
    let rest = width.saturating_sub(head.chars().count());
    Line::styled(head, Style::token(SemanticToken::Accent).bold())
        .push("━".repeat(rest), Style::token(SemanticToken::Accent))
}

fn heading(text: &str) -> Line {
    Line::styled(format!("  {text}"), Style::default().bold())
}

fn bullets(items: &[String], width: usize) -> Vec<Line> {
    let mut lines = Vec::new();
    for item in items {
        for (idx, row) in wrap(item, width.saturating_sub(6)).into_iter().enumerate() {
            let prefix = if idx == 0 { "    • " } else { "      " };
            lines.push(Line::plain(format!("{prefix}{row}")));
        }
    }
    lines
}

fn paragraph(label: &str, text: &str, width: usize) -> Vec<Line> {
    let body = if label.is_empty() {
        text.to_string()
    } else {
        format!("{label}: {text}")
    };
    wrap(&body, width.saturating_sub(4))
        .into_iter()
        .map(|row| Line::plain(format!("    {row}")))
        .collect()
}

fn insight_lines(slot: Option<&InsightSlot>, label: &str, frame: u64, width: usize) -> Vec<Line> {
    let mut lines = vec![Line::styled(
        format!("  [g] {label}"),
        Style::token(SemanticToken::Accent),
    )];
    match slot {
        Some(InsightSlot::Pending { .. }) => lines.push(Line::styled(
            format!("    {} {LOADING_LABEL}", spinner(frame)),
            Style::token(SemanticToken::Warning),
        )),
        Some(InsightSlot::Ready { text, .. }) => {
            lines.push(Line::styled(
                format!("    {REPORT_HEADING}"),
                Style::token(SemanticToken::Info).bold(),
            ));
            for row in text.lines() {
                for wrapped in wrap(row, width.saturating_sub(6)) {
                    lines.push(Line::plain(format!("    {wrapped}")));
                }
            }
        }
        Some(InsightSlot::Idle) | None => {}
    }
    lines
}

fn draw_help_overlay(model: &DashboardModel, body: &mut [Line], width: usize) {
    let help = contextual_help(InputContext {
        focus: model.focus,
        active_overlay: None,
        search_editing: model.focus == Focus::Knowledge && model.session.knowledge.search_editing,
    });
    let box_width = width.saturating_sub(4).min(64);
    let inner = box_width.saturating_sub(4);
    let left = " ".repeat((width - box_width) / 2);
    let border = Style::token(SemanticToken::Accent);

    let mut rows = Vec::with_capacity(help.bindings.len() + 4);
    let title = format!(" Help · {} ", help.title);
    rows.push(
        Line::styled(format!("╭{title}"), border)
            .push("─".repeat(box_width.saturating_sub(title.chars().count() + 2)), border)
            .push("╮", border),
    );
    let mut content = vec![Line::styled(
        ellipsize(help.panel_hint, inner),
        Style::token(SemanticToken::Muted),
    )];
    for binding in &help.bindings {
        content.push(
            Line::styled(pad(binding.keys, 16), Style::default().bold())
                .push(binding.description, Style::default()),
        );
    }
    for line in content {
        rows.push(
            Line::styled("│ ", border)
                .append(line.fit(inner))
                .push(" │", border),
        );
    }
    rows.push(Line::styled(
        format!("╰{}╯", "─".repeat(box_width.saturating_sub(2))),
        border,
    ));

    for (slot, row) in body.iter_mut().skip(1).zip(rows) {
        *slot = Line::plain(left.clone()).append(row);
    }
}

// ──────────────────── body ────────────────────

fn body_lines(model: &DashboardModel, theme: &Theme, width: usize) -> Vec<Line> {
    let mut lines = oee_section(model.bundle(), width);
    lines.push(Line::default());
    lines.extend(overview_section(model, theme, width));
    lines.push(Line::default());
    lines.extend(batch_section(model, theme, width));
    lines.push(Line::default());
    lines.extend(knowledge_section(model, width));
    lines
}

fn oee_section(bundle: &LineBundle, width: usize) -> Vec<Line> {
    let summary = OeeSummary::derive(&bundle.records, &bundle.trend);
    let mut lines = vec![section(&format!("OEE Summary · {}", bundle.title), false, width)];
    lines.push(
        Line::styled("  Overall OEE ", Style::default().bold())
            .push(
                format!("{:.1}%", summary.overall),
                Style::token(SemanticToken::Accent).bold(),
            )
            .push(format!("  {}", render_gauge(summary.overall, 24)), Style::default())
            .push(
                format!("  {}", rating(summary.overall)),
                Style::token(SemanticToken::Muted),
            ),
    );
    lines.push(Line::plain(format!(
        "  Availability {:.1}%   Performance {:.1}%   Quality {:.1}%",
        summary.current.availability, summary.current.performance, summary.current.quality
    )));
    if let (Some(first), Some(last)) = (bundle.trend.first(), bundle.trend.last()) {
        let oee: Vec<f64> = bundle.trend.iter().map(|p| p.oee).collect();
        lines.push(
            Line::plain("  Trend ")
                .push(domain_sparkline(&oee, CHART_DOMAIN), Style::token(SemanticToken::Accent))
                .push(
                    format!("  {} → {}", first.name, last.name),
                    Style::token(SemanticToken::Muted),
                ),
        );
    }

    let series = [
        Series {
            label: "OEE",
            glyph: '●',
            token: SemanticToken::Accent,
            values: bundle.trend.iter().map(|p| p.oee).collect(),
        },
        Series {
            label: "Availability",
            glyph: '▲',
            token: SemanticToken::Success,
            values: bundle
                .trend
                .iter()
                .map(|p| p.availability.unwrap_or(0.0))
                .collect(),
        },
        Series {
            label: "Performance",
            glyph: '■',
            token: SemanticToken::Warning,
            values: bundle
                .trend
                .iter()
                .map(|p| p.performance.unwrap_or(0.0))
                .collect(),
        },
        Series {
            label: "Quality",
            glyph: '◆',
            token: SemanticToken::Info,
            values: bundle.trend.iter().map(|p| p.quality.unwrap_or(0.0)).collect(),
        },
    ];
    let labels: Vec<&str> = bundle.trend.iter().map(|p| p.name.as_str()).collect();
    let col_width = (width.saturating_sub(8) / labels.len().max(1)).clamp(1, 4);
    lines.extend(series_chart(&series, &labels, CHART_DOMAIN, 8, col_width));
    lines.push(legend(&series));
    lines
}

fn overview_section(model: &DashboardModel, theme: &Theme, width: usize) -> Vec<Line> {
    let bundle = model.bundle();
    let overview = &model.session.overview;
    let focused = model.focus == Focus::Overview;
    let mut lines = vec![section(
        &format!("Production Line Overview · {}", overview.view_mode.label()),
        focused,
        width,
    )];

    let online = bundle
        .machines
        .iter()
        .filter(|m| m.status == StatusLevel::Ok)
        .count();
    lines.push(Line::styled(
        format!(
            "  {} machines · {online} online · {} need attention",
            bundle.machines.len(),
            bundle.machines.len() - online
        ),
        Style::token(SemanticToken::Muted),
    ));

    let cursor_id = focused
        .then(|| overview.cursor_machine(bundle))
        .flatten()
        .map(|m| m.id.as_str());
    let selected_id = overview.selected_machine.as_deref();
    match overview.view_mode {
        ViewMode::Workflow => {
            lines.extend(workflow_chain(
                workflow_preview(&bundle.machines),
                cursor_id,
                selected_id,
                width,
            ));
        }
        ViewMode::Category => {
            for group in group_by_category(&bundle.machines) {
                lines.push(Line::styled(
                    format!("  {} ({})", group.category, group.machines.len()),
                    Style::token(SemanticToken::Accent).bold(),
                ));
                for machine in group.machines {
                    lines.push(machine_row(machine, cursor_id, selected_id));
                }
            }
        }
    }

    lines.push(Line::default());
    match overview.selected(bundle) {
        Some(machine) => lines.extend(machine_detail(model, machine, theme, width)),
        None => lines.push(Line::styled(
            "  Enter: select a machine to view details",
            Style::token(SemanticToken::Muted),
        )),
    }
    lines
}

fn machine_style(machine: &Machine, cursor: Option<&str>, selected: Option<&str>) -> Style {
    let mut style = Style::token(SemanticToken::for_status(machine.status));
    if selected == Some(machine.id.as_str()) {
        style = style.bold();
    }
    if cursor == Some(machine.id.as_str()) {
        style = style.reverse();
    }
    style
}

/// `A ─▶ B ─▶ …`, wrapped onto new rows when wider than the panel.
fn workflow_chain(
    machines: &[Machine],
    cursor: Option<&str>,
    selected: Option<&str>,
    width: usize,
) -> Vec<Line> {
    const CONNECTOR: &str = " ─▶ ";
    let connector_style = Style::token(SemanticToken::Muted);
    let mut lines = Vec::new();
    let mut current = Line::plain("  ");
    for (idx, machine) in machines.iter().enumerate() {
        let marker = if selected == Some(machine.id.as_str()) {
            "◆"
        } else {
            "●"
        };
        let node = Span::new(
            format!("{marker} {}", machine.name),
            machine_style(machine, cursor, selected),
        );
        let needed = node.width() + if idx > 0 { CONNECTOR.len() } else { 0 };
        if idx > 0 && current.width() + needed > width {
            current = current.push(" ─", connector_style);
            lines.push(current);
            current = Line::styled("  ▶ ", connector_style);
        } else if idx > 0 {
            current = current.push(CONNECTOR, connector_style);
        }
        current = current.span(node);
    }
    lines.push(current);
    lines
}

fn machine_row(machine: &Machine, cursor: Option<&str>, selected: Option<&str>) -> Line {
    let marker = if cursor == Some(machine.id.as_str()) {
        "  ▶ "
    } else {
        "    "
    };
    let preview: Vec<String> = machine
        .metrics
        .iter()
        .take(2)
        .map(|metric| {
            let unit = unit_for_key(&metric.key);
            let value = format_value(&metric.value, 1);
            if unit.is_empty() {
                format!("{} {value}", metric.key)
            } else {
                format!("{} {value}{unit}", metric.key)
            }
        })
        .collect();
    Line::plain(marker)
        .push(pad(&machine.name, 30), machine_style(machine, cursor, selected))
        .span(status_badge(machine.status))
        .push(
            format!("  {}", preview.join(" · ")),
            Style::token(SemanticToken::Muted),
        )
}

fn machine_detail(
    model: &DashboardModel,
    machine: &Machine,
    theme: &Theme,
    width: usize,
) -> Vec<Line> {
    let overview = &model.session.overview;
    let card_width = usize::from(theme.spacing.card_width);
    let gap = usize::from(theme.spacing.card_gap);

    let mut lines = vec![
        Line::styled(format!("  ◆ {}", machine.name), Style::default().bold())
            .push(
                format!("  {} · {}  ", machine.id, machine.category),
                Style::token(SemanticToken::Muted),
            )
            .span(status_badge(machine.status)),
    ];

    let cards: Vec<Vec<Line>> = machine
        .metrics
        .iter()
        .enumerate()
        .map(|(idx, metric)| {
            metric_card(
                &title_case(&metric.key),
                &format_value(&metric.value, 1),
                unit_for_key(&metric.key),
                overview.metric_trends.get(idx).copied().flatten(),
                machine.status,
                card_width,
            )
        })
        .collect();
    lines.extend(
        grid(cards, card_width, gap, width.saturating_sub(2))
            .into_iter()
            .map(|row| Line::plain("  ").append(row)),
    );

    lines.push(heading("Live Performance"));
    let live = [Series {
        label: "Efficiency %",
        glyph: '●',
        token: SemanticToken::Accent,
        values: overview.live_samples.clone(),
    }];
    let col_width = (width.saturating_sub(8) / LIVE_SAMPLE_LABELS.len()).clamp(1, 12);
    lines.extend(series_chart(&live, &LIVE_SAMPLE_LABELS, LIVE_DOMAIN, 5, col_width));

    lines.push(heading("Controller"));
    for metric in machine.metrics.iter().take(4) {
        let unit = unit_for_key(&metric.key);
        lines.push(Line::plain(format!(
            "    {} {}{}",
            pad(&title_case(&metric.key), 16),
            format_value(&metric.value, 2),
            if unit.is_empty() {
                String::new()
            } else {
                format!(" {unit}")
            }
        )));
    }

    lines.extend(insight_lines(
        Some(&overview.insight),
        &trigger_label(InsightKind::Machine, &machine.name),
        model.frame,
        width,
    ));
    lines
}

// ──────────────────── batches ────────────────────

const BATCH_COLUMNS: [(&str, usize); 7] = [
    ("Batch ID", 12),
    ("Model", 14),
    ("Operator", 14),
    ("Time", 14),
    ("Qty", 6),
    ("OEE", 7),
    ("Progress", 16),
];

fn batch_section(model: &DashboardModel, theme: &Theme, width: usize) -> Vec<Line> {
    let bundle = model.bundle();
    let batches = &model.session.batches;
    let focused = model.focus == Focus::Batches;
    let mut lines = vec![section("Batch Management", focused, width)];

    let header: String = BATCH_COLUMNS
        .iter()
        .map(|(title, w)| pad(title, *w))
        .collect();
    lines.push(Line::styled(
        format!("      {header}Status"),
        Style::token(SemanticToken::Muted).bold(),
    ));

    if bundle.records.is_empty() {
        lines.push(Line::styled(
            "    No batches recorded",
            Style::token(SemanticToken::Muted),
        ));
    }

    for (idx, record) in bundle.records.iter().enumerate() {
        let expanded = batches.is_expanded(&record.id);
        let under_cursor = focused && idx == batches.cursor;
        lines.push(batch_row(record, expanded, under_cursor));
        if expanded {
            lines.extend(batch_detail(model, record, theme, width));
        }
    }
    lines
}

fn batch_row(record: &BatchRecord, expanded: bool, under_cursor: bool) -> Line {
    let metrics = BatchMetrics::derive(&record.children);
    let cells = [
        record.id.clone(),
        record.model.clone(),
        record.operator.clone(),
        record.timeline("-"),
        record.quantity.to_string(),
        format!("{:.1}%", record.oee),
        format!("{}/{} completed", metrics.completed, metrics.total),
    ];
    let row: String = cells
        .iter()
        .zip(BATCH_COLUMNS)
        .map(|(cell, (_, w))| pad(&ellipsize(cell, w - 1), w))
        .collect();
    let marker = if under_cursor { "  ▶ " } else { "    " };
    let fold = if expanded { "▾ " } else { "▸ " };
    let style = if under_cursor {
        Style::default().reverse()
    } else {
        Style::default()
    };
    Line::plain(marker)
        .push(format!("{fold}{row}"), style)
        .span(status_badge(record.status_level()))
}

fn batch_detail(
    model: &DashboardModel,
    record: &BatchRecord,
    theme: &Theme,
    width: usize,
) -> Vec<Line> {
    let bundle = model.bundle();
    let metrics = BatchMetrics::derive(&record.children);
    // Aggregate cards carry no health signal of their own.
    let level = StatusLevel::Ok;
    let card_width = usize::from(theme.spacing.card_width);
    let gap = usize::from(theme.spacing.card_gap);

    let cards = vec![
        metric_card(
            "Progress",
            &metrics.progress_pct.to_string(),
            "%",
            None,
            level,
            card_width,
        ),
        metric_card(
            "Duration",
            &format!("{:.1}", metrics.duration_hours),
            "h",
            None,
            level,
            card_width,
        ),
        metric_card(
            "Weight",
            &metrics.weight_kg.to_string(),
            "kg",
            None,
            level,
            card_width,
        ),
    ];
    let mut lines: Vec<Line> = grid(cards, card_width, gap, width.saturating_sub(6))
        .into_iter()
        .map(|row| Line::plain("      ").append(row))
        .collect();

    let names: Vec<&str> = workflow_preview(&bundle.machines)
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    lines.extend(paragraph("Machines", &names.join(" ─▶ "), width));

    lines.push(heading("Units"));
    if record.children.is_empty() {
        lines.push(Line::styled(
            "    No units recorded",
            Style::token(SemanticToken::Muted),
        ));
    }
    for child in &record.children {
        let weight = child.weight.unwrap_or(0.0);
        let time = child.time.as_deref().unwrap_or("0h");
        lines.push(
            Line::plain(format!(
                "    {}{}{}{}",
                pad(&child.id, 12),
                pad(&ellipsize(&child.details, 31), 32),
                pad(&format!("{weight} kg"), 10),
                pad(time, 7),
            ))
            .span(status_badge(StatusLevel::from_progress_label(&child.status))),
        );
    }

    lines.extend(paragraph("AI summary", &record.ai_summary, width));
    lines.extend(insight_lines(
        model.session.batches.insight(&record.id),
        &trigger_label(InsightKind::Batch, &record.id),
        model.frame,
        width,
    ));
    lines.push(Line::default());
    lines
}

// ──────────────────── knowledge ────────────────────

fn knowledge_section(model: &DashboardModel, width: usize) -> Vec<Line> {
    let bundle = model.bundle();
    let knowledge = &model.session.knowledge;
    let focused = model.focus == Focus::Knowledge;
    let visible = knowledge.visible(&bundle.cases);
    let mut lines = vec![section("Knowledge Base", focused, width)];

    let editing = focused && knowledge.search_editing;
    let query_style = if editing {
        Style::token(SemanticToken::Accent).bold()
    } else {
        Style::default()
    };
    lines.push(
        Line::plain("  Search: ")
            .push(
                format!(
                    "{}{}",
                    knowledge.search_query,
                    if editing { "▏" } else { "" }
                ),
                query_style,
            )
            .push(
                format!("  ({} of {} cases)", visible.len(), bundle.cases.len()),
                Style::token(SemanticToken::Muted),
            ),
    );

    if visible.is_empty() {
        lines.push(Line::styled(
            format!("    No case studies match \"{}\"", knowledge.search_query),
            Style::token(SemanticToken::Muted),
        ));
    }
    let selected = knowledge.selected_case.as_deref();
    for (idx, case) in visible.iter().enumerate() {
        let under_cursor = focused && idx == knowledge.cursor;
        lines.extend(case_row(case, under_cursor, selected == Some(case.id.as_str()), width));
    }

    lines.push(Line::default());
    match knowledge.selected(bundle) {
        Some(case) => lines.extend(case_detail(model, case, width)),
        None => lines.push(Line::styled(
            format!("  {CASE_PLACEHOLDER}"),
            Style::token(SemanticToken::Muted),
        )),
    }
    lines
}

fn case_row(case: &CaseStudy, under_cursor: bool, selected: bool, width: usize) -> Vec<Line> {
    let marker = if under_cursor { "  ▶ " } else { "    " };
    let mut title_style = Style::default().bold();
    if under_cursor {
        title_style = title_style.reverse();
    }
    let title_mark = if selected { "◆ " } else { "" };
    let tags: Vec<String> = case.tags.iter().map(|tag| format!("#{tag}")).collect();
    let improvement = case
        .solution
        .oee_impact
        .improvement
        .as_deref()
        .unwrap_or("N/A");
    vec![
        Line::plain(marker)
            .push(format!("{title_mark}{}", case.title), title_style)
            .push(" ", Style::default())
            .span(severity_badge(&case.severity)),
        Line::styled(format!("      {}", tags.join(" ")), Style::token(SemanticToken::Info)),
        Line::styled(
            format!("      {}", ellipsize(&case.problem, width.saturating_sub(8))),
            Style::token(SemanticToken::Muted),
        ),
        Line::styled(
            format!("      OEE: {improvement}"),
            Style::token(SemanticToken::Success),
        ),
    ]
}

fn case_detail(model: &DashboardModel, case: &CaseStudy, width: usize) -> Vec<Line> {
    let mut lines = vec![
        Line::styled(format!("  {}", case.title), Style::default().bold()),
        Line::plain("  ")
            .span(severity_badge(&case.severity))
            .push(
                format!(" [{}]", case.impact),
                Style::token(SemanticToken::Warning),
            ),
        Line::styled(
            format!(
                "  {}",
                case.tags
                    .iter()
                    .map(|tag| format!("#{tag}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
            Style::token(SemanticToken::Info),
        ),
    ];

    lines.push(heading("Problem"));
    lines.extend(paragraph("", &case.problem, width));
    if let Some(symptoms) = &case.symptoms {
        lines.push(heading("Symptoms"));
        lines.extend(bullets(symptoms, width));
    }

    let analysis = &case.analysis;
    lines.push(heading(&analysis.title));
    if let Some(methodology) = &analysis.methodology {
        lines.extend(paragraph("Methodology", methodology, width));
    }
    lines.extend(bullets(&analysis.findings, width));
    if let Some(root_cause) = &analysis.root_cause {
        lines.extend(paragraph("Root cause", root_cause, width));
    }

    let solution = &case.solution;
    lines.push(heading(&solution.title));
    lines.extend(paragraph("Immediate action", &solution.immediate_action, width));
    if let Some(preventive) = &solution.preventive_action {
        lines.push(Line::plain("    Preventive measures:"));
        lines.extend(bullets(preventive, width));
    }
    if let Some(implementation) = &solution.implementation {
        lines.extend(paragraph(
            "Implementation",
            &format!(
                "{} · {} · {}",
                implementation.duration, implementation.resources, implementation.cost
            ),
            width,
        ));
    }
    lines.extend(paragraph("Outcome", &solution.outcome, width));

    let impact = &solution.oee_impact;
    lines.push(heading("OEE Impact"));
    lines.push(
        Line::plain("    Before ")
            .push(
                axis_bar(impact.before, IMPACT_DOMAIN, 30),
                Style::token(SemanticToken::Danger),
            )
            .push(format!(" {:.1}%", impact.before), Style::default()),
    );
    lines.push(
        Line::plain("    After  ")
            .push(
                axis_bar(impact.after, IMPACT_DOMAIN, 30),
                Style::token(SemanticToken::Success),
            )
            .push(format!(" {:.1}%", impact.after), Style::default()),
    );
    if let Some(improvement) = &impact.improvement {
        lines.push(Line::styled(
            format!("    Improvement: {improvement}"),
            Style::token(SemanticToken::Success).bold(),
        ));
    }

    if let Some(lessons) = &case.lessons {
        lines.push(heading("Lessons Learned"));
        lines.extend(bullets(lessons, width));
    }
    if let Some(attachments) = &case.attachments {
        lines.push(heading("Attachments"));
        lines.extend(bullets(attachments, width));
    }

    lines.extend(insight_lines(
        Some(&model.session.knowledge.insight),
        &trigger_label(InsightKind::Case, &case.id),
        model.frame,
        width,
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DashboardConfig;

    fn tall_model() -> DashboardModel {
        let mut model = DashboardModel::new(&DashboardConfig::default(), 5);
        model.terminal_size = (120, 400);
        model
    }

    #[test]
    fn window_clamps_to_last_page() {
        assert_eq!(window(0, 100, 10), (0, 10));
        assert_eq!(window(95, 100, 10), (90, 100));
        assert_eq!(window(3, 5, 10), (0, 5));
    }

    #[test]
    fn frame_has_exact_terminal_height_and_width() {
        let mut model = tall_model();
        model.terminal_size = (100, 30);
        let theme = Theme::for_terminal(100, AccessibilityProfile::default());
        let frame = render_frame(&model, &theme);
        assert_eq!(frame.lines.len(), 30);
        assert!(frame.lines.iter().all(|line| line.width() == 100));
        assert!(frame.content_rows > 30);
    }

    #[test]
    fn header_shows_titles_and_tabs() {
        let text = render_to_string(&tall_model());
        assert!(text.contains(APP_TITLE));
        assert!(text.contains(APP_SUBTITLE));
        assert!(text.contains("Engineer: An Nguyễn"));
        assert!(text.contains("[1] Dây chuyền Palletizing"));
        assert!(text.contains("[2] Dây chuyền Hàn Robot"));
    }

    #[test]
    fn oee_summary_uses_one_decimal() {
        let text = render_to_string(&tall_model());
        assert!(text.contains("Overall OEE 86.3%"));
    }

    #[test]
    fn oee_summary_shows_trend_sparkline() {
        let model = tall_model();
        let trend = &model.bundle().trend;
        let oee: Vec<f64> = trend.iter().map(|p| p.oee).collect();
        let expected = domain_sparkline(&oee, CHART_DOMAIN);
        let text = render_to_string(&model);
        assert!(text.contains(&format!("Trend {expected}")));
        assert!(text.contains(&format!(
            "{} → {}",
            trend[0].name,
            trend[trend.len() - 1].name
        )));
    }

    #[test]
    fn workflow_view_chains_first_eight_machines() {
        let text = render_to_string(&tall_model());
        assert!(text.contains("Belt Conveyor 1 ─▶"));
        assert!(text.contains("Workflow View"));
    }

    #[test]
    fn placeholder_without_selected_case() {
        let text = render_to_string(&tall_model());
        assert!(text.contains(CASE_PLACEHOLDER));
    }

    #[test]
    fn batch_rows_and_units_use_health_badges() {
        let model = tall_model();
        let text = render_to_string(&model);
        assert!(!text.contains("[Hoàn thành]"));
        assert!(!text.contains("[Lên lịch]"));
        let first = text
            .lines()
            .find(|line| line.contains("▾ BATCH-P001"))
            .expect("batch row");
        assert!(first.contains("[Online]"));

        let record = model
            .bundle()
            .records
            .iter()
            .find(|r| r.id == "BATCH-P003")
            .expect("scheduled batch");
        let theme = Theme::for_terminal(120, AccessibilityProfile::default());
        let lines: Vec<String> = batch_detail(&model, record, &theme, 120)
            .iter()
            .map(Line::text)
            .collect();
        let machines = lines
            .iter()
            .position(|line| line.contains("Machines"))
            .expect("machines paragraph");
        let cards = &lines[..machines];
        assert!(cards.iter().any(|line| line.contains("[Online]")));
        assert!(cards.iter().all(|line| !line.contains("[Lỗi]")));
        for child in &record.children {
            let row = lines
                .iter()
                .find(|line| line.contains(&child.id))
                .expect("unit row");
            assert!(row.contains("[Lỗi]"), "{row}");
        }
    }

    #[test]
    fn case_rows_show_improvement_as_recorded() {
        let model = tall_model();
        let text = render_to_string(&model);
        assert!(!text.contains("++"));
        assert!(!text.contains("+N/A"));
        for case in &model.bundle().cases {
            let shown = case.solution.oee_impact.improvement.as_deref().unwrap_or("N/A");
            assert!(text.contains(&format!("OEE: {shown}")), "{}", case.id);
        }
    }

    #[test]
    fn expanded_first_batch_lists_units() {
        let model = tall_model();
        let text = render_to_string(&model);
        let first = &model.bundle().records[0];
        for child in &first.children {
            assert!(text.contains(&child.id), "missing {}", child.id);
        }
        assert!(text.contains("[g] Phân tích Batch BATCH-P001"));
    }

    #[test]
    fn help_overlay_lists_bindings() {
        let mut model = tall_model();
        model.overlay = Some(Overlay::Help);
        let text = render_to_string(&model);
        assert!(text.contains("Help · Overview"));
        assert!(text.contains("Toggle workflow/category view"));
    }

    #[test]
    fn narrow_terminal_still_renders() {
        let mut model = tall_model();
        model.terminal_size = (20, 5);
        let theme = Theme::for_terminal(20, AccessibilityProfile::default());
        let frame = render_frame(&model, &theme);
        assert_eq!(frame.lines.len(), HEADER_ROWS + FOOTER_ROWS + 1);
    }
}
