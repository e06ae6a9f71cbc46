//! Widget primitives and shared visual helpers for dashboard panels.
//!
//! Widgets produce styled [`Line`]s and never touch the terminal. Widths are
//! measured in terminal columns, so Vietnamese diacritics and emoji pad
//! correctly.

#![allow(missing_docs)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

use unicode_width::UnicodeWidthStr;

use super::theme::SemanticToken;
use crate::analytics::knowledge::severity_tone;
use crate::catalog::model::StatusLevel;

/// Sparkline glyph ramp shared across panels.
pub const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

// ──────────────────── styled text ────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub token: SemanticToken,
    pub bold: bool,
    pub reverse: bool,
}

impl Style {
    #[must_use]
    pub const fn token(token: SemanticToken) -> Self {
        Self {
            token,
            bold: false,
            reverse: false,
        }
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub const fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    #[must_use]
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::default())
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.text.width()
    }
}

/// One terminal row of styled spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            spans: vec![Span::plain(text)],
        }
    }

    #[must_use]
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            spans: vec![Span::new(text, style)],
        }
    }

    #[must_use]
    pub fn push(mut self, text: impl Into<String>, style: Style) -> Self {
        self.spans.push(Span::new(text, style));
        self
    }

    #[must_use]
    pub fn span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }

    /// Concatenated text without styling.
    #[must_use]
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    /// Right-pad with spaces to exactly `width` columns (truncating if wider).
    #[must_use]
    pub fn fit(self, width: usize) -> Self {
        let mut line = self.truncate(width);
        let used = line.width();
        if used < width {
            line.spans.push(Span::plain(" ".repeat(width - used)));
        }
        line
    }

    /// Cut the line to at most `width` columns.
    #[must_use]
    pub fn truncate(self, width: usize) -> Self {
        if self.width() <= width {
            return self;
        }
        let mut remaining = width;
        let mut spans = Vec::with_capacity(self.spans.len());
        for span in self.spans {
            if remaining == 0 {
                break;
            }
            let w = span.width();
            if w <= remaining {
                remaining -= w;
                spans.push(span);
            } else {
                let text = truncate_to_width(&span.text, remaining);
                remaining = 0;
                spans.push(Span::new(text, span.style));
            }
        }
        Self { spans }
    }
}

/// Longest prefix of `text` that fits in `width` columns.
#[must_use]
pub fn truncate_to_width(text: &str, width: usize) -> String {
    // Measured as a whole string so variation selectors widen their base
    // the same way `Span::width` counts them.
    let mut end = 0;
    for (idx, ch) in text.char_indices() {
        let next = idx + ch.len_utf8();
        if text[..next].width() > width {
            break;
        }
        end = next;
    }
    text[..end].to_string()
}

/// Truncate with a trailing `…` when `text` does not fit.
#[must_use]
pub fn ellipsize(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = truncate_to_width(text, width - 1);
    out.push('…');
    out
}

/// Right-pad to `width` columns.
#[must_use]
pub fn pad(text: &str, width: usize) -> String {
    let used = text.width();
    if used >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - used))
    }
}

/// Split text into rows of at most `width` columns, breaking on spaces.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split(' ') {
            let candidate_width = if current.is_empty() {
                word.width()
            } else {
                current.width() + 1 + word.width()
            };
            if candidate_width > width && !current.is_empty() {
                rows.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            while current.width() > width {
                let head = truncate_to_width(&current, width);
                let rest = current[head.len()..].to_string();
                rows.push(head);
                current = rest;
            }
        }
        rows.push(current);
    }
    rows
}

// ──────────────────── bars and charts ────────────────────

/// Render a normalized sparkline from `0.0..=1.0` values.
#[must_use]
pub fn sparkline(values: &[f64]) -> String {
    values
        .iter()
        .map(|value| {
            let idx = (value.clamp(0.0, 1.0) * 7.0).round() as usize;
            SPARK_CHARS[idx.min(7)]
        })
        .collect()
}

/// Sparkline over a fixed `(low, high)` domain.
#[must_use]
pub fn domain_sparkline(values: &[f64], domain: (f64, f64)) -> String {
    let span = (domain.1 - domain.0).max(f64::EPSILON);
    let normalized: Vec<f64> = values.iter().map(|v| (v - domain.0) / span).collect();
    sparkline(&normalized)
}

/// Render a horizontal bar gauge.
///
/// Returns a string like `[████████████░░░░░░░░] 62%`
#[must_use]
pub fn render_gauge(used_pct: f64, width: usize) -> String {
    let filled = ((used_pct.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    let empty = width.saturating_sub(filled);

    format!(
        "[{}{}] {:.0}%",
        "█".repeat(filled),
        "░".repeat(empty),
        used_pct,
    )
}

/// Bar whose length is `value` placed on a `(low, high)` axis.
#[must_use]
pub fn axis_bar(value: f64, domain: (f64, f64), width: usize) -> String {
    let span = (domain.1 - domain.0).max(f64::EPSILON);
    let ratio = ((value - domain.0) / span).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    format!(
        "{}{}",
        "█".repeat(filled.min(width)),
        "░".repeat(width.saturating_sub(filled))
    )
}

/// One plotted series for [`series_chart`].
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub glyph: char,
    pub token: SemanticToken,
    pub values: Vec<f64>,
}

/// Scatter-style multi-series chart over a fixed y domain.
///
/// Returns `height` plot rows, an x axis row and a label row with the first
/// and last x labels. Later series draw over earlier ones on collisions.
#[must_use]
pub fn series_chart(
    series: &[Series],
    x_labels: &[&str],
    domain: (f64, f64),
    height: usize,
    col_width: usize,
) -> Vec<Line> {
    let height = height.max(2);
    let col_width = col_width.max(1);
    let points = series.iter().map(|s| s.values.len()).max().unwrap_or(0);
    let plot_width = points * col_width;
    let span = (domain.1 - domain.0).max(f64::EPSILON);

    let mut grid: Vec<Vec<Option<(char, SemanticToken)>>> = vec![vec![None; plot_width]; height];
    for s in series {
        for (i, value) in s.values.iter().enumerate() {
            let ratio = ((domain.1 - value) / span).clamp(0.0, 1.0);
            let row = (ratio * (height - 1) as f64).round() as usize;
            grid[row][i * col_width] = Some((s.glyph, s.token));
        }
    }

    let axis_style = Style::token(SemanticToken::Muted);
    let top_label = format!("{:>3.0} ┤", domain.1);
    let bottom_label = format!("{:>3.0} ┤", domain.0);
    let mut lines = Vec::with_capacity(height + 2);
    for (row_idx, row) in grid.into_iter().enumerate() {
        let prefix = if row_idx == 0 {
            top_label.clone()
        } else if row_idx == height - 1 {
            bottom_label.clone()
        } else {
            "    │".to_string()
        };
        let mut line = Line::styled(prefix, axis_style);
        for cell in row {
            line = match cell {
                Some((glyph, token)) => line.push(glyph.to_string(), Style::token(token)),
                None => line.push(" ", Style::default()),
            };
        }
        lines.push(line);
    }
    lines.push(Line::styled(
        format!("    └{}", "─".repeat(plot_width)),
        axis_style,
    ));

    let first = x_labels.first().copied().unwrap_or("");
    let last = x_labels.last().copied().unwrap_or("");
    let gap = plot_width.saturating_sub(first.width() + last.width());
    let label_row = if x_labels.len() > 1 {
        format!("     {first}{}{last}", " ".repeat(gap))
    } else {
        format!("     {first}")
    };
    lines.push(Line::styled(label_row, axis_style));
    lines
}

/// Legend row for a chart.
#[must_use]
pub fn legend(series: &[Series]) -> Line {
    let mut line = Line::plain("     ");
    for s in series {
        line = line
            .push(s.glyph.to_string(), Style::token(s.token))
            .push(format!(" {}  ", s.label), Style::token(SemanticToken::Muted));
    }
    line
}

// ──────────────────── badges and cards ────────────────────

/// `[Online]` / `[Cảnh báo]` / `[Lỗi]` in the status color.
#[must_use]
pub fn status_badge(level: StatusLevel) -> Span {
    Span::new(
        format!("[{}]", level.label()),
        Style::token(SemanticToken::for_status(level)).bold(),
    )
}

/// Case severity label in its tone color.
#[must_use]
pub fn severity_badge(severity: &str) -> Span {
    Span::new(
        format!("[{severity}]"),
        Style::token(SemanticToken::for_severity(severity_tone(severity))),
    )
}

/// `↗ 2.3%` for gains, `↘ 1.0%` for losses; nothing for absent or zero trends.
#[must_use]
pub fn trend_delta(trend: Option<f64>) -> Option<Span> {
    let delta = trend.filter(|delta| *delta != 0.0 && delta.is_finite())?;
    let arrow = if delta > 0.0 { '↗' } else { '↘' };
    Some(Span::new(
        format!("{arrow} {:.1}%", delta.abs()),
        Style::token(SemanticToken::for_delta(delta)),
    ))
}

/// Bordered metric card, exactly `width` columns wide and five rows tall.
#[must_use]
pub fn metric_card(
    title: &str,
    value: &str,
    unit: &str,
    trend: Option<f64>,
    status: StatusLevel,
    width: usize,
) -> Vec<Line> {
    let width = width.max(12);
    let inner = width - 4;
    let border = Style::token(SemanticToken::Muted);
    let badge = status_badge(status);
    let title_room = inner.saturating_sub(badge.width() + 1);

    let header = Line::styled(ellipsize(title, title_room), Style::token(SemanticToken::Muted))
        .fit(title_room + 1)
        .span(badge)
        .fit(inner);
    let mut value_line = Line::styled(value, Style::default().bold());
    if !unit.is_empty() {
        value_line = value_line.push(format!(" {unit}"), Style::token(SemanticToken::Muted));
    }
    let trend_line = trend_delta(trend).map_or_else(Line::default, |span| Line::default().span(span));

    let mut lines = Vec::with_capacity(5);
    lines.push(Line::styled(format!("╭{}╮", "─".repeat(width - 2)), border));
    for body in [header, value_line, trend_line] {
        lines.push(
            Line::styled("│ ", border)
                .append(body.fit(inner))
                .push(" │", border),
        );
    }
    lines.push(Line::styled(format!("╰{}╯", "─".repeat(width - 2)), border));
    lines
}

impl Line {
    /// Append all spans of `other`.
    #[must_use]
    pub fn append(mut self, other: Self) -> Self {
        self.spans.extend(other.spans);
        self
    }
}

/// Lay equally sized blocks side by side, wrapping to new rows when the
/// total width is exhausted.
#[must_use]
pub fn grid(blocks: Vec<Vec<Line>>, block_width: usize, gap: usize, total_width: usize) -> Vec<Line> {
    let per_row = ((total_width + gap) / (block_width + gap).max(1)).max(1);
    let mut out = Vec::new();
    let mut blocks = blocks.into_iter().peekable();
    while blocks.peek().is_some() {
        let row: Vec<Vec<Line>> = blocks.by_ref().take(per_row).collect();
        let height = row.iter().map(Vec::len).max().unwrap_or(0);
        for r in 0..height {
            let mut line = Line::default();
            for (i, block) in row.iter().enumerate() {
                if i > 0 {
                    line = line.push(" ".repeat(gap), Style::default());
                }
                let cell = block.get(r).cloned().unwrap_or_default();
                line = line.append(cell.fit(block_width));
            }
            out.push(line);
        }
    }
    out
}

/// Horizontal rule with an optional title.
#[must_use]
pub fn rule(title: &str, width: usize) -> Line {
    let style = Style::token(SemanticToken::Muted);
    if title.is_empty() {
        return Line::styled("─".repeat(width), style);
    }
    let head = format!("── {title} ");
    let rest = width.saturating_sub(head.width());
    Line::styled(head, style).push("─".repeat(rest), style)
}
