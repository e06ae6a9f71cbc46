//! Canonical runtime entrypoint for dashboard execution.
//!
//! Owns the terminal, the activity log and the timer inbox. Everything else
//! flows through the pure `update()`/`render_frame()` pair.

#![allow(missing_docs)]

use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event};
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};

use super::model::{DashboardCmd, DashboardModel, DashboardMsg};
use super::render::{Frame, render_frame};
use super::terminal_guard::TerminalGuard;
use super::theme::{AccessibilityProfile, Theme};
use super::update::update;
use crate::core::config::{DashboardConfig, LoggingConfig};
use crate::core::errors::{MonitorError, Result};
use crate::logger::jsonl::{ActivityRecord, EventType, JsonlWriter, LogEntry, Severity};

/// Runtime configuration for one dashboard session.
#[derive(Debug, Clone)]
pub struct DashboardRuntimeConfig {
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
    pub accessibility: AccessibilityProfile,
    /// Seed for decorative randomness (live samples, insight filler figures).
    pub seed: u64,
}

impl DashboardRuntimeConfig {
    /// Seed derived from the wall clock, for interactive sessions.
    #[must_use]
    pub fn clock_seed() -> u64 {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        nanos.unsigned_abs()
    }
}

/// Run the interactive dashboard until the operator quits.
///
/// # Errors
/// Returns [`MonitorError::Terminal`] when the terminal cannot be set up,
/// read or painted.
pub fn run_dashboard(config: &DashboardRuntimeConfig) -> Result<()> {
    let mut log = JsonlWriter::from_logging(&config.logging);
    let mut model = DashboardModel::new(&config.dashboard, config.seed);
    log.record(
        ActivityRecord::new(EventType::SessionStart, model.active_line).details(format!(
            "view={} delay_ms={} log={}",
            config.dashboard.start_view_mode,
            config.dashboard.insight_delay_ms,
            log.state()
        )),
    );

    let guard = TerminalGuard::new().map_err(terminal_error)?;
    model.terminal_size = TerminalGuard::terminal_size();
    let (tx, rx) = crossbeam_channel::unbounded();
    let result = event_loop(&mut model, config.accessibility, &tx, &rx, &mut log);
    drop(guard);

    let mut end = ActivityRecord::new(EventType::SessionEnd, model.active_line);
    if let Err(err) = &result {
        log.write_entry(&LogEntry::from_error(err));
        end = end.severity(Severity::Warning);
    }
    log.record(end);
    log.flush();
    result
}

fn terminal_error(source: io::Error) -> MonitorError {
    MonitorError::Terminal { source }
}

fn event_loop(
    model: &mut DashboardModel,
    accessibility: AccessibilityProfile,
    tx: &Sender<DashboardMsg>,
    rx: &Receiver<DashboardMsg>,
    log: &mut JsonlWriter,
) -> Result<()> {
    let mut stdout = io::stdout();
    let mut last_tick = Instant::now();

    loop {
        let theme = Theme::for_terminal(model.terminal_size.0, accessibility);
        let frame = render_frame(model, &theme);
        model.scroll = frame.scroll;
        paint(&mut stdout, &frame, &theme).map_err(terminal_error)?;

        while let Ok(msg) = rx.try_recv() {
            if execute(update(model, msg), tx, log) {
                return Ok(());
            }
        }

        let timeout = model.tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout).map_err(terminal_error)? {
            let msg = match event::read().map_err(terminal_error)? {
                Event::Key(key) => Some(DashboardMsg::Key(key)),
                Event::Resize(cols, rows) => Some(DashboardMsg::Resize { cols, rows }),
                _ => None,
            };
            if let Some(msg) = msg
                && execute(update(model, msg), tx, log)
            {
                return Ok(());
            }
        }

        if last_tick.elapsed() >= model.tick {
            last_tick = Instant::now();
            if execute(update(model, DashboardMsg::Tick), tx, log) {
                return Ok(());
            }
        }
    }
}

/// Run a command's side-effects. Returns `true` when the loop should stop.
fn execute(cmd: DashboardCmd, tx: &Sender<DashboardMsg>, log: &mut JsonlWriter) -> bool {
    match cmd {
        DashboardCmd::None => false,
        DashboardCmd::Quit => true,
        DashboardCmd::Batch(cmds) => {
            let mut quit = false;
            for cmd in cmds {
                quit |= execute(cmd, tx, log);
            }
            quit
        }
        DashboardCmd::ScheduleInsight { ticket, after } => {
            if let Err(err) = schedule_insight(tx.clone(), ticket, after) {
                log.write_entry(&LogEntry::from_error(
                    &MonitorError::Runtime {
                        details: format!("insight timer {ticket}: {err}"),
                    },
                ));
            }
            false
        }
        DashboardCmd::Log(record) => {
            log.record(record);
            false
        }
    }
}

/// Post `InsightReady { ticket }` after `after` from a short-lived thread.
fn schedule_insight(
    tx: Sender<DashboardMsg>,
    ticket: u64,
    after: Duration,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("lmon-insight-{ticket}"))
        .spawn(move || {
            thread::sleep(after);
            // The loop may already be gone; a closed inbox is fine.
            let _ = tx.send(DashboardMsg::InsightReady { ticket });
        })
}

fn paint(stdout: &mut io::Stdout, frame: &Frame, theme: &Theme) -> io::Result<()> {
    for (row, line) in frame.lines.iter().enumerate() {
        queue!(stdout, MoveTo(0, u16::try_from(row).unwrap_or(u16::MAX)))?;
        for span in &line.spans {
            if !theme.accessibility.no_color() {
                let tag = theme.palette.entry(span.style.token).color_tag;
                queue!(stdout, SetForegroundColor(color_for_tag(tag)))?;
            }
            if span.style.bold {
                queue!(stdout, SetAttribute(Attribute::Bold))?;
            }
            if span.style.reverse {
                queue!(stdout, SetAttribute(Attribute::Reverse))?;
            }
            queue!(stdout, Print(&span.text), SetAttribute(Attribute::Reset))?;
        }
    }
    stdout.flush()
}

/// Terminal color for a palette tag.
fn color_for_tag(tag: &str) -> Color {
    match tag {
        "cyan" => Color::DarkCyan,
        "bright-cyan" => Color::Cyan,
        "green" => Color::DarkGreen,
        "bright-green" => Color::Green,
        "yellow" => Color::DarkYellow,
        "bright-yellow" => Color::Yellow,
        "red" => Color::DarkRed,
        "bright-red" => Color::Red,
        "blue" => Color::DarkBlue,
        "bright-blue" => Color::Blue,
        "dark-grey" => Color::DarkGrey,
        "grey" => Color::Grey,
        "bright-white" => Color::White,
        _ => Color::Reset,
    }
}
