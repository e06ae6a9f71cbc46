//! Dashboard end-to-end tests through the public library API: catalog data,
//! derived figures, and the reducer + renderer pair driven by key events.

#![cfg(feature = "tui")]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::SeedableRng;
use rand::rngs::StdRng;

use line_monitor::analytics::batch::{BatchMetrics, progress_pct, total_weight};
use line_monitor::analytics::knowledge::filter_cases;
use line_monitor::analytics::oee::overall_oee;
use line_monitor::catalog::bundle;
use line_monitor::catalog::model::{BatchRecord, ProductionLine};
use line_monitor::core::config::{Config, DashboardConfig};
use line_monitor::insight::generator::{BATCH_NOT_FOUND, CASE_NOT_FOUND, MACHINE_NOT_FOUND};
use line_monitor::insight::{InsightKind, InsightSlot, generate};
use line_monitor::tui::model::{DashboardCmd, DashboardModel, DashboardMsg, Focus};
use line_monitor::tui::render::render_to_string;
use line_monitor::tui::update::update;

fn press(model: &mut DashboardModel, code: KeyCode) -> DashboardCmd {
    update(model, DashboardMsg::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

fn scheduled_tickets(cmd: &DashboardCmd, out: &mut Vec<u64>) {
    match cmd {
        DashboardCmd::ScheduleInsight { ticket, .. } => out.push(*ticket),
        DashboardCmd::Batch(cmds) => {
            for cmd in cmds {
                scheduled_tickets(cmd, out);
            }
        }
        _ => {}
    }
}

fn tall_model() -> DashboardModel {
    let mut model = DashboardModel::new(&DashboardConfig::default(), 11);
    model.terminal_size = (120, 600);
    model
}

#[test]
fn palletizing_batch_p002_expanded_shows_two_units() {
    let mut model = tall_model();
    press(&mut model, KeyCode::Tab);
    assert_eq!(model.focus, Focus::Batches);
    press(&mut model, KeyCode::Down);
    press(&mut model, KeyCode::Enter);
    assert!(model.session.batches.is_expanded("BATCH-P002"));

    let record = model.bundle().record("BATCH-P002").expect("BATCH-P002");
    assert_eq!(record.children.len(), 2);
    assert_eq!(progress_pct(&record.children), 50);
    assert!((total_weight(&record.children) - 1055.0).abs() < 1e-9);

    let frame = render_to_string(&model);
    assert!(frame.contains("PALLET-002A"));
    assert!(frame.contains("PALLET-002B"));
    assert!(frame.contains("1/2 completed"));
    assert!(frame.contains("50 %"));
    assert!(frame.contains("1055 kg"));
}

#[test]
fn overall_oee_ignores_unstarted_batches() {
    let template = bundle(ProductionLine::Palletizing).records[0].clone();
    let records: Vec<BatchRecord> = [88.2, 84.5, 0.0]
        .into_iter()
        .map(|oee| BatchRecord {
            oee,
            ..template.clone()
        })
        .collect();
    assert!((overall_oee(&records) - 86.35).abs() < 1e-9);
    assert!(overall_oee(&[]).abs() < f64::EPSILON);
}

#[test]
fn every_shipped_batch_has_consistent_metrics() {
    for line in ProductionLine::ALL {
        for record in &bundle(line).records {
            let metrics = BatchMetrics::derive(&record.children);
            assert!(metrics.progress_pct <= 100, "{}", record.id);
            assert!(metrics.completed <= metrics.total, "{}", record.id);
            assert!(metrics.weight_kg >= 0.0, "{}", record.id);
        }
    }
}

#[test]
fn search_matches_tags_case_insensitively() {
    let data = bundle(ProductionLine::Welding);
    let hits = filter_cases(&data.cases, "weld");
    assert!(hits.iter().any(|case| case.id == "case-w01"));
}

#[test]
fn unknown_insight_ids_return_not_found_text() {
    let mut rng = StdRng::seed_from_u64(5);
    for line in ProductionLine::ALL {
        let data = bundle(line);
        assert_eq!(
            generate(InsightKind::Machine, "missing", data, &mut rng),
            MACHINE_NOT_FOUND
        );
        assert_eq!(
            generate(InsightKind::Batch, "missing", data, &mut rng),
            BATCH_NOT_FOUND
        );
        assert_eq!(
            generate(InsightKind::Case, "missing", data, &mut rng),
            CASE_NOT_FOUND
        );
    }
}

#[test]
fn insight_round_trip_through_reducer() {
    let mut model = tall_model();
    press(&mut model, KeyCode::Enter);
    let machine = model
        .session
        .overview
        .selected_machine
        .clone()
        .expect("first machine selected");

    let cmd = press(&mut model, KeyCode::Char('g'));
    let mut tickets = Vec::new();
    scheduled_tickets(&cmd, &mut tickets);
    assert_eq!(tickets.len(), 1);
    assert!(model.session.overview.insight.is_pending());

    update(&mut model, DashboardMsg::InsightReady { ticket: tickets[0] });
    let text = model.session.overview.insight.text().expect("report ready");
    let name = &model.bundle().machine(&machine).expect("machine").name;
    assert!(text.contains(name.as_str()));
}

#[test]
fn switching_line_resets_panel_state() {
    let mut model = tall_model();
    press(&mut model, KeyCode::Enter);
    press(&mut model, KeyCode::Char('g'));
    press(&mut model, KeyCode::Tab);
    press(&mut model, KeyCode::Tab);
    press(&mut model, KeyCode::Enter);
    assert!(model.session.knowledge.selected_case.is_some());

    update(&mut model, DashboardMsg::SwitchLine(ProductionLine::Welding));
    assert_eq!(model.active_line, ProductionLine::Welding);
    assert!(model.session.overview.selected_machine.is_none());
    assert!(model.session.knowledge.selected_case.is_none());
    assert_eq!(model.session.overview.insight, InsightSlot::Idle);
    assert!(model.session.batches.is_expanded(&model.bundle().records[0].id));
}

#[test]
fn quit_key_stops_the_loop() {
    let mut model = tall_model();
    let cmd = press(&mut model, KeyCode::Char('q'));
    assert!(model.quit);
    assert_eq!(cmd, DashboardCmd::Quit);
}

#[test]
fn config_file_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("lmon.toml");
    std::fs::write(
        &path,
        "[dashboard]\nstart_line = \"welding\"\nstart_view_mode = \"category\"\ninsight_delay_ms = 0\n",
    )
    .expect("write config");
    let config = Config::load_with_env(Some(&path), |_| None).expect("config loads");
    assert_eq!(config.dashboard.start_line, ProductionLine::Welding);
    assert_eq!(config.dashboard.insight_delay_ms, 0);

    let model = DashboardModel::new(&config.dashboard, 1);
    assert_eq!(model.active_line, ProductionLine::Welding);
    assert!(render_to_string(&model).contains("Category View"));
}
