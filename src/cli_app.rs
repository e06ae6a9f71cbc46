//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use line_monitor::analytics::batch::BatchMetrics;
use line_monitor::analytics::knowledge::filter_cases;
use line_monitor::analytics::oee::{OeeSummary, rating};
use line_monitor::catalog::bundle;
use line_monitor::catalog::model::{LineBundle, ProductionLine, StatusLevel};
use line_monitor::core::config::Config;
use line_monitor::insight::{InsightKind, generate as generate_insight};
use line_monitor::logger::jsonl::{ActivityRecord, EventType, JsonlWriter};
use line_monitor::tui::theme::AccessibilityProfile;
use line_monitor::tui::{DashboardRuntimeConfig, run_dashboard};

/// Line Monitor: production line dashboard for palletizing and welding.
#[derive(Debug, Parser)]
#[command(
    name = "lmon",
    author,
    version,
    about = "Line Monitor - production line OEE dashboard",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Open the interactive dashboard.
    Dashboard(DashboardArgs),
    /// Print OEE, machine status and batch progress for a line.
    Report(LineArgs),
    /// List knowledge base case studies, optionally filtered.
    Cases(CasesArgs),
    /// Print an insight report immediately.
    Insight(InsightArgs),
    /// Inspect configuration.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args)]
struct DashboardArgs {
    /// Line shown on startup (overrides config).
    #[arg(long, value_name = "LINE")]
    line: Option<ProductionLine>,
}

#[derive(Debug, Clone, Args)]
struct LineArgs {
    /// Production line: palletizing or welding.
    #[arg(long, value_name = "LINE")]
    line: Option<ProductionLine>,
}

#[derive(Debug, Clone, Args)]
struct CasesArgs {
    /// Production line: palletizing or welding.
    #[arg(long, value_name = "LINE")]
    line: Option<ProductionLine>,
    /// Case-insensitive match against title and tags.
    #[arg(long, short, value_name = "TEXT", default_value = "")]
    query: String,
}

#[derive(Debug, Clone, Args)]
struct InsightArgs {
    /// Production line the subject belongs to.
    #[arg(long, value_name = "LINE")]
    line: ProductionLine,
    /// Subject kind: machine, batch or case.
    #[arg(long, value_name = "KIND")]
    kind: InsightKind,
    /// Machine, batch or case id.
    #[arg(long, value_name = "ID")]
    id: String,
    /// Seed for the decorative figures (defaults to the clock).
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print the config file path.
    Path,
    /// Print the effective configuration.
    Show,
    /// Load and validate the configuration.
    Validate,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Dashboard(args) => run_dashboard_command(cli, args),
        Command::Report(args) => run_report(cli, args),
        Command::Cases(args) => run_cases(cli, args),
        Command::Insight(args) => run_insight(cli, args),
        Command::Config(args) => run_config(cli, args),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    Config::load(cli.config.as_deref()).map_err(|e| CliError::User(e.to_string()))
}

fn resolve_line(cli: &Cli, explicit: Option<ProductionLine>) -> Result<ProductionLine, CliError> {
    match explicit {
        Some(line) => Ok(line),
        None => Ok(load_config(cli)?.dashboard.start_line),
    }
}

// ──────────────────── dashboard ────────────────────

fn run_dashboard_command(cli: &Cli, args: &DashboardArgs) -> Result<(), CliError> {
    if !io::stdout().is_terminal() {
        return Err(CliError::User(
            "the dashboard needs an interactive terminal; try `lmon report`".to_string(),
        ));
    }

    let mut config = load_config(cli)?;
    if let Some(line) = args.line {
        config.dashboard.start_line = line;
    }

    let hash = config
        .stable_hash()
        .map_err(|e| CliError::Internal(e.to_string()))?;
    {
        let mut log = JsonlWriter::from_logging(&config.logging);
        log.record(
            ActivityRecord::new(EventType::ConfigLoaded, config.dashboard.start_line)
                .target(config.paths.config_file.to_string_lossy())
                .details(format!("hash={hash}")),
        );
    }

    let runtime = DashboardRuntimeConfig {
        dashboard: config.dashboard,
        logging: config.logging,
        accessibility: AccessibilityProfile::from_environment(cli.no_color),
        seed: DashboardRuntimeConfig::clock_seed(),
    };
    run_dashboard(&runtime).map_err(|e| CliError::Runtime(e.to_string()))
}

// ──────────────────── report ────────────────────

/// Machine counts per status level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
struct StatusCounts {
    online: usize,
    warning: usize,
    error: usize,
}

impl StatusCounts {
    fn tally(data: &LineBundle) -> Self {
        data.machines
            .iter()
            .fold(Self::default(), |mut counts, machine| {
                match machine.status {
                    StatusLevel::Ok => counts.online += 1,
                    StatusLevel::Warning => counts.warning += 1,
                    StatusLevel::Error => counts.error += 1,
                }
                counts
            })
    }
}

#[derive(Debug, Clone, Serialize)]
struct BatchRow<'a> {
    id: &'a str,
    model: &'a str,
    status: &'a str,
    oee: f64,
    rating: &'static str,
    #[serde(flatten)]
    metrics: BatchMetrics,
}

fn report_payload(data: &LineBundle) -> Value {
    let rows: Vec<BatchRow<'_>> = data
        .records
        .iter()
        .map(|record| BatchRow {
            id: &record.id,
            model: &record.model,
            status: &record.status,
            oee: record.oee,
            rating: rating(record.oee),
            metrics: BatchMetrics::derive(&record.children),
        })
        .collect();
    json!({
        "command": "report",
        "line": data.line,
        "title": data.title,
        "oee": OeeSummary::derive(&data.records, &data.trend),
        "machines": StatusCounts::tally(data),
        "batches": rows,
    })
}

fn run_report(cli: &Cli, args: &LineArgs) -> Result<(), CliError> {
    let data = bundle(resolve_line(cli, args.line)?);

    match output_mode(cli) {
        OutputMode::Human => {
            let summary = OeeSummary::derive(&data.records, &data.trend);
            let counts = StatusCounts::tally(data);
            println!("{}", data.title.bold());
            println!(
                "  Overall OEE: {:.1}%  (A {:.1}% / P {:.1}% / Q {:.1}%)",
                summary.overall,
                summary.current.availability,
                summary.current.performance,
                summary.current.quality
            );
            println!(
                "  Machines: {} online, {} warning, {} error",
                counts.online.to_string().green(),
                counts.warning.to_string().yellow(),
                counts.error.to_string().red()
            );
            println!();
            println!(
                "  {:<12} {:<22} {:>6} {:>9} {:>8}  Status",
                "Batch", "Model", "OEE", "Progress", "Weight"
            );
            for record in &data.records {
                let metrics = BatchMetrics::derive(&record.children);
                println!(
                    "  {:<12} {:<22} {:>5.1}% {:>4}/{:<4} {:>6.0}kg  {}",
                    record.id,
                    record.model,
                    record.oee,
                    metrics.completed,
                    metrics.total,
                    metrics.weight_kg,
                    status_label(record.status_level(), &record.status)
                );
            }
        }
        OutputMode::Json => write_json_line(&report_payload(data))?,
    }
    Ok(())
}

fn status_label(level: StatusLevel, text: &str) -> String {
    match level {
        StatusLevel::Ok => text.green().to_string(),
        StatusLevel::Warning => text.yellow().to_string(),
        StatusLevel::Error => text.red().to_string(),
    }
}

// ──────────────────── cases ────────────────────

fn run_cases(cli: &Cli, args: &CasesArgs) -> Result<(), CliError> {
    let data = bundle(resolve_line(cli, args.line)?);
    let hits = filter_cases(&data.cases, &args.query);

    match output_mode(cli) {
        OutputMode::Human => {
            if hits.is_empty() {
                println!("No case studies match {:?}.", args.query);
                return Ok(());
            }
            for case in &hits {
                println!("{}  {}", case.id.bold(), case.title);
                println!(
                    "  severity: {}  tags: {}",
                    case.severity,
                    case.tags.join(", ")
                );
                if let Some(improvement) = &case.solution.oee_impact.improvement {
                    println!("  OEE: {improvement}");
                }
            }
            println!("{} of {} cases", hits.len(), data.cases.len());
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "cases",
                "line": data.line,
                "query": args.query,
                "total": data.cases.len(),
                "cases": hits,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

// ──────────────────── insight ────────────────────

fn run_insight(cli: &Cli, args: &InsightArgs) -> Result<(), CliError> {
    let data = bundle(args.line);
    let seed = args
        .seed
        .unwrap_or_else(DashboardRuntimeConfig::clock_seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let text = generate_insight(args.kind, &args.id, data, &mut rng);

    match output_mode(cli) {
        OutputMode::Human => println!("{text}"),
        OutputMode::Json => {
            let payload = json!({
                "command": "insight",
                "line": args.line,
                "kind": args.kind,
                "id": args.id,
                "text": text,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

// ──────────────────── config ────────────────────

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match &args.command {
        None | Some(ConfigCommand::Path) => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            let exists = path.exists();

            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", path.display());
                    if !exists {
                        println!("  (file does not exist; defaults will be used)");
                    }
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config path",
                        "path": path.to_string_lossy(),
                        "exists": exists,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Show) => {
            let config = load_config(cli)?;

            match output_mode(cli) {
                OutputMode::Human => {
                    let toml_str = toml::to_string_pretty(&config)
                        .map_err(|e| CliError::Internal(format!("serialize config: {e}")))?;
                    println!("{toml_str}");
                }
                OutputMode::Json => {
                    let value = serde_json::to_value(&config)?;
                    let payload = json!({
                        "command": "config show",
                        "config": value,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Validate) => match Config::load(cli.config.as_deref()) {
            Ok(config) => {
                let hash = config
                    .stable_hash()
                    .map_err(|e| CliError::Internal(e.to_string()))?;

                match output_mode(cli) {
                    OutputMode::Human => {
                        println!("Configuration is valid.");
                        println!("  Source: {}", config.paths.config_file.display());
                        println!("  Hash: {hash}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": true,
                            "path": config.paths.config_file.to_string_lossy(),
                            "hash": hash,
                        });
                        write_json_line(&payload)?;
                    }
                }
                Ok(())
            }
            Err(e) => {
                match output_mode(cli) {
                    OutputMode::Human => {
                        eprintln!("Configuration is INVALID: {e}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": false,
                            "code": e.code(),
                            "error": e.to_string(),
                        });
                        write_json_line(&payload)?;
                    }
                }
                Err(CliError::User(format!("invalid config: {e}")))
            }
        },
    }
}

// ──────────────────── output ────────────────────

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("LMON_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_before_and_after_subcommand() {
        let before = Cli::try_parse_from([
            "lmon",
            "--config",
            "/tmp/lmon.toml",
            "--json",
            "--no-color",
            "report",
        ]);
        assert!(before.is_ok());

        let after = Cli::try_parse_from(["lmon", "report", "--json", "--no-color"]);
        assert!(after.is_ok());
    }

    #[test]
    fn parses_every_subcommand() {
        let cases = [
            vec!["lmon", "dashboard"],
            vec!["lmon", "dashboard", "--line", "welding"],
            vec!["lmon", "report", "--line", "palletizing"],
            vec!["lmon", "cases", "--line", "weld", "--query", "robot"],
            vec![
                "lmon",
                "insight",
                "--line",
                "palletizing",
                "--kind",
                "batch",
                "--id",
                "BATCH-P002",
            ],
            vec!["lmon", "config", "path"],
            vec!["lmon", "config", "show"],
            vec!["lmon", "config", "validate"],
            vec!["lmon", "completions", "bash"],
        ];

        for case in cases {
            let parsed = Cli::try_parse_from(case.clone());
            assert!(parsed.is_ok(), "failed to parse: {case:?}");
        }
    }

    #[test]
    fn rejects_unknown_line_and_kind() {
        assert!(Cli::try_parse_from(["lmon", "report", "--line", "painting"]).is_err());
        assert!(
            Cli::try_parse_from([
                "lmon", "insight", "--line", "welding", "--kind", "robot", "--id", "x",
            ])
            .is_err()
        );
    }

    #[test]
    fn insight_requires_line_kind_and_id() {
        assert!(Cli::try_parse_from(["lmon", "insight", "--kind", "machine"]).is_err());
    }

    #[test]
    fn output_mode_resolution_honors_precedence() {
        assert_eq!(
            resolve_output_mode(true, Some("human"), true),
            OutputMode::Json
        );
        assert_eq!(
            resolve_output_mode(false, Some("json"), true),
            OutputMode::Json
        );
        assert_eq!(
            resolve_output_mode(false, Some("human"), false),
            OutputMode::Human
        );
        assert_eq!(
            resolve_output_mode(false, Some("auto"), true),
            OutputMode::Human
        );
        assert_eq!(resolve_output_mode(false, None, false), OutputMode::Json);
    }

    #[test]
    fn exit_codes_follow_contract() {
        assert_eq!(CliError::User("x".into()).exit_code(), 1);
        assert_eq!(CliError::Runtime("x".into()).exit_code(), 2);
        assert_eq!(CliError::Io(io::Error::other("x")).exit_code(), 2);
        assert_eq!(CliError::Internal("x".into()).exit_code(), 3);
    }

    #[test]
    fn status_counts_cover_every_machine() {
        for line in ProductionLine::ALL {
            let data = bundle(line);
            let counts = StatusCounts::tally(data);
            assert_eq!(
                counts.online + counts.warning + counts.error,
                data.machines.len()
            );
        }
    }

    #[test]
    fn report_payload_carries_batch_progress() {
        let payload = report_payload(bundle(ProductionLine::Palletizing));
        assert_eq!(payload["command"], "report");
        assert_eq!(payload["line"], "palletizing");
        let batches = payload["batches"].as_array().expect("batches array");
        let p002 = batches
            .iter()
            .find(|row| row["id"] == "BATCH-P002")
            .expect("BATCH-P002 row");
        assert_eq!(p002["progress_pct"], 50);
        assert_eq!(p002["total"], 2);
    }
}
