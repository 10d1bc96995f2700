//! unitrun CLI - Test runner for registered unit types.

mod example;

use clap::Parser;
use comfy_table::{Cell, Color, Table};
use std::panic;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use unitrun_core::{
    Bucket, ConfigOverrides, DiscoveryError, ProgressEvent, ReportFormat, Reporter,
    ReporterConfig, RunReport, RunnerError, UnitType, UnitrunConfig, apply_overrides,
    build_execution_report, discover_ignored, discover_tests, format_results_json, load_config,
    registered_units, resolve_unit, run_all, timestamp_now,
};

/// Exit codes for the CLI.
mod exit_code {
    pub const SUCCESS: u8 = 0;
    pub const TESTS_FAILED: u8 = 1;
    pub const CONFIG_ERROR: u8 = 2;
    pub const ABORTED: u8 = 3;
}

/// Environment variable holding the log filter.
const LOG_ENV: &str = "UNITRUN_LOG";

#[derive(Parser)]
#[command(name = "unitrun")]
#[command(about = "Test runner for registered unit types")]
#[command(version)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Unit types to run, by full path or unique suffix (e.g. `ExampleTest`)
    #[arg(value_name = "UNIT", required_unless_present = "list_units")]
    units: Vec<String>,

    /// List discovered tests without running them
    #[arg(long)]
    list: bool,

    /// List registered unit types
    #[arg(long)]
    list_units: bool,

    /// Only run tests whose `unit::method` name contains this substring
    #[arg(long)]
    filter: Option<String>,

    /// Output format: text, json (overrides config)
    #[arg(long)]
    format: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Directory containing `unitrun.config.yaml` (default: current directory)
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();
    run_command(&cli)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Restores the previous panic hook when dropped, including during unwinding.
struct SilentPanics {
    previous: Option<Box<dyn Fn(&panic::PanicHookInfo<'_>) + Sync + Send + 'static>>,
}

impl SilentPanics {
    fn install() -> Self {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        Self {
            previous: Some(previous),
        }
    }
}

impl Drop for SilentPanics {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            panic::set_hook(previous);
        }
    }
}

/// Run `f` with panic messages suppressed.
///
/// Panics inside test bodies are reported through their classified outcome.
fn with_silent_panics<T>(f: impl FnOnce() -> T) -> T {
    let _guard = SilentPanics::install();
    f()
}

fn print_units() {
    for unit in registered_units() {
        println!("{}", unit.name());
    }
}

/// Print the discovery trace: every test and ignored method, without running.
fn print_discovery(units: &[UnitType], filter: Option<&str>) -> Result<(), DiscoveryError> {
    let selected = |name: &str| filter.is_none_or(|f| name.contains(f));
    for unit in units {
        for test in discover_tests(unit)? {
            let name = test.qualified_name();
            if !selected(&name) {
                continue;
            }
            match test.declaration.expected() {
                Some(kind) => println!("{name} (expects {kind})"),
                None => println!("{name}"),
            }
        }
        for method in discover_ignored(unit)? {
            let name = method.qualified_name();
            if selected(&name) {
                println!("{name} (ignored)");
            }
        }
    }
    Ok(())
}

fn print_results_table(report: &RunReport, color: bool) {
    let mut table = Table::new();
    table.set_header(vec!["Unit", "Test", "Status", "Detail"]);

    let status_cell = |label: &str, fg: Color| {
        let cell = Cell::new(label);
        if color { cell.fg(fg) } else { cell }
    };

    for unit in &report.units {
        for record in &unit.tests {
            let status = match record.bucket {
                Bucket::Clean => status_cell(record.status.as_str(), Color::Green),
                Bucket::Failure => status_cell(record.status.as_str(), Color::Red),
                Bucket::Error => status_cell(record.status.as_str(), Color::Yellow),
            };
            let detail = match (&record.kind, &record.message) {
                (Some(kind), Some(message)) => format!("{kind}: {message}"),
                (None, Some(message)) => message.clone(),
                _ => String::new(),
            };
            table.add_row(vec![
                Cell::new(&unit.unit),
                Cell::new(&record.name),
                status,
                Cell::new(detail),
            ]);
        }
        for ignored in &unit.ignored {
            table.add_row(vec![
                Cell::new(&unit.unit),
                Cell::new(&ignored.name),
                status_cell("ignored", Color::Yellow),
                Cell::new(ignored.reason.as_deref().unwrap_or_default()),
            ]);
        }
    }

    println!("{table}");
}

fn load_effective_config(cli: &Cli) -> Result<UnitrunConfig, String> {
    let format = cli
        .format
        .as_deref()
        .map(str::parse::<ReportFormat>)
        .transpose()
        .map_err(|e| format!("Invalid format: {e}"))?;

    let dir = cli.config_dir.as_deref().unwrap_or_else(|| Path::new("."));
    let config = load_config(dir).map_err(|e| format!("Failed to load config: {e}"))?;

    let overrides = ConfigOverrides {
        format,
        color: if cli.no_color { Some(false) } else { None },
        verbose: if cli.verbose { Some(true) } else { None },
        filter: cli.filter.clone(),
    };
    apply_overrides(config, &overrides).map_err(|e| format!("Invalid configuration: {e}"))
}

/// Resolve unit names in command-line order, skipping repeats.
fn resolve_units(names: &[String]) -> Result<Vec<UnitType>, DiscoveryError> {
    let mut units: Vec<UnitType> = Vec::with_capacity(names.len());
    for name in names {
        let unit = resolve_unit(name)?;
        if !units.iter().any(|u| u.name() == unit.name()) {
            units.push(unit);
        }
    }
    Ok(units)
}

fn exit_code_for(report: &RunReport) -> u8 {
    match &report.aborted {
        Some(RunnerError::Discovery(_)) => exit_code::CONFIG_ERROR,
        Some(_) => exit_code::ABORTED,
        None if report.tally().is_clean() => exit_code::SUCCESS,
        None => exit_code::TESTS_FAILED,
    }
}

fn run_command(cli: &Cli) -> ExitCode {
    let reporter = Reporter::new(ReporterConfig {
        verbose: cli.verbose,
        color: !cli.no_color,
    });

    if cli.list_units {
        print_units();
        return ExitCode::from(exit_code::SUCCESS);
    }

    let config = match load_effective_config(cli) {
        Ok(config) => config,
        Err(e) => {
            reporter.error(&e);
            return ExitCode::from(exit_code::CONFIG_ERROR);
        }
    };
    let reporter = Reporter::new(config.reporter_config());

    let units = match resolve_units(&cli.units) {
        Ok(units) => units,
        Err(e) => {
            reporter.error(&e.to_string());
            return ExitCode::from(exit_code::CONFIG_ERROR);
        }
    };

    if cli.list {
        return match print_discovery(&units, config.filter.as_deref()) {
            Ok(()) => ExitCode::from(exit_code::SUCCESS),
            Err(e) => {
                reporter.error(&e.to_string());
                ExitCode::from(exit_code::CONFIG_ERROR)
            }
        };
    }

    let runner_config = config.runner_config();
    let report = with_silent_panics(|| match config.format {
        ReportFormat::Text => run_all(&units, &runner_config, &mut reporter.clone()),
        ReportFormat::Json => run_all(&units, &runner_config, &mut |_: &ProgressEvent<'_>| {}),
    });
    tracing::debug!(units = report.units.len(), "run finished");

    match config.format {
        ReportFormat::Text => {
            if config.verbose {
                println!();
                print_results_table(&report, config.color);
            }
            reporter.summary(&report.tally());
        }
        ReportFormat::Json => {
            if let Some(error) = &report.aborted {
                reporter.aborted(error);
            }
            let execution_report = build_execution_report(&timestamp_now(), &report);
            println!("{}", format_results_json(&execution_report));
        }
    }

    ExitCode::from(exit_code_for(&report))
}
