use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use pref_assign::config::{AppConfig, LoggingConfig};
use pref_assign::AssignError;
use pref_assign::logic::{
    write_assignments_to_path, write_report_to_path, AssignmentPipeline, PldagOracle, SolveOracle,
};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

/// Assign persons to capacity-limited slots by ranked preference.
///
/// The input CSV has `Assignment` in A1 and `Counts` in B1, followed by one
/// column per person. Row 2 holds each person's count (A2 = `Counts`, B2
/// blank); the remaining rows hold an assignment name, its capacity, and each
/// person's rank for it: 1 (most preferred) to 4 (cannot make it).
#[derive(Parser, Debug)]
#[command(name = "pref-assign", version)]
struct Args {
    /// Input CSV file
    input: PathBuf,

    /// Output CSV file
    output: PathBuf,

    /// Treat capacities as exact (equal), a minimum (lower) or a maximum (upper)
    #[arg(long, value_parser = ["equal", "lower", "upper"])]
    bounds: Option<String>,

    /// The input has no Counts row/column; every count is 1
    #[arg(long)]
    no_custom_counts: bool,

    /// Fail before solving when totals cannot be satisfied
    #[arg(long)]
    precheck: bool,

    /// Configuration file (defaults to ./pref-assign.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON solve summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(bounds) = &self.bounds {
            config.solver.bounds = bounds.clone();
        }
        if self.no_custom_counts {
            config.solver.no_custom_counts = true;
        }
        if self.precheck {
            config.solver.precheck_totals = true;
        }
        if let Some(log_file) = &self.log_file {
            config.logging.file = Some(log_file.clone());
        }
        match self.verbose {
            0 => {}
            1 => config.logging.level = "debug".to_string(),
            _ => config.logging.level = "trace".to_string(),
        }
    }
}

fn init_logging(logging: &LoggingConfig) -> anyhow::Result<()> {
    let level: LevelFilter = logging
        .level
        .parse()
        .with_context(|| format!("invalid log level '{}'", logging.level))?;

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if let Some(path) = &logging.file {
        let file = File::create(path).with_context(|| format!("cannot create log file {}", path))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init()?;
    Ok(())
}

/// How a run that produced an output file ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    Optimal,
    NonOptimal,
}

impl RunStatus {
    fn exit_code(self) -> ExitCode {
        match self {
            RunStatus::Optimal => ExitCode::SUCCESS,
            RunStatus::NonOptimal => ExitCode::from(2),
        }
    }
}

fn run(args: &Args, config: &AppConfig, oracle: &dyn SolveOracle) -> anyhow::Result<RunStatus> {
    let options = config.pipeline_options()?;
    let bounds = options.bounds;

    let input = File::open(&args.input)
        .with_context(|| format!("cannot open {}", args.input.display()))?;

    let pipeline = AssignmentPipeline::new(oracle, options);
    let outcome = pipeline
        .run(BufReader::new(input))
        .with_context(|| format!("failed to assign {}", args.input.display()))?;

    write_assignments_to_path(&args.output, &outcome.assignments)
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    if let Some(summary) = &args.summary {
        write_report_to_path(summary, &outcome.report(oracle.name(), bounds))
            .with_context(|| format!("cannot write {}", summary.display()))?;
    }

    if !outcome.is_optimal() {
        eprintln!(
            "warning: solver status is {}; {} holds a best-effort result",
            outcome.status(),
            args.output.display()
        );
        return Ok(RunStatus::NonOptimal);
    }

    log::info!(
        "Wrote {} assignments with total cost {}",
        outcome.assignments.total_placements(),
        outcome.objective_value()
    );
    Ok(RunStatus::Optimal)
}

/// Print a fatal error with its category when it came from the library.
fn report_failure(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<AssignError>() {
        Some(assign_error) => eprintln!("error ({}): {:#}", assign_error.category(), err),
        None => eprintln!("error: {:#}", err),
    }
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = AppConfig::load_from(args.config.as_deref()).and_then(|mut config| {
        args.apply(&mut config);
        init_logging(&config.logging)?;
        Ok(config)
    });
    let config = match config {
        Ok(config) => config,
        Err(err) => return report_failure(&err),
    };

    match run(&args, &config, &PldagOracle::new()) {
        Ok(status) => status.exit_code(),
        Err(err) => report_failure(&err),
    }
}
