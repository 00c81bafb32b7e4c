use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dbwarden_core::{AuditResult, Config, Snapshot, Status};
use dbwarden_engine::{AuditError, Auditor};

/// Findings reached `severity.fail_on`
const EXIT_FINDINGS: i32 = 1;

/// A check broke its contract, so the audit is incomplete
const EXIT_DEFECT: i32 = 2;

/// dbwarden - Best-practice audits for MySQL schemas and configuration
#[derive(Parser)]
#[command(name = "dbwarden")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: dbwarden.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a metadata snapshot
    Check {
        /// Snapshot JSON written by a collector
        snapshot: PathBuf,

        /// Also write the audit result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Console format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Only print findings at or above this status
        #[arg(long, value_enum, default_value_t = MinStatus::Ok)]
        min_status: MinStatus,
    },

    /// List the available checks
    Checks,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum MinStatus {
    Ok,
    Warning,
    Concern,
    Critical,
}

impl From<MinStatus> for Status {
    fn from(value: MinStatus) -> Self {
        match value {
            MinStatus::Ok => Status::Ok,
            MinStatus::Warning => Status::Warning,
            MinStatus::Concern => Status::Concern,
            MinStatus::Critical => Status::Critical,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Check {
            snapshot,
            output,
            format,
            min_status,
        } => check_command(&config, &snapshot, output.as_deref(), format, min_status.into()),
        Commands::Checks => {
            checks_command(&config);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let default_path = Path::new("dbwarden.toml");
    if default_path.exists() {
        return Ok(Config::from_file(default_path)?);
    }

    if verbose {
        eprintln!("{}", "No config file found, using defaults".yellow());
    }
    Ok(Config::default())
}

/// Check command - audit a snapshot and exit non-zero past the threshold
fn check_command(
    config: &Config,
    snapshot: &Path,
    output: Option<&Path>,
    format: Format,
    min_status: Status,
) -> Result<()> {
    tracing::info!(snapshot = %snapshot.display(), "Loading snapshot");
    let database = Snapshot::from_file(snapshot)
        .and_then(Snapshot::into_database)
        .with_context(|| format!("Failed to load snapshot {}", snapshot.display()))?;

    let outcome = Auditor::from_config(config).audit(&database);
    let code = exit_code(&outcome, config.severity.fail_on);
    let result = match outcome {
        Ok(result) => result,
        Err(error) => {
            eprintln!("{} {}", "Audit aborted:".red().bold(), error);
            std::process::exit(code);
        }
    };

    match format {
        Format::Text => print_text(&result, min_status),
        Format::Json => println!("{}", result.to_json()?),
    }

    if let Some(path) = output {
        result
            .save_to_file(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("{} {}", "Audit saved to:".green(), path.display());
    }

    if code != 0 {
        eprintln!(
            "{}",
            format!("Findings at or above '{}' found", config.severity.fail_on)
                .red()
                .bold()
        );
        std::process::exit(code);
    }

    Ok(())
}

/// Process exit status for an audit outcome
fn exit_code(outcome: &Result<AuditResult, AuditError>, fail_on: Status) -> i32 {
    match outcome {
        Err(_) => EXIT_DEFECT,
        Ok(result) if result.fails(fail_on) => EXIT_FINDINGS,
        Ok(_) => 0,
    }
}

fn checks_command(config: &Config) {
    let auditor = Auditor::from_config(config);

    for check in auditor.checks() {
        let meta = check.meta();
        println!("{} {}", meta.code.bold(), format!("({})", meta.name).dimmed());
        println!("    {}", meta.description);
        println!("    {}", meta.reference_uri.bright_blue());
    }
}

fn status_label(status: Status) -> ColoredString {
    let label = format!("[{}]", status.as_str().to_uppercase());
    match status {
        Status::Ok => label.green(),
        Status::Warning => label.yellow(),
        Status::Concern => label.magenta(),
        Status::Critical => label.red().bold(),
    }
}

fn print_text(result: &AuditResult, min_status: Status) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{} {}", "Audit of".bold().bright_blue(), result.database.bold());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    for report in result.reports_at_least(min_status) {
        println!(
            "{} {} {}",
            status_label(report.status()),
            report.check().name.bold(),
            report.entity()
        );
        for message in report.messages() {
            println!("    {}", message);
        }
        if report.status() > Status::Ok {
            println!("    {}", report.check().reference_uri.dimmed());
        }
    }

    let summary = &result.summary;
    println!();
    println!(
        "{} entities, {} checks: {} ok, {} warnings, {} concerns, {} critical",
        summary.entities_evaluated,
        summary.checks_run,
        summary.ok.to_string().green(),
        summary.warnings.to_string().yellow(),
        summary.concerns.to_string().magenta(),
        summary.critical.to_string().red(),
    );
}
