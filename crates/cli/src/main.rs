// shipcheck CLI - reconcile commercial invoices against shipping lists and duty tables

mod exit_codes;
mod inspect;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use shipcheck_io::{load_workbook, write_report, LoadError, ReportError, ReportFormat};
use shipcheck_recon::{ReconConfig, ReconError, ReconInput, ReconResult, Verbosity, Workbook};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_CONFIG, EXIT_LOAD, EXIT_REPORT, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "shipcheck")]
#[command(about = "Reconcile commercial invoices against shipping lists and duty tables")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log progress and every finding to stderr
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors; suppress the plain-text summary
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an invoice workbook against a shipping list and a duty table
    #[command(after_help = "\
Examples:
  shipcheck check invoice.xlsx shipping.xlsx duty.xlsx
  shipcheck check invoice.xlsx shipping.xlsx duty.csv --output findings.xlsx
  shipcheck check invoice.xlsx shipping.xlsx duty.xlsx --output findings.csv --format csv
  shipcheck check invoice.xlsx shipping.xlsx duty.xlsx --json | jq '.summary'

Findings never change the exit status: a run that completes exits 0.")]
    Check {
        /// Invoice workbook to validate
        input: PathBuf,

        /// Shipping list workbook (the reference)
        reference: PathBuf,

        /// Duty table; only its first sheet is read
        duty: PathBuf,

        /// TOML settings file
        #[arg(long, short = 'c', env = "SHIPCHECK_CONFIG")]
        config: Option<PathBuf>,

        /// Write the findings report to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Report format (default: from the output extension, else xlsx)
        #[arg(long, short = 'f', requires = "output")]
        format: Option<OutputFormat>,

        /// Print the full run result as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Show how header detection reads each sheet of a workbook
    #[command(after_help = "\
Examples:
  shipcheck inspect invoice.xlsx
  shipcheck inspect shipping.xlsx --reference --json")]
    Inspect {
        /// Workbook or CSV file to inspect
        file: PathBuf,

        /// TOML settings file
        #[arg(long, short = 'c', env = "SHIPCHECK_CONFIG")]
        config: Option<PathBuf>,

        /// Use shipping-list settings (sheet exclusion, item-number filter)
        #[arg(long)]
        reference: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// TOML settings file
        #[arg(long, short = 'c', env = "SHIPCHECK_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Xlsx,
    Csv,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Xlsx => ReportFormat::Xlsx,
            OutputFormat::Csv => ReportFormat::Csv,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("SHIPCHECK_COMMIT"), ")",
        "\nengine:  shipcheck-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("SHIPCHECK_TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let verbosity = if cli.verbose {
        Verbosity::Verbose
    } else if cli.quiet {
        Verbosity::Quiet
    } else {
        Verbosity::Normal
    };

    let result = match cli.command {
        Commands::Check {
            input,
            reference,
            duty,
            config,
            output,
            format,
            json,
        } => cmd_check(
            Sources { input, reference, duty },
            config,
            output,
            format,
            json,
            verbosity,
        ),
        Commands::Inspect {
            file,
            config,
            reference,
            json,
        } => cmd_inspect(file, config, reference, json),
        Commands::Config { config } => cmd_config(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Logs go to stderr. `RUST_LOG` wins over the flags.
fn init_logging(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn load(msg: impl Into<String>) -> Self {
        Self { code: EXIT_LOAD, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn report(msg: impl Into<String>) -> Self {
        Self { code: EXIT_REPORT, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<LoadError> for CliError {
    fn from(err: LoadError) -> Self {
        let hint = match &err {
            LoadError::UnsupportedFormat { .. } => {
                Some("save the file as .xlsx or .csv and retry")
            }
            LoadError::Workbook { .. } => Some("is the file open in another program, or password-protected?"),
            _ => None,
        };
        let cli = CliError::load(err.to_string());
        match hint {
            Some(h) => cli.with_hint(h),
            None => cli,
        }
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        CliError::config(err.to_string())
            .with_hint("run `shipcheck config` to see every setting with its default")
    }
}

impl From<ReportError> for CliError {
    fn from(err: ReportError) -> Self {
        CliError::report(err.to_string())
    }
}

// ============================================================================
// Commands
// ============================================================================

struct Sources {
    input: PathBuf,
    reference: PathBuf,
    duty: PathBuf,
}

fn cmd_check(
    sources: Sources,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    json: bool,
    verbosity: Verbosity,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;

    let input = load_source("input", &sources.input)?;
    let reference = load_source("reference", &sources.reference)?;
    let duty_book = load_source("duty", &sources.duty)?;
    let duty = duty_book
        .first()
        .ok_or_else(|| CliError::load(format!("{} contains no sheets", sources.duty.display())))?;
    if duty_book.sheets().len() > 1 {
        debug!(sheet = %duty.name, "duty workbook has several sheets; using the first");
    }

    let result = shipcheck_recon::run(
        &config,
        &ReconInput {
            input: &input,
            reference: &reference,
            duty: &duty.grid,
        },
        verbosity,
    )?;

    if let Some(path) = &output {
        let format = format.map(ReportFormat::from).unwrap_or_else(|| ReportFormat::from_path(path));
        write_report(&result, path, format)?;
    }

    if json {
        let text = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::report(format!("cannot serialize result: {e}")))?;
        println!("{text}");
    } else if verbosity != Verbosity::Quiet {
        print!("{}", render_summary(&result, output.is_none()));
        if let Some(path) = &output {
            println!("report written to {}", path.display());
        }
    }
    Ok(())
}

fn cmd_inspect(
    file: PathBuf,
    config: Option<PathBuf>,
    reference: bool,
    json: bool,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let workbook = load_source("inspected", &file)?;
    let inspections = inspect::inspect_workbook(&workbook, &config, reference)?;

    if json {
        let text = serde_json::to_string_pretty(&inspections)
            .map_err(|e| CliError::report(format!("cannot serialize inspection: {e}")))?;
        println!("{text}");
    } else {
        print!("{}", inspect::render(&inspections));
    }
    Ok(())
}

fn cmd_config(config: Option<PathBuf>) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    print!("{}", config.to_toml()?);
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Settings from a TOML file, or the defaults when no file is given.
fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReconConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::args(format!("cannot read config {}: {e}", path.display()))
    })?;
    let config = ReconConfig::from_toml(&text)
        .map_err(|e| CliError::from(e).with_hint(format!("fix {} and retry", path.display())))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn load_source(role: &str, path: &Path) -> Result<Workbook, CliError> {
    let workbook = load_workbook(path)?;
    info!(role, path = %path.display(), sheets = workbook.sheets().len(), "loaded");
    Ok(workbook)
}

/// Plain-text summary. Findings are listed one per line when `list` is set.
fn render_summary(result: &ReconResult, list: bool) -> String {
    let mut out = String::new();
    for sheet in &result.sheets {
        out.push_str(&format!(
            "{} -> {} (similarity {:.2}): {} records, {} matched\n",
            sheet.input_sheet, sheet.reference_sheet, sheet.similarity, sheet.records, sheet.matched
        ));
    }
    for name in &result.unmatched_sheets {
        out.push_str(&format!("{name}: no matching reference sheet\n"));
    }

    if list {
        for e in &result.errors {
            let row = e.row.map(|r| format!(":{r}")).unwrap_or_default();
            let id = if e.identifier.is_empty() {
                String::new()
            } else {
                format!(" [{}]", e.identifier)
            };
            out.push_str(&format!("{}{row}{id} {}: {}\n", e.sheet, e.category, e.message));
        }
    }

    if result.is_clean() {
        out.push_str("no findings\n");
    } else {
        out.push_str(&format!(
            "{} findings ({} sheet-level)\n",
            result.summary.total, result.summary.sheet_level
        ));
        for (category, count) in &result.summary.by_category {
            out.push_str(&format!("  {category:<36} {count}\n"));
        }
    }
    out
}
