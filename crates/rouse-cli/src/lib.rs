//! Command-line interface for inspecting unit manifests.
//!
//! `rouse check` loads a manifest, registers every enabled unit, and
//! finalises the registry, so duplicate names, unknown dependencies, and
//! dependency cycles surface without running any setup. `rouse order`
//! additionally prints the activation plan: the startup sweep order and,
//! per declared trigger, the units a matching event would activate.
//!
//! The runtime is exercised both from the binary entrypoint and from tests
//! by injecting the output streams. Configuration errors exit with status 1
//! and filesystem errors with status 2.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use rouse_config::{ConfigError, HostFacts, Manifest};
use rouse_registry::{Dispatcher, Registry, RegistryError, SetupOutcome, StructuredReporter};
use thiserror::Error;

mod plan;
pub mod telemetry;

pub use plan::{ActivationPlan, TriggerPlan};
use telemetry::TelemetryError;

const CONFIG_EXIT: u8 = 1;
const IO_EXIT: u8 = 2;

/// Output format for the `order` command.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing, one line per trigger.
    #[default]
    Text,
    /// Machine-readable activation plan.
    Json,
}

/// Command-line interface for the rouse manifest tool.
#[derive(Parser, Debug)]
#[command(name = "rouse", version, about = "Inspects lazy-activation unit manifests")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

/// Structured subcommands for the rouse CLI.
#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Validates a manifest without activating anything.
    Check {
        /// Path to the unit manifest.
        #[arg(value_name = "MANIFEST")]
        manifest: Utf8PathBuf,
    },
    /// Prints the activation plan a manifest produces.
    Order {
        /// Path to the unit manifest.
        #[arg(value_name = "MANIFEST")]
        manifest: Utf8PathBuf,
        /// Controls how the plan is rendered.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Error)]
enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Registry(#[from] RegistryError),
    #[error("{0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to render plan: {0}")]
    Render(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl AppError {
    /// Exit status the failure maps to: filesystem errors exit with 2,
    /// everything else with 1.
    const fn status(&self) -> u8 {
        match self {
            Self::Config(error) if error.is_io() => IO_EXIT,
            Self::Output(_) => IO_EXIT,
            _ => CONFIG_EXIT,
        }
    }
}

/// Runs the CLI using the provided arguments and output streams.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return report_usage(&error, stdout, stderr),
    };
    match execute(&cli.command, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::from(error.status())
        }
    }
}

fn report_usage<W, E>(error: &clap::Error, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    W: Write,
    E: Write,
{
    let rendered = error.render();
    if error.use_stderr() {
        let _ = write!(stderr, "{rendered}");
        ExitCode::from(CONFIG_EXIT)
    } else {
        let _ = write!(stdout, "{rendered}");
        ExitCode::SUCCESS
    }
}

fn execute<W: Write>(command: &CliCommand, stdout: &mut W) -> Result<(), AppError> {
    match command {
        CliCommand::Check { manifest } => check(manifest, stdout),
        CliCommand::Order { manifest, format } => order(manifest, *format, stdout),
    }
}

fn check<W: Write>(path: &Utf8Path, stdout: &mut W) -> Result<(), AppError> {
    let dispatcher = load_dispatcher(path)?;
    writeln!(
        stdout,
        "manifest OK: {} unit(s), {} eager at startup",
        dispatcher.len(),
        dispatcher.startup_order().len()
    )?;
    Ok(())
}

fn order<W: Write>(path: &Utf8Path, format: OutputFormat, stdout: &mut W) -> Result<(), AppError> {
    let dispatcher = load_dispatcher(path)?;
    let plan = ActivationPlan::from_dispatcher(&dispatcher);
    match format {
        OutputFormat::Text => plan.render_text(stdout)?,
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(&plan)?;
            writeln!(stdout, "{rendered}")?;
        }
    }
    Ok(())
}

/// Loads the manifest at `path` and finalises it into a dispatcher with
/// inert setup procedures.
fn load_dispatcher(path: &Utf8Path) -> Result<Dispatcher<StructuredReporter>, AppError> {
    let manifest = Manifest::load(path)?;
    telemetry::initialise(manifest.settings())?;
    let specs = manifest.activation_specs(&HostFacts::detect())?;
    tracing::debug!(path = %path, units = specs.len(), "manifest loaded");
    let mut registry = Registry::new().with_eager_floor(manifest.settings().eager_floor);
    for spec in specs {
        registry.register(spec, || Ok(SetupOutcome::Ready))?;
    }
    Ok(registry.finalise(StructuredReporter::new())?)
}
