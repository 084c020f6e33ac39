// crates/vault-contract-runner/src/main.rs
// ============================================================================
// Module: Vault Contract CLI Entry Point
// Description: Command dispatcher for contract runs and catalog inspection.
// Purpose: Run suites against a configured vault API and report the outcome.
// Dependencies: clap, serde_jcs, thiserror, tokio, vault-contract-runner
// ============================================================================

//! ## Overview
//! `vault-contract run` executes the selected suites and exits non-zero when
//! any scenario fails. `suites` lists the catalog, `contracts` prints the
//! endpoint contracts as JSON Schema, and `config validate` checks a
//! configuration file without touching the network.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use serde_json::Value;
use thiserror::Error;
use vault_contract_config::HarnessConfig;
use vault_contract_core::ContractRegistry;
use vault_contract_runner::HarnessContext;
use vault_contract_runner::ScenarioOrchestrator;
use vault_contract_runner::builtin_suites;
use vault_contract_runner::select_suites;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "vault-contract", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run contract suites against the configured API.
    Run(RunCommand),
    /// List built-in suites and their scenarios.
    Suites(SuitesCommand),
    /// Print endpoint contracts as JSON Schema documents.
    Contracts(ContractsCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Optional config file path (defaults to vault-contract.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Suites to run, in order (defaults to every suite).
    #[arg(long = "suite", value_name = "NAME")]
    suites: Vec<String>,
    /// Write the canonical JSON run report to this path.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Write the redacted request transcript to this path.
    #[arg(long, value_name = "PATH")]
    transcript: Option<PathBuf>,
}

/// Arguments for `suites`.
#[derive(Args, Debug)]
struct SuitesCommand {
    /// Optional config file path used to render fixture-dependent scenarios.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `contracts`.
#[derive(Args, Debug)]
struct ContractsCommand {
    /// Optional config file path (its `contracts_dir` overrides built-ins).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file.
    Validate {
        /// Optional config file path.
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(command) => command_run(command).await,
        Commands::Suites(command) => command_suites(&command),
        Commands::Contracts(command) => command_contracts(&command),
        Commands::Config {
            command: ConfigCommand::Validate {
                config,
            },
        } => {
            load_config(config.as_deref())?;
            write_stdout_line("config ok")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Runs the selected suites and writes the requested artifacts.
async fn command_run(command: RunCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let suites = select_suites(&config, &command.suites)
        .map_err(|err| CliError::new(err.to_string()))?;
    let context = HarnessContext::from_config(config)
        .map_err(|err| CliError::new(format!("harness setup failed: {err}")))?;
    let mut orchestrator = ScenarioOrchestrator::new(context);
    let report = orchestrator.run_all(&suites).await;
    if let Some(path) = &command.report {
        let bytes = report.to_canonical_json().map_err(CliError::new)?;
        write_file(path, &bytes)?;
    }
    if let Some(path) = &command.transcript {
        let transcript = orchestrator.context().client().transcript();
        let bytes = serde_jcs::to_vec(&transcript)
            .map_err(|err| CliError::new(format!("failed to encode transcript: {err}")))?;
        write_file(path, &bytes)?;
    }
    write_stdout_line(&report.to_markdown())?;
    Ok(if report.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Lists suites and scenario names.
fn command_suites(command: &SuitesCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    for suite in builtin_suites(&config) {
        write_stdout_line(&format!("{}: {}", suite.name, suite.description))?;
        for scenario in &suite.scenarios {
            write_stdout_line(&format!("  {}: {}", scenario.name, scenario.description))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints every contract as a JSON Schema keyed by contract id.
fn command_contracts(command: &ContractsCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let registry = match &config.contracts_dir {
        Some(dir) => ContractRegistry::load_dir(dir).map_err(|err| CliError::new(err.to_string()))?,
        None => ContractRegistry::builtin().clone(),
    };
    let schemas: serde_json::Map<String, Value> = registry
        .iter()
        .map(|(id, contract)| (id.as_str().to_string(), contract.to_json_schema()))
        .collect();
    let bytes = serde_jcs::to_vec(&schemas)
        .map_err(|err| CliError::new(format!("failed to encode contracts: {err}")))?;
    let text = String::from_utf8(bytes)
        .map_err(|err| CliError::new(format!("failed to encode contracts: {err}")))?;
    write_stdout_line(&text)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads configuration and maps failures into CLI errors.
fn load_config(path: Option<&Path>) -> CliResult<HarnessConfig> {
    HarnessConfig::load(path).map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

/// Writes an artifact, creating parent directories.
fn write_file(path: &Path, bytes: &[u8]) -> CliResult<()> {
    let io_error =
        |err: std::io::Error| CliError::new(format!("failed to write {}: {err}", path.display()));
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, bytes).map_err(io_error)
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
        .map_err(|err| CliError::new(format!("failed to write stdout: {err}")))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
