// crates/routeguard-cli/src/main.rs
// ============================================================================
// Module: RouteGuard CLI Entry Point
// Description: Command dispatcher for verdicts, golden suites, and policies.
// Purpose: Provide a thin, fail-closed shell around the gate engine.
// Dependencies: clap, routeguard-cli, routeguard-config, routeguard-core, thiserror
// ============================================================================

//! ## Overview
//! `routeguard --policy <path> --file <path>` prints one verdict line and exits
//! 0 on `ALLOW`, 1 on `DENY` or `QUARANTINE`, and 2 on usage, input, or policy
//! errors, including request documents that do not decode. `golden` replays a recorded suite; `policy` validates, prints the
//! schema, or prints the example policy. Security posture: every input file is
//! untrusted and read under a size limit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use routeguard_cli::audit::DecisionAuditEvent;
use routeguard_cli::audit::DecisionAuditSink;
use routeguard_cli::audit::select_sink;
use routeguard_cli::input::MAX_REQUEST_BYTES;
use routeguard_cli::input::MAX_SUITE_BYTES;
use routeguard_cli::input::parse_now;
use routeguard_cli::input::read_text_with_limit;
use routeguard_cli::input::wall_clock_now;
use routeguard_cli::t;
use routeguard_cli::verdict::EXIT_ALLOW;
use routeguard_cli::verdict::EXIT_ERROR;
use routeguard_cli::verdict::evaluate_input;
use routeguard_cli::verdict::golden_exit_status;
use routeguard_cli::verdict::render_golden;
use routeguard_config::load_output_schema;
use routeguard_config::load_policy;
use routeguard_config::policy_json_example;
use routeguard_config::policy_schema;
use routeguard_config::policy_toml_example;
use routeguard_config::resolve_policy_path;
use routeguard_core::GoldenSuite;
use routeguard_core::Timestamp;
use routeguard_core::ValidatedPolicy;
use routeguard_core::run_golden;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "routeguard",
    disable_help_subcommand = true,
    disable_version_flag = true,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue)]
    show_version: bool,
    /// Arguments for evaluating a single input file.
    #[command(flatten)]
    evaluate: EvaluateArgs,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Arguments for the default verdict surface.
#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Policy file (falls back to `ROUTEGUARD_POLICY`, then `routeguard-policy.json`).
    #[arg(long, value_name = "PATH")]
    policy: Option<PathBuf>,
    /// Decision request JSON or raw model output to evaluate.
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,
    /// Evaluation time as RFC 3339 or unix milliseconds (defaults to now).
    #[arg(long, value_name = "TIME")]
    now: Option<String>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Audit options.
    #[command(flatten)]
    audit: AuditArgs,
}

/// Audit sink selection flags.
#[derive(Args, Debug)]
struct AuditArgs {
    /// Append `decision_audit` JSON lines to this file.
    #[arg(long, value_name = "PATH")]
    audit_log: Option<PathBuf>,
    /// Emit `decision_audit` JSON lines to stderr.
    #[arg(long, action = ArgAction::SetTrue)]
    audit_stderr: bool,
}

/// Verdict output formats.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// One verdict line plus detail lines.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Example policy encodings.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ExampleFormat {
    /// JSON document.
    Json,
    /// TOML document.
    Toml,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a golden suite against a policy.
    Golden(GoldenCommand),
    /// Policy utilities.
    Policy {
        /// Selected policy subcommand.
        #[command(subcommand)]
        command: PolicyCommand,
    },
}

/// Arguments for `golden`.
#[derive(Args, Debug)]
struct GoldenCommand {
    /// Policy file.
    #[arg(long, value_name = "PATH")]
    policy: Option<PathBuf>,
    /// Golden suite JSON file.
    #[arg(long, value_name = "PATH")]
    suite: PathBuf,
    /// Print the full report as JSON.
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
    /// Audit options.
    #[command(flatten)]
    audit: AuditArgs,
}

/// Policy subcommands.
#[derive(Subcommand, Debug)]
enum PolicyCommand {
    /// Load and validate a policy file.
    Validate {
        /// Policy file.
        #[arg(long, value_name = "PATH")]
        policy: Option<PathBuf>,
    },
    /// Print the policy JSON schema.
    Schema,
    /// Print the canonical example policy.
    Example {
        /// Example encoding.
        #[arg(long, value_enum, default_value_t = ExampleFormat::Json)]
        format: ExampleFormat,
    },
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
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
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    if cli.show_version {
        write_stdout_line(&t!("main.version", version = env!("CARGO_PKG_VERSION")))?;
        return Ok(ExitCode::from(EXIT_ALLOW));
    }
    match cli.command {
        Some(Commands::Golden(command)) => command_golden(command),
        Some(Commands::Policy {
            command,
        }) => command_policy(command),
        None => command_evaluate(cli.evaluate),
    }
}

// ============================================================================
// SECTION: Evaluate Command
// ============================================================================

/// Evaluates one request or model output file.
fn command_evaluate(args: EvaluateArgs) -> CliResult<ExitCode> {
    let Some(file) = args.file.as_deref() else {
        return Err(CliError::new(t!("main.missing_input")));
    };
    let policy_path = resolve_policy_path(args.policy.as_deref())
        .map_err(|err| CliError::new(t!("policy.load_failed", error = err)))?;
    let policy = load_policy_arg(Some(&policy_path))?;
    let schema = load_output_schema(&policy, &policy_path)
        .map_err(|err| CliError::new(t!("policy.schema_failed", error = err)))?;
    let now = resolve_now(args.now.as_deref())?;
    let sink = open_sink(&args.audit)?;
    let text = read_text_with_limit(file, MAX_REQUEST_BYTES)
        .map_err(|err| CliError::new(err.localized(&t!("input.kind.request"), file)))?;

    let verdict = evaluate_input(&text, &policy, schema.as_ref(), now).map_err(|err| {
        CliError::new(t!("input.request_rejected", path = file.display(), error = err))
    })?;
    sink.record(&DecisionAuditEvent::for_verdict(&verdict, policy.policy_id()));

    match args.format {
        OutputFormat::Text => {
            for line in verdict.render_text() {
                write_stdout_line(&line)?;
            }
        }
        OutputFormat::Json => write_json(&verdict)?,
    }
    Ok(ExitCode::from(verdict.exit_status()))
}

// ============================================================================
// SECTION: Golden Command
// ============================================================================

/// Replays a golden suite.
fn command_golden(command: GoldenCommand) -> CliResult<ExitCode> {
    let policy = load_policy_arg(command.policy.as_deref())?;
    let sink = open_sink(&command.audit)?;
    let path = command.suite.as_path();
    let text = read_text_with_limit(path, MAX_SUITE_BYTES)
        .map_err(|err| CliError::new(err.localized(&t!("input.kind.suite"), path)))?;
    let suite: GoldenSuite = serde_json::from_str(&text).map_err(|err| {
        CliError::new(t!("golden.parse_failed", path = path.display(), error = err))
    })?;

    let report = run_golden(&suite, &policy);
    for result in &report.results {
        sink.record(&DecisionAuditEvent::for_decision(&result.decision));
    }

    if command.json {
        write_json(&report)?;
    } else {
        for line in render_golden(&report) {
            write_stdout_line(&line)?;
        }
    }
    Ok(ExitCode::from(golden_exit_status(&report)))
}

// ============================================================================
// SECTION: Policy Command
// ============================================================================

/// Executes a `policy` subcommand.
fn command_policy(command: PolicyCommand) -> CliResult<ExitCode> {
    match command {
        PolicyCommand::Validate {
            policy,
        } => {
            let policy = load_policy_arg(policy.as_deref())?;
            write_stdout_line(&t!("policy.valid", policy_id = policy.policy_id()))?;
        }
        PolicyCommand::Schema => write_json(&policy_schema())?,
        PolicyCommand::Example {
            format,
        } => {
            let example = match format {
                ExampleFormat::Json => policy_json_example(),
                ExampleFormat::Toml => policy_toml_example(),
            };
            write_stdout_str(&example)?;
        }
    }
    Ok(ExitCode::from(EXIT_ALLOW))
}

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Loads and validates the policy named by `--policy` or its fallbacks.
fn load_policy_arg(path: Option<&Path>) -> CliResult<ValidatedPolicy> {
    load_policy(path).map_err(|err| CliError::new(t!("policy.load_failed", error = err)))
}

/// Resolves `--now`, defaulting to the wall clock.
fn resolve_now(value: Option<&str>) -> CliResult<Timestamp> {
    value.map_or_else(
        || Ok(wall_clock_now()),
        |value| {
            parse_now(value).map_err(|err| {
                CliError::new(t!("input.now_invalid", value = value, error = err))
            })
        },
    )
}

/// Opens the audit sink selected by `args`.
fn open_sink(args: &AuditArgs) -> CliResult<Box<dyn DecisionAuditSink>> {
    select_sink(args.audit_log.as_deref(), args.audit_stderr).map_err(|err| {
        let path =
            args.audit_log.as_deref().map(|path| path.display().to_string()).unwrap_or_default();
        CliError::new(t!("audit.open_failed", path = path, error = err))
    })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes pretty-printed JSON followed by a newline.
fn write_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?;
    write_stdout_line(&rendered)
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}").map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes text to stdout without adding a newline.
fn write_stdout_str(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(message.as_bytes()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a catalog output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns the error exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::from(EXIT_ERROR)
}
