//! Purpose: `arcmark` CLI entry point.
//! Role: Binary crate root; parses args, finds the sidebar file, converts, writes the export.
//! Invariants: Progress logs go to stderr; stdout carries only the receipt or the HTML.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: No output file is created unless conversion fully succeeded.
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod output_sink;
mod sidebar_paths;

use arcmark::api::{ConversionReport, Error, ErrorKind, HtmlOptions, convert_str, to_exit_code};
use output_sink::{Destination, resolve_destination, today_utc, write_atomic};
use sidebar_paths::{InputSource, Platform, SourceLocation, read_input};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

/// What the error emitter knows about the run besides the error itself.
#[derive(Copy, Clone, Debug)]
struct ErrorContext {
    color: ColorMode,
    source: Option<SourceLocation>,
}

impl ErrorContext {
    fn new(color: ColorMode) -> Self {
        Self {
            color,
            source: None,
        }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, context)) => {
            emit_error(&err, context);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ErrorContext)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ErrorContext::new(ColorMode::Auto),
                    )
                })?;
                return Ok(RunOutcome::with_code(0));
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Run `arcmark --help` for usage."),
                    ErrorContext::new(ColorMode::Auto),
                ));
            }
        },
    };

    let mut context = ErrorContext::new(cli.color);
    init_tracing(cli.quiet);

    let cwd = current_dir().map_err(|err| (with_hints(err), context))?;
    let source = locate_input(&cli, &cwd).map_err(|err| (with_hints(err), context))?;
    context.source = Some(source.location);
    export(&cli, &cwd, &source).map_err(|err| (with_hints(err), context))
}

#[derive(Parser)]
#[command(
    name = "arcmark",
    version,
    about = "Export Arc sidebar spaces as Netscape bookmark HTML",
    long_about = None,
    after_help = r#"EXAMPLES
  $ arcmark          # finds StorableSidebar.json, writes arc_bookmarks_<date>.html
  $ arcmark --input ~/Desktop/StorableSidebar.json --output-dir ~/exports
  $ arcmark --output - --escape-html > bookmarks.html

Only pinned spaces are exported. The input is looked up in the current
directory first, then in Arc's application data directory."#
)]
struct Cli {
    #[arg(
        long,
        help = "Path to StorableSidebar.json (skips automatic discovery)",
        value_hint = ValueHint::FilePath
    )]
    input: Option<PathBuf>,
    #[arg(
        long,
        help = "Output file path, or `-` for stdout",
        value_hint = ValueHint::FilePath,
        conflicts_with = "output_dir"
    )]
    output: Option<PathBuf>,
    #[arg(
        long,
        help = "Directory for the date-stamped output file (default: current directory)",
        value_hint = ValueHint::DirPath
    )]
    output_dir: Option<PathBuf>,
    #[arg(long, help = "HTML-escape titles and URLs instead of inserting them verbatim")]
    escape_html: bool,
    #[arg(long, help = "Emit the completion receipt as JSON even on a terminal")]
    json: bool,
    #[arg(long, short, help = "Only log warnings and errors")]
    quiet: bool,
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize terminal diagnostics"
    )]
    color: ColorMode,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Debug, Serialize)]
struct Receipt {
    output: String,
    source: &'static str,
    input: String,
    #[serde(flatten)]
    report: ConversionReport,
}

fn current_dir() -> Result<PathBuf, Error> {
    std::env::current_dir().map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("cannot determine current directory")
            .with_source(err)
    })
}

fn locate_input(cli: &Cli, cwd: &Path) -> Result<InputSource, Error> {
    tracing::info!("Reading JSON...");
    let source = read_input(
        cli.input.as_deref(),
        cwd,
        dirs::home_dir().as_deref(),
        Platform::current(),
    )?;
    tracing::info!(
        path = %source.path.display(),
        "> Found {} in {}.",
        sidebar_paths::SIDEBAR_FILE,
        source.location.label()
    );
    Ok(source)
}

fn export(cli: &Cli, cwd: &Path, source: &InputSource) -> Result<RunOutcome, Error> {
    let options = if cli.escape_html {
        HtmlOptions::escaped()
    } else {
        HtmlOptions::default()
    };
    let conversion =
        convert_str(&source.contents, options).map_err(|err| attach_input(err, source))?;

    let destination = resolve_destination(
        cli.output.as_deref(),
        cli.output_dir.as_deref(),
        cwd,
        today_utc(),
    );
    match destination {
        Destination::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(conversion.html.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write bookmarks to stdout")
                        .with_source(err)
                })?;
        }
        Destination::File(path) => {
            tracing::info!("Writing HTML...");
            write_atomic(&path, &conversion.html)?;
            tracing::info!("> HTML written to {}.", path.display());
            let receipt = Receipt {
                output: path.display().to_string(),
                source: source.location.label(),
                input: source.path.display().to_string(),
                report: conversion.report,
            };
            emit_receipt(&receipt, cli.json, cli.color);
        }
    }
    Ok(RunOutcome::ok())
}

fn attach_input(err: Error, source: &InputSource) -> Error {
    if err.path().is_some() {
        return err;
    }
    err.with_path(&source.path)
}

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or("invalid arguments");
    first
        .strip_prefix("error: ")
        .unwrap_or(first)
        .trim()
        .to_string()
}

fn with_hints(err: Error) -> Error {
    add_malformed_hint(add_io_hint(err))
}

fn add_io_hint(err: Error) -> Error {
    if err.hint().is_some() {
        return err;
    }
    match err.kind() {
        ErrorKind::Permission => err.with_hint(
            "Permission denied. Check file permissions or choose another --output-dir.",
        ),
        ErrorKind::Io => err.with_hint("I/O error. Check the path, filesystem, and disk space."),
        _ => err,
    }
}

fn add_malformed_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Malformed || err.hint().is_some() {
        return err;
    }
    err.with_hint(
        "The file does not look like an Arc StorableSidebar.json export. \
         Check that the right file was picked up.",
    )
}

fn emit_receipt(receipt: &Receipt, force_json: bool, color_mode: ColorMode) {
    let is_tty = io::stdout().is_terminal();
    if is_tty && !force_json {
        let label = colorize_label("Done!", color_mode.use_color(is_tty), AnsiColor::Green);
        println!(
            "{label} Wrote {} bookmarks from {} pinned spaces to {}",
            receipt.report.bookmarks, receipt.report.pinned, receipt.output
        );
        return;
    }
    let json = serde_json::to_string(receipt)
        .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
    Green,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
        AnsiColor::Green => "32",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, context: ErrorContext) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!(
            "{}",
            error_text(err, context.source, context.color.use_color(is_tty))
        );
        return;
    }

    let value = error_json(err, context.source);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        format!(
            "{{\"error\":{{\"kind\":\"{:?}\",\"message\":\"json encode failed\"}}}}",
            err.kind()
        )
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::Malformed => "malformed sidebar document".to_string(),
        ErrorKind::Permission => "permission denied".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error, source: Option<SourceLocation>) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(source) = source {
        inner.insert("source".to_string(), json!(source.label()));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, source: Option<SourceLocation>, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));
    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(path) = err.path() {
        lines.push(format!(
            "{} {}",
            colorize_label("path:", use_color, AnsiColor::Yellow),
            display_path(path)
        ));
    }
    if let Some(source) = source {
        lines.push(format!(
            "{} {} from the {}",
            colorize_label("input:", use_color, AnsiColor::Yellow),
            sidebar_paths::SIDEBAR_FILE,
            source.label()
        ));
    }
    if let Some(cause) = error_causes(err).first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }
    lines.join("\n")
}

fn display_path(path: &Path) -> String {
    match dirs::home_dir() {
        Some(home) => match path.strip_prefix(&home) {
            Ok(rest) => format!("~/{}", rest.display()),
            Err(_) => path.display().to_string(),
        },
        None => path.display().to_string(),
    }
}
