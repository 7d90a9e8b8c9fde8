//! Purpose: `diffuse-normalize` CLI entry point.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Commands emit stable stdout formats; diagnostics go to stderr only.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: All decoding goes through `api::Normalizer`.
#![allow(clippy::result_large_err)]
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{
    Args, CommandFactory, Parser, Subcommand, ValueHint, error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod command_dispatch;
mod input;
mod serve;

use diffuse_normalize::api::{
    DEFAULT_AUTHOR, DEFAULT_PLACEHOLDER_TITLE, DEFAULT_UNTITLED_PROJECT_TITLE, DecodeReport, Error,
    ErrorKind, NormalizeConfig, Normalizer, sanitize, to_exit_code,
};
use diffuse_normalize::notice::{Notice, decode_notice, notice_json};
use input::{InputSource, read_input};

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

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Try `diffuse-normalize --help`."));
            }
        },
    };

    let config = cli.defaults.config();
    command_dispatch::dispatch_command(cli.command, config)
        .map_err(add_io_hint)
        .map_err(add_internal_hint)
}

#[derive(Parser)]
#[command(
    name = "diffuse-normalize",
    version,
    about = "Recover structured records from generative-pipeline responses",
    long_about = None,
    before_help = r#"Responses are JSON envelopes of unpredictable shape whose payload text may be broken.

Mental model:
  - `ingest` turns a fresh upstream response into container + content records
  - `render` re-decodes a stored content blob for display (read-only)
  - `sanitize` shows the control-character repair applied to a payload
"#,
    after_help = r#"EXAMPLES
  $ diffuse-normalize ingest response.json
  $ curl -s "$GENERATOR_URL" | diffuse-normalize ingest
  $ diffuse-normalize render stored/*.json
  $ diffuse-normalize serve --bind 127.0.0.1:9800

EXIT CODES
  0 ok (including degraded decodes; see stderr notices)
  2 usage   3 empty upstream body   4 no payload in envelope   5 i/o"#,
    arg_required_else_help = true,
    disable_help_subcommand = false
)]
struct Cli {
    #[command(flatten)]
    defaults: DefaultsArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone, Debug)]
struct DefaultsArgs {
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_AUTHOR,
        help = "Author injected when the payload has none"
    )]
    default_author: String,
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_UNTITLED_PROJECT_TITLE,
        help = "Container title when the payload has no project_title or title"
    )]
    untitled_title: String,
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_PLACEHOLDER_TITLE,
        help = "Title of the placeholder record when nothing decodes"
    )]
    placeholder_title: String,
}

impl DefaultsArgs {
    fn config(&self) -> NormalizeConfig {
        NormalizeConfig {
            default_author: self.default_author.clone(),
            untitled_project_title: self.untitled_title.clone(),
            placeholder_title: self.placeholder_title.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Normalize a fresh upstream response",
        long_about = r#"Resolve the payload inside an upstream response, decode it, and split it
into a container record and a content record.

Prints {"container", "content", "decode"} as JSON. Degraded or empty decodes still
succeed; a notice is written to stderr."#
    )]
    Ingest {
        #[arg(help = "Response file (default: stdin; `-` also means stdin)", value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
    },
    #[command(
        about = "Re-decode stored content blobs for display",
        long_about = r#"Decode previously stored content blobs (including historical malformed ones)
without creating a container. Prints one {"source", "content", "decode"} object per input."#
    )]
    Render {
        #[arg(help = "Stored blob files (default: stdin)", value_hint = ValueHint::FilePath)]
        inputs: Vec<PathBuf>,
    },
    #[command(about = "Print payload text with control characters inside strings escaped")]
    Sanitize {
        #[arg(help = "Payload file (default: stdin)", value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
    },
    #[command(about = "Serve ingest/render over HTTP")]
    Serve(ServeArgs),
    #[command(about = "Print version info")]
    Version,
    #[command(
        arg_required_else_help = true,
        about = "Generate shell completions",
        after_help = r#"EXAMPLES
  $ diffuse-normalize completion bash > ~/.local/share/bash-completion/completions/diffuse-normalize
  $ diffuse-normalize completion zsh > ~/.zfunc/_diffuse-normalize"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

#[derive(Args, Clone, Debug)]
struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1:9800", help = "Bind address (host:port)")]
    bind: String,
    #[arg(
        long,
        default_value_t = 1024 * 1024,
        help = "Maximum request body size in bytes"
    )]
    max_body_bytes: u64,
    #[arg(long, help = "Allow binding to a non-loopback address")]
    allow_non_loopback: bool,
}

pub(crate) fn init_tracing(default_directive: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn emit_json(value: Value) {
    let json = if io::stdout().is_terminal() {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn emit_text(text: &str) -> Result<(), Error> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to write stdout")
                .with_source(err)
        })
}

fn emit_version_output() {
    if io::stdout().is_terminal() {
        println!("diffuse-normalize {}", env!("CARGO_PKG_VERSION"));
    } else {
        emit_json(json!({
            "name": "diffuse-normalize",
            "version": env!("CARGO_PKG_VERSION"),
        }));
    }
}

fn notice_time_now() -> Option<String> {
    use time::format_description::well_known::Rfc3339;
    let duration = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
    let ts = time::OffsetDateTime::from_unix_timestamp_nanos(duration.as_nanos() as i128).ok()?;
    ts.format(&Rfc3339).ok()
}

fn emit_decode_notice(report: &DecodeReport, cmd: &str, source: &InputSource) {
    let time = notice_time_now().unwrap_or_default();
    if let Some(notice) = decode_notice(report, cmd, &source.label(), &time) {
        emit_notice(&notice);
    }
}

fn emit_notice(notice: &Notice) {
    if io::stderr().is_terminal() {
        eprintln!("notice: {} (source: {})", notice.message, notice.source);
        return;
    }

    let value = notice_json(notice);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"notice\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::EmptyBody => "empty upstream body".to_string(),
        ErrorKind::EnvelopeNotFound => "no payload in upstream envelope".to_string(),
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

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error) -> String {
    let mut lines = vec![format!("error: {}", error_message(err))];
    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    if let Some(path) = err.path() {
        lines.push(format!("path: {}", path.display()));
    }
    for cause in error_causes(err) {
        lines.push(format!("caused by: {cause}"));
    }
    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

fn add_io_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Io || err.hint().is_some() {
        return err;
    }
    err.with_hint("I/O error. Check the input path and permissions.")
}

fn add_internal_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Internal || err.hint().is_some() {
        return err;
    }
    err.with_hint(
        "Unexpected internal failure. Retry with RUST_BACKTRACE=1 and share command/context if it persists.",
    )
}
