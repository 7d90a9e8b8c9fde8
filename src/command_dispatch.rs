//! Purpose: Hold top-level CLI command dispatch for `diffuse-normalize`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: stdout carries only command payloads; notices and errors go to stderr.
//! Invariants: Degraded decodes exit 0; only intake and envelope failures are errors.

use super::*;

pub(super) fn dispatch_command(
    command: Command,
    config: NormalizeConfig,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "diffuse-normalize", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_version_output();
            Ok(RunOutcome::ok())
        }
        Command::Ingest { input } => {
            init_tracing("error");
            let source = InputSource::from_arg(input);
            let body = read_input(&source)?;
            let ingested = Normalizer::new(&config)
                .ingest_body(&body)
                .map_err(|err| with_source_path(err, &source))?;
            emit_decode_notice(&ingested.report, "ingest", &source);
            emit_json(json!(ingested));
            Ok(RunOutcome::ok())
        }
        Command::Render { inputs } => {
            init_tracing("error");
            let sources = if inputs.is_empty() {
                vec![InputSource::Stdin]
            } else {
                inputs
                    .into_iter()
                    .map(|path| InputSource::from_arg(Some(path)))
                    .collect()
            };
            let normalizer = Normalizer::new(&config);
            for source in &sources {
                let stored = read_input(source)?;
                let rendered = normalizer.render(&stored);
                emit_decode_notice(&rendered.report, "render", source);
                emit_json(json!({
                    "source": source.label(),
                    "content": rendered.content,
                    "decode": rendered.report,
                }));
            }
            Ok(RunOutcome::ok())
        }
        Command::Sanitize { input } => {
            let source = InputSource::from_arg(input);
            let text = read_input(&source)?;
            emit_text(&sanitize(&text))?;
            Ok(RunOutcome::ok())
        }
        Command::Serve(args) => {
            let bind: std::net::SocketAddr = args.bind.parse().map_err(|_| {
                Error::new(ErrorKind::Usage)
                    .with_message("invalid bind address")
                    .with_hint("Use a host:port value like 127.0.0.1:9800.")
            })?;
            let serve_config = serve::ServeConfig {
                bind,
                max_body_bytes: args.max_body_bytes,
                allow_non_loopback: args.allow_non_loopback,
                normalize: config,
            };
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(|err| {
                    Error::new(ErrorKind::Internal)
                        .with_message("failed to start runtime")
                        .with_source(err)
                })?;
            runtime.block_on(serve::serve(serve_config))?;
            Ok(RunOutcome::ok())
        }
    }
}

fn with_source_path(err: Error, source: &InputSource) -> Error {
    match source {
        InputSource::Path(path) if err.path().is_none() => err.with_path(path.clone()),
        _ => err,
    }
}
