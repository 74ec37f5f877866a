//! LineageMap CLI - AI-assisted column-level lineage mapper

use lineagemap_cli::cli;
use lineagemap_cli::input;
use lineagemap_cli::output;
#[cfg(feature = "serve")]
use lineagemap_cli::server;

use anyhow::{Context, Result};
use clap::Parser;
use lineagemap_core::{
    AnalysisBackend, GeminiBackend, LineageAnalyzer, LineageConfig, LineageError, StaticBackend,
};
use lineagemap_export::{export, ExportFormat, ExportNaming};
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use cli::{Args, OutputFormat};

/// Analysis failed (empty input, backend error, invalid response).
const EXIT_FAILURE: u8 = 1;
/// Configuration error (missing API key, bad timeout, unreadable input).
const EXIT_CONFIG_ERROR: u8 = 66;

fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_tracing(args.serve_mode());

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("lineagemap: error: {e:#}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let analyzer = match build_analyzer(&args, &config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("lineagemap: error: {e:#}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    #[cfg(feature = "serve")]
    if args.serve {
        return run_serve_mode(args, config, analyzer);
    }

    match run(args, config, analyzer) {
        Ok(failed) => {
            if failed {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("lineagemap: error: {e:#}");
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the default level.
fn init_tracing(serve: bool) {
    let default_level = if serve { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Environment configuration with command-line overrides applied.
fn load_config(args: &Args) -> Result<LineageConfig> {
    let mut config = LineageConfig::from_env()?;

    if let Some(model) = &args.model {
        let model = model.trim();
        if model.is_empty() {
            anyhow::bail!("--model must not be empty");
        }
        config.model = model.to_string();
    }
    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs))?;
    }
    if let Some(theme) = args.theme {
        config.theme = theme.into();
    }

    Ok(config)
}

/// Live Gemini backend, or a replay of a saved response.
///
/// The live backend needs an API key; a missing key fails here, before any
/// input is read.
fn build_analyzer(args: &Args, config: &LineageConfig) -> Result<LineageAnalyzer> {
    let backend: Arc<dyn AnalysisBackend> = match &args.from_response {
        Some(path) => {
            let saved = fs::read_to_string(path)
                .with_context(|| format!("Failed to read saved response: {}", path.display()))?;
            Arc::new(StaticBackend::new(saved))
        }
        None => Arc::new(GeminiBackend::from_config(config)?),
    };

    Ok(LineageAnalyzer::with_config(backend, config))
}

/// Run the CLI in serve mode with embedded web UI.
#[cfg(feature = "serve")]
fn run_serve_mode(args: Args, config: LineageConfig, analyzer: LineageAnalyzer) -> ExitCode {
    let server_config = server::ServerConfig {
        lineage: config,
        project_name: args.project_name,
        port: args.port,
        open_browser: args.open,
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("lineagemap: error: failed to create tokio runtime: {e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match runtime.block_on(server::run_server(server_config, analyzer)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lineagemap: server error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Analyze the input once and write the requested format.
///
/// Returns `Ok(true)` when the analysis itself failed; the error has already
/// been reported on stderr.
fn run(args: Args, config: LineageConfig, analyzer: LineageAnalyzer) -> Result<bool> {
    let sources = input::read_input(&args.files)?;
    let code = input::combine(&sources);

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let started = Instant::now();
    let outcome = runtime.block_on(analyzer.build_and_submit(&code, args.source_type.into()));

    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            print_analysis_error(&err, args.quiet);
            return Ok(true);
        }
    };

    if !args.quiet {
        eprintln!(
            "lineagemap: {} mapping(s) from {} source(s) in {:.1}s",
            result.mappings.len(),
            sources.len(),
            started.elapsed().as_secs_f64()
        );
    }

    let output_str = match export_format(args.format, args.compact) {
        None => output::format_table(&result, true),
        Some(format) => {
            let naming = ExportNaming::new(args.project_name.clone());
            export(&result, format, &naming, config.theme)
                .with_context(|| format!("Failed to export {format:?}"))?
        }
    };

    write_output(&args.output, &output_str)?;

    Ok(false)
}

fn export_format(format: OutputFormat, compact: bool) -> Option<ExportFormat> {
    match format {
        OutputFormat::Table => None,
        OutputFormat::Markdown => Some(ExportFormat::Markdown),
        OutputFormat::Json => Some(ExportFormat::Json { compact }),
        OutputFormat::Graph => Some(ExportFormat::Graph { compact }),
        OutputFormat::Mermaid => Some(ExportFormat::Mermaid),
        OutputFormat::Html => Some(ExportFormat::Html),
    }
}

fn print_analysis_error(err: &LineageError, quiet: bool) {
    eprintln!("lineagemap: error [{}]: {err}", err.code());

    if quiet {
        return;
    }
    if let Some(excerpt) = err.raw_excerpt() {
        eprintln!("lineagemap: raw response: {excerpt}");
    }
    if matches!(err, LineageError::ExtractionFailed(_)) {
        eprintln!("lineagemap: hint: try a smaller or simpler snippet");
    }
}

fn write_output(path: &Option<std::path::PathBuf>, content: &str) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, content)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    } else {
        io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        // Ensure newline at end for terminal output
        if !content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
