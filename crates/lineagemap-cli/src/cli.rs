//! CLI argument parsing using clap.

use clap::{Parser, ValueEnum};
use lineagemap_core::{SourceType, Theme};
use std::path::PathBuf;

/// LineageMap - AI-assisted column-level lineage mapper
#[derive(Parser, Debug)]
#[command(name = "lineagemap")]
#[command(
    about = "Map column-level data lineage in SQL and ETL code",
    long_about = None
)]
#[command(version)]
pub struct Args {
    /// Source files to analyze, concatenated in order (reads from stdin if none provided)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Kind of code being analyzed
    #[arg(short = 't', long, default_value = "sql", value_enum)]
    pub source_type: SourceTypeArg,

    /// Output format
    #[arg(short, long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Project name used for the HTML title and export filenames
    #[arg(long, default_value = lineagemap_export::DEFAULT_PROJECT_NAME)]
    pub project_name: String,

    /// Suppress status messages on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Compact JSON output (no pretty-printing)
    #[arg(short, long)]
    pub compact: bool,

    /// Replay a saved model response instead of calling the AI service
    #[arg(long, value_name = "FILE")]
    pub from_response: Option<PathBuf>,

    /// Model name (overrides LINEAGEMAP_MODEL)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Request timeout in seconds (overrides LINEAGEMAP_TIMEOUT_SECS)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Color theme for HTML output and the web UI (overrides LINEAGEMAP_THEME)
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,

    /// Start HTTP server with embedded web UI
    #[cfg(feature = "serve")]
    #[arg(long)]
    pub serve: bool,

    /// Port for HTTP server (default: 3000)
    #[cfg(feature = "serve")]
    #[arg(long, default_value = "3000")]
    pub port: u16,

    /// Open browser automatically when server starts
    #[cfg(feature = "serve")]
    #[arg(long)]
    pub open: bool,
}

impl Args {
    #[cfg(feature = "serve")]
    pub fn serve_mode(&self) -> bool {
        self.serve
    }

    #[cfg(not(feature = "serve"))]
    pub fn serve_mode(&self) -> bool {
        false
    }
}

/// Kinds of source code accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceTypeArg {
    Sql,
    #[value(alias = "spark")]
    Pyspark,
    Dbt,
    Airflow,
    Other,
}

impl From<SourceTypeArg> for SourceType {
    fn from(arg: SourceTypeArg) -> Self {
        match arg {
            SourceTypeArg::Sql => SourceType::Sql,
            SourceTypeArg::Pyspark => SourceType::Pyspark,
            SourceTypeArg::Dbt => SourceType::Dbt,
            SourceTypeArg::Airflow => SourceType::Airflow,
            SourceTypeArg::Other => SourceType::Other,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Markdown report
    Markdown,
    /// Lineage JSON (same shape the AI service answers in)
    Json,
    /// Node/edge graph JSON
    Graph,
    /// Mermaid diagram
    Mermaid,
    /// HTML report with interactive graph
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}
