use std::path::PathBuf;

use clap::Parser;

/// Convert blog articles to PDF through a Blog-to-PDF backend.
///
/// Without `--url` the tool runs interactively: type a URL and press Enter to
/// convert it, `:save` to save the last PDF, `:quit` to exit.
#[derive(Debug, Clone, Parser)]
#[command(name = "blog2pdf", version)]
pub struct Cli {
    /// Convert this URL once, save the PDF and exit.
    #[arg(long)]
    pub url: Option<String>,

    /// RON configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Backend origin, e.g. http://localhost:8000.
    #[arg(long, value_name = "URL")]
    pub backend: Option<String>,

    /// Directory where downloaded PDFs are saved.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Timeout for each backend request, in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Log level: off, error, warn, info, debug or trace.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Write logs to this file instead of the terminal.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Disable coloured output.
    #[arg(long)]
    pub no_color: bool,
}
