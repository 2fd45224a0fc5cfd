use std::path::PathBuf;

use clap::Parser;

/// weave: open a web page in a native window with host functions bound.
#[derive(Parser, Debug)]
#[command(name = "weave", version, about)]
pub struct Args {
    /// URL to open. Without it (and without --html) a demo page is shown.
    pub url: Option<String>,

    /// Load this HTML file instead of a URL.
    #[arg(long, conflicts_with = "url")]
    pub html: Option<PathBuf>,

    /// Window title override.
    #[arg(short, long)]
    pub title: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Run without a window: call the bound demo functions from a simulated
    /// page and print their results.
    #[arg(long)]
    pub headless: bool,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
