use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

use phish_probe::{read_url, run_scan, ScanConfig, Scanner};

#[derive(Parser, Debug)]
#[command(author, version, about = "Heuristic phishing signals for a URL", long_about = None)]
struct Args {
    /// URL to inspect (prompted for when omitted)
    url: Option<String>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let url = match args.url {
        Some(url) => url,
        None => read_url(&mut io::stdin().lock(), &mut io::stdout())
            .context("Failed to read URL from stdin")?,
    };

    let scanner = Scanner::from_config(&ScanConfig::default())
        .context("Failed to set up lookup clients")?;
    let color = cfg!(feature = "color") && io::stdout().is_terminal();

    let code = run_scan(&url, &scanner, &mut io::stdout(), &mut io::stderr(), color)
        .context("Failed to write report")?;
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout carries only the report
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
