use std::fs;
use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use fivewords::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    let report = fivewords::solve(&config).context("solve failed")?;

    if report.hash_collisions > 0 {
        tracing::debug!(collisions = report.hash_collisions, "word index probe collisions");
    }

    let bytes = report.solutions.as_bytes();
    match &config.output {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("writing solutions to {}", path.display()))?;
        }
        None => {
            io::stdout().write_all(bytes).context("writing solutions to stdout")?;
        }
    }

    println!(
        "{} solutions from {} candidates ({} input lines skipped)",
        report.solutions.count(),
        report.candidate_count,
        report.skipped_input_lines,
    );

    Ok(())
}
