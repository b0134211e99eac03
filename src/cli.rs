use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "cnamescan")]
#[command(version, about = "Dangling-CNAME subdomain takeover checker", long_about = None)]
pub struct Cli {
    /// File containing subdomains to check (one per line)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Maximum number of concurrent lookups
    #[arg(short, long, default_value_t = 20, value_name = "N")]
    pub threads: usize,

    /// Write results as comma-delimited lines to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Load the subdomain list: trim whitespace, drop blank lines, keep
/// everything else untouched. An empty file is a valid (empty) run.
pub fn load_subdomains(path: &Path) -> anyhow::Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open input file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut subdomains = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        subdomains.push(line.to_string());
    }

    Ok(subdomains)
}
