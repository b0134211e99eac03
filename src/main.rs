use anyhow::Context;
use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cnamescan::classifier::{CheckOutcome, Classifier};
use cnamescan::cli::{self, Cli};
use cnamescan::fingerprints::FingerprintTable;
use cnamescan::report;
use cnamescan::resolver::CnameResolver;
use cnamescan::scanner::TakeoverScanner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    anyhow::ensure!(args.threads > 0, "thread count must be at least 1");

    let subdomains = cli::load_subdomains(&args.input)?;
    info!(
        "loaded {} subdomains from {}",
        subdomains.len(),
        args.input.display()
    );

    let scanner = TakeoverScanner::new(
        CnameResolver::from_system_conf(),
        Classifier::new(FingerprintTable::builtin()),
        args.threads,
    );

    info!(
        "scan started at {} with {} workers",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        args.threads
    );
    let started = std::time::Instant::now();
    let results = scanner.run(subdomains).await;
    let takeovers = results
        .iter()
        .filter(|r| matches!(r, CheckOutcome::Matched { .. }))
        .count();
    info!(
        "checked {} subdomains in {:.2}s, {takeovers} possible takeovers",
        results.len(),
        started.elapsed().as_secs_f64()
    );

    report::print_table(&results);

    if let Some(path) = &args.output {
        report::write_delimited(path, &results)
            .with_context(|| format!("failed to write output file {}", path.display()))?;
        println!("\nResults saved to: {}", path.display());
    }

    Ok(())
}
