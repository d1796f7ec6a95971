//! Evaluation CLI: score a retrieval run against gold labels and print R@K, NDCG@K, MRR@K.

use anyhow::Context;
use clap::Parser;
use retrieval_eval::{eval::evaluate_files, write_summary, Config};
use std::path::PathBuf;

/// Score a retrieval run against labeled gold queries.
#[derive(Parser, Debug)]
#[command(name = "evaluate", version)]
struct Args {
    /// Gold JSONL file(s) or glob patterns (e.g. eval/gold/*.jsonl).
    #[arg(long, required = true, num_args = 1..)]
    gold: Vec<String>,

    /// Run JSONL file produced by the retrieval pipeline.
    #[arg(long)]
    run: PathBuf,

    /// Rank cutoff for all metrics (default: eval.default_k from config, else 10).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    k: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level()),
    )
    .init();

    let k = match args.k {
        Some(k) => usize::try_from(k).context("--k does not fit in usize")?,
        None => config.default_k(),
    };
    log::info!(
        "Evaluating {} at k={} against {} gold pattern(s)",
        args.run.display(),
        k,
        args.gold.len()
    );

    let summary = evaluate_files(&args.gold, &args.run, k)
        .with_context(|| format!("Evaluation of {} failed", args.run.display()))?;

    let stdout = std::io::stdout();
    write_summary(stdout.lock(), &summary).context("Failed to write summary")?;

    Ok(())
}
