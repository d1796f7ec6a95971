//! Evaluation framework: gold/run loaders, metrics (R@K, NDCG@K, MRR@K), and summary.

pub mod gold;
pub mod jsonl;
pub mod metrics;
pub mod run;
pub mod summary;

pub use gold::{load_gold, GoldEntry, GoldIndex};
pub use metrics::{mrr_at_k, ndcg_at_k, recall_at_k};
pub use run::{read_run, RunEntry, RunReader};
pub use summary::{evaluate, write_summary, MetricAccumulator, QueryScores, Summary};

use crate::error::Result;
use std::path::Path;

/// Load the gold index, then stream the run file through the metric engine.
pub fn evaluate_files(gold_patterns: &[String], run_path: &Path, k: usize) -> Result<Summary> {
    let gold = load_gold(gold_patterns)?;
    let runs = read_run(run_path)?;
    evaluate(&gold, runs, k)
}
