//! Aggregation of per-query metrics and the summary report.

use crate::error::Result;
use crate::eval::gold::GoldIndex;
use crate::eval::metrics::{mrr_at_k, ndcg_at_k, recall_at_k};
use crate::eval::run::RunEntry;
use serde::Serialize;
use std::io::Write;

/// Scores for one run query that had a gold entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryScores {
    pub query_id: String,
    pub recall: f64,
    pub ndcg: f64,
    pub mrr: f64,
}

/// Final report. Field order is the output key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub k: usize,
    pub queries_with_gold: usize,
    pub recall_at_k: f64,
    pub ndcg_at_k: f64,
    pub mrr_at_k: f64,
}

/// Append-only per-metric lists, in run-file order.
#[derive(Debug, Clone)]
pub struct MetricAccumulator {
    k: usize,
    recall: Vec<f64>,
    ndcg: Vec<f64>,
    mrr: Vec<f64>,
    skipped: usize,
}

impl MetricAccumulator {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            recall: Vec::new(),
            ndcg: Vec::new(),
            mrr: Vec::new(),
            skipped: 0,
        }
    }

    /// Score one run entry. Entries whose query has no gold entry are counted as
    /// skipped and return None.
    pub fn observe(&mut self, entry: &RunEntry, gold: &GoldIndex) -> Option<QueryScores> {
        let Some(positives) = gold.get(&entry.query_id) else {
            self.skipped += 1;
            return None;
        };
        let scores = QueryScores {
            query_id: entry.query_id.clone(),
            recall: recall_at_k(&entry.ranked_ids, positives, self.k),
            ndcg: ndcg_at_k(&entry.ranked_ids, positives, self.k),
            mrr: mrr_at_k(&entry.ranked_ids, positives, self.k),
        };
        self.recall.push(scores.recall);
        self.ndcg.push(scores.ndcg);
        self.mrr.push(scores.mrr);
        Some(scores)
    }

    pub fn queries_with_gold(&self) -> usize {
        self.recall.len()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn recalls(&self) -> &[f64] {
        &self.recall
    }

    pub fn ndcgs(&self) -> &[f64] {
        &self.ndcg
    }

    pub fn mrrs(&self) -> &[f64] {
        &self.mrr
    }

    pub fn finish(self) -> Summary {
        Summary {
            k: self.k,
            queries_with_gold: self.queries_with_gold(),
            recall_at_k: round4(mean(&self.recall)),
            ndcg_at_k: round4(mean(&self.ndcg)),
            mrr_at_k: round4(mean(&self.mrr)),
        }
    }
}

/// Arithmetic mean, 0.0 for an empty list.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Round to 4 decimal places on the exact decimal value, ties to even.
pub fn round4(value: f64) -> f64 {
    format!("{:.4}", value).parse().unwrap_or(value)
}

/// Score every run entry against the gold index and summarize.
///
/// The first loader error aborts the evaluation; no partial summary is built.
pub fn evaluate<I>(gold: &GoldIndex, runs: I, k: usize) -> Result<Summary>
where
    I: IntoIterator<Item = Result<RunEntry>>,
{
    let mut acc = MetricAccumulator::new(k);
    for entry in runs {
        let entry = entry?;
        if let Some(scores) = acc.observe(&entry, gold) {
            log::debug!(
                "{} recall={:.4} ndcg={:.4} mrr={:.4}",
                scores.query_id,
                scores.recall,
                scores.ndcg,
                scores.mrr
            );
        }
    }
    log::info!(
        "Scored {} run queries with gold at k={} ({} without gold skipped)",
        acc.queries_with_gold(),
        k,
        acc.skipped()
    );
    Ok(acc.finish())
}

/// Write the summary as a pretty-printed JSON object followed by a newline.
pub fn write_summary<W: Write>(mut out: W, summary: &Summary) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut out, summary)?;
    writeln!(out)?;
    out.flush()
}
