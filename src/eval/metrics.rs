//! Evaluation metrics: Recall@K, NDCG@K and MRR@K with binary relevance.

use std::collections::HashSet;

/// Recall at K: proportion of relevant chunks that appear in the top-K.
/// Returns |set(top-K) ∩ gold| / |gold|. Duplicated predictions count once.
/// If gold is empty (denominator 0), returns 0.0.
pub fn recall_at_k(ranked: &[String], gold: &HashSet<String>, k: usize) -> f64 {
    if gold.is_empty() {
        return 0.0;
    }
    let retrieved: HashSet<&str> = ranked
        .iter()
        .take(k)
        .map(String::as_str)
        .filter(|id| gold.contains(*id))
        .collect();
    retrieved.len() as f64 / gold.len() as f64
}

/// Reciprocal rank of the first relevant chunk within the top-K (1-based rank).
/// Returns 0.0 if none of the top-K is relevant.
pub fn mrr_at_k(ranked: &[String], gold: &HashSet<String>, k: usize) -> f64 {
    ranked
        .iter()
        .take(k)
        .position(|id| gold.contains(id))
        .map(|pos| 1.0 / (pos + 1) as f64)
        .unwrap_or(0.0)
}

/// Discount for the 0-based position `i`: 1 / log2(i + 2).
fn discount(i: usize) -> f64 {
    1.0 / (i as f64 + 2.0).log2()
}

/// Normalized DCG at K.
///
/// DCG sums `discount(i)` over every top-K position holding a relevant chunk,
/// repeats included. IDCG is the DCG of `min(K, |gold|)` relevant chunks at the
/// top. Returns 0.0 when IDCG is 0.
pub fn ndcg_at_k(ranked: &[String], gold: &HashSet<String>, k: usize) -> f64 {
    let dcg: f64 = ranked
        .iter()
        .take(k)
        .enumerate()
        .filter(|(_, id)| gold.contains(*id))
        .map(|(i, _)| discount(i))
        .sum();

    let idcg: f64 = (0..k.min(gold.len())).map(discount).sum();

    if idcg > 0.0 {
        dcg / idcg
    } else {
        0.0
    }
}
