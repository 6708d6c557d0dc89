//! Contribution ranking shared by every detection tier.

use rayon::prelude::*;

use anomaly_spi::{AnomalyResult, SubScore};

/// Select the top `k` sub-scores, highest first.
///
/// The sort is stable, so equal sub-scores keep feature declaration order.
pub fn rank_contributors(names: &[&str], sub_scores: &[f64], k: usize) -> Vec<SubScore> {
    let mut order: Vec<usize> = (0..names.len().min(sub_scores.len())).collect();
    order.sort_by(|&a, &b| sub_scores[b].total_cmp(&sub_scores[a]));
    order
        .into_iter()
        .take(k)
        .map(|i| SubScore::new(names[i], sub_scores[i]))
        .collect()
}

/// Render contributors as `feature:score` pairs joined by `; `.
pub fn format_contributors(contributors: &[SubScore]) -> String {
    contributors
        .iter()
        .map(|c| format!("{}:{:.1}", c.feature, c.score))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Build one result per row from a per-cell sub-score function.
///
/// `sub_score(row, feature)` must be pure. Rows are scored in parallel and
/// returned in row order. The headline score is `headline(row)` when given,
/// otherwise the row's largest sub-score.
pub(crate) fn explain_rows<S, H>(
    names: &[&str],
    rows: usize,
    k: usize,
    sub_score: S,
    headline: Option<H>,
) -> Vec<AnomalyResult>
where
    S: Fn(usize, usize) -> f64 + Sync,
    H: Fn(usize) -> f64 + Sync,
{
    (0..rows)
        .into_par_iter()
        .map(|row| {
            let subs: Vec<f64> = (0..names.len()).map(|j| sub_score(row, j)).collect();
            let score = match &headline {
                Some(h) => h(row),
                None => subs.iter().copied().fold(0.0, f64::max),
            };
            AnomalyResult::new(score, rank_contributors(names, &subs, k))
        })
        .collect()
}
