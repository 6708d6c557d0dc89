//! Feature statistics computed once per run.

use anomaly_spi::{AnomalyError, Dataset, Feature, FeatureStatistics, FeatureStats, Result};

/// Compute mean, standard deviation and quartiles for every feature.
///
/// Missing values are skipped. A feature with no observed values gets all
/// descriptors set to zero.
pub fn compute_statistics(dataset: &Dataset) -> Result<FeatureStatistics> {
    if dataset.feature_count() == 0 {
        return Err(AnomalyError::NoFeatureColumns {
            timestamp_column: dataset.timestamp_column().to_string(),
        });
    }

    Ok(FeatureStatistics::new(
        dataset
            .features()
            .iter()
            .map(|f| (f.name().to_string(), feature_stats(f)))
            .collect(),
    ))
}

fn feature_stats(feature: &Feature) -> FeatureStats {
    let mut values: Vec<f64> = feature.observed().collect();
    if values.is_empty() {
        return FeatureStats::default();
    }

    let (mean, std_dev) = mean_std(&values);
    values.sort_by(|a, b| a.total_cmp(b));

    FeatureStats {
        mean,
        std_dev,
        q1: quantile_sorted(&values, 0.25),
        q3: quantile_sorted(&values, 0.75),
        observed: values.len(),
    }
}

/// Population mean and standard deviation. Returns `(0, 0)` for an empty slice.
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Quantile of sorted data with linear interpolation between order statistics.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
            let lo = h.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
        }
    }
}
