//! Basic example demonstrating tiered anomaly scoring
//!
//! Run with: cargo run --example basic -p anomaly

use anomaly::{sample_dataset, score_dataset, JobHandle, Method, ScoringConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== anomaly Basic Examples ===\n");

    let dataset = sample_dataset()?;
    println!(
        "Sample data: {} rows, features {:?}\n",
        dataset.row_count(),
        dataset.feature_names()
    );

    for (i, method) in Method::ALL.into_iter().enumerate() {
        println!("{}. Method {} (entry tier {})", i + 1, method, method.entry_tier());

        let config = ScoringConfig::new(method);
        let job = JobHandle::new();
        let scored = score_dataset(&dataset, &config, &job)?;
        let summary = scored.summary(&config);

        println!("   Scored by: {}", summary.tier);
        println!(
            "   Buckets: high={} medium={} low={} max={:.1}",
            summary.buckets.high, summary.buckets.medium, summary.buckets.low, summary.buckets.max_score
        );

        let top = scored
            .table
            .results()
            .iter()
            .zip(dataset.timestamps())
            .max_by(|a, b| a.0.score.total_cmp(&b.0.score));
        if let Some((result, ts)) = top {
            println!(
                "   Highest row: {} score={:.1} top feature={}\n",
                ts,
                result.score,
                result.top_feature().unwrap_or("-")
            );
        }
    }

    println!("=== Examples Complete ===");
    Ok(())
}
