//! Integration tests for anomaly

use anomaly::{
    sample_dataset, score_dataset, Dataset, FallbackChain, JobHandle, Method, ScoredRun,
    ScoringConfig, SilentObserver, Tier,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn score(dataset: &Dataset, method: Method) -> ScoredRun {
    score_dataset(dataset, &ScoringConfig::new(method), &SilentObserver).unwrap()
}

fn random_dataset(rows: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut column = |scale: f64| -> Vec<f64> {
        (0..rows)
            .map(|_| {
                let base = rng.gen_range(0.0..scale);
                if rng.gen_bool(0.05) {
                    base * 10.0
                } else {
                    base
                }
            })
            .collect()
    };
    let a = column(1.0);
    let b = column(100.0);
    let c = column(5_000.0);
    let d = column(0.01);
    Dataset::from_columns(
        "timestamp",
        &[("a", &a), ("b", &b), ("c", &c), ("d", &d)],
    )
    .unwrap()
}

#[test]
fn test_scores_within_range_for_every_method() {
    let dataset = random_dataset(200, 7);
    for method in Method::ALL {
        let run = score(&dataset, method);
        assert_eq!(run.table.len(), 200);
        for s in run.table.scores() {
            assert!((0.0..=100.0).contains(&s), "{} produced {}", method, s);
        }
    }
}

#[test]
fn test_contributors_count_and_order() {
    let dataset = sample_dataset().unwrap();
    for method in Method::ALL {
        let run = score(&dataset, method);
        for result in run.table.results() {
            assert_eq!(result.contributors.len(), 3);
            for pair in result.contributors.windows(2) {
                assert!(pair[0].score >= pair[1].score);
            }
        }
    }

    let narrow = Dataset::from_columns("timestamp", &[("x", &[1.0, 2.0, 9.0]), ("y", &[3.0, 3.5, 2.0])])
        .unwrap();
    for method in Method::ALL {
        for result in score(&narrow, method).table.results() {
            assert_eq!(result.contributors.len(), 2);
        }
    }
}

#[test]
fn test_zero_variance_feature_never_contributes() {
    let dataset = Dataset::from_columns(
        "timestamp",
        &[
            ("cpu", &[10.0, 12.0, 11.0, 40.0, 10.5, 11.5]),
            ("flat", &[5.0; 6]),
            ("mem", &[60.0, 61.0, 59.0, 90.0, 60.5, 62.0]),
        ],
    )
    .unwrap();

    for method in Method::ALL {
        let run = score(&dataset, method);
        for result in run.table.results() {
            let flat = result
                .contributors
                .iter()
                .find(|c| c.feature == "flat")
                .expect("three features means all three are listed");
            assert_eq!(flat.score, 0.0, "{}", method);
        }
    }
}

#[test]
fn test_point_statistic_monotone_in_distance() {
    let values = [3.0, -4.0, 0.5, 12.0, 1.0, -1.5, 7.0, 0.0];
    let dataset = Dataset::from_columns("timestamp", &[("v", &values)]).unwrap();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let scores = score(&dataset, Method::Statistical).table.scores();

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| (values[i] - mean).abs().total_cmp(&(values[j] - mean).abs()));
    for pair in order.windows(2) {
        assert!(scores[pair[0]] <= scores[pair[1]]);
    }
}

#[test]
fn test_cpu_spike_statistical() {
    let dataset =
        Dataset::from_columns("timestamp", &[("cpu_usage", &[45.0, 50.0, 95.0, 48.0])]).unwrap();
    let run = score(&dataset, Method::Statistical);
    let results = run.table.results();

    let max = run.table.scores().into_iter().fold(0.0, f64::max);
    assert_eq!(results[2].score, max);
    assert_eq!(results[2].contributors.len(), 1);
    assert_eq!(results[2].top_feature(), Some("cpu_usage"));
    assert!(results.iter().enumerate().all(|(i, r)| i == 2 || r.score < max));
}

#[test]
fn test_single_row_ml_scores_zero() {
    let dataset = Dataset::from_columns("timestamp", &[("a", &[3.0]), ("b", &[8.0])]).unwrap();
    let run = score(&dataset, Method::Ml);
    assert_eq!(run.table.scores(), vec![0.0]);
}

#[test]
fn test_in_memory_runs_are_deterministic() {
    let dataset = random_dataset(120, 11);
    for method in Method::ALL {
        let first = score(&dataset, method);
        let second = score(&dataset, method);
        assert_eq!(first.table.results(), second.table.results());
        assert_eq!(first.tier, second.tier);
    }
}

#[test]
fn test_sample_spike_is_high_on_every_method() {
    let dataset = sample_dataset().unwrap();
    for method in Method::ALL {
        let run = score(&dataset, method);
        let scores = run.table.scores();
        let top = scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!((11..=13).contains(&top), "{} peaked at row {}", method, top);
    }
}

#[test]
#[cfg(all(feature = "multivariate", feature = "distribution"))]
fn test_full_stack_uses_entry_tier() {
    let dataset = sample_dataset().unwrap();
    for method in Method::ALL {
        let run = score(&dataset, method);
        assert_eq!(run.tier, method.entry_tier());
        assert!(run.degrade_log.is_empty());
    }
}

#[test]
fn test_missing_cells_are_scored() {
    let headers = vec!["timestamp".to_string(), "cpu".to_string(), "mem".to_string()];
    let records = vec![
        vec!["t0".into(), "10".into(), "20".into()],
        vec!["t1".into(), "".into(), "21".into()],
        vec!["t2".into(), "12".into(), "NaN".into()],
        vec!["t3".into(), "60".into(), "19".into()],
    ];
    let dataset = Dataset::from_records(headers, records, "timestamp").unwrap();
    assert!(dataset.has_missing());

    for method in Method::ALL {
        let run = score(&dataset, method);
        assert_eq!(run.table.len(), 4);
        let rows: Vec<Vec<String>> = run.table.rows().collect();
        assert_eq!(rows[1][1], "");
        assert_eq!(rows[2][2], "NaN");
    }
}

#[test]
fn test_chain_reports_degrades_to_observer() {
    let dataset = sample_dataset().unwrap();
    let config = ScoringConfig::builder()
        .method(Method::Ml)
        .disable(Tier::Multivariate)
        .disable(Tier::Distribution)
        .build()
        .unwrap();
    assert_eq!(
        FallbackChain::new(&config).tiers(),
        vec![Tier::Multivariate, Tier::Distribution, Tier::PointStatistic]
    );

    let job = JobHandle::new();
    let run = score_dataset(&dataset, &config, &job).unwrap();
    assert_eq!(run.tier, Tier::PointStatistic);
    assert_eq!(run.degrade_log.len(), 2);
    assert!(run.summary(&config).degraded());

    let output = job.snapshot().output;
    assert!(output.contains("multivariate detector degraded to distribution"));
    assert!(output.contains("distribution detector degraded to point-statistic"));
}

#[test]
#[cfg(not(feature = "multivariate"))]
fn test_ml_without_multivariate_build_degrades() {
    let run = score(&sample_dataset().unwrap(), Method::Ml);
    let first = &run.degrade_log[0];
    assert_eq!(first.from, Tier::Multivariate);
    assert_eq!(first.scope, anomaly::DegradeScope::Detector);
    assert_eq!(first.cause, anomaly::ErrorKind::DependencyUnavailable);
    assert!(first.reason.contains("multivariate"));
    assert_ne!(run.tier, Tier::Multivariate);
}

#[test]
#[cfg(not(feature = "distribution"))]
fn test_adtk_style_without_distribution_build_degrades() {
    let run = score(&sample_dataset().unwrap(), Method::AdtkStyle);
    assert_eq!(run.tier, Tier::PointStatistic);
    assert_eq!(run.degrade_log.len(), 1);
    assert_eq!(run.degrade_log[0].from, Tier::Distribution);
    assert_eq!(run.degrade_log[0].cause, anomaly::ErrorKind::DependencyUnavailable);
}

#[test]
#[cfg(not(any(feature = "multivariate", feature = "distribution")))]
fn test_ml_without_optional_tiers_reaches_point_statistic() {
    let run = score(&sample_dataset().unwrap(), Method::Ml);
    assert_eq!(run.tier, Tier::PointStatistic);
    let hops: Vec<(Tier, Tier)> = run.degrade_log.iter().map(|e| (e.from, e.to)).collect();
    assert_eq!(
        hops,
        vec![
            (Tier::Multivariate, Tier::Distribution),
            (Tier::Distribution, Tier::PointStatistic)
        ]
    );
    assert!(run
        .degrade_log
        .iter()
        .all(|e| e.cause == anomaly::ErrorKind::DependencyUnavailable));
}
