//! Benchmarks for the sensitive-topic scan.
//!
//! The filter runs on every submit before anything else, so a long opinion
//! pasted into the prompt should still be screened well under a millisecond.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use disputare_core::safety::SensitiveTopicFilter;

/// A ~100 word opinion with no sensitive keyword.
fn generate_clean_opinion(index: usize) -> String {
    format!(
        "I honestly believe that remote work is better for everyone involved. \
         Commuting wastes hours every week, offices are loud, and most of the \
         meetings I attend could have been a short written update. People who \
         say collaboration suffers are usually managers who like to see bodies \
         at desks. My team ships more now than before and nobody misses the \
         open plan floor. The only real downside is that onboarding new hires \
         takes more deliberate effort, but that is a process problem rather \
         than a location problem. Companies forcing a return are mostly \
         protecting their real estate investments. Opinion number {}.",
        index
    )
}

/// Same shape, with a keyword near the end so the scan walks most of it.
fn generate_flagged_opinion(index: usize) -> String {
    format!(
        "{} Honestly the isolation sometimes feeds my Anxiety.",
        generate_clean_opinion(index)
    )
}

fn bench_topic_scan(c: &mut Criterion) {
    let filter = SensitiveTopicFilter::new();

    let clean: Vec<String> = (0..1000).map(generate_clean_opinion).collect();
    let flagged: Vec<String> = (0..1000).map(generate_flagged_opinion).collect();

    let mut group = c.benchmark_group("topic_filter");
    group.sample_size(200);
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("clean_opinion", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let text = &clean[idx % clean.len()];
            idx += 1;
            filter.matches(text)
        });
    });

    group.bench_function("flagged_opinion", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let text = &flagged[idx % flagged.len()];
            idx += 1;
            filter.matches(text)
        });
    });

    group.finish();
}

/// p95 of 1000 scans must stay under 1ms.
fn bench_topic_scan_latency_assertion(c: &mut Criterion) {
    let filter = SensitiveTopicFilter::new();
    let opinions: Vec<String> = (0..1000).map(generate_flagged_opinion).collect();
    let target = Duration::from_micros(1000);

    let mut group = c.benchmark_group("topic_filter_latency");
    group.sample_size(100);
    group.bench_function("flagged_per_opinion", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let text = &opinions[idx % opinions.len()];
            idx += 1;
            filter.matched_topic(text)
        });
    });
    group.finish();

    let mut times = Vec::with_capacity(opinions.len());
    for text in &opinions {
        let start = std::time::Instant::now();
        let _topic = filter.matched_topic(text);
        times.push(start.elapsed());
    }
    times.sort();
    let p95 = times[949];

    eprintln!("\n=== Topic filter latency (1000 flagged opinions) ===");
    eprintln!("Median:  {:?}", times[499]);
    eprintln!("p95:     {:?} (target: {:?})", p95, target);

    assert!(
        p95 < target,
        "topic scan p95 {:?} exceeds target {:?}",
        p95,
        target
    );
}

criterion_group!(benches, bench_topic_scan, bench_topic_scan_latency_assertion);
criterion_main!(benches);
