//! NPS 汇总计算性能基准测试

use chrono::{Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use surveylinker::services::NpsSummary;
use surveylinker::storage::SurveyResponse;
use uuid::Uuid;

fn make_responses(count: usize, days: i64) -> Vec<SurveyResponse> {
    let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| SurveyResponse {
            link_id: Uuid::new_v4(),
            score: (i % 11) as u8,
            comments: None,
            submitted_at: base + Duration::minutes((i as i64 * 97) % (days * 24 * 60)),
        })
        .collect()
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("nps/from_responses");

    for size in [100, 10_000, 100_000] {
        let responses = make_responses(size, 90);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &responses, |b, responses| {
            b.iter(|| NpsSummary::from_responses(std::hint::black_box(responses)));
        });
    }

    group.finish();
}

fn bench_trend_iteration(c: &mut Criterion) {
    let summary = NpsSummary::from_responses(&make_responses(50_000, 365));

    c.bench_function("nps/trend_iter", |b| {
        b.iter(|| summary.trend.iter().map(|p| p.nps_score).sum::<f64>());
    });
}

criterion_group!(benches, bench_summarize, bench_trend_iteration);
criterion_main!(benches);
