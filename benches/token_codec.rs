//! Token 编解码性能基准测试

use criterion::{Criterion, criterion_group, criterion_main};
use surveylinker::token::TokenCodec;
use uuid::Uuid;

fn bench_mint(c: &mut Criterion) {
    let codec = TokenCodec::new(b"bench-signing-secret-0123456789");
    let id = Uuid::new_v4();

    c.bench_function("token/mint", |b| {
        b.iter(|| {
            let _ = codec.mint(std::hint::black_box(&id));
        });
    });
}

fn bench_verify(c: &mut Criterion) {
    let codec = TokenCodec::new(b"bench-signing-secret-0123456789");
    let token = codec.mint(&Uuid::new_v4()).expect("mint should succeed");
    let mut tampered = token.clone();
    tampered.replace_range(20..21, if &token[20..21] == "A" { "B" } else { "A" });

    let mut group = c.benchmark_group("token/verify");

    group.bench_function("valid", |b| {
        b.iter(|| {
            assert!(codec.verify(std::hint::black_box(&token)).is_ok());
        });
    });

    group.bench_function("tampered", |b| {
        b.iter(|| {
            assert!(codec.verify(std::hint::black_box(&tampered)).is_err());
        });
    });

    group.bench_function("malformed", |b| {
        b.iter(|| {
            assert!(codec.verify(std::hint::black_box("not-a-token")).is_err());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_mint, bench_verify);
criterion_main!(benches);
