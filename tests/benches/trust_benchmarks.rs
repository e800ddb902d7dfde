//! # Artisan-Market Trust Benchmarks
//!
//! Hot paths on every gated request and every verification:
//!
//! | Path | Called from | Target |
//! |------|-------------|--------|
//! | Identifier validation | Every engine and gate call | < 1µs |
//! | Token generation | `issue` | < 10µs |
//! | In-memory issue + redeem | Verification flow | < 50µs |
//! | Gate lookup | Every gated request | < 50µs |

use am_01_trust_engine::{
    domain::{generate_token_value, DEFAULT_TOKEN_BYTES},
    is_valid_identifier, AccountId, InMemoryOrderLedger, InMemoryTokenStore, InMemoryTrustStore,
    SystemClock, TrustConfig, TrustLevel, TrustLevelApi, TrustLevelEngine, VerificationTokenApi,
    VerificationTokenService,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

const ID: &str = "123e4567-e89b-12d3-a456-426614174000";

fn bench_identifier_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("am-01-identifier");

    let inputs = [
        ("valid", ID.to_string()),
        ("injection", "' OR '1'='1".to_string()),
        ("oversized", "a".repeat(4096)),
    ];
    for (name, input) in &inputs {
        group.bench_with_input(BenchmarkId::new("is_valid_identifier", name), input, |b, s| {
            b.iter(|| black_box(is_valid_identifier(black_box(s))))
        });
    }
    group.finish();
}

fn bench_token_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("am-01-tokens");
    group.throughput(Throughput::Elements(1));
    group.bench_function("generate_token_value", |b| {
        b.iter(|| black_box(generate_token_value(DEFAULT_TOKEN_BYTES)))
    });
    group.finish();
}

fn bench_issue_and_redeem(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let service = VerificationTokenService::new(
        Arc::new(InMemoryTokenStore::new()),
        Arc::new(SystemClock),
        TrustConfig::default(),
    );

    c.bench_function("am-01-tokens/issue_then_redeem", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let token = service.issue(ID).await.unwrap();
                black_box(service.redeem(token.value.expose()).await.unwrap())
            })
        })
    });
}

fn bench_gate_lookup(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let store = Arc::new(InMemoryTrustStore::new());
    store.insert_account(&AccountId::parse(ID).unwrap(), Some(TrustLevel::Established), true);
    let engine = TrustLevelEngine::new(
        store,
        Arc::new(InMemoryOrderLedger::new()),
        TrustConfig::default(),
    );

    c.bench_function("am-01-engine/lookup", |b| {
        b.iter(|| runtime.block_on(async { black_box(engine.lookup(ID).await.unwrap()) }))
    });
}

criterion_group!(
    benches,
    bench_identifier_validation,
    bench_token_generation,
    bench_issue_and_redeem,
    bench_gate_lookup
);
criterion_main!(benches);
