use criterion::{criterion_group, criterion_main, Criterion};
use crypto_core::prime::{generate_prime, MILLER_RABIN_ROUNDS};
use crypto_core::{AesRng, RsaParams};
use std::time::Duration;

fn bench_generate_prime(c: &mut Criterion) {
    c.bench_function("generate_prime 512", |b| {
        let mut rng = AesRng::new();
        b.iter(|| criterion::black_box(generate_prime(&mut rng, 512, MILLER_RABIN_ROUNDS).unwrap()));
    });
}

fn bench_rsa_params(c: &mut Criterion) {
    c.bench_function("RsaParams::generate 1024", |b| {
        let mut rng = AesRng::new();
        b.iter(|| criterion::black_box(RsaParams::generate(&mut rng, 1024).unwrap()));
    });
}

criterion_group! {
    name = rsa;
    config = Criterion::default().warm_up_time(Duration::from_millis(100)).sample_size(10);
    targets = bench_generate_prime, bench_rsa_params
}
criterion_main!(rsa);
