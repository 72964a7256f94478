use criterion::{criterion_group, criterion_main, Criterion};
use crypto_core::{AesRng, Block};
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

fn bench_rand_block(c: &mut Criterion) {
    c.bench_function("AesRng::gen_blocks", |b| {
        let mut rng = AesRng::new();
        b.iter(|| criterion::black_box(rng.gen_blocks(1024)));
    });
}

fn bench_truncated_labels(c: &mut Criterion) {
    c.bench_function("AesRng 80-bit labels", |b| {
        let mut rng = AesRng::new();
        b.iter(|| {
            let labels: Vec<Block> = (0..1024).map(|_| rng.gen::<Block>().truncate(80)).collect();
            criterion::black_box(labels)
        });
    });
}

fn bench_shuffle_rows(c: &mut Criterion) {
    c.bench_function("AesRng shuffle 4 rows", |b| {
        let mut rng = AesRng::new();
        let mut rows = rng.gen_blocks(4);
        b.iter(|| rows.shuffle(&mut rng));
    });
}

criterion_group! {
    name = aesrng;
    config = Criterion::default().warm_up_time(Duration::from_millis(100));
    targets = bench_rand_block, bench_truncated_labels, bench_shuffle_rows
}
criterion_main!(aesrng);
