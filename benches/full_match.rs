use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use war_of_attrition::controller::{AutoPlayer, GreedyStrategy};
use war_of_attrition::core::{MatchConfig, MatchState};

fn full_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_match");

    group.bench_function("random_strategy", |b| {
        let mut autoplay = AutoPlayer::new(MatchConfig::default());
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            black_box(autoplay.play_match(&MatchConfig::default().with_seed(seed)).ok())
        })
    });

    group.bench_function("greedy_strategy", |b| {
        let mut autoplay = AutoPlayer::with_strategy(MatchConfig::default(), GreedyStrategy);
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            black_box(autoplay.play_match(&MatchConfig::default().with_seed(seed)).ok())
        })
    });

    for count in [10usize, 100] {
        group.bench_function(BenchmarkId::new("series", count), |b| {
            b.iter(|| {
                let mut autoplay = AutoPlayer::new(MatchConfig::default());
                black_box(autoplay.play_series(count).ok())
            })
        });
    }

    group.finish();
}

fn checkpoint(c: &mut Criterion) {
    let state = MatchState::new(&MatchConfig::default());
    let bytes = state.save().unwrap_or_default();

    c.bench_function("checkpoint_save", |b| b.iter(|| black_box(state.save().ok())));
    c.bench_function("checkpoint_restore", |b| {
        b.iter(|| black_box(MatchState::restore(&bytes).ok()))
    });
}

criterion_group!(benches, full_match, checkpoint);
criterion_main!(benches);
