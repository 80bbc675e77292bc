use criterion::{criterion_group, criterion_main, Criterion};
use envs::Fast;
use training::{learn, Algorithm, TrainConfig};

fn bench_ppo_iteration(c: &mut Criterion) {
    let config = TrainConfig {
        num_envs: 8,
        total_env_steps: 512,
        episode_length: 32,
        batch_size: Some(64),
        unroll_length: Some(32),
        num_minibatches: Some(2),
        num_update_epochs: Some(2),
        entropy_cost: Some(1e-3),
        ..TrainConfig::default()
    };
    c.bench_function("ppo_tiny_budget", |b| {
        b.iter(|| {
            let env = Fast::new(config.episode_length);
            let args = Algorithm::PolicyGradient.setup(&config).unwrap();
            learn(args, &env, &mut |_, _| {}).unwrap()
        });
    });
}

criterion_group!(benches, bench_ppo_iteration);
criterion_main!(benches);
