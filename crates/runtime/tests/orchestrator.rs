use runtime::{run, setup};
use std::fs;
use training::{TrainConfig, TrainError};

fn tiny_es_config() -> TrainConfig {
    TrainConfig {
        env: "fast".into(),
        num_envs: 2,
        total_env_steps: 64,
        episode_length: 8,
        eval_frequency: 1,
        population_size: Some(2),
        perturbation_std: Some(0.1),
        l2coeff: Some(0.0),
        center_fitness: Some(false),
        ..TrainConfig::default()
    }
}

#[test]
fn unknown_learner_fails_before_any_env_exists() {
    let config = TrainConfig { env: "no_such_env".into(), ..TrainConfig::default() };
    // A bad learner name fails in setup even though the env name is also
    // bogus: validation never reaches environment construction.
    let err = setup("dreamer", &config).unwrap_err();
    assert!(matches!(err, TrainError::UnknownAlgorithm(name) if name == "dreamer"));
}

#[test]
fn missing_hyperparams_fail_in_setup() {
    let config = TrainConfig { env: "fast".into(), ..TrainConfig::default() };
    let err = setup("es", &config).unwrap_err();
    assert!(matches!(err, TrainError::MissingHyperparam { field: "population_size", .. }));
}

#[test]
fn full_run_writes_checkpoint_and_trajectory() {
    let config = tiny_es_config();
    let logdir = std::env::temp_dir().join("learner_run_es_fast");
    fs::remove_dir_all(&logdir).ok();

    let setup = setup("es", &config).unwrap();
    let report = run(setup, &config, &logdir, true).unwrap();

    assert_eq!(report.checkpoint, logdir.join("fast_es.json"));
    assert!(report.checkpoint.is_file());
    let trajectory = report.trajectory.expect("html export was requested");
    assert!(trajectory.is_file());
    let name = trajectory.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("trajectory_") && name.ends_with(".html"));

    // The evaluation episode ran to its configured horizon.
    assert_eq!(report.eval_steps, config.episode_length);
    assert!(report.eval_reward.is_finite());

    // The checkpoint is a loadable parameter bundle.
    let params = training::model::load(&report.checkpoint).unwrap();
    assert_eq!(params.sizes.first(), Some(&2));
    assert_eq!(params.sizes.last(), Some(&1));

    // The export embeds one frame per collected state, reset included.
    let page = fs::read_to_string(&trajectory).unwrap();
    assert!(page.contains("\"dt\":"));

    fs::remove_dir_all(&logdir).ok();
}

#[test]
fn checkpoint_is_reloadable_into_a_policy() {
    let config = tiny_es_config();
    let logdir = std::env::temp_dir().join("learner_reload_es_fast");
    fs::remove_dir_all(&logdir).ok();

    let setup = setup("es", &config).unwrap();
    let report = run(setup, &config, &logdir, false).unwrap();
    assert!(report.trajectory.is_none());

    let params = training::model::load(&report.checkpoint).unwrap();
    let policy = training::Policy::new(2, params.sizes[1], 1);
    let compiled = policy.compile(&params).unwrap();
    assert_eq!(compiled.act(&[0.0, 0.0]).len(), 1);

    fs::remove_dir_all(&logdir).ok();
}
