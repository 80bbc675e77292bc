use envs::{create, Batch, Env, EnvError, Fast};

#[test]
fn fast_env_matches_analytic_trajectory() {
    let episode_length = 10;
    let env = Fast::new(episode_length);
    let dt = Fast::DT;
    let mut state = env.reset(fastrand::Rng::with_seed(0));

    for n in 1..=episode_length {
        state = env.step(&state, &[1.0]).unwrap();
        let expected_vel = n as f32 * dt;
        let expected_pos: f32 = (1..=n).map(|i| i as f32 * dt * dt).sum();
        assert!((state.qp[0].vel.x - expected_vel).abs() < 1e-6, "step {n}");
        assert!((state.qp[0].pos.x - expected_pos).abs() < 1e-6, "step {n}");
        assert_eq!(state.obs, vec![state.qp[0].pos.x, state.qp[0].vel.x]);
        assert!((state.reward - state.qp[0].pos.x).abs() < 1e-6);
    }
}

#[test]
fn done_flips_exactly_at_episode_length() {
    let episode_length = 5;
    let env = Fast::new(episode_length);
    let mut state = env.reset(fastrand::Rng::with_seed(7));
    assert_eq!(state.done, 0.0);

    let mut flips = 0;
    for n in 1..=episode_length {
        state = env.step(&state, &[1.0]).unwrap();
        assert_eq!(state.steps, n);
        if state.done == 1.0 {
            flips += 1;
            assert_eq!(n, episode_length, "done must flip only at the episode end");
        } else {
            assert_eq!(state.done, 0.0);
        }
    }
    assert_eq!(flips, 1);
}

#[test]
fn stepping_a_terminal_state_is_rejected() {
    let env = Fast::new(1);
    let state = env.reset(fastrand::Rng::with_seed(0));
    let terminal = env.step(&state, &[1.0]).unwrap();
    assert!(terminal.is_done());
    assert_eq!(env.step(&terminal, &[1.0]).unwrap_err(), EnvError::Terminal);
}

#[test]
fn wrong_action_shape_is_rejected_not_truncated() {
    let env = Fast::new(10);
    let state = env.reset(fastrand::Rng::with_seed(0));
    assert_eq!(
        env.step(&state, &[1.0, 2.0]).unwrap_err(),
        EnvError::ActionShape { expected: 1, got: 2 }
    );
    assert_eq!(
        env.step(&state, &[]).unwrap_err(),
        EnvError::ActionShape { expected: 1, got: 0 }
    );
}

#[test]
fn step_is_bit_reproducible() {
    let env = Fast::new(100);
    let state = env.reset(fastrand::Rng::with_seed(3));
    let once = env.step(&state, &[0.5]).unwrap();
    let again = env.step(&state, &[0.5]).unwrap();
    assert_eq!(once, again);
}

#[test]
fn batch_steps_in_lockstep_and_auto_resets() {
    let episode_length = 3;
    let env = Fast::new(episode_length);
    let batch = Batch::new(&env);
    let mut states = batch.reset_all(0, 4);
    assert_eq!(states.len(), 4);

    let actions = vec![vec![1.0]; 4];
    for _ in 0..episode_length {
        states = batch.step_all(&states, &actions).unwrap();
    }
    assert!(states.iter().all(envs::State::is_done));

    // One more lockstep call restarts every terminal entry.
    states = batch.step_all(&states, &actions).unwrap();
    assert!(states.iter().all(|s| s.steps == 0 && s.done == 0.0));
}

#[test]
fn batch_reset_derives_identical_rng_streams_per_seed() {
    let env = Fast::new(4);
    let batch = Batch::new(&env);
    let a = batch.reset_all(9, 3);
    let b = batch.reset_all(9, 3);
    for (left, right) in a.iter().zip(&b) {
        assert_eq!(left, right);
        assert_eq!(left.rng.u64(..), right.rng.u64(..));
    }
}

#[test]
fn registry_rejects_unknown_names() {
    assert!(create("fast", 10).is_ok());
    assert!(create("sphere_roll", 10).is_ok());
    assert_eq!(
        create("walker_9000", 10).unwrap_err(),
        EnvError::UnknownEnv("walker_9000".into())
    );
}

#[test]
fn sphere_roll_rewards_forward_progress() {
    let env = envs::SphereRoll::new(50);
    let mut state = env.reset(fastrand::Rng::with_seed(0));
    let mut total = 0.0;
    for _ in 0..50 {
        state = env.step(&state, &[10.0]).unwrap();
        total += state.reward;
    }
    assert!(total > 0.0);
    assert!((total - state.qp[0].pos.x).abs() < 1e-4);
    assert_eq!(state.metrics.get("distance"), Some(&state.qp[0].pos.x));
}
