//! Off-policy actor-critic over a replay buffer.
//!
//! Transitions stream into a ring buffer while the actor explores with
//! Gaussian noise; once `min_replay_size` is reached, every environment
//! step funds `grad_updates_per_step` critic/actor updates against a
//! Polyak-averaged target critic.

use crate::algorithm::{Algorithm, Progress, Trained};
use crate::config::{require, require_positive, TrainConfig};
use crate::error::TrainError;
use crate::nn::{normal, Mlp, Normalizer};
use crate::optim::Adam;
use crate::policy::{Params, Policy};
use crate::replay::{Replay, Transition};
use envs::{Batch, Env};
use std::collections::BTreeMap;

const HIDDEN: usize = 32;
const CRITIC_HIDDEN: usize = 64;
const EXPLORATION_STD: f32 = 0.2;
const POLYAK_TAU: f32 = 0.005;

#[derive(Debug)]
pub struct SacArgs {
    pub seed: u64,
    pub num_envs: usize,
    pub total_env_steps: u64,
    pub action_repeat: usize,
    pub normalize_observations: bool,
    pub learning_rate: f32,
    pub discounting: f32,
    pub reward_scaling: f32,
    pub batch_size: usize,
    pub min_replay_size: usize,
    pub max_replay_size: usize,
    pub grad_updates_per_step: f32,
}

pub fn setup(config: &TrainConfig) -> Result<SacArgs, TrainError> {
    let alg = Algorithm::ActorCritic;
    Ok(SacArgs {
        seed: config.seed,
        num_envs: config.num_envs.max(1),
        total_env_steps: config.total_env_steps,
        action_repeat: config.action_repeat.max(1),
        normalize_observations: config.normalize_observations,
        learning_rate: config.learning_rate,
        discounting: config.discounting,
        reward_scaling: config.reward_scaling,
        batch_size: require(config.batch_size, alg, "batch_size")?,
        min_replay_size: require(config.min_replay_size, alg, "min_replay_size")?,
        // Zero capacity would panic in the replay ring; fail in setup.
        max_replay_size: require_positive(config.max_replay_size, alg, "max_replay_size")?,
        grad_updates_per_step: require(config.grad_updates_per_step, alg, "grad_updates_per_step")?,
    })
}

pub fn learn(
    args: &SacArgs,
    env: &dyn Env,
    progress: &mut Progress<'_>,
) -> Result<Trained, TrainError> {
    let obs_size = env.observation_size();
    let act_size = env.action_size();
    let mut rng = fastrand::Rng::with_seed(args.seed);

    let actor = Mlp::new(vec![obs_size, HIDDEN, act_size]);
    let critic = Mlp::new(vec![obs_size + act_size, CRITIC_HIDDEN, 1]);
    let mut actor_params = actor.init(&mut rng);
    let mut critic_params = critic.init(&mut rng);
    let mut target_params = critic_params.clone();
    let mut actor_opt = Adam::new(args.learning_rate, actor_params.len());
    let mut critic_opt = Adam::new(args.learning_rate, critic_params.len());
    let mut normalizer = args.normalize_observations.then(|| Normalizer::new(obs_size));

    let mut replay = Replay::new(args.max_replay_size);
    let batch = Batch::new(env);
    let mut states = batch.reset_all(args.seed, args.num_envs);

    let mut env_steps: u64 = 0;
    let mut update_debt = 0.0_f32;
    // Running return per batch slot, reported when its episode finishes.
    let mut returns = vec![0.0_f32; args.num_envs];
    let mut last_episode_reward = 0.0_f32;
    let mut metrics = BTreeMap::new();
    let mut critic_loss = 0.0;

    while env_steps < args.total_env_steps {
        // --- act and record ---
        let mut actions = Vec::with_capacity(args.num_envs);
        let mut obs_before = Vec::with_capacity(args.num_envs);
        for state in &states {
            if let Some(norm) = normalizer.as_mut() {
                norm.update(&state.obs);
            }
            let obs = apply_norm(&normalizer, &state.obs);
            let mut action = actor.forward(&actor_params, &obs);
            for a in &mut action {
                *a += EXPLORATION_STD * normal(&mut rng);
            }
            obs_before.push(obs);
            actions.push(action);
        }
        let next = batch.step_all_repeat(&states, &actions, args.action_repeat)?;
        env_steps += (args.num_envs * args.action_repeat) as u64;

        for (i, next_state) in next.iter().enumerate() {
            // A restarted entry has no transition to record.
            if next_state.steps == 0 {
                continue;
            }
            returns[i] += next_state.reward;
            if next_state.is_done() {
                last_episode_reward = returns[i];
                returns[i] = 0.0;
            }
            replay.push(Transition {
                obs: obs_before[i].clone(),
                action: actions[i].clone(),
                reward: next_state.reward * args.reward_scaling,
                next_obs: apply_norm(&normalizer, &next_state.obs),
                done: next_state.done,
            });
        }
        states = next;

        // --- learn ---
        if replay.len() >= args.min_replay_size {
            update_debt += args.grad_updates_per_step * args.num_envs as f32;
            while update_debt >= 1.0 {
                update_debt -= 1.0;
                critic_loss = update_once(
                    args,
                    &actor,
                    &critic,
                    &mut actor_params,
                    &mut critic_params,
                    &mut target_params,
                    &mut actor_opt,
                    &mut critic_opt,
                    &replay,
                    &mut rng,
                    obs_size,
                );
            }
            metrics.insert("losses/critic_loss".to_owned(), critic_loss);
            metrics.insert("eval/episode_reward".to_owned(), last_episode_reward);
            progress(env_steps, &metrics);
        }
    }

    let policy = Policy::new(obs_size, HIDDEN, act_size);
    let params = Params {
        sizes: policy.net().sizes.clone(),
        values: actor_params,
        normalizer,
    };
    Ok(Trained { policy, params, metrics })
}

fn apply_norm(normalizer: &Option<Normalizer>, obs: &[f32]) -> Vec<f32> {
    match normalizer {
        Some(norm) => norm.apply(obs),
        None => obs.to_vec(),
    }
}

#[allow(clippy::too_many_arguments)]
fn update_once(
    args: &SacArgs,
    actor: &Mlp,
    critic: &Mlp,
    actor_params: &mut [f32],
    critic_params: &mut [f32],
    target_params: &mut [f32],
    actor_opt: &mut Adam,
    critic_opt: &mut Adam,
    replay: &Replay,
    rng: &mut fastrand::Rng,
    obs_size: usize,
) -> f32 {
    let samples = replay.sample(rng, args.batch_size);
    let n = samples.len() as f32;
    let mut critic_grads = vec![0.0; critic_params.len()];
    let mut actor_grads = vec![0.0; actor_params.len()];
    let mut critic_loss = 0.0;

    for t in &samples {
        // TD(0) target through the frozen critic.
        let next_action = actor.forward(actor_params, &t.next_obs);
        let mut target_in = t.next_obs.clone();
        target_in.extend_from_slice(&next_action);
        let target_q = critic.forward(target_params, &target_in)[0];
        let y = t.reward + args.discounting * (1.0 - t.done) * target_q;

        let mut critic_in = t.obs.clone();
        critic_in.extend_from_slice(&t.action);
        let (q, critic_cache) = critic.forward_cached(critic_params, &critic_in);
        let err = q[0] - y;
        critic_loss += err * err / n;
        critic.backward(critic_params, &critic_cache, &[2.0 * err / n], &mut critic_grads);

        // Actor ascends Q(s, actor(s)): pull dQ/da out of the critic input
        // gradient and push it back through the actor.
        let (pi_action, actor_cache) = actor.forward_cached(actor_params, &t.obs);
        let mut actor_in = t.obs.clone();
        actor_in.extend_from_slice(&pi_action);
        let (_, q_cache) = critic.forward_cached(critic_params, &actor_in);
        let mut scratch = vec![0.0; critic_params.len()];
        let dq_din = critic.backward(critic_params, &q_cache, &[1.0], &mut scratch);
        let dq_da: Vec<f32> = dq_din[obs_size..].iter().map(|g| -g / n).collect();
        actor.backward(actor_params, &actor_cache, &dq_da, &mut actor_grads);
    }

    critic_opt.step(critic_params, &critic_grads);
    actor_opt.step(actor_params, &actor_grads);
    for (t, c) in target_params.iter_mut().zip(critic_params.iter()) {
        *t = (1.0 - POLYAK_TAU) * *t + POLYAK_TAU * c;
    }
    critic_loss
}
