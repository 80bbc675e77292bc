//! Clipped-objective policy gradient over lockstep environment batches.
//!
//! Collection runs `unroll_length` steps across `num_envs` instances, then
//! the clipped surrogate with GAE(lambda) advantages is optimized for
//! `num_update_epochs` passes over `num_minibatches` shuffled minibatches.

use crate::algorithm::{Algorithm, Progress, Trained};
use crate::config::{require, TrainConfig};
use crate::error::TrainError;
use crate::nn::{normal, Mlp, Normalizer};
use crate::optim::Adam;
use crate::policy::{Params, Policy};
use envs::{Batch, Env};
use std::collections::BTreeMap;

const HIDDEN: usize = 32;
const CLIP_EPSILON: f32 = 0.2;
const GAE_LAMBDA: f32 = 0.95;
const LOG_STD_INIT: f32 = -0.5;

#[derive(Debug)]
pub struct PpoArgs {
    pub seed: u64,
    pub num_envs: usize,
    pub total_env_steps: u64,
    pub action_repeat: usize,
    pub normalize_observations: bool,
    pub learning_rate: f32,
    pub discounting: f32,
    pub reward_scaling: f32,
    pub entropy_cost: f32,
    pub unroll_length: usize,
    pub batch_size: usize,
    pub num_minibatches: usize,
    pub num_update_epochs: usize,
}

pub fn setup(config: &TrainConfig) -> Result<PpoArgs, TrainError> {
    let alg = Algorithm::PolicyGradient;
    Ok(PpoArgs {
        seed: config.seed,
        num_envs: config.num_envs.max(1),
        total_env_steps: config.total_env_steps,
        action_repeat: config.action_repeat.max(1),
        normalize_observations: config.normalize_observations,
        learning_rate: config.learning_rate,
        discounting: config.discounting,
        reward_scaling: config.reward_scaling,
        entropy_cost: require(config.entropy_cost, alg, "entropy_cost")?,
        // Zero envs or a zero-length unroll would add no steps per
        // iteration and spin the budget loop forever.
        unroll_length: require(config.unroll_length, alg, "unroll_length")?.max(1),
        batch_size: require(config.batch_size, alg, "batch_size")?,
        num_minibatches: require(config.num_minibatches, alg, "num_minibatches")?,
        num_update_epochs: require(config.num_update_epochs, alg, "num_update_epochs")?,
    })
}

struct Sample {
    obs: Vec<f32>,
    action: Vec<f32>,
    log_prob: f32,
    advantage: f32,
    ret: f32,
}

pub fn learn(
    args: &PpoArgs,
    env: &dyn Env,
    progress: &mut Progress<'_>,
) -> Result<Trained, TrainError> {
    let obs_size = env.observation_size();
    let act_size = env.action_size();
    let mut rng = fastrand::Rng::with_seed(args.seed);

    let pi = Mlp::new(vec![obs_size, HIDDEN, act_size]);
    let vf = Mlp::new(vec![obs_size, HIDDEN, 1]);
    // Policy params carry a learnable per-dimension log-std tail.
    let mut pi_params = pi.init(&mut rng);
    pi_params.extend(std::iter::repeat(LOG_STD_INIT).take(act_size));
    let mut vf_params = vf.init(&mut rng);
    let mut pi_opt = Adam::new(args.learning_rate, pi_params.len());
    let mut vf_opt = Adam::new(args.learning_rate, vf_params.len());
    let mut normalizer = args.normalize_observations.then(|| Normalizer::new(obs_size));

    let batch = Batch::new(env);
    let mut states = batch.reset_all(args.seed, args.num_envs);
    let mut env_steps: u64 = 0;
    let mut metrics = BTreeMap::new();

    while env_steps < args.total_env_steps {
        // --- collection ---
        let mut all_obs = Vec::with_capacity(args.unroll_length);
        let mut all_actions = Vec::with_capacity(args.unroll_length);
        let mut all_log_probs = Vec::with_capacity(args.unroll_length);
        let mut all_rewards = Vec::with_capacity(args.unroll_length);
        let mut all_dones = Vec::with_capacity(args.unroll_length);
        let mut all_values = Vec::with_capacity(args.unroll_length);
        let mut episode_reward = 0.0;

        for _ in 0..args.unroll_length {
            let mut step_obs = Vec::with_capacity(args.num_envs);
            let mut step_actions = Vec::with_capacity(args.num_envs);
            let mut step_log_probs = Vec::with_capacity(args.num_envs);
            let mut step_values = Vec::with_capacity(args.num_envs);
            for state in &states {
                if let Some(norm) = normalizer.as_mut() {
                    norm.update(&state.obs);
                }
                let obs = normalized(&normalizer, &state.obs);
                let mu = pi.forward(mlp_slice(&pi_params, &pi), &obs);
                let (action, log_prob) = sample_action(&mu, log_std(&pi_params, act_size), &mut rng);
                step_values.push(vf.forward(&vf_params, &obs)[0]);
                step_obs.push(obs);
                step_actions.push(action);
                step_log_probs.push(log_prob);
            }

            let next = batch.step_all_repeat(&states, &step_actions, args.action_repeat)?;
            env_steps += (args.num_envs * args.action_repeat) as u64;

            let rewards: Vec<f32> =
                next.iter().map(|s| s.reward * args.reward_scaling).collect();
            let dones: Vec<f32> = next.iter().map(|s| s.done).collect();
            episode_reward += next.iter().map(|s| s.reward).sum::<f32>();

            all_obs.push(step_obs);
            all_actions.push(step_actions);
            all_log_probs.push(step_log_probs);
            all_values.push(step_values);
            all_rewards.push(rewards);
            all_dones.push(dones);
            states = next;
        }

        // --- GAE(lambda) ---
        let last_values: Vec<f32> = states
            .iter()
            .map(|s| vf.forward(&vf_params, &normalized(&normalizer, &s.obs))[0])
            .collect();
        let t_max = args.unroll_length;
        let mut advantages = vec![vec![0.0; args.num_envs]; t_max];
        let mut returns = vec![vec![0.0; args.num_envs]; t_max];
        let mut carry = vec![0.0; args.num_envs];
        for t in (0..t_max).rev() {
            for i in 0..args.num_envs {
                let (next_value, next_done) = if t + 1 == t_max {
                    (last_values[i], 0.0)
                } else {
                    (all_values[t + 1][i], all_dones[t + 1][i])
                };
                let not_done = 1.0 - next_done;
                let delta = all_rewards[t][i] + args.discounting * next_value * not_done
                    - all_values[t][i];
                carry[i] = delta + args.discounting * GAE_LAMBDA * carry[i] * not_done;
                advantages[t][i] = carry[i];
                returns[t][i] = carry[i] + all_values[t][i];
            }
        }

        // Flatten and normalize advantages over the whole unroll.
        let mut samples = Vec::with_capacity(t_max * args.num_envs);
        for t in 0..t_max {
            for i in 0..args.num_envs {
                samples.push(Sample {
                    obs: all_obs[t][i].clone(),
                    action: all_actions[t][i].clone(),
                    log_prob: all_log_probs[t][i],
                    advantage: advantages[t][i],
                    ret: returns[t][i],
                });
            }
        }
        let mean_adv = samples.iter().map(|s| s.advantage).sum::<f32>() / samples.len() as f32;
        let std_adv = (samples.iter().map(|s| (s.advantage - mean_adv).powi(2)).sum::<f32>()
            / samples.len() as f32)
            .sqrt();
        for s in &mut samples {
            s.advantage = (s.advantage - mean_adv) / (std_adv + 1e-8);
        }

        // --- optimization ---
        let mut order: Vec<usize> = (0..samples.len()).collect();
        let minibatch = (samples.len() / args.num_minibatches.max(1))
            .max(1)
            .min(args.batch_size.max(1));
        let mut policy_loss = 0.0;
        let mut value_loss = 0.0;
        for _ in 0..args.num_update_epochs {
            rng.shuffle(&mut order);
            for chunk in order.chunks(minibatch) {
                let (pl, vl) = update_minibatch(
                    args,
                    &pi,
                    &vf,
                    &mut pi_params,
                    &mut vf_params,
                    &mut pi_opt,
                    &mut vf_opt,
                    &samples,
                    chunk,
                    act_size,
                );
                policy_loss = pl;
                value_loss = vl;
            }
        }

        metrics.insert(
            "eval/episode_reward".to_owned(),
            episode_reward / args.num_envs as f32,
        );
        metrics.insert("losses/policy_loss".to_owned(), policy_loss);
        metrics.insert("losses/value_loss".to_owned(), value_loss);
        progress(env_steps, &metrics);
    }

    let policy = Policy::new(obs_size, HIDDEN, act_size);
    let params = Params {
        sizes: policy.net().sizes.clone(),
        values: mlp_slice(&pi_params, &pi).to_vec(),
        normalizer,
    };
    Ok(Trained { policy, params, metrics })
}

fn normalized(normalizer: &Option<Normalizer>, obs: &[f32]) -> Vec<f32> {
    match normalizer {
        Some(norm) => norm.apply(obs),
        None => obs.to_vec(),
    }
}

fn mlp_slice<'a>(params: &'a [f32], net: &Mlp) -> &'a [f32] {
    &params[..net.param_count()]
}

fn log_std(pi_params: &[f32], act_size: usize) -> &[f32] {
    &pi_params[pi_params.len() - act_size..]
}

fn sample_action(mu: &[f32], log_std: &[f32], rng: &mut fastrand::Rng) -> (Vec<f32>, f32) {
    let mut action = Vec::with_capacity(mu.len());
    let mut log_prob = 0.0;
    for (m, ls) in mu.iter().zip(log_std) {
        let std = ls.exp();
        let a = m + std * normal(rng);
        log_prob += gaussian_log_prob(a, *m, *ls);
        action.push(a);
    }
    (action, log_prob)
}

fn gaussian_log_prob(a: f32, mu: f32, log_std: f32) -> f32 {
    let std = log_std.exp();
    let z = (a - mu) / std;
    -0.5 * z * z - log_std - 0.5 * (2.0 * std::f32::consts::PI).ln()
}

#[allow(clippy::too_many_arguments)]
fn update_minibatch(
    args: &PpoArgs,
    pi: &Mlp,
    vf: &Mlp,
    pi_params: &mut [f32],
    vf_params: &mut [f32],
    pi_opt: &mut Adam,
    vf_opt: &mut Adam,
    samples: &[Sample],
    chunk: &[usize],
    act_size: usize,
) -> (f32, f32) {
    let n = chunk.len() as f32;
    let mut pi_grads = vec![0.0; pi_params.len()];
    let mut vf_grads = vec![0.0; vf_params.len()];
    let mut policy_loss = 0.0;
    let mut value_loss = 0.0;
    let mlp_len = pi.param_count();

    for &k in chunk {
        let s = &samples[k];
        let (mu, pi_cache) = pi.forward_cached(&pi_params[..mlp_len], &s.obs);
        let (v, vf_cache) = vf.forward_cached(vf_params, &s.obs);

        // Fresh log-prob under the current parameters.
        let lstd = &pi_params[mlp_len..];
        let mut log_prob = 0.0;
        for d in 0..act_size {
            log_prob += gaussian_log_prob(s.action[d], mu[d], lstd[d]);
        }
        let ratio = (log_prob - s.log_prob).exp();
        let unclipped = ratio * s.advantage;
        let clipped = ratio.clamp(1.0 - CLIP_EPSILON, 1.0 + CLIP_EPSILON) * s.advantage;
        policy_loss -= unclipped.min(clipped) / n;

        // The surrogate's gradient flows only where the unclipped branch is
        // active or the ratio sits inside the clip window.
        let in_window = (1.0 - CLIP_EPSILON..=1.0 + CLIP_EPSILON).contains(&ratio);
        if unclipped <= clipped || in_window {
            let scale = -ratio * s.advantage / n;
            let mut grad_mu = Vec::with_capacity(act_size);
            for d in 0..act_size {
                let std = lstd[d].exp();
                let z = (s.action[d] - mu[d]) / std;
                // d log_prob / d mu and / d log_std.
                grad_mu.push(scale * (z / std));
                pi_grads[mlp_len + d] += scale * (z * z - 1.0);
            }
            pi.backward(&pi_params[..mlp_len], &pi_cache, &grad_mu, &mut pi_grads[..mlp_len]);
        }

        // Entropy bonus only touches the log-std tail.
        for d in 0..act_size {
            pi_grads[mlp_len + d] -= args.entropy_cost / n;
        }

        let err = v[0] - s.ret;
        value_loss += err * err / n;
        vf.backward(vf_params, &vf_cache, &[2.0 * err / n], &mut vf_grads);
    }

    pi_opt.step(pi_params, &pi_grads);
    vf_opt.step(vf_params, &vf_grads);
    (policy_loss, value_loss)
}
