//! Policy gradient taken directly through the stepping function.
//!
//! The return gradient is estimated with antithetic two-point probes along
//! random sign directions (the stepping function is opaque, so the
//! derivative is probed rather than traced), clipped by a global-norm bound
//! and ascended with Adam.

use crate::algorithm::{Algorithm, Progress, Trained};
use crate::config::{require, TrainConfig};
use crate::error::TrainError;
use crate::nn::Mlp;
use crate::optim::{clip_global_norm, Adam};
use crate::policy::{Params, Policy};
use crate::rollout::episode_return;
use envs::{split_rng, Env};
use std::collections::BTreeMap;

const HIDDEN: usize = 32;
const PROBE_STEP: f32 = 1e-2;

#[derive(Debug)]
pub struct ApgArgs {
    pub seed: u64,
    pub total_env_steps: u64,
    pub action_repeat: usize,
    pub num_envs: usize,
    pub learning_rate: f32,
    pub max_gradient_norm: f32,
}

pub fn setup(config: &TrainConfig) -> Result<ApgArgs, TrainError> {
    let alg = Algorithm::AnalyticPolicyGradient;
    Ok(ApgArgs {
        seed: config.seed,
        total_env_steps: config.total_env_steps,
        action_repeat: config.action_repeat.max(1),
        num_envs: config.num_envs.max(1),
        learning_rate: config.learning_rate,
        max_gradient_norm: require(config.max_gradient_norm, alg, "max_gradient_norm")?,
    })
}

pub fn learn(
    args: &ApgArgs,
    env: &dyn Env,
    progress: &mut Progress<'_>,
) -> Result<Trained, TrainError> {
    let obs_size = env.observation_size();
    let act_size = env.action_size();
    let mut rng = fastrand::Rng::with_seed(args.seed);

    let net = Mlp::new(vec![obs_size, HIDDEN, act_size]);
    let mut params = net.init(&mut rng);
    let dim = params.len();
    let mut opt = Adam::new(args.learning_rate, dim);

    let mut env_steps: u64 = 0;
    let mut metrics = BTreeMap::new();

    while env_steps < args.total_env_steps {
        let mut grads = vec![0.0; dim];
        let mut mean_return = 0.0;
        for _ in 0..args.num_envs {
            // Rademacher direction: +-1 per coordinate.
            let delta: Vec<f32> =
                (0..dim).map(|_| if rng.bool() { 1.0 } else { -1.0 }).collect();
            let plus: Vec<f32> =
                params.iter().zip(&delta).map(|(p, d)| p + PROBE_STEP * d).collect();
            let minus: Vec<f32> =
                params.iter().zip(&delta).map(|(p, d)| p - PROBE_STEP * d).collect();
            let (ret_plus, steps_plus) =
                episode_return(env, &net, &plus, None, split_rng(&rng), args.action_repeat)?;
            let (ret_minus, steps_minus) =
                episode_return(env, &net, &minus, None, split_rng(&rng), args.action_repeat)?;
            env_steps += steps_plus + steps_minus;
            mean_return += (ret_plus + ret_minus) / 2.0;

            let slope = (ret_plus - ret_minus) / (2.0 * PROBE_STEP);
            for (g, d) in grads.iter_mut().zip(&delta) {
                // 1/d == d for +-1 directions.
                *g += slope * d / args.num_envs as f32;
            }
        }
        mean_return /= args.num_envs as f32;

        clip_global_norm(&mut grads, args.max_gradient_norm);
        // Ascent: Adam descends, so feed the negated estimate.
        for g in &mut grads {
            *g = -*g;
        }
        opt.step(&mut params, &grads);

        metrics.insert("eval/episode_reward".to_owned(), mean_return);
        progress(env_steps, &metrics);
    }

    let policy = Policy::new(obs_size, HIDDEN, act_size);
    let params = Params { sizes: policy.net().sizes.clone(), values: params, normalizer: None };
    Ok(Trained { policy, params, metrics })
}
