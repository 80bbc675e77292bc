//! Evolution strategy with antithetic sampling.
//!
//! Each generation draws `population_size` Gaussian perturbations, scores
//! the `+` and `-` directions with full episodes, shapes fitness with
//! centered ranks and ascends the resulting search gradient with Adam.

use crate::algorithm::{Algorithm, Progress, Trained};
use crate::config::{require, TrainConfig};
use crate::error::TrainError;
use crate::nn::{normal, Mlp};
use crate::optim::Adam;
use crate::policy::{Params, Policy};
use crate::rollout::episode_return;
use envs::{split_rng, Env};
use std::collections::BTreeMap;

const HIDDEN: usize = 32;

#[derive(Debug)]
pub struct EsArgs {
    pub seed: u64,
    pub total_env_steps: u64,
    pub action_repeat: usize,
    pub learning_rate: f32,
    pub population_size: usize,
    pub perturbation_std: f32,
    pub l2coeff: f32,
    pub center_fitness: bool,
}

pub fn setup(config: &TrainConfig) -> Result<EsArgs, TrainError> {
    let alg = Algorithm::EvolutionStrategy;
    Ok(EsArgs {
        seed: config.seed,
        total_env_steps: config.total_env_steps,
        action_repeat: config.action_repeat.max(1),
        learning_rate: config.learning_rate,
        // An empty population would add no steps per generation and spin
        // the budget loop forever.
        population_size: require(config.population_size, alg, "population_size")?.max(1),
        perturbation_std: require(config.perturbation_std, alg, "perturbation_std")?,
        l2coeff: require(config.l2coeff, alg, "l2coeff")?,
        center_fitness: config.center_fitness.unwrap_or(false),
    })
}

/// Map raw fitness values to centered ranks in `[-0.5, 0.5]`.
fn centered_ranks(fitness: &[f32]) -> Vec<f32> {
    let n = fitness.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| fitness[a].total_cmp(&fitness[b]));
    let mut ranks = vec![0.0; n];
    for (rank, &idx) in order.iter().enumerate() {
        ranks[idx] = if n > 1 { rank as f32 / (n - 1) as f32 - 0.5 } else { 0.0 };
    }
    ranks
}

pub fn learn(
    args: &EsArgs,
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
        let mut perturbations = Vec::with_capacity(args.population_size);
        let mut fitness = Vec::with_capacity(args.population_size * 2);
        for _ in 0..args.population_size {
            let eps: Vec<f32> = (0..dim).map(|_| normal(&mut rng)).collect();
            for sign in [1.0f32, -1.0] {
                let candidate: Vec<f32> = params
                    .iter()
                    .zip(&eps)
                    .map(|(p, e)| p + sign * args.perturbation_std * e)
                    .collect();
                let (ret, steps) =
                    episode_return(env, &net, &candidate, None, split_rng(&rng), args.action_repeat)?;
                fitness.push(ret);
                env_steps += steps;
            }
            perturbations.push(eps);
        }

        let shaped = if args.center_fitness {
            let mean = fitness.iter().sum::<f32>() / fitness.len() as f32;
            let std = (fitness.iter().map(|f| (f - mean).powi(2)).sum::<f32>()
                / fitness.len() as f32)
                .sqrt()
                .max(1e-6);
            centered_ranks(&fitness.iter().map(|f| (f - mean) / std).collect::<Vec<_>>())
        } else {
            centered_ranks(&fitness)
        };

        // Search gradient: antithetic pairs weighted by shaped fitness.
        let scale = 1.0 / (args.population_size as f32 * args.perturbation_std);
        let mut grads = vec![0.0; dim];
        for (p, eps) in perturbations.iter().enumerate() {
            let weight = (shaped[2 * p] - shaped[2 * p + 1]) / 2.0;
            for (g, e) in grads.iter_mut().zip(eps) {
                *g += weight * e * scale;
            }
        }
        // Descend the negated search gradient, plus l2 weight decay.
        for (g, p) in grads.iter_mut().zip(&params) {
            *g = -*g + args.l2coeff * p;
        }
        opt.step(&mut params, &grads);

        let best = fitness.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mean = fitness.iter().sum::<f32>() / fitness.len() as f32;
        metrics.insert("eval/episode_reward".to_owned(), mean);
        metrics.insert("eval/best_fitness".to_owned(), best);
        progress(env_steps, &metrics);
    }

    let policy = Policy::new(obs_size, HIDDEN, act_size);
    let params = Params { sizes: policy.net().sizes.clone(), values: params, normalizer: None };
    Ok(Trained { policy, params, metrics })
}
