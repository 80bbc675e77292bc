//! Whole-episode evaluation used by the perturbation-based learners.

use crate::error::TrainError;
use crate::nn::{Mlp, Normalizer};
use envs::{step_repeat, Env};

/// Run one deterministic episode with `net(values)` as the policy and return
/// `(total_reward, env_steps_consumed)`.
pub(crate) fn episode_return(
    env: &dyn Env,
    net: &Mlp,
    values: &[f32],
    normalizer: Option<&Normalizer>,
    rng: fastrand::Rng,
    action_repeat: usize,
) -> Result<(f32, u64), TrainError> {
    let mut state = env.reset(rng);
    let mut total = 0.0;
    while !state.is_done() {
        let obs = match normalizer {
            Some(norm) => norm.apply(&state.obs),
            None => state.obs.clone(),
        };
        let action = net.forward(values, &obs);
        state = step_repeat(env, &state, &action, action_repeat)?;
        total += state.reward;
    }
    Ok((total, u64::from(state.steps)))
}
