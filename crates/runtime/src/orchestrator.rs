//! Algorithm selection, the training call, and the evaluation rollout.

use crate::html;
use crate::metrics::MetricsWriter;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use training::{model, Algorithm, LearnArgs, TrainConfig, TrainError};

/// A validated run: the chosen learner and its argument bundle. Built
/// entirely from configuration; no environment exists yet.
#[derive(Debug)]
pub struct Setup {
    pub algorithm: Algorithm,
    pub args: LearnArgs,
}

/// Select a learner by name and validate its configuration slice.
///
/// Every configuration error fires here, before any simulation step runs.
pub fn setup(learner: &str, config: &TrainConfig) -> Result<Setup, TrainError> {
    let algorithm: Algorithm = learner.parse()?;
    let args = algorithm.setup(config)?;
    Ok(Setup { algorithm, args })
}

/// Outcome of one training run.
#[derive(Debug)]
pub struct Report {
    pub checkpoint: PathBuf,
    pub trajectory: Option<PathBuf>,
    pub eval_reward: f32,
    pub eval_steps: u32,
}

/// Drive the learner to completion, checkpoint its parameters, then roll
/// out one evaluation episode and export the trajectory.
pub fn run(setup: Setup, config: &TrainConfig, logdir: &Path, save_html: bool) -> Result<Report> {
    fs::create_dir_all(logdir)
        .with_context(|| format!("creating logdir {}", logdir.display()))?;

    let env = envs::create(&config.env, config.episode_length)?;
    let mut writer = MetricsWriter::new(config.eval_frequency);
    tracing::info!(learner = %setup.algorithm, env = %config.env, "training");
    // The entire training loop lives inside this one call.
    let trained = training::learn(setup.args, env.as_ref(), &mut |steps, metrics| {
        writer.write(steps, metrics);
    })?;

    let checkpoint = logdir.join(model::checkpoint_name(&config.env, setup.algorithm));
    model::save(&checkpoint, &trained.params)?;
    tracing::info!(path = %checkpoint.display(), "saved params");

    // One evaluation rollout with the policy bound ("compiled") once and
    // reused every step.
    let inference = trained.policy.compile(&trained.params)?;
    let mut state = env.reset(fastrand::Rng::with_seed(config.seed));
    let mut qps = vec![state.qp.clone()];
    let mut eval_reward = 0.0;
    while !state.is_done() {
        let action = inference.act(&state.obs);
        state = env.step(&state, &action).map_err(TrainError::from)?;
        eval_reward += state.reward;
        qps.push(state.qp.clone());
    }
    tracing::info!(eval_reward, steps = state.steps, "evaluation rollout complete");

    let trajectory = if save_html {
        let path = logdir.join(format!("trajectory_{:016x}.html", fastrand::u64(..)));
        html::save(&path, env.config(), &qps)?;
        tracing::info!(path = %path.display(), "saved trajectory");
        Some(path)
    } else {
        None
    };

    Ok(Report { checkpoint, trajectory, eval_reward, eval_steps: state.steps })
}
