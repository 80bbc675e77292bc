//! Entry point for the `learner` binary.
//!
//! Flags cover the shared training configuration plus each learner's
//! hyperparameter slice; the selected learner validates its own slice before
//! any environment is built.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use training::TrainConfig;

#[derive(Parser, Debug)]
#[command(name = "learner", about = "Train a policy on a registered environment")]
struct Cli {
    /// Learner to run: ppo, es, apg or sac.
    #[arg(long, default_value = "ppo")]
    learner: String,
    /// Registered environment name.
    #[arg(long, default_value = "fast")]
    env: String,
    #[arg(long, default_value_t = 50_000)]
    total_env_steps: u64,
    /// Write metrics every Nth progress report.
    #[arg(long, default_value_t = 10)]
    eval_frequency: u64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 4)]
    num_envs: usize,
    #[arg(long, default_value_t = 1000)]
    episode_length: u32,
    #[arg(long, default_value_t = 1)]
    action_repeat: usize,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    normalize_observations: bool,
    #[arg(long, default_value_t = 5e-4)]
    learning_rate: f32,
    #[arg(long, default_value_t = 0.99)]
    discounting: f32,
    #[arg(long, default_value_t = 10.0)]
    reward_scaling: f32,

    // ppo
    #[arg(long)]
    batch_size: Option<usize>,
    #[arg(long)]
    unroll_length: Option<usize>,
    #[arg(long)]
    num_minibatches: Option<usize>,
    #[arg(long)]
    num_update_epochs: Option<usize>,
    #[arg(long)]
    entropy_cost: Option<f32>,

    // es
    #[arg(long)]
    population_size: Option<usize>,
    #[arg(long)]
    perturbation_std: Option<f32>,
    #[arg(long)]
    l2coeff: Option<f32>,
    #[arg(long)]
    center_fitness: Option<bool>,

    // apg
    #[arg(long)]
    max_gradient_norm: Option<f32>,

    // sac
    #[arg(long)]
    min_replay_size: Option<usize>,
    #[arg(long)]
    max_replay_size: Option<usize>,
    #[arg(long)]
    grad_updates_per_step: Option<f32>,

    /// Directory for checkpoints and trajectory exports.
    #[arg(long, default_value = "logs")]
    logdir: PathBuf,
    /// Export the evaluation trajectory as a standalone HTML page.
    #[arg(long)]
    save_html: bool,
}

impl Cli {
    fn train_config(&self) -> TrainConfig {
        TrainConfig {
            env: self.env.clone(),
            num_envs: self.num_envs,
            total_env_steps: self.total_env_steps,
            eval_frequency: self.eval_frequency,
            episode_length: self.episode_length,
            seed: self.seed,
            action_repeat: self.action_repeat,
            normalize_observations: self.normalize_observations,
            learning_rate: self.learning_rate,
            discounting: self.discounting,
            reward_scaling: self.reward_scaling,
            batch_size: self.batch_size,
            unroll_length: self.unroll_length,
            num_minibatches: self.num_minibatches,
            num_update_epochs: self.num_update_epochs,
            entropy_cost: self.entropy_cost,
            population_size: self.population_size,
            perturbation_std: self.perturbation_std,
            l2coeff: self.l2coeff,
            center_fitness: self.center_fitness,
            max_gradient_norm: self.max_gradient_norm,
            min_replay_size: self.min_replay_size,
            max_replay_size: self.max_replay_size,
            grad_updates_per_step: self.grad_updates_per_step,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let config = cli.train_config();

    let setup = runtime::setup(&cli.learner, &config)?;
    let report = runtime::run(setup, &config, &cli.logdir, cli.save_html)?;

    tracing::info!(
        checkpoint = %report.checkpoint.display(),
        eval_reward = report.eval_reward,
        eval_steps = report.eval_steps,
        "run complete"
    );
    if let Some(path) = report.trajectory {
        tracing::info!(path = %path.display(), "trajectory");
    }
    Ok(())
}
