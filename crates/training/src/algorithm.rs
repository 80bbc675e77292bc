//! The closed set of learners and their uniform contract.
//!
//! Every learner exposes the same two-phase shape: `setup` validates the
//! algorithm-specific slice of the configuration and returns an argument
//! bundle, and `learn` consumes the bundle and an environment to produce a
//! [`Trained`] result. Past `setup`, callers never branch on which
//! algorithm is running.

use crate::config::TrainConfig;
use crate::error::TrainError;
use crate::policy::{Params, Policy};
use crate::{apg, es, ppo, sac};
use envs::Env;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Clipped-objective policy gradient ("ppo").
    PolicyGradient,
    /// Antithetic-sampling evolution strategy ("es").
    EvolutionStrategy,
    /// Gradient ascent through the stepping function ("apg").
    AnalyticPolicyGradient,
    /// Off-policy actor-critic with replay ("sac").
    ActorCritic,
}

impl Algorithm {
    pub const ALL: [Self; 4] = [
        Self::PolicyGradient,
        Self::EvolutionStrategy,
        Self::AnalyticPolicyGradient,
        Self::ActorCritic,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PolicyGradient => "ppo",
            Self::EvolutionStrategy => "es",
            Self::AnalyticPolicyGradient => "apg",
            Self::ActorCritic => "sac",
        }
    }

    /// Validate the algorithm-specific configuration subset and build the
    /// learner's argument bundle. No environment is touched here.
    pub fn setup(self, config: &TrainConfig) -> Result<LearnArgs, TrainError> {
        match self {
            Self::PolicyGradient => ppo::setup(config).map(LearnArgs::Ppo),
            Self::EvolutionStrategy => es::setup(config).map(LearnArgs::Es),
            Self::AnalyticPolicyGradient => apg::setup(config).map(LearnArgs::Apg),
            Self::ActorCritic => sac::setup(config).map(LearnArgs::Sac),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = TrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| TrainError::UnknownAlgorithm(s.to_owned()))
    }
}

/// Opaque, algorithm-specific argument bundle produced by `setup`.
#[derive(Debug)]
pub enum LearnArgs {
    Ppo(ppo::PpoArgs),
    Es(es::EsArgs),
    Apg(apg::ApgArgs),
    Sac(sac::SacArgs),
}

impl LearnArgs {
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Ppo(_) => Algorithm::PolicyGradient,
            Self::Es(_) => Algorithm::EvolutionStrategy,
            Self::Apg(_) => Algorithm::AnalyticPolicyGradient,
            Self::Sac(_) => Algorithm::ActorCritic,
        }
    }
}

/// What every learner hands back: an inference policy, its trained
/// parameters and the final training metrics.
pub struct Trained {
    pub policy: Policy,
    pub params: Params,
    pub metrics: BTreeMap<String, f32>,
}

/// Progress sink: called with the cumulative environment step count and the
/// current metric set.
pub type Progress<'a> = dyn FnMut(u64, &BTreeMap<String, f32>) + 'a;

/// Run the selected learner's entire training loop.
///
/// One long-running call; the loop inside is bounded only by the configured
/// total step budget.
pub fn learn(
    args: LearnArgs,
    env: &dyn Env,
    progress: &mut Progress<'_>,
) -> Result<Trained, TrainError> {
    let algorithm = args.algorithm();
    tracing::debug!(
        learner = %algorithm,
        observation_size = env.observation_size(),
        action_size = env.action_size(),
        "starting training loop"
    );
    match args {
        LearnArgs::Ppo(a) => ppo::learn(&a, env, progress),
        LearnArgs::Es(a) => es::learn(&a, env, progress),
        LearnArgs::Apg(a) => apg::learn(&a, env, progress),
        LearnArgs::Sac(a) => sac::learn(&a, env, progress),
    }
}
