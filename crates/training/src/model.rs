//! Parameter checkpoint serialization.

use crate::algorithm::Algorithm;
use crate::error::TrainError;
use crate::policy::Params;
use std::fs;
use std::path::Path;

/// Canonical checkpoint filename for an env/learner pair.
#[must_use]
pub fn checkpoint_name(env: &str, algorithm: Algorithm) -> String {
    format!("{env}_{algorithm}.json")
}

pub fn save(path: &Path, params: &Params) -> Result<(), TrainError> {
    fs::write(path, serde_json::to_vec_pretty(params)?)?;
    Ok(())
}

pub fn load(path: &Path) -> Result<Params, TrainError> {
    Ok(serde_json::from_slice(&fs::read(path)?)?)
}
