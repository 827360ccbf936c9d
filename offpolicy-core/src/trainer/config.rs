//! Configuration of [`Trainer`](super::Trainer).
use crate::error::OffpolicyError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
///
/// All intervals and counts are in environment steps.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The total number of environment steps.
    pub max_steps: usize,

    /// Number of steps with uniformly random actions and no update.
    pub seed_steps: usize,

    /// Number of steps of unsupervised exploration after the seed phase.
    pub unsup_steps: usize,

    /// Gradient updates per step during unsupervised exploration.
    pub unsup_gradient_update: usize,

    /// Number of neighbors of the state-entropy estimator.
    pub top_k: usize,

    /// Gradient updates right after the critic is reset.
    pub reset_update: usize,

    /// Interval of evaluation.
    pub eval_interval: usize,

    /// Interval of saving the agent. `0` disables periodic saving.
    pub save_interval: usize,

    /// Where to save the agent. The current directory if not given.
    pub model_dir: Option<String>,

    /// Random seed for actions in the seed phase.
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_steps: 1_000_000,
            seed_steps: 5_000,
            unsup_steps: 9_000,
            unsup_gradient_update: 1,
            top_k: 5,
            reset_update: 100,
            eval_interval: 10_000,
            save_interval: 0,
            model_dir: None,
            seed: 1,
        }
    }
}

impl TrainerConfig {
    /// Sets the total number of environment steps.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the number of steps in the seed phase.
    pub fn seed_steps(mut self, v: usize) -> Self {
        self.seed_steps = v;
        self
    }

    /// Sets the number of steps of unsupervised exploration.
    pub fn unsup_steps(mut self, v: usize) -> Self {
        self.unsup_steps = v;
        self
    }

    /// Sets the number of gradient updates per step in unsupervised exploration.
    pub fn unsup_gradient_update(mut self, v: usize) -> Self {
        self.unsup_gradient_update = v;
        self
    }

    /// Sets the number of neighbors of the state-entropy estimator.
    pub fn top_k(mut self, v: usize) -> Self {
        self.top_k = v;
        self
    }

    /// Sets the number of gradient updates after the critic reset.
    pub fn reset_update(mut self, v: usize) -> Self {
        self.reset_update = v;
        self
    }

    /// Sets the interval of evaluation.
    pub fn eval_interval(mut self, v: usize) -> Self {
        self.eval_interval = v;
        self
    }

    /// Sets the interval of saving the agent.
    pub fn save_interval(mut self, v: usize) -> Self {
        self.save_interval = v;
        self
    }

    /// Sets the directory where the agent is saved.
    pub fn model_dir(mut self, model_dir: impl Into<String>) -> Self {
        self.model_dir = Some(model_dir.into());
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Checks the consistency of the step budget.
    ///
    /// The seed phase must be non-empty, since the replay buffer has to hold
    /// transitions before the first update, and the learning phases must
    /// start before the run ends.
    pub fn validate(&self) -> Result<(), OffpolicyError> {
        let invalid = |msg: String| Err(OffpolicyError::InvalidConfig(msg));

        if self.max_steps == 0 {
            return invalid("max_steps must be positive".to_string());
        }
        if self.seed_steps == 0 {
            return invalid("seed_steps must be positive".to_string());
        }
        if self.eval_interval == 0 {
            return invalid("eval_interval must be positive".to_string());
        }
        if self.seed_steps + self.unsup_steps >= self.max_steps {
            return invalid(format!(
                "seed_steps + unsup_steps ({}) must be less than max_steps ({})",
                self.seed_steps + self.unsup_steps,
                self.max_steps
            ));
        }
        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
