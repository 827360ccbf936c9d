//! Configuration of a training run.
use crate::{point_mass::PointMassConfig, random_agent::RandomAgentConfig};
use anyhow::Result;
use offpolicy_core::{replay_buffer::SimpleReplayBufferConfig, TrainerConfig};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of a training run of [`RandomAgent`](crate::RandomAgent) on
/// [`PointMass`](crate::PointMass).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RunConfig {
    /// Training loop.
    pub trainer: TrainerConfig,

    /// Environment, shared by training and evaluation.
    pub env: PointMassConfig,

    /// Agent.
    pub agent: RandomAgentConfig,

    /// Replay buffer.
    pub replay_buffer: SimpleReplayBufferConfig,

    /// Episodes per evaluation.
    pub n_eval_episodes: usize,

    /// Seed of the training environment. The evaluation environment uses `env_seed + 1`.
    pub env_seed: i64,
}

impl Default for RunConfig {
    fn default() -> Self {
        let env = PointMassConfig::default();
        let agent = RandomAgentConfig::default()
            .action_space(offpolicy_core::BoxSpace::uniform(env.dim, -1., 1.));
        Self {
            trainer: TrainerConfig::default()
                .max_steps(100_000)
                .seed_steps(1_000)
                .unsup_steps(5_000)
                .eval_interval(5_000),
            env,
            agent,
            replay_buffer: SimpleReplayBufferConfig::default().capacity(100_000),
            n_eval_episodes: 10,
            env_seed: 0,
        }
    }
}

impl RunConfig {
    /// Sets the configuration of the training loop.
    pub fn trainer(mut self, v: TrainerConfig) -> Self {
        self.trainer = v;
        self
    }

    /// Sets the configuration of the environment.
    pub fn env(mut self, v: PointMassConfig) -> Self {
        self.env = v;
        self
    }

    /// Sets the configuration of the agent.
    pub fn agent(mut self, v: RandomAgentConfig) -> Self {
        self.agent = v;
        self
    }

    /// Sets the number of episodes per evaluation.
    pub fn n_eval_episodes(mut self, v: usize) -> Self {
        self.n_eval_episodes = v;
        self
    }

    /// Constructs [`RunConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RunConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_run_config() -> Result<()> {
        let config = RunConfig::default().n_eval_episodes(3);
        let dir = TempDir::new("run_config")?;
        let path = dir.path().join("run.yaml");
        config.save(&path)?;
        assert_eq!(RunConfig::load(&path)?, config);
        Ok(())
    }
}
