//! An agent exploring with uniformly random actions.
use crate::point_mass::{PointMass, PointMassAct, PointMassObs};
use anyhow::Result;
use log::info;
use offpolicy_core::{
    record::{Record, RecordValue},
    replay_buffer::{ArrayBatch, GenericTransitionBatch, SimpleReplayBuffer},
    Agent, BoxSpace, Policy, ReplayBufferBase,
};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, Write},
    path::Path,
};

/// The replay buffer used with [`RandomAgent`].
pub type ReplayBuffer = SimpleReplayBuffer<ArrayBatch, ArrayBatch>;

const PARAMS_FILE: &str = "agent.yaml";

/// Configuration of [`RandomAgent`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RandomAgentConfig {
    /// Number of transitions in a batch.
    pub batch_size: usize,

    /// Step size of the value estimate.
    pub learning_rate: f32,

    /// Discount factor.
    pub discount: f32,

    /// Action space.
    pub action_space: BoxSpace,

    /// Random seed.
    pub seed: u64,
}

impl Default for RandomAgentConfig {
    fn default() -> Self {
        Self {
            batch_size: 64,
            learning_rate: 0.01,
            discount: 0.99,
            action_space: BoxSpace::uniform(2, -1., 1.),
            seed: 42,
        }
    }
}

impl RandomAgentConfig {
    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the action space.
    pub fn action_space(mut self, v: BoxSpace) -> Self {
        self.action_space = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`RandomAgentConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RandomAgentConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Parameters saved by [`RandomAgent::save_params()`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Default)]
pub struct RandomAgentParams {
    /// Estimate of the average discounted return, the only learned quantity.
    pub critic: f32,

    /// Number of gradient updates.
    pub n_updates: usize,

    /// Number of gradient updates on the state-entropy objective.
    pub n_state_ent_updates: usize,

    /// Number of resets of the critic.
    pub n_critic_resets: usize,

    /// Environment step at which the parameters were saved.
    pub step: usize,
}

/// A random policy with a scalar critic.
///
/// Actions are drawn uniformly from the action space when sampling and are
/// the center of the action space otherwise. The critic is a single value
/// regressed on bootstrapped one-step targets from replayed batches, which
/// is enough to exercise every update of the training loop.
pub struct RandomAgent {
    config: RandomAgentConfig,
    rng: fastrand::Rng,
    params: RandomAgentParams,
    train: bool,
}

impl RandomAgent {
    /// Constructs a [`RandomAgent`].
    pub fn build(config: RandomAgentConfig) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(config.seed),
            config,
            params: RandomAgentParams::default(),
            train: true,
        }
    }

    /// The learned parameters and counters.
    pub fn params(&self) -> &RandomAgentParams {
        &self.params
    }

    /// One regression step of the critic on `rewards`.
    fn update_critic(&mut self, rewards: &[f32], not_done: &[f32]) -> f32 {
        let n = rewards.len() as f32;
        let v = self.params.critic;
        let td = rewards
            .iter()
            .zip(not_done.iter())
            .map(|(r, nd)| r + self.config.discount * nd * v - v)
            .sum::<f32>()
            / n;
        self.params.critic += self.config.learning_rate * td;
        td * td
    }

    fn update_with<F>(&mut self, buffer: &mut ReplayBuffer, n: usize, reward_fn: F) -> Result<Record>
    where
        F: Fn(&GenericTransitionBatch<ArrayBatch, ArrayBatch>) -> Vec<f32>,
    {
        let mut loss = 0.;
        for _ in 0..n {
            let batch = buffer.batch(self.config.batch_size)?;
            let rewards = reward_fn(&batch);
            loss += self.update_critic(&rewards, &batch.not_done_no_bootstrap());
            self.params.n_updates += 1;
        }
        Ok(Record::from_slice(&[
            ("agent/critic_loss", RecordValue::Scalar(loss / n.max(1) as f32)),
            ("agent/critic", RecordValue::Scalar(self.params.critic)),
        ]))
    }
}

/// Particle-based state-entropy reward: `ln(1 + d_k)`, where `d_k` is the
/// distance from each row to its `k`-th nearest neighbor in the batch.
pub fn state_entropy_reward(states: &ArrayBatch, k: usize) -> Vec<f32> {
    let n = states.len();
    let k = k.clamp(1, n.saturating_sub(1).max(1));
    (0..n)
        .map(|i| {
            let mut dists = (0..n)
                .filter(|&j| j != i)
                .map(|j| {
                    states
                        .row(i)
                        .iter()
                        .zip(states.row(j).iter())
                        .map(|(a, b)| (a - b).powi(2))
                        .sum::<f32>()
                        .sqrt()
                })
                .collect::<Vec<_>>();
            if dists.is_empty() {
                return 0.;
            }
            dists.sort_by(|a, b| a.total_cmp(b));
            (1. + dists[(k - 1).min(dists.len() - 1)]).ln()
        })
        .collect()
}

impl Policy<PointMass> for RandomAgent {
    fn act(&mut self, _obs: &PointMassObs, sample: bool) -> Result<PointMassAct> {
        let space = &self.config.action_space;
        let act = match sample {
            true => space
                .low
                .iter()
                .zip(space.high.iter())
                .map(|(lo, hi)| lo + (hi - lo) * self.rng.f32())
                .collect(),
            false => space
                .low
                .iter()
                .zip(space.high.iter())
                .map(|(lo, hi)| 0.5 * (lo + hi))
                .collect(),
        };
        Ok(PointMassAct(act))
    }
}

impl Agent<PointMass, ReplayBuffer> for RandomAgent {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn update(&mut self, buffer: &mut ReplayBuffer, _step: usize) -> Result<Record> {
        self.update_with(buffer, 1, |batch| batch.reward.clone())
    }

    fn update_after_reset(
        &mut self,
        buffer: &mut ReplayBuffer,
        _step: usize,
        gradient_update: usize,
        _policy_update: bool,
    ) -> Result<Record> {
        self.update_with(buffer, gradient_update, |batch| batch.reward.clone())
    }

    fn update_state_ent(
        &mut self,
        buffer: &mut ReplayBuffer,
        _step: usize,
        gradient_update: usize,
        k: usize,
    ) -> Result<Record> {
        let record = self.update_with(buffer, gradient_update, |batch| {
            state_entropy_reward(&batch.next_obs, k)
        })?;
        self.params.n_state_ent_updates += gradient_update;
        Ok(record)
    }

    fn reset_critic(&mut self) -> Result<()> {
        self.params.critic = 0.;
        self.params.n_critic_resets += 1;
        Ok(())
    }

    fn save_params(&self, path: &Path, step: usize) -> Result<()> {
        fs::create_dir_all(path)?;
        let params = RandomAgentParams {
            step,
            ..self.params.clone()
        };
        let mut file = File::create(path.join(PARAMS_FILE))?;
        file.write_all(serde_yaml::to_string(&params)?.as_bytes())?;
        info!("Saved the parameters of the agent at step {}", step);
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path.join(PARAMS_FILE))?;
        self.params = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(())
    }
}
