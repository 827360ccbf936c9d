//! A point mass moving towards a goal in a continuous space.
use anyhow::Result;
use offpolicy_core::{replay_buffer::ArrayBatch, BoxSpace, Env, Info, Step};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Observation: the position of the point followed by the position of the goal.
#[derive(Clone, Debug, PartialEq)]
pub struct PointMassObs(pub Vec<f32>);

impl offpolicy_core::Obs for PointMassObs {}

impl From<PointMassObs> for ArrayBatch {
    fn from(obs: PointMassObs) -> Self {
        obs.0.into()
    }
}

/// Action: the velocity of the point, each component in `[-1, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct PointMassAct(pub Vec<f32>);

impl offpolicy_core::Act for PointMassAct {}

impl From<Vec<f32>> for PointMassAct {
    fn from(v: Vec<f32>) -> Self {
        Self(v)
    }
}

impl From<PointMassAct> for ArrayBatch {
    fn from(act: PointMassAct) -> Self {
        act.0.into()
    }
}

/// Reports whether the point is within the goal radius.
#[derive(Clone, Debug)]
pub struct PointMassInfo {
    /// Distance to the goal after the step.
    pub distance: f32,

    /// `1` if the goal is reached, `0` otherwise.
    pub success: f32,
}

impl Info for PointMassInfo {
    fn success(&self) -> Option<f32> {
        Some(self.success)
    }
}

/// Configuration of [`PointMass`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PointMassConfig {
    /// Dimension of the space.
    pub dim: usize,

    /// Time limit of an episode.
    pub max_episode_steps: usize,

    /// Displacement per step at full speed.
    pub step_size: f32,

    /// The goal is reached within this distance.
    pub goal_radius: f32,

    /// Positions are in `[-arena_size, arena_size]` in each dimension.
    pub arena_size: f32,

    /// End the episode when the goal is reached.
    pub terminate_on_success: bool,
}

impl Default for PointMassConfig {
    fn default() -> Self {
        Self {
            dim: 2,
            max_episode_steps: 200,
            step_size: 0.05,
            goal_radius: 0.1,
            arena_size: 1.0,
            terminate_on_success: true,
        }
    }
}

impl PointMassConfig {
    /// Sets the dimension of the space.
    pub fn dim(mut self, v: usize) -> Self {
        self.dim = v;
        self
    }

    /// Sets the time limit of an episode.
    pub fn max_episode_steps(mut self, v: usize) -> Self {
        self.max_episode_steps = v;
        self
    }

    /// Sets the goal radius.
    pub fn goal_radius(mut self, v: f32) -> Self {
        self.goal_radius = v;
        self
    }

    /// Sets if the episode ends at the goal.
    pub fn terminate_on_success(mut self, v: bool) -> Self {
        self.terminate_on_success = v;
        self
    }

    /// Constructs [`PointMassConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`PointMassConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// A point mass moving with velocity actions towards a randomly placed goal.
///
/// The reward is the negative distance to the goal. The episode ends at the
/// time limit, or when the goal is reached if
/// [`PointMassConfig::terminate_on_success`] is set.
pub struct PointMass {
    config: PointMassConfig,
    rng: fastrand::Rng,
    pos: Vec<f32>,
    goal: Vec<f32>,
    t: usize,
}

impl PointMass {
    fn obs(&self) -> PointMassObs {
        PointMassObs(self.pos.iter().chain(self.goal.iter()).copied().collect())
    }

    fn distance(&self) -> f32 {
        self.pos
            .iter()
            .zip(self.goal.iter())
            .map(|(p, g)| (p - g).powi(2))
            .sum::<f32>()
            .sqrt()
    }

    fn random_point(&mut self) -> Vec<f32> {
        let a = self.config.arena_size;
        (0..self.config.dim)
            .map(|_| (2. * self.rng.f32() - 1.) * a)
            .collect()
    }

    /// The current position of the point.
    pub fn position(&self) -> &[f32] {
        &self.pos
    }

    /// The current goal.
    pub fn goal(&self) -> &[f32] {
        &self.goal
    }
}

impl Env for PointMass {
    type Config = PointMassConfig;
    type Obs = PointMassObs;
    type Act = PointMassAct;
    type Info = PointMassInfo;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            rng: fastrand::Rng::with_seed(seed as u64),
            pos: vec![0.; config.dim],
            goal: vec![0.; config.dim],
            t: 0,
        })
    }

    fn reset(&mut self) -> Result<PointMassObs> {
        self.pos = self.random_point();
        self.goal = self.random_point();
        self.t = 0;
        Ok(self.obs())
    }

    fn step(&mut self, act: &PointMassAct) -> Result<Step<Self>> {
        anyhow::ensure!(
            act.0.len() == self.config.dim,
            "Expected an action of dimension {}, got {}",
            self.config.dim,
            act.0.len()
        );

        let (a, s) = (self.config.arena_size, self.config.step_size);
        for (p, v) in self.pos.iter_mut().zip(act.0.iter()) {
            *p = (*p + s * v.clamp(-1., 1.)).clamp(-a, a);
        }
        self.t += 1;

        let distance = self.distance();
        let success = distance < self.config.goal_radius;
        let is_done = self.t >= self.config.max_episode_steps
            || (success && self.config.terminate_on_success);
        let info = PointMassInfo {
            distance,
            success: if success { 1. } else { 0. },
        };

        Ok(Step::new(self.obs(), act.clone(), -distance, is_done, info))
    }

    fn max_episode_steps(&self) -> usize {
        self.config.max_episode_steps
    }

    fn action_space(&self) -> BoxSpace {
        BoxSpace::uniform(self.config.dim, -1., 1.)
    }
}
