//! Stub environment, agent and evaluator for testing the training loop.
#![allow(dead_code)]
use anyhow::Result;
use offpolicy_core::{
    record::{AggregateRecorder, Record, RecordStorage},
    replay_buffer::{ArrayBatch, SimpleReplayBuffer, SimpleStepProcessor},
    Act, Agent, BoxSpace, Env, Evaluator, Info, Obs, Policy, ReplayBufferBase, Step,
};
use std::{
    cell::RefCell,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, PartialEq)]
pub struct Vector(pub Vec<f32>);

impl Obs for Vector {}
impl Act for Vector {}

impl From<Vec<f32>> for Vector {
    fn from(v: Vec<f32>) -> Self {
        Self(v)
    }
}

impl From<Vector> for ArrayBatch {
    fn from(v: Vector) -> Self {
        v.0.into()
    }
}

pub struct Success(pub Option<f32>);

impl Info for Success {
    fn success(&self) -> Option<f32> {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct LineEnvConfig {
    /// Steps until the terminal state.
    pub episode_len: usize,

    /// Time limit.
    pub max_episode_steps: usize,

    /// Step of an episode (1-based) at which success is reported as 1.
    /// Success is not reported at all if `None`.
    pub success_at: Option<usize>,
}

impl LineEnvConfig {
    pub fn terminal(episode_len: usize) -> Self {
        Self {
            episode_len,
            max_episode_steps: usize::MAX,
            success_at: None,
        }
    }

    pub fn time_limit(max_episode_steps: usize) -> Self {
        Self {
            episode_len: usize::MAX,
            max_episode_steps,
            success_at: None,
        }
    }
}

/// Walks along a line, one unit per step, with reward 1 per step.
pub struct LineEnv {
    config: LineEnvConfig,
    t: usize,
}

impl Env for LineEnv {
    type Config = LineEnvConfig;
    type Obs = Vector;
    type Act = Vector;
    type Info = Success;

    fn build(config: &LineEnvConfig, _seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            t: 0,
        })
    }

    fn reset(&mut self) -> Result<Vector> {
        self.t = 0;
        Ok(Vector(vec![0.]))
    }

    fn step(&mut self, act: &Vector) -> Result<Step<Self>> {
        self.t += 1;
        let is_done = self.t == self.config.episode_len || self.t == self.config.max_episode_steps;
        let success = self
            .config
            .success_at
            .map(|s| if self.t == s { 1. } else { 0. });
        Ok(Step::new(
            Vector(vec![self.t as f32]),
            act.clone(),
            1.,
            is_done,
            Success(success),
        ))
    }

    fn max_episode_steps(&self) -> usize {
        self.config.max_episode_steps
    }

    fn action_space(&self) -> BoxSpace {
        BoxSpace::uniform(1, -1., 1.)
    }
}

pub type Buffer = SimpleReplayBuffer<ArrayBatch, ArrayBatch>;
pub type StepProc = SimpleStepProcessor<LineEnv, ArrayBatch, ArrayBatch>;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Update,
    StateEnt { gradient_update: usize, k: usize },
    UpdateAfterReset { gradient_update: usize, policy_update: bool },
}

/// Agent recording the calls it receives, keyed by the environment step.
#[derive(Default)]
pub struct RecordingAgent {
    pub calls: Vec<(usize, Call)>,
    pub acts: Vec<bool>,
    pub n_resets: usize,
    /// Positions in `calls` at which the critic was reset.
    pub critic_resets: Vec<usize>,
    pub saved: RefCell<Vec<(PathBuf, usize)>>,
    is_train: bool,
}

impl RecordingAgent {
    pub fn steps_of(&self, call: &Call) -> Vec<usize> {
        self.calls
            .iter()
            .filter(|(_, c)| c == call)
            .map(|(s, _)| *s)
            .collect()
    }

    pub fn count<F: Fn(&Call) -> bool>(&self, f: F) -> usize {
        self.calls.iter().filter(|(_, c)| f(c)).count()
    }

    fn sample(buffer: &mut Buffer) -> Result<Record> {
        let batch = buffer.batch(4)?;
        let loss = batch.reward.iter().sum::<f32>();
        Ok(Record::from_scalar("agent/loss", loss))
    }
}

impl Policy<LineEnv> for RecordingAgent {
    fn act(&mut self, _obs: &Vector, sample: bool) -> Result<Vector> {
        self.acts.push(sample);
        Ok(Vector(vec![0.5]))
    }

    fn reset(&mut self) {
        self.n_resets += 1;
    }
}

impl Agent<LineEnv, Buffer> for RecordingAgent {
    fn train(&mut self) {
        self.is_train = true;
    }

    fn eval(&mut self) {
        self.is_train = false;
    }

    fn is_train(&self) -> bool {
        self.is_train
    }

    fn update(&mut self, buffer: &mut Buffer, step: usize) -> Result<Record> {
        self.calls.push((step, Call::Update));
        Self::sample(buffer)
    }

    fn update_after_reset(
        &mut self,
        buffer: &mut Buffer,
        step: usize,
        gradient_update: usize,
        policy_update: bool,
    ) -> Result<Record> {
        self.calls.push((
            step,
            Call::UpdateAfterReset {
                gradient_update,
                policy_update,
            },
        ));
        Self::sample(buffer)
    }

    fn update_state_ent(
        &mut self,
        buffer: &mut Buffer,
        step: usize,
        gradient_update: usize,
        k: usize,
    ) -> Result<Record> {
        self.calls
            .push((step, Call::StateEnt { gradient_update, k }));
        Self::sample(buffer)
    }

    fn reset_critic(&mut self) -> Result<()> {
        self.critic_resets.push(self.calls.len());
        Ok(())
    }

    fn save_params(&self, path: &Path, step: usize) -> Result<()> {
        self.saved.borrow_mut().push((path.to_path_buf(), step));
        Ok(())
    }

    fn load_params(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Evaluator returning an increasing reward, without touching the environment.
#[derive(Default)]
pub struct CountingEvaluator {
    pub n_calls: usize,
}

impl Evaluator<LineEnv> for CountingEvaluator {
    fn evaluate<P: Policy<LineEnv>>(&mut self, _policy: &mut P) -> Result<Record> {
        self.n_calls += 1;
        Ok(Record::from_scalar(
            "eval/episode_reward",
            self.n_calls as f32,
        ))
    }
}

/// Aggregates stored records like the TensorBoard and log recorders do,
/// keeping the aggregated record of every flush.
#[derive(Default)]
pub struct AggregatingRecorder {
    storage: RecordStorage,
    pub flushed: Vec<(i64, Record)>,
}

impl AggregateRecorder for AggregatingRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        if !self.storage.is_empty() {
            self.flushed.push((step, self.storage.aggregate()));
        }
    }
}
