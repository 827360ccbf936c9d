//! Training of an exploring agent on a point-mass task with [`offpolicy_core`].
//!
//! The crate wires [`PointMass`], [`RandomAgent`] and the replay buffer of
//! `offpolicy-core` into a [`Trainer`] run described by a [`RunConfig`].
mod config;
mod point_mass;
mod random_agent;
pub use config::RunConfig;
pub use point_mass::{PointMass, PointMassAct, PointMassConfig, PointMassInfo, PointMassObs};
pub use random_agent::{
    state_entropy_reward, RandomAgent, RandomAgentConfig, RandomAgentParams, ReplayBuffer,
};

use anyhow::Result;
use log::info;
use offpolicy_core::{
    record::AggregateRecorder,
    replay_buffer::{ArrayBatch, SimpleStepProcessor, SimpleStepProcessorConfig},
    DefaultEvaluator, Env, ReplayBufferBase, StepProcessor, Trainer,
};
use std::{fs, path::Path};

/// Converts steps of [`PointMass`] into transitions.
pub type StepProc = SimpleStepProcessor<PointMass, ArrayBatch, ArrayBatch>;

/// File name of the configuration saved in the model directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Trains a [`RandomAgent`] as described by `config`.
///
/// The configuration is saved in the model directory before training starts.
/// Returns the trained agent and the replay buffer.
pub fn run(config: &RunConfig, recorder: &mut dyn AggregateRecorder) -> Result<(RandomAgent, ReplayBuffer)> {
    let model_dir = Path::new(config.trainer.model_dir.as_deref().unwrap_or("."));
    fs::create_dir_all(model_dir)?;
    config.save(model_dir.join(CONFIG_FILE))?;
    info!("Saved the configuration in {:?}", model_dir);

    let env = PointMass::build(&config.env, config.env_seed)?;
    let step_proc = StepProc::build(&SimpleStepProcessorConfig::default());
    let mut agent = RandomAgent::build(config.agent.clone());
    let mut buffer = ReplayBuffer::build(&config.replay_buffer);
    let mut evaluator =
        DefaultEvaluator::<PointMass>::new(&config.env, config.env_seed + 1, config.n_eval_episodes)?;
    let mut trainer = Trainer::build(config.trainer.clone());

    trainer.train(
        env,
        step_proc,
        &mut agent,
        &mut buffer,
        recorder,
        &mut evaluator,
    )?;

    Ok((agent, buffer))
}
