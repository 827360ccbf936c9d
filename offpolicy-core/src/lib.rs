#![warn(missing_docs)]
//! Core components of an off-policy reinforcement learning training loop.
//!
//! The crate provides the traits through which the training loop talks to its
//! collaborators ([`Env`], [`Policy`], [`Agent`]), a fixed-capacity replay buffer
//! ([`replay_buffer::SimpleReplayBuffer`]), the training scheduler ([`Trainer`])
//! with its seed, unsupervised-exploration and normal phases, an [`Evaluator`]
//! and the [`record`] module used to report metrics.
pub mod error;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{
    Act, Agent, BoxSpace, Env, ExperienceBufferBase, Info, Obs, Policy, ReplayBufferBase, Step,
    StepProcessor, TransitionBatch,
};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use trainer::{Phase, ResetEvent, Sampler, Trainer, TrainerConfig, TrainingState};
