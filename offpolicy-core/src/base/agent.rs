//! Agent.
use super::{Env, Policy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
///
/// Update methods return a [`Record`] with the values the agent wants to
/// report, which [`Trainer`](crate::Trainer) stores in its recorder.
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Performs the standard optimization step.
    ///
    /// `buffer` is a replay buffer from which transitions will be taken
    /// for updating model parameters.
    fn update(&mut self, buffer: &mut R, step: usize) -> Result<Record>;

    /// Performs `gradient_update` optimization steps right after the critic
    /// has been reset. The policy is updated too when `policy_update` is true.
    fn update_after_reset(
        &mut self,
        buffer: &mut R,
        step: usize,
        gradient_update: usize,
        policy_update: bool,
    ) -> Result<Record>;

    /// Performs `gradient_update` optimization steps on a state-entropy
    /// objective instead of the task reward.
    ///
    /// `k` is the number of neighbors of the k-NN entropy estimator.
    fn update_state_ent(
        &mut self,
        buffer: &mut R,
        step: usize,
        gradient_update: usize,
        k: usize,
    ) -> Result<Record>;

    /// Reinitializes the critic.
    fn reset_critic(&mut self) -> Result<()>;

    /// Save the parameters of the agent in the given directory, tagged with
    /// the number of environment steps.
    fn save_params(&self, path: &Path, step: usize) -> Result<()>;

    /// Load the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
