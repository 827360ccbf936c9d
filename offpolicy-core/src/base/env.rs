//! Environment.
use super::{Act, BoxSpace, Info, Obs, Step};
use anyhow::Result;

/// Represents an environment, typically an MDP with a time limit.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Starts a new episode and returns its initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performes an environment step.
    ///
    /// [`Step::is_truncated`] is not filled by environments; the caller knows
    /// the time limit and sets it.
    fn step(&mut self, a: &Self::Act) -> Result<Step<Self>>
    where
        Self: Sized;

    /// The maximum number of steps in an episode.
    ///
    /// An episode reaching this number of steps is reported as done.
    fn max_episode_steps(&self) -> usize;

    /// Bounds of the continuous action space.
    fn action_space(&self) -> BoxSpace;
}
