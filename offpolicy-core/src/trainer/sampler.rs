//! Interaction with the training environment.
use crate::{Env, ExperienceBufferBase, Info, Policy, StepProcessor};
use anyhow::{anyhow, Result};

/// Steps the training environment and pushes the resulting transitions
/// into a replay buffer.
///
/// The sampler keeps the observation the next action is taken on. It is
/// `None` at the start of the run and after an episode has ended, which is
/// how [`Trainer`](super::Trainer) detects episode boundaries.
pub struct Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    env: E,
    prev_obs: Option<E::Obs>,
    step_processor: P,
}

impl<E, P> Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    /// Creates a sampler. The environment is reset on the first call of
    /// [`Sampler::reset()`].
    pub fn new(env: E, step_processor: P) -> Self {
        Self {
            env,
            prev_obs: None,
            step_processor,
        }
    }

    /// Returns `true` if no episode is running.
    pub fn needs_reset(&self) -> bool {
        self.prev_obs.is_none()
    }

    /// Starts a new episode.
    ///
    /// Resets the environment, the per-episode state of `policy` and the
    /// step processor.
    pub fn reset<A: Policy<E>>(&mut self, policy: &mut A) -> Result<()> {
        let obs = self.env.reset()?;
        policy.reset();
        self.step_processor.reset(obs.clone());
        self.prev_obs = Some(obs);
        Ok(())
    }

    /// The observation the next action is taken on.
    pub fn obs(&self) -> Result<&E::Obs> {
        self.prev_obs
            .as_ref()
            .ok_or_else(|| anyhow!("The environment has not been reset"))
    }

    /// Applies `act` to the environment and pushes the transition into `buffer`.
    ///
    /// If `is_last_step` is true, the step is marked as truncated by the time
    /// limit. Returns the reward and the success value of the step.
    pub fn step_and_push<R>(
        &mut self,
        act: &E::Act,
        buffer: &mut R,
        is_last_step: bool,
    ) -> Result<(f32, Option<f32>)>
    where
        R: ExperienceBufferBase<Item = P::Output>,
    {
        if self.prev_obs.is_none() {
            return Err(anyhow!("The environment has not been reset"));
        }

        let mut step = self.env.step(act)?;
        step.is_truncated = is_last_step;
        let reward = step.reward;
        let success = step.info.success();

        self.prev_obs = match step.is_done {
            true => None,
            false => Some(step.obs.clone()),
        };

        let transition = self.step_processor.process(step);
        buffer.push(transition)?;

        Ok((reward, success))
    }

    /// The action space of the environment.
    pub fn action_space(&self) -> crate::BoxSpace {
        self.env.action_space()
    }

    /// The time limit of an episode.
    pub fn max_episode_steps(&self) -> usize {
        self.env.max_episode_steps()
    }
}
