//! Conversion of environment steps into transitions.
use super::{BatchBase, GenericTransitionBatch};
use crate::{Env, Step, StepProcessor};
use std::{default::Default, marker::PhantomData};

/// Configuration of [`SimpleStepProcessor`].
#[derive(Clone, Debug, Default)]
pub struct SimpleStepProcessorConfig {}

/// Produces 1-step transitions `(o_t, a_t, r_t, o_t+1, done_t, done_no_bootstrap_t)`.
///
/// The processor keeps the previous observation, so [`StepProcessor::reset`]
/// must be called with the initial observation of every episode.
///
/// # Type Parameters
///
/// * `E` - The environment type
/// * `O` - The observation storage, built from `E::Obs`
/// * `A` - The action storage, built from `E::Act`
pub struct SimpleStepProcessor<E, O, A> {
    prev_obs: Option<O>,
    phantom: PhantomData<(E, A)>,
}

impl<E, O, A> StepProcessor<E> for SimpleStepProcessor<E, O, A>
where
    E: Env,
    O: BatchBase + From<E::Obs>,
    A: BatchBase + From<E::Act>,
{
    type Config = SimpleStepProcessorConfig;
    type Output = GenericTransitionBatch<O, A>;

    fn build(_config: &Self::Config) -> Self {
        Self {
            prev_obs: None,
            phantom: PhantomData,
        }
    }

    fn reset(&mut self, init_obs: E::Obs) {
        self.prev_obs = Some(init_obs.into());
    }

    /// Processes a step from the environment into a transition.
    ///
    /// # Panics
    ///
    /// Panics if `reset()` has not been called before processing steps.
    fn process(&mut self, step: Step<E>) -> Self::Output {
        let done = step.is_done;
        let done_no_bootstrap = step.is_done_no_bootstrap();
        let next_obs: O = step.obs.clone().into();
        let obs = self
            .prev_obs
            .replace(step.obs.into())
            .expect("prev_obs is not set. Forgot to call reset()?");

        GenericTransitionBatch::from_transition(
            obs,
            step.act.into(),
            step.reward,
            next_obs,
            done,
            done_no_bootstrap,
        )
    }
}
