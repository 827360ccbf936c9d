//! Policy.
use super::Env;
use anyhow::Result;

/// A policy on an environment.
///
/// Policy is a mapping from an observation to an action.
pub trait Policy<E: Env> {
    /// Takes an action given an observation.
    ///
    /// With `sample == true` the action is drawn from the policy distribution,
    /// otherwise the deterministic (e.g. mean) action is returned.
    fn act(&mut self, obs: &E::Obs, sample: bool) -> Result<E::Act>;

    /// Clears per-episode internal state, called at the start of each episode.
    fn reset(&mut self) {}
}
