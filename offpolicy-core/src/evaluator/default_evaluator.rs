//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{
    error::OffpolicyError,
    record::{Record, RecordValue},
    Env, Info, Policy,
};
use anyhow::Result;

/// Runs a fixed number of episodes with deterministic actions and averages
/// the episode rewards.
///
/// The evaluator owns an environment instance separate from the one used for
/// collecting transitions. If the environment reports success, the success of
/// an episode is the maximum of its per-step success values and the success
/// rate is the average over episodes, in percent.
///
/// The returned record has `eval/episode_reward` and, when success is
/// reported, `eval/success_rate`.
///
/// # Examples
///
/// ```ignore
/// let mut evaluator = DefaultEvaluator::<PointMass>::new(&env_config, 42, 10)?;
/// let record = evaluator.evaluate(&mut agent)?;
/// println!("Average return: {}", record.get_scalar("eval/episode_reward")?);
/// ```
pub struct DefaultEvaluator<E: Env> {
    n_episodes: usize,
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<P>(&mut self, policy: &mut P) -> Result<Record>
    where
        P: Policy<E>,
    {
        let mut r_total = 0f32;
        let mut success_total: Option<f32> = None;

        for _ in 0..self.n_episodes {
            let mut obs = self.env.reset()?;
            policy.reset();
            let mut episode_success: Option<f32> = None;

            loop {
                let act = policy.act(&obs, false)?;
                let step = self.env.step(&act)?;
                r_total += step.reward;
                if let Some(s) = step.info.success() {
                    episode_success = Some(episode_success.map_or(s, |e| e.max(s)));
                }
                if step.is_done {
                    break;
                }
                obs = step.obs;
            }

            if let Some(s) = episode_success {
                success_total = Some(success_total.unwrap_or(0.) + s);
            }
        }

        let n = self.n_episodes as f32;
        let mut record = Record::from_scalar("eval/episode_reward", r_total / n);
        if let Some(s) = success_total {
            record.insert("eval/success_rate", RecordValue::Scalar(100. * s / n));
        }
        Ok(record)
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the environment
    /// * `seed` - Random seed for environment initialization
    /// * `n_episodes` - Number of episodes to run during evaluation, must be positive
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        if n_episodes == 0 {
            return Err(OffpolicyError::InvalidConfig(
                "n_episodes of the evaluator must be positive".to_string(),
            )
            .into());
        }
        Ok(Self {
            n_episodes,
            env: E::build(config, seed)?,
        })
    }

    /// Number of episodes per evaluation.
    pub fn n_episodes(&self) -> usize {
        self.n_episodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Act, BoxSpace, Obs, Step};

    #[derive(Clone, Debug)]
    struct Unit;
    impl Obs for Unit {}
    impl Act for Unit {}

    struct Success(f32);
    impl Info for Success {
        fn success(&self) -> Option<f32> {
            Some(self.0)
        }
    }

    /// Episode `i` (0-based) lasts `i + 1` steps with a total reward of `i + 1`.
    /// Success is reported on the last step only.
    struct LadderEnv {
        episode: usize,
        t: usize,
        success: f32,
    }

    impl Env for LadderEnv {
        type Config = f32;
        type Obs = Unit;
        type Act = Unit;
        type Info = Success;

        fn build(config: &f32, _seed: i64) -> Result<Self> {
            Ok(Self {
                episode: 0,
                t: 0,
                success: *config,
            })
        }

        fn reset(&mut self) -> Result<Unit> {
            self.episode += 1;
            self.t = 0;
            Ok(Unit)
        }

        fn step(&mut self, act: &Unit) -> Result<Step<Self>> {
            self.t += 1;
            let done = self.t == self.episode;
            let success = if done { self.success } else { 0. };
            Ok(Step::new(Unit, act.clone(), 1., done, Success(success)))
        }

        fn max_episode_steps(&self) -> usize {
            usize::MAX
        }

        fn action_space(&self) -> BoxSpace {
            BoxSpace::uniform(1, -1., 1.)
        }
    }

    #[derive(Default)]
    struct CountingPolicy {
        n_resets: usize,
        n_sampled: usize,
    }

    impl Policy<LadderEnv> for CountingPolicy {
        fn act(&mut self, _obs: &Unit, sample: bool) -> Result<Unit> {
            if sample {
                self.n_sampled += 1;
            }
            Ok(Unit)
        }

        fn reset(&mut self) {
            self.n_resets += 1;
        }
    }

    #[test]
    fn test_average_reward_and_success_rate() -> Result<()> {
        let mut evaluator = DefaultEvaluator::<LadderEnv>::new(&1., 0, 10)?;
        let mut policy = CountingPolicy::default();
        let record = evaluator.evaluate(&mut policy)?;

        assert_eq!(record.get_scalar("eval/episode_reward")?, 5.5);
        assert_eq!(record.get_scalar("eval/success_rate")?, 100.);
        assert_eq!(policy.n_resets, 10);
        assert_eq!(policy.n_sampled, 0);
        Ok(())
    }

    #[test]
    fn test_partial_success_rate() -> Result<()> {
        let mut evaluator = DefaultEvaluator::<LadderEnv>::new(&0.5, 0, 4)?;
        let record = evaluator.evaluate(&mut CountingPolicy::default())?;
        assert_eq!(record.get_scalar("eval/success_rate")?, 50.);
        Ok(())
    }

    #[test]
    fn test_zero_episodes_rejected() {
        let err = DefaultEvaluator::<LadderEnv>::new(&1., 0, 0).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<OffpolicyError>(),
            Some(OffpolicyError::InvalidConfig(_))
        ));
    }
}
