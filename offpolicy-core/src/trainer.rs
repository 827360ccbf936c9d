//! Train [`Agent`].
mod config;
mod phase;
mod sampler;
mod state;
use crate::{
    record::{AggregateRecorder, Record, RecordValue::Scalar},
    Agent, Env, Evaluator, ExperienceBufferBase, ReplayBufferBase, StepProcessor,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::info;
pub use phase::{Phase, ResetEvent};
use rand::{rngs::StdRng, SeedableRng};
pub use sampler::Sampler;
pub use state::TrainingState;
use std::{
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop.
///
/// # Training loop
///
/// Every iteration of the loop takes exactly one environment step.
/// The phase of a step is given by [`Phase::classify()`] on the global step count:
///
/// ```mermaid
/// graph LR
///     S[Seed] -->|step == seed_steps| U[Unsup]
///     U -->|step == seed_steps + unsup_steps| R((reset critic))
///     R --> N[Normal]
///     S -->|step == seed_steps, unsup_steps == 0| N
/// ```
///
/// 1. If the previous episode has ended, or at the very first step:
///     * Record `train/duration`, `train/total_duration`, `train/episode_reward`,
///       `train/episode` and, if the environment reports success,
///       `train/episode_success`, and flush the recorder.
///     * After the seed phase, if `step % eval_interval == 0`, evaluate the agent
///       with the [`Evaluator`] and record `eval/episode`, `eval/episode_reward`
///       and `eval/success_rate`. The best agent so far is saved in
///       `(model_dir)/best`.
///     * Reset the environment, the agent and the step processor.
/// 2. Select an action: uniformly random in the seed phase, sampled from the
///    agent otherwise.
/// 3. Update the agent:
///     * [`Phase::Seed`]: no update.
///     * The first step at or after `seed_steps + unsup_steps`, if `unsup_steps > 0`:
///       [`Agent::reset_critic()`] followed by [`Agent::update_after_reset()`]
///       with `reset_update` gradient updates. This replaces the update of the step.
///     * [`Phase::Unsup`]: [`Agent::update_state_ent()`].
///     * [`Phase::Normal`]: [`Agent::update()`], except at `step == seed_steps`
///       when `unsup_steps == 0`, which has no update.
/// 4. Apply the action to the environment. The step is marked as truncated
///    if it is the last one allowed by [`Env::max_episode_steps()`], so that
///    time-limit terminations are bootstrapped.
/// 5. Accumulate the reward and the success of the episode, convert the step into
///    a transition with [`StepProcessor`] and push it into the replay buffer.
///
/// At the end, the agent is saved in `model_dir` with the final step count.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|"Step&lt;E: Env&gt;"|C[StepProcessor]
///     C -->|ExperienceBufferBase::Item|D[ReplayBufferBase]
///     D -->|ReplayBufferBase::Batch|A
/// ```
pub struct Trainer {
    /// Configuration of the training loop.
    config: TrainerConfig,

    /// Counters of the current run.
    state: TrainingState,

    /// Reset of the critic after unsupervised exploration.
    reset_event: ResetEvent,

    /// The best evaluation reward so far.
    max_eval_reward: f32,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Self {
        let reset_event = ResetEvent::new(config.seed_steps, config.unsup_steps);
        Self {
            config,
            state: TrainingState::default(),
            reset_event,
            max_eval_reward: f32::MIN,
        }
    }

    /// Counters of the last (or current) run.
    pub fn state(&self) -> &TrainingState {
        &self.state
    }

    /// The reset event of the last (or current) run.
    pub fn reset_event(&self) -> &ResetEvent {
        &self.reset_event
    }

    fn model_dir(&self) -> PathBuf {
        PathBuf::from(self.config.model_dir.as_deref().unwrap_or("."))
    }

    fn save_model<E, R, A>(agent: &A, model_dir: &Path, step: usize) -> Result<()>
    where
        E: Env,
        R: ReplayBufferBase,
        A: Agent<E, R>,
    {
        agent.save_params(model_dir, step)?;
        info!("Saved the model in {:?}", model_dir);
        Ok(())
    }

    /// Stores the metrics of the episode that has just ended.
    fn record_episode(
        &self,
        recorder: &mut dyn AggregateRecorder,
        duration: Duration,
        total_duration: Duration,
    ) {
        let state = &self.state;
        let mut record = Record::from_slice(&[
            ("train/duration", Scalar(duration.as_secs_f32())),
            ("train/total_duration", Scalar(total_duration.as_secs_f32())),
            ("train/episode_reward", Scalar(state.episode_reward)),
            ("train/episode", Scalar(state.episode_index as f32)),
        ]);
        if let Some(success) = state.episode_success {
            record.insert("train/episode_success", Scalar(success));
        }
        recorder.store(record);
        recorder.flush(state.global_step as _);
    }

    fn is_eval_step(&self) -> bool {
        let step = self.state.global_step;
        step >= self.config.seed_steps && step > 0 && step % self.config.eval_interval == 0
    }

    /// Evaluates the agent and saves it if it is the best so far.
    fn evaluate<E, R, A, D>(
        &mut self,
        agent: &mut A,
        evaluator: &mut D,
        recorder: &mut dyn AggregateRecorder,
    ) -> Result<()>
    where
        E: Env,
        R: ReplayBufferBase,
        A: Agent<E, R>,
        D: Evaluator<E>,
    {
        let step = self.state.global_step;
        info!("Starts evaluation of the agent at step {}", step);
        agent.eval();
        let mut record = evaluator.evaluate(agent)?;
        agent.train();

        let eval_reward = record.get_scalar("eval/episode_reward")?;
        record.insert("eval/episode", Scalar(self.state.episode_index as f32));
        recorder.store(record);
        recorder.flush(step as _);

        if eval_reward > self.max_eval_reward {
            self.max_eval_reward = eval_reward;
            if self.config.model_dir.is_some() {
                Self::save_model::<E, R, A>(agent, &self.model_dir().join("best"), step)?;
            }
        }
        Ok(())
    }

    /// Performs the update of the current step.
    ///
    /// Returns `None` if no update is done.
    fn update<E, R, A>(&mut self, agent: &mut A, buffer: &mut R) -> Result<Option<Record>>
    where
        E: Env,
        R: ReplayBufferBase,
        A: Agent<E, R>,
    {
        let step = self.state.global_step;

        if self.reset_event.fire(step) {
            info!("Resets the critic at step {}", step);
            agent.reset_critic()?;
            let record = agent.update_after_reset(buffer, step, self.config.reset_update, true)?;
            return Ok(Some(record));
        }

        match self.state.phase {
            Phase::Seed => Ok(None),
            Phase::Unsup => agent
                .update_state_ent(
                    buffer,
                    step,
                    self.config.unsup_gradient_update,
                    self.config.top_k,
                )
                .map(Some),
            Phase::Normal if step == self.config.seed_steps => Ok(None),
            Phase::Normal => agent.update(buffer, step).map(Some),
        }
    }

    /// Trains the agent.
    ///
    /// Transitions produced by `step_proc` from the steps of `env` are pushed
    /// into `buffer`, which is handed to the agent at every update.
    /// Random actions of the seed phase are drawn from [`Env::action_space()`].
    pub fn train<E, P, R, A, D>(
        &mut self,
        env: E,
        step_proc: P,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut dyn AggregateRecorder,
        evaluator: &mut D,
    ) -> Result<()>
    where
        E: Env,
        E::Act: From<Vec<f32>>,
        P: StepProcessor<E>,
        R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
        A: Agent<E, R>,
        D: Evaluator<E>,
    {
        self.config.validate()?;

        let mut sampler = Sampler::new(env, step_proc);
        let action_space = sampler.action_space();
        let max_episode_steps = sampler.max_episode_steps();
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        self.state = TrainingState::default();
        self.reset_event = ResetEvent::new(self.config.seed_steps, self.config.unsup_steps);
        self.max_eval_reward = f32::MIN;
        let timer_total = SystemTime::now();
        let mut timer_episode = SystemTime::now();
        agent.train();

        while self.state.global_step < self.config.max_steps {
            // Episode boundary
            if sampler.needs_reset() {
                if self.state.global_step > 0 {
                    self.record_episode(recorder, timer_episode.elapsed()?, timer_total.elapsed()?);
                    if self.is_eval_step() {
                        self.evaluate::<E, R, A, D>(agent, evaluator, recorder)?;
                    }
                }
                sampler.reset(agent)?;
                self.state.start_episode();
                timer_episode = SystemTime::now();
            }

            self.state.phase = Phase::classify(
                self.state.global_step,
                self.config.seed_steps,
                self.config.unsup_steps,
            );

            let act = match self.state.phase {
                Phase::Seed => E::Act::from(action_space.sample(&mut rng)),
                _ => agent.act(sampler.obs()?, true)?,
            };

            if let Some(record) = self.update::<E, R, A>(agent, buffer)? {
                if !record.is_empty() {
                    recorder.store(record);
                }
            }

            let is_last_step = self.state.is_last_step(max_episode_steps);
            let (reward, success) = sampler.step_and_push(&act, buffer, is_last_step)?;
            self.state.accumulate(reward, success);
            self.state.advance();

            // Periodic checkpoint
            let step = self.state.global_step;
            if self.config.save_interval > 0 && step % self.config.save_interval == 0 {
                let model_dir = self.model_dir().join(step.to_string());
                Self::save_model::<E, R, A>(agent, &model_dir, step)?;
            }
        }

        // The last step may have ended an episode
        if sampler.needs_reset() && self.state.global_step > 0 {
            self.record_episode(recorder, timer_episode.elapsed()?, timer_total.elapsed()?);
        }
        recorder.flush(self.state.global_step as _);

        Self::save_model::<E, R, A>(agent, &self.model_dir(), self.state.global_step)?;
        info!("Finished training at step {}", self.state.global_step);

        Ok(())
    }
}
