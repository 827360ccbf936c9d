//! Mutable state of a training run.
use super::Phase;

/// Counters and per-episode accumulators of a training run.
///
/// `global_step` grows by exactly one per environment step for the whole run.
/// The other fields describe the current episode.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingState {
    /// Environment steps since the start of the run.
    pub global_step: usize,

    /// Number of episodes started, i.e. the 1-based index of the current episode.
    pub episode_index: usize,

    /// Sum of rewards in the current episode.
    pub episode_reward: f32,

    /// Environment steps in the current episode.
    pub episode_step: usize,

    /// Running maximum of the per-step success values in the current episode.
    /// `None` for environments not reporting success.
    pub episode_success: Option<f32>,

    /// Phase of the current step.
    pub phase: Phase,
}

impl Default for TrainingState {
    fn default() -> Self {
        Self {
            global_step: 0,
            episode_index: 0,
            episode_reward: 0.,
            episode_step: 0,
            episode_success: None,
            phase: Phase::Seed,
        }
    }
}

impl TrainingState {
    /// Resets the per-episode accumulators for a new episode.
    pub fn start_episode(&mut self) {
        self.episode_index += 1;
        self.episode_reward = 0.;
        self.episode_step = 0;
        self.episode_success = None;
    }

    /// Accumulates the reward and success of a step.
    pub fn accumulate(&mut self, reward: f32, success: Option<f32>) {
        self.episode_reward += reward;
        if let Some(s) = success {
            self.episode_success = Some(self.episode_success.unwrap_or(0.).max(s));
        }
    }

    /// Whether the step about to be taken is the last one allowed by the time limit.
    pub fn is_last_step(&self, max_episode_steps: usize) -> bool {
        self.episode_step + 1 == max_episode_steps
    }

    /// Moves to the next step.
    pub fn advance(&mut self) {
        self.episode_step += 1;
        self.global_step += 1;
    }
}
