//! Training phases.

/// The phase a training step belongs to, determined by the step count alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Uniformly random actions, no update.
    Seed,

    /// Agent actions, updates on the state-entropy objective.
    Unsup,

    /// Agent actions, standard updates.
    Normal,
}

impl Phase {
    /// Classifies `step`.
    ///
    /// * `step < seed_steps`: [`Phase::Seed`]
    /// * `seed_steps <= step <= seed_steps + unsup_steps` with `unsup_steps > 0`: [`Phase::Unsup`]
    /// * otherwise: [`Phase::Normal`]
    pub fn classify(step: usize, seed_steps: usize, unsup_steps: usize) -> Self {
        if step < seed_steps {
            Phase::Seed
        } else if unsup_steps > 0 && step <= seed_steps + unsup_steps {
            Phase::Unsup
        } else {
            Phase::Normal
        }
    }
}

/// The one-time reset of the critic at the end of unsupervised exploration.
///
/// The event is armed at `seed_steps + unsup_steps` when `unsup_steps > 0`
/// and fires once, at the first step at or after the armed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetEvent {
    at: Option<usize>,
    fired: bool,
}

impl ResetEvent {
    /// Constructs the event.
    pub fn new(seed_steps: usize, unsup_steps: usize) -> Self {
        let at = match unsup_steps {
            0 => None,
            n => Some(seed_steps + n),
        };
        Self { at, fired: false }
    }

    /// The step at which the event is armed.
    pub fn at(&self) -> Option<usize> {
        self.at
    }

    /// Whether the event has fired.
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Returns `true` exactly once, at the first call with `step >= at`.
    pub fn fire(&mut self, step: usize) -> bool {
        match self.at {
            Some(at) if !self.fired && step >= at => {
                self.fired = true;
                true
            }
            _ => false,
        }
    }
}
