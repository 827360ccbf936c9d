//! Generic implementation of transition batches.
use crate::TransitionBatch;

/// Column storage used by the replay buffer.
///
/// An object of a type implementing this trait holds observations or actions
/// of a number of transitions, one row per transition.
///
/// # Examples
///
/// ```ignore
/// struct TensorBatch {
///     data: Vec<f32>,
///     shape: Vec<usize>,
/// }
///
/// impl BatchBase for TensorBatch {
///     fn new(capacity: usize) -> Self {
///         Self {
///             data: Vec::with_capacity(capacity),
///             shape: vec![],
///         }
///     }
///
///     fn push(&mut self, ix: usize, data: Self) {
///         // Data addition logic
///     }
///
///     fn sample(&self, ixs: &Vec<usize>) -> Self {
///         // Sampling logic
///     }
/// }
/// ```
pub trait BatchBase {
    /// Creates a new batch with the specified capacity.
    fn new(capacity: usize) -> Self;

    /// Writes the rows of `data` starting at row `ix`.
    ///
    /// Rows beyond the capacity wrap around to the beginning.
    fn push(&mut self, ix: usize, data: Self);

    /// Gathers the rows at the given indices, in order.
    fn sample(&self, ixs: &Vec<usize>) -> Self;
}

/// A batch of transitions.
///
/// A single transition pushed into the replay buffer is a batch of length 1.
/// Flags are `0` or `1`.
#[derive(Debug)]
pub struct GenericTransitionBatch<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    /// Current observations
    pub obs: O,

    /// Actions
    pub act: A,

    /// Next observations
    pub next_obs: O,

    /// Rewards
    pub reward: Vec<f32>,

    /// Episode end flags, including time-limit cutoffs.
    pub is_done: Vec<i8>,

    /// Episode end flags, excluding time-limit cutoffs.
    pub is_done_no_bootstrap: Vec<i8>,

    /// Indices of sampled transitions
    pub ix_sample: Option<Vec<usize>>,
}

impl<O, A> TransitionBatch for GenericTransitionBatch<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type ObsBatch = O;
    type ActBatch = A;

    fn unpack(
        self,
    ) -> (
        Self::ObsBatch,
        Self::ActBatch,
        Self::ObsBatch,
        Vec<f32>,
        Vec<i8>,
        Vec<i8>,
        Option<Vec<usize>>,
    ) {
        (
            self.obs,
            self.act,
            self.next_obs,
            self.reward,
            self.is_done,
            self.is_done_no_bootstrap,
            self.ix_sample,
        )
    }

    fn len(&self) -> usize {
        self.reward.len()
    }

    fn obs(&self) -> &Self::ObsBatch {
        &self.obs
    }

    fn act(&self) -> &Self::ActBatch {
        &self.act
    }
}

impl<O, A> GenericTransitionBatch<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    /// Creates an empty batch with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            obs: O::new(capacity),
            act: A::new(capacity),
            next_obs: O::new(capacity),
            reward: Vec::with_capacity(capacity),
            is_done: Vec::with_capacity(capacity),
            is_done_no_bootstrap: Vec::with_capacity(capacity),
            ix_sample: None,
        }
    }

    /// Creates a batch holding a single transition.
    pub fn from_transition(
        obs: O,
        act: A,
        reward: f32,
        next_obs: O,
        done: bool,
        done_no_bootstrap: bool,
    ) -> Self {
        Self {
            obs,
            act,
            next_obs,
            reward: vec![reward],
            is_done: vec![done as i8],
            is_done_no_bootstrap: vec![done_no_bootstrap as i8],
            ix_sample: None,
        }
    }

    /// Returns `1 - is_done` as floats.
    pub fn not_done(&self) -> Vec<f32> {
        self.is_done.iter().map(|&d| 1. - d as f32).collect()
    }

    /// Returns `1 - is_done_no_bootstrap` as floats, the mask to apply to
    /// bootstrapped values in TD targets.
    pub fn not_done_no_bootstrap(&self) -> Vec<f32> {
        self.is_done_no_bootstrap
            .iter()
            .map(|&d| 1. - d as f32)
            .collect()
    }
}
