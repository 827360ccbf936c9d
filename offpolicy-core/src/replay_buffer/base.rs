//! Ring-buffer implementation of the replay buffer.
use super::{BatchBase, GenericTransitionBatch, SimpleReplayBufferConfig};
use crate::{error::OffpolicyError, ExperienceBufferBase, ReplayBufferBase, TransitionBatch};
use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A fixed-capacity replay buffer with uniform sampling.
///
/// Transitions are written at a cursor that advances modulo the capacity,
/// so once the buffer is full the oldest transition is overwritten first.
/// Batches are drawn uniformly with replacement from the populated slots only.
///
/// # Type Parameters
///
/// * `O` - Storage of observations, must implement [`BatchBase`]
/// * `A` - Storage of actions, must implement [`BatchBase`]
pub struct SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    /// Maximum number of transitions that can be stored.
    capacity: usize,

    /// Current insertion index.
    i: usize,

    /// Number of populated slots, `min(n_pushed, capacity)`.
    size: usize,

    /// Number of transitions ever pushed.
    n_pushed: usize,

    obs: O,
    act: A,
    next_obs: O,
    reward: Vec<f32>,
    is_done: Vec<i8>,
    is_done_no_bootstrap: Vec<i8>,

    /// Random number generator for sampling.
    rng: StdRng,
}

impl<O, A> SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    #[inline]
    fn push_column<T: Copy>(column: &mut [T], i: usize, b: &[T]) {
        let capacity = column.len();
        let mut j = i;
        for v in b.iter() {
            column[j] = *v;
            j += 1;
            if j == capacity {
                j = 0;
            }
        }
    }

    fn sample_column<T: Copy>(column: &[T], ixs: &[usize]) -> Vec<T> {
        ixs.iter().map(|ix| column[*ix]).collect()
    }

    /// Adds a single transition.
    pub fn add(
        &mut self,
        obs: O,
        act: A,
        reward: f32,
        next_obs: O,
        done: bool,
        done_no_bootstrap: bool,
    ) -> Result<()> {
        self.push(GenericTransitionBatch::from_transition(
            obs,
            act,
            reward,
            next_obs,
            done,
            done_no_bootstrap,
        ))
    }

    /// The maximum number of transitions that can be stored.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of transitions ever pushed, which may exceed the capacity.
    pub fn n_pushed(&self) -> usize {
        self.n_pushed
    }

    /// Returns the number of stored transitions ending an episode.
    pub fn num_done_flags(&self) -> usize {
        self.is_done.iter().map(|&d| d as usize).sum()
    }

    /// Returns the number of stored transitions cut off by the time limit.
    pub fn num_truncated_flags(&self) -> usize {
        self.is_done
            .iter()
            .zip(self.is_done_no_bootstrap.iter())
            .filter(|&(&d, &d_nb)| d == 1 && d_nb == 0)
            .count()
    }

    /// Returns the sum of all rewards in the buffer.
    pub fn sum_rewards(&self) -> f32 {
        self.reward.iter().sum()
    }
}

impl<O, A> ExperienceBufferBase for SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type Item = GenericTransitionBatch<O, A>;

    /// Returns the number of populated slots.
    fn len(&self) -> usize {
        self.size
    }

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        let len = tr.len();
        let (obs, act, next_obs, reward, is_done, is_done_no_bootstrap, _) = tr.unpack();
        self.obs.push(self.i, obs);
        self.act.push(self.i, act);
        self.next_obs.push(self.i, next_obs);
        Self::push_column(&mut self.reward, self.i, &reward);
        Self::push_column(&mut self.is_done, self.i, &is_done);
        Self::push_column(&mut self.is_done_no_bootstrap, self.i, &is_done_no_bootstrap);

        self.i = (self.i + len) % self.capacity;
        self.n_pushed += len;
        self.size = (self.size + len).min(self.capacity);

        Ok(())
    }
}

impl<O, A> ReplayBufferBase for SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type Config = SimpleReplayBufferConfig;
    type Batch = GenericTransitionBatch<O, A>;

    fn build(config: &Self::Config) -> Self {
        let capacity = config.capacity;
        assert!(capacity > 0, "Capacity of the replay buffer must be positive");

        Self {
            capacity,
            i: 0,
            size: 0,
            n_pushed: 0,
            obs: O::new(capacity),
            act: A::new(capacity),
            next_obs: O::new(capacity),
            reward: vec![0.; capacity],
            is_done: vec![0; capacity],
            is_done_no_bootstrap: vec![0; capacity],
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        if size > self.size {
            return Err(OffpolicyError::InsufficientData {
                requested: size,
                available: self.size,
            }
            .into());
        }

        let ixs = (0..size)
            .map(|_| self.rng.gen_range(0..self.size))
            .collect::<Vec<_>>();

        Ok(Self::Batch {
            obs: self.obs.sample(&ixs),
            act: self.act.sample(&ixs),
            next_obs: self.next_obs.sample(&ixs),
            reward: Self::sample_column(&self.reward, &ixs),
            is_done: Self::sample_column(&self.is_done, &ixs),
            is_done_no_bootstrap: Self::sample_column(&self.is_done_no_bootstrap, &ixs),
            ix_sample: Some(ixs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay_buffer::ArrayBatch;

    type Buffer = SimpleReplayBuffer<ArrayBatch, ArrayBatch>;

    fn buffer(capacity: usize) -> Buffer {
        Buffer::build(&SimpleReplayBufferConfig::default().capacity(capacity).seed(0))
    }

    // Transition `t` carries `t` in every column, so misaligned columns are detectable.
    fn add(buffer: &mut Buffer, t: usize) {
        let v = t as f32;
        buffer
            .add(
                vec![v, v].into(),
                vec![v].into(),
                v,
                vec![v + 0.5, v + 0.5].into(),
                t % 2 == 0,
                t % 4 == 0,
            )
            .unwrap();
    }

    #[test]
    fn test_ring_buffer_keeps_most_recent() {
        let capacity = 4;
        let mut buffer = buffer(capacity);
        for t in 0..10 {
            add(&mut buffer, t);
        }
        assert_eq!(buffer.len(), capacity);
        assert_eq!(buffer.n_pushed(), 10);

        // Oldest first, starting at the write cursor.
        let rewards = (0..capacity)
            .map(|j| buffer.reward[(buffer.i + j) % capacity])
            .collect::<Vec<_>>();
        assert_eq!(rewards, vec![6., 7., 8., 9.]);

        // The next push evicts transition 6.
        add(&mut buffer, 10);
        let mut stored = buffer.reward.clone();
        stored.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(stored, vec![7., 8., 9., 10.]);
    }

    #[test]
    fn test_batch_fields_correspond() {
        let mut buffer = buffer(8);
        for t in 0..13 {
            add(&mut buffer, t);
        }
        for _ in 0..50 {
            let batch = buffer.batch(8).unwrap();
            assert_eq!(batch.len(), 8);
            for j in 0..8 {
                let r = batch.reward[j];
                assert!(r >= 5. && r <= 12.);
                let t = r as usize;
                assert_eq!(batch.obs.row(j), &[r, r]);
                assert_eq!(batch.act.row(j), &[r]);
                assert_eq!(batch.next_obs.row(j), &[r + 0.5, r + 0.5]);
                assert_eq!(batch.is_done[j], (t % 2 == 0) as i8);
                assert_eq!(batch.is_done_no_bootstrap[j], (t % 4 == 0) as i8);
            }
        }
    }

    #[test]
    fn test_batch_never_returns_unwritten_slot() {
        let mut buffer = buffer(100);
        for t in 0..3 {
            add(&mut buffer, t);
        }
        for _ in 0..100 {
            let batch = buffer.batch(3).unwrap();
            assert!(batch.ix_sample.unwrap().iter().all(|&ix| ix < 3));
        }
    }

    #[test]
    fn test_insufficient_data() {
        let k = 5;
        let mut buffer = buffer(10);
        for written in 0..k {
            let err = buffer.batch(k).unwrap_err();
            assert_eq!(
                err.downcast_ref::<OffpolicyError>(),
                Some(&OffpolicyError::InsufficientData {
                    requested: k,
                    available: written
                })
            );
            add(&mut buffer, written);
        }
        assert!(buffer.batch(k).is_ok());
    }

    #[test]
    fn test_diagnostics() {
        let mut buffer = buffer(16);
        for t in 0..8 {
            add(&mut buffer, t);
        }
        // done at t = 0, 2, 4, 6; not bootstrapped-terminal at t = 2, 6
        assert_eq!(buffer.num_done_flags(), 4);
        assert_eq!(buffer.num_truncated_flags(), 2);
        assert_eq!(buffer.sum_rewards(), 28.);
        assert_eq!(buffer.capacity(), 16);
    }
}
