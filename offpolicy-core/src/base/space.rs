//! Continuous action space.
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A box in `R^n` given by elementwise lower and upper bounds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BoxSpace {
    /// Lower bounds.
    pub low: Vec<f32>,

    /// Upper bounds.
    pub high: Vec<f32>,
}

impl BoxSpace {
    /// Constructs a box. `low` and `high` must have the same length.
    pub fn new(low: Vec<f32>, high: Vec<f32>) -> Self {
        assert_eq!(low.len(), high.len());
        Self { low, high }
    }

    /// Constructs the box `[low, high]^dim`.
    pub fn uniform(dim: usize, low: f32, high: f32) -> Self {
        Self::new(vec![low; dim], vec![high; dim])
    }

    /// Dimension of the space.
    pub fn dim(&self) -> usize {
        self.low.len()
    }

    /// Draws a point uniformly at random.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec<f32> {
        self.low
            .iter()
            .zip(self.high.iter())
            .map(|(&lo, &hi)| if hi > lo { rng.gen_range(lo..hi) } else { lo })
            .collect()
    }

    /// Returns if `x` lies in the box.
    pub fn contains(&self, x: &[f32]) -> bool {
        x.len() == self.dim()
            && x
                .iter()
                .zip(self.low.iter().zip(self.high.iter()))
                .all(|(v, (lo, hi))| lo <= v && v <= hi)
    }

    /// Clips `x` into the box.
    pub fn clip(&self, x: &mut [f32]) {
        for (v, (lo, hi)) in x.iter_mut().zip(self.low.iter().zip(self.high.iter())) {
            *v = v.max(*lo).min(*hi);
        }
    }
}
