//! Row-major `f32` storage.
use super::BatchBase;

/// Rows of `f32` vectors of a fixed dimension, stored contiguously.
///
/// A buffer created with [`BatchBase::new`] learns its dimension from the
/// first pushed data.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayBatch {
    dim: usize,
    capacity: usize,
    data: Vec<f32>,
}

impl ArrayBatch {
    /// Creates a batch from rows, which must have the same length.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Self {
        let capacity = rows.len();
        let dim = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(capacity * dim);
        for row in rows.into_iter() {
            assert_eq!(row.len(), dim, "Rows of an ArrayBatch must have the same length");
            data.extend(row);
        }
        Self {
            dim,
            capacity,
            data,
        }
    }

    /// Dimension of a row.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self.dim {
            0 => 0,
            d => self.data.len() / d,
        }
    }

    /// Returns if no row is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the `i`-th row.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// Returns an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.len()).map(move |i| self.row(i))
    }

    /// Returns the underlying data in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

impl From<Vec<f32>> for ArrayBatch {
    /// A single row.
    fn from(v: Vec<f32>) -> Self {
        Self {
            dim: v.len(),
            capacity: 1,
            data: v,
        }
    }
}

impl BatchBase for ArrayBatch {
    fn new(capacity: usize) -> Self {
        Self {
            dim: 0,
            capacity,
            data: vec![],
        }
    }

    fn push(&mut self, ix: usize, data: Self) {
        if data.is_empty() {
            return;
        }
        if self.data.is_empty() {
            self.dim = data.dim;
            self.data = vec![0.; self.capacity * self.dim];
        }
        assert_eq!(self.dim, data.dim, "Dimension mismatch in ArrayBatch::push()");

        for (j, row) in data.rows().enumerate() {
            let i = (ix + j) % self.capacity;
            self.data[i * self.dim..(i + 1) * self.dim].copy_from_slice(row);
        }
    }

    fn sample(&self, ixs: &Vec<usize>) -> Self {
        let mut data = Vec::with_capacity(ixs.len() * self.dim);
        for &ix in ixs.iter() {
            data.extend_from_slice(self.row(ix));
        }
        Self {
            dim: self.dim,
            capacity: ixs.len(),
            data,
        }
    }
}
