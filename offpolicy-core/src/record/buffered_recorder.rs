use super::{AggregateRecorder, Record, Recorder};

/// Keeps records in memory.
///
/// Written records are kept as they are. Stored records are kept until the
/// next flush, then tagged with the step given to [`AggregateRecorder::flush`]
/// instead of being aggregated. This makes every value reported during a run
/// available for inspection afterwards.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
    pending: Vec<Record>,
    flushed: Vec<(i64, Record)>,
}

impl BufferedRecorder {
    /// Constructs the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the written records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// Records stored but not flushed yet.
    pub fn pending(&self) -> &[Record] {
        &self.pending
    }

    /// Flushed records with their steps, in the order they were stored.
    pub fn flushed(&self) -> &[(i64, Record)] {
        &self.flushed
    }

    /// Flushed scalar values of `key` with their steps.
    pub fn scalars(&self, key: &str) -> Vec<(i64, f32)> {
        self.flushed
            .iter()
            .filter_map(|(step, record)| record.get_scalar(key).ok().map(|v| (*step, v)))
            .collect()
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }
}

impl AggregateRecorder for BufferedRecorder {
    fn store(&mut self, record: Record) {
        self.pending.push(record);
    }

    fn flush(&mut self, step: i64) {
        self.flushed
            .extend(self.pending.drain(..).map(|record| (step, record)));
    }
}
