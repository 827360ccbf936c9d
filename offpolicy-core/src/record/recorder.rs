use super::Record;

/// Writes a record to an output destination with [`Recorder::write`].
pub trait Recorder {
    /// Write a record to the [`Recorder`].
    fn write(&mut self, record: Record);
}

/// Stores records and writes values aggregated from them on [`AggregateRecorder::flush`].
pub trait AggregateRecorder {
    /// Store the record.
    fn store(&mut self, record: Record);

    /// Writes values aggregated from the stored records, tagged with `step`,
    /// then clears the stored records.
    fn flush(&mut self, step: i64);
}

impl<T: AggregateRecorder + ?Sized> AggregateRecorder for Box<T> {
    fn store(&mut self, record: Record) {
        (**self).store(record)
    }

    fn flush(&mut self, step: i64) {
        (**self).flush(step)
    }
}
